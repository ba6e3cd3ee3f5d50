//! The six-stage pipeline: latches, tags, bypass network, and the stage
//! functions that advance it one cycle at a time.

pub mod bypass;
pub mod engine;
pub mod packets;
pub mod stages;
pub mod tags;

pub use engine::Pipeline;
pub use tags::{InsnTag, TagFile, TAG_COUNT};
