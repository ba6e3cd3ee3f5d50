//! The stage functions, one module per stage. Each is implemented on
//! [`crate::core::Core`] so it can reach the pipeline latches, the
//! architectural state, and the memory-side collaborators it owns.

mod decode1;
mod decode2;
mod execute1;
mod fetch1;
mod loadstore1;
mod writeback;
