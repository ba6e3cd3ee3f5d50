//! Memory-side collaborators: the fetch path, the data cache, and address
//! translation. The pipeline talks to these only through the traits in
//! [`traits`], so tests can substitute instrumented variants.

mod dcache;
mod icache;
mod mmu;
pub mod traits;

pub use dcache::SimpleDcache;
pub use icache::SimpleICache;
pub use mmu::{FlatMmu, PageFlags};
pub use traits::{DataCache, DcacheOutcome, FetchResponse, InsnCache, MemAccess, Mmu, Translation};

use std::cell::RefCell;
use std::rc::Rc;

/// Backing store shared between the fetch path and the data cache.
pub type SharedMem = Rc<RefCell<Vec<u8>>>;

/// Allocates a zeroed backing store of `size` bytes.
pub fn shared_mem(size: usize) -> SharedMem {
    Rc::new(RefCell::new(vec![0; size]))
}
