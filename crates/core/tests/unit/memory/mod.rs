pub mod atomics;
pub mod loads_stores;
pub mod translation;
