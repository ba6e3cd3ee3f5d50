pub mod sync_faults;
