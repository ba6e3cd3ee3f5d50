pub mod load_use;
