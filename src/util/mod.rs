// Utility Module
// Small-prime cache persistence

pub mod file_ops;

pub use file_ops::{load_or_create_prime_table, load_prime_table, save_prime_table, FileError};
