// Command Line Module
// Demo front end: generate a key pair and round-trip a message

pub mod app;

pub use app::{run, Args};
