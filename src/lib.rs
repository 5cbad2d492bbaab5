// Library crate for integration tests
// Re-exports all modules needed for testing

pub mod config;
pub mod connection;
pub mod error;
pub mod notify;
pub mod scanner;
pub mod strategy;
pub mod types;
