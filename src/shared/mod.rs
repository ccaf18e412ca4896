// Shared kernel used by the anime module: configuration, errors,
// database plumbing, pagination and logging helpers.

pub mod application;
pub mod config;
pub mod errors;
pub mod infrastructure;
pub mod utils;

pub use infrastructure::database::Database;
