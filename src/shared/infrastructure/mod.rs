//! Shared infrastructure concerns
//!
//! Connection pool, raw persistence errors and the transaction runner used by
//! the anime repository.
pub mod database;
pub mod persistence_error;
pub mod transaction;

// Re-exports for convenience
pub use database::{Database, DbConnection, DbPool};
pub use persistence_error::{PersistenceError, PersistenceResult};
pub use transaction::{run_in_transaction, Deadline, TxMode};
