//! Transaction runner with explicit isolation and a statement deadline
//!
//! Diesel's `Connection::transaction` returns the rollback error when rolling
//! back fails, hiding the failure that caused it. This runner keeps the
//! original error and only logs the rollback failure.
use std::time::{Duration, Instant};

use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::pg::PgConnection;
use diesel::RunQueryDsl;

use super::{PersistenceError, PersistenceResult};
use crate::log_warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    /// Row locks serialize writers of the same row; a version-guarded
    /// `UPDATE` re-checks its predicate after the lock is granted
    Write,
    /// Consistent snapshot for the whole transaction, no phantoms
    Read,
}

impl TxMode {
    pub fn begin_sql(&self) -> &'static str {
        match self {
            TxMode::Write => "BEGIN ISOLATION LEVEL READ COMMITTED READ WRITE",
            TxMode::Read => "BEGIN ISOLATION LEVEL REPEATABLE READ READ ONLY",
        }
    }
}

/// Point in time after which an operation must give up.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.budget
            .checked_sub(self.started.elapsed())
            .filter(|left| !left.is_zero())
    }

    pub fn check(&self) -> PersistenceResult<Duration> {
        self.remaining()
            .ok_or(PersistenceError::Timeout(self.budget))
    }
}

/// Run `work` inside one transaction.
///
/// Every statement inherits the deadline through `SET LOCAL
/// statement_timeout`; a deadline that expires while `work` runs rolls the
/// transaction back instead of committing.
pub fn run_in_transaction<T, F>(
    conn: &mut PgConnection,
    mode: TxMode,
    deadline: Deadline,
    work: F,
) -> PersistenceResult<T>
where
    F: FnOnce(&mut PgConnection) -> PersistenceResult<T>,
{
    let remaining = deadline.check()?;
    AnsiTransactionManager::begin_transaction_sql(&mut *conn, mode.begin_sql())?;

    let outcome = apply_statement_timeout(conn, remaining)
        .and_then(|()| work(conn))
        .and_then(|value| deadline.check().map(|_| value));

    match outcome {
        Ok(value) => {
            AnsiTransactionManager::commit_transaction(&mut *conn)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = AnsiTransactionManager::rollback_transaction(&mut *conn) {
                log_warn!("Rollback failed after '{}': {}", err, rollback_err);
            }
            Err(err)
        }
    }
}

fn apply_statement_timeout(conn: &mut PgConnection, remaining: Duration) -> PersistenceResult<()> {
    // SET does not accept bind parameters; the value is an integer we computed.
    let millis = remaining.as_millis().max(1);
    diesel::sql_query(format!("SET LOCAL statement_timeout = {}", millis)).execute(conn)?;
    Ok(())
}
