//! Transaction scope
//!
//! `with_transaction` acquires a pooled connection, opens a transaction and
//! hands the callback a connection that is only valid for the callback's
//! duration. `Ok` commits, `Err` rolls back. Either way the connection goes
//! back to the pool before the function returns.
//!
//! Acquisition and hold times are logged so pool saturation shows up in the
//! logs.

use futures::future::BoxFuture;
use sqlx::{SqliteConnection, SqlitePool};
use std::time::Instant;
use tracing::{debug, warn};

const SLOW_ACQUIRE_MS: u64 = 500;
const LONG_HOLD_MS: u64 = 1000;

/// Run `f` inside a transaction
///
/// # Example
/// ```ignore
/// let id = with_transaction(&pool, "products::create", |conn| {
///     Box::pin(async move {
///         let id = insert_product(conn, &input).await?;
///         insert_assignments(conn, id, &input.attributes).await?;
///         Ok(id)
///     })
/// })
/// .await?;
/// ```
pub async fn with_transaction<T, E, F>(pool: &SqlitePool, caller: &'static str, f: F) -> Result<T, E>
where
    F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T, E>>,
    E: From<sqlx::Error>,
{
    let start = Instant::now();
    let mut tx = pool.begin().await?;

    let wait_ms = start.elapsed().as_millis() as u64;
    if wait_ms > SLOW_ACQUIRE_MS {
        warn!(caller, wait_ms, "Slow connection acquisition, pool may be saturated");
    } else {
        debug!(caller, wait_ms, "Transaction started");
    }

    let held_from = Instant::now();
    let outcome = f(&mut *tx).await;
    let held_ms = held_from.elapsed().as_millis() as u64;

    match outcome {
        Ok(value) => {
            tx.commit().await?;
            if held_ms > LONG_HOLD_MS {
                warn!(caller, held_ms, "Long transaction committed");
            } else {
                debug!(caller, held_ms, "Transaction committed");
            }
            Ok(value)
        }
        Err(err) => {
            // Dropping `tx` rolls back too; a failed explicit rollback is only logged
            if let Err(rollback_err) = tx.rollback().await {
                warn!(caller, error = %rollback_err, "Rollback failed");
            } else {
                debug!(caller, held_ms, "Transaction rolled back");
            }
            Err(err)
        }
    }
}
