//! Database schema, models and transaction scope

pub mod init;
pub mod migrations;
pub mod models;
pub mod transaction;

pub use init::*;
pub use migrations::*;
pub use models::*;
pub use transaction::with_transaction;
