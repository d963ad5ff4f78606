//! Postgres runtime for the festa event-discovery backend.
//!
//! This crate applies and verifies the schema declared in
//! [`festa_schema`], and provides the store operations that own the
//! model's transactional contracts (denormalized counters, uniqueness,
//! cascade sweeps for polymorphic references).
//!
//! # Migrations
//!
//! Migrations are plain async functions registered with
//! [`inventory::submit!`]. Each step names the step it depends on,
//! forming a single linear chain:
//!
//! ```ignore
//! async fn migrate(ctx: &mut MigrationContext<'_>) -> Result<()> {
//!     ctx.execute("CREATE TABLE \"tag\" (...)").await?;
//!     Ok(())
//! }
//!
//! inventory::submit! {
//!     Migration {
//!         version: "0006-create-tag",
//!         name: "create-tag",
//!         depends_on: Some("0005-create-follow-vote"),
//!         run: |ctx| Box::pin(migrate(ctx)),
//!     }
//! }
//! ```
//!
//! Run the chain with [`MigrationRunner`]:
//!
//! ```ignore
//! let mut runner = MigrationRunner::new(&mut client);
//! runner.migrate().await?;
//! ```

use std::future::Future;
use std::pin::Pin;

pub mod error;
mod migrate;
mod migrations;
pub mod pool;
pub mod store;
pub mod verify;

pub use error::Error;
pub use migrate::{Migration, MigrationContext, MigrationRunner, MigrationStatus};
pub use verify::verify_schema;

/// Result type for festa-db operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Type alias for migration functions.
///
/// Migration functions are async functions that take a mutable reference
/// to a [`MigrationContext`] and return `Result<()>`. All statements a
/// migration executes run inside one transaction; a failure aborts the
/// step with no partial effect.
pub type MigrationFn = for<'a> fn(
    &'a mut MigrationContext<'a>,
) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

// Register Migration with inventory
inventory::collect!(Migration);
