//! # identity-pg-migrate
//!
//! Migrate an ASP.NET Identity schema from SQL Server to PostgreSQL while
//! irreversibly de-identifying user rows in flight.
//!
//! The seven identity tables (roles, users, role claims, user claims, user
//! logins, user roles, user tokens) are copied in foreign-key-safe order in
//! bounded batches, inside one destination transaction that commits exactly
//! once at the end of the run. Every user's name and contact fields are
//! replaced by a deterministic pseudonym derived from a hash of the original
//! identity; credentials, session material and blobs are reset so that no
//! migrated account can ever authenticate. Primary keys are preserved
//! byte-for-byte, so child rows keep resolving and re-runs are reproducible.
//!
//! ## Example
//!
//! ```rust,no_run
//! use identity_pg_migrate::{Config, Migrator};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> identity_pg_migrate::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let mut migrator = Migrator::connect(config).await?;
//!     let report = migrator.run(CancellationToken::new()).await?;
//!     println!("Migrated {} rows", report.rows_copied);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod orchestrator;
pub mod pseudonym;
pub mod source;
pub mod target;

// Re-exports for convenient access
pub use config::{Config, MigrationConfig, SourceConfig, TargetConfig};
pub use error::{MigrateError, Result};
pub use orchestrator::{HealthReport, MigrationReport, Migrator, Stage, TableCount};
pub use pseudonym::{pseudonymize, Pseudonym};
pub use source::{MssqlSource, SourcePool};
pub use target::{PgTarget, TargetStore};
