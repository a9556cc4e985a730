//! Migration orchestrator - main workflow coordinator.
//!
//! The orchestrator owns the single destination transaction and the fixed
//! copy order: roles, then users (pseudonymized), then the five child
//! tables. Every table goes through the same generic paginated copy routine;
//! the user table is the only one with a non-identity transform. The run is
//! atomic: either every table lands and the transaction commits once, or the
//! run terminates without committing and the destination is unchanged.

use crate::config::Config;
use crate::entity::{
    Entity, Role, RoleClaim, SinkEntity, SourceEntity, SourceUser, UserClaim, UserLogin,
    UserRecord, UserRole, UserToken,
};
use crate::error::{MigrateError, Result};
use crate::pseudonym::pseudonymize;
use crate::source::{MssqlSource, SourcePool};
use crate::target::{PgTarget, TargetStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// The copy stages of a run, in foreign-key-safe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Roles,
    Users,
    RoleClaims,
    UserClaims,
    UserLogins,
    UserRoles,
    UserTokens,
}

impl Stage {
    /// Copy order: parents before children, so every foreign key written
    /// resolves against already-copied rows.
    pub const ORDER: [Stage; 7] = [
        Stage::Roles,
        Stage::Users,
        Stage::RoleClaims,
        Stage::UserClaims,
        Stage::UserLogins,
        Stage::UserRoles,
        Stage::UserTokens,
    ];

    /// The table this stage copies.
    pub fn table(self) -> &'static str {
        match self {
            Stage::Roles => Role::TABLE,
            Stage::Users => SourceUser::TABLE,
            Stage::RoleClaims => RoleClaim::TABLE,
            Stage::UserClaims => UserClaim::TABLE,
            Stage::UserLogins => UserLogin::TABLE,
            Stage::UserRoles => UserRole::TABLE,
            Stage::UserTokens => UserToken::TABLE,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// Rows copied for one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRows {
    /// Table name.
    pub table: String,

    /// Rows copied into the destination.
    pub rows: u64,
}

/// Result of a committed migration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Unique run identifier.
    pub run_id: String,

    /// Final status (always "committed"; failed runs return an error).
    pub status: String,

    /// When the migration started.
    pub started_at: DateTime<Utc>,

    /// When the migration committed.
    pub completed_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Rows copied per table, in copy order.
    pub tables: Vec<TableRows>,

    /// Total rows copied.
    pub rows_copied: u64,

    /// Average throughput (rows/second).
    pub rows_per_second: i64,
}

impl MigrationReport {
    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Row-count comparison for one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCount {
    pub table: String,
    pub source_rows: i64,
    pub target_rows: i64,
    pub matches: bool,
}

/// Result of a connectivity health check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub source_connected: bool,
    pub source_latency_ms: u64,
    pub source_error: Option<String>,
    pub target_connected: bool,
    pub target_latency_ms: u64,
    pub target_error: Option<String>,
    pub healthy: bool,
}

/// Migration orchestrator.
pub struct Migrator<S = MssqlSource, T = PgTarget> {
    config: Config,
    source: S,
    target: T,
}

impl Migrator<MssqlSource, PgTarget> {
    /// Connect to both stores and build an orchestrator.
    pub async fn connect(config: Config) -> Result<Self> {
        let source = MssqlSource::connect(&config.source).await?;
        let target = PgTarget::connect(&config.target).await?;
        Ok(Self::new(config, source, target))
    }

    /// Compare per-table row counts between source and destination.
    pub async fn validate(&self) -> Result<Vec<TableCount>> {
        let mut results = Vec::with_capacity(Stage::ORDER.len());

        for stage in Stage::ORDER {
            let table = stage.table();
            let source_rows = self.source.row_count(table).await?;
            let target_rows = self.target.row_count(table).await?;
            let matches = source_rows == target_rows;

            if matches {
                info!("{}: {} rows (match)", table, source_rows);
            } else {
                warn!(
                    "{}: source={} target={} (MISMATCH)",
                    table, source_rows, target_rows
                );
            }

            results.push(TableCount {
                table: table.to_string(),
                source_rows,
                target_rows,
                matches,
            });
        }

        Ok(results)
    }

    /// Probe connectivity and latency for both stores.
    pub async fn health_check(&self) -> Result<HealthReport> {
        let start = Instant::now();
        let source_result = self.source.ping().await;
        let source_latency_ms = start.elapsed().as_millis() as u64;

        let start = Instant::now();
        let target_result = self.target.ping().await;
        let target_latency_ms = start.elapsed().as_millis() as u64;

        let healthy = source_result.is_ok() && target_result.is_ok();

        Ok(HealthReport {
            source_connected: source_result.is_ok(),
            source_latency_ms,
            source_error: source_result.err().map(|e| e.to_string()),
            target_connected: target_result.is_ok(),
            target_latency_ms,
            target_error: target_result.err().map(|e| e.to_string()),
            healthy,
        })
    }
}

impl<S, T> Migrator<S, T>
where
    S: SourcePool,
    T: TargetStore,
{
    /// Create an orchestrator over already-connected stores.
    pub fn new(config: Config, source: S, target: T) -> Self {
        Self {
            config,
            source,
            target,
        }
    }

    /// Run the migration.
    ///
    /// Opens the destination transaction, copies every table in dependency
    /// order and commits exactly once. On any failure (or cancellation) the
    /// commit is omitted and the destination is left unchanged; the error
    /// names the table that was being copied.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<MigrationReport> {
        let started_at = Utc::now();
        let run_id = Uuid::new_v4().to_string();

        info!("Starting migration run: {}", run_id);

        self.target.begin().await?;

        let tables = match self.copy_all(&cancel).await {
            Ok(tables) => tables,
            Err(e) => {
                // Abort without committing; the explicit rollback only
                // releases the destination session early.
                self.target.rollback().await.ok();
                return Err(e);
            }
        };

        if cancel.is_cancelled() {
            self.target.rollback().await.ok();
            return Err(MigrateError::Cancelled);
        }

        self.target.commit().await?;

        let completed_at = Utc::now();
        let duration = (completed_at - started_at).num_milliseconds() as f64 / 1000.0;
        let rows_copied: u64 = tables.iter().map(|t| t.rows).sum();
        let rows_per_second = if duration > 0.0 {
            (rows_copied as f64 / duration) as i64
        } else {
            0
        };

        let report = MigrationReport {
            run_id,
            status: "committed".to_string(),
            started_at,
            completed_at,
            duration_seconds: duration,
            tables,
            rows_copied,
            rows_per_second,
        };

        info!(
            "Migration {}: {} rows in {:.1}s ({} rows/s)",
            report.status, report.rows_copied, report.duration_seconds, report.rows_per_second
        );

        Ok(report)
    }

    /// Copy every table in dependency order inside the open transaction.
    async fn copy_all(&mut self, cancel: &CancellationToken) -> Result<Vec<TableRows>> {
        let batch = self.config.migration.batch_size;
        let user_batch = self.config.migration.user_batch_size;
        let domain = self.config.migration.pseudonym_domain.clone();

        let mut tables = Vec::with_capacity(Stage::ORDER.len());
        let record = |stage: Stage, rows: u64| {
            info!("{}: copied {} rows", stage, rows);
            TableRows {
                table: stage.table().to_string(),
                rows,
            }
        };

        let rows =
            copy_entity::<_, _, Role, Role, _>(&self.source, &mut self.target, batch, cancel, Ok)
                .await?;
        tables.push(record(Stage::Roles, rows));

        let rows = copy_entity(
            &self.source,
            &mut self.target,
            user_batch,
            cancel,
            |user: SourceUser| {
                if user.id.is_empty() {
                    return Err(MigrateError::transform(
                        SourceUser::TABLE,
                        user.id,
                        "empty primary key",
                    ));
                }
                let pseudonym = pseudonymize(
                    &user.id,
                    user.first_name.as_deref(),
                    user.last_name.as_deref(),
                );
                Ok(UserRecord::anonymized(&user, &pseudonym, &domain))
            },
        )
        .await?;
        tables.push(record(Stage::Users, rows));

        let rows = copy_entity::<_, _, RoleClaim, RoleClaim, _>(
            &self.source,
            &mut self.target,
            batch,
            cancel,
            Ok,
        )
        .await?;
        tables.push(record(Stage::RoleClaims, rows));

        let rows = copy_entity::<_, _, UserClaim, UserClaim, _>(
            &self.source,
            &mut self.target,
            batch,
            cancel,
            Ok,
        )
        .await?;
        tables.push(record(Stage::UserClaims, rows));

        let rows = copy_entity::<_, _, UserLogin, UserLogin, _>(
            &self.source,
            &mut self.target,
            batch,
            cancel,
            Ok,
        )
        .await?;
        tables.push(record(Stage::UserLogins, rows));

        let rows = copy_entity::<_, _, UserRole, UserRole, _>(
            &self.source,
            &mut self.target,
            batch,
            cancel,
            Ok,
        )
        .await?;
        tables.push(record(Stage::UserRoles, rows));

        let rows = copy_entity::<_, _, UserToken, UserToken, _>(
            &self.source,
            &mut self.target,
            batch,
            cancel,
            Ok,
        )
        .await?;
        tables.push(record(Stage::UserTokens, rows));

        Ok(tables)
    }
}

/// Generic paginated copy of one table: page from the source, transform each
/// row, stage the batch in the destination transaction.
///
/// Each flushed batch is dropped before the next page is fetched, so memory
/// is bounded by the batch size rather than the table size. A page shorter
/// than `batch_size` ends the loop; an exact-multiple table costs one extra
/// empty fetch.
async fn copy_entity<S, T, R, W, F>(
    source: &S,
    target: &mut T,
    batch_size: usize,
    cancel: &CancellationToken,
    mut transform: F,
) -> Result<u64>
where
    S: SourcePool,
    T: TargetStore,
    R: SourceEntity,
    W: SinkEntity,
    F: FnMut(R) -> Result<W> + Send,
{
    let mut offset = 0u64;
    let mut total = 0u64;

    loop {
        if cancel.is_cancelled() {
            return Err(MigrateError::Cancelled);
        }

        let page: Vec<R> = source.fetch_page(offset, batch_size as u64).await?;
        if page.is_empty() {
            break;
        }

        let fetched = page.len();
        let rows: Vec<W> = page
            .into_iter()
            .map(&mut transform)
            .collect::<Result<_>>()?;
        total += target.insert(&rows).await?;
        debug!("{}: staged page of {} at offset {}", W::TABLE, fetched, offset);

        if fetched < batch_size {
            break;
        }
        offset += fetched as u64;
    }

    Ok(total)
}
