//! PostgreSQL target database operations.
//!
//! The destination side of a run is one dedicated `tokio-postgres`
//! connection holding one transaction for the entire migration. The
//! transaction spans many `&mut self` calls on the store, so it is driven
//! with explicit `BEGIN`/`COMMIT` statements rather than the borrow-scoped
//! guard API. If the run aborts (or the process dies) before `COMMIT`, the
//! server discards the transaction when the session ends, which is exactly
//! the required all-or-nothing behavior.

mod copy_text;

use crate::config::TargetConfig;
use crate::entity::SinkEntity;
use crate::error::{MigrateError, Result};
use async_trait::async_trait;
use bytes::BytesMut;
use futures::SinkExt;
use tokio_postgres::NoTls;
use tracing::{debug, info, warn};

/// Destination-side operations used by the migration run.
///
/// `insert` stages one bounded batch inside the open transaction; nothing
/// becomes visible until the orchestrator's single `commit`. Implementations
/// must not retain staged rows in memory after `insert` returns.
#[async_trait]
pub trait TargetStore: Send {
    /// Open the run-wide transaction.
    async fn begin(&mut self) -> Result<()>;

    /// Stage one batch of rows for a table inside the open transaction.
    async fn insert<E>(&mut self, rows: &[E]) -> Result<u64>
    where
        E: SinkEntity;

    /// Commit the run-wide transaction. Called exactly once, by the
    /// orchestrator, after every table has been copied.
    async fn commit(&mut self) -> Result<()>;

    /// Discard the run-wide transaction.
    async fn rollback(&mut self) -> Result<()>;
}

/// PostgreSQL target on a single dedicated connection.
pub struct PgTarget {
    client: tokio_postgres::Client,
    schema: String,
}

impl PgTarget {
    /// Connect to the destination database.
    pub async fn connect(config: &TargetConfig) -> Result<Self> {
        let (client, connection) =
            tokio_postgres::connect(&config.connection_string(), NoTls).await?;

        // The connection future drives the socket; it ends when the client
        // is dropped.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!("PostgreSQL connection error: {}", e);
            }
        });

        info!(
            "Connected to PostgreSQL: {}:{}/{}",
            config.host, config.port, config.database
        );

        Ok(Self {
            client,
            schema: config.schema.clone(),
        })
    }

    /// Get the row count for a destination table.
    pub async fn row_count(&self, table: &str) -> Result<i64> {
        let sql = format!(
            "SELECT count(*) FROM {}",
            qualify_table(&self.schema, table)
        );
        let row = self.client.query_one(sql.as_str(), &[]).await?;
        Ok(row.get(0))
    }

    /// Cheap connectivity probe.
    pub async fn ping(&self) -> Result<()> {
        self.client.simple_query("SELECT 1").await?;
        Ok(())
    }
}

#[async_trait]
impl TargetStore for PgTarget {
    async fn begin(&mut self) -> Result<()> {
        self.client.batch_execute("BEGIN").await?;
        debug!("Destination transaction opened");
        Ok(())
    }

    async fn insert<E>(&mut self, rows: &[E]) -> Result<u64>
    where
        E: SinkEntity,
    {
        if rows.is_empty() {
            return Ok(0);
        }

        let col_list = E::INSERT
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let copy_stmt = format!(
            "COPY {} ({}) FROM STDIN WITH (FORMAT text)",
            qualify_table(&self.schema, E::TABLE),
            col_list
        );

        let sink = self
            .client
            .copy_in(copy_stmt.as_str())
            .await
            .map_err(|e| MigrateError::target_write(E::TABLE, e))?;
        futures::pin_mut!(sink);

        let mut buf = BytesMut::with_capacity(64 * 1024);
        for row in rows {
            copy_text::encode_row(&mut buf, &row.fields());
        }

        sink.send(buf.freeze())
            .await
            .map_err(|e| MigrateError::target_write(E::TABLE, e))?;
        let staged = sink
            .finish()
            .await
            .map_err(|e| MigrateError::target_write(E::TABLE, e))?;

        debug!("{}: staged {} rows", E::TABLE, staged);
        Ok(staged)
    }

    async fn commit(&mut self) -> Result<()> {
        self.client
            .batch_execute("COMMIT")
            .await
            .map_err(MigrateError::commit)
    }

    async fn rollback(&mut self) -> Result<()> {
        self.client.batch_execute("ROLLBACK").await?;
        debug!("Destination transaction rolled back");
        Ok(())
    }
}

/// Quote a PostgreSQL identifier.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Qualify a PostgreSQL table name with schema and proper quoting.
fn qualify_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("AspNetUsers"), "\"AspNetUsers\"");
        assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
    }

    #[test]
    fn test_qualify_table() {
        assert_eq!(
            qualify_table("public", "AspNetRoles"),
            "\"public\".\"AspNetRoles\""
        );
    }
}
