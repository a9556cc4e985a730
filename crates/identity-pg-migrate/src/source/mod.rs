//! SQL Server source database operations.

use crate::config::SourceConfig;
use crate::entity::SourceEntity;
use crate::error::{MigrateError, Result};
use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use tiberius::{AuthMethod, Client, Config, EncryptionLevel};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{debug, info};

/// Source-side operations used by the migration run.
///
/// A page is a deterministically-ordered slice of one table; paging is
/// stable across round trips because every page is ordered by the table's
/// key. A page shorter than `limit` (including an empty one) means the table
/// is exhausted. The source performs no writes.
#[async_trait]
pub trait SourcePool: Send + Sync {
    /// Fetch one page of rows at `offset`, ordered by the entity's key.
    async fn fetch_page<E>(&self, offset: u64, limit: u64) -> Result<Vec<E>>
    where
        E: SourceEntity;
}

/// Connection manager for bb8 pool with tiberius.
#[derive(Clone)]
struct TiberiusConnectionManager {
    config: SourceConfig,
}

impl TiberiusConnectionManager {
    fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    fn build_config(&self) -> Config {
        let mut config = Config::new();
        config.host(&self.config.host);
        config.port(self.config.port);
        config.database(&self.config.database);
        config.authentication(AuthMethod::sql_server(
            &self.config.user,
            &self.config.password,
        ));

        if self.config.encrypt {
            if self.config.trust_server_cert {
                config.trust_cert();
            }
            config.encryption(EncryptionLevel::Required);
        } else {
            config.encryption(EncryptionLevel::NotSupported);
        }

        config
    }
}

#[async_trait]
impl bb8::ManageConnection for TiberiusConnectionManager {
    type Connection = Client<Compat<TcpStream>>;
    type Error = tiberius::error::Error;

    async fn connect(&self) -> std::result::Result<Self::Connection, Self::Error> {
        let config = self.build_config();
        let tcp = TcpStream::connect(config.get_addr())
            .await
            .map_err(|e| tiberius::error::Error::Io {
                kind: e.kind(),
                message: e.to_string(),
            })?;

        tcp.set_nodelay(true).ok();

        Client::connect(config, tcp.compat_write()).await
    }

    async fn is_valid(&self, conn: &mut Self::Connection) -> std::result::Result<(), Self::Error> {
        conn.simple_query("SELECT 1").await?.into_row().await?;
        Ok(())
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}

/// SQL Server source with a small connection pool.
pub struct MssqlSource {
    pool: Pool<TiberiusConnectionManager>,
    schema: String,
}

impl MssqlSource {
    /// Connect to the source database.
    pub async fn connect(config: &SourceConfig) -> Result<Self> {
        let manager = TiberiusConnectionManager::new(config.clone());
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .min_idle(Some(1))
            .build(manager)
            .await
            .map_err(|e| MigrateError::pool(e.to_string(), "creating SQL Server pool"))?;

        // Probe the pool so a bad config fails here, not mid-run.
        {
            let mut conn = pool
                .get()
                .await
                .map_err(|e| MigrateError::pool(e.to_string(), "connecting to SQL Server"))?;
            conn.simple_query("SELECT 1").await?.into_row().await?;
        }

        info!(
            "Connected to SQL Server: {}:{}/{} (pool_size={})",
            config.host, config.port, config.database, config.max_connections
        );

        Ok(Self {
            pool,
            schema: config.schema.clone(),
        })
    }

    async fn client(&self) -> Result<PooledConnection<'_, TiberiusConnectionManager>> {
        self.pool
            .get()
            .await
            .map_err(|e| MigrateError::pool(e.to_string(), "getting source connection"))
    }

    /// Get the row count for a source table.
    pub async fn row_count(&self, table: &'static str) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT_BIG(*) FROM {}",
            qualify_table(&self.schema, table)
        );
        let mut client = self.client().await?;
        let row = client
            .simple_query(&sql)
            .await?
            .into_row()
            .await?
            .ok_or_else(|| MigrateError::malformed_row(table, "count query returned no row"))?;
        row.try_get::<i64, _>(0)?
            .ok_or_else(|| MigrateError::malformed_row(table, "count query returned NULL"))
    }

    /// Cheap connectivity probe.
    pub async fn ping(&self) -> Result<()> {
        let mut client = self.client().await?;
        client.simple_query("SELECT 1").await?.into_row().await?;
        Ok(())
    }
}

#[async_trait]
impl SourcePool for MssqlSource {
    async fn fetch_page<E>(&self, offset: u64, limit: u64) -> Result<Vec<E>>
    where
        E: SourceEntity,
    {
        let sql = page_query::<E>(&self.schema, offset, limit);
        debug!("{}: fetching page at offset {}", E::TABLE, offset);

        let mut client = self.client().await?;
        let rows = client
            .simple_query(&sql)
            .await
            .map_err(|e| MigrateError::source_read(E::TABLE, e))?
            .into_first_result()
            .await
            .map_err(|e| MigrateError::source_read(E::TABLE, e))?;

        rows.iter().map(E::from_row).collect()
    }
}

/// Build a deterministic OFFSET/FETCH page query for an entity.
fn page_query<E: SourceEntity>(schema: &str, offset: u64, limit: u64) -> String {
    let col_list = E::SELECT
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    let order_by = E::ORDER_BY
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "SELECT {} FROM {} ORDER BY {} OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
        col_list,
        qualify_table(schema, E::TABLE),
        order_by,
        offset,
        limit
    )
}

/// Quote a SQL Server identifier, escaping closing brackets.
fn quote_ident(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

/// Qualify a SQL Server table name with schema and proper quoting.
fn qualify_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}
