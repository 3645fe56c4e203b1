//! Database connection management

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::database::config::DatabaseConfig;
use crate::error::FrameworkError;

/// Effectively unbounded, while staying clear of `Instant` overflow in the pool
const IN_MEMORY_LIFETIME: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Clonable, thread-safe handle to a SeaORM connection pool
///
/// Constructed once at startup and handed to whatever needs the database;
/// there is no global connection.
///
/// # Example
///
/// ```rust,ignore
/// let conn = DbConnection::connect(&DatabaseConfig::from_env()).await?;
/// let items = todo_item::Entity::find().all(conn.inner()).await?;
/// ```
#[derive(Clone)]
pub struct DbConnection {
    inner: Arc<DatabaseConnection>,
}

impl DbConnection {
    /// Open a connection pool from config
    ///
    /// File-backed SQLite databases get their parent directory and file
    /// created on first use. In-memory SQLite is pinned to a single pooled
    /// connection, since every new connection would see an empty database.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, FrameworkError> {
        let url = prepare_sqlite_url(&config.url)?;
        let opt = connect_options(config, url);
        let max = opt.get_max_connections();

        let conn = Database::connect(opt).await?;
        tracing::info!(
            backend = ?config.database_type(),
            max_connections = ?max,
            "database connected"
        );

        Ok(Self {
            inner: Arc::new(conn),
        })
    }

    pub fn inner(&self) -> &DatabaseConnection {
        &self.inner
    }
}

/// Pool settings for `url`
///
/// An in-memory SQLite database lives only as long as its connection, so the
/// pool holds exactly one and never retires it for age or idleness.
fn connect_options(config: &DatabaseConfig, url: String) -> ConnectOptions {
    let mut opt = ConnectOptions::new(url);
    opt.connect_timeout(Duration::from_secs(config.connect_timeout))
        .sqlx_logging(config.logging);

    if config.is_sqlite_memory() {
        opt.max_connections(1)
            .min_connections(1)
            .max_lifetime(IN_MEMORY_LIFETIME)
            .idle_timeout(IN_MEMORY_LIFETIME);
    } else {
        opt.max_connections(config.max_connections)
            .min_connections(config.min_connections);
    }
    opt
}

/// Rewrite `sqlite://path` into the `sqlite:path?mode=rwc` form, creating the file
fn prepare_sqlite_url(url: &str) -> Result<String, FrameworkError> {
    let Some(path) = url.strip_prefix("sqlite://") else {
        return Ok(url.to_string());
    };
    let path = path.trim_start_matches("./");
    if path.starts_with(":memory:") {
        return Ok(format!("sqlite:{}", path));
    }
    let path = path.split('?').next().unwrap_or(path);

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                FrameworkError::database(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
    }

    Ok(format!("sqlite:{}?mode=rwc", path))
}

impl std::ops::Deref for DbConnection {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_sqlite_urls_pass_through() {
        let url = "postgres://u:p@localhost/todo";
        assert_eq!(prepare_sqlite_url(url).unwrap(), url);
        assert_eq!(prepare_sqlite_url("sqlite::memory:").unwrap(), "sqlite::memory:");
    }

    #[test]
    fn test_sqlite_memory_url_is_rewritten() {
        assert_eq!(
            prepare_sqlite_url("sqlite://:memory:").unwrap(),
            "sqlite::memory:"
        );
    }

    #[test]
    fn test_sqlite_file_url_gets_create_mode() {
        assert_eq!(prepare_sqlite_url("sqlite://todo.db").unwrap(), "sqlite:todo.db?mode=rwc");
    }

    #[test]
    fn test_in_memory_pool_keeps_its_connection() {
        let config = DatabaseConfig::builder()
            .url("sqlite::memory:")
            .max_connections(5)
            .build();
        let opt = connect_options(&config, config.url.clone());

        assert_eq!(opt.get_max_connections(), Some(1));
        assert_eq!(opt.get_min_connections(), Some(1));
        assert_eq!(opt.get_max_lifetime(), Some(IN_MEMORY_LIFETIME));
        assert_eq!(opt.get_idle_timeout(), Some(IN_MEMORY_LIFETIME));
    }

    #[test]
    fn test_file_pool_uses_configured_limits() {
        let config = DatabaseConfig::builder()
            .url("postgres://u:p@localhost/todo")
            .max_connections(7)
            .build();
        let opt = connect_options(&config, config.url.clone());

        assert_eq!(opt.get_max_connections(), Some(7));
        assert_eq!(opt.get_max_lifetime(), None);
        assert_eq!(opt.get_idle_timeout(), None);
    }

    #[tokio::test]
    async fn test_connect_in_memory() {
        let config = DatabaseConfig::builder()
            .url("sqlite::memory:")
            .max_connections(5)
            .build();
        let conn = DbConnection::connect(&config).await.unwrap();
        conn.ping().await.unwrap();
    }
}
