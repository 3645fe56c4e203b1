//! SeaORM-backed database access
//!
//! ```rust,ignore
//! use kit::database::{DatabaseConfig, DbConnection};
//!
//! let conn = DbConnection::connect(&DatabaseConfig::from_env()).await?;
//! ```

pub mod config;
pub mod connection;

pub use config::{DatabaseConfig, DatabaseConfigBuilder, DatabaseType};
pub use connection::DbConnection;

pub use sea_orm;
