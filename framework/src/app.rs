//! Application runner: CLI parsing, migrations and server startup
//!
//! # Example
//!
//! ```rust,ignore
//! use kit::Application;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), kit::FrameworkError> {
//!     Application::new()
//!         .routes(|db| routes::register(TodoStore::new(db), &TodoConfig::from_env()))
//!         .migrations::<migrations::Migrator>()
//!         .run()
//!         .await
//! }
//! ```

use crate::config::ServerConfig;
use crate::database::{DatabaseConfig, DbConnection};
use crate::error::FrameworkError;
use crate::middleware::{Middleware, MiddlewareRegistry};
use crate::{Router, Server};
use clap::{Parser, Subcommand};
use sea_orm_migration::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "todo-api")]
#[command(about = "Todo API server and database utilities")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the web server (default command)
    Serve {
        /// Skip running migrations on startup
        #[arg(long)]
        no_migrate: bool,
    },
    /// Run pending database migrations
    Migrate,
    /// Show migration status
    #[command(name = "migrate:status")]
    MigrateStatus,
    /// Rollback the last migration(s)
    #[command(name = "migrate:rollback")]
    MigrateRollback {
        /// Number of migrations to rollback
        #[arg(default_value = "1")]
        steps: u32,
    },
    /// Drop all tables and re-run all migrations
    #[command(name = "migrate:fresh")]
    MigrateFresh,
}

type RoutesFn = Box<dyn FnOnce(DbConnection) -> Router + Send>;

/// Application builder
pub struct Application<M = NoMigrator>
where
    M: MigratorTrait,
{
    database: DatabaseConfig,
    server: ServerConfig,
    routes_fn: Option<RoutesFn>,
    middleware: MiddlewareRegistry,
    _migrator: std::marker::PhantomData<M>,
}

/// Placeholder type for when no migrator is configured
pub struct NoMigrator;

impl MigratorTrait for NoMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![]
    }
}

impl Application<NoMigrator> {
    /// Create an application with database and server config read from the environment
    pub fn new() -> Self {
        Application {
            database: DatabaseConfig::from_env(),
            server: ServerConfig::from_env(),
            routes_fn: None,
            middleware: MiddlewareRegistry::new(),
            _migrator: std::marker::PhantomData,
        }
    }
}

impl Default for Application<NoMigrator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Application<M>
where
    M: MigratorTrait,
{
    pub fn database(mut self, config: DatabaseConfig) -> Self {
        self.database = config;
        self
    }

    pub fn server(mut self, config: ServerConfig) -> Self {
        self.server = config;
        self
    }

    /// Build the route table once the database is connected
    pub fn routes<F>(mut self, f: F) -> Self
    where
        F: FnOnce(DbConnection) -> Router + Send + 'static,
    {
        self.routes_fn = Some(Box::new(f));
        self
    }

    /// Add global middleware to the server
    pub fn middleware<W: Middleware + 'static>(mut self, middleware: W) -> Self {
        self.middleware = self.middleware.append(middleware);
        self
    }

    pub fn migrations<NewM>(self) -> Application<NewM>
    where
        NewM: MigratorTrait,
    {
        Application {
            database: self.database,
            server: self.server,
            routes_fn: self.routes_fn,
            middleware: self.middleware,
            _migrator: std::marker::PhantomData,
        }
    }

    /// Parse CLI arguments and execute the selected command
    pub async fn run(self) -> Result<(), FrameworkError> {
        let cli = Cli::parse();
        self.run_command(cli.command.unwrap_or(Commands::Serve { no_migrate: false }))
            .await
    }

    pub async fn run_command(self, command: Commands) -> Result<(), FrameworkError> {
        let db = DbConnection::connect(&self.database).await?;

        match command {
            Commands::Serve { no_migrate } => {
                if !no_migrate {
                    M::up(db.inner(), None).await?;
                    tracing::info!("migrations up to date");
                }
                self.serve(db).await
            }
            Commands::Migrate => {
                tracing::info!("running migrations");
                M::up(db.inner(), None).await?;
                tracing::info!("migrations completed");
                Ok(())
            }
            Commands::MigrateStatus => {
                M::status(db.inner()).await?;
                Ok(())
            }
            Commands::MigrateRollback { steps } => {
                tracing::info!(steps, "rolling back migrations");
                M::down(db.inner(), Some(steps)).await?;
                Ok(())
            }
            Commands::MigrateFresh => {
                tracing::warn!("dropping all tables and re-running migrations");
                M::fresh(db.inner()).await?;
                Ok(())
            }
        }
    }

    async fn serve(self, db: DbConnection) -> Result<(), FrameworkError> {
        let router = match self.routes_fn {
            Some(routes_fn) => routes_fn(db),
            None => Router::new(),
        };

        tracing::info!(address = %self.server.bind_address(), "starting server");
        Server::from_config(router, &self.server)
            .middleware_registry(self.middleware)
            .run()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_commands() {
        let cli = Cli::parse_from(["todo-api"]);
        assert_eq!(cli.command, None);

        let cli = Cli::parse_from(["todo-api", "serve", "--no-migrate"]);
        assert_eq!(cli.command, Some(Commands::Serve { no_migrate: true }));

        let cli = Cli::parse_from(["todo-api", "migrate:rollback", "3"]);
        assert_eq!(cli.command, Some(Commands::MigrateRollback { steps: 3 }));

        let cli = Cli::parse_from(["todo-api", "migrate:rollback"]);
        assert_eq!(cli.command, Some(Commands::MigrateRollback { steps: 1 }));
    }

    #[tokio::test]
    async fn test_migrate_without_migrations_succeeds() {
        let app = Application::new()
            .database(DatabaseConfig::builder().url("sqlite::memory:").build());
        app.run_command(Commands::Migrate).await.unwrap();
    }
}
