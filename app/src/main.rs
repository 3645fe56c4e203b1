use kit::logging::{self, LogConfig};
use kit::{AppConfig, Application, Config, FrameworkError};
use std::path::Path;
use todo_api::middleware::LoggingMiddleware;
use todo_api::migrations::Migrator;
use todo_api::{routes, TodoConfig, TodoStore};

#[tokio::main]
async fn main() -> Result<(), FrameworkError> {
    Config::init(Path::new("."));
    let app = AppConfig::from_env();
    logging::init(&LogConfig::for_app(&app));

    tracing::info!(name = %app.name, environment = %app.environment, "starting");

    let todo = TodoConfig::from_env();
    if todo.api_tokens.is_empty() {
        tracing::warn!("API_TOKENS is empty; every /api/todo request will be rejected");
    }

    let result = Application::new()
        .middleware(LoggingMiddleware)
        .routes(move |db| routes::register(TodoStore::new(db), &todo))
        .migrations::<Migrator>()
        .run()
        .await;

    if let Err(e) = &result {
        tracing::error!(error = %e, "application exited with an error");
    }
    result
}
