use kit::Router;

use crate::config::TodoConfig;
use crate::controllers::todo;
use crate::middleware::AuthMiddleware;
use crate::store::TodoStore;

/// Build the route table for the to-do API
///
/// Every route sits behind bearer authentication. The store is registered
/// as router state and reaches handlers through `req.state::<TodoStore>()`.
pub fn register(store: TodoStore, config: &TodoConfig) -> Router {
    Router::new()
        .group("/api/todo", |r| {
            r.get("", todo::index)
                .name("todo.index")
                .post("", todo::store)
                .name("todo.store")
                .get("/{id}", todo::show)
                .name("todo.show")
                .put("/{id}", todo::update)
                .name("todo.update")
                .delete("/{id}", todo::destroy)
                .name("todo.destroy")
        })
        .middleware(AuthMiddleware::new(config.api_tokens.iter().cloned()))
        .into_router()
        .with_state(store.with_update_missing(config.update_missing()))
}
