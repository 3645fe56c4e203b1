pub mod config;
pub mod controllers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod routes;
pub mod store;

pub use config::TodoConfig;
pub use store::{StoreError, TodoStore, UpdateMissing};
