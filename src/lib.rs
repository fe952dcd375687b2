// src/lib.rs
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod polls;
pub mod routes;
pub mod store;
pub mod templates;

pub use routes::{create_routes, AppState};
