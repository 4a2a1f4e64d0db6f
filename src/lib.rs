// src/lib.rs

pub mod config;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod store;
pub mod utils;

// Re-exported for the binary and integration tests
pub use routes::create_router;
