//! Infrastructure layer - External service implementations

pub mod cache;
pub mod embedding;
pub mod generation;
pub mod http_client;
pub mod keep_alive;
pub mod knowledge;
pub mod logging;
pub mod observability;
pub mod retry;
pub mod services;
