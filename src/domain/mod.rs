//! Domain layer - core types and the traits implemented by infrastructure

pub mod cache;
pub mod embedding;
pub mod error;
pub mod fail_soft;
pub mod generation;
pub mod knowledge;
pub mod session;

pub use error::DomainError;
pub use fail_soft::FailSoft;
pub use session::Session;
