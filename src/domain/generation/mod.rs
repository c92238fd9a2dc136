//! Response generation domain - the seam to whatever produces agent replies

mod context;
mod generator;

pub use context::GenerationContext;
pub use generator::ResponseGenerator;

#[cfg(test)]
pub use generator::MockResponseGenerator;
