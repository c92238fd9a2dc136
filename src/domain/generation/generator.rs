//! Response generator trait

use async_trait::async_trait;

use super::GenerationContext;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Produces the reply for one orchestration turn
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Generates a response for the given turn
    async fn generate(&self, context: &GenerationContext) -> Result<String, DomainError>;

    /// Generator name used in logs
    fn name(&self) -> &'static str;
}
