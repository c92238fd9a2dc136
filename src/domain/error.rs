use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    #[error("Generation error: {message}")]
    Generation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn knowledge_base(message: impl Into<String>) -> Self {
        Self::KnowledgeBase(message.into())
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error() {
        let error = DomainError::cache("Connection refused");
        assert_eq!(error.to_string(), "Cache error: Connection refused");
    }

    #[test]
    fn test_provider_error() {
        let error = DomainError::provider("vertex", "HTTP 503");
        assert_eq!(error.to_string(), "Provider error: vertex - HTTP 503");
    }

    #[test]
    fn test_knowledge_base_error() {
        let error = DomainError::knowledge_base("index offline");
        assert_eq!(error.to_string(), "Knowledge base error: index offline");
    }
}
