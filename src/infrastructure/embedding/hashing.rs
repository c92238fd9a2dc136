//! Deterministic local embeddings based on feature hashing

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::DomainError;
use crate::domain::embedding::{EmbeddingProvider, l2_normalize};

/// Embeds text by hashing lowercase tokens into signed buckets
///
/// Texts sharing words end up close in cosine space, which is enough for
/// development setups and tests without a hosted model.
#[derive(Debug, Clone)]
pub struct HashingEmbeddingProvider {
    dimensions: usize,
}

impl HashingEmbeddingProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(str::to_lowercase)
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in Self::tokens(text) {
            let digest = Sha256::digest(token.as_bytes());
            let mut bucket_bytes = [0u8; 8];
            bucket_bytes.copy_from_slice(&digest[..8]);

            let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimensions as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        l2_normalize(&mut vector);
        Ok(vector)
    }

    fn provider_name(&self) -> &'static str {
        "hashing"
    }

    fn model(&self) -> &str {
        "feature-hashing"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::cosine_similarity;

    #[tokio::test]
    async fn test_fixed_length() {
        let provider = HashingEmbeddingProvider::new(768);

        assert_eq!(provider.embed("hello world").await.unwrap().len(), 768);
        assert_eq!(provider.embed("").await.unwrap().len(), 768);
    }

    #[tokio::test]
    async fn test_deterministic_and_case_insensitive() {
        let provider = HashingEmbeddingProvider::new(64);

        let first = provider.embed("Market Update").await.unwrap();
        let second = provider.embed("market update").await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_shared_words_are_closer() {
        let provider = HashingEmbeddingProvider::new(256);

        let query = provider.embed("solana staking rewards").await.unwrap();
        let related = provider.embed("staking rewards on solana are up").await.unwrap();
        let unrelated = provider.embed("weather forecast for tuesday").await.unwrap();

        assert!(cosine_similarity(&query, &related) > cosine_similarity(&query, &unrelated));
    }
}
