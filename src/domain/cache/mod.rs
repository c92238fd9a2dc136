//! Cache domain - key-value abstraction behind the hot-state tier

mod key;
mod repository;

pub use key::{namespaced_key, prefixed_key, session_key, SESSION_NAMESPACE};
pub use repository::Cache;

#[cfg(test)]
pub use repository::mock::MockCache;
