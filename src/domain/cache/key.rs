//! Cache key conventions

/// Namespace used for per-session conversation state
pub const SESSION_NAMESPACE: &str = "session";

/// Builds a `<namespace>:<id>` key
pub fn namespaced_key(namespace: &str, id: &str) -> String {
    format!("{}:{}", namespace, id)
}

/// Key under which a session's last turn is stored
pub fn session_key(session_id: &str) -> String {
    namespaced_key(SESSION_NAMESPACE, session_id)
}

/// Applies a backend-level prefix, if one is configured
pub fn prefixed_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}{}", prefix, key)
    }
}
