//! Fail-soft return values for best-effort collaborators

/// Outcome of a best-effort operation.
///
/// Collaborators that must never become a hard dependency of the request path
/// (hot-state cache, knowledge store) report failures through this type
/// instead of returning errors. The failure reason has already been logged by
/// the time a caller sees `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum FailSoft<T> {
    /// The operation produced a value
    Value(T),
    /// The operation completed but there was nothing to return
    Absent,
    /// The backend failed
    Failed(String),
}

impl<T> FailSoft<T> {
    /// Wraps an optional value (`None` becomes `Absent`)
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Value(value),
            None => Self::Absent,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns the failure reason, if any
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Discards the distinction between `Absent` and `Failed`
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent | Self::Failed(_) => None,
        }
    }

    pub fn as_ref(&self) -> FailSoft<&T> {
        match self {
            Self::Value(value) => FailSoft::Value(value),
            Self::Absent => FailSoft::Absent,
            Self::Failed(reason) => FailSoft::Failed(reason.clone()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FailSoft<U> {
        match self {
            Self::Value(value) => FailSoft::Value(f(value)),
            Self::Absent => FailSoft::Absent,
            Self::Failed(reason) => FailSoft::Failed(reason),
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.value().unwrap_or(default)
    }
}

impl<T: Default> FailSoft<T> {
    pub fn unwrap_or_default(self) -> T {
        self.value().unwrap_or_default()
    }
}

impl FailSoft<()> {
    /// Whether a write-style operation went through
    pub fn succeeded(&self) -> bool {
        self.is_value()
    }
}
