//! Error types.
//!
//! Only `WishError` crosses the engine boundary. `StoreError` is recovered
//! inside the ledger and settings (logged, then ignored) and `ConfigError`
//! only shows up when the host builds a config from JSON.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WishError {
    #[error("roster is empty, there is nobody to draw")]
    InvalidRoster,
}

/// Which store operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Get,
    Set,
    Delete,
}

impl std::fmt::Display for StoreOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StoreOp::Get => "get",
            StoreOp::Set => "set",
            StoreOp::Delete => "delete",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store {op} failed for key {key}: {reason}")]
    Backend {
        op: StoreOp,
        key: String,
        reason: String,
    },
    #[error(transparent)]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    pub fn backend(op: StoreOp, key: &str, reason: impl Into<String>) -> Self {
        StoreError::Backend {
            op,
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid wish config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_message() {
        let err = StoreError::backend(StoreOp::Set, "historyList", "quota exceeded");
        assert_eq!(
            err.to_string(),
            "store set failed for key historyList: quota exceeded"
        );
    }

    #[test]
    fn test_config_error_wraps_json() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ConfigError::from(json_err);
        assert!(err.to_string().starts_with("invalid wish config:"));
    }
}
