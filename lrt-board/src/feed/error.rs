//! Feed payload error types.

/// Errors that can occur when reading a raw feed payload.
///
/// These only cover the payload as a whole. Problems with individual
/// records are never errors; those records are skipped or degraded during
/// conversion.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Body is not valid JSON
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON, but not a record list we recognise
    #[error("unexpected payload shape: {0}")]
    UnexpectedShape(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FeedError::UnexpectedShape("expected an array or object");
        assert_eq!(
            err.to_string(),
            "unexpected payload shape: expected an array or object"
        );

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FeedError::from(json_err);
        assert!(err.to_string().starts_with("JSON parse error"));
    }
}
