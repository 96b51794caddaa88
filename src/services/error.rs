use thiserror::Error;

/// API failure taxonomy. Every variant carries a user-presentable message.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Server(String),
    #[error("{0}")]
    Network(String),
}

impl ApiError {
    pub fn message(&self) -> &str {
        match self {
            ApiError::Auth(m)
            | ApiError::NotFound(m)
            | ApiError::Server(m)
            | ApiError::Network(m) => m,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

/// Map a non-2xx response to an error variant. A blank or missing server
/// message falls back to the operation-specific one.
pub fn classify_status(status: u16, body_message: Option<String>, fallback: &str) -> ApiError {
    let message = body_message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    match status {
        401 | 403 => ApiError::Auth(message),
        404 => ApiError::NotFound(message),
        _ => ApiError::Server(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_variants() {
        assert_eq!(
            classify_status(401, None, "fallback"),
            ApiError::Auth("fallback".to_string())
        );
        assert_eq!(
            classify_status(403, None, "fallback"),
            ApiError::Auth("fallback".to_string())
        );
        assert_eq!(
            classify_status(404, None, "fallback"),
            ApiError::NotFound("fallback".to_string())
        );
        assert_eq!(
            classify_status(500, None, "fallback"),
            ApiError::Server("fallback".to_string())
        );
    }

    #[test]
    fn server_message_wins_over_fallback() {
        let err = classify_status(404, Some("Product not found".to_string()), "fallback");
        assert_eq!(err.message(), "Product not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn blank_server_message_uses_fallback() {
        let err = classify_status(500, Some("   ".to_string()), "Failed to load products");
        assert_eq!(err.message(), "Failed to load products");
    }
}
