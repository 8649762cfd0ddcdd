//! Mapping of HTTP failures into the client error taxonomy.

use reqwest::StatusCode;

use cipherdrive_core::error::{AppError, ErrorKind};

/// Turn a non-success response into an [`AppError`].
///
/// The server reports failures as `{"detail": "..."}`; the detail is used as
/// the message when present, otherwise the raw body or the status text.
pub fn error_from_status(status: StatusCode, body: &str, action: &str) -> AppError {
    let detail = extract_detail(body).unwrap_or_else(|| {
        if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string()
        } else {
            body.trim().to_string()
        }
    });

    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorKind::Authentication,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
        StatusCode::CONFLICT => ErrorKind::Conflict,
        _ => ErrorKind::Server,
    };

    AppError::new(kind, format!("{action} failed ({}): {detail}", status.as_u16()))
}

/// Map a `reqwest` error raised before a status was received.
pub fn error_from_transport(err: reqwest::Error, action: &str) -> AppError {
    let kind = if err.is_decode() {
        ErrorKind::Serialization
    } else {
        ErrorKind::Transport
    };
    AppError::with_source(kind, format!("{action} failed: {err}"), err)
}

fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_uses_detail() {
        let err = error_from_status(
            StatusCode::NOT_FOUND,
            r#"{"detail":"Folder not found"}"#,
            "Move item",
        );
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Move item failed (404): Folder not found");
    }

    #[test]
    fn test_auth_statuses() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = error_from_status(status, "", "List items");
            assert_eq!(err.kind, ErrorKind::Authentication);
        }
    }

    #[test]
    fn test_plain_body_kept() {
        let err = error_from_status(StatusCode::BAD_REQUEST, "Invalid key format", "Decrypt");
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.ends_with("Invalid key format"));
    }

    #[test]
    fn test_server_error_empty_body() {
        let err = error_from_status(StatusCode::INTERNAL_SERVER_ERROR, "", "Upload");
        assert_eq!(err.kind, ErrorKind::Server);
        assert!(err.message.contains("Internal Server Error"));
    }

    #[test]
    fn test_structured_detail() {
        let err = error_from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","email"],"msg":"field required"}]}"#,
            "Share",
        );
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("field required"));
    }
}
