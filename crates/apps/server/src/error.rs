use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

/// Failures surfaced by the HTTP API.
#[derive(Debug)]
pub enum ApiError {
    SessionNotFound(Uuid),
    BadRequest(String),
    Upstream(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SessionNotFound(id) => write!(f, "Session not found: {id}"),
            Self::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            Self::Upstream(msg) => write!(f, "Upstream service failed: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        }
        let message = match &self {
            Self::SessionNotFound(_) => "Session not found".to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Upstream(_) => "Upstream service failed".to_string(),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use uuid::Uuid;

    #[test]
    fn status_codes() {
        assert_eq!(
            ApiError::SessionNotFound(Uuid::nil()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Upstream("timeout".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
