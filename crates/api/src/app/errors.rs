use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use kitshelf_infra::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        ServiceError::Parse(msg) => json_error(StatusCode::BAD_REQUEST, "parse_error", msg),
        ServiceError::NotFound(id) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("product {id} not found"))
        }
        ServiceError::MalformedStore(msg) => {
            tracing::error!(reason = %msg, "stored availability is corrupt");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "malformed_store", msg)
        }
        ServiceError::CreateFailed(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "create_failed", msg)
        }
        ServiceError::ReadFailed(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "read_failed", msg),
        // Zero affected rows is the client's fault (missing id or empty body).
        ServiceError::UpdateFailed(msg) => json_error(StatusCode::BAD_REQUEST, "update_failed", msg),
        ServiceError::DeleteFailed(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "delete_failed", msg)
        }
        ServiceError::WriteFailed(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "write_failed", msg),
    }
}

/// Malformed or non-JSON request bodies.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitshelf_core::ProductId;

    fn status_of(err: ServiceError) -> StatusCode {
        service_error_to_response(err).status()
    }

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(status_of(ServiceError::Validation("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ServiceError::Parse("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ServiceError::UpdateFailed("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ServiceError::NotFound(ProductId::new(1))), StatusCode::NOT_FOUND);
    }

    #[test]
    fn backend_errors_map_to_500() {
        for err in [
            ServiceError::MalformedStore("x".into()),
            ServiceError::CreateFailed("x".into()),
            ServiceError::ReadFailed("x".into()),
            ServiceError::DeleteFailed("x".into()),
            ServiceError::WriteFailed("x".into()),
        ] {
            assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
