use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/:pid", get(check_availability).put(add_availability))
        .route("/:pid/intervals", get(list_availabilities))
}

/// Whether the product is available right now.
pub async fn check_availability(
    Extension(services): Extension<Arc<AppServices>>,
    Path(pid): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_product_id(&pid) {
        Ok(v) => v,
        Err(e) => return errors::service_error_to_response(e),
    };

    match services.products.check_availability(id, Utc::now()).await {
        Ok(available) => Json(dto::AvailabilityCheckResponse { id, available }).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Append a window; responds with every window after the write.
pub async fn add_availability(
    Extension(services): Extension<Arc<AppServices>>,
    Path(pid): Path<String>,
    body: Result<Json<dto::AddAvailabilityRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_product_id(&pid) {
        Ok(v) => v,
        Err(e) => return errors::service_error_to_response(e),
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let (start, end) = body.into_raw_window();

    match services
        .products
        .add_availability_raw(id, start.as_deref(), end.as_deref())
        .await
    {
        Ok(projected) => Json(projected).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_availabilities(
    Extension(services): Extension<Arc<AppServices>>,
    Path(pid): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_product_id(&pid) {
        Ok(v) => v,
        Err(e) => return errors::service_error_to_response(e),
    };

    match services.products.get_availabilities(id).await {
        Ok(projected) => Json(projected).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
