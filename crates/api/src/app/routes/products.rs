use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};

use crate::app::dto::{self, ProductRequest};
use crate::app::errors;
use crate::app::SharedCatalog;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/restore", patch(restore_product))
}

/// Every product, tombstoned ones included.
pub async fn list_products(Extension(catalog): Extension<SharedCatalog>) -> axum::response::Response {
    match catalog.list().await {
        Ok(items) => {
            let items = items.iter().map(dto::product_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::Value::Array(items))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(catalog): Extension<SharedCatalog>,
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let input = match dto::body_to_input(body) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match catalog.create(input).await {
        Ok(product) => (StatusCode::CREATED, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(catalog): Extension<SharedCatalog>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match catalog.get(id).await {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(catalog): Extension<SharedCatalog>,
    Path(id): Path<String>,
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let input = match dto::body_to_input(body) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match catalog.update(id, input).await {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(catalog): Extension<SharedCatalog>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match catalog.delete(id).await {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "product deleted successfully" })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn restore_product(
    Extension(catalog): Extension<SharedCatalog>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_id(&id) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match catalog.restore(id).await {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "product restored" })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
