use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde_json::Value;

use catalog_core::ProductId;

use crate::app::SharedClient;
use crate::envelope::{BackendProductInput, Envelope, ProductPayload, ProductView};
use crate::error::GatewayError;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/restore", patch(restore_product))
}

/// An id that cannot parse cannot exist; answered locally the way the backend would.
fn parse_id(raw: &str) -> Result<ProductId, GatewayError> {
    raw.parse::<ProductId>()
        .map_err(|_| GatewayError::not_found("product not found"))
}

fn parse_body(body: Result<Json<ProductPayload>, JsonRejection>) -> Result<BackendProductInput, GatewayError> {
    match body {
        Ok(Json(payload)) => payload.into_backend(),
        Err(rejection) => Err(GatewayError::validation(rejection.body_text())),
    }
}

/// Backend `{message}` for delete/restore, or a fallback.
fn backend_message(payload: &Value, fallback: &str) -> String {
    payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

pub async fn list_products(Extension(client): Extension<SharedClient>) -> Result<Response, GatewayError> {
    let products = ProductView::list_from_backend(client.list().await?)?;
    Ok((StatusCode::OK, Json(Envelope::data(products))).into_response())
}

pub async fn get_product(
    Extension(client): Extension<SharedClient>,
    Path(id): Path<String>,
) -> Result<Response, GatewayError> {
    let id = parse_id(&id)?;
    match client.get(id).await? {
        Some(payload) => {
            let product = ProductView::from_backend(payload)?;
            Ok((StatusCode::OK, Json(Envelope::data(product))).into_response())
        }
        None => Err(GatewayError::not_found("product not found")),
    }
}

pub async fn create_product(
    Extension(client): Extension<SharedClient>,
    body: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let input = parse_body(body)?;
    let product = ProductView::from_backend(client.create(&input).await?)?;
    tracing::info!(product_id = product.id, sku = %product.sku, "product created via gateway");
    Ok((StatusCode::CREATED, Json(Envelope::data(product))).into_response())
}

pub async fn update_product(
    Extension(client): Extension<SharedClient>,
    Path(id): Path<String>,
    body: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let id = parse_id(&id)?;
    let input = parse_body(body)?;
    let product = ProductView::from_backend(client.update(id, &input).await?)?;
    Ok((StatusCode::OK, Json(Envelope::data(product))).into_response())
}

pub async fn delete_product(
    Extension(client): Extension<SharedClient>,
    Path(id): Path<String>,
) -> Result<Response, GatewayError> {
    let id = parse_id(&id)?;
    let payload = client.delete(id).await?;
    let message = backend_message(&payload, "product deleted");
    Ok((StatusCode::OK, Json(Envelope::<()>::message(message))).into_response())
}

pub async fn restore_product(
    Extension(client): Extension<SharedClient>,
    Path(id): Path<String>,
) -> Result<Response, GatewayError> {
    let id = parse_id(&id)?;
    let payload = client.restore(id).await?;
    let message = backend_message(&payload, "product restored");
    Ok((StatusCode::OK, Json(Envelope::<()>::message(message))).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::config::GatewayConfig;

    /// Gateway pointed at a port nothing listens on: any request that reached
    /// the network would come back 503.
    fn offline_app() -> Router {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let config = GatewayConfig {
            catalog_api_url: format!("http://{addr}/api"),
            ..GatewayConfig::default()
        };
        crate::app::build_app(&config).unwrap()
    }

    async fn send(req: Request<Body>) -> (StatusCode, Value) {
        let res = offline_app().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unparsable_id_is_not_found_locally() {
        for (method, uri) in [
            ("GET", "/api/products/abc"),
            ("DELETE", "/api/products/-1"),
            ("PATCH", "/api/products/x1/restore"),
        ] {
            let req = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let (status, body) = send(req).await;
            // An offline backend would have produced 503.
            assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], "product not found");
        }
    }

    #[tokio::test]
    async fn missing_country_code_is_rejected_locally() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/products")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"Widget"}"#))
            .unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "the countryCode field is required");
    }

    #[tokio::test]
    async fn malformed_json_is_rejected_locally() {
        let req = Request::builder()
            .method("PUT")
            .uri("/api/products/1")
            .header("content-type", "application/json")
            .body(Body::from("{nope"))
            .unwrap();
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_does_not_touch_backend() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn offline_backend_is_unavailable() {
        let req = Request::builder()
            .uri("/api/products")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["details"]["status"], "unavailable");
    }
}
