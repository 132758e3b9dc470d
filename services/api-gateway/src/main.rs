use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, Method},
    routing::get,
    serve, Router,
};
use partbin_database::ComponentRepository;
use partbin_utils::{init_logging, AppConfig};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

mod handlers;
mod middleware;
mod routes;

use middleware::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_logging(&config.logging)?;
    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load configuration, using defaults");
    }
    info!("Starting PartBin API Gateway");

    let app = create_app(AppState::new(config.clone()));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = TcpListener::bind(&addr).await?;
    info!("API Gateway listening on {}", addr);

    serve(listener, app).await?;

    Ok(())
}

fn create_app(state: AppState) -> Router {
    let max_request_size = state.config.server.max_request_size;

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::create_api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                        .allow_headers([
                            header::CONTENT_TYPE,
                            HeaderName::from_static(middleware::request_id::REQUEST_ID_HEADER),
                        ]),
                )
                .layer(DefaultBodyLimit::max(max_request_size))
                .layer(axum::middleware::from_fn(request_id_middleware)),
        )
        .with_state(state)
}

#[derive(Clone)]
pub struct AppState {
    pub components: ComponentRepository,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            components: ComponentRepository::new(),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const BOUNDARY: &str = "partbin-test-boundary";

    const INVENTORY_CSV: &str = "ID,Name,Description,Category,Quantity,Location,Min Stock Level\n\
        r-1,Resistor 10k,10kΩ ±5% 1/4W,Resistors,100,A1,10\n\
        c-1,Capacitor 100nF,100nF 50V,Capacitors,4,A2,10\n";

    fn app() -> Router {
        create_app(AppState::new(AppConfig::default()))
    }

    fn upload(file_name: &str, content: &str) -> Request<Body> {
        upload_as(file_name, "application/octet-stream", content)
    }

    fn upload_as(file_name: &str, content_type: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
             Content-Type: {t}\r\n\r\n{c}\r\n--{b}--\r\n",
            b = BOUNDARY,
            f = file_name,
            t = content_type,
            c = content
        );
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/import")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app().oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(body_json(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_import_populates_store() {
        let app = app();

        let response = app.clone().oneshot(upload("inventory.csv", INVENTORY_CSV)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let report = body_json(response).await;
        assert_eq!(report["dialect"], "native_export");
        assert_eq!(report["created"], 2);
        assert_eq!(report["updated"], 0);

        let response = app
            .clone()
            .oneshot(get_request("/api/v1/components?category=Resistors"))
            .await
            .unwrap();
        let resistors = body_json(response).await;
        assert_eq!(resistors.as_array().unwrap().len(), 1);
        assert_eq!(resistors[0]["specifications"]["resistance"], "10kΩ");

        let response = app
            .clone()
            .oneshot(get_request("/api/v1/components/alerts/low-stock"))
            .await
            .unwrap();
        let low = body_json(response).await;
        assert_eq!(low[0]["name"], "Capacitor 100nF");

        let response = app.oneshot(get_request("/api/v1/stats")).await.unwrap();
        let stats = body_json(response).await;
        assert_eq!(stats["totalComponents"], 2);
        assert_eq!(stats["totalQuantity"], 104);
        assert_eq!(stats["lowStock"], 1);
    }

    #[tokio::test]
    async fn test_import_without_records_is_unprocessable() {
        let response = app()
            .oneshot(upload("empty.csv", "ID,Name,Category,Description,Quantity\n\n,,,,\n"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error = body_json(response).await;
        assert_eq!(error["code"], "IMPORT_FORMAT_ERROR");
        assert_eq!(error["message"], "no valid records");
    }

    #[tokio::test]
    async fn test_import_rejects_disallowed_extension() {
        let response = app().oneshot(upload("order.pdf", "%PDF-1.4")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_component_lifecycle() {
        let app = app();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/components",
                json!({ "name": "NE555", "category": "Integrated Circuits", "quantity": 20 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["minStockLevel"], 10);
        let uri = format!("/api/v1/components/{}", created["id"].as_str().unwrap());

        let response = app
            .clone()
            .oneshot(json_request(Method::PATCH, &uri, json!({ "quantity": 2 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["quantity"], 2);

        let response = app
            .clone()
            .oneshot(get_request("/api/v1/components?search=ne5&category=All%20Categories"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

        let delete = Request::builder()
            .method(Method::DELETE)
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(delete).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.oneshot(get_request(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_component_id() {
        let response = app()
            .oneshot(get_request("/api/v1/components/not-a-uuid"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_content_type_names_format_of_unknown_extension() {
        let app = app();

        let response = app
            .clone()
            .oneshot(upload_as("inventory.txt", "text/csv", INVENTORY_CSV))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["created"], 2);

        let response = app
            .oneshot(upload_as("inventory.txt", "text/plain", INVENTORY_CSV))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_backup_import() {
        let backup = r#"{"components": [
            {"name": "NE555", "category": "Integrated Circuits", "quantity": 12, "location": "A3"},
            {"name": "BC547", "category": "Transistors", "quantity": 40}
        ]}"#;

        let response = app()
            .oneshot(upload_as("partbin-backup.json", "application/json", backup))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let report = body_json(response).await;
        assert_eq!(report["dialect"], "backup");
        assert_eq!(report["created"], 2);
    }

    #[tokio::test]
    async fn test_merge_duplicates_and_clear() {
        let app = app();
        for quantity in [3, 7] {
            let response = app
                .clone()
                .oneshot(json_request(
                    Method::POST,
                    "/api/v1/components",
                    json!({ "name": "C1525", "category": "Capacitors", "quantity": quantity }),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/v1/components/merge-duplicates", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let outcome = body_json(response).await;
        assert_eq!(outcome["groupsMerged"], 1);
        assert_eq!(outcome["removed"], 1);

        let response = app.clone().oneshot(get_request("/api/v1/components")).await.unwrap();
        let components = body_json(response).await;
        assert_eq!(components.as_array().unwrap().len(), 1);
        assert_eq!(components[0]["quantity"], 10);

        let clear = Request::builder()
            .method(Method::DELETE)
            .uri("/api/v1/components")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(clear).await.unwrap();
        assert_eq!(body_json(response).await["removed"], 1);

        let response = app.oneshot(get_request("/api/v1/stats")).await.unwrap();
        assert_eq!(body_json(response).await["totalComponents"], 0);
    }
}
