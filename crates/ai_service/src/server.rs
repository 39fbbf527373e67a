use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::errors::ServiceError;
use crate::service::{BackendInfo, PredictRequest, ServiceContext};

type SharedContext = Arc<ServiceContext>;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predicted_disease_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct PredictionFailureResponse {
    predicted_disease_name: Option<String>,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    #[serde(flatten)]
    backend: Option<BackendInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            ServiceError::InvalidRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse { error: message }),
            )
                .into_response(),
            err @ ServiceError::Prediction(_) => {
                let payload = Json(PredictionFailureResponse {
                    predicted_disease_name: None,
                    message: err.to_string(),
                });
                (StatusCode::INTERNAL_SERVER_ERROR, payload).into_response()
            }
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: other.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

pub async fn start_server(context: ServiceContext, addr: &str) -> Result<()> {
    let app = build_router(Arc::new(context));
    let listener = bind_listener(addr).await?;
    info!("AI prediction service listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Prediction server terminated unexpectedly")
}

async fn bind_listener(addr: &str) -> Result<tokio::net::TcpListener> {
    if let Ok(socket_addr) = addr.parse::<SocketAddr>() {
        tokio::net::TcpListener::bind(socket_addr)
            .await
            .with_context(|| format!("failed to bind listener on {socket_addr}"))
    } else {
        tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind listener on {addr}"))
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(err) => error!("Unable to listen for shutdown signal: {}", err),
    }
}

pub fn build_router(context: SharedContext) -> Router {
    Router::new()
        .route("/", get(handle_home))
        .route("/health", get(handle_health))
        .route("/predict", post(handle_predict))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}

async fn handle_home(State(context): State<SharedContext>) -> &'static str {
    if context.is_ready() {
        "AI Prediction Service is running and ML model is loaded!"
    } else {
        "AI Prediction Service is running but ML model is NOT loaded (check server logs)."
    }
}

async fn handle_health(State(context): State<SharedContext>) -> (StatusCode, Json<HealthResponse>) {
    let version = crate::VERSION;
    match context.as_ref() {
        ServiceContext::Ready(backend) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                version,
                backend: Some(backend.info()),
                reason: None,
            }),
        ),
        ServiceContext::NotReady { reason } => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "not_ready",
                version,
                backend: None,
                reason: Some(reason.clone()),
            }),
        ),
    }
}

async fn handle_predict(
    State(context): State<SharedContext>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ServiceError> {
    let backend = context.backend()?;

    let Json(request) = payload.map_err(|rejection| match rejection {
        JsonRejection::JsonDataError(_) => ServiceError::InvalidRequest(
            "Invalid input. 'symptom_ids' (non-empty array of integers) are required.".to_string(),
        ),
        _ => ServiceError::InvalidRequest("No JSON data provided".to_string()),
    })?;

    match backend.predict(&request) {
        Ok(predicted_disease_name) => Ok(Json(PredictResponse {
            predicted_disease_name,
        })),
        Err(err @ ServiceError::Prediction(_)) => {
            error!("{}", err);
            Err(err)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleTable;
    use crate::service::RuleBackend;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn rules_router() -> Router {
        let backend = Arc::new(RuleBackend::new(RuleTable::builtin()));
        build_router(Arc::new(ServiceContext::Ready(backend)))
    }

    fn not_ready_router() -> Router {
        build_router(Arc::new(ServiceContext::NotReady {
            reason: "model.json missing".to_string(),
        }))
    }

    async fn post_json(router: Router, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_rule_prediction() {
        let (status, body) =
            post_json(rules_router(), r#"{"plant_id": 1, "symptom_ids": [2, 1]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["predicted_disease_name"], "Early Blight");
    }

    #[tokio::test]
    async fn test_unlisted_combination_is_null() {
        let (status, body) =
            post_json(rules_router(), r#"{"plant_id": 1, "symptom_ids": [11]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["predicted_disease_name"].is_null());
    }

    #[tokio::test]
    async fn test_not_ready_rejects_every_request() {
        let (status, body) = post_json(not_ready_router(), r#"{"symptom_ids": [1]}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("AI service is not ready"));
    }

    #[tokio::test]
    async fn test_wrong_type_is_bad_request() {
        let (status, body) =
            post_json(rules_router(), r#"{"plant_id": 1, "symptom_ids": "1,2"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("symptom_ids"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (status, body) = post_json(rules_router(), "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No JSON data provided");
    }

    #[tokio::test]
    async fn test_health_reports_state() {
        let response = not_ready_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = rules_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["mode"], "rules");
    }
}
