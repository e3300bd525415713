use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::instrument;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub app: String,
    pub version: String,
    pub environment: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct HelloResponse {
    pub message: &'static str,
}

pub fn info_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/hello", get(hello))
}

pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let app = &state.config.app;
    Json(RootResponse {
        message: format!("Welcome to {}!", app.name),
        app: app.name.clone(),
        version: app.version.clone(),
        environment: app.environment.clone(),
    })
}

/// Always 200; a failed database probe downgrades the status to "degraded".
#[instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, database) = if state.users.database_reachable().await {
        ("healthy", "connected")
    } else {
        ("degraded", "disconnected")
    };
    Json(HealthResponse {
        status,
        database,
        timestamp: OffsetDateTime::now_utc(),
    })
}

pub async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello World",
    })
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{app::build_app, state::AppState};

    async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
        let res = build_app(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn root_reports_app_metadata() {
        let (status, body) = get_json(AppState::fake(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["app"], "test-app");
        assert_eq!(body["version"], "9.9.9");
        assert_eq!(body["environment"], "test");
    }

    #[tokio::test]
    async fn hello_greets() {
        let (status, body) = get_json(AppState::fake(), "/hello").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Hello World");
    }

    #[tokio::test]
    async fn health_reflects_database_state() {
        let (status, body) = get_json(AppState::fake(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
        assert!(body["timestamp"].is_string());

        let (status, body) = get_json(AppState::fake_offline(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["database"], "disconnected");
    }
}
