//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod admin;
mod analytics;
mod conversations;
mod earnings;
mod messages;
mod notifications;
mod proposals;

use crate::auth::auth_middleware;
use crate::config::Settings;
use crate::state::SharedState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Bodies on the compute endpoint carry whole record lists
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState, settings: &Settings) -> Router {
    let cors = build_cors_layer(settings);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let middleware_stack = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    // Everything under /api requires a verified bearer token
    let api = Router::new()
        // Analytics
        .route("/analytics/compute", post(analytics::compute_report))
        .route("/analytics/dashboard", get(analytics::dashboard))
        // Proposals
        .route("/proposals", get(proposals::list_proposals))
        .route("/proposals/generate", post(proposals::generate_proposal))
        .route("/proposals/{id}", patch(proposals::update_proposal))
        // Earnings
        .route(
            "/earnings",
            get(earnings::list_earnings).post(earnings::create_earning),
        )
        .route("/earnings/{id}/status", patch(earnings::update_earning_status))
        // Messaging
        .route("/conversations", get(conversations::list_conversations))
        .route("/messages", post(messages::send_message))
        .route("/messages/{partner_id}", get(messages::get_thread))
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/read", post(notifications::mark_all_read))
        // Admin
        .route("/admin/stats", get(admin::platform_stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware_stack)
        .with_state(state)
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<_> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let cors = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(origins)
    };

    cors.allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Health check endpoint
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_tokens;
    use crate::db::create_pool;
    use crate::state::AppState;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn test_settings() -> Settings {
        let mut settings = Settings::default();
        settings.database.host = "127.0.0.1".to_string();
        settings.database.port = 1;
        settings.auth.jwt_secret = test_tokens::SECRET.to_string();
        settings.auth.audience = test_tokens::AUDIENCE.to_string();
        settings
    }

    fn test_app() -> Router {
        let settings = test_settings();
        let pool = create_pool(&settings.database).unwrap();
        let state = Arc::new(AppState::new(pool, &settings).unwrap());
        create_router(state, &settings)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn compute_request(token: Option<String>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/analytics/compute")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
    }

    #[tokio::test]
    async fn test_api_requires_token() {
        let response = test_app()
            .oneshot(compute_request(None, serde_json::json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_compute_report() {
        let token = test_tokens::valid_token(Uuid::new_v4());
        let body = serde_json::json!({
            "proposals": [
                {
                    "id": Uuid::new_v4(),
                    "title": "Logo design",
                    "status": "approved",
                    "createdAt": "2024-01-15T10:00:00Z",
                    "estimatedValue": 1200.0
                },
                {
                    "id": Uuid::new_v4(),
                    "status": "pending",
                    "created_at": "2024-02-03T09:00:00Z"
                }
            ],
            "earnings": [
                {
                    "id": Uuid::new_v4(),
                    "amount": 800.0,
                    "status": "paid",
                    "createdAt": "2024-02-20T12:00:00Z"
                }
            ],
            "omitEmpty": true
        });

        let response = test_app()
            .oneshot(compute_request(Some(token), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let data = &json["data"];

        assert_eq!(data["summary"]["totalProposals"], 2);
        assert_eq!(data["statusDistribution"].as_array().map(Vec::len), Some(2));
        assert_eq!(data["monthlyProposals"][0]["month"], "Jan 2024");
        assert_eq!(data["monthlyProposals"][0]["count"], 1);
        assert_eq!(data["monthlyEarnings"][0]["month"], "Feb 2024");
        assert_eq!(data["monthlyEarnings"][0]["paid"], 800.0);
    }

    #[tokio::test]
    async fn test_compute_rejects_negative_amounts() {
        let token = test_tokens::valid_token(Uuid::new_v4());
        let body = serde_json::json!({
            "earnings": [
                {"id": Uuid::new_v4(), "amount": 100.0, "status": "paid", "createdAt": "2024-02-20T12:00:00Z"},
                {"id": Uuid::new_v4(), "amount": -50.0, "status": "pending", "createdAt": "2024-02-21T12:00:00Z"}
            ]
        });

        let response = test_app()
            .oneshot(compute_request(Some(token), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_send_message_to_self_rejected_before_database() {
        let me = Uuid::new_v4();
        let request = Request::builder()
            .method("POST")
            .uri("/api/messages")
            .header(header::CONTENT_TYPE, "application/json")
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", test_tokens::valid_token(me)),
            )
            .body(Body::from(
                serde_json::json!({"receiverId": me, "content": "note to self"}).to_string(),
            ))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_notifications_require_token() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/notifications")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let token = test_tokens::token_for(
            Uuid::new_v4(),
            test_tokens::AUDIENCE,
            chrono::Duration::minutes(-10),
            test_tokens::SECRET,
        );

        let response = test_app()
            .oneshot(compute_request(Some(token), serde_json::json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_generate_without_api_key_is_unavailable() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/proposals/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", test_tokens::valid_token(Uuid::new_v4())),
            )
            .body(Body::from(r#"{"userPrompt": "Landing page for a bakery"}"#))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
