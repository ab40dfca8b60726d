/// HTTP server setup and routing
use crate::{
    context::AppContext,
    error::{AppError, AppResult},
};
use axum::{
    http::{header, Method, StatusCode},
    response::{Json, Redirect},
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Build the main application router
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        // Health check endpoint (no middleware)
        .route("/health", get(health_check))
        .route("/", get(root))
        .merge(crate::api::routes())
        .with_state(ctx)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .fallback(not_found)
}

/// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Root: same entry behavior as the login-gated app
async fn root() -> Redirect {
    Redirect::to("/login")
}

/// 404 handler
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "NotFound",
            "message": "Endpoint not found"
        })),
    )
}

/// Start the HTTP server
pub async fn serve(ctx: AppContext) -> AppResult<()> {
    let addr = format!(
        "{}:{}",
        ctx.config.service.hostname, ctx.config.service.port
    );

    info!("maintdesk listening on {}", addr);
    info!("   Service URL: {}", ctx.service_url());

    let app = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountManager;
    use crate::api::middleware::SESSION_COOKIE;
    use crate::config::{LoggingConfig, ServerConfig, ServiceConfig, SessionConfig, StorageConfig};
    use crate::db::test_util::memory_pool;
    use crate::tickets::TicketStore;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn test_context() -> AppContext {
        let pool = memory_pool().await;
        let config = Arc::new(ServerConfig {
            service: ServiceConfig {
                hostname: "localhost".to_string(),
                port: 0,
                version: "test".to_string(),
            },
            storage: StorageConfig {
                data_directory: ".".into(),
                database: ":memory:".into(),
            },
            session: SessionConfig {
                ttl_secs: 3600,
                cookie_secure: false,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        });

        AppContext {
            config: Arc::clone(&config),
            db: pool.clone(),
            account_manager: Arc::new(AccountManager::new(pool.clone(), config)),
            ticket_store: Arc::new(TicketStore::new(pool)),
        }
    }

    async fn seeded_session(ctx: &AppContext, global_id: &str, role: &str) -> String {
        sqlx::query(
            "INSERT INTO users (global_id, name, phone, email, role, location)
             VALUES (?1, ?2, NULL, NULL, ?3, 'Pune')",
        )
        .bind(global_id)
        .bind(format!("User {}", global_id))
        .bind(role)
        .execute(&ctx.db)
        .await
        .unwrap();

        let session = ctx.account_manager.create_session(global_id).await.unwrap();
        session.token
    }

    #[tokio::test]
    async fn test_anonymous_dashboard_redirects_to_login() {
        let app = build_router(test_context().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/dashboard/user")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[tokio::test]
    async fn test_stale_session_redirects_to_login() {
        let app = build_router(test_context().await);

        let request = Request::builder()
            .uri("/dashboard/user")
            .header(header::COOKIE, format!("{}=not-a-session", SESSION_COOKIE))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[tokio::test]
    async fn test_wrong_role_dashboard_is_denied() {
        let ctx = test_context().await;
        let token = seeded_session(&ctx, "G2001", "normal_user").await;
        let app = build_router(ctx);

        let request = Request::builder()
            .uri("/dashboard/admin")
            .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_matching_role_dashboard_is_served() {
        let ctx = test_context().await;
        let token = seeded_session(&ctx, "G2002", "normal_user").await;
        let app = build_router(ctx);

        let request = Request::builder()
            .uri("/dashboard/user")
            .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
