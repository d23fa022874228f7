//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::auth::SessionManager;
use super::middleware::{self, AllowedOrigins};
use super::openapi::openapi_json;
use super::routes::panel::PanelState;
use super::routes::{auth, health, panel};
use crate::core::CoreApp;
use crate::core::config::AppConfig;
use crate::core::constants::PANEL_BODY_LIMIT;
use crate::data::UserRepository;

pub struct ApiServer {
    app: CoreApp,
    router: Router,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let router = build_router(&app.config, app.directory.repository(), app.sessions.clone());
        Self { app, router }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self { app, router } = self;

        let shutdown = app.shutdown.clone();
        let addr = SocketAddr::new(app.config.server.host.parse()?, app.config.server.port);

        let listener = TcpListener::bind(addr).await?;
        tracing::debug!(%addr, "HTTP server listening");

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}

/// Assemble every route with the shared middleware stack
pub fn build_router(
    config: &AppConfig,
    users: Arc<dyn UserRepository>,
    sessions: Arc<SessionManager>,
) -> Router {
    let allowed_origins = AllowedOrigins::new(config);

    let panel_routes = panel::routes(PanelState {
        users: users.clone(),
        sessions: sessions.clone(),
        panel: config.panel.clone(),
    })
    .layer(DefaultBodyLimit::max(PANEL_BODY_LIMIT));

    Router::new()
        .route("/api/v1/health", get(health::health))
        .route("/api/openapi.json", get(openapi_json))
        .merge(auth::routes(users, sessions))
        .merge(panel_routes)
        .fallback(middleware::handle_404)
        .layer(middleware::cors(&allowed_origins))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::core::config::{AuthConfig, PanelConfig, ServerConfig};
    use crate::data::{NewUser, UserDirectory};

    fn config(enabled: bool, prefix: &str) -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5390,
            },
            auth: AuthConfig::default(),
            panel: PanelConfig {
                enabled,
                prefix: prefix.to_string(),
                ..Default::default()
            },
            debug: enabled,
        }
    }

    async fn router(enabled: bool, prefix: &str) -> (Router, Arc<dyn UserRepository>) {
        let users = UserDirectory::in_memory().await.repository();
        let sessions = Arc::new(SessionManager::new(vec![2u8; 32]));
        (
            build_router(&config(enabled, prefix), users.clone(), sessions),
            users,
        )
    }

    async fn get(router: &Router, uri: &str) -> StatusCode {
        router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_and_openapi() {
        let (router, _) = router(false, "/__debug__/user").await;
        assert_eq!(get(&router, "/api/v1/health").await, StatusCode::OK);
        assert_eq!(get(&router, "/api/openapi.json").await, StatusCode::OK);
        assert_eq!(get(&router, "/").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (router, _) = router(true, "/__debug__/user").await;
        assert_eq!(get(&router, "/nope").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_custom_prefix() {
        let (router, users) = router(true, "/dbg").await;
        users
            .create_user(&NewUser {
                username: Some("erin".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(get(&router, "/dbg/panel").await, StatusCode::OK);
        assert_eq!(get(&router, "/__debug__/user/panel").await, StatusCode::NOT_FOUND);

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/dbg/users/login")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("val=erin"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
    }

    #[tokio::test]
    async fn test_panel_disabled_through_full_stack() {
        let (router, _) = router(false, "/__debug__/user").await;
        assert_eq!(get(&router, "/__debug__/user/panel").await, StatusCode::FORBIDDEN);
    }
}
