//! HTTP middleware (panel guard, CORS, 404 handler)

use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::routes::panel::PanelState;
use super::types::ApiError;
use crate::core::config::AppConfig;

/// Reject panel requests unless the panel is enabled
pub async fn require_panel_enabled(
    State(state): State<PanelState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.panel.enabled {
        tracing::debug!(uri = %req.uri(), "User panel disabled, rejecting request");
        return Err(ApiError::forbidden(
            "PANEL_DISABLED",
            "User panel is only available in debug mode",
        ));
    }
    Ok(next.run(req).await)
}

/// Allowed origins configuration
#[derive(Debug, Clone)]
pub struct AllowedOrigins {
    origins: Vec<String>,
}

impl AllowedOrigins {
    /// Origins the local server is reachable under
    pub fn new(config: &AppConfig) -> Self {
        let host = config.server.host.as_str();
        let port = config.server.port;
        let is_all = config.binds_all_interfaces();

        let base_hosts: Vec<&str> = if is_all || host == "127.0.0.1" || host == "localhost" {
            vec!["localhost", "127.0.0.1"]
        } else {
            vec![host]
        };

        let mut origins: Vec<String> = base_hosts
            .iter()
            .map(|h| format!("http://{}:{}", h, port))
            .collect();

        if is_all && let Ok(interfaces) = local_ip_address::list_afinet_netifas() {
            for (_, ip) in interfaces
                .iter()
                .filter(|(_, ip)| ip.is_ipv4() && !ip.is_loopback())
            {
                origins.push(format!("http://{}:{}", ip, port));
            }
        }

        Self { origins }
    }

    /// Check if an origin is allowed
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.origins.iter().any(|o| o == origin)
    }

    fn as_header_values(&self) -> Vec<HeaderValue> {
        self.origins.iter().filter_map(|o| o.parse().ok()).collect()
    }
}

/// Create CORS layer
pub fn cors(allowed: &AllowedOrigins) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed.as_header_values()))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
        .allow_credentials(true)
}

const MAX_404_BODY_LOG: usize = 64 * 1024;

/// Handle 404 Not Found with logging
pub async fn handle_404(req: Request) -> impl IntoResponse {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return StatusCode::NOT_FOUND;
    }

    let method = req.method().clone();
    let uri = req.uri().clone();
    let headers = req.headers().clone();

    let body_bytes = match to_bytes(req.into_body(), MAX_404_BODY_LOG).await {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::debug!("[404] {} {} (failed to read body)", method, uri);
            return StatusCode::NOT_FOUND;
        }
    };

    let mut headers_map = serde_json::Map::new();
    for (name, value) in headers.iter() {
        // Session tokens stay out of the logs
        let value = if name == header::COOKIE {
            "<redacted>"
        } else {
            match value.to_str() {
                Ok(v) => v,
                Err(_) => continue,
            }
        };
        headers_map.insert(
            name.to_string(),
            serde_json::Value::String(value.to_string()),
        );
    }

    let body_value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        String::from_utf8(body_bytes.to_vec())
            .map(serde_json::Value::String)
            .unwrap_or_else(|_| {
                serde_json::Value::String(format!("<binary {} bytes>", body_bytes.len()))
            })
    };

    let log_entry = serde_json::json!({
        "status": 404,
        "method": method.to_string(),
        "url": uri.to_string(),
        "headers": headers_map,
        "body": body_value,
    });

    if let Ok(pretty) = serde_json::to_string_pretty(&log_entry) {
        tracing::debug!("[404]\n{}", pretty);
    }

    StatusCode::NOT_FOUND
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{AuthConfig, PanelConfig, ServerConfig};

    fn config(host: &str) -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: host.to_string(),
                port: 5390,
            },
            auth: AuthConfig::default(),
            panel: PanelConfig::default(),
            debug: true,
        }
    }

    #[test]
    fn test_loopback_allows_localhost_aliases() {
        let allowed = AllowedOrigins::new(&config("127.0.0.1"));
        assert!(allowed.is_allowed("http://localhost:5390"));
        assert!(allowed.is_allowed("http://127.0.0.1:5390"));
        assert!(!allowed.is_allowed("http://localhost:3000"));
        assert!(!allowed.is_allowed("http://evil.example"));
    }

    #[test]
    fn test_specific_host_only() {
        let allowed = AllowedOrigins::new(&config("192.168.1.20"));
        assert!(allowed.is_allowed("http://192.168.1.20:5390"));
        assert!(!allowed.is_allowed("http://localhost:5390"));
    }

    #[tokio::test]
    async fn test_handle_404_status() {
        let req = Request::builder()
            .uri("/missing")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = handle_404(req).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
