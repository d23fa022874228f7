//! OpenAPI specification

use axum::response::{IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{auth, health, panel};
use crate::domain::{UserField, UsernameField};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "UserPanel API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Debug user impersonation panel"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "auth", description = "Current session"),
        (name = "panel", description = "User panel and impersonation (debug only)")
    ),
    paths(
        health::health,
        auth::whoami,
        panel::panel_content,
        panel::login_by_lookup,
        panel::login_by_id,
        panel::logout,
    ),
    components(schemas(
        health::HealthResponse,
        UserField,
        UsernameField,
        panel::types::UserForm,
        panel::types::RedirectForm,
        panel::types::FormFieldDto,
        panel::types::PanelEndpoints,
        panel::types::RecentUserDto,
        panel::types::PanelResponse,
        panel::types::WhoAmIResponse,
    ))
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as JSON
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_panel_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/health"));
        assert!(paths.iter().any(|p| p.as_str() == "/__debug__/user/users/login"));
        assert!(paths.iter().any(|p| p.as_str() == "/__debug__/user/users/login/{id}"));
    }
}
