//! Who-am-I endpoint
//!
//! Stands in for the host application's pages: shows which user the
//! session cookie currently carries.

use std::sync::Arc;

use axum::extract::{FromRef, State};
use axum::routing::get;
use axum::{Json, Router};

use super::panel::types::WhoAmIResponse;
use crate::api::auth::{CurrentSession, SessionManager};
use crate::api::types::ApiError;
use crate::data::UserRepository;
use crate::domain::public_fields;

/// Auth state with user directory access
#[derive(Clone)]
pub struct AuthRoutesState {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<SessionManager>,
}

impl FromRef<AuthRoutesState> for Arc<SessionManager> {
    fn from_ref(state: &AuthRoutesState) -> Self {
        Arc::clone(&state.sessions)
    }
}

/// Create auth routes
pub fn routes(users: Arc<dyn UserRepository>, sessions: Arc<SessionManager>) -> Router {
    Router::new()
        .route("/", get(whoami))
        .with_state(AuthRoutesState { users, sessions })
}

/// Current session user, if any
#[utoipa::path(
    get,
    path = "/",
    tag = "auth",
    responses(
        (status = 200, description = "Session status", body = WhoAmIResponse)
    )
)]
pub async fn whoami(
    State(state): State<AuthRoutesState>,
    session: CurrentSession,
) -> Result<Json<WhoAmIResponse>, ApiError> {
    let user = session.user(state.users.as_ref()).await?;

    Ok(Json(WhoAmIResponse {
        authenticated: user.is_some(),
        user: user.as_ref().map(public_fields),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::core::constants::SESSION_COOKIE_NAME;
    use crate::data::{NewUser, UserDirectory};

    async fn call(router: Router, cookie: Option<String>) -> serde_json::Value {
        let mut builder = Request::builder().uri("/");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let response = router
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_whoami() {
        let directory = UserDirectory::in_memory().await;
        let users = directory.repository();
        let sessions = Arc::new(SessionManager::new(vec![4u8; 32]));
        let router = routes(users.clone(), sessions.clone());

        let body = call(router.clone(), None).await;
        assert_eq!(body["authenticated"], false);
        assert!(body.get("user").is_none());

        let dave = users
            .create_user(&NewUser {
                username: Some("dave".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let cookie = format!("{}={}", SESSION_COOKIE_NAME, sessions.issue(dave.id).unwrap());

        let body = call(router, Some(cookie)).await;
        assert_eq!(body["authenticated"], true);
        let fields = body["user"].as_array().unwrap();
        assert!(fields.iter().any(|f| f["name"] == "username" && f["value"] == "dave"));
        assert!(fields.iter().all(|f| f["name"] != "password"));
    }
}
