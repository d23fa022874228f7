//! Session extractor for Axum handlers
//!
//! ```no_run
//! # use userpanel_server::api::auth::CurrentSession;
//! async fn handler(CurrentSession(user_id): CurrentSession) {
//!     // user_id: Option<i64>, None when anonymous
//! }
//! ```

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use super::manager::SessionManager;
use crate::core::constants::SESSION_COOKIE_NAME;
use crate::data::{DataError, UserRepository, UserRow};

/// User id carried by the request's session cookie.
///
/// Missing, tampered or expired tokens all read as anonymous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentSession(pub Option<i64>);

impl CurrentSession {
    /// Load the session's user; a user deleted since login reads as anonymous
    pub async fn user(&self, users: &dyn UserRepository) -> Result<Option<UserRow>, DataError> {
        match self.0 {
            Some(id) => users.get_user(id).await,
            None => Ok(None),
        }
    }
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
    Arc<SessionManager>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = Arc::<SessionManager>::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(cookie) = jar.get(SESSION_COOKIE_NAME) else {
            return Ok(Self(None));
        };

        let user_id = match sessions.validate(cookie.value()) {
            Ok(claims) => claims.user_id().ok(),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session cookie");
                None
            }
        };

        Ok(Self(user_id))
    }
}
