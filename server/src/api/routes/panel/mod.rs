//! User panel endpoints
//!
//! Debug-only impersonation: log in as any user by email, username or id,
//! and inspect the current user. Every route is guarded by
//! [`require_panel_enabled`].

pub mod types;

use std::sync::Arc;

use axum::extract::{FromRef, Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::CookieJar;

use crate::api::auth::{CurrentSession, SessionManager};
use crate::api::extractors::{ValidatedForm, ValidatedQuery, ValidationRejection};
use crate::api::middleware::require_panel_enabled;
use crate::api::types::ApiError;
use crate::core::config::PanelConfig;
use crate::core::constants::DEFAULT_REDIRECT;
use crate::data::{UserRepository, UserRow};

use types::{PanelQuery, PanelResponse, RedirectForm, UserForm};

/// Shared state for user panel endpoints
#[derive(Clone)]
pub struct PanelState {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<SessionManager>,
    pub panel: PanelConfig,
}

impl FromRef<PanelState> for Arc<SessionManager> {
    fn from_ref(state: &PanelState) -> Self {
        Arc::clone(&state.sessions)
    }
}

/// Build user panel routes under the configured prefix
pub fn routes(state: PanelState) -> Router<()> {
    let prefix = state.panel.prefix.clone();
    let guard = || axum::middleware::from_fn_with_state(state.clone(), require_panel_enabled);

    // route_layer keeps the guard off the 405 fallback, so wrong methods are
    // rejected before the enabled check
    Router::new()
        .route(
            &format!("{}/panel", prefix),
            get(panel_content).route_layer(guard()),
        )
        .route(
            &format!("{}/users/login", prefix),
            post(login_by_lookup).route_layer(guard()),
        )
        .route(
            &format!("{}/users/login/{{id}}", prefix),
            post(login_by_id).route_layer(guard()),
        )
        .route(
            &format!("{}/users/logout", prefix),
            post(logout).route_layer(guard()),
        )
        .with_state(state)
}

/// Render the panel: current user, lookup form and recently active users
#[utoipa::path(
    get,
    path = "/__debug__/user/panel",
    tag = "panel",
    params(("next" = Option<String>, Query, description = "Redirect target for the panel's buttons")),
    responses(
        (status = 200, description = "Panel content", body = PanelResponse),
        (status = 403, description = "User panel disabled")
    )
)]
pub async fn panel_content(
    State(state): State<PanelState>,
    session: CurrentSession,
    ValidatedQuery(query): ValidatedQuery<PanelQuery>,
) -> Result<Json<PanelResponse>, ApiError> {
    let current = session.user(state.users.as_ref()).await?;
    let recent = state
        .users
        .list_recent_users(state.panel.recent_users)
        .await?;

    Ok(Json(PanelResponse::new(
        &state.panel.prefix,
        state.panel.username_field,
        query.next,
        current.as_ref(),
        recent,
    )))
}

/// Log in as the single user matching the submitted email, username or id
#[utoipa::path(
    post,
    path = "/__debug__/user/users/login",
    tag = "panel",
    request_body(content = UserForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Logged in, redirecting to next"),
        (status = 400, description = "Invalid form"),
        (status = 403, description = "User panel disabled"),
        (status = 404, description = "No single matching user"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn login_by_lookup(
    State(state): State<PanelState>,
    jar: CookieJar,
    ValidatedForm(form): ValidatedForm<UserForm>,
) -> Result<(CookieJar, Response), ApiError> {
    let filter = form.lookup();
    let matches = state
        .users
        .find_users(&filter, state.panel.username_field, 2)
        .await?;

    let user = match <[UserRow; 1]>::try_from(matches) {
        Ok([user]) => user,
        Err(matches) if matches.is_empty() => {
            tracing::debug!(%filter, "No user matches lookup");
            return Err(ApiError::not_found(
                "USER_NOT_FOUND",
                format!("No user matches {}", filter),
            ));
        }
        Err(_) => {
            tracing::debug!(%filter, "Lookup matches several users");
            return Err(ApiError::not_found(
                "USER_AMBIGUOUS",
                format!("More than one user matches {}", filter),
            ));
        }
    };

    impersonate(&state, jar, &user, filter.kind(), form.next.as_deref()).await
}

/// Log in as the user with the given id
#[utoipa::path(
    post,
    path = "/__debug__/user/users/login/{id}",
    tag = "panel",
    params(("id" = String, Path, description = "User id, optionally negative")),
    request_body(content = RedirectForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Logged in, redirecting to next"),
        (status = 403, description = "User panel disabled"),
        (status = 404, description = "No such user"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn login_by_id(
    State(state): State<PanelState>,
    Path(id): Path<String>,
    jar: CookieJar,
    form: Result<ValidatedForm<RedirectForm>, ValidationRejection>,
) -> Result<(CookieJar, Response), ApiError> {
    let not_found = || ApiError::not_found("USER_NOT_FOUND", format!("No user with id {}", id));

    let user_id = parse_user_id(&id).ok_or_else(not_found)?;
    let user = state
        .users
        .get_user(user_id)
        .await?
        .ok_or_else(not_found)?;

    let next = redirect_target(form);
    impersonate(&state, jar, &user, "id", next.as_deref()).await
}

/// Clear the session, whether or not one exists
#[utoipa::path(
    post,
    path = "/__debug__/user/users/logout",
    tag = "panel",
    request_body(content = RedirectForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Logged out, redirecting to next"),
        (status = 403, description = "User panel disabled"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn logout(
    CurrentSession(user_id): CurrentSession,
    jar: CookieJar,
    form: Result<ValidatedForm<RedirectForm>, ValidationRejection>,
) -> (CookieJar, Response) {
    if let Some(user_id) = user_id {
        tracing::info!(user_id, "Impersonation session ended");
    }

    let next = redirect_target(form);
    (
        jar.add(SessionManager::removal_cookie()),
        redirect(next.as_deref()),
    )
}

async fn impersonate(
    state: &PanelState,
    jar: CookieJar,
    user: &UserRow,
    via: &str,
    next: Option<&str>,
) -> Result<(CookieJar, Response), ApiError> {
    state.users.record_login(user.id).await?;

    let token = state.sessions.issue(user.id).map_err(|e| {
        tracing::error!(error = %e, "Failed to issue session token");
        ApiError::internal("Failed to create session")
    })?;

    tracing::info!(user_id = user.id, user = %user.label(), via, "Impersonating user");

    Ok((
        jar.add(SessionManager::session_cookie(token)),
        redirect(next),
    ))
}

/// Parse a path id of the form `-?\d+`
fn parse_user_id(raw: &str) -> Option<i64> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Missing or unparsable forms redirect to the default target
fn redirect_target(form: Result<ValidatedForm<RedirectForm>, ValidationRejection>) -> Option<String> {
    form.ok().and_then(|ValidatedForm(form)| form.next)
}

/// 302 to `next`, or to `/` when it is missing or not a valid header value
fn redirect(next: Option<&str>) -> Response {
    let target = next.filter(|n| !n.is_empty()).unwrap_or(DEFAULT_REDIRECT);
    let location = HeaderValue::from_str(target)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_REDIRECT));

    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
