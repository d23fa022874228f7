//! User panel API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::core::constants::{LOOKUP_FIELD_LABEL, LOOKUP_FIELD_NAME, PANEL_TITLE};
use crate::data::types::UserRow;
use crate::domain::{LookupFilter, UserField, UsernameField, classify};

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("val must not be blank".into()));
    }
    Ok(())
}

/// Panel login form: one free-text field plus an optional redirect target
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UserForm {
    /// Email, username or numeric id
    #[validate(custom(function = "validate_not_blank"))]
    pub val: String,

    #[validate(length(max = 2048, message = "next is too long"))]
    pub next: Option<String>,
}

impl UserForm {
    /// The single criterion the submitted value stands for
    pub fn lookup(&self) -> LookupFilter {
        classify(self.val.trim())
    }
}

/// Redirect-only form used by login-by-id and logout
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct RedirectForm {
    #[validate(length(max = 2048, message = "next is too long"))]
    pub next: Option<String>,
}

/// Query params for the panel view
#[derive(Debug, Deserialize, Validate)]
pub struct PanelQuery {
    /// Where the panel's buttons send the browser afterwards
    #[validate(length(max = 2048, message = "next is too long"))]
    pub next: Option<String>,
}

/// Description of the lookup form field
#[derive(Debug, Serialize, ToSchema)]
pub struct FormFieldDto {
    pub name: &'static str,
    pub label: &'static str,
}

impl Default for FormFieldDto {
    fn default() -> Self {
        Self {
            name: LOOKUP_FIELD_NAME,
            label: LOOKUP_FIELD_LABEL,
        }
    }
}

/// URLs of the impersonation endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct PanelEndpoints {
    pub login: String,
    /// Template; `{id}` is replaced by the user's id
    pub login_by_id: String,
    pub logout: String,
}

impl PanelEndpoints {
    pub fn new(prefix: &str) -> Self {
        Self {
            login: format!("{}/users/login", prefix),
            login_by_id: format!("{}/users/login/{{id}}", prefix),
            logout: format!("{}/users/logout", prefix),
        }
    }
}

/// Entry of the recently active users list
#[derive(Debug, Serialize, ToSchema)]
pub struct RecentUserDto {
    pub id: i64,
    pub label: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub login_url: String,
}

impl RecentUserDto {
    pub fn new(row: UserRow, endpoints: &PanelEndpoints) -> Self {
        Self {
            id: row.id,
            label: row.label(),
            login_url: endpoints.login_by_id.replace("{id}", &row.id.to_string()),
            last_login: row.last_login.and_then(|ts| DateTime::from_timestamp(ts, 0)),
            username: row.username,
            email: row.email,
        }
    }
}

/// Response for the panel view
#[derive(Debug, Serialize, ToSchema)]
pub struct PanelResponse {
    pub title: &'static str,
    pub nav_title: &'static str,
    /// Current user's username-field value, absent when anonymous
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav_subtitle: Option<String>,
    pub form: FormFieldDto,
    pub next: Option<String>,
    pub endpoints: PanelEndpoints,
    /// Non-credential fields of the current user, absent when anonymous
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<Vec<UserField>>,
    pub users: Vec<RecentUserDto>,
}

impl PanelResponse {
    pub fn new(
        prefix: &str,
        username_field: UsernameField,
        next: Option<String>,
        current: Option<&UserRow>,
        recent: Vec<UserRow>,
    ) -> Self {
        let endpoints = PanelEndpoints::new(prefix);
        let users = recent
            .into_iter()
            .map(|row| RecentUserDto::new(row, &endpoints))
            .collect();

        Self {
            title: PANEL_TITLE,
            nav_title: PANEL_TITLE,
            nav_subtitle: current.map(|user| nav_subtitle(user, username_field)),
            form: FormFieldDto::default(),
            next,
            endpoints,
            current: current.map(crate::domain::public_fields),
            users,
        }
    }
}

fn nav_subtitle(user: &UserRow, username_field: UsernameField) -> String {
    let value = match username_field {
        UsernameField::Username => user.username.clone(),
        UsernameField::Email => user.email.clone(),
    };
    value.unwrap_or_else(|| user.label())
}

/// Response for the who-am-I view
#[derive(Debug, Serialize, ToSchema)]
pub struct WhoAmIResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Vec<UserField>>,
}
