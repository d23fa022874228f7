//! Session manager
//!
//! Signs session tokens and builds the cookies that carry them.

use anyhow::{Context, Result};
use axum_extra::extract::cookie::{Cookie, SameSite};

use super::jwt::{JwtError, SessionClaims, create_session_token, validate_session_token};
use crate::core::config::AuthConfig;
use crate::core::constants::{
    AUTH_METHOD_IMPERSONATION, DEFAULT_SESSION_TTL_DAYS, SESSION_COOKIE_NAME,
};
use crate::utils::crypto;

pub struct SessionManager {
    signing_key: Vec<u8>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("signing_key", &"<redacted>")
            .finish()
    }
}

impl SessionManager {
    /// Build from config, generating a per-process key when none is set
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let signing_key = match config.secret_key.as_deref() {
            Some(secret) => crypto::decode_secret(secret).context("Invalid auth.secret_key")?,
            None => {
                tracing::warn!(
                    "No auth.secret_key configured; using a random key, sessions will not survive a restart"
                );
                crypto::generate_key(crypto::SIGNING_KEY_LEN)
            }
        };
        Ok(Self::new(signing_key))
    }

    pub fn new(signing_key: Vec<u8>) -> Self {
        Self { signing_key }
    }

    /// Issue a session token for an impersonated user
    pub fn issue(&self, user_id: i64) -> Result<String> {
        create_session_token(&self.signing_key, user_id, AUTH_METHOD_IMPERSONATION)
    }

    /// Validate a JWT session token
    pub fn validate(&self, token: &str) -> Result<SessionClaims, JwtError> {
        validate_session_token(token, &self.signing_key)
    }

    /// Cookie carrying a freshly issued session token
    pub fn session_cookie(token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, token))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(time::Duration::days(DEFAULT_SESSION_TTL_DAYS as i64))
            .build()
    }

    /// Cookie that clears the session in the browser
    pub fn removal_cookie() -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, ""))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(time::Duration::seconds(0))
            .build()
    }
}
