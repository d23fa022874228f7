//! User lookup classification
//!
//! Turns the single free-text field of the panel form into exactly one
//! criterion for selecting a user record.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Inputs at least this many characters long are never read as a primary key,
/// even when they are all digits (phone numbers, long numeric handles).
pub const MAX_ID_CHARS: usize = 10;

/// Which user attribute plays the "username" role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UsernameField {
    #[default]
    Username,
    Email,
}

impl UsernameField {
    /// Column backing this field in the users table
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for UsernameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A single criterion selecting one user record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFilter {
    Email(String),
    Username(String),
    Id(i64),
}

impl LookupFilter {
    /// Short name of the criterion, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Username(_) => "username",
            Self::Id(_) => "id",
        }
    }
}

impl fmt::Display for LookupFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(v) => write!(f, "email={}", v),
            Self::Username(v) => write!(f, "username={}", v),
            Self::Id(v) => write!(f, "id={}", v),
        }
    }
}

/// Classify already-trimmed input as an email, a username or a primary key.
///
/// Anything containing `@` is an email. Integers shorter than
/// [`MAX_ID_CHARS`] characters are ids. Everything else, the empty string
/// included, is a username candidate.
pub fn classify(raw: &str) -> LookupFilter {
    if raw.contains('@') {
        return LookupFilter::Email(raw.to_string());
    }

    match raw.parse::<i64>() {
        Ok(id) if raw.chars().count() < MAX_ID_CHARS => LookupFilter::Id(id),
        _ => LookupFilter::Username(raw.to_string()),
    }
}
