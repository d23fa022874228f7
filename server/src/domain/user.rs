//! User record projection
//!
//! The panel shows every stored attribute of a user except credentials.

use serde::Serialize;
use utoipa::ToSchema;

use crate::data::types::UserRow;

/// Fields never exposed by the panel
pub const CREDENTIAL_FIELDS: &[&str] = &["password"];

/// A single (name, value) pair of a user record
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserField {
    pub name: String,
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
}

/// All non-credential fields of a user, in column order
pub fn public_fields(user: &UserRow) -> Vec<UserField> {
    let serde_json::Value::Object(map) = serde_json::to_value(user).unwrap_or_default() else {
        return Vec::new();
    };

    map.into_iter()
        .filter(|(name, _)| !CREDENTIAL_FIELDS.contains(&name.as_str()))
        .map(|(name, value)| UserField { name, value })
        .collect()
}
