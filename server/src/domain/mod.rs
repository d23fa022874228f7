//! Domain logic for the user panel
//!
//! - `lookup` - Free-text user lookup classification
//! - `user` - Credential-free projection of user records

pub mod lookup;
pub mod user;

pub use lookup::{LookupFilter, UsernameField, classify};
pub use user::{CREDENTIAL_FIELDS, UserField, public_fields};
