//! Session authentication
//!
//! Impersonated users are remembered through a signed cookie.

mod extractors;
pub mod jwt;
mod manager;

pub use extractors::CurrentSession;
pub use jwt::{JwtError, SessionClaims};
pub use manager::SessionManager;
