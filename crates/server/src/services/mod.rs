//! Application services.

pub mod auth;
pub mod session;

pub use auth::AdminAuthService;
pub use session::{SESSION_COOKIE_NAME, SessionCodec};
