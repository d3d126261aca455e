//! Authentication layer: session tokens, password hashing, and the session cookie.

pub mod cookie;
pub mod middleware;
pub mod password;
pub mod secret;
pub mod token;

pub use middleware::{protect, AppState, CurrentUser};
pub use secret::generate_jwt_secret;
pub use token::{Claims, TokenError, TokenIssuer};
