//! Signing secret generation for `dayplanner gen-secret`.

use base64::{engine::general_purpose, Engine as _};
use rand::Rng;

/// Generate a cryptographically random signing secret.
///
/// Returns a base64-encoded string (44 characters) from 32 random bytes.
pub fn generate_jwt_secret() -> String {
    let mut rng = rand::rng();
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes);
    general_purpose::STANDARD.encode(bytes)
}
