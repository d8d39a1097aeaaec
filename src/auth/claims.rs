use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload carried by a session token. Stateless: the server trusts the
/// signature and expiry, nothing is looked up on verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,     // user ID
    pub email: String, // email at issuance time
    pub iat: usize,    // issued at (unix timestamp)
    pub exp: usize,    // expires at (unix timestamp)
}
