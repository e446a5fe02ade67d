use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session token claims. The user id is the only identity claim carried.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated caller, inserted into request extensions by the auth
/// middleware.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub valid: bool,
    pub user_id: Option<Uuid>,
}
