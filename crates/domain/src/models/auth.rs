//! Admin login models.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Credentials posted form-encoded to `/api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub username: String,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}
