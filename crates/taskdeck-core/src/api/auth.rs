//! Authentication endpoints
//!
//! Login and registration. Token storage is the caller's job (the
//! workspace stores the pair on successful login); these functions only
//! map requests onto the wire.

use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use super::error::{ApiError, ApiResult};
use crate::session::TokenPair;

/// Credentials for `/auth/login/`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Pre-network validation: both fields are required
    pub fn validate(&self) -> ApiResult<()> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(ApiError::Validation(
                "Please enter both username and password.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Payload for `/auth/register/`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirm: String,
}

impl RegisterRequest {
    /// Pre-network validation: names present, passwords match and are at
    /// least 6 characters
    pub fn validate(&self) -> ApiResult<()> {
        if self.first_name.is_empty() || self.last_name.is_empty() {
            return Err(ApiError::Validation(
                "Please enter your full name.".to_string(),
            ));
        }
        if self.password != self.password_confirm {
            return Err(ApiError::Validation("Passwords do not match.".to_string()));
        }
        if self.password.len() < 6 {
            return Err(ApiError::Validation(
                "Password must be at least 6 characters.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Response from `/auth/register/`
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
}

impl ApiClient {
    /// POST /auth/login/ - exchange credentials for a token pair
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<TokenPair> {
        request.validate()?;
        self.post("/auth/login/", request).await
    }

    /// POST /auth/register/ - create a user account
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<RegisterResponse> {
        request.validate()?;
        self.post("/auth/register/", request).await
    }
}
