//! ============================================================================
//! Auth API - Login and Registration
//! ============================================================================
//! Bearer-token mode of the client. Logging in stores nothing by itself;
//! callers persist the returned token via SessionStore::save_auth so the
//! gateway starts stamping the Authorization header.
//! ============================================================================

use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::gateway::ApiGateway;
use crate::types::{LoginPayload, RegisterPayload, RegisterResponse, TokenResponse};

pub struct AuthApi {
    gateway: Arc<ApiGateway>,
}

impl AuthApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Register a citizen account.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<RegisterResponse> {
        let payload = RegisterPayload {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: RegisterResponse = self.gateway.post("/auth/register", &payload).await?;
        info!("Registered citizen account for {}", email);
        Ok(response)
    }

    /// Citizen login; returns the bearer credential.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        let payload = LoginPayload {
            email: email.to_string(),
            password: password.to_string(),
        };
        let token: TokenResponse = self.gateway.post("/auth/login", &payload).await?;
        info!("Citizen login succeeded for {}", email);
        Ok(token)
    }

    /// Staff login; same token shape, staff-gated on the backend.
    pub async fn staff_login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        let payload = LoginPayload {
            email: email.to_string(),
            password: password.to_string(),
        };
        let token: TokenResponse = self.gateway.post("/auth/staff/login", &payload).await?;
        info!("Staff login succeeded for {}", email);
        Ok(token)
    }

    /// Echo of the identity the backend sees for the current headers/token.
    pub async fn me(&self) -> Result<serde_json::Value> {
        self.gateway.get("/auth/me").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_payload_wire_shape() {
        let payload = LoginPayload {
            email: "dispatch@cst.local".to_string(),
            password: "secret".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["email"], "dispatch@cst.local");
        assert_eq!(json["password"], "secret");
    }

    #[test]
    fn test_token_response_tolerates_missing_type() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token": "abc"}"#).unwrap();
        assert_eq!(token.access_token, "abc");
        assert!(token.token_type.is_none());
    }
}
