//! ============================================================================
//! Citizens API - Profiles and OTP Verification
//! ============================================================================
//! `POST /citizens` creates a new profile when no citizen id header is
//! present and updates the existing one otherwise; the gateway decides
//! that by whatever id the session currently holds.
//! ============================================================================

use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::gateway::ApiGateway;
use crate::types::{CitizenCreate, CitizenCreated, CitizenProfile};

/// Delivery channel for the OTP stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpChannel {
    Email,
    Phone,
}

impl OtpChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpChannel::Email => "email",
            OtpChannel::Phone => "phone",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "email" => Some(OtpChannel::Email),
            "phone" => Some(OtpChannel::Phone),
            _ => None,
        }
    }
}

pub struct CitizensApi {
    gateway: Arc<ApiGateway>,
}

impl CitizensApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Create or update a citizen profile.
    pub async fn create(&self, payload: &CitizenCreate) -> Result<CitizenCreated> {
        let created: CitizenCreated = self.gateway.post("/citizens", payload).await?;
        info!(
            "Citizen profile {} ({})",
            created.citizen_id,
            if payload.anonymous { "anonymous" } else { "named" }
        );
        Ok(created)
    }

    /// Profile for the citizen id the session carries.
    pub async fn me(&self) -> Result<CitizenProfile> {
        self.gateway.get("/citizens/me").await
    }

    /// Ask the backend to send a verification code over the given channel.
    pub async fn send_otp(&self, channel: OtpChannel) -> Result<serde_json::Value> {
        self.gateway
            .post_query(
                "/citizens/otp/send",
                &[("channel", channel.as_str().to_string())],
            )
            .await
    }

    /// Submit the received code; advances the profile's verification state.
    pub async fn verify_otp(&self, code: &str) -> Result<serde_json::Value> {
        self.gateway
            .post_query("/citizens/otp/verify", &[("code", code.to_string())])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_channel_names() {
        assert_eq!(OtpChannel::Email.as_str(), "email");
        assert_eq!(OtpChannel::parse("PHONE"), Some(OtpChannel::Phone));
        assert_eq!(OtpChannel::parse("carrier-pigeon"), None);
    }

    #[test]
    fn test_anonymous_create_carries_no_identity() {
        let payload = CitizenCreate::anonymous();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["anonymous"], true);
        assert!(json["full_name"].is_null());
        assert!(json["email"].is_null());
        assert!(json["phone"].is_null());
    }
}
