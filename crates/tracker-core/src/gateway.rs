//! ============================================================================
//! ApiGateway - HTTP Wrapper for the CiviTrack Backend
//! ============================================================================
//! Owns the one reqwest client, stamps identity headers from the session on
//! every outbound call, and normalizes error responses to a single
//! human-readable message (body `detail`, then `message`, then raw text).
//! ============================================================================

use std::sync::Arc;

use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::AppConfig;
use crate::error::{ClientError, Result};
use crate::session::SessionStore;

pub struct ApiGateway {
    client: reqwest::Client,
    base_url: Url,
    session: Arc<SessionStore>,
}

impl ApiGateway {
    pub fn new(config: &AppConfig, session: Arc<SessionStore>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("civitrack-client/0.1")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.clone(),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Identity headers for the current session state.
    /// `X-Role` is always present; `X-Citizen-Id` only when a real id is
    /// stored (the placeholder reads back as empty and is omitted); the
    /// bearer header only when a token exists. Header-identity and
    /// token-identity are alternate deployment modes, the gateway simply
    /// stamps whatever the session holds.
    pub fn identity_headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("X-Role", self.session.role().as_str().to_string())];

        let citizen_id = self.session.citizen_id();
        if !citizen_id.is_empty() {
            headers.push(("X-Citizen-Id", citizen_id));
        }

        if let Some(token) = self.session.token() {
            headers.push(("Authorization", format!("Bearer {}", token)));
        }

        headers
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    // ========================================================================
    // Request surface
    // ========================================================================

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(self.client.get(self.endpoint(path))).await
    }

    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.execute(self.client.get(self.endpoint(path)).query(query))
            .await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(self.client.post(self.endpoint(path)).json(body))
            .await
    }

    /// POST with no body, for action endpoints like auto-assign/escalate.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(self.client.post(self.endpoint(path))).await
    }

    /// POST where the backend reads its arguments from the query string
    /// (the OTP stubs).
    pub async fn post_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.execute(self.client.post(self.endpoint(path)).query(query))
            .await
    }

    /// POST carrying an `Idempotency-Key` header. The caller owns the key:
    /// one fresh key per logical submission, the same key only for a true
    /// retry of that submission.
    pub async fn post_idempotent<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        idempotency_key: &str,
    ) -> Result<T> {
        self.execute(
            self.client
                .post(self.endpoint(path))
                .header("Idempotency-Key", idempotency_key)
                .json(body),
        )
        .await
    }

    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(self.client.patch(self.endpoint(path)).json(body))
            .await
    }

    async fn execute<T: DeserializeOwned>(&self, builder: reqwest::RequestBuilder) -> Result<T> {
        let mut builder = builder;
        for (name, value) in self.identity_headers() {
            builder = builder.header(name, value);
        }

        let response = builder.send().await?;
        let status = response.status();
        let path = response.url().path().to_string();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = extract_error_message(&text);
            warn!("API error {} on {}: {}", status, path, message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("{} -> {}", path, status);
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to parse response: {}", e)))
    }
}

/// Pull the human-readable message out of an error body: the `detail`
/// field, then `message`, then the raw text itself.
pub fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message"] {
            match value.get(key) {
                Some(serde_json::Value::String(s)) if !s.is_empty() => return s.clone(),
                Some(other) if !other.is_null() => return other.to_string(),
                _ => {}
            }
        }
    }
    if body.trim().is_empty() {
        "Request failed".to_string()
    } else {
        body.trim().to_string()
    }
}

/// Client-generated idempotency key: unix millis plus a random hex suffix.
/// Retrying the same logical submission must reuse the same key; a new
/// submission gets a fresh one.
pub fn idempotency_key() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u64 = rand::thread_rng().gen();
    format!("{}-{:x}", millis, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ANONYMOUS_PLACEHOLDER;
    use crate::types::Role;

    fn gateway_with(session: SessionStore) -> ApiGateway {
        ApiGateway::new(&AppConfig::default(), Arc::new(session))
    }

    #[test]
    fn test_headers_for_fresh_session() {
        let gw = gateway_with(SessionStore::in_memory());
        let headers = gw.identity_headers();
        assert_eq!(headers, vec![("X-Role", "citizen".to_string())]);
    }

    #[test]
    fn test_citizen_id_header_only_when_real() {
        let session = SessionStore::in_memory();
        session.set_citizen_id(ANONYMOUS_PLACEHOLDER);
        let gw = gateway_with(session);
        assert!(gw.identity_headers().iter().all(|(k, _)| *k != "X-Citizen-Id"));

        let session = SessionStore::in_memory();
        session.set_citizen_id("66f0a1b2c3");
        let gw = gateway_with(session);
        assert!(gw
            .identity_headers()
            .contains(&("X-Citizen-Id", "66f0a1b2c3".to_string())));
    }

    #[test]
    fn test_bearer_header_when_logged_in() {
        let session = SessionStore::in_memory();
        session.save_auth("tok-1", Role::Staff);
        let gw = gateway_with(session);
        let headers = gw.identity_headers();
        assert!(headers.contains(&("X-Role", "staff".to_string())));
        assert!(headers.contains(&("Authorization", "Bearer tok-1".to_string())));
    }

    #[test]
    fn test_error_message_extraction_order() {
        assert_eq!(
            extract_error_message(r#"{"detail": "Request not found"}"#),
            "Request not found"
        );
        assert_eq!(
            extract_error_message(r#"{"message": "nope"}"#),
            "nope"
        );
        // structured detail is stringified rather than dropped
        assert_eq!(
            extract_error_message(r#"{"detail": {"loc": ["body"]}}"#),
            r#"{"loc":["body"]}"#
        );
        assert_eq!(extract_error_message("plain text error"), "plain text error");
        assert_eq!(extract_error_message(""), "Request failed");
    }

    #[test]
    fn test_idempotency_keys_are_unique_per_submission() {
        let a = idempotency_key();
        let b = idempotency_key();
        assert_ne!(a, b);
        assert!(a.contains('-'));
    }

    #[test]
    fn test_endpoint_join() {
        let gw = gateway_with(SessionStore::in_memory());
        assert_eq!(
            gw.endpoint("/requests/me"),
            "http://127.0.0.1:8000/requests/me"
        );
        assert_eq!(gw.endpoint("requests"), "http://127.0.0.1:8000/requests");
    }
}
