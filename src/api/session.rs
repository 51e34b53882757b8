//! # Session Manager
//!
//! Owns the authentication token lifecycle: obtains a bearer token via
//! login, attaches it to deliveries, and renews it once when the API reports
//! an authorization failure.

use serde::Deserialize;
use tracing::{info, warn};

use super::transport::ApiTransport;
use crate::config::ApiConfig;
use crate::frame::PositionRecord;

/// Expected login response body
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    token: Option<String>,
}

/// Authenticated session against the remote ingestion API
///
/// Holds at most one live token at a time. All failure modes are caught and
/// reported through the boolean return values; the caller decides whether a
/// failure is fatal (startup) or terminal only for the record in flight
/// (steady state).
pub struct SessionManager<T: ApiTransport> {
    transport: T,
    login_url: String,
    gps_url: String,
    username: String,
    password: String,
    token: Option<String>,
}

impl<T: ApiTransport> SessionManager<T> {
    /// Create a session manager with no token held
    pub fn new(transport: T, config: &ApiConfig) -> Self {
        Self {
            transport,
            login_url: config.login_url(),
            gps_url: config.gps_url(),
            username: config.username.clone(),
            password: config.password.clone(),
            token: None,
        }
    }

    /// Whether a session token is currently held
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Authenticate against the login endpoint
    ///
    /// Requires both configured credentials to be non-empty. Success requires
    /// a 2xx response, a parseable JSON body with `success: true`, and a
    /// non-empty token; a response reporting success without a token is a
    /// failure. Transport errors are caught and logged.
    ///
    /// # Returns
    ///
    /// * `bool` - true only on a fully valid token acquisition
    pub async fn login(&mut self) -> bool {
        if self.username.is_empty() || self.password.is_empty() {
            warn!("APP_USER / APP_PASS not configured, cannot log in");
            return false;
        }

        let body = serde_json::json!({
            "username": self.username,
            "password": self.password,
        });

        let response = match self.transport.post_json(&self.login_url, &body, None).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Login request failed: {}", e);
                return false;
            }
        };

        let parsed: LoginResponse = match serde_json::from_str(&response.body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Malformed login response ({}): {}", response.status, e);
                return false;
            }
        };

        if !response.is_success() || !parsed.success {
            warn!("Login rejected ({}): {}", response.status, response.body);
            return false;
        }

        match parsed.token {
            Some(token) if !token.is_empty() => {
                self.token = Some(token);
                info!("Login OK, session token acquired");
                true
            }
            _ => {
                warn!("Login reported success but returned no token");
                false
            }
        }
    }

    /// Deliver one position record to the ingestion endpoint
    ///
    /// A 2xx status is success. A 401/403 discards the held token, attempts
    /// exactly one relogin, and retries the same delivery exactly once; the
    /// retry's outcome is final. Any other non-2xx status or transport error
    /// is a final failure for this record.
    ///
    /// # Returns
    ///
    /// * `bool` - true when the record was accepted
    pub async fn deliver(&mut self, record: &PositionRecord) -> bool {
        let body = match serde_json::to_value(record) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to serialize record: {}", e);
                return false;
            }
        };

        // Explicit two-attempt loop; the guard makes the single-retry bound
        // structurally obvious.
        let mut retried = false;
        loop {
            let response = match self
                .transport
                .post_json(&self.gps_url, &body, self.token.as_deref())
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!("Delivery request failed: {}", e);
                    return false;
                }
            };

            if response.is_success() {
                return true;
            }

            if response.is_auth_failure() && !retried {
                info!("Session token expired or invalid, re-authenticating");
                self.token = None;
                if !self.login().await {
                    return false;
                }
                retried = true;
                continue;
            }

            warn!("API rejected record ({}): {}", response.status, response.body);
            return false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::mocks::{MockReply, MockTransport};

    fn test_config() -> ApiConfig {
        ApiConfig {
            base_url: "http://tracker.test".to_string(),
            username: "skipper".to_string(),
            password: "hunter2".to_string(),
            ..ApiConfig::default()
        }
    }

    fn test_record() -> PositionRecord {
        PositionRecord {
            boat_name: "Orion".to_string(),
            latitude: 45.5,
            longitude: -73.6,
            raw_frame: "BOAT=Orion;LAT=45.5;LON=-73.6".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_success_stores_token() {
        let transport = MockTransport::new(vec![MockReply::Respond(
            200,
            r#"{"success": true, "token": "tok-123"}"#,
        )]);
        let mut session = SessionManager::new(transport.clone(), &test_config());

        assert!(session.login().await);
        assert!(session.has_token());

        let sent = transport.sent_requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "http://tracker.test/login");
        assert_eq!(sent[0].body["username"], "skipper");
        assert_eq!(sent[0].body["password"], "hunter2");
        assert_eq!(sent[0].bearer, None);
    }

    #[tokio::test]
    async fn test_login_missing_credentials_fails_without_request() {
        let config = ApiConfig {
            username: String::new(),
            ..test_config()
        };
        let transport = MockTransport::new(vec![]);
        let mut session = SessionManager::new(transport.clone(), &config);

        assert!(!session.login().await);
        assert!(transport.sent_requests().is_empty());
    }

    #[tokio::test]
    async fn test_login_rejected_credentials() {
        let transport = MockTransport::new(vec![MockReply::Respond(
            401,
            r#"{"success": false}"#,
        )]);
        let mut session = SessionManager::new(transport, &test_config());

        assert!(!session.login().await);
        assert!(!session.has_token());
    }

    #[tokio::test]
    async fn test_login_success_flag_without_token_fails() {
        let transport = MockTransport::new(vec![MockReply::Respond(
            200,
            r#"{"success": true}"#,
        )]);
        let mut session = SessionManager::new(transport, &test_config());

        assert!(!session.login().await);
        assert!(!session.has_token());
    }

    #[tokio::test]
    async fn test_login_malformed_body_fails() {
        let transport = MockTransport::new(vec![MockReply::Respond(200, "not json")]);
        let mut session = SessionManager::new(transport, &test_config());

        assert!(!session.login().await);
    }

    #[tokio::test]
    async fn test_login_transport_error_is_caught() {
        let transport = MockTransport::new(vec![MockReply::Fail("connection refused")]);
        let mut session = SessionManager::new(transport, &test_config());

        assert!(!session.login().await);
    }

    #[tokio::test]
    async fn test_deliver_success() {
        let transport = MockTransport::new(vec![
            MockReply::Respond(200, r#"{"success": true, "token": "tok-123"}"#),
            MockReply::Respond(201, ""),
        ]);
        let mut session = SessionManager::new(transport.clone(), &test_config());
        assert!(session.login().await);

        assert!(session.deliver(&test_record()).await);

        let sent = transport.sent_requests();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].url, "http://tracker.test/gps");
        assert_eq!(sent[1].bearer.as_deref(), Some("tok-123"));
        assert_eq!(sent[1].body["boat_name"], "Orion");
        assert_eq!(sent[1].body["latitude"], 45.5);
    }

    #[tokio::test]
    async fn test_deliver_without_token_sends_no_bearer() {
        let transport = MockTransport::new(vec![MockReply::Respond(200, "")]);
        let mut session = SessionManager::new(transport.clone(), &test_config());

        assert!(session.deliver(&test_record()).await);
        assert_eq!(transport.sent_requests()[0].bearer, None);
    }

    #[tokio::test]
    async fn test_deliver_401_triggers_single_relogin_and_retry() {
        let transport = MockTransport::new(vec![
            // First delivery attempt: token expired
            MockReply::Respond(401, ""),
            // Relogin
            MockReply::Respond(200, r#"{"success": true, "token": "tok-fresh"}"#),
            // Retried delivery
            MockReply::Respond(200, ""),
        ]);
        let mut session = SessionManager::new(transport.clone(), &test_config());

        assert!(session.deliver(&test_record()).await);

        let sent = transport.sent_requests();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].url, "http://tracker.test/gps");
        assert_eq!(sent[1].url, "http://tracker.test/login");
        assert_eq!(sent[2].url, "http://tracker.test/gps");
        assert_eq!(sent[2].bearer.as_deref(), Some("tok-fresh"));
    }

    #[tokio::test]
    async fn test_deliver_second_401_is_final() {
        let transport = MockTransport::new(vec![
            MockReply::Respond(401, ""),
            MockReply::Respond(200, r#"{"success": true, "token": "tok-fresh"}"#),
            // Retry also rejected: no second relogin, no third delivery
            MockReply::Respond(401, ""),
        ]);
        let mut session = SessionManager::new(transport.clone(), &test_config());

        assert!(!session.deliver(&test_record()).await);
        assert_eq!(transport.sent_requests().len(), 3);
    }

    #[tokio::test]
    async fn test_deliver_403_with_failed_relogin_is_final() {
        let transport = MockTransport::new(vec![
            MockReply::Respond(403, ""),
            MockReply::Respond(401, r#"{"success": false}"#),
        ]);
        let mut session = SessionManager::new(transport.clone(), &test_config());

        assert!(!session.deliver(&test_record()).await);
        // No retry after a failed relogin
        assert_eq!(transport.sent_requests().len(), 2);
        assert!(!session.has_token());
    }

    #[tokio::test]
    async fn test_deliver_other_status_fails_without_retry() {
        let transport = MockTransport::new(vec![MockReply::Respond(500, "oops")]);
        let mut session = SessionManager::new(transport.clone(), &test_config());

        assert!(!session.deliver(&test_record()).await);
        assert_eq!(transport.sent_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_deliver_transport_error_is_final() {
        let transport = MockTransport::new(vec![MockReply::Fail("timed out")]);
        let mut session = SessionManager::new(transport.clone(), &test_config());

        assert!(!session.deliver(&test_record()).await);
        assert_eq!(transport.sent_requests().len(), 1);
    }
}
