//! HTTP client for the sponsors API.
//!
//! 200 decodes to a record, 404 means "no record", and every other outcome is
//! an error for the caller to log.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, instrument};

use sponsors_core::constants::{DEFAULT_TIMEOUT_SECONDS, MAX_ERROR_BODY_LEN, SPONSORS_PATH};
use sponsors_core::error::{Result, SponsorsError};
use sponsors_core::traits::SponsorSource;
use sponsors_core::types::{SponsorInfo, UserId};

/// Client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Request timeout in seconds, covering connect through body read
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ClientConfig {
    /// Creates config with the given timeout.
    pub fn with_timeout(timeout_seconds: u64) -> Self {
        Self { timeout_seconds }
    }
}

/// Client for the sponsors API.
///
/// Holds no base URL of its own: the URL is configuration that may change at
/// runtime, so it is passed with every request.
#[derive(Clone)]
pub struct SponsorsApiClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl SponsorsApiClient {
    /// Creates a client with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with the given config.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| SponsorsError::ConfigError(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Builds the record URL for a user.
    pub fn sponsor_url(base_url: &str, user_id: UserId) -> String {
        format!(
            "{}/{}/{}",
            base_url.trim_end_matches('/'),
            SPONSORS_PATH,
            user_id
        )
    }

    /// Fetches the sponsor record for a user.
    #[instrument(skip(self))]
    pub async fn get_sponsor(&self, base_url: &str, user_id: UserId) -> Result<Option<SponsorInfo>> {
        let url = Self::sponsor_url(base_url, user_id);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(%user_id, "No sponsor record");
            return Ok(None);
        }

        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            return Err(SponsorsError::UnexpectedStatus {
                status: status.as_u16(),
                body: truncate_body(text),
            });
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        let info: SponsorInfo = serde_json::from_str(&body)?;

        debug!(%user_id, tier = ?info.tier, "Fetched sponsor record");
        Ok(Some(info))
    }

    fn transport_error(&self, err: reqwest::Error) -> SponsorsError {
        if err.is_timeout() {
            SponsorsError::Timeout {
                seconds: self.config.timeout_seconds,
            }
        } else if err.is_decode() {
            SponsorsError::InvalidResponse(err.to_string())
        } else {
            SponsorsError::HttpError(err.to_string())
        }
    }
}

#[async_trait]
impl SponsorSource for SponsorsApiClient {
    async fn fetch(&self, base_url: &str, user_id: UserId) -> Result<Option<SponsorInfo>> {
        self.get_sponsor(base_url, user_id).await
    }
}

fn truncate_body(mut text: String) -> String {
    if text.len() > MAX_ERROR_BODY_LEN {
        let mut end = MAX_ERROR_BODY_LEN;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
        text.push('…');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> SponsorsApiClient {
        SponsorsApiClient::with_config(ClientConfig::with_timeout(1)).unwrap()
    }

    async fn mount(server: &MockServer, user: UserId, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!("/sponsors/{user}")))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[test]
    fn test_sponsor_url() {
        let user: UserId = "8b1a9953-c461-4d8c-a4f6-2a6f4e5e4b17".parse().unwrap();
        assert_eq!(
            SponsorsApiClient::sponsor_url("https://api.example.com", user),
            "https://api.example.com/sponsors/8b1a9953-c461-4d8c-a4f6-2a6f4e5e4b17"
        );
        assert_eq!(
            SponsorsApiClient::sponsor_url("https://api.example.com/v1/", user),
            "https://api.example.com/v1/sponsors/8b1a9953-c461-4d8c-a4f6-2a6f4e5e4b17"
        );
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short".into()), "short");
        let long = "é".repeat(MAX_ERROR_BODY_LEN);
        let cut = truncate_body(long);
        assert!(cut.len() <= MAX_ERROR_BODY_LEN + '…'.len_utf8());
        assert!(cut.ends_with('…'));
    }

    #[tokio::test]
    async fn test_fetch_record() {
        let server = MockServer::start().await;
        let user = UserId::random();
        mount(
            &server,
            user,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tier": 3,
                "oocColor": "#abcdef",
                "priorityJoin": true,
                "nekoCharName": null
            })),
        )
        .await;

        let info = client().get_sponsor(&server.uri(), user).await.unwrap().unwrap();
        assert_eq!(info.tier, Some(3));
        assert_eq!(info.ooc_color.as_deref(), Some("#abcdef"));
        assert!(info.have_priority_join);
        assert_eq!(info.neko_char_name, None);
    }

    #[tokio::test]
    async fn test_fetch_record_without_tier() {
        let server = MockServer::start().await;
        let user = UserId::random();
        mount(
            &server,
            user,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "priorityJoin": false })),
        )
        .await;

        let info = client().fetch(&server.uri(), user).await.unwrap().unwrap();
        assert!(!info.is_sponsor());
    }

    #[tokio::test]
    async fn test_not_found_is_none() {
        let server = MockServer::start().await;
        let user = UserId::random();
        mount(&server, user, ResponseTemplate::new(404)).await;

        assert!(client().get_sponsor(&server.uri(), user).await.unwrap().is_none());
    }

    #[test_case(500 ; "internal error")]
    #[test_case(502 ; "bad gateway")]
    #[test_case(401 ; "unauthorized")]
    #[test_case(403 ; "forbidden")]
    #[tokio::test]
    async fn test_other_status_is_error(status: u16) {
        let server = MockServer::start().await;
        let user = UserId::random();
        mount(&server, user, ResponseTemplate::new(status).set_body_string("nope")).await;

        let err = client().get_sponsor(&server.uri(), user).await.unwrap_err();
        match err {
            SponsorsError::UnexpectedStatus { status: got, body } => {
                assert_eq!(got, status);
                assert_eq!(body, "nope");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_error() {
        let server = MockServer::start().await;
        let user = UserId::random();
        mount(&server, user, ResponseTemplate::new(200).set_body_string("{not json")).await;

        let err = client().get_sponsor(&server.uri(), user).await.unwrap_err();
        assert!(matches!(err, SponsorsError::JsonError(_)));
        assert!(err.is_remote_error());
        assert!(!err.is_recoverable());
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        let user = UserId::random();
        mount(
            &server,
            user,
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "tier": 1 }))
                .set_delay(Duration::from_secs(3)),
        )
        .await;

        let err = client().get_sponsor(&server.uri(), user).await.unwrap_err();
        assert!(matches!(err, SponsorsError::Timeout { seconds: 1 }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        let err = client()
            .get_sponsor("http://127.0.0.1:1", UserId::random())
            .await
            .unwrap_err();
        assert!(matches!(err, SponsorsError::HttpError(_)));
        assert!(err.is_recoverable());
    }
}
