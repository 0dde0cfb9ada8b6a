use std::time::Duration;

use tracing::{debug, info};
use url::Url;

use crate::types::{AlertError, WebhookPayload};

/// Client for Discord's execute-webhook endpoint
///
/// One POST per notification; no retries.
pub struct DiscordClient {
    http_client: reqwest::Client,
    webhook_url: Url,
}

impl DiscordClient {
    pub fn new(webhook_url: Url, timeout: Duration) -> Result<Self, AlertError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("discord-alert/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            webhook_url,
        })
    }

    /// Post a payload to the webhook
    pub async fn send(&self, payload: &WebhookPayload) -> Result<(), AlertError> {
        debug!("Posting notification: {}", payload.content);

        let response = self
            .http_client
            .post(self.webhook_url.clone())
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AlertError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!("Discord accepted notification ({})", status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Embed, Status};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_payload() -> WebhookPayload {
        WebhookPayload {
            content: "❌ Deploy".to_string(),
            username: None,
            avatar_url: None,
            embeds: vec![Embed {
                title: "Deploy".to_string(),
                description: "rollout halted".to_string(),
                color: Status::Failure.color(),
                timestamp: "2026-10-19T12:00:00Z".to_string(),
                fields: vec![],
                footer: None,
            }],
        }
    }

    fn client_for(server: &MockServer) -> DiscordClient {
        let url = Url::parse(&format!("{}/api/webhooks/1/token", server.uri())).unwrap();
        DiscordClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_send_posts_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/webhooks/1/token"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "content": "❌ Deploy",
                "embeds": [{
                    "title": "Deploy",
                    "description": "rollout halted",
                    "color": 15548997,
                    "timestamp": "2026-10-19T12:00:00Z"
                }]
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).send(&sample_payload()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_reports_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_string(r#"{"message": "Unknown Webhook", "code": 10015}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).send(&sample_payload()).await.unwrap_err();
        match err {
            AlertError::Rejected { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("Unknown Webhook"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_send_reports_transport_failure() {
        // Grab a free port, then release it so the connection is refused
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url =
            Url::parse(&format!("http://{}/api/webhooks/1/s3cr3t-hook-value", addr)).unwrap();
        let client = DiscordClient::new(url, Duration::from_secs(2)).unwrap();

        let err = client.send(&sample_payload()).await.unwrap_err();
        assert!(matches!(err, AlertError::Delivery(_)));
        assert!(!err.is_fatal());

        let message = err.to_string();
        assert!(!message.contains("s3cr3t-hook-value"), "token leaked: {message}");
        assert!(!message.contains("/api/webhooks/"), "url leaked: {message}");
    }
}
