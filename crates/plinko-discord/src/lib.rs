use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use plinko_core::gateway::{GatewayError, GatewayMessage, MediaAttachment, NotificationGateway};

const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the Discord REST API.
///
/// One instance serves all outbound calls: channel message creation and
/// deletion (authorized with the bot token) and interaction follow-up
/// lookups (authorized by the interaction token in the URL). Requests are
/// made once; callers decide what a failure means.
#[derive(Debug, Clone)]
pub struct DiscordClient {
    http: Client,
    api_base: String,
    token: String,
    application_id: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    id: String,
    channel_id: String,
}

impl DiscordClient {
    pub fn new(token: String, application_id: String) -> Result<Self, GatewayError> {
        Self::with_api_base(token, application_id, DEFAULT_API_BASE.to_string())
    }

    /// Build a client against a non-default API base (tests, proxies).
    pub fn with_api_base(
        token: String,
        application_id: String,
        api_base: String,
    ) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent("PlinkoPoll/0.1")
            .build()
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
            application_id,
        })
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(GatewayError::Remote(format!(
            "discord returned {status}: {body}"
        )))
    }
}

#[async_trait]
impl NotificationGateway for DiscordClient {
    async fn send_message(
        &self,
        channel_id: &str,
        content: &str,
        attachment: Option<MediaAttachment>,
    ) -> Result<GatewayMessage, GatewayError> {
        let url = format!("{}/channels/{}/messages", self.api_base, channel_id);
        let request = self
            .http
            .post(&url)
            .header("Authorization", self.auth_header());

        let resp = match attachment {
            Some(media) => {
                // Attachments ride a multipart body: the JSON payload in
                // `payload_json`, the file itself in `files[0]`.
                let payload = serde_json::json!({
                    "content": content,
                    "attachments": [{ "id": 0, "filename": media.filename }],
                });
                let part = reqwest::multipart::Part::bytes(media.bytes.to_vec())
                    .file_name(media.filename.clone());
                let form = reqwest::multipart::Form::new()
                    .text("payload_json", payload.to_string())
                    .part("files[0]", part);
                request.multipart(form).send().await
            }
            None => {
                request
                    .json(&serde_json::json!({ "content": content }))
                    .send()
                    .await
            }
        }
        .map_err(|e| GatewayError::Http(e.to_string()))?;

        let resp = Self::check(resp).await?;
        let message: MessageResponse = resp
            .json()
            .await
            .map_err(|e| GatewayError::Remote(format!("invalid message response: {e}")))?;
        Ok(GatewayMessage {
            channel_id: message.channel_id,
            message_id: message.id,
        })
    }

    async fn delete_message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> Result<(), GatewayError> {
        let url = format!(
            "{}/channels/{}/messages/{}",
            self.api_base, channel_id, message_id
        );
        let resp = self
            .http
            .delete(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn original_response(
        &self,
        interaction_token: &str,
    ) -> Result<GatewayMessage, GatewayError> {
        let url = format!(
            "{}/webhooks/{}/{}/messages/@original",
            self.api_base, self.application_id, interaction_token
        );
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;
        let resp = Self::check(resp).await?;
        let message: MessageResponse = resp
            .json()
            .await
            .map_err(|e| GatewayError::Remote(format!("invalid message response: {e}")))?;
        Ok(GatewayMessage {
            channel_id: message.channel_id,
            message_id: message.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_base_is_trimmed() {
        let client = DiscordClient::with_api_base(
            "token".to_string(),
            "778".to_string(),
            "https://discord.example/api/v10/".to_string(),
        )
        .unwrap();
        assert_eq!(client.api_base, "https://discord.example/api/v10");
    }

    #[test]
    fn auth_header_uses_bot_scheme() {
        let client = DiscordClient::new("abc123".to_string(), "778".to_string()).unwrap();
        assert_eq!(client.auth_header(), "Bot abc123");
    }
}
