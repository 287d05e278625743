use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never completed (connect failure, timeout).
    #[error("http error: {0}")]
    Http(String),
    /// The messaging channel answered with an error.
    #[error("remote error: {0}")]
    Remote(String),
}

/// Reference to a message that exists on the messaging channel.
#[derive(Debug, Clone)]
pub struct GatewayMessage {
    pub channel_id: String,
    pub message_id: String,
}

/// In-memory media payload attached to an outbound message. The bytes are
/// passed straight through; nothing is written to disk.
#[derive(Debug, Clone)]
pub struct MediaAttachment {
    pub filename: String,
    pub bytes: Bytes,
}

/// The external messaging channel the poll service announces through.
///
/// Failures here never roll back store state: a closed poll stays closed
/// even when its announcement cleanup fails.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Send a channel message, optionally with an attached media file.
    /// Returns a reference to the created message.
    async fn send_message(
        &self,
        channel_id: &str,
        content: &str,
        attachment: Option<MediaAttachment>,
    ) -> Result<GatewayMessage, GatewayError>;

    /// Delete a previously sent channel message.
    async fn delete_message(&self, channel_id: &str, message_id: &str)
        -> Result<(), GatewayError>;

    /// Resolve the message created by an interaction response, so its
    /// reference can be recorded for later cleanup.
    async fn original_response(&self, interaction_token: &str)
        -> Result<GatewayMessage, GatewayError>;
}
