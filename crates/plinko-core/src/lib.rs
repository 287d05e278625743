pub mod error;
pub mod gateway;
pub mod store;

use std::sync::Arc;

pub use error::CoreError;
pub use gateway::{GatewayError, GatewayMessage, MediaAttachment, NotificationGateway};
pub use store::PollStore;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PollStore>,
    pub gateway: Arc<dyn NotificationGateway>,
    pub config: AppConfig,
}

/// Runtime settings the handlers need.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the poll web page; the launch button links to
    /// `{poll_page_url}/{poll_id}`.
    pub poll_page_url: String,
}
