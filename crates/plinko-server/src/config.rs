use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub discord: DiscordConfig,
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Largest accepted request body; bounds the replay upload on the
    /// poll-closing endpoint.
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            max_upload_size: 100_000_000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Bot token; the DISCORD_TOKEN environment variable takes precedence.
    pub token: String,
    /// Application id; DISCORD_APPLICATION_ID takes precedence.
    pub application_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Base URL of the poll page the launch button links to.
    pub poll_page_url: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            poll_page_url: "https://master--plinkopoll.netlify.app".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let mut config: Config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("could not read config file {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("could not parse config file {}", path.display()))?
        } else {
            Config::default()
        };

        if let Ok(token) = std::env::var("DISCORD_TOKEN") {
            if !token.trim().is_empty() {
                config.discord.token = token.trim().to_string();
            }
        }
        if let Ok(app_id) = std::env::var("DISCORD_APPLICATION_ID") {
            if !app_id.trim().is_empty() {
                config.discord.application_id = app_id.trim().to_string();
            }
        }

        if config.discord.token.is_empty() {
            anyhow::bail!("a Discord bot token is required ([discord].token or DISCORD_TOKEN)");
        }
        if config.discord.application_id.is_empty() {
            anyhow::bail!(
                "a Discord application id is required ([discord].application_id or DISCORD_APPLICATION_ID)"
            );
        }

        Ok(config)
    }
}
