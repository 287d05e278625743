use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::command::CommandOptionType;
use crate::component::Component;
use crate::user::{Member, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InteractionType {
    Ping = 1,
    ApplicationCommand = 2,
    MessageComponent = 3,
    ApplicationCommandAutocomplete = 4,
    ModalSubmit = 5,
}

impl Serialize for InteractionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for InteractionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        match value {
            1 => Ok(Self::Ping),
            2 => Ok(Self::ApplicationCommand),
            3 => Ok(Self::MessageComponent),
            4 => Ok(Self::ApplicationCommandAutocomplete),
            5 => Ok(Self::ModalSubmit),
            _ => Err(serde::de::Error::custom(format!(
                "unknown InteractionType: {value}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InteractionCallbackType {
    Pong = 1,
    ChannelMessageWithSource = 4,
    DeferredChannelMessageWithSource = 5,
    DeferredUpdateMessage = 6,
    UpdateMessage = 7,
}

impl Serialize for InteractionCallbackType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for InteractionCallbackType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        match value {
            1 => Ok(Self::Pong),
            4 => Ok(Self::ChannelMessageWithSource),
            5 => Ok(Self::DeferredChannelMessageWithSource),
            6 => Ok(Self::DeferredUpdateMessage),
            7 => Ok(Self::UpdateMessage),
            _ => Err(serde::de::Error::custom(format!(
                "unknown InteractionCallbackType: {value}"
            ))),
        }
    }
}

/// A slash-command option with its submitted value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedCommandOption {
    pub name: String,
    #[serde(rename = "type")]
    pub option_type: CommandOptionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ResolvedCommandOption {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(Value::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value.as_ref().and_then(Value::as_i64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionData {
    /// Command name (for application command interactions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Resolved command options
    #[serde(default)]
    pub options: Vec<ResolvedCommandOption>,
    /// Custom ID (for message component interactions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    /// Component type (for message component interactions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_type: Option<u8>,
}

/// The inbound interaction envelope, trimmed to the fields the bot reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub application_id: String,
    #[serde(rename = "type")]
    pub interaction_type: InteractionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<InteractionData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    pub token: String,
    pub version: u8,
}

impl Interaction {
    /// The invoking user: `member.user` in guilds, top-level `user` in DMs.
    pub fn invoker(&self) -> Option<&User> {
        self.member.as_ref().map(|m| &m.user).or(self.user.as_ref())
    }

    /// Look up a submitted command option by name.
    pub fn option(&self, name: &str) -> Option<&ResolvedCommandOption> {
        self.data.as_ref()?.options.iter().find(|o| o.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub response_type: InteractionCallbackType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<InteractionCallbackData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionCallbackData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,
}

impl InteractionResponse {
    /// Reply to the webhook liveness handshake.
    pub fn pong() -> Self {
        Self {
            response_type: InteractionCallbackType::Pong,
            data: None,
        }
    }

    /// Reply with a visible channel message.
    pub fn message(content: impl Into<String>, components: Vec<Component>) -> Self {
        Self {
            response_type: InteractionCallbackType::ChannelMessageWithSource,
            data: Some(InteractionCallbackData {
                content: Some(content.into()),
                components,
                flags: None,
            }),
        }
    }

    /// Acknowledge a component interaction without changing the message.
    pub fn deferred_update() -> Self {
        Self {
            response_type: InteractionCallbackType::DeferredUpdateMessage,
            data: None,
        }
    }
}
