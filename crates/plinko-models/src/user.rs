use serde::{Deserialize, Serialize};

/// The subset of a platform user object the bot consumes.
///
/// Ids are kept as strings: Discord serializes snowflakes as JSON strings,
/// and nothing in the bot does arithmetic on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
}

impl User {
    /// CDN URL for the user's avatar, falling back to one of the default
    /// embed avatars when none is set.
    pub fn avatar_url(&self) -> String {
        match &self.avatar {
            Some(hash) => format!(
                "https://cdn.discordapp.com/avatars/{}/{}.png",
                self.id, hash
            ),
            None => {
                let index = self
                    .id
                    .parse::<u64>()
                    .map(|id| (id >> 22) % 6)
                    .unwrap_or(0);
                format!("https://cdn.discordapp.com/embed/avatars/{index}.png")
            }
        }
    }
}

/// Guild membership wrapper around a [`User`], as delivered in guild
/// interactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub user: User,
    #[serde(default)]
    pub nick: Option<String>,
}
