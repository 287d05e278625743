use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Point-in-time read of one poll, in the shape the results page consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollSnapshot {
    pub poll_id: u64,
    /// Option labels in creation order; vote values index into this list.
    pub options: Vec<String>,
    /// Voter id to the option index they currently have selected.
    pub votes: HashMap<String, usize>,
    pub voters: Vec<VoterEntry>,
}

/// Display metadata for one voter, as captured by their latest vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoterEntry {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub username: String,
    #[serde(rename = "avatarURL")]
    pub avatar_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_serializes_external_field_names() {
        let snapshot = PollSnapshot {
            poll_id: 3,
            options: vec!["Red".to_string(), "Blue".to_string()],
            votes: HashMap::from([("u1".to_string(), 1)]),
            voters: vec![VoterEntry {
                user_id: "u1".to_string(),
                username: "Al".to_string(),
                avatar_url: "https://cdn.discordapp.com/embed/avatars/0.png".to_string(),
            }],
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["pollId"], 3);
        assert_eq!(value["votes"]["u1"], 1);
        assert_eq!(value["voters"][0]["userId"], "u1");
        assert_eq!(
            value["voters"][0]["avatarURL"],
            "https://cdn.discordapp.com/embed/avatars/0.png"
        );
    }
}
