use plinko_core::store::VoterProfile;
use plinko_models::interaction::{Interaction, InteractionType};

use crate::error::ApiError;

/// Action rows hold at most five buttons; with one row reserved for the
/// launch link that bounds the number of options per poll.
pub const MAX_OPTIONS: usize = 20;

pub const VOTE_CUSTOM_ID_PREFIX: &str = "poll_vote_";

const CREATE_POLL_COMMAND: &str = "plinko_poll";
const END_POLL_COMMAND: &str = "endpoll";

/// A validated dispatcher event, one variant per store operation.
///
/// Interactions are duck-typed on the wire; everything past this point
/// works with these variants only.
#[derive(Debug, Clone)]
pub enum PollRequest {
    Create {
        options: Vec<String>,
    },
    Vote {
        poll_id: u64,
        voter_id: String,
        profile: VoterProfile,
        option_index: usize,
    },
    Close {
        poll_id: u64,
    },
}

impl PollRequest {
    /// Validate an inbound interaction and extract the request it carries.
    /// Ping is answered by the dispatcher before this point.
    pub fn parse(interaction: &Interaction) -> Result<Self, ApiError> {
        match interaction.interaction_type {
            InteractionType::ApplicationCommand => Self::parse_command(interaction),
            InteractionType::MessageComponent => Self::parse_component(interaction),
            _ => Err(ApiError::BadRequest("unsupported interaction type".into())),
        }
    }

    fn parse_command(interaction: &Interaction) -> Result<Self, ApiError> {
        let name = interaction
            .data
            .as_ref()
            .and_then(|data| data.name.as_deref())
            .ok_or_else(|| ApiError::BadRequest("command interaction without a name".into()))?;

        match name {
            CREATE_POLL_COMMAND => {
                let raw = interaction
                    .option("options")
                    .and_then(|option| option.as_str())
                    .ok_or_else(|| ApiError::BadRequest("missing options".into()))?;
                let options = split_options(raw);
                if options.is_empty() {
                    return Err(ApiError::BadRequest(
                        "a poll needs at least one option".into(),
                    ));
                }
                if options.len() > MAX_OPTIONS {
                    return Err(ApiError::BadRequest(format!(
                        "at most {MAX_OPTIONS} options are supported"
                    )));
                }
                Ok(Self::Create { options })
            }
            END_POLL_COMMAND => {
                let poll_id = interaction
                    .option("poll_id")
                    .and_then(|option| option.as_i64())
                    .and_then(|value| u64::try_from(value).ok())
                    .ok_or_else(|| {
                        ApiError::BadRequest("missing or invalid poll_id".into())
                    })?;
                Ok(Self::Close { poll_id })
            }
            other => Err(ApiError::BadRequest(format!("unknown command: {other}"))),
        }
    }

    fn parse_component(interaction: &Interaction) -> Result<Self, ApiError> {
        let custom_id = interaction
            .data
            .as_ref()
            .and_then(|data| data.custom_id.as_deref())
            .ok_or_else(|| {
                ApiError::BadRequest("component interaction without a custom id".into())
            })?;
        let (poll_id, option_index) = parse_vote_custom_id(custom_id).ok_or_else(|| {
            ApiError::BadRequest(format!("unrecognized component: {custom_id}"))
        })?;

        let user = interaction.invoker().ok_or_else(|| {
            ApiError::BadRequest("component interaction without a user".into())
        })?;

        Ok(Self::Vote {
            poll_id,
            voter_id: user.id.clone(),
            profile: VoterProfile {
                username: user.username.clone(),
                avatar_url: user.avatar_url(),
            },
            option_index,
        })
    }
}

/// Split the raw comma-separated command input into option labels.
fn split_options(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `poll_vote_{pollId}_{optionIndex}` button ids.
fn parse_vote_custom_id(custom_id: &str) -> Option<(u64, usize)> {
    let rest = custom_id.strip_prefix(VOTE_CUSTOM_ID_PREFIX)?;
    let (poll_id, option_index) = rest.split_once('_')?;
    Some((poll_id.parse().ok()?, option_index.parse().ok()?))
}
