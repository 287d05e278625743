use std::time::Duration;

use axum::{extract::State, Json};

use plinko_core::error::CoreError;
use plinko_core::store::{PollHandle, VoterProfile};
use plinko_core::AppState;
use plinko_models::component::{ButtonStyle, Component};
use plinko_models::interaction::{Interaction, InteractionResponse, InteractionType};

use crate::error::ApiError;
use crate::request::{PollRequest, VOTE_CUSTOM_ID_PREFIX};

const MAX_BUTTONS_PER_ROW: usize = 5;

/// The command/interaction dispatcher: every inbound interaction webhook
/// lands here, is validated into a [`PollRequest`], and executed against
/// the store.
pub async fn handle_interaction(
    State(state): State<AppState>,
    Json(interaction): Json<Interaction>,
) -> Result<Json<InteractionResponse>, ApiError> {
    if interaction.interaction_type == InteractionType::Ping {
        return Ok(Json(InteractionResponse::pong()));
    }

    let response = match PollRequest::parse(&interaction)? {
        PollRequest::Create { options } => create_poll(state, &interaction, options).await?,
        PollRequest::Vote {
            poll_id,
            voter_id,
            profile,
            option_index,
        } => cast_vote(state, poll_id, voter_id, profile, option_index).await?,
        PollRequest::Close { poll_id } => end_poll(state, poll_id).await?,
    };
    Ok(Json(response))
}

async fn create_poll(
    state: AppState,
    interaction: &Interaction,
    options: Vec<String>,
) -> Result<InteractionResponse, ApiError> {
    let handle = state.store.create_poll(options).await?;
    tracing::info!(
        poll_id = handle.id,
        options = handle.options.len(),
        "poll created"
    );

    let components = poll_components(&handle, &state.config.poll_page_url);

    // The announcement message only exists once this response has reached
    // the platform, so its reference is resolved out of band.
    let store = state.store.clone();
    let gateway = state.gateway.clone();
    let token = interaction.token.clone();
    let poll_id = handle.id;
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(250)).await;
        match gateway.original_response(&token).await {
            Ok(message) => {
                if let Err(e) = store
                    .attach_message(poll_id, message.channel_id, message.message_id)
                    .await
                {
                    tracing::warn!(poll_id, "could not record announcement message: {e}");
                }
            }
            Err(e) => {
                tracing::warn!(poll_id, "could not resolve announcement message: {e}");
            }
        }
    });

    Ok(InteractionResponse::message("Vote Now!", components))
}

async fn cast_vote(
    state: AppState,
    poll_id: u64,
    voter_id: String,
    profile: VoterProfile,
    option_index: usize,
) -> Result<InteractionResponse, ApiError> {
    state
        .store
        .cast_vote(poll_id, &voter_id, profile, option_index)
        .await?;
    tracing::debug!(poll_id, option_index, voter = %voter_id, "vote recorded");
    Ok(InteractionResponse::deferred_update())
}

async fn end_poll(state: AppState, poll_id: u64) -> Result<InteractionResponse, ApiError> {
    let closed = match state.store.close_poll(poll_id).await {
        Ok(closed) => closed,
        Err(CoreError::NotFound) => {
            return Ok(InteractionResponse::message("Poll not found.", Vec::new()))
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(poll_id, "poll closed");

    // Deleting the launch message is cleanup, not part of the close: the
    // poll stays closed even when the platform refuses.
    if let Some(message) = closed.message {
        if let Err(e) = state
            .gateway
            .delete_message(&message.channel_id, &message.message_id)
            .await
        {
            tracing::warn!(poll_id, "could not delete announcement message: {e}");
            return Ok(InteractionResponse::message(
                "Poll ended, but its message could not be removed.",
                Vec::new(),
            ));
        }
    }

    Ok(InteractionResponse::message("Poll ended.", Vec::new()))
}

/// One vote button per option, chunked into rows, plus the launch link.
fn poll_components(handle: &PollHandle, poll_page_url: &str) -> Vec<Component> {
    let buttons: Vec<Component> = handle
        .options
        .iter()
        .enumerate()
        .map(|(index, label)| {
            Component::button(
                ButtonStyle::Primary,
                label.clone(),
                format!("{VOTE_CUSTOM_ID_PREFIX}{}_{}", handle.id, index),
            )
        })
        .collect();

    let mut rows: Vec<Component> = buttons
        .chunks(MAX_BUTTONS_PER_ROW)
        .map(|chunk| Component::action_row(chunk.to_vec()))
        .collect();
    rows.push(Component::action_row(vec![Component::link_button(
        "Launch Poll",
        format!("{}/{}", poll_page_url.trim_end_matches('/'), handle.id),
    )]));
    rows
}
