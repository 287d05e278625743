use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde_json::{json, Value};

use plinko_core::gateway::MediaAttachment;
use plinko_core::AppState;
use plinko_models::poll::PollSnapshot;

use crate::error::ApiError;

/// Results query surface: the poll page polls this for live state.
pub async fn get_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<u64>,
) -> Result<Json<PollSnapshot>, ApiError> {
    let snapshot = state
        .store
        .get_results(poll_id)
        .await
        .ok_or(ApiError::NotFound)?;
    Ok(Json(snapshot))
}

/// Fields of the poll-closing submission, gathered from its multipart body.
struct CloseSubmission {
    winner_id: String,
    winning_option: String,
    total_votes: i64,
    replay: Option<MediaAttachment>,
}

async fn read_submission(mut multipart: Multipart) -> Result<CloseSubmission, ApiError> {
    let mut winner_id = None;
    let mut winning_option = None;
    let mut total_votes = None;
    let mut replay = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "winner_id" => winner_id = Some(text_field(field).await?),
            "winning_option" => winning_option = Some(text_field(field).await?),
            "total_votes" => total_votes = Some(text_field(field).await?),
            "replay" => {
                let filename = field
                    .file_name()
                    .filter(|name| !name.is_empty())
                    .unwrap_or("replay.mp4")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("could not read replay: {e}")))?;
                replay = Some(MediaAttachment { filename, bytes });
            }
            _ => {}
        }
    }

    let winner_id = winner_id
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing winner_id".into()))?;
    let winning_option = winning_option
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing winning_option".into()))?;
    let total_votes = total_votes
        .ok_or_else(|| ApiError::BadRequest("missing total_votes".into()))?
        .parse()
        .map_err(|_| ApiError::BadRequest("total_votes must be a number".into()))?;

    Ok(CloseSubmission {
        winner_id,
        winning_option,
        total_votes,
        replay,
    })
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map(|value| value.trim().to_string())
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart field: {e}")))
}

/// Poll-closing submission surface.
///
/// The close itself happens first and is never rolled back: if the
/// platform refuses the cleanup or the announcement afterwards, the
/// caller gets a gateway error for a poll that is already gone.
pub async fn close_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<u64>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let submission = read_submission(multipart).await?;

    let closed = state.store.close_poll(poll_id).await?;
    tracing::info!(poll_id, winner = %submission.winner_id, "poll closed, announcing winner");

    let Some(message) = closed.message else {
        tracing::warn!(poll_id, "closed poll had no announcement message");
        return Ok(Json(json!({
            "message": "Poll ended, no announcement channel recorded."
        })));
    };

    if let Err(e) = state
        .gateway
        .delete_message(&message.channel_id, &message.message_id)
        .await
    {
        tracing::warn!(poll_id, "could not delete announcement message: {e}");
        return Err(e.into());
    }

    let content = render_winner_announcement(
        &submission.winner_id,
        &submission.winning_option,
        submission.total_votes,
    );
    state
        .gateway
        .send_message(&message.channel_id, &content, submission.replay)
        .await?;

    Ok(Json(json!({
        "message": "Poll ended successfully, winner announced."
    })))
}

/// Spoiler-wrapped so the replay can be watched before the outcome is read.
fn render_winner_announcement(winner_id: &str, winning_option: &str, total_votes: i64) -> String {
    format!(
        "POLL ENDED: || <@{winner_id}>  won with option: {winning_option}\nOut of {total_votes} votes||"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn announcement_mentions_winner_inside_spoiler() {
        let content = render_winner_announcement("53908232506183680", "Red", 7);
        assert!(content.starts_with("POLL ENDED: ||"));
        assert!(content.contains("<@53908232506183680>"));
        assert!(content.contains("won with option: Red"));
        assert!(content.contains("Out of 7 votes"));
        assert!(content.ends_with("||"));
    }
}
