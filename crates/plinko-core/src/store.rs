use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use plinko_models::poll::{PollSnapshot, VoterEntry};

use crate::error::CoreError;

/// Display metadata captured from a voter's most recent vote.
#[derive(Debug, Clone)]
pub struct VoterProfile {
    pub username: String,
    pub avatar_url: String,
}

/// Reference to the announcement message a poll was launched from.
#[derive(Debug, Clone)]
pub struct PollMessage {
    pub channel_id: String,
    pub message_id: String,
}

/// What the dispatcher needs to render a freshly created poll.
#[derive(Debug, Clone)]
pub struct PollHandle {
    pub id: u64,
    pub options: Vec<String>,
}

/// The final state of a poll removed from the registry.
#[derive(Debug, Clone)]
pub struct ClosedPoll {
    pub id: u64,
    pub options: Vec<String>,
    /// `None` when the poll was closed before its announcement message
    /// was recorded.
    pub message: Option<PollMessage>,
}

struct Poll {
    option_labels: Vec<String>,
    /// Index-aligned with `option_labels`.
    votes_by_option: Vec<HashSet<String>>,
    /// Authoritative one-vote-per-voter record.
    voter_choice: HashMap<String, usize>,
    voter_profile: HashMap<String, VoterProfile>,
    message: Option<PollMessage>,
}

struct Registry {
    next_id: u64,
    polls: HashMap<u64, Poll>,
}

/// Owns all poll and vote state.
///
/// Every operation takes the registry lock once and finishes its mutation
/// under that single guard: callers never observe partial state, and
/// closing a poll is one atomic removal.
pub struct PollStore {
    inner: RwLock<Registry>,
}

impl PollStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Registry {
                next_id: 0,
                polls: HashMap::new(),
            }),
        }
    }

    /// Register a new poll with the given option labels.
    ///
    /// Ids are strictly increasing and never reused while the process
    /// lives.
    pub async fn create_poll(&self, option_labels: Vec<String>) -> Result<PollHandle, CoreError> {
        if option_labels.is_empty() {
            return Err(CoreError::BadRequest(
                "a poll needs at least one option".into(),
            ));
        }
        if option_labels.iter().any(|label| label.trim().is_empty()) {
            return Err(CoreError::BadRequest(
                "poll options must not be empty".into(),
            ));
        }

        let mut registry = self.inner.write().await;
        let id = registry.next_id;
        registry.next_id += 1;
        registry.polls.insert(
            id,
            Poll {
                votes_by_option: vec![HashSet::new(); option_labels.len()],
                voter_choice: HashMap::new(),
                voter_profile: HashMap::new(),
                message: None,
                option_labels: option_labels.clone(),
            },
        );

        Ok(PollHandle {
            id,
            options: option_labels,
        })
    }

    /// Record the announcement message a poll was launched from.
    ///
    /// The reference is set once and owned by the poll until close.
    pub async fn attach_message(
        &self,
        poll_id: u64,
        channel_id: String,
        message_id: String,
    ) -> Result<(), CoreError> {
        let mut registry = self.inner.write().await;
        let poll = registry.polls.get_mut(&poll_id).ok_or(CoreError::NotFound)?;
        if poll.message.is_some() {
            return Err(CoreError::BadRequest(
                "announcement message already recorded".into(),
            ));
        }
        poll.message = Some(PollMessage {
            channel_id,
            message_id,
        });
        Ok(())
    }

    /// Move `voter_id`'s vote to `option_index`.
    ///
    /// A voter holds at most one active choice per poll: any previous vote
    /// is removed before the new one is inserted, so re-voting is a move,
    /// never an add. Unknown polls and out-of-range indices are rejected
    /// before anything is touched.
    pub async fn cast_vote(
        &self,
        poll_id: u64,
        voter_id: &str,
        profile: VoterProfile,
        option_index: usize,
    ) -> Result<(), CoreError> {
        let mut registry = self.inner.write().await;
        let poll = registry.polls.get_mut(&poll_id).ok_or(CoreError::NotFound)?;
        if option_index >= poll.option_labels.len() {
            return Err(CoreError::BadRequest(format!(
                "option index {option_index} out of range for {} options",
                poll.option_labels.len()
            )));
        }

        for voters in &mut poll.votes_by_option {
            voters.remove(voter_id);
        }
        poll.votes_by_option[option_index].insert(voter_id.to_string());
        poll.voter_choice.insert(voter_id.to_string(), option_index);
        poll.voter_profile.insert(voter_id.to_string(), profile);
        Ok(())
    }

    /// Point-in-time snapshot of a poll, or `None` if the id is unknown or
    /// the poll was already closed.
    pub async fn get_results(&self, poll_id: u64) -> Option<PollSnapshot> {
        let registry = self.inner.read().await;
        let poll = registry.polls.get(&poll_id)?;
        Some(PollSnapshot {
            poll_id,
            options: poll.option_labels.clone(),
            votes: poll.voter_choice.clone(),
            voters: poll
                .voter_profile
                .iter()
                .map(|(user_id, profile)| VoterEntry {
                    user_id: user_id.clone(),
                    username: profile.username.clone(),
                    avatar_url: profile.avatar_url.clone(),
                })
                .collect(),
        })
    }

    /// Remove a poll from the registry.
    ///
    /// The entry and its message reference disappear together. A second
    /// close of the same id reports `NotFound`.
    pub async fn close_poll(&self, poll_id: u64) -> Result<ClosedPoll, CoreError> {
        let mut registry = self.inner.write().await;
        let poll = registry.polls.remove(&poll_id).ok_or(CoreError::NotFound)?;
        Ok(ClosedPoll {
            id: poll_id,
            options: poll.option_labels,
            message: poll.message,
        })
    }

    #[cfg(test)]
    async fn option_voters(&self, poll_id: u64, option_index: usize) -> Option<Vec<String>> {
        let registry = self.inner.read().await;
        let poll = registry.polls.get(&poll_id)?;
        let voters = poll.votes_by_option.get(option_index)?;
        Some(voters.iter().cloned().collect())
    }
}

impl Default for PollStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(username: &str) -> VoterProfile {
        VoterProfile {
            username: username.to_string(),
            avatar_url: format!("https://cdn.example/{username}.png"),
        }
    }

    fn labels(options: &[&str]) -> Vec<String> {
        options.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn poll_ids_strictly_increase() {
        let store = PollStore::new();
        let first = store.create_poll(labels(&["A"])).await.unwrap();
        let second = store.create_poll(labels(&["B"])).await.unwrap();
        let third = store.create_poll(labels(&["C"])).await.unwrap();
        assert_eq!(first.id, 0);
        assert!(second.id > first.id);
        assert!(third.id > second.id);

        // Closing does not free the id for reuse.
        store.close_poll(second.id).await.unwrap();
        let fourth = store.create_poll(labels(&["D"])).await.unwrap();
        assert!(fourth.id > third.id);
    }

    #[tokio::test]
    async fn create_rejects_empty_input() {
        let store = PollStore::new();
        assert!(matches!(
            store.create_poll(Vec::new()).await,
            Err(CoreError::BadRequest(_))
        ));
        assert!(matches!(
            store.create_poll(labels(&["Red", "  "])).await,
            Err(CoreError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn revoting_moves_the_vote() {
        let store = PollStore::new();
        let poll = store.create_poll(labels(&["Red", "Blue", "Green"])).await.unwrap();

        for index in [1, 0, 2, 2] {
            store
                .cast_vote(poll.id, "u1", profile("Al"), index)
                .await
                .unwrap();
        }

        let snapshot = store.get_results(poll.id).await.unwrap();
        assert_eq!(snapshot.votes.get("u1"), Some(&2));

        // The voter appears in exactly one option's set: the last one.
        assert!(store.option_voters(poll.id, 0).await.unwrap().is_empty());
        assert!(store.option_voters(poll.id, 1).await.unwrap().is_empty());
        assert_eq!(
            store.option_voters(poll.id, 2).await.unwrap(),
            vec!["u1".to_string()]
        );
    }

    #[tokio::test]
    async fn repeated_vote_for_same_option_is_idempotent() {
        let store = PollStore::new();
        let poll = store.create_poll(labels(&["Red", "Blue"])).await.unwrap();

        store.cast_vote(poll.id, "u1", profile("Al"), 0).await.unwrap();
        store.cast_vote(poll.id, "u1", profile("Al"), 0).await.unwrap();

        assert_eq!(
            store.option_voters(poll.id, 0).await.unwrap(),
            vec!["u1".to_string()]
        );
        let snapshot = store.get_results(poll.id).await.unwrap();
        assert_eq!(snapshot.votes.len(), 1);
    }

    #[tokio::test]
    async fn out_of_range_vote_leaves_state_unchanged() {
        let store = PollStore::new();
        let poll = store.create_poll(labels(&["Red", "Blue"])).await.unwrap();
        store.cast_vote(poll.id, "u1", profile("Al"), 1).await.unwrap();

        let result = store.cast_vote(poll.id, "u1", profile("Al"), 2).await;
        assert!(matches!(result, Err(CoreError::BadRequest(_))));

        let snapshot = store.get_results(poll.id).await.unwrap();
        assert_eq!(snapshot.votes.get("u1"), Some(&1));
        assert_eq!(
            store.option_voters(poll.id, 1).await.unwrap(),
            vec!["u1".to_string()]
        );
    }

    #[tokio::test]
    async fn vote_on_unknown_poll_is_not_found() {
        let store = PollStore::new();
        let result = store.cast_vote(7, "u1", profile("Al"), 0).await;
        assert_eq!(result, Err(CoreError::NotFound));
    }

    #[tokio::test]
    async fn vote_overwrites_voter_profile() {
        let store = PollStore::new();
        let poll = store.create_poll(labels(&["Red", "Blue"])).await.unwrap();

        store.cast_vote(poll.id, "u1", profile("Al"), 0).await.unwrap();
        store.cast_vote(poll.id, "u1", profile("Alfred"), 1).await.unwrap();

        let snapshot = store.get_results(poll.id).await.unwrap();
        assert_eq!(snapshot.voters.len(), 1);
        assert_eq!(snapshot.voters[0].username, "Alfred");
    }

    #[tokio::test]
    async fn attach_message_is_set_once() {
        let store = PollStore::new();
        let poll = store.create_poll(labels(&["Red"])).await.unwrap();

        store
            .attach_message(poll.id, "chan".into(), "msg".into())
            .await
            .unwrap();
        let second = store
            .attach_message(poll.id, "chan".into(), "other".into())
            .await;
        assert!(matches!(second, Err(CoreError::BadRequest(_))));

        assert_eq!(
            store.attach_message(99, "chan".into(), "msg".into()).await,
            Err(CoreError::NotFound)
        );
    }

    #[tokio::test]
    async fn close_removes_poll_and_returns_message_ref() {
        let store = PollStore::new();
        let poll = store.create_poll(labels(&["Red", "Blue"])).await.unwrap();
        store
            .attach_message(poll.id, "chan-1".into(), "msg-1".into())
            .await
            .unwrap();

        let closed = store.close_poll(poll.id).await.unwrap();
        let message = closed.message.unwrap();
        assert_eq!(message.channel_id, "chan-1");
        assert_eq!(message.message_id, "msg-1");

        assert!(store.get_results(poll.id).await.is_none());
        assert!(matches!(
            store.close_poll(poll.id).await,
            Err(CoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn full_poll_lifecycle() {
        let store = PollStore::new();
        let poll = store.create_poll(labels(&["Red", "Blue"])).await.unwrap();
        assert_eq!(poll.id, 0);
        store
            .attach_message(0, "chan-1".into(), "msg-1".into())
            .await
            .unwrap();

        store.cast_vote(0, "u1", profile("Al"), 1).await.unwrap();
        let snapshot = store.get_results(0).await.unwrap();
        assert_eq!(snapshot.votes.get("u1"), Some(&1));

        store.cast_vote(0, "u1", profile("Al"), 0).await.unwrap();
        let snapshot = store.get_results(0).await.unwrap();
        assert_eq!(snapshot.votes.get("u1"), Some(&0));
        assert!(store.option_voters(0, 1).await.unwrap().is_empty());

        let closed = store.close_poll(0).await.unwrap();
        assert!(closed.message.is_some());
        assert!(store.get_results(0).await.is_none());
    }
}
