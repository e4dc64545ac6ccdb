//! Review session state machine.
//!
//! A session walks a filtered queue of one set's cards, forward only,
//! recording an outcome for every card. It is ephemeral: never
//! persisted, fully replaced by the next `start`.

use anyhow::Result;
use thiserror::Error;
use tracing::info;

use crate::domain::{CardStatus, Flashcard};
use crate::store::VocabularyStore;

/// Which cards go into the review queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewMode {
    /// Every card in the set
    All,

    /// Only cards not yet learned
    LearningOnly,
}

/// The user's verdict on one card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Still working on it
    Learning,

    /// Got it
    Learned,
}

impl ReviewOutcome {
    fn status(self) -> CardStatus {
        match self {
            ReviewOutcome::Learning => CardStatus::Learning,
            ReviewOutcome::Learned => CardStatus::Learned,
        }
    }
}

/// Session failures. None of these change session state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    /// The requested mode selected no cards
    #[error("nothing to review in this set")]
    EmptyQueue,

    /// No set with that id exists
    #[error("unknown set: {0}")]
    UnknownSet(String),

    /// `record_outcome` called outside of `Reviewing`
    #[error("no review in progress")]
    NotReviewing,
}

/// Lifecycle state of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Reviewing {
        set_id: String,
        queue: Vec<String>,
        index: usize,
    },
    Completed,
}

/// What `record_outcome` reports back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewProgress {
    /// Moved to the next card; `remaining` counts cards still queued
    Next { remaining: usize },

    /// That was the last card
    Completed,
}

/// A swipe-driven walk over one set's cards.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    state: SessionState,
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewSession {
    /// Create an idle session
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Begin reviewing a set. On failure the previous state is kept.
    ///
    /// Returns the queue length.
    pub fn start(
        &mut self,
        store: &VocabularyStore,
        set_id: &str,
        mode: ReviewMode,
    ) -> Result<usize, ReviewError> {
        let set = store
            .get(set_id)
            .ok_or_else(|| ReviewError::UnknownSet(set_id.to_string()))?;

        let queue: Vec<String> = set
            .cards
            .iter()
            .filter(|card| match mode {
                ReviewMode::All => true,
                ReviewMode::LearningOnly => card.status != CardStatus::Learned,
            })
            .map(|card| card.id.clone())
            .collect();

        if queue.is_empty() {
            return Err(ReviewError::EmptyQueue);
        }

        let len = queue.len();
        info!(set_id, cards = len, "Review session started");

        self.state = SessionState::Reviewing {
            set_id: set_id.to_string(),
            queue,
            index: 0,
        };
        Ok(len)
    }

    /// Id of the card under the cursor
    pub fn current_card_id(&self) -> Option<&str> {
        match &self.state {
            SessionState::Reviewing { queue, index, .. } => queue.get(*index).map(String::as_str),
            _ => None,
        }
    }

    /// Card under the cursor, resolved against the store
    pub fn current_card<'s>(&self, store: &'s VocabularyStore) -> Option<&'s Flashcard> {
        match &self.state {
            SessionState::Reviewing { set_id, queue, index } => {
                store.get(set_id)?.card(queue.get(*index)?)
            }
            _ => None,
        }
    }

    /// Zero-based cursor position and queue length
    pub fn position(&self) -> Option<(usize, usize)> {
        match &self.state {
            SessionState::Reviewing { queue, index, .. } => Some((*index, queue.len())),
            _ => None,
        }
    }

    /// Record the outcome for the current card and advance.
    ///
    /// Valid only while `Reviewing`. The outcome is written through the
    /// store before the cursor moves; there is no way to skip a card or
    /// go back.
    pub async fn record_outcome(
        &mut self,
        store: &mut VocabularyStore,
        outcome: ReviewOutcome,
    ) -> Result<ReviewProgress> {
        let (set_id, queue, index) = match &mut self.state {
            SessionState::Reviewing {
                set_id,
                queue,
                index,
            } => (set_id.clone(), queue.clone(), index),
            _ => return Err(ReviewError::NotReviewing.into()),
        };

        store
            .update_card_status(&set_id, &queue[*index], outcome.status())
            .await?;

        if *index + 1 >= queue.len() {
            info!(set_id, "Review session completed");
            self.state = SessionState::Completed;
            return Ok(ReviewProgress::Completed);
        }

        *index += 1;
        Ok(ReviewProgress::Next {
            remaining: queue.len() - *index,
        })
    }

    /// Abandon the session, returning to `Idle`.
    pub fn cancel(&mut self) {
        self.state = SessionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VideoSet;
    use crate::extract::{Extraction, VocabEntry};
    use tempfile::TempDir;

    fn entry(word: &str) -> VocabEntry {
        VocabEntry {
            word: word.to_string(),
            part_of_speech: Some("n.".to_string()),
            level: None,
            translation: "字".to_string(),
            example: "Example.".to_string(),
        }
    }

    async fn store_with_words(temp: &TempDir, words: &[&str]) -> (VocabularyStore, String) {
        let mut store = VocabularyStore::load(temp.path().join("sets.json")).await;
        let set = VideoSet::from_extraction(
            "https://youtube.com/watch?v=abc123",
            Extraction {
                title: "T".to_string(),
                summary: "S".to_string(),
                vocabulary: words.iter().map(|w| entry(w)).collect(),
                sources: vec![],
            },
        );
        let set_id = set.id.clone();
        store.add_set(set).await.unwrap();
        (store, set_id)
    }

    #[tokio::test]
    async fn test_completes_on_nth_outcome_exactly() {
        let temp = TempDir::new().unwrap();
        let (mut store, set_id) = store_with_words(&temp, &["a", "b", "c"]).await;

        let mut session = ReviewSession::new();
        assert_eq!(session.start(&store, &set_id, ReviewMode::All), Ok(3));

        let p1 = session
            .record_outcome(&mut store, ReviewOutcome::Learned)
            .await
            .unwrap();
        assert_eq!(p1, ReviewProgress::Next { remaining: 2 });

        let p2 = session
            .record_outcome(&mut store, ReviewOutcome::Learning)
            .await
            .unwrap();
        assert_eq!(p2, ReviewProgress::Next { remaining: 1 });

        let p3 = session
            .record_outcome(&mut store, ReviewOutcome::Learned)
            .await
            .unwrap();
        assert_eq!(p3, ReviewProgress::Completed);
        assert_eq!(session.state(), &SessionState::Completed);

        // Terminal until a fresh start
        let after = session
            .record_outcome(&mut store, ReviewOutcome::Learned)
            .await;
        assert!(after.is_err());
    }

    #[tokio::test]
    async fn test_outcomes_written_through_store() {
        let temp = TempDir::new().unwrap();
        let (mut store, set_id) = store_with_words(&temp, &["a", "b"]).await;

        let mut session = ReviewSession::new();
        session.start(&store, &set_id, ReviewMode::All).unwrap();

        session
            .record_outcome(&mut store, ReviewOutcome::Learned)
            .await
            .unwrap();
        session
            .record_outcome(&mut store, ReviewOutcome::Learning)
            .await
            .unwrap();

        let cards = &store.get(&set_id).unwrap().cards;
        assert_eq!(cards[0].status, CardStatus::Learned);
        assert_eq!(cards[1].status, CardStatus::Learning);
    }

    #[tokio::test]
    async fn test_learning_only_filters_learned() {
        let temp = TempDir::new().unwrap();
        let (mut store, set_id) = store_with_words(&temp, &["a", "b", "c"]).await;

        let learned_id = store.get(&set_id).unwrap().cards[1].id.clone();
        store
            .update_card_status(&set_id, &learned_id, CardStatus::Learned)
            .await
            .unwrap();

        let mut session = ReviewSession::new();
        assert_eq!(
            session.start(&store, &set_id, ReviewMode::LearningOnly),
            Ok(2)
        );

        // Original order preserved, learned card skipped
        assert_eq!(session.current_card(&store).unwrap().word, "a");
        session
            .record_outcome(&mut store, ReviewOutcome::Learning)
            .await
            .unwrap();
        assert_eq!(session.current_card(&store).unwrap().word, "c");
    }

    #[tokio::test]
    async fn test_empty_queue_preserves_state() {
        let temp = TempDir::new().unwrap();
        let (mut store, set_id) = store_with_words(&temp, &["a"]).await;

        let card_id = store.get(&set_id).unwrap().cards[0].id.clone();
        store
            .update_card_status(&set_id, &card_id, CardStatus::Learned)
            .await
            .unwrap();

        let mut session = ReviewSession::new();
        assert_eq!(
            session.start(&store, &set_id, ReviewMode::LearningOnly),
            Err(ReviewError::EmptyQueue)
        );
        assert_eq!(session.state(), &SessionState::Idle);

        // Also from Completed
        session.start(&store, &set_id, ReviewMode::All).unwrap();
        session
            .record_outcome(&mut store, ReviewOutcome::Learned)
            .await
            .unwrap();
        assert_eq!(session.state(), &SessionState::Completed);
        assert_eq!(
            session.start(&store, &set_id, ReviewMode::LearningOnly),
            Err(ReviewError::EmptyQueue)
        );
        assert_eq!(session.state(), &SessionState::Completed);
    }

    #[tokio::test]
    async fn test_unknown_set() {
        let temp = TempDir::new().unwrap();
        let (store, _) = store_with_words(&temp, &["a"]).await;

        let mut session = ReviewSession::new();
        assert_eq!(
            session.start(&store, "nope", ReviewMode::All),
            Err(ReviewError::UnknownSet("nope".to_string()))
        );
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[tokio::test]
    async fn test_fresh_start_replaces_session() {
        let temp = TempDir::new().unwrap();
        let (mut store, set_id) = store_with_words(&temp, &["a", "b"]).await;

        let mut session = ReviewSession::new();
        session.start(&store, &set_id, ReviewMode::All).unwrap();
        session
            .record_outcome(&mut store, ReviewOutcome::Learning)
            .await
            .unwrap();

        session.start(&store, &set_id, ReviewMode::All).unwrap();
        assert_eq!(session.position(), Some((0, 2)));
        assert_eq!(session.current_card(&store).unwrap().word, "a");
    }
}
