//! VideoSet entity: the result of one extraction run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::Extraction;

use super::card::Flashcard;

/// A citation the completion service reported as supporting evidence.
///
/// Purely informational; never required for correctness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub url: String,
}

/// One extraction run's worth of vocabulary: title, summary, cards,
/// and the citations that backed them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSet {
    /// Globally unique, assigned at generation time
    pub id: String,

    /// Source video reference
    pub url: String,

    /// Display title (detected by the model or supplied by the user)
    pub title: String,

    /// Summary of the video content (not necessarily a literal transcript)
    pub transcript: String,

    /// Insertion-ordered cards; append-only except in-place status edits
    pub cards: Vec<Flashcard>,

    /// Citations from search grounding, if any
    #[serde(default)]
    pub sources: Vec<GroundingSource>,

    /// Immutable creation timestamp
    pub created_at: DateTime<Utc>,
}

impl VideoSet {
    /// Build a set from a validated extraction result.
    ///
    /// All cards are minted in one batch against the set's creation
    /// timestamp, so their ids are unique within the set.
    pub fn from_extraction(url: impl Into<String>, extraction: Extraction) -> Self {
        let created_at = Utc::now();
        let cards = extraction
            .vocabulary
            .into_iter()
            .enumerate()
            .map(|(i, entry)| Flashcard::from_entry(entry, created_at, i))
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            title: extraction.title,
            transcript: extraction.summary,
            cards,
            sources: extraction.sources,
            created_at,
        }
    }

    /// Look up a card by id.
    pub fn card(&self, card_id: &str) -> Option<&Flashcard> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    /// Number of cards with `Learned` status.
    pub fn learned_count(&self) -> usize {
        self.cards
            .iter()
            .filter(|c| c.status == super::card::CardStatus::Learned)
            .count()
    }
}
