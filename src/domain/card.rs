//! Flashcard entity and card minting.
//!
//! Cards are minted from validated vocabulary entries by a pure
//! transform: the mint timestamp and batch position are parameters, so
//! the same inputs always produce the same card.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extract::VocabEntry;

/// Review status of a flashcard.
///
/// Status only changes through an explicit review outcome or a manual
/// edit, never implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    /// Never reviewed
    New,

    /// Seen at least once, not yet mastered
    Learning,

    /// Mastered
    Learned,
}

impl Default for CardStatus {
    fn default() -> Self {
        Self::New
    }
}

impl std::fmt::Display for CardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardStatus::New => write!(f, "new"),
            CardStatus::Learning => write!(f, "learning"),
            CardStatus::Learned => write!(f, "learned"),
        }
    }
}

/// A single vocabulary item with review status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    /// Unique within the owning set; never reused
    pub id: String,

    /// The vocabulary word itself
    pub word: String,

    /// Part-of-speech tag (canonical descriptor field)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,

    /// Difficulty-level tag (alternate descriptor some pipelines emit)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Translation in the learner's language
    pub translation: String,

    /// Example sentence, ideally taken from the source video
    pub example: String,

    /// Current review status
    #[serde(default)]
    pub status: CardStatus,

    /// Phonetic transcription, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,

    /// True for cards the user added by hand (as opposed to extracted)
    #[serde(default)]
    pub manual: bool,
}

impl Flashcard {
    /// Mint a card from a validated extraction entry.
    ///
    /// The id is derived from the batch mint time plus the entry's
    /// position in the batch, which keeps it unique within the batch.
    pub fn from_entry(entry: VocabEntry, minted_at: DateTime<Utc>, index: usize) -> Self {
        Self {
            id: format!("card-{}-{}", minted_at.timestamp_millis(), index),
            word: entry.word,
            part_of_speech: entry.part_of_speech,
            level: entry.level,
            translation: entry.translation,
            example: entry.example,
            status: CardStatus::New,
            phonetic: None,
            manual: false,
        }
    }

    /// Mint a manually authored card.
    ///
    /// `position` is the card's slot in the target set, used the same
    /// way as the batch index to keep ids unique.
    pub fn manual(draft: CardDraft, minted_at: DateTime<Utc>, position: usize) -> Self {
        Self {
            id: format!("card-{}-{}", minted_at.timestamp_millis(), position),
            word: draft.word,
            part_of_speech: draft.part_of_speech,
            level: None,
            translation: draft.translation,
            example: draft.example.unwrap_or_default(),
            status: CardStatus::New,
            phonetic: None,
            manual: true,
        }
    }
}

/// User-supplied fields for a manually added card.
///
/// `word` and `translation` are required by the store; the rest is
/// optional.
#[derive(Debug, Clone, Default)]
pub struct CardDraft {
    pub word: String,
    pub part_of_speech: Option<String>,
    pub translation: String,
    pub example: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(word: &str) -> VocabEntry {
        VocabEntry {
            word: word.to_string(),
            part_of_speech: Some("adj.".to_string()),
            level: None,
            translation: "短暫的".to_string(),
            example: "It was an ephemeral moment.".to_string(),
        }
    }

    #[test]
    fn test_card_from_entry() {
        let minted = Utc::now();
        let card = Flashcard::from_entry(entry("ephemeral"), minted, 3);

        assert_eq!(card.id, format!("card-{}-3", minted.timestamp_millis()));
        assert_eq!(card.word, "ephemeral");
        assert_eq!(card.status, CardStatus::New);
        assert!(!card.manual);
    }

    #[test]
    fn test_batch_ids_unique() {
        let minted = Utc::now();
        let a = Flashcard::from_entry(entry("one"), minted, 0);
        let b = Flashcard::from_entry(entry("two"), minted, 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_manual_card_flagged() {
        let draft = CardDraft {
            word: "perspective".to_string(),
            part_of_speech: Some("n.".to_string()),
            translation: "觀點".to_string(),
            example: None,
        };
        let card = Flashcard::manual(draft, Utc::now(), 12);

        assert!(card.manual);
        assert_eq!(card.status, CardStatus::New);
        assert_eq!(card.example, "");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&CardStatus::Learned).unwrap();
        assert_eq!(json, "\"learned\"");
    }
}
