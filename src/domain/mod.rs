//! Domain types for vocabmaster.
//!
//! This module contains the core data structures:
//! - Flashcard: A single vocabulary item with review status
//! - VideoSet: One extraction run (title, summary, cards, citations)
//! - GroundingSource: A citation backing an extraction

pub mod card;
pub mod set;

// Re-export commonly used types
pub use card::{CardDraft, CardStatus, Flashcard};
pub use set::{GroundingSource, VideoSet};
