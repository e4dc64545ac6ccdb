//! vocabmaster - AI-assisted vocabulary flashcards from videos
//!
//! Core modules:
//! - `domain`: flashcards, video sets, and their invariants
//! - `extract`: completion backend, prompting, retry, and response parsing
//! - `store`: the persisted collection of video sets
//! - `review`: the review session state machine
//! - `config`: paths, service settings, and credentials
//! - `cli`: command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod extract;
pub mod review;
pub mod store;

pub use domain::{CardDraft, CardStatus, Flashcard, GroundingSource, VideoSet};
pub use extract::{
    CompletionBackend, CompletionRequest, CompletionResponse, ExtractError, Extraction,
    ExtractionRequest, GeminiBackend, Orchestrator, RetryEvent, RetryPolicy, TranscriptClient,
    VocabEntry,
};
pub use review::{ReviewMode, ReviewOutcome, ReviewProgress, ReviewSession, SessionState};
pub use store::{StoreError, VocabularyStore};
