//! Vocabulary store: the ordered collection of video sets.
//!
//! JSON-file backed, newest-first. Every mutating operation rewrites
//! the whole collection to disk; a corrupt blob at startup falls back
//! to an empty store rather than failing.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};

use crate::domain::{CardDraft, CardStatus, Flashcard, VideoSet};

/// Store-level rejections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Import payload was not a JSON array of the expected shape
    #[error("import payload must be a JSON array of video sets")]
    ImportFormatInvalid,

    /// Manual card drafts need a word and a translation
    #[error("a manual card requires a non-empty word and translation")]
    EmptyDraft,
}

/// Process-wide vocabulary state, persisted to a single JSON file.
pub struct VocabularyStore {
    path: PathBuf,
    sets: Vec<VideoSet>,
}

impl VocabularyStore {
    /// Load the store from disk.
    ///
    /// A missing file yields an empty store; a corrupt file is logged
    /// and also yields an empty store.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let sets = match fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(sets) => sets,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Stored collection is corrupt, starting empty"
                    );
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        Self { path, sets }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All sets, newest-first
    pub fn sets(&self) -> &[VideoSet] {
        &self.sets
    }

    /// Look up a set by id
    pub fn get(&self, set_id: &str) -> Option<&VideoSet> {
        self.sets.iter().find(|s| s.id == set_id)
    }

    /// Number of sets
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Prepend a freshly generated set.
    ///
    /// Set ids are generation-time unique, so no collision check is
    /// needed here.
    pub async fn add_set(&mut self, set: VideoSet) -> Result<()> {
        self.sets.insert(0, set);
        self.save().await
    }

    /// Delete a set by id. Missing ids are a silent no-op.
    pub async fn delete_set(&mut self, set_id: &str) -> Result<bool> {
        let before = self.sets.len();
        self.sets.retain(|s| s.id != set_id);

        if self.sets.len() == before {
            return Ok(false);
        }
        self.save().await?;
        Ok(true)
    }

    /// Replace one card's status, leaving everything else untouched.
    ///
    /// Missing set or card ids are a silent no-op, which keeps
    /// concurrent-edit races harmless.
    pub async fn update_card_status(
        &mut self,
        set_id: &str,
        card_id: &str,
        status: CardStatus,
    ) -> Result<bool> {
        let card = self
            .sets
            .iter_mut()
            .find(|s| s.id == set_id)
            .and_then(|s| s.cards.iter_mut().find(|c| c.id == card_id));

        match card {
            Some(card) => {
                card.status = status;
                self.save().await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Append a manually authored card to a set.
    ///
    /// Returns the new card's id, or `None` when the set is missing.
    pub async fn add_manual_card(
        &mut self,
        set_id: &str,
        draft: CardDraft,
    ) -> Result<Option<String>> {
        if draft.word.trim().is_empty() || draft.translation.trim().is_empty() {
            return Err(StoreError::EmptyDraft.into());
        }

        let set = match self.sets.iter_mut().find(|s| s.id == set_id) {
            Some(set) => set,
            None => return Ok(None),
        };

        let card = Flashcard::manual(draft, Utc::now(), set.cards.len());
        let card_id = card.id.clone();
        set.cards.push(card);

        self.save().await?;
        Ok(Some(card_id))
    }

    /// Merge an imported collection into the store.
    ///
    /// Only sets whose id is not already present are prepended, in
    /// their incoming order. An id collision means "already have it" —
    /// the existing set is never mutated or replaced. Returns how many
    /// sets were added.
    pub async fn import_merge(&mut self, incoming: Vec<VideoSet>) -> Result<usize> {
        let existing: HashSet<String> = self.sets.iter().map(|s| s.id.clone()).collect();

        let fresh: Vec<VideoSet> = incoming
            .into_iter()
            .filter(|s| !existing.contains(&s.id))
            .collect();

        let added = fresh.len();
        if added == 0 {
            return Ok(0);
        }

        self.sets.splice(0..0, fresh);
        self.save().await?;

        info!(added, total = self.sets.len(), "Imported video sets");
        Ok(added)
    }

    /// Full serializable copy of the collection
    pub fn export_snapshot(&self) -> Vec<VideoSet> {
        self.sets.clone()
    }

    /// Export the collection as pretty-printed JSON
    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.sets).context("Failed to serialize collection")
    }

    /// Parse a bulk-import payload.
    ///
    /// The top-level value must be a JSON array of the VideoSet shape;
    /// anything else is rejected without touching the store.
    pub fn parse_import(json: &str) -> Result<Vec<VideoSet>, StoreError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|_| StoreError::ImportFormatInvalid)?;

        if !value.is_array() {
            return Err(StoreError::ImportFormatInvalid);
        }

        serde_json::from_value(value).map_err(|_| StoreError::ImportFormatInvalid)
    }

    /// Rewrite the whole collection to disk
    async fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(&self.sets)?;
        fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write store: {}", self.path.display()))?;

        Ok(())
    }
}
