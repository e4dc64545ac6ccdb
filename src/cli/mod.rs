//! Command-line interface for vocabmaster.
//!
//! Provides commands for extracting vocabulary from videos, browsing
//! and editing the collection, reviewing cards, bulk import/export,
//! and credential management.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;

use crate::config::{self, Credentials};
use crate::domain::{CardDraft, VideoSet};
use crate::extract::{
    ExtractError, ExtractionRequest, GeminiBackend, Orchestrator, TranscriptClient,
};
use crate::store::VocabularyStore;

pub mod review;

/// vocabmaster - AI-assisted vocabulary flashcards from videos
#[derive(Parser, Debug)]
#[command(name = "vocabmaster")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract vocabulary from a video URL into a new set
    Extract {
        /// Video URL to analyze
        url: String,

        /// Skip the transcript lookup and go straight to search mode
        #[arg(long)]
        no_transcript: bool,

        /// Read the transcript from a local file instead of fetching it
        #[arg(long)]
        transcript_file: Option<PathBuf>,
    },

    /// List video sets in the collection
    List {
        /// Maximum number of sets to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show one set with all of its cards
    Show {
        /// Set ID
        set_id: String,
    },

    /// Review a set's cards interactively
    Review {
        /// Set ID
        set_id: String,

        /// Only review cards that are not yet learned
        #[arg(long)]
        learning_only: bool,
    },

    /// Add a card to a set by hand
    AddCard {
        /// Set ID
        set_id: String,

        /// The word itself
        #[arg(short, long)]
        word: String,

        /// Translation
        #[arg(short, long)]
        translation: String,

        /// Part of speech (n., v., adj., ...)
        #[arg(short, long)]
        pos: Option<String>,

        /// Example sentence
        #[arg(short, long)]
        example: Option<String>,
    },

    /// Delete a set
    Delete {
        /// Set ID
        set_id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Export the full collection as JSON
    Export {
        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import sets from a JSON export, skipping ones already present
    Import {
        /// Input file
        input: PathBuf,
    },

    /// Store an API credential (read from stdin)
    SetKey {
        /// Which service the key belongs to
        service: KeyService,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Credential targets for `set-key`
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KeyService {
    /// Completion service key
    Gemini,

    /// Transcript service key
    Transcript,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Extract {
                url,
                no_transcript,
                transcript_file,
            } => extract(&url, no_transcript, transcript_file).await,
            Commands::List { limit } => list_sets(limit).await,
            Commands::Show { set_id } => show_set(&set_id).await,
            Commands::Review {
                set_id,
                learning_only,
            } => review::run_review(&set_id, learning_only).await,
            Commands::AddCard {
                set_id,
                word,
                translation,
                pos,
                example,
            } => add_card(&set_id, word, translation, pos, example).await,
            Commands::Delete { set_id, yes } => delete_set(&set_id, yes).await,
            Commands::Export { output } => export_sets(output).await,
            Commands::Import { input } => import_sets(&input).await,
            Commands::SetKey { service } => set_key(service).await,
            Commands::Config => show_config(),
        }
    }
}

/// Open the store at the configured path
pub(crate) async fn open_store() -> Result<VocabularyStore> {
    let cfg = config::config()?;
    Ok(VocabularyStore::load(cfg.store_path()).await)
}

async fn extract(url: &str, no_transcript: bool, transcript_file: Option<PathBuf>) -> Result<()> {
    let cfg = config::config()?;
    let credentials = Credentials::load(&cfg.credentials_path()).await;

    let api_key = credentials
        .gemini_api_key
        .clone()
        .ok_or(ExtractError::MissingCredential)?;

    // Transcript lookup: explicit file > companion service > none.
    // Unavailable transcripts are not fatal; search mode covers them.
    let transcript = if let Some(ref path) = transcript_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript file: {}", path.display()))?;
        Some(text)
    } else if no_transcript {
        None
    } else if let Some(ref endpoint) = cfg.transcript_endpoint {
        let client = TranscriptClient::new(endpoint.clone());
        match client
            .fetch(url, credentials.transcript_api_key.as_deref())
            .await
        {
            Ok(info) => {
                if info.transcript.is_none() {
                    println!("No transcript available, falling back to search mode");
                }
                info.transcript
            }
            Err(e) => {
                warn!(error = %e, "Transcript fetch failed, falling back to search mode");
                None
            }
        }
    } else {
        None
    };

    let mut backend = GeminiBackend::new(api_key);
    if let Some(ref model) = cfg.model {
        backend = backend.with_model(model.clone());
    }
    if let Some(ref base) = cfg.api_base {
        backend = backend.with_api_base(base.clone());
    }

    let orchestrator = Orchestrator::new(backend).with_retry_policy(cfg.retry.clone());

    let request = ExtractionRequest {
        video_url: url.to_string(),
        transcript,
    };

    println!("Analyzing {}...", url);
    let extraction = orchestrator
        .extract_with_progress(&request, |event| {
            println!(
                "  Rate limited, retrying (attempt {}) in {:?}...",
                event.attempt, event.delay
            );
        })
        .await?;

    let set = VideoSet::from_extraction(url, extraction);

    println!();
    println!("{}", set.title);
    println!("  {} cards, {} sources", set.cards.len(), set.sources.len());
    println!("  {}", set.transcript);
    for source in &set.sources {
        println!("  [{}] {}", source.title, source.url);
    }

    let set_id = set.id.clone();
    let mut store = open_store().await?;
    store.add_set(set).await?;
    println!();
    println!("Saved as set {}", set_id);

    Ok(())
}

async fn list_sets(limit: usize) -> Result<()> {
    let store = open_store().await?;

    if store.is_empty() {
        println!("No vocabulary sets yet. Try: vocabmaster extract <url>");
        return Ok(());
    }

    println!("Vocabulary sets ({}):", store.len());
    for set in store.sets().iter().take(limit) {
        println!(
            "  {}  {}  [{} cards, {} learned]  {}",
            set.id,
            set.created_at.format("%Y-%m-%d"),
            set.cards.len(),
            set.learned_count(),
            set.title
        );
    }

    Ok(())
}

async fn show_set(set_id: &str) -> Result<()> {
    let store = open_store().await?;
    let set = store
        .get(set_id)
        .with_context(|| format!("No set with id {}", set_id))?;

    println!("{}", set.title);
    println!("  {}", set.url);
    println!("  {}", set.transcript);
    println!();

    for card in &set.cards {
        let descriptor = card
            .part_of_speech
            .as_deref()
            .or(card.level.as_deref())
            .unwrap_or("-");
        let tag = if card.manual { " (manual)" } else { "" };
        println!(
            "  [{}] {} ({}) — {}{}",
            card.status, card.word, descriptor, card.translation, tag
        );
        if !card.example.is_empty() {
            println!("      {}", card.example);
        }
    }

    if !set.sources.is_empty() {
        println!();
        println!("Sources:");
        for source in &set.sources {
            println!("  {} — {}", source.title, source.url);
        }
    }

    Ok(())
}

async fn add_card(
    set_id: &str,
    word: String,
    translation: String,
    pos: Option<String>,
    example: Option<String>,
) -> Result<()> {
    let mut store = open_store().await?;

    let draft = CardDraft {
        word,
        part_of_speech: pos,
        translation,
        example,
    };

    match store.add_manual_card(set_id, draft).await? {
        Some(card_id) => println!("Added card {}", card_id),
        None => println!("No set with id {}", set_id),
    }

    Ok(())
}

async fn delete_set(set_id: &str, yes: bool) -> Result<()> {
    let mut store = open_store().await?;

    let title = match store.get(set_id) {
        Some(set) => set.title.clone(),
        None => {
            println!("No set with id {}", set_id);
            return Ok(());
        }
    };

    if !yes {
        print!("Delete set \"{}\"? [y/N] ", title);
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            println!("Aborted");
            return Ok(());
        }
    }

    store.delete_set(set_id).await?;
    println!("Deleted {}", set_id);

    Ok(())
}

async fn export_sets(output: Option<PathBuf>) -> Result<()> {
    let store = open_store().await?;
    let json = store.export_json()?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, &json)
                .await
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            println!("Exported {} sets to {}", store.len(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

async fn import_sets(input: &PathBuf) -> Result<()> {
    let content = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read import file: {}", input.display()))?;

    let incoming = VocabularyStore::parse_import(&content)?;

    let mut store = open_store().await?;
    let added = store.import_merge(incoming).await?;
    println!("Imported {} new sets ({} total)", added, store.len());

    Ok(())
}

async fn set_key(service: KeyService) -> Result<()> {
    let cfg = config::config()?;

    print!("Paste the API key: ");
    io::stdout().flush()?;

    let mut key = String::new();
    io::stdin().lock().read_line(&mut key)?;
    let key = key.trim().to_string();
    if key.is_empty() {
        anyhow::bail!("Empty key, nothing stored");
    }

    let path = cfg.credentials_path();
    let mut credentials = Credentials::load(&path).await;
    match service {
        KeyService::Gemini => credentials.gemini_api_key = Some(key),
        KeyService::Transcript => credentials.transcript_api_key = Some(key),
    }
    credentials.save(&path).await?;

    println!("Credential stored in {}", path.display());
    Ok(())
}

fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("home:                {}", cfg.home.display());
    println!("store:               {}", cfg.store_path().display());
    println!("credentials:         {}", cfg.credentials_path().display());
    println!(
        "config file:         {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!(
        "model:               {}",
        cfg.model.as_deref().unwrap_or("(default)")
    );
    println!(
        "transcript endpoint: {}",
        cfg.transcript_endpoint.as_deref().unwrap_or("(none)")
    );
    println!(
        "retry:               {} attempts, {}ms base delay",
        cfg.retry.max_attempts, cfg.retry.initial_delay_ms
    );

    Ok(())
}
