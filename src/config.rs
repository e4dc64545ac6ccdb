//! Configuration for vocabmaster paths and services.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variable (VOCABMASTER_HOME)
//! 2. Config file (~/.vocabmaster/config.yaml)
//! 3. Defaults (~/.vocabmaster, the public Gemini endpoint)
//!
//! Credentials are stored in a separate JSON blob and are always passed
//! explicitly into the components that use them; nothing reads them
//! from ambient state.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::warn;

use crate::extract::RetryPolicy;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Completion model name
    pub model: Option<String>,

    /// Completion API base URL
    pub api_base: Option<String>,

    /// Transcript companion service endpoint
    pub transcript_endpoint: Option<String>,

    /// Retry tuning for rate-limited completion calls
    #[serde(default)]
    pub retry: Option<RetryPolicy>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to the vocabmaster home directory
    pub home: PathBuf,

    /// Completion model name, if overridden
    pub model: Option<String>,

    /// Completion API base URL, if overridden
    pub api_base: Option<String>,

    /// Transcript endpoint; absent means transcript fetch is skipped
    pub transcript_endpoint: Option<String>,

    /// Retry policy for the extraction orchestrator
    pub retry: RetryPolicy,

    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Path of the persisted VideoSet collection
    pub fn store_path(&self) -> PathBuf {
        self.home.join("sets.json")
    }

    /// Path of the persisted credential blob
    pub fn credentials_path(&self) -> PathBuf {
        self.home.join("credentials.json")
    }
}

/// Load and parse a config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let home = if let Ok(env_home) = std::env::var("VOCABMASTER_HOME") {
        PathBuf::from(env_home)
    } else {
        dirs::home_dir()
            .context("Failed to determine home directory")?
            .join(".vocabmaster")
    };

    let config_path = home.join("config.yaml");
    let (file, config_file) = if config_path.exists() {
        (load_config_file(&config_path)?, Some(config_path))
    } else {
        (ConfigFile::default(), None)
    };

    Ok(ResolvedConfig {
        home,
        model: file.model,
        api_base: file.api_base,
        transcript_endpoint: file.transcript_endpoint,
        retry: file.retry.unwrap_or_default(),
        config_file,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

/// Opaque credential strings for the external services.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// Completion service API key
    pub gemini_api_key: Option<String>,

    /// Secondary credential for the transcript service
    pub transcript_api_key: Option<String>,
}

impl Credentials {
    /// Load credentials from disk.
    ///
    /// Missing or corrupt blobs yield empty credentials; a corrupt blob
    /// is logged.
    pub async fn load(path: &Path) -> Self {
        match fs::read_to_string(path).await {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(credentials) => credentials,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Credential blob is corrupt, ignoring"
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Save credentials to disk
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write credentials: {}", path.display()))?;

        Ok(())
    }
}
