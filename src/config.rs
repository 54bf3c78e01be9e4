//! TOML configuration.
//!
//! Every section is optional; a missing file or section falls back to the
//! defaults returned by [`Config::minimal`].
//!
//! ```toml
//! [db]
//! path = "./data/resume_match_history.db"
//!
//! [extraction]
//! pdftoppm = "pdftoppm"
//! tesseract = "tesseract"
//! ocr_dpi = 200
//! ocr_timeout_secs = 120
//! max_concurrent_ocr = 2
//!
//! [skills]
//! match_mode = "token"          # or "phrase"
//! vocabulary = ["python", "sql", "machine learning"]
//!
//! [server]
//! bind = "127.0.0.1:7340"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::skills::{SkillMatchMode, DEFAULT_SKILLS};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub skills: SkillsConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./data/resume_match_history.db")
}

/// Settings for the OCR fallback path.
#[derive(Debug, Deserialize, Clone)]
pub struct ExtractionConfig {
    /// Executable used to rasterize PDF pages.
    #[serde(default = "default_pdftoppm")]
    pub pdftoppm: String,
    /// Executable used for optical character recognition.
    #[serde(default = "default_tesseract")]
    pub tesseract: String,
    #[serde(default = "default_ocr_dpi")]
    pub ocr_dpi: u32,
    /// Deadline for the whole OCR pass over one document.
    #[serde(default = "default_ocr_timeout_secs")]
    pub ocr_timeout_secs: u64,
    /// Upper bound on documents being rasterized at the same time.
    #[serde(default = "default_max_concurrent_ocr")]
    pub max_concurrent_ocr: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pdftoppm: default_pdftoppm(),
            tesseract: default_tesseract(),
            ocr_dpi: default_ocr_dpi(),
            ocr_timeout_secs: default_ocr_timeout_secs(),
            max_concurrent_ocr: default_max_concurrent_ocr(),
        }
    }
}

fn default_pdftoppm() -> String {
    "pdftoppm".to_string()
}
fn default_tesseract() -> String {
    "tesseract".to_string()
}
fn default_ocr_dpi() -> u32 {
    200
}
fn default_ocr_timeout_secs() -> u64 {
    120
}
fn default_max_concurrent_ocr() -> usize {
    2
}

#[derive(Debug, Deserialize, Clone)]
pub struct SkillsConfig {
    #[serde(default = "default_match_mode")]
    pub match_mode: String,
    #[serde(default = "default_vocabulary")]
    pub vocabulary: Vec<String>,
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            match_mode: default_match_mode(),
            vocabulary: default_vocabulary(),
        }
    }
}

fn default_match_mode() -> String {
    "token".to_string()
}
fn default_vocabulary() -> Vec<String> {
    DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect()
}

impl SkillsConfig {
    /// Parsed form of `match_mode`. Only valid after [`load_config`] validation.
    pub fn mode(&self) -> SkillMatchMode {
        SkillMatchMode::parse(&self.match_mode).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

impl Config {
    /// Built-in defaults, used when no config file is present.
    pub fn minimal() -> Self {
        Self::default()
    }
}

/// Load the config at `path`, or the defaults if the file does not exist.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::minimal())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.extraction.ocr_dpi == 0 {
        anyhow::bail!("extraction.ocr_dpi must be > 0");
    }
    if config.extraction.ocr_timeout_secs == 0 {
        anyhow::bail!("extraction.ocr_timeout_secs must be >= 1");
    }
    if config.extraction.max_concurrent_ocr == 0 {
        anyhow::bail!("extraction.max_concurrent_ocr must be >= 1");
    }
    if SkillMatchMode::parse(&config.skills.match_mode).is_none() {
        anyhow::bail!(
            "Unknown skills.match_mode: '{}'. Must be token or phrase.",
            config.skills.match_mode
        );
    }
    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }
    Ok(())
}
