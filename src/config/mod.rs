//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `PLAGIAT_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::{Path, PathBuf};

use crate::analysis::AnalysisOptions;
use crate::constants::{
    DEFAULT_EMBED_BATCH_SIZE, DEFAULT_MIN_FILE_BYTES, DEFAULT_MIN_SENTENCE_TOKENS,
    DEFAULT_MIN_VERDICT_SCORE, DEFAULT_TOP_K,
};
use crate::embedding::{BiEncoderConfig, RerankerConfig};
use crate::extract::DEFAULT_LOCALE;
use crate::ingest::{DEFAULT_ERROR_DIR_NAME, IngestConfig};

/// Process configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `PLAGIAT_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Corpus store directory. Default: `./corpus`.
    pub corpus_dir: PathBuf,

    /// Directory scanned for new corpus documents. Default: `./staging_files`.
    pub staging_dir: PathBuf,

    /// Where ingested documents are moved. Default: `./archived_files`.
    pub archive_dir: PathBuf,

    /// Where failed documents are moved. Default: `<staging_dir>/errors`.
    pub error_dir: Option<PathBuf>,

    /// Bi-encoder model directory. `None` runs the embedder in stub mode.
    pub embedder_path: Option<PathBuf>,

    /// Cross-encoder model directory. `None` runs the reranker in stub mode.
    pub reranker_path: Option<PathBuf>,

    /// Corpus rows retrieved per sentence. Default: `20`.
    pub top_k: usize,

    /// Findings below this composite score are dropped. Default: `0.6`.
    pub min_verdict_score: f32,

    /// Staged files smaller than this are archived unprocessed. Default: `10_000`.
    pub min_file_bytes: u64,

    /// Ingested sentences need more tokens than this. Default: `10`.
    pub min_sentence_tokens: usize,

    /// Drop formula-like sentences on ingest. Default: `false`.
    pub skip_math_sentences: bool,

    /// Max sentences per embedder call. Default: `64`.
    pub embed_batch_size: usize,

    /// Segmentation locale. Default: `french`.
    pub locale: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from("./corpus"),
            staging_dir: PathBuf::from("./staging_files"),
            archive_dir: PathBuf::from("./archived_files"),
            error_dir: None,
            embedder_path: None,
            reranker_path: None,
            top_k: DEFAULT_TOP_K,
            min_verdict_score: DEFAULT_MIN_VERDICT_SCORE,
            min_file_bytes: DEFAULT_MIN_FILE_BYTES,
            min_sentence_tokens: DEFAULT_MIN_SENTENCE_TOKENS,
            skip_math_sentences: false,
            embed_batch_size: DEFAULT_EMBED_BATCH_SIZE,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl Config {
    const ENV_CORPUS_DIR: &'static str = "PLAGIAT_CORPUS_DIR";
    const ENV_STAGING_DIR: &'static str = "PLAGIAT_STAGING_DIR";
    const ENV_ARCHIVE_DIR: &'static str = "PLAGIAT_ARCHIVE_DIR";
    const ENV_ERROR_DIR: &'static str = "PLAGIAT_ERROR_DIR";
    const ENV_EMBEDDER_PATH: &'static str = BiEncoderConfig::ENV_MODEL_PATH;
    const ENV_RERANKER_PATH: &'static str = RerankerConfig::ENV_MODEL_PATH;
    const ENV_TOP_K: &'static str = "PLAGIAT_TOP_K";
    const ENV_MIN_VERDICT_SCORE: &'static str = "PLAGIAT_MIN_VERDICT_SCORE";
    const ENV_MIN_FILE_BYTES: &'static str = "PLAGIAT_MIN_FILE_BYTES";
    const ENV_MIN_SENTENCE_TOKENS: &'static str = "PLAGIAT_MIN_SENTENCE_TOKENS";
    const ENV_SKIP_MATH: &'static str = "PLAGIAT_SKIP_MATH_SENTENCES";
    const ENV_EMBED_BATCH_SIZE: &'static str = "PLAGIAT_EMBED_BATCH_SIZE";
    const ENV_LOCALE: &'static str = "PLAGIAT_LOCALE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let corpus_dir = Self::parse_path_from_env(Self::ENV_CORPUS_DIR, defaults.corpus_dir);
        let staging_dir = Self::parse_path_from_env(Self::ENV_STAGING_DIR, defaults.staging_dir);
        let archive_dir = Self::parse_path_from_env(Self::ENV_ARCHIVE_DIR, defaults.archive_dir);
        let error_dir = Self::parse_optional_path_from_env(Self::ENV_ERROR_DIR);
        let embedder_path = Self::parse_optional_path_from_env(Self::ENV_EMBEDDER_PATH);
        let reranker_path = Self::parse_optional_path_from_env(Self::ENV_RERANKER_PATH);
        let top_k = Self::parse_top_k_from_env(defaults.top_k)?;
        let min_verdict_score = Self::parse_min_score_from_env(defaults.min_verdict_score)?;
        let min_file_bytes = Self::parse_from_env(Self::ENV_MIN_FILE_BYTES, defaults.min_file_bytes);
        let min_sentence_tokens =
            Self::parse_from_env(Self::ENV_MIN_SENTENCE_TOKENS, defaults.min_sentence_tokens);
        let skip_math_sentences = env::var(Self::ENV_SKIP_MATH)
            .map(|s| s == "true" || s == "1")
            .unwrap_or(defaults.skip_math_sentences);
        let embed_batch_size =
            Self::parse_from_env(Self::ENV_EMBED_BATCH_SIZE, defaults.embed_batch_size);
        let locale = Self::parse_string_from_env(Self::ENV_LOCALE, defaults.locale);

        Ok(Self {
            corpus_dir,
            staging_dir,
            archive_dir,
            error_dir,
            embedder_path,
            reranker_path,
            top_k,
            min_verdict_score,
            min_file_bytes,
            min_sentence_tokens,
            skip_math_sentences,
            embed_batch_size,
            locale,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::InvalidTopK {
                value: self.top_k.to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.min_verdict_score) {
            return Err(ConfigError::InvalidMinScore {
                value: self.min_verdict_score.to_string(),
            });
        }
        if self.embed_batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }

        for dir in [
            &self.corpus_dir,
            &self.staging_dir,
            &self.archive_dir,
            &self.error_dir(),
        ] {
            if dir.exists() && !dir.is_dir() {
                return Err(ConfigError::NotADirectory { path: dir.clone() });
            }
        }

        if self.archive_dir == self.staging_dir {
            return Err(ConfigError::OverlappingDirs {
                what: "archive dir",
                path: self.archive_dir.clone(),
            });
        }
        if self.error_dir() == self.staging_dir {
            return Err(ConfigError::OverlappingDirs {
                what: "error dir",
                path: self.staging_dir.clone(),
            });
        }

        for path in [&self.embedder_path, &self.reranker_path].into_iter().flatten() {
            Self::require_dir(path)?;
        }

        Ok(())
    }

    /// Error directory, defaulting to `errors/` under staging.
    pub fn error_dir(&self) -> PathBuf {
        self.error_dir
            .clone()
            .unwrap_or_else(|| self.staging_dir.join(DEFAULT_ERROR_DIR_NAME))
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions::default()
            .with_top_k(self.top_k)
            .with_min_verdict_score(self.min_verdict_score)
    }

    pub fn ingest_config(&self) -> IngestConfig {
        IngestConfig::new(&self.staging_dir, &self.archive_dir)
            .with_error_dir(self.error_dir())
            .with_min_file_bytes(self.min_file_bytes)
            .with_min_sentence_tokens(self.min_sentence_tokens)
            .with_skip_math_sentences(self.skip_math_sentences)
            .with_embed_batch_size(self.embed_batch_size)
    }

    pub fn embedder_config(&self) -> BiEncoderConfig {
        let config = match &self.embedder_path {
            Some(path) => BiEncoderConfig::new(path),
            None => BiEncoderConfig::stub(),
        };
        config.with_batch_size(self.embed_batch_size)
    }

    pub fn reranker_config(&self) -> RerankerConfig {
        match &self.reranker_path {
            Some(path) => RerankerConfig::new(path),
            None => RerankerConfig::stub(),
        }
    }

    fn require_dir(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::PathNotFound {
                path: path.to_path_buf(),
            });
        }
        if !path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn parse_top_k_from_env(default: usize) -> Result<usize, ConfigError> {
        match env::var(Self::ENV_TOP_K) {
            Ok(value) => {
                let top_k: usize = value.trim().parse().map_err(|e| ConfigError::TopKParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if top_k == 0 {
                    return Err(ConfigError::InvalidTopK { value });
                }

                Ok(top_k)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_min_score_from_env(default: f32) -> Result<f32, ConfigError> {
        match env::var(Self::ENV_MIN_VERDICT_SCORE) {
            Ok(value) => {
                let score: f32 = value.trim().parse().map_err(|e| {
                    ConfigError::MinScoreParseError {
                        value: value.clone(),
                        source: e,
                    }
                })?;

                if !(0.0..=1.0).contains(&score) {
                    return Err(ConfigError::InvalidMinScore { value });
                }

                Ok(score)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_from_env<T: std::str::FromStr>(var_name: &str, default: T) -> T {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}
