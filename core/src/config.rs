//! Runtime configuration.
//!
//! Built-in defaults, then an optional TOML file, then `DESKFIND_*` environment
//! variables, merged with Figment. Command-line overrides are applied by the caller.

use crate::error::{IndexError, Result};
use crate::search::RankMode;
use crate::tokenizer::NormalizerOptions;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "DESKFIND_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for documents; `~` and `$VAR` are expanded.
    pub data_dir: String,
    /// Accepted file extensions, without the leading dot.
    pub extensions: Vec<String>,
    pub recursive: bool,
    pub rank_mode: RankMode,
    pub max_results: Option<usize>,
    pub snippet_width: usize,
    pub unicode_nfkc: bool,
    pub stem: bool,
    pub extra_stopwords: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: "~/data".to_string(),
            extensions: vec!["txt".to_string()],
            recursive: false,
            rank_mode: RankMode::default(),
            max_results: None,
            snippet_width: crate::snippet::DEFAULT_WIDTH,
            unicode_nfkc: false,
            stem: false,
            extra_stopwords: Vec::new(),
        }
    }
}

impl Config {
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load and validate. A named file that does not exist is an error rather than
    /// a silent fall back to defaults.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            if !path.is_file() {
                return Err(IndexError::Config(format!("config file {} does not exist", path.display())));
            }
        }
        Self::from_figment(Self::figment(file))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let mut config: Config = figment.extract().map_err(|e| IndexError::Config(e.to_string()))?;
        config.extensions = config
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(IndexError::Config("at least one file extension must be accepted".into()));
        }
        if self.snippet_width == 0 {
            return Err(IndexError::Config("snippet_width must be positive".into()));
        }
        if self.max_results == Some(0) {
            return Err(IndexError::Config("max_results must be positive when set".into()));
        }
        Ok(())
    }

    pub fn data_dir_path(&self) -> PathBuf {
        expand_path(&self.data_dir)
    }

    pub fn normalizer_options(&self) -> NormalizerOptions {
        NormalizerOptions { unicode_nfkc: self.unicode_nfkc, stem: self.stem }
    }

    /// Accept markdown files alongside the configured extensions.
    pub fn include_markdown(&mut self) {
        if !self.extensions.iter().any(|e| e == "md") {
            self.extensions.push("md".to_string());
        }
    }
}

/// Expand a leading `~` and `${VAR}`/`$VAR` references without touching the filesystem.
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
