//! Configuration file support for codecoach
//!
//! Loads config from ~/.codecoach/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::extractor::PageSelectors;

/// Configuration for codecoach
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Base URL for the completion endpoint
    pub openai_base_url: Option<String>,

    /// Selector override: the editor's per-line element
    pub code_line_selector: Option<String>,

    /// Selector override: the language-selector control
    pub language_selector: Option<String>,

    /// Selector override: the problem-statement metadata element
    pub problem_statement_selector: Option<String>,
}

impl Config {
    /// Load config from ~/.codecoach/config.toml
    pub fn load() -> Self {
        Self::from_path(&config_path())
    }

    /// Load config from an explicit path; missing or unreadable files
    /// fall back to defaults with a warning
    pub fn from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Get a value with fallback to environment variable
    pub fn get_or_env(&self, field: Option<&String>, env_var: &str) -> Option<String> {
        field.cloned().or_else(|| std::env::var(env_var).ok())
    }

    /// Selector profile with config overrides applied over the stock
    /// LeetCode profile
    pub fn selectors(&self) -> PageSelectors {
        let mut selectors = PageSelectors::leetcode();
        if let Some(s) = &self.code_line_selector {
            selectors.code_line = s.clone();
        }
        if let Some(s) = &self.language_selector {
            selectors.language_label = s.clone();
        }
        if let Some(s) = &self.problem_statement_selector {
            selectors.problem_statement = s.clone();
        }
        selectors
    }
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".codecoach")
        .join("config.toml")
}
