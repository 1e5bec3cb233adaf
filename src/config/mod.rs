//! Configuration management: provider selection, verbosity, and dry-run
//! defaults persisted as JSON in a project-local or user-global file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name shared by the local and global configuration files.
pub const CONFIG_FILENAME: &str = ".git-ai-commit.json";

/// LLM provider backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI chat completions API.
    OpenAi,
    /// Anthropic messages API.
    Anthropic,
    /// Google Gemini generateContent API.
    Gemini,
}

impl Provider {
    /// All recognized provider names, for error messages.
    pub const NAMES: [&'static str; 3] = ["openai", "anthropic", "gemini"];
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            "gemini" => Ok(Provider::Gemini),
            other => anyhow::bail!(
                "Invalid provider: {}. Must be one of: {}",
                other,
                Provider::NAMES.join(", ")
            ),
        }
    }
}

/// Persisted configuration record. Every field is optional so a file may
/// override only some settings.
///
/// Serialized with the `dryRun` key for compatibility with configuration
/// files written by earlier releases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default provider backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,

    /// Default verbose-logging setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,

    /// Default dry-run setting.
    #[serde(
        default,
        rename = "dryRun",
        skip_serializing_if = "Option::is_none"
    )]
    pub dry_run: Option<bool>,
}

impl Config {
    /// Built-in defaults used when neither config file exists.
    pub fn defaults() -> Self {
        Self {
            provider: Some(Provider::OpenAi),
            verbose: Some(false),
            dry_run: Some(false),
        }
    }
}

/// Fully resolved settings for a single run. Unlike [`Config`], every field
/// is mandatory: resolution (CLI > local file > global file > defaults) has
/// already happened by the time these exist.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedOptions {
    /// Provider backend to use.
    pub provider: Provider,
    /// Whether to report actions instead of performing them.
    pub dry_run: bool,
    /// Whether to emit step-by-step diagnostics.
    pub verbose: bool,
}

/// Which configuration file a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    /// Project-local `./.git-ai-commit.json`.
    Local,
    /// User-global `~/.git-ai-commit.json`.
    Global,
}

/// Loads and saves configuration files.
///
/// Paths are injected rather than read from ambient state so tests can point
/// the manager at temporary files.
pub struct ConfigManager {
    local_path: PathBuf,
    global_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Creates a manager using the standard local (current directory) and
    /// global (home directory) paths.
    pub fn new() -> Self {
        let local_path = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(CONFIG_FILENAME);
        let global_path = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_FILENAME);

        Self {
            local_path,
            global_path,
        }
    }

    /// Creates a manager with explicit file paths.
    pub fn with_paths(local_path: PathBuf, global_path: PathBuf) -> Self {
        Self {
            local_path,
            global_path,
        }
    }

    /// Reads a config file, returning `None` if it is missing or malformed.
    ///
    /// Unreadable files fall back silently: a broken config must never stop
    /// the tool from running with defaults.
    fn read_config_file(path: &Path) -> Option<Config> {
        let content = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Ignoring malformed config file");
                None
            }
        }
    }

    /// Loads configuration with precedence local > global > defaults.
    ///
    /// The first file that exists and parses wins wholesale; there is no
    /// per-field merge between the two files.
    pub fn load(&self) -> Config {
        if let Some(config) = Self::read_config_file(&self.local_path) {
            tracing::debug!(path = %self.local_path.display(), "Loaded local config");
            return config;
        }

        if let Some(config) = Self::read_config_file(&self.global_path) {
            tracing::debug!(path = %self.global_path.display(), "Loaded global config");
            return config;
        }

        Config::defaults()
    }

    /// Saves the configuration to the given scope as pretty-printed JSON.
    pub fn save(&self, config: &Config, scope: ConfigScope) -> Result<()> {
        let path = match scope {
            ConfigScope::Local => &self.local_path,
            ConfigScope::Global => &self.global_path,
        };

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to save config to {}", path.display()))?;

        println!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Prints the resolved configuration and the status of both config files.
    pub fn show(&self) {
        let config = self.load();
        let has_local = self.local_path.exists();
        let has_global = self.global_path.exists();

        let flag = |present: bool| if present { "found" } else { "(not found)" };

        println!("\nCurrent configuration:\n");
        println!(
            "  Provider: {}",
            config.provider.unwrap_or(Provider::OpenAi)
        );
        println!("  Verbose:  {}", config.verbose.unwrap_or(false));
        println!("  Dry run:  {}", config.dry_run.unwrap_or(false));
        println!("\nConfig files:\n");
        println!("  Global: {} {}", self.global_path.display(), flag(has_global));
        println!("  Local:  {} {}", self.local_path.display(), flag(has_local));
        println!("\nNote: CLI flags override config file settings\n");
    }

    /// Resolves run options by layering CLI overrides on the loaded config.
    pub fn resolve(
        &self,
        provider: Option<Provider>,
        dry_run: Option<bool>,
        verbose: Option<bool>,
    ) -> ResolvedOptions {
        let config = self.load();

        ResolvedOptions {
            provider: provider
                .or(config.provider)
                .unwrap_or(Provider::OpenAi),
            dry_run: dry_run.or(config.dry_run).unwrap_or(false),
            verbose: verbose.or(config.verbose).unwrap_or(false),
        }
    }
}
