//! The `config` subcommand: show or update persisted settings.

use anyhow::Result;
use clap::Parser;

use crate::config::{ConfigManager, ConfigScope, Provider};

/// Manage configuration settings.
#[derive(Parser)]
pub struct ConfigCommand {
    /// Show current configuration.
    #[arg(long)]
    pub show: bool,

    /// Set default provider (openai|anthropic|gemini).
    #[arg(long, value_name = "name")]
    pub set_provider: Option<String>,

    /// Set default verbose mode.
    #[arg(long, value_name = "true|false")]
    pub set_verbose: Option<bool>,

    /// Set default dry-run mode.
    #[arg(long, value_name = "true|false")]
    pub set_dry_run: Option<bool>,

    /// Save to the global config (~/.git-ai-commit.json). This is the
    /// default scope.
    #[arg(long)]
    pub global: bool,

    /// Save to the local config (./.git-ai-commit.json).
    #[arg(long, conflicts_with = "global")]
    pub local: bool,
}

impl ConfigCommand {
    /// Executes the config command against the given manager.
    pub fn execute(self, manager: &ConfigManager) -> Result<()> {
        let has_updates = self.set_provider.is_some()
            || self.set_verbose.is_some()
            || self.set_dry_run.is_some();

        if self.show || !has_updates {
            manager.show();
            return Ok(());
        }

        let mut config = manager.load();

        if let Some(ref name) = self.set_provider {
            let provider: Provider = name.parse()?;
            config.provider = Some(provider);
        }
        if let Some(verbose) = self.set_verbose {
            config.verbose = Some(verbose);
        }
        if let Some(dry_run) = self.set_dry_run {
            config.dry_run = Some(dry_run);
        }

        let scope = if self.local {
            ConfigScope::Local
        } else {
            ConfigScope::Global
        };
        manager.save(&config, scope)?;

        println!("\nConfiguration updated!\n");
        manager.show();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::tempdir;

    fn manager_in(dir: &std::path::Path) -> ConfigManager {
        ConfigManager::with_paths(dir.join("local.json"), dir.join("global.json"))
    }

    fn command() -> ConfigCommand {
        ConfigCommand {
            show: false,
            set_provider: None,
            set_verbose: None,
            set_dry_run: None,
            global: false,
            local: false,
        }
    }

    #[test]
    fn set_provider_defaults_to_global_scope() {
        let dir = tempdir().unwrap();
        let manager = manager_in(dir.path());

        let cmd = ConfigCommand {
            set_provider: Some("anthropic".to_string()),
            ..command()
        };
        cmd.execute(&manager).unwrap();

        assert!(dir.path().join("global.json").exists());
        assert!(!dir.path().join("local.json").exists());
        assert_eq!(manager.load().provider, Some(Provider::Anthropic));
    }

    #[test]
    fn local_flag_targets_the_local_file() {
        let dir = tempdir().unwrap();
        let manager = manager_in(dir.path());

        let cmd = ConfigCommand {
            set_dry_run: Some(true),
            local: true,
            ..command()
        };
        cmd.execute(&manager).unwrap();

        assert!(dir.path().join("local.json").exists());
        assert!(!dir.path().join("global.json").exists());
    }

    #[test]
    fn updates_layer_onto_the_loaded_config() {
        let dir = tempdir().unwrap();
        let manager = manager_in(dir.path());

        manager
            .save(
                &Config {
                    provider: Some(Provider::Gemini),
                    verbose: Some(true),
                    dry_run: None,
                },
                ConfigScope::Global,
            )
            .unwrap();

        let cmd = ConfigCommand {
            set_dry_run: Some(true),
            ..command()
        };
        cmd.execute(&manager).unwrap();

        let loaded = manager.load();
        assert_eq!(loaded.provider, Some(Provider::Gemini));
        assert_eq!(loaded.verbose, Some(true));
        assert_eq!(loaded.dry_run, Some(true));
    }

    #[test]
    fn invalid_provider_name_fails_without_writing() {
        let dir = tempdir().unwrap();
        let manager = manager_in(dir.path());

        let cmd = ConfigCommand {
            set_provider: Some("claude".to_string()),
            ..command()
        };
        assert!(cmd.execute(&manager).is_err());
        assert!(!dir.path().join("global.json").exists());
    }

    #[test]
    fn no_set_flags_only_shows() {
        let dir = tempdir().unwrap();
        let manager = manager_in(dir.path());

        command().execute(&manager).unwrap();

        assert!(!dir.path().join("global.json").exists());
        assert!(!dir.path().join("local.json").exists());
    }
}
