//! Config command - Inspect Starsync configuration
//!
//! Provides the `starsync config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON)
//! 2. Validates the configuration file and reports every error
//! 3. Prints the configuration file location

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;

use starsync_core::config::Config;

use super::CommandContext;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,
    /// Validate the configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            ConfigCommand::Show => self.execute_show(ctx),
            ConfigCommand::Validate => self.execute_validate(ctx),
            ConfigCommand::Path => self.execute_path(ctx),
        }
    }

    fn execute_show(&self, ctx: &CommandContext) -> Result<()> {
        let formatter = ctx.formatter();
        let path = &ctx.config_path;
        let config = Config::load_or_default(path)?.with_env_overrides();

        info!(config_path = %path.display(), "Showing configuration");

        if ctx.is_json() {
            let json = serde_json::to_value(&config)
                .context("Failed to serialize configuration to JSON")?;
            formatter.print_json(&json);
        } else {
            let source = if path.exists() { "" } else { ", defaults" };
            formatter.success(&format!("Configuration ({}{})", path.display(), source));
            formatter.info("");

            let yaml = serde_yaml::to_string(&config)
                .context("Failed to serialize configuration to YAML")?;
            for line in yaml.lines() {
                formatter.info(line);
            }
        }

        Ok(())
    }

    fn execute_validate(&self, ctx: &CommandContext) -> Result<()> {
        let formatter = ctx.formatter();
        let path = &ctx.config_path;

        let config = match Config::load_or_default(path) {
            Ok(config) => config.with_env_overrides(),
            Err(e) => {
                let message = format!("{:#}", e);
                if ctx.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "valid": false,
                        "config_path": path.display().to_string(),
                        "errors": [message],
                    }));
                } else {
                    formatter.error(&message);
                }
                anyhow::bail!("Configuration could not be loaded");
            }
        };

        info!(config_path = %path.display(), "Validating configuration");
        let errors = config.validate();

        if ctx.is_json() {
            let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            formatter.print_json(&serde_json::json!({
                "valid": errors.is_empty(),
                "config_path": path.display().to_string(),
                "exists": path.exists(),
                "errors": error_strings,
            }));
        } else if errors.is_empty() {
            formatter.success("Configuration is valid");
            if path.exists() {
                formatter.info(&format!("File: {}", path.display()));
            } else {
                formatter.info(&format!("No file at {}, using defaults", path.display()));
            }
        } else {
            formatter.error(&format!(
                "Configuration has {} error{}:",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ));
            formatter.info(&format!("File: {}", path.display()));
            for error in &errors {
                formatter.info(&format!("  {} - {}", error.field, error.message));
            }
        }

        if !errors.is_empty() {
            anyhow::bail!("Configuration is invalid");
        }
        Ok(())
    }

    fn execute_path(&self, ctx: &CommandContext) -> Result<()> {
        let path = ctx.config_path.display().to_string();
        if ctx.is_json() {
            ctx.formatter().print_json(&serde_json::json!({
                "config_path": path,
                "exists": ctx.config_path.exists(),
            }));
        } else {
            println!("{}", path);
        }
        Ok(())
    }
}
