//! Config command - inspect, export, import, and reset the document

use std::path::PathBuf;

use clap::{Args, Subcommand};

use btca_core::Registry;

/// Inspect or modify the configuration document
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the active configuration (home-collapsed, as stored)
    Show,

    /// Print where the configuration document lives
    Path,

    /// Restore the built-in defaults
    Reset,

    /// Write the configuration to a file
    Export {
        /// Target path
        path: PathBuf,
    },

    /// Replace the configuration from a file (all-or-nothing)
    Import {
        /// Source path
        path: PathBuf,
    },

    /// Update the provider/model pair
    SetModel {
        /// Provider identifier (e.g. "opencode")
        provider: String,

        /// Model identifier
        model: String,
    },
}

impl ConfigArgs {
    /// Execute the config command
    pub async fn execute(&self, registry: &mut Registry) -> anyhow::Result<()> {
        match &self.command {
            ConfigCommand::Show => {
                let collapsed = registry.config().collapsed();
                println!("{}", serde_json::to_string_pretty(&collapsed)?);
            }
            ConfigCommand::Path => {
                println!("{}", registry.config_path().display());
            }
            ConfigCommand::Reset => {
                registry.reset()?;
                println!("Configuration reset to defaults.");
            }
            ConfigCommand::Export { path } => {
                registry.export(path)?;
                println!("Exported configuration to {}", path.display());
            }
            ConfigCommand::Import { path } => {
                registry.import(path)?;
                println!("Imported configuration from {}", path.display());
            }
            ConfigCommand::SetModel { provider, model } => {
                registry.set_model(provider, model)?;
                println!("Using {provider}/{model}");
            }
        }

        Ok(())
    }
}
