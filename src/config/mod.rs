pub mod toml_config;

pub use toml_config::ToolboxConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "event-toolbox")]
#[command(about = "Lucky draw and random grouping for event participant lists")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory holding the saved roster
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Storage key (file stem) of the saved roster
    #[arg(long, global = true)]
    pub roster_key: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Add participants from pasted text or a file
    Import {
        /// Names separated by newlines, commas or semicolons
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// File with one name per line
        #[arg(long)]
        file: Option<String>,
    },
    /// Show the roster and duplicate count
    List,
    /// Keep only the first participant for each name
    Dedupe,
    /// Remove one participant by id
    Remove { id: String },
    /// Remove every participant
    Clear,
    /// Run one or more lucky draws
    Draw {
        #[arg(long, default_value = "1")]
        count: usize,

        /// Previous winners stay eligible
        #[arg(long)]
        allow_repeat: bool,

        /// Skip the reveal animation
        #[arg(long)]
        instant: bool,
    },
    /// Shuffle the roster into groups
    Group {
        /// Members per group
        #[arg(long)]
        size: Option<usize>,

        /// Also write the groups to a CSV file in the data directory
        #[arg(long)]
        csv: bool,

        /// Never call the name generator
        #[arg(long)]
        no_ai_names: bool,
    },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the TOML file (if any) and applies command-line overrides.
    pub fn resolve(&self) -> Result<ToolboxConfig> {
        let mut config = match &self.config {
            Some(path) => ToolboxConfig::from_file(path)?,
            None => ToolboxConfig::default(),
        };

        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }
        if let Some(roster_key) = &self.roster_key {
            config.storage.roster_key = roster_key.clone();
        }

        match &self.command {
            Command::Draw { allow_repeat, .. } if *allow_repeat => {
                config.draw.allow_repeat = true;
            }
            Command::Group {
                size, no_ai_names, ..
            } => {
                if let Some(size) = size {
                    config.grouping.group_size = *size;
                }
                if *no_ai_names {
                    config.name_generator.enabled = false;
                }
            }
            _ => {}
        }

        Ok(config)
    }
}
