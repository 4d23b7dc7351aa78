//! Command-line and environment configuration.
//!
//! Every option can be given as a flag or through its environment variable
//! (`KISEKAE_SUBCODES`, `KISEKAE_COMPONENTS`, `KISEKAE_PRESET_DIR`,
//! `KISEKAE_OUTPUT_DIR`), falling back to the defaults below.
//!
//! # Example
//!
//! ```no_run
//! use kisekae_mixer::Cli;
//!
//! let cli = Cli::from_args();
//! cli.config.validate().expect("Invalid configuration");
//!
//! let resolver = cli.config.resolver().expect("registry should load");
//! println!("Presets from {}", cli.config.preset_dir.display());
//! ```

use crate::error::{MixerError, Result};
use crate::resolver::FileResolver;
use clap::{Args, Parser, Subcommand};
use kisekae_formats::Registry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Registry and directory settings shared by every command.
#[derive(Debug, Clone, Args)]
pub struct MixerConfig {
    /// Subcode kind definitions (JSON)
    #[arg(
        long,
        global = true,
        env = "KISEKAE_SUBCODES",
        default_value = "./subcodes.json"
    )]
    pub subcodes: PathBuf,

    /// Component kind definitions (JSON)
    #[arg(
        long,
        global = true,
        env = "KISEKAE_COMPONENTS",
        default_value = "./components.json"
    )]
    pub components: PathBuf,

    /// Preset bank used by internal sources
    #[arg(long, global = true, env = "KISEKAE_PRESET_DIR", default_value = "./bank")]
    pub preset_dir: PathBuf,

    /// Directory generated codes are written to
    #[arg(long, global = true, env = "KISEKAE_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

impl MixerConfig {
    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `MixerError::Config` if either registry file is missing.
    pub fn validate(&self) -> Result<()> {
        for (what, path) in [("subcode", &self.subcodes), ("component", &self.components)] {
            if !path.is_file() {
                return Err(MixerError::Config(format!(
                    "{what} definitions not found: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    /// Load the registry named by this configuration
    pub fn load_registry(&self) -> Result<Arc<Registry>> {
        let registry = Registry::from_paths(&self.subcodes, &self.components)?;
        debug!(
            "Loaded registry: {} subcode kinds, {} component kinds",
            registry.subcode_types().count(),
            registry.component_types().count()
        );
        Ok(Arc::new(registry))
    }

    /// File resolver over the configured preset bank
    pub fn resolver(&self) -> Result<FileResolver> {
        Ok(FileResolver::new(self.load_registry()?, &self.preset_dir))
    }
}

/// Top-level command line.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "kisekae-mixer",
    about = "Combine, split and list KisekaeII codes",
    version
)]
pub struct Cli {
    /// Shared settings
    #[command(flatten)]
    pub config: MixerConfig,

    /// Action to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }
}

/// Available actions
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write every combination of one or more mixer programs as code files
    Mix {
        /// Mixer program JSON files
        #[arg(required = true)]
        programs: Vec<PathBuf>,
    },
    /// Write selected parts of a code to separate files
    Split {
        /// Code file to split
        #[arg(short, long)]
        input: PathBuf,

        /// Specifiers: letters from `cubdfhep`, optionally `:name`
        #[arg(short, long, num_args = 1.., required = true)]
        save: Vec<String>,

        /// Write results here instead of beside the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List code files in the preset bank
    Presets {
        /// Only list this subdirectory
        category: Option<String>,
    },
}
