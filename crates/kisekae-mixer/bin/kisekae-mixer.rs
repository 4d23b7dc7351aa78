//! Kisekae mixer binary entry point.
//!
//! A thin wrapper around the kisekae-mixer library that:
//! 1. Initializes logging
//! 2. Parses command-line arguments
//! 3. Loads the registry
//! 4. Runs the requested command

use anyhow::{Context, Result};
use kisekae_mixer::{Cli, Command, MixerConfig, MixerProgram, SplitSpec};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::from_args();

    match cli.command {
        Command::Mix { programs } => mix(&cli.config, &programs),
        Command::Split {
            input,
            save,
            output,
        } => split(&cli.config, &input, &save, output.as_deref()),
        Command::Presets { category } => {
            for preset in kisekae_mixer::list_presets(&cli.config.preset_dir, category.as_deref())? {
                println!("{}", preset.display());
            }
            Ok(())
        }
    }
}

fn mix(config: &MixerConfig, programs: &[PathBuf]) -> Result<()> {
    config.validate()?;
    let resolver = config.resolver()?;

    for path in programs {
        let program = MixerProgram::load(path)?;
        let written = kisekae_mixer::output_codes(&program, &resolver, &config.output_dir)
            .with_context(|| format!("mixing {}", path.display()))?;
        tracing::info!("{}: {} codes", path.display(), written.len());
    }
    Ok(())
}

fn split(config: &MixerConfig, input: &Path, specs: &[String], output: Option<&Path>) -> Result<()> {
    config.validate()?;
    let registry = config.load_registry()?;
    let code = kisekae_mixer::read_code(input, &registry)?;

    for spec in specs {
        let spec = SplitSpec::parse(spec)?;
        let path = spec.output_path(input, output);
        let part = kisekae_mixer::split_code(&code, &spec, &registry);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&path, part.to_string())
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("Wrote {}", path.display());
    }
    Ok(())
}
