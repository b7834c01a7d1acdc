//! Engine configuration file management.

use anyhow::bail;
use clap::{Args, Subcommand};
use screamer_config::{EngineConfig, default_config_path};
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    /// Config file (defaults to the user config location)
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    let path = args.path.unwrap_or_else(default_config_path);
    match args.command.unwrap_or(ConfigCommand::Show) {
        ConfigCommand::Show => {
            let config = EngineConfig::load_or_default(&path)?;
            let source = if path.exists() { "" } else { " (not found, defaults)" };
            println!("# {}{}", path.display(), source);
            print!("{}", config.to_toml_string()?);
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            EngineConfig::default().save(&path)?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}
