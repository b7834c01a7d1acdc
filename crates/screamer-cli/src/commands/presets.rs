//! Factory preset listing.

use clap::{Args, Subcommand};
use screamer_config::{FACTORY_PRESETS, factory_preset};

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: Option<PresetsCommand>,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List factory presets
    List,
    /// Print a preset as an engine config document
    Show {
        /// Preset name
        name: String,
    },
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command.unwrap_or(PresetsCommand::List) {
        PresetsCommand::List => {
            println!("Factory presets:\n");
            for preset in FACTORY_PRESETS {
                let config = preset.config()?;
                println!(
                    "  {:<12} drive {:>4.1}  tone {:>4.1}  level {:>4.1}  {}",
                    preset.name,
                    config.params.drive,
                    config.params.tone,
                    config.params.level,
                    preset.description
                );
            }
        }
        PresetsCommand::Show { name } => {
            let preset = factory_preset(&name)?;
            println!("# {}: {}", preset.name, preset.description);
            print!("{}", preset.config()?.to_toml_string()?);
        }
    }
    Ok(())
}
