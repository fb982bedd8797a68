use super::{play, presets, status};
use crate::cli::{Cli, Commands};
use crate::config::Config;
use anyhow::{Result, bail};

/// Opening prompt for `play`, from `--prompt` or a named `--preset`.
pub fn resolve_opening(prompt: Option<String>, preset: Option<&str>) -> Result<Option<String>> {
    match (prompt, preset) {
        (Some(_), Some(_)) => bail!("use either --prompt or --preset, not both"),
        (Some(prompt), None) => Ok(Some(prompt)),
        (None, Some(name)) => match presets::find(name) {
            Some(preset) => Ok(Some(preset.prompt.to_string())),
            None => {
                let known: Vec<&str> = presets::PRESETS.iter().map(|p| p.slug).collect();
                bail!("unknown preset '{name}' (available: {})", known.join(", "))
            }
        },
        (None, None) => Ok(None),
    }
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Play { prompt, preset } => {
            let opening = resolve_opening(prompt, preset.as_deref())?;
            play::run(&config, opening).await
        }
        Commands::Presets => {
            print!("{}", presets::render_list());
            Ok(())
        }
        Commands::Config => {
            println!("{}", status::render_config(&config));
            Ok(())
        }
    }
}
