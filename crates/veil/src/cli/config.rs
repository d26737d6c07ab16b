//! The `veil config` command for configuration management.

use clap::{Args, Subcommand};
use veil_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let path = Config::default_path();
            let config = Config::load()?;
            if path.exists() {
                println!("# Loaded from {}", path.display());
            } else {
                println!("# No config file at {}; showing defaults", path.display());
            }
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            let path = Config::default_path();
            println!("{}", path.display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            // Ensure parent directory exists
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            std::fs::write(&path, default_config_text()?)?;

            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

/// Default config as TOML with a short explanatory header.
fn default_config_text() -> anyhow::Result<String> {
    let body = Config::default().to_toml()?;
    Ok(format!(
        "# Veil configuration\n\
         # [codec] key_derivation: \"raw\" keys by the password text, \"sha256\" by its hex digest.\n\
         # [output] dir: empty writes next to each input.\n\n{body}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_text_parses_back() {
        let text = default_config_text().unwrap();
        assert!(text.starts_with("# Veil configuration"));
        let parsed = Config::from_toml(&text).unwrap();
        assert_eq!(parsed.output.encode_suffix, ".veiled");
        assert_eq!(parsed.processing.parallel_workers, 4);
    }
}
