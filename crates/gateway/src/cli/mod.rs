pub mod chat;
pub mod config;
pub mod run;

use clap::{Parser, Subcommand};

/// Aun: a guarded, intent-aware conversation runtime.
#[derive(Debug, Parser)]
#[command(name = "aun", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive chat (default when no subcommand is given).
    Chat {
        /// Session key (a fresh random key when omitted).
        #[arg(long)]
        session: Option<String>,
    },
    /// Send a single message and print the reply.
    Run {
        /// The message to send.
        message: String,
        /// Session key (defaults to "cli:run").
        #[arg(long, default_value = "cli:run")]
        session: String,
        /// Output the turn outcome as JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path in `AUN_CONFIG` (or `config.toml`
/// by default).  A missing file yields the built-in defaults.  Returns the
/// parsed [`Config`] and the path that was used.
pub fn load_config() -> anyhow::Result<(aun_domain::config::Config, String)> {
    let config_path = std::env::var("AUN_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        aun_domain::config::Config::default()
    };

    Ok((config, config_path))
}
