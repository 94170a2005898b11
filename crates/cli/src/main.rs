use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pt_domain::config::Config;

mod app;
mod chat;
mod render;
mod run;

/// PawTalk — conversational health advice for your dog.
#[derive(Debug, Parser)]
#[command(name = "pawtalk", version, about)]
struct Cli {
    /// Path to the config file (default: pawtalk.toml, or $PAWTALK_CONFIG).
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive chat (default when no subcommand is given).
    Chat {
        /// Dog id to start with (defaults to the first dog on the account).
        #[arg(long)]
        dog: Option<i64>,
    },
    /// Send a single question and print the answers.
    Run {
        /// The question to send.
        message: String,
        /// Dog id (defaults to the first dog on the account).
        #[arg(long)]
        dog: Option<i64>,
    },
    /// Print version information.
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            init_cli_tracing();
            let config = load_config(cli.config)?;
            chat::chat(config, None).await
        }
        Some(Command::Chat { dog }) => {
            init_cli_tracing();
            let config = load_config(cli.config)?;
            chat::chat(config, dog).await
        }
        Some(Command::Run { message, dog }) => {
            init_cli_tracing();
            let config = load_config(cli.config)?;
            run::run(config, message, dog).await
        }
        Some(Command::Version) => {
            println!("pawtalk {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Load the config file, falling back to built-in defaults when it does
/// not exist.  Precedence: `--config`, then `$PAWTALK_CONFIG`, then
/// `pawtalk.toml` in the working directory.
fn load_config(flag: Option<String>) -> anyhow::Result<Config> {
    let path = flag
        .or_else(|| std::env::var("PAWTALK_CONFIG").ok())
        .unwrap_or_else(|| "pawtalk.toml".into());

    let config = if std::path::Path::new(&path).exists() {
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading {path}: {e}"))?;
        toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {path}: {e}"))?
    } else {
        Config::default()
    };

    Ok(config)
}

fn init_cli_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
