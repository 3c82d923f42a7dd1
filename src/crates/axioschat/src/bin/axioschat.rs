//! AxiosChat CLI - multi-model Web3 chat assistant
//!
//! Main entry point for the axioschat command-line tool.

use axioschat::cli::{handle_set, handle_show, init_logging, run_ask, run_repl};
use axioschat::config::{AxiosConfig, ConfigLoader};
use axioschat::functions::{default_tools, Web3Function};
use axioschat::providers;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;

#[derive(Parser)]
#[command(name = "axioschat")]
#[command(about = "AxiosChat - multi-model Web3 chat assistant", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Show raw function result messages
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat (default)
    Chat {
        /// Use a local Ollama model for conversation
        #[arg(long)]
        local: bool,
        /// Local model endpoint (implies --local)
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Ask a single question and exit
    Ask {
        /// The question
        question: String,
        /// Approve a queued transaction without asking
        #[arg(short, long)]
        yes: bool,
        /// Use a local Ollama model for conversation
        #[arg(long)]
        local: bool,
        /// Local model endpoint (implies --local)
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Manage provider credentials
    #[command(subcommand)]
    Keys(KeyCommands),

    /// Print the tool schemas sent to the resolver model
    Tools {
        /// One line per function instead of JSON
        #[arg(long)]
        brief: bool,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Subcommand)]
enum KeyCommands {
    /// Store a credential
    Set {
        /// Provider: gaia or replicate
        provider: String,
        /// The API key or token
        value: String,
    },
    /// Show stored credentials (masked)
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loader = ConfigLoader::new();
    let mut config = loader.load().await?;
    if cli.debug {
        config.session.debug = true;
    }
    init_logging(&config.logging)?;
    debug!(
        user = %loader.user_config_path().display(),
        project = %loader.project_config_path().display(),
        "Configuration sources"
    );

    match cli.command.unwrap_or(Commands::Chat {
        local: false,
        endpoint: None,
    }) {
        Commands::Chat { local, endpoint } => {
            apply_local(&mut config, local, endpoint);
            let credentials = providers::credential_store(&config)?;
            let mut session = providers::session(&config, credentials)?;
            run_repl(&mut session).await?;
            Ok(())
        }
        Commands::Ask {
            question,
            yes,
            local,
            endpoint,
        } => {
            apply_local(&mut config, local, endpoint);
            let credentials = providers::credential_store(&config)?;
            let mut session = providers::session(&config, credentials)?;
            run_ask(&mut session, &question, yes).await?;
            Ok(())
        }
        Commands::Keys(KeyCommands::Set { provider, value }) => {
            let store = providers::credential_store(&config)?;
            handle_set(store.as_ref(), &provider, &value)?;
            Ok(())
        }
        Commands::Keys(KeyCommands::Show) => {
            let store = providers::credential_store(&config)?;
            handle_show(store.as_ref())?;
            println!(
                "{}",
                format!("Stored in {}", config.credentials_path().display()).dimmed()
            );
            Ok(())
        }
        Commands::Tools { brief: false } => {
            println!("{}", serde_json::to_string_pretty(&default_tools())?);
            Ok(())
        }
        Commands::Tools { brief: true } => {
            println!("{}", "Available functions:".bold());
            for tool in default_tools() {
                let name = tool.function.name;
                let gate = match Web3Function::from_name(name) {
                    Some(f) if f.is_read_only() => "auto".green(),
                    _ => "approval".yellow(),
                };
                println!(
                    "  {} [{}] {}",
                    format!("{:<28}", name).bold(),
                    gate,
                    tool.function.description
                );
            }
            Ok(())
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn apply_local(config: &mut AxiosConfig, local: bool, endpoint: Option<String>) {
    if local || endpoint.is_some() {
        config.conversation.use_local(endpoint);
        debug!(base_url = %config.conversation.base_url, "Using local conversational model");
    }
}

