mod config;
mod entry_cmd;
mod flow;
mod identity_cmd;
mod output;
mod stats;
mod tui_cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use journey_client::Controller;
use journey_core::format::checked_date_format;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "journey",
    version,
    about = "journey - an anonymous-key research journal"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new anonymous access key and store it on this device
    New,

    /// Sign in with an existing access key
    SignIn {
        /// The access key you saved when it was created
        key: String,
    },

    /// Set the display name for a freshly created key
    Name {
        /// Display name
        name: String,
    },

    /// Show the signed-in key and name
    Whoami,

    /// Add a journal entry
    Write {
        /// Entry text (words are joined with spaces)
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// List your journal entries, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Delete one of your entries by id
    Delete {
        /// Entry id (see `journey list`)
        id: String,
    },

    /// Show writing statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Forget the access key on this device
    SignOut {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show or set configuration
    Config {
        /// Set the backend URL
        #[arg(long)]
        url: Option<String>,

        /// Set the backend anon key
        #[arg(long)]
        anon_key: Option<String>,

        /// Set the request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Open the interactive journal
    Tui,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        // The TUI owns the terminal and its own runtime.
        Commands::Tui => tui_cmd::run(),
        command => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::WARN.into()),
                )
                .with_writer(std::io::stderr)
                .init();
            tokio::runtime::Runtime::new()
                .map_err(anyhow::Error::from)
                .and_then(|rt| rt.block_on(run(command)))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<()> {
    let paths = config::resolve_paths()?;

    if let Commands::Config {
        url,
        anon_key,
        timeout_secs,
    } = command
    {
        return if url.is_none() && anon_key.is_none() && timeout_secs.is_none() {
            config::show_config(&paths)
        } else {
            config::set_config(&paths, url, anon_key, timeout_secs)
        };
    }

    let cfg = config::load_config(&paths)?;
    let date_format = checked_date_format(&cfg.ui.date_format);
    let mut ctl = Controller::new(config::open_session(&paths, &cfg)?);

    match command {
        Commands::New => identity_cmd::run_new(&mut ctl).await,
        Commands::SignIn { key } => identity_cmd::run_sign_in(&mut ctl, &key).await,
        Commands::Name { name } => identity_cmd::run_name(&mut ctl, &name).await,
        Commands::Whoami => identity_cmd::run_whoami(&mut ctl).await,
        Commands::Write { text } => entry_cmd::run_write(&mut ctl, &text.join(" ")).await,
        Commands::List { json, limit } => {
            entry_cmd::run_list(
                &mut ctl,
                OutputFormat::from_json_flag(json),
                limit,
                &date_format,
            )
            .await
        }
        Commands::Delete { id } => entry_cmd::run_delete(&mut ctl, &id).await,
        Commands::Stats { json } => {
            stats::run_stats(&mut ctl, OutputFormat::from_json_flag(json), &date_format).await
        }
        Commands::SignOut { yes } => {
            let skip_prompt = yes || !cfg.ui.confirm_sign_out;
            identity_cmd::run_sign_out(&mut ctl, move || {
                if skip_prompt {
                    Ok(true)
                } else {
                    identity_cmd::prompt_sign_out()
                }
            })
            .await
        }
        Commands::Config { .. } | Commands::Tui => unreachable!("handled before the session opens"),
    }
}
