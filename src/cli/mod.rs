//! Command-line parsing and dispatch.

pub mod settings;

#[cfg(test)]
mod tests;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::admin::prompt::TerminalIo;
use crate::admin::{run_admin, ConsoleExit};
use crate::api::RexClient;
use crate::cli::settings::{run_set, run_unset, SettingError};
use crate::core::config::Config;
use crate::ui::chat::{run_chat, ChatExit, ChatOptions};
use crate::utils::diagnostics::init_tracing;

#[derive(Parser)]
#[command(name = "rex")]
#[command(about = "Terminal chat client and admin console for the Rex chatbot")]
#[command(
    long_about = "Rex is a personal chatbot. This client talks to a running Rex backend: \
`rex` opens the full-screen chat, `rex admin` opens the admin console.\n\n\
Environment Variables:\n\
  REX_BASE_URL      Backend URL (overrides the config file, overridden by --base-url)\n\
  REX_LOG           tracing filter for diagnostics, e.g. 'rex=debug'\n\n\
Controls:\n\
  Enter             Send the message\n\
  PageUp/PageDown   Scroll the transcript\n\
  Ctrl+C            Quit\n\n\
Commands:\n\
  /help             Show chat help\n\
  /log <filename>   Log the transcript to a file\n\
  /log              Pause or resume logging"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend URL for this run
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Log the chat transcript to the specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,

    /// Where diagnostics go when REX_LOG is set
    #[arg(long, global = true, value_name = "FILE")]
    pub trace_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Log in and open the admin console
    Admin,
    /// Set configuration values, or print them when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value for the key (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

fn exit_on_setting_error(result: Result<(), SettingError>) {
    if let Err(err) = result {
        err.print();
        std::process::exit(err.exit_code());
    }
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let Args {
        command,
        base_url,
        log,
        trace_file,
    } = args;

    match command.unwrap_or(Commands::Chat) {
        Commands::Set { key, value } => {
            exit_on_setting_error(run_set(key, value));
            Ok(())
        }
        Commands::Unset { key } => {
            exit_on_setting_error(run_unset(&key));
            Ok(())
        }
        Commands::Chat => {
            init_tracing(trace_file.as_deref())?;
            let config = Config::load()?;
            let client = connect(&config, base_url.as_deref())?;
            let options = ChatOptions {
                username: config.username.clone(),
                reveal_interval_ms: config.reveal_interval_ms(),
                log_file: log,
                email_hint: config.admin_email.clone(),
            };
            match run_chat(Arc::clone(&client), options).await? {
                ChatExit::Quit => Ok(()),
                ChatExit::Admin => open_console(client, &config, true).await,
            }
        }
        Commands::Admin => {
            init_tracing(trace_file.as_deref())?;
            let config = Config::load()?;
            let client = connect(&config, base_url.as_deref())?;
            open_console(client, &config, false).await
        }
    }
}

fn connect(config: &Config, base_url: Option<&str>) -> Result<Arc<RexClient>, Box<dyn Error>> {
    let base_url = config.resolve_base_url(base_url);
    info!(%base_url, "connecting to Rex backend");
    Ok(Arc::new(RexClient::new(&base_url)?))
}

async fn open_console(
    client: Arc<RexClient>,
    config: &Config,
    authenticated: bool,
) -> Result<(), Box<dyn Error>> {
    let mut io = TerminalIo;
    match run_admin(client, &mut io, config.admin_email.as_deref(), authenticated).await? {
        None => println!("Login cancelled."),
        Some(ConsoleExit::LoggedOut) => println!("Session closed."),
        Some(ConsoleExit::Quit) => {}
    }
    Ok(())
}
