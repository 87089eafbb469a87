//! Command-line interface.
//!
//! - Argument parsing
//! - Version and usage display
//! - One handler per command
//!
//! # Usage
//!
//! ```ignore
//! use kortix_chat::cli::{parse_args, run_cli_command};
//! use kortix_chat::config::ApiConfig;
//!
//! let command = parse_args(std::env::args());
//! run_cli_command(command, ApiConfig::from_env()).await?;
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, usage, CliCommand};
pub use commands::{
    handle_health_command, handle_history_command, handle_reset_command, handle_tools_command,
    render_update, run_chat,
};
pub use version::{handle_version_command, VERSION};

use color_eyre::Result;

use crate::client::ChatClient;
use crate::config::ApiConfig;
use crate::session::ConversationSession;

/// Run a parsed command against the backend described by `config`.
pub async fn run_cli_command(command: CliCommand, config: ApiConfig) -> Result<()> {
    let client = ChatClient::new(config);
    let mut stdout = std::io::stdout();

    match command {
        CliCommand::Version => {
            handle_version_command();
            Ok(())
        }
        CliCommand::Help => {
            println!("{}", usage());
            Ok(())
        }
        CliCommand::Health => handle_health_command(&client, &mut stdout).await,
        CliCommand::Tools => handle_tools_command(&client, &mut stdout).await,
        CliCommand::History(limit) => handle_history_command(&client, limit, &mut stdout).await,
        CliCommand::Reset => handle_reset_command(&client, &mut stdout).await,
        CliCommand::Chat(messages) => {
            tracing::info!(
                base_url = %client.config().base_url,
                api_version = %client.config().api_version,
                "Starting chat session"
            );
            run_chat(ConversationSession::new(client), messages, stdout).await
        }
    }
}
