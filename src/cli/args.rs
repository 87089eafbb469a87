//! Command-line argument parsing.
//!
//! Flags are checked in order and the first one wins. Anything that is not a
//! flag is a message to send.

use crate::client::DEFAULT_HISTORY_LIMIT;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Check backend health
    Health,
    /// List available tools
    Tools,
    /// Print the last `n` messages of the server conversation
    History(usize),
    /// Reset the server conversation
    Reset,
    /// Send each message in turn; read stdin lines when empty (default)
    Chat(Vec<String>),
}

/// Parse command-line arguments and return the command to run.
///
/// # Examples
///
/// ```
/// use kortix_chat::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["kortix-chat".to_string(), "--history".to_string(), "5".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::History(5));
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut args = args.skip(1).peekable();
    let mut messages = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--health" => return CliCommand::Health,
            "--tools" => return CliCommand::Tools,
            "--reset" => return CliCommand::Reset,
            "--history" => {
                let limit = args
                    .peek()
                    .and_then(|next| next.parse::<usize>().ok())
                    .unwrap_or(DEFAULT_HISTORY_LIMIT);
                return CliCommand::History(limit);
            }
            "--" => {
                messages.extend(args.by_ref());
            }
            flag if flag.starts_with("--") => {
                tracing::warn!("Ignoring unknown flag {}", flag);
            }
            _ => messages.push(arg),
        }
    }

    CliCommand::Chat(messages)
}

pub fn usage() -> String {
    format!(
        "Usage: {bin} [OPTIONS] [MESSAGE]...

Send each MESSAGE to the chat backend and print the streamed reply.
With no MESSAGE, every line read from stdin is sent.

Options:
  --health         Check backend health
  --tools          List available tools
  --history [N]    Print the last N messages (default {limit})
  --reset          Reset the server conversation
  -V, --version    Print version
  -h, --help       Print this help

Environment:
  CHAT_API_URL            Backend base URL
  CHAT_API_VERSION        API version segment
  CHAT_API_TIMEOUT_SECS   Request timeout in seconds
  CHAT_LOCALE             zh or en",
        bin = super::version::BIN_NAME,
        limit = DEFAULT_HISTORY_LIMIT,
    )
}
