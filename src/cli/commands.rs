//! Handlers for the individual CLI commands.
//!
//! Handlers write to any `io::Write` so they can be exercised against a
//! buffer in tests.

use std::io::Write;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::client::ChatClient;
use crate::session::{ConversationSession, SessionUpdate};
use crate::traits::HttpClient;

/// Handle `--health`.
pub async fn handle_health_command<C: HttpClient, W: Write>(
    client: &ChatClient<C>,
    out: &mut W,
) -> Result<()> {
    let health = client.health().await?;
    writeln!(out, "status: {}", health.status)?;
    if let Some(timestamp) = &health.timestamp {
        writeln!(out, "timestamp: {}", timestamp)?;
    }
    if !health.tools_enabled.is_empty() {
        writeln!(out, "tools: {}", health.tools_enabled.join(", "))?;
    }

    if !health.is_healthy() {
        return Err(eyre!("backend reported status '{}'", health.status));
    }
    Ok(())
}

/// Handle `--tools`.
pub async fn handle_tools_command<C: HttpClient, W: Write>(
    client: &ChatClient<C>,
    out: &mut W,
) -> Result<()> {
    let tools = client.tools().await?;
    if tools.is_empty() {
        writeln!(out, "No tools available")?;
        return Ok(());
    }
    for tool in tools {
        writeln!(out, "{} - {}", tool.name, tool.description)?;
        for function in tool.functions {
            writeln!(out, "    {}: {}", function.name, function.description)?;
        }
    }
    Ok(())
}

/// Handle `--history [n]`.
pub async fn handle_history_command<C: HttpClient, W: Write>(
    client: &ChatClient<C>,
    limit: usize,
    out: &mut W,
) -> Result<()> {
    let history = client.history(limit).await?;
    for message in &history.messages {
        writeln!(out, "[{}] {}", message.role, message.content)?;
    }
    writeln!(
        out,
        "({} of {} messages)",
        history.messages.len(),
        history.total
    )?;
    Ok(())
}

/// Handle `--reset`.
pub async fn handle_reset_command<C: HttpClient, W: Write>(
    client: &ChatClient<C>,
    out: &mut W,
) -> Result<()> {
    let ack = client.reset().await?;
    writeln!(
        out,
        "{}",
        ack.message.as_deref().unwrap_or("Conversation reset")
    )?;
    Ok(())
}

/// Send each message through the session, printing replies as they stream.
///
/// With no messages, stdin is read line by line until EOF. Blank messages are
/// skipped in both modes.
pub async fn run_chat<C, W>(
    mut session: ConversationSession<C>,
    messages: Vec<String>,
    out: W,
) -> Result<()>
where
    C: HttpClient,
    W: Write + Send + 'static,
{
    let updates = session.subscribe();
    let printer = tokio::spawn(print_updates(updates, out));

    if messages.is_empty() {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            session.send(&line).await?;
        }
    } else {
        for message in messages.iter().filter(|m| !m.trim().is_empty()) {
            session.send(message).await?;
        }
    }

    // Closing the last sender lets the printer drain and exit.
    drop(session);
    printer.await??;
    Ok(())
}

async fn print_updates<W: Write>(
    mut updates: mpsc::UnboundedReceiver<SessionUpdate>,
    mut out: W,
) -> Result<()> {
    let mut mid_reply = false;
    while let Some(update) = updates.recv().await {
        render_update(&update, &mut mid_reply, &mut out)?;
    }
    Ok(())
}

/// Write the visible effect of one session update.
///
/// `mid_reply` is set while a reply has been partly printed on the current line.
pub fn render_update<W: Write>(
    update: &SessionUpdate,
    mid_reply: &mut bool,
    out: &mut W,
) -> std::io::Result<()> {
    match update {
        SessionUpdate::PendingAppended { delta } => {
            write!(out, "{}", delta)?;
            out.flush()?;
            *mid_reply = true;
        }
        SessionUpdate::TurnCompleted(message) => {
            if !*mid_reply {
                write!(out, "{}", message.content)?;
            }
            writeln!(out)?;
            *mid_reply = false;
        }
        SessionUpdate::TurnFailed { message, .. } => {
            if *mid_reply {
                writeln!(out)?;
            }
            writeln!(out, "{}", message.content)?;
            *mid_reply = false;
        }
        SessionUpdate::UserMessageAdded(_)
        | SessionUpdate::Reset
        | SessionUpdate::HistoryReplaced { .. } => {}
    }
    Ok(())
}
