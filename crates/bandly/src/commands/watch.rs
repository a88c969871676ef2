//! Live notification stream (`bandly watch`).
//!
//! Opens the session's notification channel and prints alerts as they
//! arrive, maintaining the same bounded feed the UI surfaces use for
//! badges. The channel does not reconnect; a stream error ends the
//! command with a connection exit code.

use bandly_core::{ChannelEvent, NotificationFeed, Session};
use tokio::sync::broadcast::error::RecvError;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

use super::util;

pub async fn handle(session: &mut Session, global: &GlobalOpts) -> Result<(), CliError> {
    let channel = session.open_channel().map_err(CliError::from)?;
    let mut rx = channel.subscribe();
    let mut feed = NotificationFeed::default();

    util::note(global, "Watching notifications (Ctrl-C to stop)...");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                util::note(global, &format!("Stopped. {} notification(s) seen.", feed.len()));
                return Ok(());
            }
            event = rx.recv() => match event {
                Ok(event) => {
                    if let Err(err) = print_event(&event, &mut feed, global) {
                        return Err(err);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "notification consumer lagged");
                }
                Err(RecvError::Closed) => {
                    util::note(global, "Notification stream closed by the server.");
                    return Ok(());
                }
            }
        }
    }
}

fn print_event(
    event: &ChannelEvent,
    feed: &mut NotificationFeed,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match event {
        ChannelEvent::Connected => {
            util::note(global, "Connected.");
            Ok(())
        }
        ChannelEvent::Notification(_) => {
            // Duplicates (same event id) are dropped by the feed.
            if !feed.apply(event) {
                return Ok(());
            }
            let Some(notification) = feed.iter().next() else {
                return Ok(());
            };
            match global.output {
                OutputFormat::Json | OutputFormat::JsonCompact => {
                    println!("{}", notification.payload);
                }
                _ => {
                    let message = notification
                        .message
                        .as_deref()
                        .unwrap_or("(no message)");
                    println!(
                        "{}  {:<24} {}",
                        notification.received_at.format("%H:%M:%S"),
                        notification.kind,
                        message
                    );
                }
            }
            Ok(())
        }
        ChannelEvent::Error { message } => Err(CliError::StreamFailed {
            message: message.clone(),
        }),
    }
}
