//! Line formatting
//!
//! `[YYYY-MM-DD HH:MM:SS] - <message>\n`

use chrono::{DateTime, Local};

/// strftime pattern of the line prefix
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a message with the current local time
pub fn format_message(message: &str) -> String {
    format_message_at(message, Local::now())
}

/// Format a message with an explicit timestamp
///
/// Appends a newline only when the message does not already end in one.
pub fn format_message_at(message: &str, timestamp: DateTime<Local>) -> String {
    let newline = if message.ends_with('\n') { "" } else { "\n" };
    format!(
        "[{}] - {}{}",
        timestamp.format(TIMESTAMP_FORMAT),
        message,
        newline
    )
}
