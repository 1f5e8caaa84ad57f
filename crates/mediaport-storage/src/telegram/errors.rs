//! Bot API error classification.

/// Known failure substrings and the message shown for them. Checked in order
/// against the lower-cased error text.
const CLASSIFICATIONS: &[(&[&str], &str)] = &[
    (
        &["unauthorized"],
        "Invalid or expired bot token",
    ),
    (
        &["chat not found"],
        "Chat not found: check the chat id and make sure the bot is a member",
    ),
    (
        &["kicked"],
        "The bot was removed from the chat",
    ),
    (
        &["not enough rights", "have no rights"],
        "The bot has no permission to send messages in this chat",
    ),
    (
        &["file is too big", "too large"],
        "File exceeds the Telegram 50 MB upload limit",
    ),
    (
        &["error sending request", "connection", "timed out", "dns", "network"],
        "Could not reach the Telegram API: check the network or proxy domain",
    ),
];

/// Map raw Bot API or transport error text to a user-facing message.
/// Unrecognized text is returned unchanged.
pub fn classify(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    CLASSIFICATIONS
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| lowered.contains(needle)))
        .map(|(_, message)| message.to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}
