//! Incoming chat messages as seen by the game.

use teloxide::types::Message;

/// The parts of a Telegram message the game cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub message_id: i64,
    /// Chat the message was sent in (negative = group, positive = DM).
    pub chat_id: i64,
    pub user_id: i64,
    pub text: String,
}

impl IncomingMessage {
    /// Convert a Telegram message. Messages without a sender are skipped.
    pub fn from_telegram(msg: &Message) -> Option<Self> {
        let user = msg.from.as_ref()?;
        Some(Self {
            message_id: msg.id.0 as i64,
            chat_id: msg.chat.id.0,
            user_id: user.id.0 as i64,
            text: msg.text().unwrap_or("").to_string(),
        })
    }
}
