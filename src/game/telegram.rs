//! Telegram side of the game, using teloxide.

use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode, ReactionType};
use tracing::{info, warn};

use crate::game::runner::GameChat;

/// Telegram API client.
pub struct TelegramClient {
    bot: Bot,
    /// Emoji put on correct answers.
    success_reaction: String,
}

impl TelegramClient {
    pub fn new(bot: Bot, success_reaction: impl Into<String>) -> Self {
        Self {
            bot,
            success_reaction: success_reaction.into(),
        }
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64, String> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Html)
            .await
            .map(|msg| msg.id.0 as i64)
            .map_err(|e| {
                let msg = format!("Failed to send: {e}");
                warn!("{}", msg);
                msg
            })
    }

    pub async fn set_message_reaction(
        &self,
        chat_id: i64,
        message_id: i64,
        emoji: &str,
    ) -> Result<(), String> {
        info!("Adding reaction {} to msg {} in chat {}", emoji, message_id, chat_id);

        let reaction = ReactionType::Emoji {
            emoji: emoji.to_string(),
        };

        self.bot
            .set_message_reaction(ChatId(chat_id), MessageId(message_id as i32))
            .reaction(vec![reaction])
            .await
            .map_err(|e| {
                let msg = format!("Failed to add reaction: {e}");
                warn!("{}", msg);
                msg
            })?;

        Ok(())
    }
}

impl GameChat for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64, String> {
        TelegramClient::send_message(self, chat_id, text).await
    }

    async fn react_success(&self, chat_id: i64, message_id: i64) -> Result<(), String> {
        self.set_message_reaction(chat_id, message_id, &self.success_reaction).await
    }
}
