use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::{Reply, ReplyKeyboard},
    Result,
};

/// Outbound messaging port. Telegram is the only implementation today.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef>;

    async fn send_with_keyboard(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: ReplyKeyboard,
    ) -> Result<MessageRef>;

    async fn send_reply(&self, chat_id: ChatId, reply: Reply) -> Result<MessageRef> {
        match reply.keyboard {
            Some(kb) => self.send_with_keyboard(chat_id, &reply.text, kb).await,
            None => self.send_text(chat_id, &reply.text).await,
        }
    }
}
