//! Telegram adapter (teloxide).
//!
//! This crate implements the `ftb-core` MessagingPort over Telegram Bot API and
//! routes incoming commands into the core ledger.

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup},
};

use tokio::time::sleep;

pub mod handlers;
pub mod router;

use ftb_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{port::MessagingPort, types::ReplyKeyboard},
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
    max_retries: usize,
}

impl TelegramMessenger {
    pub fn new(bot: Bot, max_retries: usize) -> Self {
        Self { bot, max_retries }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }

    fn markup(keyboard: ReplyKeyboard) -> KeyboardMarkup {
        let rows: Vec<Vec<KeyboardButton>> = keyboard
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(KeyboardButton::new).collect())
            .collect();
        KeyboardMarkup::new(rows).resize_keyboard(keyboard.resize)
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(teloxide::RequestError::RetryAfter(d)) if attempts < self.max_retries => {
                    attempts += 1;
                    tracing::warn!(attempt = attempts, wait = ?d, "telegram flood limit hit");
                    sleep(d).await;
                }
                Err(other) => return Err(Self::map_err(other)),
            }
        }
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| self.bot.send_message(Self::tg_chat(chat_id), text.to_string()))
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn send_with_keyboard(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: ReplyKeyboard,
    ) -> Result<MessageRef> {
        let markup = Self::markup(keyboard);

        let msg = self
            .with_retry(|| {
                self.bot
                    .send_message(Self::tg_chat(chat_id), text.to_string())
                    .reply_markup(markup.clone())
            })
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }
}
