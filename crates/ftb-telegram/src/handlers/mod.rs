//! Telegram update handlers.
//!
//! Commands are parsed here and handed to the core ledger; the reply goes back
//! through the messaging port.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use ftb_core::{
    domain::{ChatId, UserId},
    messaging::types::Reply,
};

use crate::router::AppState;

mod commands;

pub use commands::{parse_command, respond, STORE_FAILURE};

const NOT_A_COMMAND: &str = "Send /start to see available commands.";

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let chat_id = ChatId(msg.chat.id.0);
    let user_id = UserId(user.id.0 as i64);

    let reply = if text.starts_with('/') {
        respond(&state, user_id, text).await
    } else {
        Reply::text(NOT_A_COMMAND)
    };

    if let Err(e) = state.messenger.send_reply(chat_id, reply).await {
        tracing::warn!(chat_id = chat_id.0, error = %e, "failed to send reply");
    }

    Ok(())
}
