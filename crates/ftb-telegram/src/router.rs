use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use ftb_core::{config::Config, ledger::Ledger, messaging::port::MessagingPort};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
    pub messenger: Arc<dyn MessagingPort>,
}

pub async fn run_polling(cfg: Arc<Config>, ledger: Arc<Ledger>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    // Basic startup info.
    match bot.get_me().await {
        Ok(me) => tracing::info!(username = %me.username(), "bot started"),
        Err(e) => tracing::warn!(error = %e, "could not fetch bot identity"),
    }
    tracing::info!(data_file = %cfg.data_file.display(), currency = %cfg.currency_label, "using store");

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(
        bot.clone(),
        cfg.telegram_max_retries,
    ));

    let state = Arc::new(AppState { ledger, messenger });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
