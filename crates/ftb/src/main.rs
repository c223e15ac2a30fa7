use std::sync::Arc;

use ftb_core::{config::Config, ledger::Ledger, store::JsonFileStore};

#[tokio::main]
async fn main() -> Result<(), ftb_core::Error> {
    ftb_core::logging::init("ftb")?;

    let cfg = Arc::new(Config::load()?);

    let store = Arc::new(JsonFileStore::new(cfg.data_file.clone()));
    let ledger = Arc::new(Ledger::new(store, cfg.currency_label.clone()));

    tracing::info!("finance tracker bot is running");
    ftb_telegram::router::run_polling(cfg, ledger)
        .await
        .map_err(|e| ftb_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
