use std::sync::Arc;

use ftb_core::{
    domain::UserId,
    errors::Error,
    ledger::Ledger,
    messaging::types::{Reply, ReplyKeyboard},
};

use crate::router::AppState;

pub const STORE_FAILURE: &str = "⚠️ Could not access your records right now. Please try again later.";

const WELCOME: &str = "💰 Welcome to your Finance Tracker Bot!\n\n\
/save <amount> - Record money saved\n\
/spend <amount> - Record money spent\n\
/summary - Show totals and balance\n\
/edit save|spend <amount> - Replace a total";

/// Split `/cmd@botname arg1 arg2` into the lowercased command name and the
/// rest of the line.
pub fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

fn menu_keyboard() -> ReplyKeyboard {
    ReplyKeyboard::new([["/save", "/spend"], ["/summary", "/edit"]]).resized()
}

fn route(ledger: &Ledger, user_id: UserId, cmd: &str, arg: &str) -> ftb_core::Result<Reply> {
    let args: Vec<&str> = arg.split_whitespace().collect();

    let text = match cmd {
        "start" | "help" => return Ok(Reply::with_keyboard(WELCOME, menu_keyboard())),
        "save" => ledger.record_save(user_id, &args)?,
        "spend" => ledger.record_spend(user_id, &args)?,
        "summary" => ledger.get_summary(user_id)?,
        "edit" => ledger.edit_field(user_id, &args)?,
        _ => format!("Unknown command: /{cmd}"),
    };

    Ok(Reply::text(text))
}

/// Run one command against the ledger and build the reply.
///
/// Store work happens on the blocking pool. A store failure is logged and
/// turned into a generic apology; it never reaches the dispatcher.
pub async fn respond(state: &AppState, user_id: UserId, text: &str) -> Reply {
    let (cmd, arg) = parse_command(text);
    let ledger = Arc::clone(&state.ledger);
    let cmd_name = cmd.clone();

    let result = tokio::task::spawn_blocking(move || route(&ledger, user_id, &cmd, &arg))
        .await
        .map_err(|e| Error::External(format!("ledger task failed: {e}")))
        .and_then(|r| r);

    match result {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(user_id = user_id.0, command = %cmd_name, error = %e, "command failed");
            Reply::text(STORE_FAILURE)
        }
    }
}
