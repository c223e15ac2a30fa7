//! Command handlers: validate, load, mutate, save, reply.
//!
//! Every handler works on a freshly loaded store and writes the full store
//! back before replying. Validation failures come back as `Ok(reply)` and never
//! touch the store; only store failures are `Err`.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    account::{AccountRecord, Field},
    amount::{format_amount, parse_amount},
    domain::UserId,
    store::{AccountStore, Store},
    Result,
};

pub const SAVE_USAGE: &str = "Please provide a valid amount. Usage: /save 5000";
pub const SPEND_USAGE: &str = "Please provide a valid amount. Usage: /spend 3000";
pub const EDIT_USAGE: &str = "Usage: /edit save/spend amount\nExample: /edit save 10000";
pub const EDIT_INVALID_AMOUNT: &str = "Invalid amount.";
pub const EDIT_INVALID_FIELD: &str = "Only 'save' or 'spend' can be edited.";
pub const NO_RECORDS: &str = "No records found yet.";
pub const TOTAL_OUT_OF_RANGE: &str = "That amount would push your total out of range.";

/// Point-in-time view of one user's totals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub saved: f64,
    pub spent: f64,
    pub balance: f64,
}

impl From<&AccountRecord> for Summary {
    fn from(r: &AccountRecord) -> Self {
        Self {
            saved: r.saved,
            spent: r.spent,
            balance: r.balance(),
        }
    }
}

pub struct Ledger {
    store: Arc<dyn AccountStore>,
    currency: String,
    // Serializes load-mutate-save across concurrently dispatched updates.
    lock: Mutex<()>,
}

impl Ledger {
    pub fn new(store: Arc<dyn AccountStore>, currency: impl Into<String>) -> Self {
        Self {
            store,
            currency: currency.into(),
            lock: Mutex::new(()),
        }
    }

    /// `/save <amount>`: add to the saved total.
    pub fn record_save(&self, user_id: UserId, args: &[&str]) -> Result<String> {
        let Ok(amount) = parse_amount(args.first().copied()) else {
            tracing::debug!(user_id = user_id.0, "rejected save amount");
            return Ok(SAVE_USAGE.to_string());
        };

        if !self.accumulate(user_id, Field::Save, amount)? {
            tracing::debug!(user_id = user_id.0, amount, "rejected save: total out of range");
            return Ok(TOTAL_OUT_OF_RANGE.to_string());
        }
        tracing::info!(user_id = user_id.0, amount, "recorded save");

        Ok(format!(
            "✅ Saved {} {}!",
            format_amount(amount),
            self.currency
        ))
    }

    /// `/spend <amount>`: add to the spent total.
    pub fn record_spend(&self, user_id: UserId, args: &[&str]) -> Result<String> {
        let Ok(amount) = parse_amount(args.first().copied()) else {
            tracing::debug!(user_id = user_id.0, "rejected spend amount");
            return Ok(SPEND_USAGE.to_string());
        };

        if !self.accumulate(user_id, Field::Spend, amount)? {
            tracing::debug!(user_id = user_id.0, amount, "rejected spend: total out of range");
            return Ok(TOTAL_OUT_OF_RANGE.to_string());
        }
        tracing::info!(user_id = user_id.0, amount, "recorded spend");

        Ok(format!(
            "💸 Spent {} {}!",
            format_amount(amount),
            self.currency
        ))
    }

    /// `/summary`: read-only; an unseen user gets no record created.
    pub fn get_summary(&self, user_id: UserId) -> Result<String> {
        let Some(s) = self.summary(user_id)? else {
            return Ok(NO_RECORDS.to_string());
        };

        let unit = &self.currency;
        Ok(format!(
            "📊 Summary:\nSaved: {} {unit}\nSpent: {} {unit}\nBalance: {} {unit}",
            format_amount(s.saved),
            format_amount(s.spent),
            format_amount(s.balance),
        ))
    }

    /// `/edit <save|spend> <amount>`: replace one total.
    pub fn edit_field(&self, user_id: UserId, args: &[&str]) -> Result<String> {
        let [field, amount] = args else {
            return Ok(EDIT_USAGE.to_string());
        };

        // Amount is checked before the field name.
        let Ok(amount) = parse_amount(Some(*amount)) else {
            tracing::debug!(user_id = user_id.0, "rejected edit amount");
            return Ok(EDIT_INVALID_AMOUNT.to_string());
        };
        let Ok(field) = field.parse::<Field>() else {
            tracing::debug!(user_id = user_id.0, field = %field, "rejected edit field");
            return Ok(EDIT_INVALID_FIELD.to_string());
        };

        self.transact(|store| store.get_or_create(user_id).set(field, amount))?;
        tracing::info!(user_id = user_id.0, %field, amount, "edited total");

        Ok(format!(
            "✏️ Edited {field} to {} {}.",
            format_amount(amount),
            self.currency
        ))
    }

    /// Current totals, or `None` for a user with no record.
    pub fn summary(&self, user_id: UserId) -> Result<Option<Summary>> {
        let _guard = self.guard();
        let store = self.store.load()?;
        Ok(store.get(user_id).map(Summary::from))
    }

    /// Add `amount` to one total. Returns `false`, leaving the store untouched,
    /// when the new total would not be finite.
    fn accumulate(&self, user_id: UserId, field: Field, amount: f64) -> Result<bool> {
        let _guard = self.guard();
        let mut store = self.store.load()?;
        let current = store.get(user_id).map_or(0.0, |r| r.get(field));
        if !(current + amount).is_finite() {
            return Ok(false);
        }
        store.get_or_create(user_id).add(field, amount);
        self.store.save(&store)?;
        Ok(true)
    }

    fn transact<T>(&self, f: impl FnOnce(&mut Store) -> T) -> Result<T> {
        let _guard = self.guard();
        let mut store = self.store.load()?;
        let out = f(&mut store);
        self.store.save(&store)?;
        Ok(out)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // The lock protects no data of its own, so a poisoned guard is still usable.
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }
}
