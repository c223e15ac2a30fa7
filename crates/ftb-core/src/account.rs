use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Running totals for one user.
///
/// The persisted document uses the keys `save` / `spend`; keys missing from an
/// older document load as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    #[serde(rename = "save", default)]
    pub saved: f64,
    #[serde(rename = "spend", default)]
    pub spent: f64,
}

impl AccountRecord {
    /// Derived, never persisted.
    pub fn balance(&self) -> f64 {
        self.saved - self.spent
    }

    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Save => self.saved,
            Field::Spend => self.spent,
        }
    }

    pub fn add(&mut self, field: Field, amount: f64) {
        match field {
            Field::Save => self.saved += amount,
            Field::Spend => self.spent += amount,
        }
    }

    pub fn set(&mut self, field: Field, amount: f64) {
        match field {
            Field::Save => self.saved = amount,
            Field::Spend => self.spent = amount,
        }
    }
}

/// One of the two editable totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Save,
    Spend,
}

impl Field {
    pub const SAVE: &'static str = "save";
    pub const SPEND: &'static str = "spend";

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Save => Self::SAVE,
            Field::Spend => Self::SPEND,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            Self::SAVE => Ok(Field::Save),
            Self::SPEND => Ok(Field::Spend),
            _ => Err(UnknownField(s.to_string())),
        }
    }
}
