//! Amount parsing and display.

/// Why an amount argument was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is missing")]
    Missing,

    #[error("not a number: {0}")]
    Invalid(String),

    #[error("amount must be finite: {0}")]
    NotFinite(String),
}

/// Parse a user-supplied amount.
///
/// Accepts integers, decimals, a leading sign and exponent notation. Values
/// that cannot be written as a JSON number (`inf`, `NaN`) are rejected.
pub fn parse_amount(raw: Option<&str>) -> Result<f64, AmountError> {
    let Some(raw) = raw else {
        return Err(AmountError::Missing);
    };
    let s = raw.trim();
    if s.is_empty() {
        return Err(AmountError::Missing);
    }

    let v = s
        .parse::<f64>()
        .map_err(|_| AmountError::Invalid(s.to_string()))?;
    if !v.is_finite() {
        return Err(AmountError::NotFinite(s.to_string()));
    }
    Ok(v)
}

/// Render an amount the way replies show it: whole numbers keep one decimal
/// place (`5000.0`), other values use the shortest exact form, and magnitudes
/// from `1e16` up or below `1e-4` switch to exponent form (`1e+16`, `1.5e-07`).
pub fn format_amount(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return format!("{v}");
    }

    let sci = format!("{v:e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    if v != 0.0 && (exp >= 16 || exp < -4) {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exp.abs());
    }

    if v.fract() == 0.0 {
        return format!("{v:.1}");
    }
    format!("{v}")
}
