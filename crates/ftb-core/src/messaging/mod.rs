//! Messenger-agnostic reply types and the outbound port.

pub mod port;
pub mod types;
