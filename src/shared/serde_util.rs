//! Custom serde helpers for backend wire formats.
//!
//! The backend is a Python service: prices arrive as JSON floats, strings or
//! `null` depending on the producer, and timestamps as float seconds or
//! integer millis. These helpers accept all of them.

/// Deserializes `number | numeric string | null` into `Option<Decimal>`.
///
/// Unparseable values become `None` rather than failing the whole payload.
pub mod loose_decimal {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(crate::ws::fields::coerce_decimal(&value))
    }
}

/// Deserializes float seconds, integer millis or RFC 3339 into `Option<i64>` epoch millis.
pub mod loose_millis {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(crate::ws::fields::coerce_millis(&value))
    }
}

/// Deserializes a string or number into `String`; `null` becomes empty.
pub mod loose_string {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(crate::ws::fields::coerce_string(&value).unwrap_or_default())
    }
}
