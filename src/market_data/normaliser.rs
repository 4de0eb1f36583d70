// Convert wire values into plain f64s.
// Venues send prices as JSON numbers or as decimal strings ("1234.56");
// anything that does not coerce to a finite number is treated as absent.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Number or numeric string -> finite f64. Everything else -> None.
pub fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Same as [`number`] but zero means "no quote" (empty depth levels).
pub fn positive_price(value: &Value) -> Option<f64> {
    number(value).filter(|v| *v > 0.0)
}

/// One `[price, qty, ...]` book row. Rows where either leg fails to coerce
/// are dropped by the caller.
pub fn level(row: &Value) -> Option<(f64, f64)> {
    let items = row.as_array()?;
    let price = number(items.first()?)?;
    let qty = number(items.get(1)?)?;
    Some((price, qty))
}

/// Serde hook for optional numeric fields that must never fail the whole
/// payload: missing, null, strings and garbage all land as `None`/value.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number))
}
