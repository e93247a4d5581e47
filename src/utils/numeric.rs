use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

// 浮點乘法的誤差 (例如 0.65 * 100 = 65.00000000000001) 不應被向上取整放大
const CEIL_TOLERANCE: f64 = 1e-9;

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?\d+(?:\.\d+)?").expect("valid number pattern"));

const CURRENCY_PREFIXES: &[char] = &['¥', '￥', '$', '€', '£'];

/// Rounds toward positive infinity at the given number of decimal places.
///
/// `ceil_to(12.001 + 3.0, 2) == 15.01`; values already on the grid are left alone.
pub fn ceil_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    // 放大後溢位代表數值已遠超小數精度，直接回傳原值
    if !scaled.is_finite() {
        return value + 0.0;
    }
    // + 0.0 把 -0.0 正規化為 0.0
    (scaled - CEIL_TOLERANCE).ceil() / factor + 0.0
}

/// Best-effort numeric reading of a generation-service value.
///
/// Accepts JSON numbers and numeric strings, tolerating a leading currency
/// sign and trailing units (`"¥12"`, `"12元"`, `"350 kcal"`). Booleans, nulls,
/// arrays and objects yield `None`.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn parse_numeric_str(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_start_matches(CURRENCY_PREFIXES).trim();
    if let Ok(parsed) = trimmed.parse::<f64>() {
        return Some(parsed);
    }
    LEADING_NUMBER
        .find(trimmed)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Non-negative reading used for prices and nutrition amounts; anything
/// unreadable or negative becomes 0.
pub fn coerce_non_negative(value: &Value) -> f64 {
    coerce_number(value).filter(|n| *n >= 0.0).unwrap_or(0.0)
}
