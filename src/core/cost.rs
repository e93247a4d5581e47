use crate::domain::model::DishRecord;
use crate::utils::numeric::{ceil_to, coerce_non_negative};
use serde_json::Value;

/// Shapes a "list of dishes" actually arrives in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DishCollection<'a> {
    /// A JSON array, or the array under an `items` wrapper.
    List(&'a [Value]),
    /// Anything else, treated as a one-element list.
    Single(&'a Value),
}

impl<'a> DishCollection<'a> {
    pub fn from_value(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => DishCollection::List(items),
            // 以 items 包裝的清單
            Value::Object(map) => match map.get("items") {
                Some(Value::Array(items)) => DishCollection::List(items),
                Some(other) => DishCollection::Single(other),
                None => DishCollection::Single(value),
            },
            other => DishCollection::Single(other),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Value> {
        match *self {
            DishCollection::List(items) => items.iter(),
            DishCollection::Single(value) => std::slice::from_ref(value).iter(),
        }
    }
}

/// Sums `price` over every mapping in `value`, rounded up to the cent.
///
/// Elements that are not mappings contribute nothing; the result is never
/// negative and never an error.
pub fn calculate_total_cost(value: &Value) -> f64 {
    // 非物件元素不計價，缺少或無法解析的價格視為 0
    let total: f64 = DishCollection::from_value(value)
        .iter()
        .filter_map(Value::as_object)
        .map(|dish| dish.get("price").map(coerce_non_negative).unwrap_or(0.0))
        .sum();

    // 加總溢位時無法給出有意義的總價
    if !total.is_finite() {
        tracing::warn!("Total cost overflowed, reporting 0");
        return 0.0;
    }
    ceil_to(total, 2)
}

pub fn total_cost_of(dishes: &[DishRecord]) -> f64 {
    match serde_json::to_value(dishes) {
        Ok(value) => calculate_total_cost(&value),
        Err(e) => {
            tracing::warn!("Could not serialize dishes for costing: {}", e);
            0.0
        }
    }
}
