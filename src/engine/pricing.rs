use serde_json::Value;
use uuid::Uuid;

/// Base preparation time before per-item minutes are added.
pub const BASE_PREP_MINUTES: u32 = 5;
pub const MINUTES_PER_ITEM: u32 = 2;

pub fn item_price(item: &Value) -> f64 {
    item.get("price").and_then(Value::as_f64).unwrap_or(0.0)
}

pub fn item_quantity(item: &Value) -> u64 {
    item.get("quantity").and_then(Value::as_u64).unwrap_or(1)
}

/// `None` when the sum does not fit a finite decimal.
pub fn total_amount(items: &[Value]) -> Option<f64> {
    let total: f64 = items
        .iter()
        .map(|item| item_price(item) * item_quantity(item) as f64)
        .sum();
    total.is_finite().then_some(total)
}

pub fn item_count(items: &[Value]) -> Option<u64> {
    items
        .iter()
        .try_fold(0u64, |count, item| count.checked_add(item_quantity(item)))
}

/// `None` when the minutes overflow `u32`.
pub fn estimated_minutes(items: &[Value]) -> Option<u32> {
    let count = u32::try_from(item_count(items)?).ok()?;
    count
        .checked_mul(MINUTES_PER_ITEM)?
        .checked_add(BASE_PREP_MINUTES)
}

/// Eight uppercase hex characters taken from a fresh v4 uuid.
pub fn generate_order_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id.to_ascii_uppercase()
}
