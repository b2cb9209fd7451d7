//! Turns a raw create-order body into a [`NewOrder`], rejecting it before
//! anything touches the store.

use serde_json::Value;

use crate::error::AppError;
use crate::models::order::NewOrder;

pub const MIN_TABLE: i64 = 1;
pub const MAX_TABLE: i64 = 50;

pub fn parse_new_order(payload: &Value) -> Result<NewOrder, AppError> {
    let body = payload
        .as_object()
        .ok_or_else(|| AppError::BadRequest("request body must be a JSON object".to_string()))?;

    let (Some(items), Some(table_number)) = (body.get("items"), body.get("table_number")) else {
        return Err(AppError::BadRequest(
            "Missing required fields: items, table_number".to_string(),
        ));
    };

    let table_number = table_number
        .as_i64()
        .filter(|n| (MIN_TABLE..=MAX_TABLE).contains(n))
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Table number must be between {MIN_TABLE} and {MAX_TABLE}"
            ))
        })?;

    let items = items
        .as_array()
        .ok_or_else(|| AppError::BadRequest("items must be an array".to_string()))?;
    for (index, item) in items.iter().enumerate() {
        check_item(index, item)?;
    }

    let customer_name = match body.get("customer_name") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(name)) => name.clone(),
        Some(_) => {
            return Err(AppError::BadRequest(
                "customer_name must be a string".to_string(),
            ));
        }
    };

    Ok(NewOrder {
        customer_name,
        // bounded by MAX_TABLE above
        table_number: table_number as u8,
        items: items.clone(),
    })
}

fn check_item(index: usize, item: &Value) -> Result<(), AppError> {
    let fields = item
        .as_object()
        .ok_or_else(|| AppError::BadRequest(format!("item {index} must be an object")))?;

    if let Some(price) = fields.get("price") {
        if !price.as_f64().is_some_and(|p| p >= 0.0) {
            return Err(AppError::BadRequest(format!(
                "item {index}: price must be a non-negative number"
            )));
        }
    }

    if let Some(quantity) = fields.get("quantity") {
        if quantity.as_u64().is_none() {
            return Err(AppError::BadRequest(format!(
                "item {index}: quantity must be a non-negative integer"
            )));
        }
    }

    Ok(())
}
