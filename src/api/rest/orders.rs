use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, put};
use serde::Serialize;
use serde_json::Value;

use crate::engine::intake::parse_new_order;
use crate::error::AppError;
use crate::models::order::{Order, OrderStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/status", put(update_order_status))
}

#[derive(Serialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order_id: String,
    pub total_amount: f64,
    pub estimated_time: u32,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct UpdateStatusResponse {
    pub success: bool,
    pub message: String,
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>, AppError> {
    let Json(payload) = payload?;
    let new_order = parse_new_order(&payload)?;
    let order = state.store.create_order(new_order).await?;

    state.metrics.orders_created_total.inc();
    state.metrics.order_revenue_total.inc_by(order.total_amount);
    tracing::info!(
        order_id = %order.id,
        table_number = order.table_number,
        total_amount = order.total_amount,
        "order placed"
    );

    Ok(Json(CreateOrderResponse {
        success: true,
        order_id: order.id,
        total_amount: order.total_amount,
        estimated_time: order.estimated_time,
        message: "Order placed successfully!",
    }))
}

async fn list_orders(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.store.list_orders().await?))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.store.get_order(&id).await?))
}

async fn update_order_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdateStatusResponse>, AppError> {
    let Json(payload) = payload?;
    let raw = payload
        .get("status")
        .ok_or_else(|| AppError::BadRequest("Status is required".to_string()))?;
    let status = raw
        .as_str()
        .ok_or_else(|| AppError::BadRequest("Status must be a string".to_string()))?
        .parse::<OrderStatus>()
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    state.store.update_status(&id, status).await?;

    state
        .metrics
        .order_status_updates_total
        .with_label_values(&[status.as_str()])
        .inc();
    tracing::info!(order_id = %id, %status, "order status updated");

    Ok(Json(UpdateStatusResponse {
        success: true,
        message: format!("Order status updated to {status}"),
    }))
}
