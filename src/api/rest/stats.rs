use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::get;

use crate::error::AppError;
use crate::state::AppState;
use crate::store::DailyStats;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(get_stats))
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<DailyStats>, AppError> {
    Ok(Json(state.store.daily_stats().await?))
}
