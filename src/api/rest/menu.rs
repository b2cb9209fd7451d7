use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::get;

use crate::catalog::{Catalog, MenuCategory};
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/menu", get(get_menu))
        .route("/menu/:category", get(get_category))
}

async fn get_menu(State(state): State<Arc<AppState>>) -> Json<Arc<Catalog>> {
    Json(Arc::clone(&state.catalog))
}

async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<MenuCategory>, AppError> {
    let category = state
        .catalog
        .category(&category)
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    Ok(Json(category.clone()))
}
