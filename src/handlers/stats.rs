use axum::{extract::State, Json};

use crate::{
    db::repositories::{WarehouseCounts, WarehouseRepository},
    error::Result,
    state::AppState,
};

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<WarehouseCounts>> {
    Ok(Json(WarehouseRepository::new(state.db.clone()).counts().await?))
}
