use axum::extract::{Json, State};
use serde::Serialize;

use crate::error::AppResult;
use crate::services::statistics::{self, Statistics};
use crate::state::AppState;

use super::SUCCESS;

#[derive(Serialize)]
pub struct StatisticsResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub statistics: Statistics,
}

pub async fn get_statistics(State(state): State<AppState>) -> AppResult<Json<StatisticsResponse>> {
    let mut conn = state.db()?;
    let statistics = statistics::get_statistics(&mut conn)?;

    Ok(Json(StatisticsResponse {
        status: SUCCESS,
        message: "VaultDoc system statistics",
        statistics,
    }))
}
