use axum::extract::{Json, State};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extractors::ApiQuery;
use crate::repositories::permissions::PermissionFilter;
use crate::services::permissions::{self, PermissionView};
use crate::state::AppState;

use super::SUCCESS;

#[derive(Deserialize)]
pub struct PermissionQuery {
    pub user_id: Option<i32>,
    pub entity_type: Option<String>,
    pub entity_id: Option<i32>,
}

#[derive(Serialize)]
pub struct PermissionListResponse {
    pub status: &'static str,
    pub count: usize,
    pub permissions: Vec<PermissionView>,
}

pub async fn list_permissions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PermissionQuery>,
) -> AppResult<Json<PermissionListResponse>> {
    let filter = PermissionFilter {
        user_id: query.user_id,
        entity_type: query.entity_type.filter(|value| !value.is_empty()),
        entity_id: query.entity_id,
    };

    let mut conn = state.db()?;
    let permissions = permissions::list_permissions(&mut conn, &filter)?;

    Ok(Json(PermissionListResponse {
        status: SUCCESS,
        count: permissions.len(),
        permissions,
    }))
}
