use axum::extract::{Json, State};
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::extractors::{ApiJson, ApiPath};
use crate::services::folders::{self, FolderSummary, UpdateFolderInput};
use crate::state::AppState;
use crate::utils::json::{classify_nullable_id, classify_nullable_string, NullableValue};

use super::SUCCESS;

#[derive(Serialize)]
pub struct FolderListResponse {
    pub status: &'static str,
    pub count: usize,
    pub folders: Vec<FolderSummary>,
}

#[derive(Serialize)]
pub struct FolderResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub folder: FolderSummary,
}

pub async fn list_folders(State(state): State<AppState>) -> AppResult<Json<FolderListResponse>> {
    let mut conn = state.db()?;
    let folders = folders::list_folders(&mut conn)?;

    Ok(Json(FolderListResponse {
        status: SUCCESS,
        count: folders.len(),
        folders,
    }))
}

/// Renames and/or moves a folder. `"parent_id": null` moves it to the root;
/// leaving the key out keeps the current parent.
pub async fn update_folder(
    State(state): State<AppState>,
    ApiPath(folder_id): ApiPath<i32>,
    ApiJson(body): ApiJson<Value>,
) -> AppResult<Json<FolderResponse>> {
    let name = match classify_nullable_string(body.get("name")).map_err(AppError::bad_request)? {
        NullableValue::Omitted => None,
        NullableValue::Null => return Err(AppError::bad_request("name cannot be null")),
        NullableValue::Value(name) => Some(name),
    };
    let parent_id = match classify_nullable_id(body.get("parent_id")).map_err(AppError::bad_request)? {
        NullableValue::Omitted => None,
        NullableValue::Null => Some(None),
        NullableValue::Value(parent_id) => Some(Some(parent_id)),
    };

    let mut conn = state.db()?;
    let folder = folders::update_folder(&mut conn, folder_id, UpdateFolderInput { name, parent_id })?;

    Ok(Json(FolderResponse {
        status: SUCCESS,
        message: "folder updated",
        folder,
    }))
}
