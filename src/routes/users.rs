use axum::extract::{Json, State};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extractors::{ApiPath, ApiQuery, OptionalJson};
use crate::services::users::{self, UpdateUserInput, UserSummary};
use crate::state::AppState;

use super::SUCCESS;

#[derive(Deserialize, Default, Debug)]
pub struct UpdateUserParams {
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateUserParams {
    /// Body fields win over query-string fields.
    fn overlay(self, body: Option<Self>) -> Self {
        let body = body.unwrap_or_default();
        Self {
            full_name: body.full_name.or(self.full_name),
            role: body.role.or(self.role),
            is_active: body.is_active.or(self.is_active),
        }
    }
}

#[derive(Serialize)]
pub struct UserListResponse {
    pub status: &'static str,
    pub count: usize,
    pub users: Vec<UserSummary>,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub user: UserSummary,
}

pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<UserListResponse>> {
    let mut conn = state.db()?;
    let users = users::list_users(&mut conn)?;

    Ok(Json(UserListResponse {
        status: SUCCESS,
        count: users.len(),
        users,
    }))
}

pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i32>,
) -> AppResult<Json<UserResponse>> {
    let mut conn = state.db()?;
    let user = users::get_user(&mut conn, user_id)?;

    Ok(Json(UserResponse {
        status: SUCCESS,
        message: None,
        user,
    }))
}

pub async fn update_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i32>,
    ApiQuery(query): ApiQuery<UpdateUserParams>,
    OptionalJson(body): OptionalJson<UpdateUserParams>,
) -> AppResult<Json<UserResponse>> {
    let params = query.overlay(body);
    let mut conn = state.db()?;
    let user = users::update_user(
        &mut conn,
        user_id,
        UpdateUserInput {
            full_name: params.full_name,
            role: params.role,
            is_active: params.is_active,
        },
    )?;

    Ok(Json(UserResponse {
        status: SUCCESS,
        message: Some("user updated"),
        user,
    }))
}
