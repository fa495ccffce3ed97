use axum::extract::{Json, State};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extractors::{ApiPath, ApiQuery, OptionalJson};
use crate::services::comments::{self, CommentView};
use crate::state::AppState;

use super::SUCCESS;

#[derive(Deserialize, Default, Debug)]
pub struct AddCommentParams {
    pub comment: Option<String>,
    pub user_id: Option<i32>,
}

impl AddCommentParams {
    fn overlay(self, body: Option<Self>) -> Self {
        let body = body.unwrap_or_default();
        Self {
            comment: body.comment.or(self.comment),
            user_id: body.user_id.or(self.user_id),
        }
    }
}

#[derive(Serialize)]
pub struct CommentListResponse {
    pub status: &'static str,
    pub document_id: i32,
    pub count: usize,
    pub comments: Vec<CommentView>,
}

#[derive(Serialize)]
pub struct CommentResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub comment: CommentView,
}

pub async fn list_comments(
    State(state): State<AppState>,
    ApiPath(document_id): ApiPath<i32>,
) -> AppResult<Json<CommentListResponse>> {
    let mut conn = state.db()?;
    let comments = comments::list_comments(&mut conn, document_id)?;

    Ok(Json(CommentListResponse {
        status: SUCCESS,
        document_id,
        count: comments.len(),
        comments,
    }))
}

/// There is no session layer, so the author comes from `user_id` and falls
/// back to the configured default acting user.
pub async fn add_comment(
    State(state): State<AppState>,
    ApiPath(document_id): ApiPath<i32>,
    ApiQuery(query): ApiQuery<AddCommentParams>,
    OptionalJson(body): OptionalJson<AddCommentParams>,
) -> AppResult<Json<CommentResponse>> {
    let params = query.overlay(body);
    let text = params
        .comment
        .ok_or_else(|| AppError::bad_request("comment is required"))?;
    let actor_id = params
        .user_id
        .unwrap_or(state.config.default_acting_user_id);

    let mut conn = state.db()?;
    let comment = comments::add_comment(&mut conn, document_id, actor_id, &text)?;

    Ok(Json(CommentResponse {
        status: SUCCESS,
        message: "comment added",
        comment,
    }))
}
