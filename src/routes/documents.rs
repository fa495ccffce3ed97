use axum::extract::{Json, State};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extractors::{ApiPath, ApiQuery, OptionalJson};
use crate::services::documents::{
    self, DocumentDetail, DocumentListItem, UpdateDocumentInput, UpdatedDocument,
    DEFAULT_PAGE_LIMIT,
};
use crate::state::AppState;

use super::SUCCESS;

#[derive(Deserialize)]
pub struct DocumentListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

#[derive(Deserialize, Default, Debug)]
pub struct UpdateDocumentParams {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
}

impl UpdateDocumentParams {
    /// Body fields win over query-string fields.
    fn overlay(self, body: Option<Self>) -> Self {
        let body = body.unwrap_or_default();
        Self {
            title: body.title.or(self.title),
            content: body.content.or(self.content),
            status: body.status.or(self.status),
        }
    }
}

#[derive(Serialize)]
pub struct DocumentListResponse {
    pub status: &'static str,
    pub count: usize,
    pub skip: i64,
    pub limit: i64,
    pub documents: Vec<DocumentListItem>,
}

#[derive(Serialize)]
pub struct DocumentResponse {
    pub status: &'static str,
    pub document: DocumentDetail,
}

#[derive(Serialize)]
pub struct DocumentUpdatedResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub document: UpdatedDocument,
}

pub async fn list_documents(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DocumentListQuery>,
) -> AppResult<Json<DocumentListResponse>> {
    let skip = query.skip.unwrap_or(0);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    if skip < 0 || limit < 0 {
        return Err(AppError::bad_request("skip and limit must not be negative"));
    }
    let status = query.status.filter(|status| !status.is_empty());

    let mut conn = state.db()?;
    let page = documents::list_documents(&mut conn, skip, limit, status)?;

    Ok(Json(DocumentListResponse {
        status: SUCCESS,
        count: page.documents.len(),
        skip: page.skip,
        limit: page.limit,
        documents: page.documents,
    }))
}

pub async fn get_document(
    State(state): State<AppState>,
    ApiPath(document_id): ApiPath<i32>,
) -> AppResult<Json<DocumentResponse>> {
    let mut conn = state.db()?;
    let document = documents::get_document(&mut conn, document_id)?;

    Ok(Json(DocumentResponse {
        status: SUCCESS,
        document,
    }))
}

pub async fn update_document(
    State(state): State<AppState>,
    ApiPath(document_id): ApiPath<i32>,
    ApiQuery(query): ApiQuery<UpdateDocumentParams>,
    OptionalJson(body): OptionalJson<UpdateDocumentParams>,
) -> AppResult<Json<DocumentUpdatedResponse>> {
    let params = query.overlay(body);
    let mut conn = state.db()?;
    let document = documents::update_document(
        &mut conn,
        document_id,
        UpdateDocumentInput {
            title: params.title,
            content: params.content,
            status: params.status,
        },
    )?;

    Ok(Json(DocumentUpdatedResponse {
        status: SUCCESS,
        message: "document updated",
        document,
    }))
}
