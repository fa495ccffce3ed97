use chrono::Utc;
use diesel::{prelude::*, PgConnection};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::models::{Document, DocumentStatus, NewDocument};
use crate::repositories::documents::{self as document_repo, DocumentChangeset, DocumentFilter};
use crate::repositories::{folders as folder_repo, users as user_repo};

use super::{to_iso, users::allowed};

pub const PREVIEW_CHARS: usize = 100;
const PREVIEW_ELLIPSIS: &str = "...";

pub const DEFAULT_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Clone, Serialize)]
pub struct DocumentListItem {
    pub id: i32,
    pub title: String,
    pub content_preview: String,
    pub folder_id: Option<i32>,
    pub folder_name: Option<String>,
    pub owner_id: i32,
    pub owner_name: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentDetail {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub folder_id: Option<i32>,
    pub folder_name: Option<String>,
    pub owner_id: i32,
    pub owner_name: Option<String>,
    pub owner_role: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatedDocument {
    pub id: i32,
    pub title: String,
    pub status: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct DocumentPage {
    pub skip: i64,
    pub limit: i64,
    pub documents: Vec<DocumentListItem>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateDocumentInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateDocumentInput {
    pub title: String,
    pub content: String,
    pub folder_id: Option<i32>,
    pub owner_id: i32,
    pub status: Option<String>,
}

pub fn list_documents(
    conn: &mut PgConnection,
    skip: i64,
    limit: i64,
    status: Option<String>,
) -> ServiceResult<DocumentPage> {
    let filter = DocumentFilter {
        status,
        offset: skip,
        limit,
    };
    let documents = document_repo::list(conn, &filter)?;

    let mut items = Vec::with_capacity(documents.len());
    for document in documents {
        let owner_name = user_repo::find(conn, document.owner_id)?.map(|owner| owner.full_name);
        let folder_name = folder_name(conn, document.folder_id)?;
        items.push(DocumentListItem {
            id: document.id,
            title: document.title,
            content_preview: content_preview(&document.content),
            folder_id: document.folder_id,
            folder_name,
            owner_id: document.owner_id,
            owner_name,
            status: document.status,
            created_at: to_iso(document.created_at),
            updated_at: to_iso(document.updated_at),
        });
    }

    Ok(DocumentPage {
        skip,
        limit,
        documents: items,
    })
}

pub fn get_document(conn: &mut PgConnection, document_id: i32) -> ServiceResult<DocumentDetail> {
    let document = document_repo::find(conn, document_id)?
        .ok_or(ServiceError::not_found("document", document_id))?;
    to_detail(conn, document)
}

/// Applies whichever of title, content and status were supplied. The
/// updated timestamp is refreshed on every successful call, including one
/// that supplies nothing.
pub fn update_document(
    conn: &mut PgConnection,
    document_id: i32,
    input: UpdateDocumentInput,
) -> ServiceResult<UpdatedDocument> {
    let document = conn.transaction::<Document, ServiceError, _>(|conn| {
        document_repo::find(conn, document_id)?
            .ok_or(ServiceError::not_found("document", document_id))?;

        let status = input.status.as_deref().map(parse_status).transpose()?;
        let changeset = DocumentChangeset {
            title: input.title.as_deref(),
            content: input.content.as_deref(),
            status: status.map(DocumentStatus::as_str),
            updated_at: Utc::now().naive_utc(),
        };

        document_repo::update(conn, document_id, &changeset)?
            .ok_or(ServiceError::not_found("document", document_id))
    })?;

    info!(document_id, status = %document.status, "updated document");
    Ok(UpdatedDocument {
        id: document.id,
        title: document.title,
        status: document.status,
        updated_at: to_iso(document.updated_at),
    })
}

pub fn create_document(
    conn: &mut PgConnection,
    input: CreateDocumentInput,
) -> ServiceResult<DocumentDetail> {
    let status = match input.status.as_deref() {
        Some(value) => parse_status(value)?,
        None => DocumentStatus::Draft,
    };

    let document = conn.transaction::<Document, ServiceError, _>(|conn| {
        user_repo::find(conn, input.owner_id)?
            .ok_or(ServiceError::not_found("user", input.owner_id))?;
        if let Some(folder_id) = input.folder_id {
            folder_repo::find(conn, folder_id)?.ok_or(ServiceError::not_found("folder", folder_id))?;
        }

        let new_document = NewDocument {
            title: input.title.clone(),
            content: input.content.clone(),
            folder_id: input.folder_id,
            owner_id: input.owner_id,
            status: status.as_str().to_string(),
        };
        Ok(document_repo::insert(conn, &new_document)?)
    })?;

    info!(document_id = document.id, status = %document.status, "created document");
    to_detail(conn, document)
}

/// First [`PREVIEW_CHARS`] characters of `content`, with an ellipsis
/// appended only when something was cut off.
pub fn content_preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{PREVIEW_ELLIPSIS}", &content[..cut]),
        None => content.to_string(),
    }
}

fn parse_status(value: &str) -> ServiceResult<DocumentStatus> {
    DocumentStatus::parse(value).ok_or_else(|| {
        warn!(status = value, "rejected unknown document status");
        ServiceError::invalid(format!(
            "invalid status '{value}'; allowed values: {}",
            allowed(DocumentStatus::ALL.iter().map(|status| status.as_str()))
        ))
    })
}

fn folder_name(conn: &mut PgConnection, folder_id: Option<i32>) -> ServiceResult<Option<String>> {
    match folder_id {
        Some(id) => Ok(folder_repo::find(conn, id)?.map(|folder| folder.name)),
        None => Ok(None),
    }
}

fn to_detail(conn: &mut PgConnection, document: Document) -> ServiceResult<DocumentDetail> {
    let owner = user_repo::find(conn, document.owner_id)?;
    let folder_name = folder_name(conn, document.folder_id)?;
    let (owner_name, owner_role) = match owner {
        Some(owner) => (Some(owner.full_name), Some(owner.role)),
        None => (None, None),
    };

    Ok(DocumentDetail {
        id: document.id,
        title: document.title,
        content: document.content,
        folder_id: document.folder_id,
        folder_name,
        owner_id: document.owner_id,
        owner_name,
        owner_role,
        status: document.status,
        created_at: to_iso(document.created_at),
        updated_at: to_iso(document.updated_at),
    })
}
