use diesel::{prelude::*, PgConnection};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::models::{Comment, NewComment, User};
use crate::repositories::{
    comments as comment_repo, documents as document_repo, users as user_repo,
};

use super::{to_iso, UNKNOWN_NAME};

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: i32,
    pub document_id: i32,
    pub comment: String,
    pub user_id: i32,
    pub author_name: String,
    pub author_role: Option<String>,
    pub created_at: String,
}

/// Comments on a document, newest first. An unknown document simply has
/// no comments.
pub fn list_comments(conn: &mut PgConnection, document_id: i32) -> ServiceResult<Vec<CommentView>> {
    let comments = comment_repo::list_for_document(conn, document_id)?;

    let mut views = Vec::with_capacity(comments.len());
    for comment in comments {
        let author = user_repo::find(conn, comment.user_id)?;
        views.push(to_view(comment, author));
    }
    Ok(views)
}

/// Records a comment authored by `actor_id`. The acting identity is taken
/// as given; only its existence is checked.
pub fn add_comment(
    conn: &mut PgConnection,
    document_id: i32,
    actor_id: i32,
    text: &str,
) -> ServiceResult<CommentView> {
    let (comment, author) = conn.transaction::<(Comment, User), ServiceError, _>(|conn| {
        document_repo::find(conn, document_id)?
            .ok_or(ServiceError::not_found("document", document_id))?;
        let author =
            user_repo::find(conn, actor_id)?.ok_or(ServiceError::not_found("user", actor_id))?;

        if text.trim().is_empty() {
            warn!(document_id, actor_id, "rejected empty comment");
            return Err(ServiceError::invalid("comment must not be empty"));
        }

        let new_comment = NewComment {
            document_id,
            user_id: actor_id,
            comment: text.to_string(),
        };
        let comment = comment_repo::insert(conn, &new_comment)?;
        Ok((comment, author))
    })?;

    info!(comment_id = comment.id, document_id, actor_id, "added comment");
    Ok(to_view(comment, Some(author)))
}

fn to_view(comment: Comment, author: Option<User>) -> CommentView {
    let (author_name, author_role) = match author {
        Some(author) => (author.full_name, Some(author.role)),
        None => (UNKNOWN_NAME.to_string(), None),
    };

    CommentView {
        id: comment.id,
        document_id: comment.document_id,
        comment: comment.comment,
        user_id: comment.user_id,
        author_name,
        author_role,
        created_at: to_iso(comment.created_at),
    }
}
