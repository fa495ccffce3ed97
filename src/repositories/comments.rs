use diesel::{dsl::count_star, prelude::*, PgConnection};

use crate::models::{Comment, NewComment};
use crate::schema::document_comments;

/// Newest first; ties on `created_at` fall back to the id.
pub fn list_for_document(conn: &mut PgConnection, document_id: i32) -> QueryResult<Vec<Comment>> {
    document_comments::table
        .filter(document_comments::document_id.eq(document_id))
        .order((
            document_comments::created_at.desc(),
            document_comments::id.desc(),
        ))
        .load(conn)
}

pub fn insert(conn: &mut PgConnection, new_comment: &NewComment) -> QueryResult<Comment> {
    diesel::insert_into(document_comments::table)
        .values(new_comment)
        .get_result(conn)
}

pub fn count(conn: &mut PgConnection) -> QueryResult<i64> {
    document_comments::table.select(count_star()).first(conn)
}
