use chrono::NaiveDateTime;
use diesel::{dsl::count_star, prelude::*, PgConnection};

use crate::models::{Document, NewDocument};
use crate::schema::documents;

#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub status: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

/// `updated_at` is not optional: every write through this changeset
/// refreshes it.
#[derive(AsChangeset)]
#[diesel(table_name = documents)]
pub struct DocumentChangeset<'a> {
    pub title: Option<&'a str>,
    pub content: Option<&'a str>,
    pub status: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

pub fn find(conn: &mut PgConnection, document_id: i32) -> QueryResult<Option<Document>> {
    documents::table.find(document_id).first(conn).optional()
}

pub fn list(conn: &mut PgConnection, filter: &DocumentFilter) -> QueryResult<Vec<Document>> {
    let mut query = documents::table.order(documents::id.asc()).into_boxed();

    if let Some(status) = filter.status.as_deref() {
        query = query.filter(documents::status.eq(status));
    }

    query.offset(filter.offset).limit(filter.limit).load(conn)
}

pub fn insert(conn: &mut PgConnection, new_document: &NewDocument) -> QueryResult<Document> {
    diesel::insert_into(documents::table)
        .values(new_document)
        .get_result(conn)
}

pub fn update(
    conn: &mut PgConnection,
    document_id: i32,
    changeset: &DocumentChangeset<'_>,
) -> QueryResult<Option<Document>> {
    diesel::update(documents::table.find(document_id))
        .set(changeset)
        .get_result(conn)
        .optional()
}

pub fn count(conn: &mut PgConnection) -> QueryResult<i64> {
    documents::table.select(count_star()).first(conn)
}

pub fn count_by_status(conn: &mut PgConnection) -> QueryResult<Vec<(String, i64)>> {
    documents::table
        .group_by(documents::status)
        .select((documents::status, count_star()))
        .load(conn)
}
