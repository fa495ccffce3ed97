use chrono::NaiveDateTime;
use diesel::{dsl::count_star, prelude::*, PgConnection};

use crate::models::{Folder, NewFolder};
use crate::schema::folders;

#[derive(AsChangeset)]
#[diesel(table_name = folders)]
pub struct FolderChangeset<'a> {
    pub name: Option<&'a str>,
    pub parent_id: Option<Option<i32>>,
    pub updated_at: NaiveDateTime,
}

pub fn find(conn: &mut PgConnection, folder_id: i32) -> QueryResult<Option<Folder>> {
    folders::table.find(folder_id).first(conn).optional()
}

pub fn list(conn: &mut PgConnection) -> QueryResult<Vec<Folder>> {
    folders::table.order(folders::id.asc()).load(conn)
}

/// Every `(id, parent_id)` pair, enough to walk the hierarchy in memory.
pub fn parent_links(conn: &mut PgConnection) -> QueryResult<Vec<(i32, Option<i32>)>> {
    folders::table
        .select((folders::id, folders::parent_id))
        .load(conn)
}

pub fn insert(conn: &mut PgConnection, new_folder: &NewFolder) -> QueryResult<Folder> {
    diesel::insert_into(folders::table)
        .values(new_folder)
        .get_result(conn)
}

pub fn update(
    conn: &mut PgConnection,
    folder_id: i32,
    changeset: &FolderChangeset<'_>,
) -> QueryResult<Option<Folder>> {
    diesel::update(folders::table.find(folder_id))
        .set(changeset)
        .get_result(conn)
        .optional()
}

pub fn count(conn: &mut PgConnection) -> QueryResult<i64> {
    folders::table.select(count_star()).first(conn)
}
