use diesel::{dsl::count_star, prelude::*, PgConnection};

use crate::models::{NewUser, User};
use crate::schema::users;

/// Fields of a user that may be changed after creation. `None` leaves the
/// column untouched.
#[derive(AsChangeset, Default)]
#[diesel(table_name = users)]
pub struct UserChangeset<'a> {
    pub full_name: Option<&'a str>,
    pub role: Option<&'a str>,
    pub is_active: Option<bool>,
}

impl UserChangeset<'_> {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.role.is_none() && self.is_active.is_none()
    }
}

pub fn find(conn: &mut PgConnection, user_id: i32) -> QueryResult<Option<User>> {
    users::table.find(user_id).first(conn).optional()
}

pub fn find_by_email(conn: &mut PgConnection, email: &str) -> QueryResult<Option<User>> {
    users::table
        .filter(users::email.eq(email))
        .first(conn)
        .optional()
}

pub fn list(conn: &mut PgConnection) -> QueryResult<Vec<User>> {
    users::table.order(users::id.asc()).load(conn)
}

pub fn insert(conn: &mut PgConnection, new_user: &NewUser) -> QueryResult<User> {
    diesel::insert_into(users::table)
        .values(new_user)
        .get_result(conn)
}

pub fn update(
    conn: &mut PgConnection,
    user_id: i32,
    changeset: &UserChangeset<'_>,
) -> QueryResult<Option<User>> {
    if changeset.is_empty() {
        return find(conn, user_id);
    }

    diesel::update(users::table.find(user_id))
        .set(changeset)
        .get_result(conn)
        .optional()
}

pub fn count(conn: &mut PgConnection) -> QueryResult<i64> {
    users::table.select(count_star()).first(conn)
}

pub fn count_by_role(conn: &mut PgConnection) -> QueryResult<Vec<(String, i64)>> {
    users::table
        .group_by(users::role)
        .select((users::role, count_star()))
        .load(conn)
}
