use diesel::{dsl::count_star, prelude::*, PgConnection};

use crate::models::{NewPermission, Permission};
use crate::schema::permissions;

/// Conjunction of optional equality predicates.
#[derive(Debug, Clone, Default)]
pub struct PermissionFilter {
    pub user_id: Option<i32>,
    pub entity_type: Option<String>,
    pub entity_id: Option<i32>,
}

pub fn list(conn: &mut PgConnection, filter: &PermissionFilter) -> QueryResult<Vec<Permission>> {
    let mut query = permissions::table
        .order(permissions::id.asc())
        .into_boxed();

    if let Some(user_id) = filter.user_id {
        query = query.filter(permissions::user_id.eq(user_id));
    }
    if let Some(entity_type) = filter.entity_type.as_deref() {
        query = query.filter(permissions::entity_type.eq(entity_type));
    }
    if let Some(entity_id) = filter.entity_id {
        query = query.filter(permissions::entity_id.eq(entity_id));
    }

    query.load(conn)
}

pub fn insert(conn: &mut PgConnection, new_permission: &NewPermission) -> QueryResult<Permission> {
    diesel::insert_into(permissions::table)
        .values(new_permission)
        .get_result(conn)
}

pub fn count(conn: &mut PgConnection) -> QueryResult<i64> {
    permissions::table.select(count_star()).first(conn)
}
