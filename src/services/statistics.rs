use std::collections::{BTreeMap, HashMap};

use diesel::PgConnection;
use serde::Serialize;

use crate::error::ServiceResult;
use crate::models::{DocumentStatus, UserRole};
use crate::repositories::{
    comments as comment_repo, documents as document_repo, folders as folder_repo,
    permissions as permission_repo, users as user_repo,
};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Statistics {
    pub users: UserStatistics,
    pub folders: i64,
    pub documents: DocumentStatistics,
    pub permissions: i64,
    pub comments: i64,
    pub total_records: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserStatistics {
    pub total: i64,
    /// Only roles that have at least one user.
    pub by_role: BTreeMap<&'static str, i64>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DocumentStatistics {
    pub total: i64,
    /// Every status, zero counts included.
    pub by_status: BTreeMap<&'static str, i64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EntityCounts {
    pub users: i64,
    pub folders: i64,
    pub documents: i64,
    pub permissions: i64,
    pub comments: i64,
}

pub fn get_statistics(conn: &mut PgConnection) -> ServiceResult<Statistics> {
    let counts = EntityCounts {
        users: user_repo::count(conn)?,
        folders: folder_repo::count(conn)?,
        documents: document_repo::count(conn)?,
        permissions: permission_repo::count(conn)?,
        comments: comment_repo::count(conn)?,
    };
    let status_counts: HashMap<String, i64> =
        document_repo::count_by_status(conn)?.into_iter().collect();
    let role_counts: HashMap<String, i64> = user_repo::count_by_role(conn)?.into_iter().collect();

    Ok(assemble(counts, &status_counts, &role_counts))
}

pub(crate) fn assemble(
    counts: EntityCounts,
    status_counts: &HashMap<String, i64>,
    role_counts: &HashMap<String, i64>,
) -> Statistics {
    let by_status = DocumentStatus::ALL
        .iter()
        .map(|status| {
            let count = status_counts.get(status.as_str()).copied().unwrap_or(0);
            (status.as_str(), count)
        })
        .collect();

    let by_role = UserRole::ALL
        .iter()
        .filter_map(|role| {
            let count = role_counts.get(role.as_str()).copied().unwrap_or(0);
            (count > 0).then_some((role.as_str(), count))
        })
        .collect();

    Statistics {
        users: UserStatistics {
            total: counts.users,
            by_role,
        },
        folders: counts.folders,
        documents: DocumentStatistics {
            total: counts.documents,
            by_status,
        },
        permissions: counts.permissions,
        comments: counts.comments,
        total_records: counts.users
            + counts.folders
            + counts.documents
            + counts.permissions
            + counts.comments,
    }
}
