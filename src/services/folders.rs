use std::collections::{HashMap, HashSet};

use chrono::Utc;
use diesel::{prelude::*, PgConnection};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::models::{Folder, NewFolder};
use crate::repositories::folders::{self as folder_repo, FolderChangeset};
use crate::repositories::users as user_repo;

use super::{to_iso, UNKNOWN_NAME};

#[derive(Debug, Clone, Serialize)]
pub struct FolderSummary {
    pub id: i32,
    pub name: String,
    pub owner_id: i32,
    pub owner_name: String,
    pub parent_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateFolderInput {
    pub name: String,
    pub owner_id: i32,
    pub parent_id: Option<i32>,
}

/// `parent_id: Some(None)` moves the folder to the root.
#[derive(Debug, Clone, Default)]
pub struct UpdateFolderInput {
    pub name: Option<String>,
    pub parent_id: Option<Option<i32>>,
}

/// Lists every folder with its owner's name. Owners are resolved one
/// lookup per folder.
pub fn list_folders(conn: &mut PgConnection) -> ServiceResult<Vec<FolderSummary>> {
    let folders = folder_repo::list(conn)?;

    let mut summaries = Vec::with_capacity(folders.len());
    for folder in folders {
        let owner_name = owner_name(conn, folder.owner_id)?;
        summaries.push(to_summary(folder, owner_name));
    }
    Ok(summaries)
}

pub fn create_folder(
    conn: &mut PgConnection,
    input: CreateFolderInput,
) -> ServiceResult<FolderSummary> {
    let folder = conn.transaction::<Folder, ServiceError, _>(|conn| {
        user_repo::find(conn, input.owner_id)?
            .ok_or(ServiceError::not_found("user", input.owner_id))?;
        if let Some(parent_id) = input.parent_id {
            folder_repo::find(conn, parent_id)?.ok_or(ServiceError::not_found("folder", parent_id))?;
        }

        let new_folder = NewFolder {
            name: input.name.clone(),
            owner_id: input.owner_id,
            parent_id: input.parent_id,
        };
        Ok(folder_repo::insert(conn, &new_folder)?)
    })?;

    info!(folder_id = folder.id, parent_id = ?folder.parent_id, "created folder");
    let owner_name = owner_name(conn, folder.owner_id)?;
    Ok(to_summary(folder, owner_name))
}

pub fn update_folder(
    conn: &mut PgConnection,
    folder_id: i32,
    input: UpdateFolderInput,
) -> ServiceResult<FolderSummary> {
    let folder = conn.transaction::<Folder, ServiceError, _>(|conn| {
        folder_repo::find(conn, folder_id)?.ok_or(ServiceError::not_found("folder", folder_id))?;

        if let Some(Some(parent_id)) = input.parent_id {
            folder_repo::find(conn, parent_id)?
                .ok_or(ServiceError::not_found("folder", parent_id))?;

            let links: HashMap<i32, Option<i32>> =
                folder_repo::parent_links(conn)?.into_iter().collect();
            if would_create_cycle(&links, folder_id, parent_id) {
                warn!(folder_id, parent_id, "rejected folder move that would create a cycle");
                return Err(ServiceError::invalid(
                    "cannot move folder into itself or a descendant",
                ));
            }
        }

        let changeset = FolderChangeset {
            name: input.name.as_deref(),
            parent_id: input.parent_id,
            updated_at: Utc::now().naive_utc(),
        };
        folder_repo::update(conn, folder_id, &changeset)?
            .ok_or(ServiceError::not_found("folder", folder_id))
    })?;

    info!(folder_id, parent_id = ?folder.parent_id, "updated folder");
    let owner_name = owner_name(conn, folder.owner_id)?;
    Ok(to_summary(folder, owner_name))
}

/// True when `new_parent` is `folder_id` itself or sits somewhere below it.
/// Walks up from `new_parent`; a loop already present in `links` ends the
/// walk instead of spinning.
pub(crate) fn would_create_cycle(
    links: &HashMap<i32, Option<i32>>,
    folder_id: i32,
    new_parent: i32,
) -> bool {
    let mut seen = HashSet::new();
    let mut current = Some(new_parent);

    while let Some(id) = current {
        if id == folder_id {
            return true;
        }
        if !seen.insert(id) {
            return false;
        }
        current = links.get(&id).copied().flatten();
    }

    false
}

fn owner_name(conn: &mut PgConnection, owner_id: i32) -> ServiceResult<String> {
    Ok(user_repo::find(conn, owner_id)?
        .map(|owner| owner.full_name)
        .unwrap_or_else(|| UNKNOWN_NAME.to_string()))
}

fn to_summary(folder: Folder, owner_name: String) -> FolderSummary {
    FolderSummary {
        id: folder.id,
        name: folder.name,
        owner_id: folder.owner_id,
        owner_name,
        parent_id: folder.parent_id,
        created_at: to_iso(folder.created_at),
        updated_at: to_iso(folder.updated_at),
    }
}

#[cfg(test)]
mod tests {
    use super::would_create_cycle;
    use std::collections::HashMap;

    fn tree() -> HashMap<i32, Option<i32>> {
        // 1 ─┬─ 2 ── 4
        //    └─ 3
        // 5
        HashMap::from([
            (1, None),
            (2, Some(1)),
            (3, Some(1)),
            (4, Some(2)),
            (5, None),
        ])
    }

    #[test]
    fn folder_cannot_become_its_own_parent() {
        assert!(would_create_cycle(&tree(), 2, 2));
    }

    #[test]
    fn folder_cannot_move_below_a_descendant() {
        assert!(would_create_cycle(&tree(), 1, 4));
        assert!(would_create_cycle(&tree(), 2, 4));
    }

    #[test]
    fn moves_to_siblings_and_other_roots_are_fine() {
        assert!(!would_create_cycle(&tree(), 4, 3));
        assert!(!would_create_cycle(&tree(), 2, 5));
        assert!(!would_create_cycle(&tree(), 5, 4));
    }

    #[test]
    fn existing_loops_do_not_hang_the_walk() {
        let mut links = tree();
        links.insert(6, Some(7));
        links.insert(7, Some(6));
        assert!(!would_create_cycle(&links, 1, 6));
    }
}
