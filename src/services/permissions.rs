use diesel::{prelude::*, PgConnection};
use serde::Serialize;
use tracing::info;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{EntityType, NewPermission, Permission};
use crate::repositories::permissions::{self as permission_repo, PermissionFilter};
use crate::repositories::{documents as document_repo, folders as folder_repo, users as user_repo};

use super::{to_iso, users::allowed};

#[derive(Debug, Clone, Serialize)]
pub struct PermissionView {
    pub id: i32,
    pub user_id: i32,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub entity_type: String,
    pub entity_id: i32,
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_manage_access: bool,
    pub granted_by_id: Option<i32>,
    pub granted_by_name: Option<String>,
    pub granted_at: String,
}

/// Capability flags of a grant. Anything not set stays false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub view: bool,
    pub edit: bool,
    pub delete: bool,
    pub manage_access: bool,
}

#[derive(Debug, Clone)]
pub struct GrantPermissionInput {
    pub user_id: i32,
    pub entity_type: String,
    pub entity_id: i32,
    pub capabilities: Capabilities,
    pub granted_by: Option<i32>,
}

/// Stored grants matching every supplied filter. Overlapping grants for
/// the same user and entity are all returned as stored.
pub fn list_permissions(
    conn: &mut PgConnection,
    filter: &PermissionFilter,
) -> ServiceResult<Vec<PermissionView>> {
    let permissions = permission_repo::list(conn, filter)?;

    permissions
        .into_iter()
        .map(|permission| resolve_view(conn, permission))
        .collect()
}

/// Stores a grant after checking that the subject, the grantor and the
/// target row all exist. Existing grants are never merged or replaced.
pub fn grant_permission(
    conn: &mut PgConnection,
    input: GrantPermissionInput,
) -> ServiceResult<PermissionView> {
    let entity_type = EntityType::parse(&input.entity_type).ok_or_else(|| {
        ServiceError::invalid(format!(
            "invalid entity_type '{}'; allowed values: {}",
            input.entity_type,
            allowed(EntityType::ALL.iter().map(|kind| kind.as_str()))
        ))
    })?;

    let permission = conn.transaction::<Permission, ServiceError, _>(|conn| {
        user_repo::find(conn, input.user_id)?
            .ok_or(ServiceError::not_found("user", input.user_id))?;
        if let Some(grantor_id) = input.granted_by {
            user_repo::find(conn, grantor_id)?.ok_or(ServiceError::not_found("user", grantor_id))?;
        }
        ensure_entity_exists(conn, entity_type, input.entity_id)?;

        let new_permission = NewPermission {
            user_id: input.user_id,
            entity_type: entity_type.as_str().to_string(),
            entity_id: input.entity_id,
            can_view: input.capabilities.view,
            can_edit: input.capabilities.edit,
            can_delete: input.capabilities.delete,
            can_manage_access: input.capabilities.manage_access,
            granted_by: input.granted_by,
        };
        Ok(permission_repo::insert(conn, &new_permission)?)
    })?;

    info!(
        permission_id = permission.id,
        user_id = permission.user_id,
        entity_type = %permission.entity_type,
        entity_id = permission.entity_id,
        "granted permission"
    );

    resolve_view(conn, permission)
}

fn ensure_entity_exists(
    conn: &mut PgConnection,
    entity_type: EntityType,
    entity_id: i32,
) -> ServiceResult<()> {
    let exists = match entity_type {
        EntityType::Folder => folder_repo::find(conn, entity_id)?.is_some(),
        EntityType::Document => document_repo::find(conn, entity_id)?.is_some(),
    };

    if exists {
        Ok(())
    } else {
        Err(ServiceError::not_found(entity_type.as_str(), entity_id))
    }
}

fn resolve_view(conn: &mut PgConnection, permission: Permission) -> ServiceResult<PermissionView> {
    let subject = user_repo::find(conn, permission.user_id)?;
    let grantor = match permission.granted_by {
        Some(grantor_id) => user_repo::find(conn, grantor_id)?,
        None => None,
    };
    let (user_email, user_name) = match subject {
        Some(user) => (Some(user.email), Some(user.full_name)),
        None => (None, None),
    };

    Ok(PermissionView {
        id: permission.id,
        user_id: permission.user_id,
        user_email,
        user_name,
        entity_type: permission.entity_type,
        entity_id: permission.entity_id,
        can_view: permission.can_view,
        can_edit: permission.can_edit,
        can_delete: permission.can_delete,
        can_manage_access: permission.can_manage_access,
        granted_by_id: permission.granted_by,
        granted_by_name: grantor.map(|user| user.full_name),
        granted_at: to_iso(permission.granted_at),
    })
}
