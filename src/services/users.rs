use diesel::{prelude::*, result::DatabaseErrorKind, PgConnection};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::models::{NewUser, User, UserRole};
use crate::repositories::users::{self as user_repo, UserChangeset};

use super::to_iso;

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            is_active: user.is_active,
            created_at: to_iso(user.created_at),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
}

pub fn list_users(conn: &mut PgConnection) -> ServiceResult<Vec<UserSummary>> {
    let users = user_repo::list(conn)?;
    Ok(users.into_iter().map(UserSummary::from).collect())
}

pub fn get_user(conn: &mut PgConnection, user_id: i32) -> ServiceResult<UserSummary> {
    user_repo::find(conn, user_id)?
        .map(UserSummary::from)
        .ok_or(ServiceError::not_found("user", user_id))
}

pub fn update_user(
    conn: &mut PgConnection,
    user_id: i32,
    input: UpdateUserInput,
) -> ServiceResult<UserSummary> {
    let updated = conn.transaction::<User, ServiceError, _>(|conn| {
        user_repo::find(conn, user_id)?.ok_or(ServiceError::not_found("user", user_id))?;

        let role = input.role.as_deref().map(parse_role).transpose()?;
        let changeset = UserChangeset {
            full_name: input.full_name.as_deref(),
            role: role.map(UserRole::as_str),
            is_active: input.is_active,
        };

        user_repo::update(conn, user_id, &changeset)?
            .ok_or(ServiceError::not_found("user", user_id))
    })?;

    info!(user_id, role = %updated.role, is_active = updated.is_active, "updated user");
    Ok(UserSummary::from(updated))
}

pub fn create_user(conn: &mut PgConnection, input: CreateUserInput) -> ServiceResult<UserSummary> {
    let role = parse_role(&input.role)?;

    let created = conn.transaction::<User, ServiceError, _>(|conn| {
        if user_repo::find_by_email(conn, &input.email)?.is_some() {
            return Err(duplicate_email(&input.email));
        }

        let new_user = NewUser {
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            full_name: input.full_name.clone(),
            role: role.as_str().to_string(),
            is_active: input.is_active,
        };

        match user_repo::insert(conn, &new_user) {
            Ok(user) => Ok(user),
            Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(duplicate_email(&input.email))
            }
            Err(err) => Err(ServiceError::from(err)),
        }
    })?;

    info!(user_id = created.id, email = %created.email, role = %created.role, "created user");
    Ok(UserSummary::from(created))
}

fn parse_role(value: &str) -> ServiceResult<UserRole> {
    UserRole::parse(value).ok_or_else(|| {
        warn!(role = value, "rejected unknown user role");
        ServiceError::invalid(format!(
            "invalid role '{value}'; allowed values: {}",
            allowed(UserRole::ALL.iter().map(|role| role.as_str()))
        ))
    })
}

fn duplicate_email(email: &str) -> ServiceError {
    ServiceError::invalid(format!("a user with email '{email}' already exists"))
}

pub(crate) fn allowed<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_is_invalid_argument() {
        let err = parse_role("bogus").unwrap_err();
        match err {
            ServiceError::InvalidArgument(message) => {
                assert!(message.contains("bogus"));
                assert!(message.contains("admin, manager, accountant, employee"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn known_roles_parse() {
        assert_eq!(parse_role("manager").unwrap(), UserRole::Manager);
    }
}
