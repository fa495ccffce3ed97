use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::schema::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRole {
    Admin,
    Manager,
    Accountant,
    Employee,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Admin,
        UserRole::Manager,
        UserRole::Accountant,
        UserRole::Employee,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::Accountant => "accountant",
            UserRole::Employee => "employee",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentStatus {
    Draft,
    UnderReview,
    Approved,
    Rejected,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 4] = [
        DocumentStatus::Draft,
        DocumentStatus::UnderReview,
        DocumentStatus::Approved,
        DocumentStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::UnderReview => "under_review",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

/// Kind of row a permission's `entity_id` points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Folder,
    Document,
}

impl EntityType {
    pub const ALL: [EntityType; 2] = [EntityType::Folder, EntityType::Document];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Folder => "folder",
            EntityType::Document => "document",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = folders)]
#[diesel(belongs_to(User, foreign_key = owner_id))]
pub struct Folder {
    pub id: i32,
    pub name: String,
    pub owner_id: i32,
    pub parent_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = folders)]
pub struct NewFolder {
    pub name: String,
    pub owner_id: i32,
    pub parent_id: Option<i32>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = documents)]
#[diesel(belongs_to(Folder, foreign_key = folder_id))]
pub struct Document {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub folder_id: Option<i32>,
    pub owner_id: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = documents)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
    pub folder_id: Option<i32>,
    pub owner_id: i32,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = permissions)]
#[diesel(belongs_to(User))]
pub struct Permission {
    pub id: i32,
    pub user_id: i32,
    pub entity_type: String,
    pub entity_id: i32,
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_manage_access: bool,
    pub granted_by: Option<i32>,
    pub granted_at: NaiveDateTime,
}

#[derive(Debug, Default, Insertable)]
#[diesel(table_name = permissions)]
pub struct NewPermission {
    pub user_id: i32,
    pub entity_type: String,
    pub entity_id: i32,
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_manage_access: bool,
    pub granted_by: Option<i32>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = document_comments)]
#[diesel(belongs_to(Document))]
pub struct Comment {
    pub id: i32,
    pub document_id: i32,
    pub user_id: i32,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = document_comments)]
pub struct NewComment {
    pub document_id: i32,
    pub user_id: i32,
    pub comment: String,
}
