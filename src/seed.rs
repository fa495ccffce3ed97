//! Demo data for a fresh database, written all-or-nothing.

use anyhow::{anyhow, Context, Result};
use diesel::{Connection, PgConnection};

use crate::passwords::hash_password;
use crate::repositories::users as user_repo;
use crate::services::{
    comments::add_comment,
    documents::{create_document, CreateDocumentInput},
    folders::{create_folder, CreateFolderInput},
    permissions::{grant_permission, Capabilities, GrantPermissionInput},
    users::{create_user, CreateUserInput},
};

pub struct SeedUser {
    pub email: &'static str,
    pub password: &'static str,
    pub full_name: &'static str,
    pub role: &'static str,
}

/// `owner` indexes `DemoData::users`, `parent` indexes earlier folders.
pub struct SeedFolder {
    pub name: &'static str,
    pub owner: usize,
    pub parent: Option<usize>,
}

pub struct SeedDocument {
    pub title: &'static str,
    pub content: &'static str,
    pub folder: Option<usize>,
    pub owner: usize,
    pub status: &'static str,
}

#[derive(Clone, Copy)]
pub enum SeedTarget {
    Folder(usize),
    Document(usize),
}

pub struct SeedGrant {
    pub user: usize,
    pub target: SeedTarget,
    pub capabilities: Capabilities,
}

pub struct SeedComment {
    pub document: usize,
    pub author: usize,
    pub text: &'static str,
}

/// Rows to insert. Grants are recorded as given by the first user.
pub struct DemoData {
    pub users: Vec<SeedUser>,
    pub folders: Vec<SeedFolder>,
    pub documents: Vec<SeedDocument>,
    pub grants: Vec<SeedGrant>,
    pub comments: Vec<SeedComment>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub folders: usize,
    pub documents: usize,
    pub permissions: usize,
    pub comments: usize,
}

impl DemoData {
    pub fn standard() -> Self {
        let read_write = Capabilities {
            view: true,
            edit: true,
            ..Default::default()
        };
        let read_only = Capabilities {
            view: true,
            ..Default::default()
        };

        Self {
            users: vec![
                SeedUser {
                    email: "admin@vaultdoc.local",
                    password: "admin123",
                    full_name: "System Administrator",
                    role: "admin",
                },
                SeedUser {
                    email: "manager@vaultdoc.local",
                    password: "manager123",
                    full_name: "Peter Petrov",
                    role: "manager",
                },
                SeedUser {
                    email: "accountant@vaultdoc.local",
                    password: "accountant123",
                    full_name: "Irina Volkova",
                    role: "accountant",
                },
                SeedUser {
                    email: "employee@vaultdoc.local",
                    password: "employee123",
                    full_name: "Anna Sidorova",
                    role: "employee",
                },
            ],
            folders: vec![
                SeedFolder { name: "Shared documents", owner: 0, parent: None },
                SeedFolder { name: "Reports", owner: 0, parent: None },
                SeedFolder { name: "Projects", owner: 1, parent: None },
                SeedFolder { name: "2024", owner: 0, parent: Some(1) },
            ],
            documents: vec![
                SeedDocument {
                    title: "Welcome to VaultDoc",
                    content: "This is the company document system. Create, edit and discuss documents together.",
                    folder: Some(0),
                    owner: 0,
                    status: "approved",
                },
                SeedDocument {
                    title: "Working with documents",
                    content: "1. Important documents must be approved by a manager.\n2. Do not remove documents without agreement.\n3. Use comments to discuss changes.",
                    folder: Some(0),
                    owner: 0,
                    status: "approved",
                },
                SeedDocument {
                    title: "January 2024 report",
                    content: "All January goals were met. Revenue reached 1.2 million.",
                    folder: Some(3),
                    owner: 2,
                    status: "under_review",
                },
                SeedDocument {
                    title: "February plan",
                    content: "Main goals for February:\n1. Launch the new project\n2. Replace hardware\n3. Staff training",
                    folder: Some(2),
                    owner: 3,
                    status: "draft",
                },
                SeedDocument {
                    title: "My notes",
                    content: "Prepare the presentation. Client call at 15:00. Send the report to accounting.",
                    folder: None,
                    owner: 3,
                    status: "draft",
                },
            ],
            grants: vec![
                SeedGrant { user: 1, target: SeedTarget::Folder(2), capabilities: read_write },
                SeedGrant { user: 3, target: SeedTarget::Folder(0), capabilities: read_only },
                SeedGrant { user: 1, target: SeedTarget::Document(3), capabilities: read_write },
                SeedGrant {
                    user: 2,
                    target: SeedTarget::Document(2),
                    capabilities: Capabilities {
                        delete: true,
                        ..read_write
                    },
                },
            ],
            comments: vec![
                SeedComment {
                    document: 2,
                    author: 1,
                    text: "Please add a breakdown by department.",
                },
                SeedComment {
                    document: 2,
                    author: 2,
                    text: "Breakdown added in the appendix.",
                },
                SeedComment {
                    document: 3,
                    author: 0,
                    text: "Hardware replacement needs a budget estimate.",
                },
            ],
        }
    }
}

/// Inserts `data` when the users table is empty. Returns `None` when the
/// database already has users. A failure rolls back every row of the run.
pub fn seed_demo_data(conn: &mut PgConnection, data: &DemoData) -> Result<Option<SeedSummary>> {
    let existing = user_repo::count(conn).context("failed to count users")?;
    if existing > 0 {
        tracing::info!(existing, "database already has users; skipping seed");
        return Ok(None);
    }

    let summary = conn.transaction::<_, anyhow::Error, _>(|conn| insert_all(conn, data))?;
    tracing::info!(?summary, "seeded demo data");
    Ok(Some(summary))
}

fn insert_all(conn: &mut PgConnection, data: &DemoData) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    let mut user_ids = Vec::with_capacity(data.users.len());
    for user in &data.users {
        let created = create_user(
            conn,
            CreateUserInput {
                email: user.email.to_string(),
                password_hash: hash_password(user.password)?,
                full_name: user.full_name.to_string(),
                role: user.role.to_string(),
                is_active: true,
            },
        )?;
        user_ids.push(created.id);
        summary.users += 1;
    }

    let mut folder_ids = Vec::with_capacity(data.folders.len());
    for folder in &data.folders {
        let parent_id = folder
            .parent
            .map(|index| lookup(&folder_ids, index, "folder"))
            .transpose()?;
        let created = create_folder(
            conn,
            CreateFolderInput {
                name: folder.name.to_string(),
                owner_id: lookup(&user_ids, folder.owner, "user")?,
                parent_id,
            },
        )?;
        folder_ids.push(created.id);
        summary.folders += 1;
    }

    let mut document_ids = Vec::with_capacity(data.documents.len());
    for document in &data.documents {
        let folder_id = document
            .folder
            .map(|index| lookup(&folder_ids, index, "folder"))
            .transpose()?;
        let created = create_document(
            conn,
            CreateDocumentInput {
                title: document.title.to_string(),
                content: document.content.to_string(),
                folder_id,
                owner_id: lookup(&user_ids, document.owner, "user")?,
                status: Some(document.status.to_string()),
            },
        )?;
        document_ids.push(created.id);
        summary.documents += 1;
    }

    let granted_by = user_ids.first().copied();
    for grant in &data.grants {
        let (entity_type, entity_id) = match grant.target {
            SeedTarget::Folder(index) => ("folder", lookup(&folder_ids, index, "folder")?),
            SeedTarget::Document(index) => ("document", lookup(&document_ids, index, "document")?),
        };
        grant_permission(
            conn,
            GrantPermissionInput {
                user_id: lookup(&user_ids, grant.user, "user")?,
                entity_type: entity_type.to_string(),
                entity_id,
                capabilities: grant.capabilities,
                granted_by,
            },
        )?;
        summary.permissions += 1;
    }

    for comment in &data.comments {
        add_comment(
            conn,
            lookup(&document_ids, comment.document, "document")?,
            lookup(&user_ids, comment.author, "user")?,
            comment.text,
        )?;
        summary.comments += 1;
    }

    Ok(summary)
}

fn lookup(ids: &[i32], index: usize, kind: &str) -> Result<i32> {
    ids.get(index)
        .copied()
        .ok_or_else(|| anyhow!("seed data refers to missing {kind} #{index}"))
}

#[cfg(test)]
mod tests {
    use super::{lookup, DemoData, SeedTarget};

    #[test]
    fn standard_data_references_resolve() {
        let data = DemoData::standard();
        let users = data.users.len();
        let folders = data.folders.len();
        let documents = data.documents.len();

        for (position, folder) in data.folders.iter().enumerate() {
            assert!(folder.owner < users);
            assert!(folder.parent.map_or(true, |parent| parent < position));
        }
        for document in &data.documents {
            assert!(document.owner < users);
            assert!(document.folder.map_or(true, |folder| folder < folders));
        }
        for grant in &data.grants {
            assert!(grant.user < users);
            match grant.target {
                SeedTarget::Folder(index) => assert!(index < folders),
                SeedTarget::Document(index) => assert!(index < documents),
            }
        }
        for comment in &data.comments {
            assert!(comment.document < documents && comment.author < users);
        }
    }

    #[test]
    fn standard_data_has_one_user_per_role() {
        let data = DemoData::standard();
        let mut roles: Vec<_> = data.users.iter().map(|user| user.role).collect();
        roles.sort_unstable();
        assert_eq!(roles, ["accountant", "admin", "employee", "manager"]);
    }

    #[test]
    fn lookup_reports_dangling_indexes() {
        assert_eq!(lookup(&[7, 9], 1, "user").unwrap(), 9);
        let err = lookup(&[7, 9], 2, "user").unwrap_err();
        assert!(err.to_string().contains("missing user #2"));
    }
}
