mod common;

use anyhow::Result;
use common::{acquire_db_lock, TestApp};
use vaultdoc::error::ServiceError;
use vaultdoc::seed::{seed_demo_data, DemoData, SeedComment, SeedDocument, SeedSummary, SeedUser};
use vaultdoc::services::{
    comments::add_comment,
    documents::{create_document, CreateDocumentInput},
    folders::{create_folder, CreateFolderInput},
    permissions::{grant_permission, Capabilities, GrantPermissionInput},
    users::{create_user, CreateUserInput},
};

fn user_input(email: &str, role: &str) -> CreateUserInput {
    CreateUserInput {
        email: email.to_string(),
        password_hash: "hash".to_string(),
        full_name: "Test User".to_string(),
        role: role.to_string(),
        is_active: true,
    }
}

#[tokio::test]
async fn write_services_validate_references() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let Some(app) = TestApp::new().await? else {
        return Ok(());
    };

    let pool = app.state.pool.clone();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut conn = pool.get()?;
        let conn = &mut *conn;

        let admin = create_user(conn, user_input("admin@vaultdoc.local", "admin"))?;
        assert!(matches!(
            create_user(conn, user_input("admin@vaultdoc.local", "manager")),
            Err(ServiceError::InvalidArgument(_))
        ));
        assert!(matches!(
            create_user(conn, user_input("x@vaultdoc.local", "intern")),
            Err(ServiceError::InvalidArgument(_))
        ));

        let missing_parent = create_folder(
            conn,
            CreateFolderInput {
                name: "Orphan".to_string(),
                owner_id: admin.id,
                parent_id: Some(9999),
            },
        );
        assert!(matches!(
            missing_parent,
            Err(ServiceError::NotFound { entity: "folder", .. })
        ));

        let folder = create_folder(
            conn,
            CreateFolderInput {
                name: "Shared".to_string(),
                owner_id: admin.id,
                parent_id: None,
            },
        )?;
        assert_eq!(folder.owner_name, "Test User");

        let document = create_document(
            conn,
            CreateDocumentInput {
                title: "Welcome".to_string(),
                content: "Hello".to_string(),
                folder_id: Some(folder.id),
                owner_id: admin.id,
                status: None,
            },
        )?;
        assert_eq!(document.status, "draft");
        assert_eq!(document.folder_name.as_deref(), Some("Shared"));

        let dangling = grant_permission(
            conn,
            GrantPermissionInput {
                user_id: admin.id,
                entity_type: "document".to_string(),
                entity_id: 9999,
                capabilities: Capabilities::default(),
                granted_by: None,
            },
        );
        assert!(matches!(
            dangling,
            Err(ServiceError::NotFound { entity: "document", .. })
        ));

        let grant = grant_permission(
            conn,
            GrantPermissionInput {
                user_id: admin.id,
                entity_type: "folder".to_string(),
                entity_id: folder.id,
                capabilities: Capabilities {
                    view: true,
                    ..Default::default()
                },
                granted_by: Some(admin.id),
            },
        )?;
        assert!(grant.can_view);
        assert!(!grant.can_manage_access);
        assert_eq!(grant.granted_by_name.as_deref(), Some("Test User"));

        let comment = add_comment(conn, document.id, admin.id, "Looks good")?;
        assert_eq!(comment.author_role.as_deref(), Some("admin"));
        Ok(())
    })
    .await??;

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn demo_data_seeds_once() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let Some(app) = TestApp::new().await? else {
        return Ok(());
    };

    let pool = app.state.pool.clone();
    let (first, second) = tokio::task::spawn_blocking(move || -> Result<_> {
        let mut conn = pool.get()?;
        let data = DemoData::standard();
        let first = seed_demo_data(&mut conn, &data)?;
        let second = seed_demo_data(&mut conn, &data)?;
        Ok((first, second))
    })
    .await??;

    assert_eq!(
        first,
        Some(SeedSummary {
            users: 4,
            folders: 4,
            documents: 5,
            permissions: 4,
            comments: 3,
        })
    );
    assert_eq!(second, None);

    let (status, body) = app.get("/api/statistics").await?;
    assert_eq!(status, 200);
    assert_eq!(body["statistics"]["total_records"], 20);

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn failed_seed_leaves_database_empty() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let Some(app) = TestApp::new().await? else {
        return Ok(());
    };

    let data = DemoData {
        users: vec![SeedUser {
            email: "admin@vaultdoc.local",
            password: "admin123",
            full_name: "System Administrator",
            role: "admin",
        }],
        folders: Vec::new(),
        documents: vec![SeedDocument {
            title: "Welcome",
            content: "Hello",
            folder: None,
            owner: 0,
            status: "draft",
        }],
        grants: Vec::new(),
        comments: vec![SeedComment {
            document: 0,
            author: 0,
            text: "   ",
        }],
    };

    let pool = app.state.pool.clone();
    let outcome = tokio::task::spawn_blocking(move || -> Result<_> {
        let mut conn = pool.get()?;
        Ok(seed_demo_data(&mut conn, &data))
    })
    .await??;
    assert!(outcome.is_err());

    let (_, body) = app.get("/api/statistics").await?;
    assert_eq!(body["statistics"]["total_records"], 0);

    app.cleanup().await?;
    Ok(())
}
