mod common;

use anyhow::Result;
use common::{acquire_db_lock, TestApp};
use serde_json::json;

#[tokio::test]
async fn empty_database_reports_zero_totals() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let Some(app) = TestApp::new().await? else {
        return Ok(());
    };

    let (status, body) = app.get("/api/statistics").await?;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "VaultDoc system statistics");
    let stats = &body["statistics"];
    assert_eq!(stats["total_records"], 0);
    assert_eq!(stats["users"]["by_role"], json!({}));
    assert_eq!(
        stats["documents"]["by_status"],
        json!({ "draft": 0, "under_review": 0, "approved": 0, "rejected": 0 })
    );

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn breakdowns_and_totals_follow_stored_rows() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let Some(app) = TestApp::new().await? else {
        return Ok(());
    };

    let admin = app
        .insert_user("admin@vaultdoc.local", "System Administrator", "admin")
        .await?;
    app.insert_folder("Shared documents", admin, None).await?;
    let document = app
        .insert_document("Notes", "Short note.", None, admin, "draft")
        .await?;

    let (_, body) = app.get("/api/statistics").await?;
    let stats = &body["statistics"];
    assert_eq!(stats["users"]["total"], 1);
    assert_eq!(stats["users"]["by_role"], json!({ "admin": 1 }));
    assert_eq!(
        stats["documents"]["by_status"],
        json!({ "draft": 1, "under_review": 0, "approved": 0, "rejected": 0 })
    );
    assert_eq!(stats["folders"], 1);
    assert_eq!(stats["total_records"], 3);

    app.insert_comment(document, admin, "First!").await?;
    app.insert_user("irina@vaultdoc.local", "Irina Volkova", "accountant")
        .await?;

    let (_, body) = app.get("/api/statistics").await?;
    let stats = &body["statistics"];
    assert_eq!(stats["users"]["by_role"], json!({ "admin": 1, "accountant": 1 }));
    assert_eq!(stats["comments"], 1);
    assert_eq!(stats["total_records"], 5);

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn health_and_banner_respond_without_data() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let Some(app) = TestApp::new().await? else {
        return Ok(());
    };

    for path in ["/health", "/api/health"] {
        let (status, body) = app.get(path).await?;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "healthy");
    }

    let (status, body) = app.get("/").await?;
    assert_eq!(status, 200);
    assert_eq!(body["endpoints"]["statistics"], "/api/statistics");

    app.cleanup().await?;
    Ok(())
}
