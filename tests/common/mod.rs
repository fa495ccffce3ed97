use std::env;

use anyhow::{anyhow, Context, Result};
use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::PgConnection;
use http_body_util::BodyExt;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tower::util::ServiceExt;

use vaultdoc::config::AppConfig;
use vaultdoc::db::{self, PgPool};
use vaultdoc::models::{NewComment, NewDocument, NewFolder, NewPermission, NewUser};
use vaultdoc::routes;
use vaultdoc::schema::{document_comments, documents, folders, permissions, users};
use vaultdoc::state::AppState;

static DB_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    /// `Ok(None)` when `TEST_DATABASE_URL` is not set, so database-backed
    /// tests can bail out early on machines without Postgres.
    pub async fn new() -> Result<Option<Self>> {
        let Ok(database_url) = env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set; skipping database test");
            return Ok(None);
        };

        let config = AppConfig {
            database_url,
            database_max_pool_size: db::DEFAULT_MAX_POOL_SIZE,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            cors_allowed_origin: None,
            default_acting_user_id: 1,
        };

        let pool = db::init_pool_with_size(&config.database_url, config.database_max_pool_size)?;
        prepare_database(&pool).await?;

        let state = AppState::new(pool, config);
        let router = routes::create_router(state.clone());

        Ok(Some(Self { state, router }))
    }

    pub async fn cleanup(&self) -> Result<()> {
        self.with_conn(truncate_all).await
    }

    #[allow(dead_code)]
    pub async fn insert_user(&self, email: &str, full_name: &str, role: &str) -> Result<i32> {
        let user = NewUser {
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            full_name: full_name.to_string(),
            role: role.to_string(),
            is_active: true,
        };
        self.with_conn(move |conn| {
            diesel::insert_into(users::table)
                .values(&user)
                .returning(users::id)
                .get_result(conn)
                .context("failed to insert user")
        })
        .await
    }

    #[allow(dead_code)]
    pub async fn insert_folder(
        &self,
        name: &str,
        owner_id: i32,
        parent_id: Option<i32>,
    ) -> Result<i32> {
        let folder = NewFolder {
            name: name.to_string(),
            owner_id,
            parent_id,
        };
        self.with_conn(move |conn| {
            diesel::insert_into(folders::table)
                .values(&folder)
                .returning(folders::id)
                .get_result(conn)
                .context("failed to insert folder")
        })
        .await
    }

    #[allow(dead_code)]
    pub async fn insert_document(
        &self,
        title: &str,
        content: &str,
        folder_id: Option<i32>,
        owner_id: i32,
        status: &str,
    ) -> Result<i32> {
        let document = NewDocument {
            title: title.to_string(),
            content: content.to_string(),
            folder_id,
            owner_id,
            status: status.to_string(),
        };
        self.with_conn(move |conn| {
            diesel::insert_into(documents::table)
                .values(&document)
                .returning(documents::id)
                .get_result(conn)
                .context("failed to insert document")
        })
        .await
    }

    #[allow(dead_code)]
    pub async fn insert_permission(&self, permission: NewPermission) -> Result<i32> {
        self.with_conn(move |conn| {
            diesel::insert_into(permissions::table)
                .values(&permission)
                .returning(permissions::id)
                .get_result(conn)
                .context("failed to insert permission")
        })
        .await
    }

    #[allow(dead_code)]
    pub async fn insert_comment(&self, document_id: i32, user_id: i32, text: &str) -> Result<i32> {
        let comment = NewComment {
            document_id,
            user_id,
            comment: text.to_string(),
        };
        self.with_conn(move |conn| {
            diesel::insert_into(document_comments::table)
                .values(&comment)
                .returning(document_comments::id)
                .get_result(conn)
                .context("failed to insert comment")
        })
        .await
    }

    #[allow(dead_code)]
    pub async fn comment_count(&self) -> Result<i64> {
        self.with_conn(|conn| {
            document_comments::table
                .count()
                .get_result(conn)
                .context("failed to count comments")
        })
        .await
    }

    #[allow(dead_code)]
    pub async fn get(&self, path: &str) -> Result<(u16, Value)> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())?;
        self.send(request).await
    }

    #[allow(dead_code)]
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<(u16, Value)> {
        self.send_json(Method::PUT, path, payload).await
    }

    #[allow(dead_code)]
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<(u16, Value)> {
        self.send_json(Method::POST, path, payload).await
    }

    /// Request without a body, parameters carried in the query string.
    #[allow(dead_code)]
    pub async fn send_empty(&self, method: Method, path: &str) -> Result<(u16, Value)> {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())?;
        self.send(request).await
    }

    async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: &T,
    ) -> Result<(u16, Value)> {
        let body = serde_json::to_vec(payload)?;
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body))?;
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> Result<(u16, Value)> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response");
        let status = response.status().as_u16();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|err| anyhow!("failed to read response body: {err}"))?
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| {
                format!("response is not JSON: {}", String::from_utf8_lossy(&bytes))
            })?
        };
        Ok((status, json))
    }

    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut PgConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.state.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|err| anyhow!("failed to get database connection: {err}"))?;
            f(&mut conn)
        })
        .await
        .context("connection task panicked")?
    }
}

pub async fn acquire_db_lock() -> tokio::sync::MutexGuard<'static, ()> {
    DB_LOCK.lock().await
}

async fn prepare_database(pool: &PgPool) -> Result<()> {
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut conn = pool
            .get()
            .map_err(|err| anyhow!("failed to acquire connection: {err}"))?;
        db::run_migrations(&mut conn)?;
        truncate_all(&mut conn)?;
        Ok(())
    })
    .await
    .context("migration task panicked")?
}

fn truncate_all(conn: &mut PgConnection) -> Result<()> {
    conn.batch_execute(
        "TRUNCATE TABLE document_comments, permissions, documents, folders, users RESTART IDENTITY CASCADE;",
    )
    .context("failed to truncate tables")?;
    Ok(())
}
