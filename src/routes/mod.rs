use axum::http::HeaderValue;
use axum::{
    routing::{get, put},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod comments;
pub mod documents;
pub mod folders;
pub mod health;
pub mod permissions;
pub mod statistics;
pub mod users;

pub(crate) const SUCCESS: &str = "success";

pub fn create_router(state: AppState) -> Router<()> {
    let allow_origin = match state.config.cors_allowed_origin.as_deref() {
        Some(origins) => AllowOrigin::list(parse_origins(origins)),
        None => AllowOrigin::mirror_request(),
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    let users_routes = Router::new()
        .route("/", get(users::list_users))
        .route("/:id", get(users::get_user).put(users::update_user));

    let folders_routes = Router::new()
        .route("/", get(folders::list_folders))
        .route("/:id", put(folders::update_folder));

    let documents_routes = Router::new()
        .route("/", get(documents::list_documents))
        .route(
            "/:id",
            get(documents::get_document).put(documents::update_document),
        )
        .route(
            "/:id/comments",
            get(comments::list_comments).post(comments::add_comment),
        );

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/api/health", get(health::health_check))
        .nest("/api/users", users_routes)
        .nest("/api/folders", folders_routes)
        .nest("/api/documents", documents_routes)
        .route("/api/permissions", get(permissions::list_permissions))
        .route("/api/statistics", get(statistics::get_statistics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn parse_origins(origins: &str) -> Vec<HeaderValue> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .filter_map(|value| match value.parse::<HeaderValue>() {
            Ok(header) => Some(header),
            Err(_) => {
                tracing::warn!(origin = value, "ignoring invalid CORS allowed origin");
                None
            }
        })
        .collect()
}
