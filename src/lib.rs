pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod models;
pub mod passwords;
pub mod repositories;
pub mod routes;
pub mod schema;
pub mod seed;
pub mod services;
pub mod state;
pub mod utils;
