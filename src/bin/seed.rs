use std::env;

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use vaultdoc::{
    config::AppConfig,
    db,
    seed::{self, DemoData},
};

const USAGE: &str = "Usage: seed demo-data";

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        Some("demo-data") => seed_demo_data(),
        Some(cmd) => {
            eprintln!("Unknown command: {cmd}\n{USAGE}");
            std::process::exit(1);
        }
        None => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    }
}

fn seed_demo_data() -> Result<()> {
    let config = AppConfig::from_env()?;
    tracing::info!(
        component = "seed",
        database_url = %config.redacted_database_url(),
        "loaded backend configuration"
    );
    let pool = db::init_pool_with_size(&config.database_url, 1)?;
    let mut conn = pool
        .get()
        .map_err(|err| anyhow!("failed to get database connection: {err}"))?;
    db::run_migrations(&mut conn)?;

    match seed::seed_demo_data(&mut conn, &DemoData::standard())? {
        Some(summary) => println!(
            "Seeded {} users, {} folders, {} documents, {} permissions, {} comments.",
            summary.users, summary.folders, summary.documents, summary.permissions, summary.comments
        ),
        None => println!("Database already has users; nothing seeded."),
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
