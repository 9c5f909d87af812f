//! Migration CLI for the post store.
//!
//! Reads `DATABASE_URL` (from the environment or `.env`), e.g.
//! `migration up` or `migration fresh`.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("info,sea_orm_migration=info")
        .init();

    tracing::info!("Running post store migrations");

    cli::run_cli(migration::Migrator).await;
}
