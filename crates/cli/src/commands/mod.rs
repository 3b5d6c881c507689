//! CLI subcommands.

pub mod migrate;
pub mod seed;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

/// Error shared by database-touching commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),
}

/// Connect to the database named by `COLOPHON_DATABASE_URL` (or the generic
/// `DATABASE_URL` fallback).
pub async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("COLOPHON_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("COLOPHON_DATABASE_URL"))?;

    Ok(PgPool::connect(database_url.expose_secret()).await?)
}
