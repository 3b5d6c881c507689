//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! colophon-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `COLOPHON_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)
//!
//! Migration files live in `crates/api/migrations/` and are embedded into
//! the binary at compile time.

use super::CommandError;

/// Run all pending API database migrations.
///
/// # Errors
///
/// Returns an error if the environment is missing the database URL, the
/// connection fails, or a migration fails to apply.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
