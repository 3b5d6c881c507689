//! Seed the database with sample data.
//!
//! Inserts a small starter catalog and a demo user so a fresh instance has
//! something to browse. Running it twice inserts the catalog twice; it is a
//! development convenience, not an idempotent fixture loader.

use rust_decimal::Decimal;

use super::CommandError;

const SAMPLE_BOOKS: &[(&str, &str, &str)] = &[
    ("The Left Hand of Darkness", "Ursula K. Le Guin", "9.99"),
    ("A Wizard of Earthsea", "Ursula K. Le Guin", "7.50"),
    ("Dune", "Frank Herbert", "12.00"),
    ("The Dispossessed", "Ursula K. Le Guin", "10.25"),
    ("Solaris", "Stanisław Lem", "8.75"),
];

/// Insert the sample catalog and a demo user.
///
/// # Errors
///
/// Returns an error if the environment is missing the database URL or any
/// insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    for (title, author, price) in SAMPLE_BOOKS {
        let price: Decimal = price
            .parse()
            .map_err(|_| CommandError::InvalidSeed(format!("bad price for {title}")))?;

        sqlx::query("INSERT INTO books (title, author, price) VALUES ($1, $2, $3)")
            .bind(title)
            .bind(author)
            .bind(price)
            .execute(&pool)
            .await?;
    }
    tracing::info!(count = SAMPLE_BOOKS.len(), "Sample books inserted");

    sqlx::query("INSERT INTO users (username, credential) VALUES ($1, $2)")
        .bind("demo")
        .bind("demo-credential")
        .execute(&pool)
        .await?;
    tracing::info!("Demo user created");

    Ok(())
}
