//! Superuser management commands.
//!
//! `superuser create` bootstraps a superuser seller directly, bypassing the
//! first-run HTTP registration (useful once that window has closed or for
//! headless provisioning).

use secrecy::SecretString;

use shopyard_backend::db::create_pool;
use shopyard_backend::services::{NewSeller, SellerService};

/// Create a superuser seller account.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the account fails
/// validation (bad email, short password, duplicate email).
pub async fn create(
    email: &str,
    name: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("SHOPYARD_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| "SHOPYARD_DATABASE_URL is not set")?;

    let pool = create_pool(&SecretString::from(database_url)).await?;

    let service = SellerService::new(&pool);
    let seller = service
        .create_seller(
            &NewSeller {
                name: name.to_owned(),
                email: email.to_owned(),
                password: password.to_owned(),
            },
            true,
        )
        .await?;

    tracing::info!(
        seller_id = %seller.id,
        email = %seller.email,
        "Superuser created"
    );
    Ok(())
}
