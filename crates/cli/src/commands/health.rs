//! Backend health check.

use tracing::info;

use super::{CliError, client};

/// Ask the backend whether it is up.
///
/// # Errors
///
/// Returns an error if the backend does not answer its health check.
pub async fn check() -> Result<(), CliError> {
    let api = client()?;
    api.health().await?;
    info!(api = %api.base_url(), "Backend is healthy");
    Ok(())
}
