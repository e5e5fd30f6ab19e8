//! Admin role management.

use serde_json::json;

use dimakatso_supabase::DataClient;
use dimakatso_supabase::types::ProfileRow;

/// Grant the admin role to the profile with the given email.
///
/// # Errors
///
/// Returns an error when no profile matches or the update is rejected.
pub async fn grant(email: &str) -> Result<(), Box<dyn std::error::Error>> {
    set_role(email, "admin").await
}

/// Revoke the admin role (back to a regular customer).
///
/// # Errors
///
/// Returns an error when no profile matches or the update is rejected.
pub async fn revoke(email: &str) -> Result<(), Box<dyn std::error::Error>> {
    set_role(email, "customer").await
}

async fn set_role(email: &str, role: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::service_config()?;
    let data = DataClient::new(&config);

    let profile: ProfileRow = data.from("profiles").eq("email", email).fetch_one().await?;

    let updated: ProfileRow = data
        .update("profiles", profile.id, &json!({ "role": role }), None)
        .await?;

    tracing::info!(
        profile_id = %updated.id,
        email = %email,
        role = %role,
        "Profile role updated"
    );
    Ok(())
}
