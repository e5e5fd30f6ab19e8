//! CLI command implementations.

pub mod admin;
pub mod seed;

use secrecy::SecretString;

use dimakatso_supabase::SupabaseConfig;

/// Build the platform config from the environment (service role key).
pub fn service_config() -> Result<SupabaseConfig, Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let url = std::env::var("SUPABASE_URL")
        .map_err(|_| "SUPABASE_URL is not set")?
        .trim_end_matches('/')
        .to_string();
    let api_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
        .map_err(|_| "SUPABASE_SERVICE_ROLE_KEY is not set")?;

    Ok(SupabaseConfig {
        url,
        api_key: SecretString::from(api_key),
    })
}
