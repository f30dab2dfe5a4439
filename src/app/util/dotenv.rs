use std::env;

/// Loads `.env.<APP_ENV>` and then `.env`. Values already present in the
/// process environment win, and missing files are not an error.
pub fn load() {
    let app_env = env::var("APP_ENV").unwrap_or("development".to_string());

    if let Err(e) = dotenvy::from_filename(format!(".env.{}", app_env)) {
        tracing::debug!("no .env.{} loaded: {}", app_env, e);
    }
    let _ = dotenvy::dotenv();
}
