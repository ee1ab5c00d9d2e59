use anyhow::{Context, Result};

const DEFAULT_SEARCH_API_URL: &str = "https://api.usersbox.ru/v1/search";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// CRM lead-creation endpoint (e.g. a Bitrix24 `crm.lead.add.json` webhook URL).
    pub crm_lead_url: String,
    pub search_api_url: String,
    pub search_api_token: String,
    pub results_log_path: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            crm_lead_url: require_env("CRM_LEAD_URL")?,
            search_api_url: std::env::var("SEARCH_API_URL")
                .unwrap_or_else(|_| DEFAULT_SEARCH_API_URL.to_string()),
            search_api_token: require_env("SEARCH_API_TOKEN")?,
            results_log_path: std::env::var("RESULTS_LOG_PATH")
                .unwrap_or_else(|_| "results.txt".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
