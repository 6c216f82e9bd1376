use std::path::PathBuf;

use crate::app_config::{ScoringWeights, Settings};
use crate::ConfigError;

/// Load settings from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_settings() -> Result<Settings, ConfigError> {
    dotenvy::dotenv().ok();
    load_settings_from_env()
}

/// Load settings from environment variables already in the process.
///
/// Unlike [`load_settings`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_settings_from_env() -> Result<Settings, ConfigError> {
    build_settings(|key| std::env::var(key))
}

/// Build settings using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_settings<F>(lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    // Blank values count as missing, matching how an empty `.env` entry reads.
    let non_empty =
        |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.trim().is_empty()) };

    let or_default = |var: &str, default: &str| -> String {
        non_empty(var).unwrap_or_else(|| default.to_string())
    };

    let places_api_key = non_empty("GOOGLE_PLACES_API_KEY");
    let sheets_spreadsheet_id = non_empty("GOOGLE_SHEETS_SPREADSHEET_ID");

    let missing: Vec<String> = [
        ("GOOGLE_PLACES_API_KEY", places_api_key.is_none()),
        ("GOOGLE_SHEETS_SPREADSHEET_ID", sheets_spreadsheet_id.is_none()),
    ]
    .into_iter()
    .filter(|(_, absent)| *absent)
    .map(|(var, _)| var.to_string())
    .collect();

    let (Some(places_api_key), Some(sheets_spreadsheet_id)) =
        (places_api_key, sheets_spreadsheet_id)
    else {
        return Err(ConfigError::MissingEnvVars(missing));
    };

    let target_cities = parse_cities(&or_default("TARGET_CITIES", "Delhi NCR"));
    if target_cities.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "TARGET_CITIES".to_string(),
            reason: "no cities listed".to_string(),
        });
    }

    let weights = ScoringWeights {
        has_ld: parse_weight("WEIGHT_HAS_LD", &or_default("WEIGHT_HAS_LD", "4.0"))?,
        size: parse_weight("WEIGHT_SIZE", &or_default("WEIGHT_SIZE", "3.0"))?,
        industry_fit: parse_weight(
            "WEIGHT_INDUSTRY_FIT",
            &or_default("WEIGHT_INDUSTRY_FIT", "2.0"),
        )?,
        contactability: parse_weight(
            "WEIGHT_CONTACTABILITY",
            &or_default("WEIGHT_CONTACTABILITY", "1.0"),
        )?,
    };

    Ok(Settings {
        places_api_key,
        sheets_spreadsheet_id,
        sheets_service_account_json: PathBuf::from(or_default(
            "GOOGLE_SHEETS_SERVICE_ACCOUNT_JSON",
            "credentials/service_account.json",
        )),
        sheets_worksheet: or_default("LEADGEN_SHEETS_WORKSHEET", "Leads"),
        openai_api_key: non_empty("OPENAI_API_KEY"),
        notes_model: or_default("LEADGEN_NOTES_MODEL", "gpt-4o-mini"),
        target_cities,
        discovery_radius_m: parse_number(
            "DISCOVERY_RADIUS_M",
            &or_default("DISCOVERY_RADIUS_M", "30000"),
        )?,
        max_results_per_city: parse_number(
            "MAX_RESULTS_PER_CITY",
            &or_default("MAX_RESULTS_PER_CITY", "120"),
        )?,
        weights,
        log_level: or_default("LEADGEN_LOG_LEVEL", "info"),
        output_path: PathBuf::from(or_default("LEADGEN_OUTPUT_PATH", "output/leads.csv")),
        http_timeout_secs: parse_number(
            "LEADGEN_HTTP_TIMEOUT_SECS",
            &or_default("LEADGEN_HTTP_TIMEOUT_SECS", "20"),
        )?,
        user_agent: or_default("LEADGEN_USER_AGENT", "leadgen/0.1 (lead-discovery)"),
    })
}

/// Split a comma-separated city list, trimming entries and dropping blanks.
fn parse_cities(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Weights must be finite and non-negative so that scores stay non-negative.
fn parse_weight(var: &str, raw: &str) -> Result<f64, ConfigError> {
    let weight: f64 = parse_number(var, raw)?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("weight must be a finite, non-negative number (got {raw})"),
        });
    }
    Ok(weight)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
