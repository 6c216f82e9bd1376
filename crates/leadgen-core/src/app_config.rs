use std::path::PathBuf;

/// Weights applied by the scorer. Each criterion contributes at most its
/// weight, so the maximum attainable score is [`ScoringWeights::total`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub has_ld: f64,
    pub size: f64,
    pub industry_fit: f64,
    pub contactability: f64,
}

impl ScoringWeights {
    /// Upper bound of any record's score.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.has_ld + self.size + self.industry_fit + self.contactability
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            has_ld: 4.0,
            size: 3.0,
            industry_fit: 2.0,
            contactability: 1.0,
        }
    }
}

/// Process-wide configuration, built once at startup and passed by
/// reference into every component.
#[derive(Clone)]
pub struct Settings {
    pub places_api_key: String,
    pub sheets_spreadsheet_id: String,
    pub sheets_service_account_json: PathBuf,
    pub sheets_worksheet: String,
    pub openai_api_key: Option<String>,
    pub notes_model: String,
    pub target_cities: Vec<String>,
    /// Search radius in meters. Carried for operators; the text-search
    /// request shape does not send it.
    pub discovery_radius_m: u32,
    pub max_results_per_city: usize,
    pub weights: ScoringWeights,
    pub log_level: String,
    pub output_path: PathBuf,
    pub http_timeout_secs: u64,
    pub user_agent: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("places_api_key", &"[redacted]")
            .field("sheets_spreadsheet_id", &self.sheets_spreadsheet_id)
            .field(
                "sheets_service_account_json",
                &self.sheets_service_account_json,
            )
            .field("sheets_worksheet", &self.sheets_worksheet)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("notes_model", &self.notes_model)
            .field("target_cities", &self.target_cities)
            .field("discovery_radius_m", &self.discovery_radius_m)
            .field("max_results_per_city", &self.max_results_per_city)
            .field("weights", &self.weights)
            .field("log_level", &self.log_level)
            .field("output_path", &self.output_path)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
