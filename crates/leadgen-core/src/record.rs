use serde::{Deserialize, Serialize};

/// Column schema shared by every export sink, in output order.
pub const COLUMNS: [&str; 12] = [
    "name",
    "city",
    "industry",
    "employees_est",
    "has_ld_signals",
    "website",
    "phone",
    "address",
    "google_place_id",
    "score",
    "score_breakdown",
    "notes",
];

/// One candidate organization as it flows through enrichment, scoring,
/// annotation and export.
///
/// Discovery fills the identity and contact fields; every later stage only
/// populates its own fields on a fresh copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub types: Vec<String>,
    pub city: String,
    pub google_place_id: Option<String>,
    pub industry: Option<String>,
    pub employees_est: Option<u32>,
    pub has_ld_signals: bool,
    /// Assigned once by the scoring stage.
    pub score: Option<f64>,
    pub score_breakdown: String,
    pub notes: Option<String>,
}

impl Record {
    /// `true` when the record carries a website or phone number.
    #[must_use]
    pub fn is_contactable(&self) -> bool {
        has_text(self.website.as_deref()) || has_text(self.phone.as_deref())
    }

    /// Render the record as string cells matching [`COLUMNS`].
    ///
    /// Absent values render as empty cells.
    #[must_use]
    pub fn to_row(&self) -> Vec<String> {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        vec![
            text(&self.name),
            self.city.clone(),
            text(&self.industry),
            self.employees_est
                .map(|n| n.to_string())
                .unwrap_or_default(),
            String::from(if self.has_ld_signals { "True" } else { "False" }),
            text(&self.website),
            text(&self.phone),
            text(&self.address),
            text(&self.google_place_id),
            self.score.map(|s| s.to_string()).unwrap_or_default(),
            self.score_breakdown.clone(),
            text(&self.notes),
        ]
    }
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
