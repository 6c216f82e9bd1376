//! Places API request and response shapes.
//!
//! Every field of a search hit or a details payload is optional on the wire;
//! discovery degrades to whatever is present rather than rejecting a hit.

use serde::Deserialize;

/// One free-text search for one city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub city: String,
}

impl SearchQuery {
    #[must_use]
    pub fn new(text: &str, city: &str) -> Self {
        Self {
            text: text.to_owned(),
            city: city.to_owned(),
        }
    }

    /// The `query` parameter sent to text search, e.g. `"hr software in Pune"`.
    #[must_use]
    pub fn search_text(&self) -> String {
        format!("{} in {}", self.text, self.city)
    }
}

/// A single text-search result. Discarded once the details lookup is merged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHit {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

/// Fields requested from the details endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceDetail {
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub international_phone_number: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

/// Body of a text-search page. `status` has already been checked by the
/// fetcher when this is decoded.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchPage {
    #[serde(default)]
    pub results: Vec<RawHit>,
    pub next_page_token: Option<String>,
}

/// Body of a details response.
#[derive(Debug, Deserialize)]
pub(crate) struct DetailsResponse {
    #[serde(default)]
    pub result: PlaceDetail,
}
