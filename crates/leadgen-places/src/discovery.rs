//! Discovery engine: paginated text search per city, capped, then a details
//! lookup per hit merged into an unscored [`Record`].

use std::time::Duration;

use leadgen_core::Record;

use crate::error::PlacesError;
use crate::fetcher::{Fetch, QueryParams};
use crate::types::{DetailsResponse, PlaceDetail, RawHit, SearchPage, SearchQuery};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Pause before each continuation fetch. A fresh `next_page_token` is not
/// valid upstream until roughly two seconds after it is issued.
pub const PAGE_TOKEN_DELAY: Duration = Duration::from_secs(2);

/// Upper bound on pages per city, guarding against a token that never ends.
const MAX_PAGES: usize = 50;

const ENTITY_TYPE: &str = "establishment";
const DETAIL_FIELDS: &str = "name,formatted_address,international_phone_number,website,types";

/// Text-search + details discovery over any [`Fetch`] implementation.
pub struct Discovery<F> {
    fetcher: F,
    api_key: String,
    max_results_per_city: usize,
    search_url: String,
    details_url: String,
    page_token_delay: Duration,
}

impl<F: Fetch> Discovery<F> {
    /// Creates an engine pointed at the production Places API.
    #[must_use]
    pub fn new(fetcher: F, api_key: &str, max_results_per_city: usize) -> Self {
        Self {
            fetcher,
            api_key: api_key.to_owned(),
            max_results_per_city,
            search_url: format!("{DEFAULT_BASE_URL}/textsearch/json"),
            details_url: format!("{DEFAULT_BASE_URL}/details/json"),
            page_token_delay: PAGE_TOKEN_DELAY,
        }
    }

    /// Points both endpoints at `base_url` (for testing with wiremock).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.search_url = format!("{base}/textsearch/json");
        self.details_url = format!("{base}/details/json");
        self
    }

    /// Overrides [`PAGE_TOKEN_DELAY`]. Only stubs that accept a token
    /// immediately should be given anything shorter.
    #[must_use]
    pub fn with_page_token_delay(mut self, delay: Duration) -> Self {
        self.page_token_delay = delay;
        self
    }

    /// Discovers organizations for `query` in every city, in city order.
    ///
    /// # Errors
    ///
    /// Any search-page failure aborts the run: transient errors once retries
    /// are exhausted, protocol errors immediately. Details failures never
    /// propagate; the hit falls back to its search fields.
    pub async fn discover(
        &self,
        query: &str,
        cities: &[String],
    ) -> Result<Vec<Record>, PlacesError> {
        let mut records = Vec::new();
        for city in cities {
            let search = SearchQuery::new(query, city);
            let hits = self.search_city(&search).await?;
            tracing::info!(city = %city, hits = hits.len(), "text search complete");

            for hit in hits {
                let detail = self.detail_for(&hit).await;
                records.push(merge_hit(hit, detail, city));
            }
        }
        Ok(records)
    }

    /// Runs text search for one city, following continuation tokens until
    /// none is returned or the per-city cap is reached, then truncates to
    /// the cap in upstream order.
    ///
    /// # Errors
    ///
    /// - Any error from the fetcher.
    /// - [`PlacesError::Deserialize`] if a page has an unexpected shape.
    /// - [`PlacesError::PaginationLimit`] if more than `MAX_PAGES` pages are
    ///   returned.
    pub async fn search_city(&self, search: &SearchQuery) -> Result<Vec<RawHit>, PlacesError> {
        let cap = self.max_results_per_city;
        let mut hits: Vec<RawHit> = Vec::new();
        let mut params: QueryParams = vec![
            ("query", search.search_text()),
            ("key", self.api_key.clone()),
            ("type", ENTITY_TYPE.to_owned()),
        ];
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(PlacesError::PaginationLimit {
                    query: search.search_text(),
                    max_pages: MAX_PAGES,
                });
            }

            let body = self.fetcher.fetch(&self.search_url, &params).await?;
            let page: SearchPage =
                serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                    context: format!("text search page {page_count} for {}", search.city),
                    source: e,
                })?;
            hits.extend(page.results);

            let Some(token) = page.next_page_token.filter(|t| !t.is_empty()) else {
                break;
            };
            if hits.len() >= cap {
                break;
            }

            tracing::debug!(city = %search.city, page = page_count, "following next_page_token");
            tokio::time::sleep(self.page_token_delay).await;
            params = vec![("pagetoken", token), ("key", self.api_key.clone())];
        }

        hits.truncate(cap);
        Ok(hits)
    }

    /// Looks up the detail fields for one place id.
    ///
    /// # Errors
    ///
    /// Propagates fetcher errors and [`PlacesError::Deserialize`].
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetail, PlacesError> {
        let params: QueryParams = vec![
            ("place_id", place_id.to_owned()),
            ("key", self.api_key.clone()),
            ("fields", DETAIL_FIELDS.to_owned()),
        ];
        let body = self.fetcher.fetch(&self.details_url, &params).await?;
        let resp: DetailsResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("details for {place_id}"),
                source: e,
            })?;
        Ok(resp.result)
    }

    /// Details for a hit, or an empty detail when the hit has no id or the
    /// lookup fails.
    async fn detail_for(&self, hit: &RawHit) -> PlaceDetail {
        let Some(place_id) = hit.place_id.as_deref().filter(|id| !id.is_empty()) else {
            return PlaceDetail::default();
        };
        match self.place_details(place_id).await {
            Ok(detail) => detail,
            Err(e) => {
                tracing::warn!(
                    place_id,
                    error = %e,
                    "details lookup failed, keeping search fields only"
                );
                PlaceDetail::default()
            }
        }
    }
}

/// Merge a search hit with its details: detail name, address and types win
/// when present; phone and website exist only on the details side.
pub(crate) fn merge_hit(hit: RawHit, detail: PlaceDetail, city: &str) -> Record {
    let present = |v: Option<String>| v.filter(|s| !s.is_empty());
    Record {
        name: present(detail.name).or_else(|| present(hit.name)),
        address: present(detail.formatted_address).or_else(|| present(hit.formatted_address)),
        phone: present(detail.international_phone_number),
        website: present(detail.website),
        types: if detail.types.is_empty() {
            hit.types
        } else {
            detail.types
        },
        city: city.to_owned(),
        google_place_id: hit.place_id,
        ..Record::default()
    }
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;
