//! Google Places discovery: a rate-limited JSON fetcher and the per-city
//! text-search/details engine built on top of it.

pub mod discovery;
pub mod error;
pub mod fetcher;
pub mod rate_limit;
pub mod status;
pub mod types;

pub use discovery::{Discovery, DEFAULT_BASE_URL, PAGE_TOKEN_DELAY};
pub use error::PlacesError;
pub use fetcher::{Fetch, HttpFetcher, QueryParams};
pub use rate_limit::RetryPolicy;
pub use status::{classify_status, StatusClass};
pub use types::{PlaceDetail, RawHit, SearchQuery};
