use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    /// A benign upstream status that is worth asking again for, e.g.
    /// `OVER_QUERY_LIMIT`. Surfaces to the caller once retries run out.
    #[error("Places API returned transient status={status} error={message}")]
    TransientStatus { status: String, message: String },

    /// An upstream status outside the known set. Never retried.
    #[error("Places API returned status={status} error={message}")]
    UpstreamStatus { status: String, message: String },

    /// A 2xx response whose body is not JSON, e.g. a proxy error page.
    /// Retried like a network failure.
    #[error("non-JSON body from {endpoint}: {source}")]
    MalformedBody {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid endpoint URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("pagination limit reached for \"{query}\": exceeded {max_pages} pages")]
    PaginationLimit { query: String, max_pages: usize },
}
