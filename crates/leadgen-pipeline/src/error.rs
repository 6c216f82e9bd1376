use leadgen_places::PlacesError;
use thiserror::Error;

/// Failures from the note generator's language-model backend.
#[derive(Debug, Error)]
pub enum NoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("completion contained no text")]
    EmptyCompletion,
}

/// Failures that abort a pipeline run.
///
/// Enrichment, annotation and export never abort; only discovery can.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("discovery failed: {0}")]
    Discovery(#[from] PlacesError),
}
