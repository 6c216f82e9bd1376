//! Enrichment, scoring, annotation and orchestration for discovered leads.

pub mod enrich;
pub mod error;
pub mod keywords;
pub mod notes;
pub mod openai;
pub mod pipeline;
pub mod scorer;

pub use enrich::{enrich_records, website_domain};
pub use error::{NoteError, PipelineError};
pub use keywords::KeywordTable;
pub use notes::{NoteGenerator, NoteOutcome, OpenAiNotes};
pub use openai::OpenAiClient;
pub use pipeline::{LeadSource, Pipeline, PipelineReport, RunRequest, SinkFailure, Stage};
pub use scorer::score_record;
