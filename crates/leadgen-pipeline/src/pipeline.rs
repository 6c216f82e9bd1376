//! Pipeline orchestration.
//!
//! Stages run strictly in order and each returns a fresh collection:
//! `Discover → Enrich → Filter → Score → Annotate → Export`.

use std::fmt;

use async_trait::async_trait;
use leadgen_core::{Record, ScoringWeights, Settings};
use leadgen_export::{ExportError, LeadSink};
use leadgen_places::{Discovery, Fetch, PlacesError};

use crate::enrich::enrich_records;
use crate::error::PipelineError;
use crate::notes::{NoteGenerator, NoteOutcome};
use crate::scorer::{round_score, score_record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discover,
    Enrich,
    Filter,
    Score,
    Annotate,
    Export,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discover => "discover",
            Self::Enrich => "enrich",
            Self::Filter => "filter",
            Self::Score => "score",
            Self::Annotate => "annotate",
            Self::Export => "export",
        };
        f.write_str(name)
    }
}

/// Where unscored records come from.
#[async_trait]
pub trait LeadSource: Send + Sync {
    async fn discover(&self, query: &str, cities: &[String]) -> Result<Vec<Record>, PlacesError>;
}

#[async_trait]
impl<F: Fetch> LeadSource for Discovery<F> {
    async fn discover(&self, query: &str, cities: &[String]) -> Result<Vec<Record>, PlacesError> {
        Discovery::discover(self, query, cities).await
    }
}

/// One run's command-line inputs.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub query: String,
    pub industry: Option<String>,
    pub min_employees: u32,
}

impl RunRequest {
    /// The query sent upstream: the industry hint, when given, is appended
    /// after a space.
    #[must_use]
    pub fn search_text(&self) -> String {
        match self.industry.as_deref().map(str::trim) {
            Some(hint) if !hint.is_empty() => format!("{} {hint}", self.query),
            _ => self.query.clone(),
        }
    }
}

/// A sink that failed; later sinks still ran.
#[derive(Debug)]
pub struct SinkFailure {
    pub sink: String,
    pub error: ExportError,
}

/// Summary of a completed run.
#[derive(Debug)]
pub struct PipelineReport {
    pub discovered: usize,
    pub enriched: usize,
    pub filtered: usize,
    /// Destinations written successfully, in sink order.
    pub destinations: Vec<String>,
    pub sink_failures: Vec<SinkFailure>,
    /// The exported records.
    pub records: Vec<Record>,
}

impl PipelineReport {
    /// Number of leads handed to the sinks.
    #[must_use]
    pub fn exported(&self) -> usize {
        self.records.len()
    }
}

/// Drop records whose estimate is below `min_employees`; unknown counts as 0.
#[must_use]
pub fn filter_by_min_employees(records: Vec<Record>, min_employees: u32) -> Vec<Record> {
    records
        .into_iter()
        .filter(|r| r.employees_est.unwrap_or(0) >= min_employees)
        .collect()
}

/// Attach a score, rounded to two decimals, and its breakdown.
#[must_use]
pub fn score_records(records: Vec<Record>, weights: &ScoringWeights) -> Vec<Record> {
    records
        .into_iter()
        .map(|mut record| {
            let (score, breakdown) = score_record(&record, weights);
            record.score = Some(round_score(score));
            record.score_breakdown = breakdown;
            record
        })
        .collect()
}

/// Attach a note to every record. Without a generator, or when generation
/// fails, the note is empty.
pub async fn annotate(records: Vec<Record>, notes: Option<&dyn NoteGenerator>) -> Vec<Record> {
    let mut out = Vec::with_capacity(records.len());
    for mut record in records {
        let note = match notes {
            Some(generator) => {
                let outcome = generator.generate(&record).await;
                if let NoteOutcome::Failed(reason) = &outcome {
                    tracing::warn!(
                        name = record.name.as_deref().unwrap_or_default(),
                        reason = %reason,
                        "note generation failed, leaving note empty"
                    );
                }
                outcome.into_note()
            }
            None => String::new(),
        };
        record.notes = Some(note);
        out.push(record);
    }
    out
}

/// Hand the records to every sink in order. A failing sink is recorded and
/// the rest still run; nothing already written is rolled back.
pub async fn export(
    records: &[Record],
    sinks: &[Box<dyn LeadSink>],
) -> (Vec<String>, Vec<SinkFailure>) {
    let mut destinations = Vec::new();
    let mut failures = Vec::new();
    for sink in sinks {
        match sink.write(records).await {
            Ok(dest) => destinations.push(dest),
            Err(error) => {
                tracing::warn!(sink = sink.name(), error = %error, "export sink failed");
                failures.push(SinkFailure {
                    sink: sink.name().to_string(),
                    error,
                });
            }
        }
    }
    (destinations, failures)
}

/// The discovery → enrichment → scoring → export pipeline.
pub struct Pipeline<'a> {
    settings: &'a Settings,
    source: Box<dyn LeadSource + 'a>,
    notes: Option<Box<dyn NoteGenerator + 'a>>,
    sinks: Vec<Box<dyn LeadSink>>,
}

impl<'a> Pipeline<'a> {
    #[must_use]
    pub fn new(settings: &'a Settings, source: Box<dyn LeadSource + 'a>) -> Self {
        Self {
            settings,
            source,
            notes: None,
            sinks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_notes(mut self, notes: Box<dyn NoteGenerator + 'a>) -> Self {
        self.notes = Some(notes);
        self
    }

    /// Sinks run in the order they were added.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn LeadSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Run every stage once.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Discovery`] when discovery fails. Sink
    /// failures are reported in [`PipelineReport::sink_failures`] instead.
    pub async fn run(&self, request: &RunRequest) -> Result<PipelineReport, PipelineError> {
        let query = request.search_text();

        tracing::info!(
            stage = %Stage::Discover,
            query = %query,
            cities = ?self.settings.target_cities,
            "starting"
        );
        let discovered = self
            .source
            .discover(&query, &self.settings.target_cities)
            .await?;
        let discovered_count = discovered.len();

        tracing::info!(stage = %Stage::Enrich, records = discovered_count, "starting");
        let enriched = enrich_records(discovered);
        let enriched_count = enriched.len();

        tracing::info!(stage = %Stage::Filter, min_employees = request.min_employees, "starting");
        let filtered = filter_by_min_employees(enriched, request.min_employees);
        let filtered_count = filtered.len();

        tracing::info!(stage = %Stage::Score, records = filtered_count, "starting");
        let scored = score_records(filtered, &self.settings.weights);

        tracing::info!(stage = %Stage::Annotate, enabled = self.notes.is_some(), "starting");
        let annotated = annotate(scored, self.notes.as_deref()).await;

        tracing::info!(stage = %Stage::Export, sinks = self.sinks.len(), "starting");
        let (destinations, sink_failures) = export(&annotated, &self.sinks).await;

        tracing::info!(
            discovered = discovered_count,
            enriched = enriched_count,
            exported = annotated.len(),
            failed_sinks = sink_failures.len(),
            "pipeline complete"
        );
        Ok(PipelineReport {
            discovered: discovered_count,
            enriched: enriched_count,
            filtered: filtered_count,
            destinations,
            sink_failures,
            records: annotated,
        })
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
