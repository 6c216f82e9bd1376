//! `leadgen run`: wire the Places client, note generator and sinks into one
//! pipeline run.

use anyhow::Context;
use leadgen_core::Settings;
use leadgen_export::{CsvSink, SheetsAuth, SheetsClient, SheetsSink};
use leadgen_pipeline::{OpenAiClient, OpenAiNotes, Pipeline, PipelineReport, RunRequest};
use leadgen_places::{Discovery, HttpFetcher, RetryPolicy};

/// Run the pipeline once and print the summary.
///
/// Sink failures are printed to stderr and do not fail the command; every
/// other sink has already run by then.
///
/// # Errors
///
/// Returns an error if an HTTP client cannot be built or discovery fails.
pub(crate) async fn run_pipeline(settings: &Settings, request: &RunRequest) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new(
        settings.http_timeout_secs,
        &settings.user_agent,
        RetryPolicy::default(),
    )
    .context("failed to build Places HTTP client")?;
    let discovery = Discovery::new(
        fetcher,
        &settings.places_api_key,
        settings.max_results_per_city,
    );

    let sheets_client = SheetsClient::new(
        SheetsAuth::ServiceAccountFile(settings.sheets_service_account_json.clone()),
        &settings.sheets_spreadsheet_id,
        settings.http_timeout_secs,
        &settings.user_agent,
    )
    .context("failed to build Sheets HTTP client")?;

    let sheets = SheetsSink::new(sheets_client, &settings.sheets_worksheet);

    let mut pipeline = Pipeline::new(settings, Box::new(discovery))
        .with_sink(Box::new(CsvSink::new(&settings.output_path)))
        .with_sink(Box::new(sheets));

    if let Some(api_key) = settings.openai_api_key.as_deref() {
        let client = OpenAiClient::new(api_key, settings.http_timeout_secs, &settings.user_agent)
            .context("failed to build OpenAI HTTP client")?;
        let notes = OpenAiNotes::new(client, &settings.notes_model);
        pipeline = pipeline.with_notes(Box::new(notes));
    } else {
        tracing::info!("OPENAI_API_KEY not set, notes will be empty");
    }

    let report = pipeline.run(request).await?;

    for failure in &report.sink_failures {
        eprintln!("warning: {} export failed: {}", failure.sink, failure.error);
    }
    println!("{}", summary_line(&report, settings));
    Ok(())
}

/// The closing line of a run.
pub(crate) fn summary_line(report: &PipelineReport, settings: &Settings) -> String {
    if report.sink_failures.is_empty() {
        return format!(
            "Done. {} leads exported to {} and Google Sheets.",
            report.exported(),
            settings.output_path.display()
        );
    }
    let written = if report.destinations.is_empty() {
        "no destination".to_string()
    } else {
        report.destinations.join(" and ")
    };
    let failed: Vec<&str> = report
        .sink_failures
        .iter()
        .map(|f| f.sink.as_str())
        .collect();
    format!(
        "Done. {} leads exported to {written}; failed: {}.",
        report.exported(),
        failed.join(", ")
    )
}
