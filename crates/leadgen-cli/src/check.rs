//! `leadgen check`: credential smoke tests for the external services.

use anyhow::Context;
use clap::Subcommand;
use leadgen_core::Settings;
use leadgen_export::{SheetsAuth, SheetsClient};
use leadgen_pipeline::OpenAiClient;

const MODELS_SHOWN: usize = 5;
const CHECK_CELL: &str = "A1";
const CHECK_VALUE: &str = "leadgen connectivity check";

/// Services `check` can verify.
#[derive(Debug, Subcommand)]
pub enum CheckTarget {
    /// List models with `OPENAI_API_KEY`
    Openai,
    /// Write a marker value to the first worksheet of the configured spreadsheet
    Sheets,
}

pub(crate) async fn run_check(settings: &Settings, target: CheckTarget) -> anyhow::Result<()> {
    match target {
        CheckTarget::Openai => check_openai(settings).await,
        CheckTarget::Sheets => check_sheets(settings).await,
    }
}

async fn check_openai(settings: &Settings) -> anyhow::Result<()> {
    let api_key = settings
        .openai_api_key
        .as_deref()
        .context("OPENAI_API_KEY is not set")?;
    let client = OpenAiClient::new(api_key, settings.http_timeout_secs, &settings.user_agent)?;
    let models = client
        .list_models()
        .await
        .context("OpenAI rejected the model listing request")?;

    let shown: Vec<&str> = models
        .iter()
        .take(MODELS_SHOWN)
        .map(String::as_str)
        .collect();
    println!(
        "OpenAI key OK. {} models visible; first: {}",
        models.len(),
        shown.join(", ")
    );
    Ok(())
}

async fn check_sheets(settings: &Settings) -> anyhow::Result<()> {
    let client = SheetsClient::new(
        SheetsAuth::ServiceAccountFile(settings.sheets_service_account_json.clone()),
        &settings.sheets_spreadsheet_id,
        settings.http_timeout_secs,
        &settings.user_agent,
    )?;
    let titles = client
        .sheet_titles()
        .await
        .context("failed to open the spreadsheet")?;
    let first = titles.first().context("spreadsheet has no worksheets")?;
    client
        .write_cell(first, CHECK_CELL, CHECK_VALUE)
        .await
        .with_context(|| format!("failed to write marker to '{first}'!{CHECK_CELL}"))?;

    println!(
        "Sheets access OK. Wrote marker to '{first}'!{CHECK_CELL} in spreadsheet {}",
        settings.sheets_spreadsheet_id
    );
    Ok(())
}
