//! Google Sheets sink over the Sheets v4 REST API.
//!
//! The target worksheet is cleared when it exists and created otherwise, then
//! the header and every row are appended in one request.

mod auth;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use leadgen_core::{Record, COLUMNS};
use reqwest::{Client, Response, Url};
use serde_json::{json, Value};
use tokio::sync::OnceCell;

use crate::error::ExportError;
use crate::sink::LeadSink;

pub use auth::{fetch_access_token, ServiceAccountKey, SHEETS_SCOPES};

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Rows allocated when the worksheet has to be created.
const NEW_SHEET_ROWS: usize = 1000;

/// How the client authenticates its requests.
pub enum SheetsAuth {
    /// Exchange a signed service-account assertion for a token on first use.
    ServiceAccount(ServiceAccountKey),
    /// Like `ServiceAccount`, reading the key file on first use.
    ServiceAccountFile(PathBuf),
    /// Use a ready-made bearer token.
    BearerToken(String),
}

/// Thin client for the handful of Sheets endpoints the sink needs.
pub struct SheetsClient {
    http: Client,
    auth: SheetsAuth,
    token: OnceCell<String>,
    base_url: String,
    spreadsheet_id: String,
}

impl SheetsClient {
    /// Creates a client for one spreadsheet.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        auth: SheetsAuth,
        spreadsheet_id: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ExportError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            http,
            auth,
            token: OnceCell::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
        })
    }

    /// Points the client at a different API root (for testing with wiremock).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn access_token(&self) -> Result<&str, ExportError> {
        let token = self
            .token
            .get_or_try_init(|| async {
                match &self.auth {
                    SheetsAuth::BearerToken(token) => Ok(token.clone()),
                    SheetsAuth::ServiceAccount(key) => {
                        fetch_access_token(&self.http, key, SHEETS_SCOPES).await
                    }
                    SheetsAuth::ServiceAccountFile(path) => {
                        let key = ServiceAccountKey::from_file(path).await?;
                        fetch_access_token(&self.http, &key, SHEETS_SCOPES).await
                    }
                }
            })
            .await?;
        Ok(token.as_str())
    }

    /// `{base}/{spreadsheet_id}` followed by `segments`, each percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, ExportError> {
        let invalid = |reason: String| ExportError::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Titles of every worksheet in the spreadsheet, in tab order.
    ///
    /// # Errors
    ///
    /// Returns an error on authentication, network, or API failure.
    pub async fn sheet_titles(&self) -> Result<Vec<String>, ExportError> {
        let mut url = self.url(&[&self.spreadsheet_id])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");
        let response = self
            .http
            .get(url)
            .bearer_auth(self.access_token().await?)
            .send()
            .await?;
        let body = checked_json(response, "get spreadsheet").await?;

        Ok(body
            .get("sheets")
            .and_then(Value::as_array)
            .map(|sheets| {
                sheets
                    .iter()
                    .filter_map(|s| s.pointer("/properties/title").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Clear every value in the named worksheet, keeping the worksheet.
    ///
    /// # Errors
    ///
    /// Returns an error on authentication, network, or API failure.
    pub async fn clear_worksheet(&self, title: &str) -> Result<(), ExportError> {
        let url = self.url(&[
            &self.spreadsheet_id,
            "values",
            &format!("{}:clear", a1_sheet(title)),
        ])?;
        let response = self
            .http
            .post(url)
            .bearer_auth(self.access_token().await?)
            .json(&json!({}))
            .send()
            .await?;
        checked_json(response, "clear worksheet").await?;
        Ok(())
    }

    /// Add a worksheet with the given grid size.
    ///
    /// # Errors
    ///
    /// Returns an error on authentication, network, or API failure.
    pub async fn add_worksheet(
        &self,
        title: &str,
        rows: usize,
        columns: usize,
    ) -> Result<(), ExportError> {
        let url = self.url(&[&format!("{}:batchUpdate", self.spreadsheet_id)])?;
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": {"rowCount": rows, "columnCount": columns}
                    }
                }
            }]
        });
        let response = self
            .http
            .post(url)
            .bearer_auth(self.access_token().await?)
            .json(&body)
            .send()
            .await?;
        checked_json(response, "add worksheet").await?;
        Ok(())
    }

    /// Append rows after the last non-empty row, values stored as given.
    ///
    /// # Errors
    ///
    /// Returns an error on authentication, network, or API failure.
    pub async fn append_rows(&self, title: &str, rows: Vec<Vec<Value>>) -> Result<(), ExportError> {
        let mut url = self.url(&[
            &self.spreadsheet_id,
            "values",
            &format!("{}:append", a1_sheet(title)),
        ])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");
        let response = self
            .http
            .post(url)
            .bearer_auth(self.access_token().await?)
            .json(&json!({ "values": rows }))
            .send()
            .await?;
        checked_json(response, "append rows").await?;
        Ok(())
    }

    /// Overwrite one cell, e.g. `("Sheet1", "A1")`.
    ///
    /// # Errors
    ///
    /// Returns an error on authentication, network, or API failure.
    pub async fn write_cell(
        &self,
        title: &str,
        cell: &str,
        value: &str,
    ) -> Result<(), ExportError> {
        let range = format!("{}!{cell}", a1_sheet(title));
        let mut url = self.url(&[&self.spreadsheet_id, "values", &range])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let response = self
            .http
            .put(url)
            .bearer_auth(self.access_token().await?)
            .json(&json!({ "range": range, "values": [[value]] }))
            .send()
            .await?;
        checked_json(response, "write cell").await?;
        Ok(())
    }
}

/// Quote a worksheet title for A1 notation: `Leads` → `'Leads'`.
fn a1_sheet(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Require a 2xx status and decode the body (empty bodies decode as `null`).
async fn checked_json(response: Response, operation: &str) -> Result<Value, ExportError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ExportError::SheetsApi {
            status: status.as_u16(),
            operation: operation.to_string(),
            body,
        });
    }
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|e| ExportError::Deserialize {
        context: operation.to_string(),
        source: e,
    })
}

/// One worksheet row in [`COLUMNS`] order, numbers and booleans kept typed.
#[must_use]
pub fn sheet_row(record: &Record) -> Vec<Value> {
    let text = |v: &Option<String>| Value::from(v.clone().unwrap_or_default());
    vec![
        text(&record.name),
        Value::from(record.city.clone()),
        text(&record.industry),
        record.employees_est.map_or_else(|| Value::from(""), Value::from),
        Value::from(record.has_ld_signals),
        text(&record.website),
        text(&record.phone),
        text(&record.address),
        text(&record.google_place_id),
        record.score.map_or_else(|| Value::from(""), Value::from),
        Value::from(record.score_breakdown.clone()),
        text(&record.notes),
    ]
}

/// Writes the lead list to a named worksheet.
pub struct SheetsSink {
    client: SheetsClient,
    worksheet: String,
}

impl SheetsSink {
    #[must_use]
    pub fn new(client: SheetsClient, worksheet: &str) -> Self {
        Self {
            client,
            worksheet: worksheet.to_string(),
        }
    }
}

#[async_trait]
impl LeadSink for SheetsSink {
    fn name(&self) -> &'static str {
        "google_sheets"
    }

    async fn write(&self, records: &[Record]) -> Result<String, ExportError> {
        let titles = self.client.sheet_titles().await?;
        if titles.iter().any(|t| t == &self.worksheet) {
            self.client.clear_worksheet(&self.worksheet).await?;
        } else {
            tracing::info!(worksheet = %self.worksheet, "worksheet not found, creating it");
            self.client
                .add_worksheet(&self.worksheet, NEW_SHEET_ROWS, COLUMNS.len())
                .await?;
        }

        let mut rows: Vec<Vec<Value>> = Vec::with_capacity(records.len() + 1);
        rows.push(COLUMNS.iter().map(|c| Value::from(*c)).collect());
        rows.extend(records.iter().map(sheet_row));
        self.client.append_rows(&self.worksheet, rows).await?;

        tracing::info!(
            worksheet = %self.worksheet,
            rows = records.len(),
            "wrote Google Sheets export"
        );
        Ok(format!("Google Sheets worksheet \"{}\"", self.worksheet))
    }
}
