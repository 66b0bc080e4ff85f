// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod memory;

pub use memory::MemoryGateway;

use anyhow::{Context, Result, anyhow, bail};
use partsheet_app::{COLUMNS, Gateway, InventoryTable, PartRecord};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://sheets.googleapis.com";

const DOCUMENT_HOST: &str = "docs.google.com";
const COLUMN_SPAN: &str = "A:F";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsOptions {
    /// Spreadsheet document URL or bare spreadsheet id.
    pub location: String,
    pub worksheet: Option<String>,
    pub api_base_url: String,
    pub access_token: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

/// Blocking client for the spreadsheet values API. Holds no table state:
/// each `read` goes to the network.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    api_base_url: String,
    spreadsheet_id: String,
    range: String,
    access_token: Option<String>,
    api_key: Option<String>,
    http: HttpClient,
}

impl SheetsClient {
    pub fn new(options: SheetsOptions) -> Result<Self> {
        let api_base_url = options.api_base_url.trim_end_matches('/').to_owned();
        if api_base_url.is_empty() {
            bail!("sheet.api_base_url must not be empty");
        }
        if options.timeout.is_zero() {
            bail!("sheet.timeout must be positive");
        }
        let spreadsheet_id = spreadsheet_id_from_location(&options.location)?;

        let http = HttpClient::builder()
            .timeout(options.timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            api_base_url,
            spreadsheet_id,
            range: sheet_range(options.worksheet.as_deref()),
            access_token: non_blank(options.access_token),
            api_key: non_blank(options.api_key),
            http,
        })
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Fetches the sheet once and discards the rows.
    pub fn ping(&self) -> Result<()> {
        self.read().map(|_| ())
    }

    fn values_url(&self, suffix: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&self.api_base_url)
            .with_context(|| format!("parse sheet.api_base_url {:?}", self.api_base_url))?;
        let target = format!("{}{suffix}", self.range);
        url.path_segments_mut()
            .map_err(|()| anyhow!("sheet.api_base_url {:?} cannot take a path", self.api_base_url))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                target.as_str(),
            ]);
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            if let Some(api_key) = &self.api_key {
                pairs.append_pair("key", api_key);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn clear(&self) -> Result<()> {
        let url = self.values_url(":clear", &[])?;
        let response = self
            .authorize(self.http.post(url))
            .json(&serde_json::json!({}))
            .send()
            .map_err(|error| connection_error(&self.api_base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }
        Ok(())
    }
}

impl Gateway for SheetsClient {
    fn read(&self) -> Result<InventoryTable> {
        let url = self.values_url(
            "",
            &[
                ("majorDimension", "ROWS"),
                ("valueRenderOption", "UNFORMATTED_VALUE"),
            ],
        )?;
        debug!(%url, "reading sheet");
        let response = self
            .authorize(self.http.get(url))
            .send()
            .map_err(|error| connection_error(&self.api_base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let parsed: ValueRange = response.json().context("decode sheet values")?;
        let table = table_from_values(&parsed.values);
        info!(
            spreadsheet = %self.spreadsheet_id,
            rows = table.len(),
            "read sheet"
        );
        Ok(table)
    }

    fn write(&self, table: &InventoryTable) -> Result<()> {
        self.clear()?;

        let url = self.values_url("", &[("valueInputOption", "RAW")])?;
        let body = ValueRangeBody {
            range: &self.range,
            major_dimension: "ROWS",
            values: values_from_table(table),
        };
        let response = self
            .authorize(self.http.put(url))
            .json(&body)
            .send()
            .map_err(|error| connection_error(&self.api_base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        info!(
            spreadsheet = %self.spreadsheet_id,
            rows = table.len(),
            "replaced sheet contents"
        );
        Ok(())
    }
}

/// Accepts either a bare spreadsheet id or a document URL such as
/// `https://docs.google.com/spreadsheets/d/<id>/edit?usp=sharing`.
pub fn spreadsheet_id_from_location(location: &str) -> Result<String> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        bail!("sheet.url must not be empty -- paste the spreadsheet link or id");
    }

    let Ok(url) = Url::parse(trimmed) else {
        if is_spreadsheet_id(trimmed) {
            return Ok(trimmed.to_owned());
        }
        bail!("sheet.url {trimmed:?} is neither a spreadsheet link nor a spreadsheet id");
    };

    if url.host_str() != Some(DOCUMENT_HOST) {
        bail!(
            "sheet.url {trimmed:?} is not a {DOCUMENT_HOST} link -- copy the link from the spreadsheet's share dialog"
        );
    }

    let segments = url
        .path_segments()
        .map(|segments| segments.collect::<Vec<_>>());
    let id = segments.as_deref().and_then(|segments| {
        segments
            .windows(2)
            .find(|pair| pair[0] == "d")
            .map(|pair| pair[1])
    });
    match id {
        Some(id) if is_spreadsheet_id(id) => Ok(id.to_owned()),
        _ => bail!("sheet.url {trimmed:?} has no /d/<spreadsheet-id> segment"),
    }
}

fn is_spreadsheet_id(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

fn sheet_range(worksheet: Option<&str>) -> String {
    match worksheet.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!("'{}'!{COLUMN_SPAN}", name.replace('\'', "''")),
        None => COLUMN_SPAN.to_owned(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// First row is the header; the rest map positionally onto records.
pub fn table_from_values(values: &[Vec<Value>]) -> InventoryTable {
    values
        .iter()
        .skip(1)
        .filter_map(|row| {
            let cells = row.iter().map(cell_text).collect::<Vec<_>>();
            PartRecord::from_cells(&cells)
        })
        .collect()
}

pub fn values_from_table(table: &InventoryTable) -> Vec<Vec<Value>> {
    let mut values = Vec::with_capacity(table.len() + 1);
    values.push(
        COLUMNS
            .iter()
            .map(|column| Value::from(*column))
            .collect::<Vec<_>>(),
    );
    for row in table.rows() {
        values.push(vec![
            Value::from(row.code.as_str()),
            Value::from(row.name.as_str()),
            Value::from(row.car_model.as_deref().unwrap_or("")),
            Value::from(row.brand.as_deref().unwrap_or("")),
            serde_json::Number::from_f64(row.price).map_or(Value::from(0), Value::Number),
            Value::from(row.quantity),
        ]);
    }
    values
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    }
}

fn connection_error(api_base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- check network access and [sheet].api_base_url ({})",
        api_base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.message.is_empty()
    {
        return anyhow!("spreadsheet API error ({}): {}", status.as_u16(), error.message);
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("spreadsheet API error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("spreadsheet API returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody<'a> {
    range: &'a str,
    major_dimension: &'a str,
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}
