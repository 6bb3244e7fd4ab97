//! Remote spreadsheet source reached through a batch values endpoint.
//!
//! One request names every required sheet:
//! `<endpoint>/<documentId>/values:batchGet?ranges=Story&ranges=Steps&key=<key>`.
//! The response carries `valueRanges` in request order, or an `error` object.
//!
//! Missing sheets are detected by matching the upstream error message
//! ("Unable to parse range" plus the sheet name). This is best effort: wording
//! changes upstream would turn a missing sheet into a generic remote error, and
//! the absence of a match does not prove the sheet exists.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::error::{ErrorKind, ScrollyError, ScrollyResult};
use crate::fetch::{Fetch, redact_key};
use crate::formats::{REQUIRED_SHEETS, RawTables, Table};
use crate::source::{Lookup, TableSource};

pub const DEFAULT_ENDPOINT: &str = "https://sheets.googleapis.com/v4/spreadsheets";

const MISSING_RANGE_SIGNATURE: &str = "Unable to parse range";

/// Identifier segment following `/d/` in a spreadsheet URL.
pub fn extract_document_id(reference: &str) -> Option<&str> {
    let (_, rest) = reference.split_once("/d/")?;
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());
    let id = &rest[..end];
    (!id.is_empty()).then_some(id)
}

pub fn batch_get_url(endpoint: &str, document_id: &str, api_key: &str) -> ScrollyResult<Url> {
    let endpoint = endpoint.trim_end_matches('/');
    let mut url = Url::parse(&format!("{endpoint}/{document_id}/values:batchGet")).map_err(
        |err| {
            ScrollyError::new(
                "building batch request",
                ErrorKind::InvalidReference(format!("{endpoint}: {err}")),
            )
        },
    )?;
    {
        let mut query = url.query_pairs_mut();
        for sheet in REQUIRED_SHEETS {
            query.append_pair("ranges", sheet);
        }
        query.append_pair("key", api_key);
    }
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct BatchGetResponse {
    #[serde(default, rename = "valueRanges")]
    value_ranges: Vec<ValueRange>,
    #[serde(default)]
    error: Option<RemoteError>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteError {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
}

/// Sheet named by a "missing range" error message, checked for every
/// required sheet in order.
pub fn missing_sheet_in(error: &RemoteError) -> Option<&'static str> {
    if !error.message.contains(MISSING_RANGE_SIGNATURE) {
        return None;
    }
    REQUIRED_SHEETS
        .into_iter()
        .find(|sheet| error.message.contains(sheet))
}

/// Classifies a response error payload.
///
/// The missing-sheet check runs first and applies whenever an error payload is
/// present; otherwise a failed status yields `NotFound` for 404 and a remote
/// error for anything else.
pub fn classify_error(
    failed: bool,
    error: Option<&RemoteError>,
    context: &str,
) -> ScrollyResult<Option<Lookup>> {
    if let Some(error) = error
        && let Some(sheet) = missing_sheet_in(error)
    {
        return Err(ScrollyError::new(
            context,
            ErrorKind::MissingSheet(sheet.to_owned()),
        ));
    }

    if !failed {
        return Ok(None);
    }

    match error {
        Some(RemoteError {
            code: Some(404), ..
        }) => Ok(Some(Lookup::NotFound)),
        Some(error) if !error.message.is_empty() => Err(ScrollyError::new(
            context,
            ErrorKind::Remote(error.message.clone()),
        )),
        _ => Err(ScrollyError::new(
            context,
            ErrorKind::Remote("request failed without an error message".to_owned()),
        )),
    }
}

pub struct SheetsSource {
    reference: String,
    endpoint: String,
    api_key: String,
    fetch: Box<dyn Fetch>,
}

impl SheetsSource {
    pub fn new(
        reference: impl Into<String>,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        fetch: Box<dyn Fetch>,
    ) -> Self {
        Self {
            reference: reference.into(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            fetch,
        }
    }

    fn request_url(&self) -> ScrollyResult<Url> {
        let document_id = extract_document_id(&self.reference).ok_or_else(|| {
            ScrollyError::new(
                "building batch request",
                ErrorKind::InvalidReference(self.reference.clone()),
            )
        })?;
        batch_get_url(&self.endpoint, document_id, &self.api_key)
    }
}

#[async_trait]
impl TableSource for SheetsSource {
    fn describe(&self) -> String {
        self.reference.clone()
    }

    async fn lookup(&self) -> ScrollyResult<Lookup> {
        let url = self.request_url()?;
        let context = "batch request";
        tracing::debug!(url = %redact_key(&url), "requesting sheet values");

        let response = self.fetch.get(&url).await.map_err(|err| {
            ScrollyError::new(context, ErrorKind::Remote(format!("{err:#}")))
        })?;

        let parsed: BatchGetResponse = match serde_json::from_str(&response.body) {
            Ok(parsed) => parsed,
            Err(_) if response.status == 404 => return Ok(Lookup::NotFound),
            Err(err) if !response.is_success() => {
                return Err(ScrollyError::new(
                    context,
                    ErrorKind::Remote(format!("status {}: {err}", response.status)),
                ));
            }
            Err(err) => return Ok(Lookup::Malformed(format!("parse batch response: {err}"))),
        };

        if response.status == 404 && parsed.error.is_none() {
            return Ok(Lookup::NotFound);
        }
        if let Some(lookup) = classify_error(
            !response.is_success(),
            parsed.error.as_ref(),
            context,
        )? {
            return Ok(lookup);
        }

        Ok(tables_from_ranges(parsed.value_ranges))
    }
}

fn tables_from_ranges(ranges: Vec<ValueRange>) -> Lookup {
    if ranges.len() < REQUIRED_SHEETS.len() {
        return Lookup::Malformed(format!(
            "expected {} value ranges, got {}",
            REQUIRED_SHEETS.len(),
            ranges.len()
        ));
    }

    let mut tables = ranges.into_iter().map(|range| table_from_values(range.values));
    let story = tables.next().unwrap_or_default();
    let steps = tables.next().unwrap_or_default();
    Lookup::Found(RawTables { story, steps })
}

fn table_from_values(values: Vec<Vec<serde_json::Value>>) -> Table {
    values
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect()
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
