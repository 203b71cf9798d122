use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use crate::error::ReviewError;

/// One row of the summarized review table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    pub creation_date:  NaiveDate,
    pub city:           Option<String>,
    pub state:          Option<String>,
    pub place_location: Option<String>,
    pub summary:        String,
    /// Raw review body. Empty when the export has no `Text` column.
    pub text:           String,
}

/// Column layout of the review export.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "date_Date Created")]
    date_created:   String,
    #[serde(rename = "string_City", default)]
    city:           Option<String>,
    #[serde(rename = "string_State", default)]
    state:          Option<String>,
    #[serde(rename = "string_Place Location", default)]
    place_location: Option<String>,
    #[serde(default)]
    summary:        Option<String>,
    #[serde(rename = "Text", default)]
    text:           Option<String>,
}

/// Parses the leading `YYYY-MM-DD` of a dataset date. Timestamps such as
/// `2024-03-05T10:00:00` or `2024-03-05 10:00` are accepted.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// The in-memory review table. Loaded once at startup and shared read-only
/// (wrap it in an `Arc` to hand it to the agent tool).
#[derive(Debug, Default, Clone)]
pub struct ReviewStore {
    records: Vec<ReviewRecord>,
}

impl ReviewStore {
    pub fn new(records: Vec<ReviewRecord>) -> Self {
        Self { records }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReviewError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| ReviewError::Dataset(format!("{}: {}", path.display(), e)))?;
        let store = Self::from_reader(file)?;
        tracing::info!(path = %path.display(), rows = store.len(), "review dataset loaded");
        Ok(store)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReviewError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for (idx, row) in csv_reader.deserialize::<RawRow>().enumerate() {
            // Header is line 1
            let line = idx + 2;
            let row = row.map_err(|e| ReviewError::Dataset(format!("row {}: {}", line, e)))?;
            let creation_date = parse_record_date(&row.date_created).ok_or_else(|| {
                ReviewError::Dataset(format!(
                    "row {}: unparseable creation date '{}'", line, row.date_created
                ))
            })?;

            records.push(ReviewRecord {
                creation_date,
                city:           non_blank(row.city),
                state:          non_blank(row.state),
                place_location: non_blank(row.place_location),
                summary:        row.summary.unwrap_or_default(),
                text:           row.text.unwrap_or_default(),
            });
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads the first `limit` values of the `Text` column from a review export.
pub fn read_review_texts(path: impl AsRef<Path>, limit: usize) -> Result<Vec<String>, ReviewError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| ReviewError::Dataset(format!("{}: {}", path.display(), e)))?;
    review_texts_from_reader(file, limit)
}

pub fn review_texts_from_reader<R: Read>(reader: R, limit: usize) -> Result<Vec<String>, ReviewError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()
        .map_err(|e| ReviewError::Dataset(e.to_string()))?;
    let column = headers.iter().position(|h| h == "Text")
        .ok_or_else(|| ReviewError::Dataset("missing 'Text' column".to_string()))?;

    let mut texts = Vec::new();
    for record in csv_reader.records().take(limit) {
        let record = record.map_err(|e| ReviewError::Dataset(e.to_string()))?;
        texts.push(record.get(column).unwrap_or_default().to_string());
    }
    Ok(texts)
}
