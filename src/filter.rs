use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use crate::dataset::ReviewRecord;
use crate::error::ReviewError;

/// Marker returned in place of an empty summary list.
pub const NO_MATCHES: &str = "No reviews found for the given filters.";

/// Optional filter dimensions for one `filter()` call. `None` means the
/// predicate is skipped, never "match empty".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub city:             Option<String>,
    /// `YYYY-MM-DD`, `YYYY-MM` or `YYYY`; inclusive
    pub start_date:       Option<String>,
    /// `YYYY-MM-DD`, `YYYY-MM` or `YYYY`; inclusive
    pub end_date:         Option<String>,
    /// Case-insensitive regular expression over the store address
    pub address_fragment: Option<String>,
    pub state:            Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self { Self::default() }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into()); self
    }

    pub fn start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into()); self
    }

    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into()); self
    }

    pub fn address_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.address_fragment = Some(fragment.into()); self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into()); self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.city.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.address_fragment.is_none()
            && self.state.is_none()
    }
}

/// Result of a filter call. An empty result is its own variant so callers
/// never have to string-match the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    Matches(Vec<String>),
    NoMatches,
}

impl FilterOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, FilterOutcome::NoMatches)
    }

    pub fn matches(&self) -> &[String] {
        match self {
            FilterOutcome::Matches(summaries) => summaries,
            FilterOutcome::NoMatches          => &[],
        }
    }

    /// Flattens to a list of summaries; `NoMatches` becomes `[NO_MATCHES]`.
    pub fn into_summaries(self) -> Vec<String> {
        match self {
            FilterOutcome::Matches(summaries) => summaries,
            FilterOutcome::NoMatches          => vec![NO_MATCHES.to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum BoundSide {
    Start,
    End,
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Parses a date bound. Partial dates expand to the first (start) or last
/// (end) day of the year or month they name.
fn parse_bound(field: &str, raw: &str, side: BoundSide) -> Result<NaiveDate, ReviewError> {
    let raw = raw.trim();
    let invalid = || ReviewError::Validation(format!(
        "{} '{}' is not a YYYY-MM-DD, YYYY-MM or YYYY date", field, raw
    ));

    let parts: Vec<&str> = raw.split('-').collect();
    let date = match parts.as_slice() {
        [_, _, _] => NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok(),
        [year, month] if year.len() == 4 && (1..=2).contains(&month.len()) => {
            let year: i32 = year.parse().map_err(|_| invalid())?;
            let month: u32 = month.parse().map_err(|_| invalid())?;
            match side {
                BoundSide::Start => NaiveDate::from_ymd_opt(year, month, 1),
                BoundSide::End   => last_day_of_month(year, month),
            }
        }
        [year] if year.len() == 4 => {
            let year: i32 = year.parse().map_err(|_| invalid())?;
            match side {
                BoundSide::Start => NaiveDate::from_ymd_opt(year, 1, 1),
                BoundSide::End   => NaiveDate::from_ymd_opt(year, 12, 31),
            }
        }
        _ => None,
    };

    date.ok_or_else(invalid)
}

fn contains_ci(haystack: Option<&str>, needle_lower: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle_lower))
}

/// Criteria validated and compiled once, ready to test rows.
#[derive(Debug)]
struct CompiledCriteria {
    start:   Option<NaiveDate>,
    end:     Option<NaiveDate>,
    city:    Option<String>,
    state:   Option<String>,
    address: Option<Regex>,
}

impl CompiledCriteria {
    fn compile(criteria: &FilterCriteria) -> Result<Self, ReviewError> {
        let start = criteria.start_date.as_deref()
            .map(|d| parse_bound("start_date", d, BoundSide::Start))
            .transpose()?;
        let end = criteria.end_date.as_deref()
            .map(|d| parse_bound("end_date", d, BoundSide::End))
            .transpose()?;
        let address = criteria.address_fragment.as_deref()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ReviewError::Pattern { pattern: pattern.to_string(), source })
            })
            .transpose()?;

        Ok(Self {
            start,
            end,
            city:  criteria.city.as_deref().map(str::to_lowercase),
            state: criteria.state.as_deref().map(str::to_lowercase),
            address,
        })
    }

    fn accepts(&self, row: &ReviewRecord) -> bool {
        if let Some(start) = self.start {
            if row.creation_date < start { return false; }
        }
        if let Some(end) = self.end {
            if row.creation_date > end { return false; }
        }
        if let Some(city) = &self.city {
            if !contains_ci(row.city.as_deref(), city) { return false; }
        }
        if let Some(state) = &self.state {
            if !contains_ci(row.state.as_deref(), state) { return false; }
        }
        if let Some(address) = &self.address {
            // Rows without an address never match an address pattern
            if !row.place_location.as_deref().is_some_and(|p| address.is_match(p)) { return false; }
        }
        true
    }
}

/// Returns the summaries of every row matching all given criteria, in
/// dataset order.
///
/// # Errors
/// * `ReviewError::Validation` — a date bound is malformed
/// * `ReviewError::Pattern`    — `address_fragment` is not a valid regex
pub fn filter(dataset: &[ReviewRecord], criteria: &FilterCriteria) -> Result<FilterOutcome, ReviewError> {
    let compiled = CompiledCriteria::compile(criteria)?;

    let summaries: Vec<String> = dataset.iter()
        .filter(|row| compiled.accepts(row))
        .map(|row| row.summary.clone())
        .collect();

    tracing::debug!(?criteria, rows = dataset.len(), matched = summaries.len(), "reviews filtered");

    if summaries.is_empty() {
        Ok(FilterOutcome::NoMatches)
    } else {
        Ok(FilterOutcome::Matches(summaries))
    }
}

