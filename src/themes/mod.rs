//! Theme bucketing: classify raw reviews into themes and sub-themes, fold
//! the results into a [`ThemeMap`] and persist it as JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

mod preprocess;
mod classifier;
mod gemini;
mod aggregate;
mod snapshot;

pub use preprocess::preprocess;
pub use classifier::{
    build_prompt, parse_classification, ClassificationResult, Classifier,
    LlmClassifier, MockClassifier,
};
pub use gemini::GeminiClassifier;
pub use aggregate::{aggregate, aggregate_concurrent, merge, AggregationReport, FailedReview};
pub use snapshot::{load_snapshot, render_hierarchy, save_snapshot, to_json};

use crate::error::ReviewError;

/// Reviews collected under one theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeBucket {
    /// Every review classified into this theme, in input order
    pub reviews:   Vec<String>,
    /// Sub-theme → reviews assigned to it, in input order
    pub subthemes: BTreeMap<String, Vec<String>>,
}

/// Theme → bucket. Keys appear the first time a theme is observed.
pub type ThemeMap = BTreeMap<String, ThemeBucket>;

/// Outcome of [`run_theming`].
#[derive(Debug)]
pub struct ThemingRun {
    pub report:        AggregationReport,
    /// Whether the snapshot file was written
    pub written:       bool,
    /// Set when writing the snapshot failed; `report` is still complete
    pub persist_error: Option<ReviewError>,
}

/// Aggregates the first `limit` reviews and writes the snapshot to `output`.
///
/// An empty input never reaches the classifier and writes nothing. A failed
/// write is logged and returned in `persist_error`, never as an `Err`.
pub async fn run_theming(
    reviews:     &[String],
    limit:       usize,
    classifier:  &dyn Classifier,
    output:      &Path,
    concurrency: usize,
) -> ThemingRun {
    let batch = &reviews[..limit.min(reviews.len())];
    if batch.is_empty() {
        tracing::warn!("no reviews to theme");
        return ThemingRun { report: AggregationReport::default(), written: false, persist_error: None };
    }

    let report = if concurrency > 1 {
        aggregate_concurrent(batch, classifier, concurrency).await
    } else {
        aggregate(batch, classifier).await
    };

    match save_snapshot(&report.themes, output) {
        Ok(()) => {
            tracing::info!(path = %output.display(), themes = report.themes.len(), "theme snapshot saved");
            ThemingRun { report, written: true, persist_error: None }
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not save theme snapshot");
            ThemingRun { report, written: false, persist_error: Some(e) }
        }
    }
}
