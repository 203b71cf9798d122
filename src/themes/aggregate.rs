use futures::stream::{self, StreamExt};
use crate::error::ReviewError;
use super::classifier::{ClassificationResult, Classifier};
use super::preprocess::preprocess;
use super::{ThemeBucket, ThemeMap};

/// A review whose classification failed.
#[derive(Debug)]
pub struct FailedReview {
    /// Position in the input sequence
    pub index:  usize,
    pub review: String,
    pub error:  ReviewError,
}

/// ThemeMap plus what happened to every input review.
#[derive(Debug, Default)]
pub struct AggregationReport {
    pub themes:    ThemeMap,
    /// Reviews whose classification was merged
    pub succeeded: Vec<String>,
    /// Reviews that were empty after normalization
    pub skipped:   Vec<String>,
    pub failed:    Vec<FailedReview>,
}

impl AggregationReport {
    pub fn processed(&self) -> usize {
        self.succeeded.len() + self.skipped.len() + self.failed.len()
    }
}

/// Folds one classification into the map, storing the original `review`.
pub fn merge(map: &mut ThemeMap, review: &str, result: &ClassificationResult) {
    for (theme, subthemes) in &result.themes {
        let bucket = map.entry(theme.clone()).or_insert_with(ThemeBucket::default);
        bucket.reviews.push(review.to_string());
        for subtheme in subthemes {
            bucket.subthemes
                .entry(subtheme.clone())
                .or_default()
                .push(review.to_string());
        }
    }
}

enum Outcome {
    Skipped,
    Classified(Result<ClassificationResult, ReviewError>),
}

async fn classify_one(review: &str, classifier: &dyn Classifier) -> Outcome {
    let normalized = preprocess(review);
    if normalized.is_empty() {
        return Outcome::Skipped;
    }
    Outcome::Classified(classifier.classify(&normalized).await)
}

fn record(report: &mut AggregationReport, index: usize, review: &str, outcome: Outcome) {
    match outcome {
        Outcome::Skipped => {
            tracing::debug!(index, "review empty after normalization, skipped");
            report.skipped.push(review.to_string());
        }
        Outcome::Classified(Ok(result)) => {
            merge(&mut report.themes, review, &result);
            report.succeeded.push(review.to_string());
        }
        Outcome::Classified(Err(error)) => {
            tracing::warn!(index, error = %error, "review classification failed, continuing");
            report.failed.push(FailedReview { index, review: review.to_string(), error });
        }
    }
}

/// Classifies reviews one after another and folds the results in input
/// order. A failing review is recorded and never aborts the run.
pub async fn aggregate<S: AsRef<str>>(reviews: &[S], classifier: &dyn Classifier) -> AggregationReport {
    let mut report = AggregationReport::default();
    let total = reviews.len();

    for (index, review) in reviews.iter().enumerate() {
        let review = review.as_ref();
        tracing::info!("Processing review {}/{}", index + 1, total);
        let outcome = classify_one(review, classifier).await;
        record(&mut report, index, review, outcome);
    }

    report
}

/// Like [`aggregate`], with up to `concurrency` classifications in flight.
/// Results are merged in input order, so the map equals the sequential one.
pub async fn aggregate_concurrent<S: AsRef<str>>(
    reviews:     &[S],
    classifier:  &dyn Classifier,
    concurrency: usize,
) -> AggregationReport {
    let total = reviews.len();
    let outcomes: Vec<(usize, &str, Outcome)> = stream::iter(reviews.iter().enumerate())
        .map(|(index, review)| async move {
            let review = review.as_ref();
            tracing::info!("Processing review {}/{}", index + 1, total);
            (index, review, classify_one(review, classifier).await)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut report = AggregationReport::default();
    for (index, review, outcome) in outcomes {
        record(&mut report, index, review, outcome);
    }
    report
}
