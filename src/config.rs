use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use crate::error::ReviewError;

/// Which backend classifies reviews for the theming run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierProvider {
    Gemini,
    OpenAi,
}

impl FromStr for ClassifierProvider {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini"             => Ok(Self::Gemini),
            "openai" | "open_ai" => Ok(Self::OpenAi),
            other => Err(ReviewError::Config(format!("unknown classifier provider '{}'", other))),
        }
    }
}

/// Process-wide settings for both binaries.
///
/// | variable              | default                   |
/// |-----------------------|---------------------------|
/// | `REVIEWS_CSV`         | `summarized_reviews.csv`  |
/// | `THEME_CSV`           | `summarized_review.csv`   |
/// | `THEME_REVIEW_LIMIT`  | `10`                      |
/// | `THEME_OUTPUT`        | `theme_buckets.json`      |
/// | `THEME_CONCURRENCY`   | `1`                       |
/// | `CHAT_MODEL`          | `gpt-4o-mini`             |
/// | `CLASSIFIER_PROVIDER` | `gemini`                  |
/// | `CLASSIFIER_MODEL`    | `gemini-pro`              |
/// | `LLM_MAX_RETRIES`     | `2`                       |
/// | `AGENT_MAX_STEPS`     | `8`                       |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    pub reviews_csv:         PathBuf,
    pub theme_csv:           PathBuf,
    pub theme_review_limit:  usize,
    pub theme_output:        PathBuf,
    pub theme_concurrency:   usize,
    pub chat_model:          String,
    pub classifier_provider: ClassifierProvider,
    pub classifier_model:    String,
    pub llm_max_retries:     u32,
    pub agent_max_steps:     usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            reviews_csv:         PathBuf::from("summarized_reviews.csv"),
            theme_csv:           PathBuf::from("summarized_review.csv"),
            theme_review_limit:  10,
            theme_output:        PathBuf::from("theme_buckets.json"),
            theme_concurrency:   1,
            chat_model:          "gpt-4o-mini".to_string(),
            classifier_provider: ClassifierProvider::Gemini,
            classifier_model:    "gemini-pro".to_string(),
            llm_max_retries:     2,
            agent_max_steps:     8,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> Result<T, ReviewError> {
    raw.trim().parse()
        .map_err(|_| ReviewError::Config(format!("{}='{}' is not a valid value", key, raw)))
}

/// A missing `.env` is normal; anything else (bad syntax, unreadable file)
/// is worth a warning.
fn dotenv_problem<T>(result: &Result<T, dotenvy::Error>) -> Option<&dotenvy::Error> {
    match result {
        Err(e) if !e.not_found() => Some(e),
        _ => None,
    }
}

impl ReviewConfig {
    /// Loads `.env` (if present) and overlays the process environment on
    /// the defaults.
    pub fn from_env() -> Result<Self, ReviewError> {
        if let Some(e) = dotenv_problem(&dotenvy::dotenv()) {
            tracing::warn!(error = %e, "ignoring unreadable .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` uses the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ReviewError> {
        let mut config = Self::default();

        if let Some(v) = lookup("REVIEWS_CSV")  { config.reviews_csv  = PathBuf::from(v); }
        if let Some(v) = lookup("THEME_CSV")    { config.theme_csv    = PathBuf::from(v); }
        if let Some(v) = lookup("THEME_OUTPUT") { config.theme_output = PathBuf::from(v); }
        if let Some(v) = lookup("CHAT_MODEL")   { config.chat_model   = v; }
        if let Some(v) = lookup("CLASSIFIER_MODEL") { config.classifier_model = v; }
        if let Some(v) = lookup("CLASSIFIER_PROVIDER") {
            config.classifier_provider = v.parse()?;
        }
        if let Some(v) = lookup("THEME_REVIEW_LIMIT") {
            config.theme_review_limit = parse_var("THEME_REVIEW_LIMIT", &v)?;
        }
        if let Some(v) = lookup("THEME_CONCURRENCY") {
            config.theme_concurrency = parse_var("THEME_CONCURRENCY", &v)?;
        }
        if let Some(v) = lookup("LLM_MAX_RETRIES") {
            config.llm_max_retries = parse_var("LLM_MAX_RETRIES", &v)?;
        }
        if let Some(v) = lookup("AGENT_MAX_STEPS") {
            config.agent_max_steps = parse_var("AGENT_MAX_STEPS", &v)?;
        }

        if config.theme_concurrency == 0 {
            return Err(ReviewError::Config("THEME_CONCURRENCY must be at least 1".to_string()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_env_file_is_not_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = dotenvy::from_path(dir.path().join(".env"));
        assert!(dotenv_problem(&result).is_none());
    }

    #[test]
    fn test_malformed_env_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "THEME_REVIEW_LIMIT 10").unwrap();
        let result = dotenvy::from_path(file.path());
        assert!(dotenv_problem(&result).is_some());
    }
}
