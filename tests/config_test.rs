use reviewsm::{ClassifierProvider, ReviewConfig, ReviewError};
use std::collections::HashMap;
use std::path::PathBuf;

fn load(vars: &[(&str, &str)]) -> Result<ReviewConfig, ReviewError> {
    let vars: HashMap<String, String> = vars.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ReviewConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults() {
    let config = load(&[]).unwrap();
    assert_eq!(config.reviews_csv, PathBuf::from("summarized_reviews.csv"));
    assert_eq!(config.theme_csv, PathBuf::from("summarized_review.csv"));
    assert_eq!(config.theme_output, PathBuf::from("theme_buckets.json"));
    assert_eq!(config.theme_review_limit, 10);
    assert_eq!(config.theme_concurrency, 1);
    assert_eq!(config.classifier_provider, ClassifierProvider::Gemini);
    assert_eq!(config.chat_model, "gpt-4o-mini");
    assert_eq!(config.agent_max_steps, 8);
}

#[test]
fn test_overrides() {
    let config = load(&[
        ("REVIEWS_CSV", "/data/reviews.csv"),
        ("THEME_REVIEW_LIMIT", " 250 "),
        ("THEME_CONCURRENCY", "4"),
        ("CLASSIFIER_PROVIDER", "OpenAI"),
        ("CLASSIFIER_MODEL", "gpt-4o"),
        ("LLM_MAX_RETRIES", "0"),
    ]).unwrap();

    assert_eq!(config.reviews_csv, PathBuf::from("/data/reviews.csv"));
    assert_eq!(config.theme_review_limit, 250);
    assert_eq!(config.theme_concurrency, 4);
    assert_eq!(config.classifier_provider, ClassifierProvider::OpenAi);
    assert_eq!(config.classifier_model, "gpt-4o");
    assert_eq!(config.llm_max_retries, 0);
}

#[test]
fn test_invalid_number_is_rejected() {
    let err = load(&[("THEME_REVIEW_LIMIT", "ten")]).unwrap_err();
    assert!(matches!(err, ReviewError::Config(_)));
    assert!(err.to_string().contains("THEME_REVIEW_LIMIT='ten'"));
}

#[test]
fn test_zero_concurrency_is_rejected() {
    assert!(matches!(load(&[("THEME_CONCURRENCY", "0")]), Err(ReviewError::Config(_))));
}

#[test]
fn test_unknown_provider_is_rejected() {
    let err = load(&[("CLASSIFIER_PROVIDER", "claude")]).unwrap_err();
    assert!(err.to_string().contains("claude"));
}
