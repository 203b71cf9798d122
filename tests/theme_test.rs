use std::sync::Arc;
use reviewsm::llm::MockLlmCaller;
use reviewsm::themes::{
    aggregate, aggregate_concurrent, load_snapshot, parse_classification, preprocess,
    render_hierarchy, run_theming, save_snapshot, to_json, Classifier, LlmClassifier,
    MockClassifier, ThemeBucket, ThemeMap,
};
use reviewsm::{LlmResponse, ReviewError, ToolCall};
use std::collections::HashMap;
use tempfile::TempDir;

const SERVICE: &str = "Great service!";
const CROWDED: &str = "Too crowded, on a Saturday.";
const RINGS: &str = "Loved the rings. Prices are high?";

const SERVICE_JSON: &str = r#"{"themes": {"Customer Service": {"reviews": ["ignored"], "subthemes": {"Friendly Staff": []}}}}"#;
const CROWDED_JSON: &str = r#"{"themes": {"Store Environment": {"subthemes": {"Crowdedness": []}}}}"#;
const RINGS_JSON: &str = r#"```json
{"themes": {
    "Product Quality": {"reviews": [], "subthemes": {"Beautiful Selection": [], "Ring Design": []}},
    "Pricing": {"reviews": [], "subthemes": {"High Prices": []}}
}}
```"#;

fn scripted() -> MockClassifier {
    MockClassifier::new()
        .reply("great service", SERVICE_JSON)
        .reply("too crowded on a saturday", CROWDED_JSON)
        .reply("loved the rings prices are high", RINGS_JSON)
}

// ─────────────────────────────────────────────────────────────────────────────
// Normalization and parsing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_preprocess_lowercases_and_strips_punctuation() {
    assert_eq!(preprocess("  Great service!  "), "great service");
    assert_eq!(preprocess("Loved the rings. Prices are high?"), "loved the rings prices are high");
    assert_eq!(preprocess("snake_case stays"), "snake_case stays");
    assert_eq!(preprocess("?!... "), "");
}

#[test]
fn test_parse_accepts_code_fences() {
    let result = parse_classification(RINGS_JSON).unwrap();
    assert_eq!(result.themes.len(), 2);
    assert_eq!(result.themes["Product Quality"], vec!["Beautiful Selection", "Ring Design"]);
    assert_eq!(result.themes["Pricing"], vec!["High Prices"]);

    let bare = parse_classification("```\n{\"themes\": {}}\n```").unwrap();
    assert!(bare.themes.is_empty());
}

#[test]
fn test_parse_tolerates_missing_subthemes() {
    let result = parse_classification(r#"{"themes": {"Value": {"reviews": []}}}"#).unwrap();
    assert_eq!(result.themes["Value"], Vec::<String>::new());
}

#[test]
fn test_parse_rejects_non_conformant_replies() {
    for raw in [
        "Sorry, I cannot help with that.",
        r#"{"topics": {}}"#,
        r#"{"themes": ["Service"]}"#,
        r#"{"themes": {"Service": "good"}}"#,
        r#"{"themes": {"Service": {"subthemes": ["Friendly"]}}}"#,
    ] {
        let err = parse_classification(raw).unwrap_err();
        assert!(matches!(err, ReviewError::Classification(_)), "{} should be rejected", raw);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregation
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_aggregate_stores_original_text() {
    let classifier = scripted();
    let report = aggregate(&[SERVICE, CROWDED], &classifier).await;

    let service = &report.themes["Customer Service"];
    assert_eq!(service.reviews, vec![SERVICE]);
    assert_eq!(service.subthemes["Friendly Staff"], vec![SERVICE]);
    assert_eq!(report.themes["Store Environment"].subthemes["Crowdedness"], vec![CROWDED]);

    // The classifier only ever sees normalized text
    assert_eq!(classifier.calls(), vec!["great service", "too crowded on a saturday"]);
    assert_eq!(report.succeeded, vec![SERVICE, CROWDED]);
}

#[tokio::test]
async fn test_review_appears_under_each_subtheme() {
    let report = aggregate(&[RINGS], &scripted()).await;

    let quality = &report.themes["Product Quality"];
    assert_eq!(quality.reviews, vec![RINGS], "once in the theme list");
    assert_eq!(quality.subthemes["Beautiful Selection"], vec![RINGS]);
    assert_eq!(quality.subthemes["Ring Design"], vec![RINGS]);
    assert_eq!(report.themes["Pricing"].reviews, vec![RINGS]);
}

#[tokio::test]
async fn test_later_reviews_append_to_existing_keys() {
    let second = "GREAT service";
    let classifier = scripted();
    let report = aggregate(&[SERVICE, second], &classifier).await;

    let service = &report.themes["Customer Service"];
    assert_eq!(service.reviews, vec![SERVICE, second]);
    assert_eq!(service.subthemes["Friendly Staff"], vec![SERVICE, second]);
    assert_eq!(report.themes.len(), 1);
}

#[tokio::test]
async fn test_failed_review_is_isolated() {
    let classifier = MockClassifier::new()
        .reply("great service", SERVICE_JSON)
        .fail("too crowded on a saturday", "upstream timed out")
        .reply("loved the rings prices are high", RINGS_JSON);

    let report = aggregate(&[SERVICE, CROWDED, RINGS], &classifier).await;

    let themes: Vec<&str> = report.themes.keys().map(String::as_str).collect();
    assert_eq!(themes, vec!["Customer Service", "Pricing", "Product Quality"]);
    assert!(!report.themes.contains_key("Store Environment"));

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].index, 1);
    assert_eq!(report.failed[0].review, CROWDED);
    assert!(report.failed[0].error.to_string().contains("upstream timed out"));
    assert_eq!(report.succeeded, vec![SERVICE, RINGS]);
}

#[tokio::test]
async fn test_malformed_reply_counts_as_failure() {
    let classifier = MockClassifier::new()
        .reply("great service", "Here are your themes: Customer Service")
        .reply("too crowded on a saturday", CROWDED_JSON);

    let report = aggregate(&[SERVICE, CROWDED], &classifier).await;
    assert_eq!(report.themes.len(), 1);
    assert!(report.themes.contains_key("Store Environment"));
    assert_eq!(report.failed.len(), 1);
}

#[tokio::test]
async fn test_blank_reviews_are_skipped_without_classification() {
    let classifier = scripted();
    let report = aggregate(&["", "!!!", SERVICE], &classifier).await;

    assert_eq!(report.skipped, vec!["", "!!!"]);
    assert_eq!(classifier.calls(), vec!["great service"]);
    assert_eq!(report.processed(), 3);
}

#[tokio::test]
async fn test_empty_input_never_calls_classifier() {
    let classifier = scripted();
    let reviews: Vec<String> = Vec::new();
    let report = aggregate(&reviews, &classifier).await;

    assert!(report.themes.is_empty());
    assert!(classifier.calls().is_empty());
}

#[tokio::test]
async fn test_concurrent_matches_sequential() {
    let reviews = [SERVICE, "", CROWDED, RINGS, "great service!!"];
    let sequential = aggregate(&reviews, &scripted()).await;
    let concurrent = aggregate_concurrent(&reviews, &scripted(), 3).await;

    assert_eq!(concurrent.themes, sequential.themes);
    assert_eq!(concurrent.succeeded, sequential.succeeded);
    assert_eq!(concurrent.skipped, sequential.skipped);
    assert_eq!(concurrent.themes["Customer Service"].reviews, vec![SERVICE, "great service!!"]);
}

#[tokio::test]
async fn test_llm_classifier_parses_final_answer() {
    let llm = Arc::new(MockLlmCaller::new(vec![
        LlmResponse::FinalAnswer { content: RINGS_JSON.to_string() },
        LlmResponse::ToolCall {
            tool: ToolCall { name: "filter_reviews".to_string(), args: HashMap::new(), id: None },
        },
    ]));
    let classifier = LlmClassifier::new(llm.clone(), "gpt-4o-mini");

    let result = classifier.classify("loved the rings").await.unwrap();
    assert!(result.themes.contains_key("Pricing"));
    assert_eq!(llm.model_for_call(0).as_deref(), Some("gpt-4o-mini"));
    // No system prompt: a single user message carries the prompt
    assert_eq!(llm.messages_for_call(0), Some(1));

    let err = classifier.classify("loved the rings").await.unwrap_err();
    assert!(err.to_string().contains("filter_reviews"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Snapshot and run
// ─────────────────────────────────────────────────────────────────────────────

fn sample_map() -> ThemeMap {
    let mut map = ThemeMap::new();
    let mut bucket = ThemeBucket::default();
    bucket.reviews = vec!["Café was lovely — très bien".to_string(), "Second".to_string()];
    bucket.subthemes.insert("Ambience".to_string(), vec!["Café was lovely — très bien".to_string()]);
    bucket.subthemes.insert("Empty".to_string(), Vec::new());
    map.insert("Experience".to_string(), bucket);
    map
}

#[test]
fn test_snapshot_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("theme_buckets.json");
    let map = sample_map();

    save_snapshot(&map, &path).unwrap();
    assert_eq!(load_snapshot(&path).unwrap(), map);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("très bien"), "non-ASCII text is written as UTF-8");
    assert!(raw.contains("\n    \"Experience\""), "four-space indentation");
}

#[test]
fn test_snapshot_overwrites_previous_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("theme_buckets.json");

    save_snapshot(&sample_map(), &path).unwrap();
    save_snapshot(&ThemeMap::new(), &path).unwrap();
    assert!(load_snapshot(&path).unwrap().is_empty());
}

#[test]
fn test_snapshot_shape() {
    let json: serde_json::Value = serde_json::from_str(&to_json(&sample_map()).unwrap()).unwrap();
    assert_eq!(json["Experience"]["reviews"][1], "Second");
    assert_eq!(json["Experience"]["subthemes"]["Empty"], serde_json::json!([]));
}

#[test]
fn test_render_hierarchy_truncates_reviews() {
    let mut map = ThemeMap::new();
    let long = "x".repeat(150);
    map.insert("Theme A".to_string(), ThemeBucket {
        reviews:   vec![long.clone()],
        subthemes: [("Sub A".to_string(), vec![long])].into_iter().collect(),
    });

    let text = render_hierarchy(&map);
    assert!(text.contains("Theme: Theme A"));
    assert!(text.contains(&format!("  - {}...", "x".repeat(100))));
    assert!(text.contains("  Sub A\n"));
    assert!(!text.contains(&"x".repeat(101)));
}

#[tokio::test]
async fn test_run_theming_limits_and_persists() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.json");
    let reviews = vec![SERVICE.to_string(), CROWDED.to_string(), RINGS.to_string()];
    let classifier = scripted();

    let run = run_theming(&reviews, 2, &classifier, &path, 1).await;

    assert!(run.written);
    assert!(run.persist_error.is_none());
    assert_eq!(classifier.calls().len(), 2);
    assert_eq!(load_snapshot(&path).unwrap(), run.report.themes);
}

#[tokio::test]
async fn test_run_theming_keeps_result_when_write_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing_dir").join("out.json");
    let reviews = vec![SERVICE.to_string()];

    let run = run_theming(&reviews, 10, &scripted(), &path, 2).await;

    assert!(!run.written);
    assert!(matches!(run.persist_error, Some(ReviewError::Persistence { .. })));
    assert!(run.report.themes.contains_key("Customer Service"));
}

#[tokio::test]
async fn test_run_theming_with_no_reviews_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.json");
    let classifier = scripted();

    let run = run_theming(&[], 10, &classifier, &path, 1).await;

    assert!(!run.written);
    assert!(!path.exists());
    assert!(classifier.calls().is_empty());
}
