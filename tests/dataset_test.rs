mod common;

use chrono::NaiveDate;
use reviewsm::dataset::{parse_record_date, review_texts_from_reader, ReviewStore};
use reviewsm::ReviewError;

#[test]
fn test_loads_all_rows_in_order() {
    let store = common::store();
    assert_eq!(store.len(), 4);

    let summaries: Vec<&str> = store.records().iter().map(|r| r.summary.as_str()).collect();
    assert_eq!(summaries, vec![
        common::SPRINGFIELD_IL, common::TORONTO, common::CHICAGO, common::SPRINGFIELD_MO,
    ]);
}

#[test]
fn test_timestamps_keep_only_the_date() {
    let store = common::store();
    assert_eq!(store.records()[1].creation_date, NaiveDate::from_ymd_opt(2024, 2, 20).unwrap());
    assert_eq!(store.records()[3].creation_date, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
}

#[test]
fn test_blank_state_is_absent() {
    let store = common::store();
    let toronto = &store.records()[1];
    assert_eq!(toronto.city.as_deref(), Some("Toronto"));
    assert_eq!(toronto.state, None);
}

#[test]
fn test_text_column_is_optional() {
    let csv = "\
date_Date Created,string_City,string_State,string_Place Location,summary
2024-05-01,Austin,TX,1 Congress Ave,Quick checkout.
";
    let store = ReviewStore::from_reader(csv.as_bytes()).unwrap();
    assert_eq!(store.records()[0].text, "");
    assert_eq!(store.records()[0].summary, "Quick checkout.");
}

#[test]
fn test_bad_creation_date_is_a_dataset_error() {
    let csv = "\
date_Date Created,string_City,string_State,string_Place Location,summary
last tuesday,Austin,TX,1 Congress Ave,Quick checkout.
";
    let err = ReviewStore::from_reader(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, ReviewError::Dataset(ref msg) if msg.contains("row 2")), "got {:?}", err);
}

#[test]
fn test_parse_record_date() {
    assert_eq!(parse_record_date(" 2024-07-04 "), NaiveDate::from_ymd_opt(2024, 7, 4));
    assert_eq!(parse_record_date("2024-7-4"), None);
    assert_eq!(parse_record_date(""), None);
}

#[test]
fn test_review_texts_respects_limit() {
    let texts = review_texts_from_reader(common::REVIEWS_CSV.as_bytes(), 2).unwrap();
    assert_eq!(texts, vec!["The staff were friendly!", "Waited forever."]);

    let all = review_texts_from_reader(common::REVIEWS_CSV.as_bytes(), 100).unwrap();
    assert_eq!(all.len(), 4);
}

#[test]
fn test_review_texts_requires_text_column() {
    let csv = "summary\nNo text here\n";
    let err = review_texts_from_reader(csv.as_bytes(), 10).unwrap_err();
    assert!(matches!(err, ReviewError::Dataset(_)));
}
