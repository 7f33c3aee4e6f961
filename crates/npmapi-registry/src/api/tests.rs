//! Unit tests for response reshaping

use super::*;
use serde_json::json;

fn package_document() -> PackageDocument {
    serde_json::from_value(json!({
        "name": "influxdb-nodejs",
        "description": "Simple influxdb client",
        "readme": "# influxdb-nodejs",
        "maintainers": [{ "name": "tree.xie", "email": "tree.xie@example.com" }],
        "author": "tree.xie",
        "keywords": ["influxdb", "client"],
        "license": "MIT",
        "dist-tags": { "latest": "2.1.0" },
        "time": {
            "modified": "2017-06-01T00:00:00.000Z",
            "created": "2016-01-01T00:00:00.000Z",
            "1.0.0": "2016-01-01T00:00:00.000Z",
            "1.2.0": "2016-05-01T00:00:00.000Z",
            "1.1.0": "2016-03-01T00:00:00.000Z",
            "2.0.0": "2017-01-01T00:00:00.000Z",
            "2.1.0": "2017-06-01T00:00:00.000Z",
            "unpublished": { "time": "2017-07-01T00:00:00.000Z" }
        }
    }))
    .unwrap()
}

#[test]
fn test_package_info_strips_markers_from_time() {
    let info = PackageInfo::from(package_document());

    assert!(!info.time.contains_key("modified"));
    assert!(!info.time.contains_key("created"));
    assert!(!info.time.contains_key("unpublished"));
    assert_eq!(info.time.len(), 5);
    assert_eq!(info.created_time.as_deref(), Some("2016-01-01T00:00:00.000Z"));
    assert_eq!(info.latest.as_deref(), Some("2.1.0"));
}

#[test]
fn test_package_info_published_time_per_major() {
    let info = PackageInfo::from(package_document());

    assert_eq!(info.published_time.len(), 2);
    assert_eq!(info.published_time["1"], "2016-05-01T00:00:00.000Z");
    assert_eq!(info.published_time["2"], "2017-06-01T00:00:00.000Z");
}

#[test]
fn test_package_info_serializes_camel_case() {
    let value = serde_json::to_value(PackageInfo::from(package_document())).unwrap();

    assert!(value.get("createdTime").is_some());
    assert!(value.get("publishedTime").is_some());
    assert_eq!(value["author"], json!("tree.xie"));
    assert_eq!(value["maintainers"][0]["name"], json!("tree.xie"));
}

#[test]
fn test_update_names_accepts_array_and_object() {
    let array = json!([{ "name": "a" }, { "name": "b" }, { "version": "1.0.0" }]);
    assert_eq!(update_names(&array), vec!["a", "b"]);

    let object = json!({ "a": { "name": "a" }, "_updated": 1488362400000u64 });
    assert_eq!(update_names(&object), vec!["a"]);

    assert!(update_names(&json!(null)).is_empty());
}

#[test]
fn test_depended_view_trims_and_skips_blank_names() {
    let view: DependedView = serde_json::from_value(json!({
        "rows": [
            { "key": [" lodash "], "value": 68000 },
            { "key": ["   "], "value": 3 },
            { "key": [], "value": 1 },
            { "key": ["request"], "value": 40000 }
        ]
    }))
    .unwrap();

    assert_eq!(
        view.into_counts(),
        vec![
            DependedCount { name: "lodash".to_string(), count: 68000 },
            DependedCount { name: "request".to_string(), count: 40000 },
        ]
    );
}

#[test]
fn test_score_rounds_to_three_decimals() {
    let raw: RawScore = serde_json::from_value(json!({
        "final": 0.87654321,
        "detail": { "quality": 0.91111, "popularity": 0.12345, "maintenance": 0.99999 }
    }))
    .unwrap();

    let score = Score::from(raw);
    assert_eq!(score.final_score, 0.877);
    assert_eq!(score.detail["quality"], 0.911);
    assert_eq!(score.detail["popularity"], 0.123);
    assert_eq!(score.detail["maintenance"], 1.0);

    let value = serde_json::to_value(&score).unwrap();
    assert_eq!(value["final"], json!(0.877));
    assert_eq!(value["quality"], json!(0.911));
}
