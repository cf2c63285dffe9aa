// Copyright 2025 The JsonContrast Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use json_contrast::{compare, CompareConfig, DiffKind};
use serde_json::json;

#[test]
fn reflexivity_holds_for_a_deep_document() {
    let doc = json!({
        "user": {
            "id": 1,
            "name": "Ada",
            "profile": {"age": 36, "verified": true, "bio": null},
            "comments": [
                {"id": 10, "text": "first", "score": 0.5},
                {"id": 11, "text": "second", "score": 1}
            ]
        },
        "tags": ["a", "b", "c"]
    });
    let result = compare(&doc, &doc, &CompareConfig::new());
    assert!(result.is_match());
    assert!(result.residual_actual.is_none());
    assert!(result.residual_expected.is_none());
}

#[test]
fn a_json_config_drives_a_full_comparison() {
    let config = CompareConfig::from_json(
        r#"{
            "ignore_path": ["$.meta.generated_at"],
            "tolerant_path": {"$.rows[*].score": "0.1"},
            "array_with_disorder_path": {"$.rows": {"unique_key": "id"}},
            "field_mappings": {"$.rows[*].uid": "id"}
        }"#,
    )
    .unwrap();

    let actual = json!({
        "meta": {"generated_at": "2025-03-01T12:00:00Z"},
        "rows": [
            {"uid": 2, "id": 2, "score": 7.05},
            {"uid": 1, "id": 1, "score": 3.0}
        ]
    });
    let expected = json!({
        "meta": {"generated_at": "2025-03-02T09:30:00Z"},
        "rows": [
            {"uid": 1, "id": 1, "score": 2.95},
            {"uid": 2, "id": 2, "score": 7.1}
        ]
    });

    assert!(compare(&actual, &expected, &config).is_match());
}

#[test]
fn ignore_suppresses_every_diff_below_the_path() {
    let config = CompareConfig::new().ignore_path("$.volatile");
    let actual = json!({"volatile": {"a": [1, 2, 3], "b": "x"}, "stable": 1});
    let expected = json!({"volatile": 42, "stable": 1});
    assert!(compare(&actual, &expected, &config).is_match());
}

#[test]
fn null_against_a_value_is_reported_one_sided() {
    let actual = json!({"v": null});
    let expected = json!({"v": {"deep": [1]}});
    let result = compare(&actual, &expected, &CompareConfig::new());
    assert_eq!(result.diffs.len(), 1);
    assert_eq!(result.diffs[0].kind, DiffKind::OnlyInExpected);
    assert_eq!(result.diffs[0].path, "$.v");
}

#[test]
fn tolerance_is_inclusive_at_the_boundary() {
    let config = CompareConfig::new().tolerance("$.v", "0.25".parse().unwrap());
    assert!(compare(&json!({"v": 10}), &json!({"v": 10.25}), &config).is_match());

    let result = compare(&json!({"v": 10}), &json!({"v": 10.250001}), &config);
    assert_eq!(result.diffs.len(), 1);
    assert_eq!(
        result.diffs[0].kind,
        DiffKind::ValueMismatchWithinTolerance("0.25".parse().unwrap())
    );
}

#[test]
fn field_mapping_is_not_double_reported() {
    let config = CompareConfig::new().field_mapping("$.uid", "id");
    let actual = json!({"uid": 5});
    let expected = json!({"id": 5});
    let result = compare(&actual, &expected, &config);
    assert!(result.is_match(), "alias target must not be reported: {}", result);
}

#[test]
fn disordered_array_with_unique_key_round_trip() {
    let config = CompareConfig::new().disordered_array_keyed("$.items", "id");
    let actual = json!({"items": [{"id": 1, "v": "a"}, {"id": 2, "v": "b"}]});
    let expected = json!({"items": [{"id": 2, "v": "b"}, {"id": 1, "v": "a"}]});
    assert!(compare(&actual, &expected, &config).is_match());

    let expected = json!({"items": [{"id": 2, "v": "c"}, {"id": 1, "v": "a"}]});
    let result = compare(&actual, &expected, &config);
    assert_eq!(result.diffs.len(), 1);
    assert_eq!(result.diffs[0].kind, DiffKind::ValueMismatch);
    assert!(result.diffs[0].reason.contains("unique key [id][2]"));
}

#[test]
fn array_length_mismatch_with_equal_prefix_keeps_residual_tail() {
    let actual = json!({"xs": [1, 2, 3]});
    let expected = json!({"xs": [1, 2]});
    let result = compare(&actual, &expected, &CompareConfig::new());

    assert_eq!(result.diffs.len(), 1);
    assert_eq!(result.diffs[0].kind, DiffKind::ArrayLengthMismatch(3, 2));
    assert_eq!(
        result.residual_actual,
        Some(json!({"xs": {"index 2": 3}}))
    );
    assert!(result.residual_expected.is_none());
}

#[test]
fn escaped_json_comparison_nests_its_diffs() {
    let config = CompareConfig::new().escaped_json("$.payload", CompareConfig::new());
    let actual = json!({"payload": "{\"a\":1}"});
    let expected = json!({"payload": "{\"a\":2}"});
    let result = compare(&actual, &expected, &config);

    assert_eq!(result.diffs.len(), 1);
    assert_eq!(result.diffs[0].kind, DiffKind::EscapedPayloadMismatch);
    assert_eq!(result.diffs[0].sub_diffs.len(), 1);
    assert_eq!(result.diffs[0].sub_diffs[0].kind, DiffKind::ValueMismatch);
    assert_eq!(result.diffs[0].sub_diffs[0].path, "$.a");
}

#[test]
fn escaped_json_rules_scope_to_the_payload_root() {
    // the outer config ignores nothing; the nested config's ignore path is
    // relative to the re-parsed payload, not the outer document
    let nested = CompareConfig::new()
        .ignore_path("$.nonce")
        .disordered_array("$.tags");
    let config = CompareConfig::new().escaped_json("$.blob.payload", nested);

    let actual = json!({"blob": {"payload": "{\"nonce\":1,\"tags\":[\"b\",\"a\"]}"}});
    let expected = json!({"blob": {"payload": "{\"nonce\":2,\"tags\":[\"a\",\"b\"]}"}});
    assert!(compare(&actual, &expected, &config).is_match());
}

#[test]
fn residuals_reconstruct_only_the_diverging_slice() {
    let actual = json!({
        "same": {"a": 1},
        "user": {"name": "Ada", "age": 36, "extra": true},
        "rows": [{"v": 1}, {"v": 2}]
    });
    let expected = json!({
        "same": {"a": 1},
        "user": {"name": "Grace", "age": 36},
        "rows": [{"v": 1}, {"v": 3}]
    });

    let result = compare(&actual, &expected, &CompareConfig::new());
    assert_eq!(result.diffs.len(), 3);
    assert_eq!(
        result.residual_actual,
        Some(json!({
            "user": {"name": "Ada", "extra": true},
            "rows": {"index 1": {"v": 2}}
        }))
    );
    assert_eq!(
        result.residual_expected,
        Some(json!({
            "user": {"name": "Grace"},
            "rows": {"index 1": {"v": 3}}
        }))
    );
}

#[test]
fn mismatches_render_a_readable_report() {
    let actual = json!({"a": 1, "items": [{"id": 1}]});
    let expected = json!({"a": 2, "items": [{"id": 9}]});
    let result = compare(&actual, &expected, &CompareConfig::new());

    let rendered = result.to_string();
    assert!(rendered.contains("$.a"));
    assert!(rendered.contains("$.items[0].id"));
}
