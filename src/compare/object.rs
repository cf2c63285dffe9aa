use crate::compare::{check_kinds, CompareContext, Comparator, Dispatcher};
use crate::diff::{render, Diff, DiffKind, DiffResult};
use crate::path;
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Comparator for JSON objects.
///
/// The walk is actual-driven: actual's fields are compared in their document
/// order, then expected's surplus fields are reported. A field-mapping rule
/// redirects an actual field to a differently named expected field; the
/// mapping target is excluded from the surplus pass so it is not reported
/// twice.
pub(crate) struct ObjectComparator;

impl Comparator for ObjectComparator {
    fn compare(&self, ctx: &CompareContext<'_>, dispatcher: &Dispatcher) -> DiffResult {
        if let Some(mismatch) = check_kinds(ctx) {
            return mismatch;
        }

        let actual = ctx.actual.as_object().expect("kind checked above");
        let expected = ctx.expected.as_object().expect("kind checked above");

        let mut result = DiffResult::default();
        let mut residual_actual = Map::new();
        let mut residual_expected = Map::new();
        let mut mapped_targets: HashSet<&str> = HashSet::new();

        for (field_name, actual_child) in actual {
            let child_path = path::append_field(&ctx.path, field_name);
            let expected_field_name = match ctx.config.mapping_at(&child_path) {
                Some(target) => {
                    debug!(
                        "path [{}] maps to the expected field [{}]",
                        child_path, target
                    );
                    mapped_targets.insert(target);
                    target
                }
                None => field_name.as_str(),
            };

            let Some(expected_child) = expected.get(expected_field_name) else {
                result.diffs.push(Diff::new(
                    DiffKind::FieldOnlyInActual,
                    child_path,
                    render(actual_child),
                    format!("field [{}] does not exist in expected", field_name),
                    format!(
                        "field [{}] is only in actual, not in expected",
                        field_name
                    ),
                ));
                residual_actual.insert(field_name.clone(), actual_child.clone());
                continue;
            };

            let sub = dispatcher.run(ctx.child(child_path, actual_child, expected_child));
            if sub.diffs.is_empty() {
                continue;
            }
            result.diffs.extend(sub.diffs);
            if let Some(residual) = sub.residual_actual {
                residual_actual.insert(field_name.clone(), residual);
            }
            if let Some(residual) = sub.residual_expected {
                residual_expected.insert(expected_field_name.to_string(), residual);
            }
        }

        for (field_name, expected_child) in expected {
            if actual.contains_key(field_name) || mapped_targets.contains(field_name.as_str()) {
                continue;
            }
            result.diffs.push(Diff::new(
                DiffKind::FieldOnlyInExpected,
                path::append_field(&ctx.path, field_name),
                format!("field [{}] does not exist in actual", field_name),
                render(expected_child),
                format!(
                    "field [{}] is only in expected, not in actual",
                    field_name
                ),
            ));
            residual_expected.insert(field_name.clone(), expected_child.clone());
        }

        if !residual_actual.is_empty() {
            result.residual_actual = Some(Value::Object(residual_actual));
        }
        if !residual_expected.is_empty() {
            result.residual_expected = Some(Value::Object(residual_expected));
        }
        result
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::CompareConfig;
    use serde_json::json;

    fn run(actual: &Value, expected: &Value, config: &CompareConfig) -> DiffResult {
        Dispatcher::new().run(CompareContext {
            config,
            path: String::new(),
            actual,
            expected,
        })
    }

    #[test]
    fn test_field_only_in_actual() {
        let actual = json!({"a": 1, "extra": true});
        let expected = json!({"a": 1});
        let result = run(&actual, &expected, &CompareConfig::new());

        assert_eq!(result.diffs.len(), 1);
        assert_eq!(result.diffs[0].kind, DiffKind::FieldOnlyInActual);
        assert_eq!(result.diffs[0].path, "$.extra");
        assert_eq!(result.residual_actual, Some(json!({"extra": true})));
        assert!(result.residual_expected.is_none());
    }

    #[test]
    fn test_field_only_in_expected() {
        let actual = json!({"a": 1});
        let expected = json!({"a": 1, "missing": "x"});
        let result = run(&actual, &expected, &CompareConfig::new());

        assert_eq!(result.diffs.len(), 1);
        assert_eq!(result.diffs[0].kind, DiffKind::FieldOnlyInExpected);
        assert_eq!(result.diffs[0].path, "$.missing");
        assert_eq!(result.residual_expected, Some(json!({"missing": "x"})));
        assert!(result.residual_actual.is_none());
    }

    #[test]
    fn test_nested_diffs_fold_into_parent() {
        let actual = json!({"user": {"name": "Ada", "age": 36}});
        let expected = json!({"user": {"name": "Ada", "age": 37}});
        let result = run(&actual, &expected, &CompareConfig::new());

        assert_eq!(result.diffs.len(), 1);
        assert_eq!(result.diffs[0].path, "$.user.age");
        assert_eq!(result.residual_actual, Some(json!({"user": {"age": 36}})));
        assert_eq!(result.residual_expected, Some(json!({"user": {"age": 37}})));
    }

    #[test]
    fn test_field_mapping_compares_aliased_field() {
        let config = CompareConfig::new().field_mapping("$.uid", "id");
        let actual = json!({"uid": 7});
        let expected = json!({"id": 7});
        assert!(run(&actual, &expected, &config).is_match());

        let expected = json!({"id": 8});
        let result = run(&actual, &expected, &config);
        assert_eq!(result.diffs.len(), 1);
        assert_eq!(result.diffs[0].kind, DiffKind::ValueMismatch);
        assert_eq!(result.diffs[0].path, "$.uid");
    }

    #[test]
    fn test_field_mapping_target_is_not_double_reported() {
        let config = CompareConfig::new().field_mapping("$.uid", "id");
        let actual = json!({"uid": 7, "name": "a"});
        let expected = json!({"id": 7, "name": "b"});
        let result = run(&actual, &expected, &config);

        // only the name mismatch; "id" must not show up as FieldOnlyInExpected
        assert_eq!(result.diffs.len(), 1);
        assert_eq!(result.diffs[0].path, "$.name");
    }

    #[test]
    fn test_field_mapping_with_wildcard_path() {
        let config = CompareConfig::new().field_mapping("$.rows[*].uid", "id");
        let actual = json!({"rows": [{"uid": 1}, {"uid": 2}]});
        let expected = json!({"rows": [{"id": 1}, {"id": 2}]});
        assert!(run(&actual, &expected, &config).is_match());
    }

    #[test]
    fn test_both_residual_sides_collect_independent_fields() {
        let actual = json!({"only_a": 1, "common": 2});
        let expected = json!({"common": 3, "only_e": 4});
        let result = run(&actual, &expected, &CompareConfig::new());

        assert_eq!(result.diffs.len(), 3);
        assert_eq!(
            result.residual_actual,
            Some(json!({"only_a": 1, "common": 2}))
        );
        assert_eq!(
            result.residual_expected,
            Some(json!({"common": 3, "only_e": 4}))
        );
    }
}
