use crate::compare::{check_kinds, CompareContext, Comparator, Dispatcher};
use crate::config::DisorderRule;
use crate::diff::{render, Diff, DiffKind, DiffResult};
use crate::path;
use log::debug;
use serde_json::{Map, Value};

/// Comparator for JSON arrays.
///
/// Arrays compare positionally by default. A disordered-array rule switches
/// to multiset reconciliation: keyed 1:1 pairing when the rule names a unique
/// key, greedy first-zero-diff pairing otherwise. Greedy matching is
/// deliberately left-to-right and non-optimal; callers rely on that for
/// tie-breaking among duplicate-like elements.
pub(crate) struct ArrayComparator;

impl Comparator for ArrayComparator {
    fn compare(&self, ctx: &CompareContext<'_>, dispatcher: &Dispatcher) -> DiffResult {
        if let Some(mismatch) = check_kinds(ctx) {
            return mismatch;
        }

        let actual = ctx.actual.as_array().expect("kind checked above");
        let expected = ctx.expected.as_array().expect("kind checked above");

        let mut result = DiffResult::default();
        if actual.len() != expected.len() {
            result.diffs.push(Diff::new(
                DiffKind::ArrayLengthMismatch(actual.len(), expected.len()),
                ctx.path.clone(),
                format!("actual array length is {}", actual.len()),
                format!("expected array length is {}", expected.len()),
                format!(
                    "actual array has [{}] elements while expected has [{}]",
                    actual.len(),
                    expected.len()
                ),
            ));
        }

        let prefix_len = actual.len().min(expected.len());
        if prefix_len == 0 {
            result.residual_actual = Some(ctx.actual.clone());
            result.residual_expected = Some(ctx.expected.clone());
            return result;
        }

        if let Some(rule) = ctx.config.disorder_at(&ctx.path) {
            debug!("path [{}] is compared as a disordered array", ctx.path);
            self.compare_disordered(ctx, dispatcher, rule, &mut result);
        } else {
            self.compare_ordered(ctx, dispatcher, prefix_len, &mut result);
        }
        result
    }
}

impl ArrayComparator {
    /// Positional walk over the shared prefix; surplus trailing elements of
    /// the longer array land verbatim in that side's residual.
    fn compare_ordered(
        &self,
        ctx: &CompareContext<'_>,
        dispatcher: &Dispatcher,
        prefix_len: usize,
        result: &mut DiffResult,
    ) {
        let actual = ctx.actual.as_array().expect("kind checked above");
        let expected = ctx.expected.as_array().expect("kind checked above");
        let mut residual_actual = Map::new();
        let mut residual_expected = Map::new();

        for index in 0..prefix_len {
            let sub = dispatcher.run(ctx.child(
                path::append_index(&ctx.path, index),
                &actual[index],
                &expected[index],
            ));
            if sub.diffs.is_empty() {
                continue;
            }
            result.diffs.extend(sub.diffs);
            if let Some(residual) = sub.residual_actual {
                residual_actual.insert(index_label(index), residual);
            }
            if let Some(residual) = sub.residual_expected {
                residual_expected.insert(index_label(index), residual);
            }
        }

        for index in prefix_len..actual.len() {
            residual_actual.insert(index_label(index), actual[index].clone());
        }
        for index in prefix_len..expected.len() {
            residual_expected.insert(index_label(index), expected[index].clone());
        }

        if !residual_actual.is_empty() {
            result.residual_actual = Some(Value::Object(residual_actual));
        }
        if !residual_expected.is_empty() {
            result.residual_expected = Some(Value::Object(residual_expected));
        }
    }

    /// Multiset reconciliation. Every element of actual is matched against
    /// the not-yet-consumed elements of expected: by unique key when the
    /// rule provides one and the element carries it, greedily by content
    /// otherwise. Leftover expected elements are reported afterwards.
    fn compare_disordered(
        &self,
        ctx: &CompareContext<'_>,
        dispatcher: &Dispatcher,
        rule: &DisorderRule,
        result: &mut DiffResult,
    ) {
        let actual = ctx.actual.as_array().expect("kind checked above");
        let expected = ctx.expected.as_array().expect("kind checked above");
        let unique_key = rule.unique_key.as_deref();

        let mut consumed = vec![false; expected.len()];
        let mut residual_actual = Map::new();
        let mut residual_expected = Map::new();

        for (index, element) in actual.iter().enumerate() {
            let element_path = path::append_index(&ctx.path, index);
            let key_value = unique_key.and_then(|key| element.get(key));

            if let (Some(key), Some(key_value)) = (unique_key, key_value) {
                let matched = expected.iter().enumerate().find(|(candidate, other)| {
                    !consumed[*candidate] && other.get(key) == Some(key_value)
                });
                match matched {
                    Some((candidate, other)) => {
                        consumed[candidate] = true;
                        let sub = dispatcher.run(ctx.child(element_path, element, other));
                        if sub.diffs.is_empty() {
                            continue;
                        }
                        for mut diff in sub.diffs {
                            diff.reason = format!(
                                "unique key [{}][{}], {}",
                                key,
                                render(key_value),
                                diff.reason
                            );
                            result.diffs.push(diff);
                        }
                        if let Some(residual) = sub.residual_actual {
                            residual_actual.insert(keyed_label(key, key_value, index), residual);
                        }
                        if let Some(residual) = sub.residual_expected {
                            residual_expected
                                .insert(keyed_label(key, key_value, candidate), residual);
                        }
                    }
                    None => {
                        result.diffs.push(Diff::new(
                            DiffKind::DisorderedElementNotFoundInExpected,
                            element_path,
                            render(element),
                            format!("unique key [{}] does not exist", render(key_value)),
                            format!(
                                "unique key [{}] not found in expected",
                                render(key_value)
                            ),
                        ));
                        residual_actual
                            .insert(keyed_label(key, key_value, index), element.clone());
                    }
                }
            } else {
                // greedy first-zero-diff match over the remaining candidates
                let matched = expected.iter().enumerate().position(|(candidate, other)| {
                    !consumed[candidate]
                        && dispatcher
                            .run(ctx.child(element_path.clone(), element, other))
                            .diffs
                            .is_empty()
                });
                match matched {
                    Some(candidate) => consumed[candidate] = true,
                    None => {
                        result.diffs.push(Diff::new(
                            DiffKind::DisorderedElementNotFoundInExpected,
                            element_path,
                            render(element),
                            "no matching element".to_string(),
                            "no element in expected matches this actual element".to_string(),
                        ));
                        residual_actual.insert(index_label(index), element.clone());
                    }
                }
            }
        }

        for (index, element) in expected.iter().enumerate() {
            if consumed[index] {
                continue;
            }
            let element_path = path::append_index(&ctx.path, index);
            match unique_key.and_then(|key| element.get(key)) {
                Some(key_value) => {
                    let key = unique_key.expect("key value implies key");
                    result.diffs.push(Diff::new(
                        DiffKind::DisorderedElementNotFoundInActual,
                        element_path,
                        format!("unique key [{}] does not exist", render(key_value)),
                        render(element),
                        format!("unique key [{}] not found in actual", render(key_value)),
                    ));
                    residual_expected.insert(keyed_label(key, key_value, index), element.clone());
                }
                None => {
                    result.diffs.push(Diff::new(
                        DiffKind::DisorderedElementNotFoundInActual,
                        element_path,
                        "no matching element".to_string(),
                        render(element),
                        "no element in actual matches this expected element".to_string(),
                    ));
                    residual_expected.insert(index_label(index), element.clone());
                }
            }
        }

        if !residual_actual.is_empty() {
            result.residual_actual = Some(Value::Object(residual_actual));
        }
        if !residual_expected.is_empty() {
            result.residual_expected = Some(Value::Object(residual_expected));
        }
    }
}

fn index_label(index: usize) -> String {
    format!("index {}", index)
}

fn keyed_label(key: &str, key_value: &Value, index: usize) -> String {
    format!("unique key [{}][{}] index {}", key, render(key_value), index)
}
