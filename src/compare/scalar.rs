use crate::compare::{check_kinds, CompareContext, Comparator, Dispatcher};
use crate::config::CompareConfig;
use crate::diff::{render, Diff, DiffKind, DiffResult};
use log::{debug, warn};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Number, Value};
use std::str::FromStr;

/// Comparator for the atomic node kinds: null, boolean, number and string.
///
/// Numbers compare as decimal quantities (`1` equals `1.0`), optionally
/// within a configured tolerance window. Strings at a configured path are
/// re-parsed as JSON and compared recursively with the nested rule set.
pub(crate) struct ScalarComparator;

impl Comparator for ScalarComparator {
    fn compare(&self, ctx: &CompareContext<'_>, dispatcher: &Dispatcher) -> DiffResult {
        if let Some(mismatch) = check_kinds(ctx) {
            return mismatch;
        }

        match (ctx.actual, ctx.expected) {
            (Value::Null, Value::Null) => DiffResult::default(),
            (Value::Number(actual), Value::Number(expected)) => {
                self.compare_numbers(ctx, actual, expected)
            }
            (Value::String(actual), Value::String(expected)) => {
                self.compare_strings(ctx, dispatcher, actual, expected)
            }
            (Value::Bool(actual), Value::Bool(expected)) => {
                if actual == expected {
                    DiffResult::default()
                } else {
                    value_mismatch(ctx)
                }
            }
            _ => {
                // compound kinds never reach this comparator
                warn!("unexpected node kind at [{}]", ctx.path);
                DiffResult::default()
            }
        }
    }
}

impl ScalarComparator {
    fn compare_numbers(
        &self,
        ctx: &CompareContext<'_>,
        actual: &Number,
        expected: &Number,
    ) -> DiffResult {
        if let Some(tolerance) = ctx.config.tolerance_at(&ctx.path) {
            debug!(
                "path [{}] allows a tolerance of [{}]",
                ctx.path, tolerance
            );
            if within_tolerance(actual, expected, tolerance) {
                return DiffResult::default();
            }
            return DiffResult::of(
                Diff::new(
                    DiffKind::ValueMismatchWithinTolerance(tolerance),
                    ctx.path.clone(),
                    actual.to_string(),
                    expected.to_string(),
                    format!(
                        "difference between actual [{}] and expected [{}] exceeds tolerance [{}]",
                        actual, expected, tolerance
                    ),
                ),
                ctx.actual.clone(),
                ctx.expected.clone(),
            );
        }

        if numbers_equal(actual, expected) {
            DiffResult::default()
        } else {
            value_mismatch(ctx)
        }
    }

    fn compare_strings(
        &self,
        ctx: &CompareContext<'_>,
        dispatcher: &Dispatcher,
        actual: &str,
        expected: &str,
    ) -> DiffResult {
        if let Some(nested) = ctx.config.escaped_json_at(&ctx.path) {
            return self.compare_escaped(ctx, dispatcher, nested, actual, expected);
        }
        if actual == expected {
            DiffResult::default()
        } else {
            value_mismatch(ctx)
        }
    }

    /// Re-parses both text values as JSON documents and runs a full
    /// comparison with the nested rule set, whose paths are relative to the
    /// payload's own root. A payload that does not parse is a data-quality
    /// fact about the document under test, reported as a diff.
    fn compare_escaped(
        &self,
        ctx: &CompareContext<'_>,
        dispatcher: &Dispatcher,
        nested: &CompareConfig,
        actual: &str,
        expected: &str,
    ) -> DiffResult {
        let actual_doc = serde_json::from_str::<Value>(actual);
        let expected_doc = serde_json::from_str::<Value>(expected);
        let (actual_doc, expected_doc) = match (actual_doc, expected_doc) {
            (Ok(a), Ok(e)) => (a, e),
            _ => {
                warn!("escaped payload at [{}] is not valid JSON", ctx.path);
                return DiffResult::of(
                    Diff::new(
                        DiffKind::EscapedPayloadMismatch,
                        ctx.path.clone(),
                        actual,
                        expected,
                        "payload could not be parsed as JSON",
                    ),
                    ctx.actual.clone(),
                    ctx.expected.clone(),
                );
            }
        };

        let sub = dispatcher.run(CompareContext {
            config: nested,
            path: String::new(),
            actual: &actual_doc,
            expected: &expected_doc,
        });
        if sub.diffs.is_empty() {
            return DiffResult::default();
        }

        let mut diff = Diff::new(
            DiffKind::EscapedPayloadMismatch,
            ctx.path.clone(),
            actual,
            expected,
            "escaped JSON payloads differ after re-parsing",
        );
        diff.sub_diffs = sub.diffs;
        DiffResult {
            diffs: vec![diff],
            residual_actual: sub.residual_actual,
            residual_expected: sub.residual_expected,
        }
    }
}

fn value_mismatch(ctx: &CompareContext<'_>) -> DiffResult {
    let actual = render(ctx.actual);
    let expected = render(ctx.expected);
    DiffResult::of(
        Diff::new(
            DiffKind::ValueMismatch,
            ctx.path.clone(),
            actual.clone(),
            expected.clone(),
            format!(
                "actual value [{}] is not equal to expected [{}]",
                actual, expected
            ),
        ),
        ctx.actual.clone(),
        ctx.expected.clone(),
    )
}

// Numbers are compared as decimals so that `1` and `1.0` are equal. Values
// whose text form does not fit a `Decimal` fall back to float comparison.
fn to_decimal(number: &Number) -> Option<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .ok()
        .or_else(|| Decimal::from_scientific(&text).ok())
}

fn numbers_equal(actual: &Number, expected: &Number) -> bool {
    match (to_decimal(actual), to_decimal(expected)) {
        (Some(a), Some(e)) => a == e,
        _ => actual.as_f64() == expected.as_f64(),
    }
}

/// Pass iff `expected` falls within `[actual - tolerance, actual + tolerance]`.
fn within_tolerance(actual: &Number, expected: &Number, tolerance: Decimal) -> bool {
    match (to_decimal(actual), to_decimal(expected)) {
        (Some(a), Some(e)) => {
            e >= a.saturating_sub(tolerance) && e <= a.saturating_add(tolerance)
        }
        _ => match (actual.as_f64(), expected.as_f64()) {
            (Some(a), Some(e)) => (e - a).abs() <= tolerance.to_f64().unwrap_or(0.0),
            _ => false,
        },
    }
}
