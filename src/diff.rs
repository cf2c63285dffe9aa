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

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// The kind of divergence a [`Diff`] reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    /// The expected node is null while the actual node carries a value.
    OnlyInActual,
    /// The actual node is null while the expected node carries a value.
    OnlyInExpected,
    /// The two nodes are of different JSON kinds (neither being null).
    TypeMismatch,
    /// Two scalars of the same kind differ.
    ValueMismatch,
    /// Two numbers differ by more than the configured tolerance.
    ValueMismatchWithinTolerance(Decimal),
    /// The two arrays have different lengths (actual, expected).
    ArrayLengthMismatch(usize, usize),
    /// An object field exists in actual but not in expected.
    FieldOnlyInActual,
    /// An object field exists in expected but not in actual.
    FieldOnlyInExpected,
    /// A disordered-array element of actual has no counterpart in expected.
    DisorderedElementNotFoundInExpected,
    /// A disordered-array element of expected has no counterpart in actual.
    DisorderedElementNotFoundInActual,
    /// An escaped JSON payload differs after re-parsing, or cannot be parsed.
    EscapedPayloadMismatch,
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffKind::OnlyInActual => write!(f, "value only exists in actual"),
            DiffKind::OnlyInExpected => write!(f, "value only exists in expected"),
            DiffKind::TypeMismatch => write!(f, "actual and expected types differ"),
            DiffKind::ValueMismatch => write!(f, "actual value differs from expected"),
            DiffKind::ValueMismatchWithinTolerance(tolerance) => {
                write!(f, "values differ beyond the allowed tolerance {}", tolerance)
            }
            DiffKind::ArrayLengthMismatch(actual, expected) => {
                write!(f, "array lengths differ: actual {}, expected {}", actual, expected)
            }
            DiffKind::FieldOnlyInActual => write!(f, "field only exists in actual"),
            DiffKind::FieldOnlyInExpected => write!(f, "field only exists in expected"),
            DiffKind::DisorderedElementNotFoundInExpected => {
                write!(f, "no matching element found in expected")
            }
            DiffKind::DisorderedElementNotFoundInActual => {
                write!(f, "no matching element found in actual")
            }
            DiffKind::EscapedPayloadMismatch => write!(f, "escaped JSON payloads differ"),
        }
    }
}

/// A single reported divergence between the two documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diff {
    /// What kind of divergence this is.
    pub kind: DiffKind,
    /// Concrete path of the diverging node, rooted at `$`.
    pub path: String,
    /// Text rendering of the actual side.
    pub actual: String,
    /// Text rendering of the expected side.
    pub expected: String,
    /// Human-readable explanation.
    pub reason: String,
    /// Nested diffs, populated for escaped JSON payload comparisons.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_diffs: Vec<Diff>,
}

impl Diff {
    pub(crate) fn new(
        kind: DiffKind,
        path: impl Into<String>,
        actual: impl Into<String>,
        expected: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            path: path.into(),
            actual: actual.into(),
            expected: expected.into(),
            reason: reason.into(),
            sub_diffs: vec![],
        }
    }
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} at path \"{}\": {}", self.kind, self.path, self.reason)?;
        writeln!(f, "    actual:")?;
        write!(f, "{}", self.actual.indent(8))?;
        if !self.expected.is_empty() {
            writeln!(f)?;
            writeln!(f, "    expected:")?;
            write!(f, "{}", self.expected.indent(8))?;
        }
        for sub in &self.sub_diffs {
            writeln!(f)?;
            write!(f, "{}", sub.to_string().trim_end().indent(4))?;
        }
        Ok(())
    }
}

/// Outcome of one comparison: the diff entries plus sparse "residual"
/// reconstructions of the two documents holding only the diverging subtrees.
///
/// Residual objects are keyed by field name; residual arrays are sparse
/// `index N` label maps rather than dense arrays. A residual side that ends
/// up empty is omitted.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct DiffResult {
    /// Every divergence found, in traversal order.
    pub diffs: Vec<Diff>,
    /// The slice of the actual document responsible for the diffs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residual_actual: Option<Value>,
    /// The slice of the expected document responsible for the diffs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residual_expected: Option<Value>,
}

impl DiffResult {
    /// True when the two documents matched under the configured rules.
    pub fn is_match(&self) -> bool {
        self.diffs.is_empty()
    }

    pub(crate) fn of(diff: Diff, residual_actual: Value, residual_expected: Value) -> Self {
        Self {
            diffs: vec![diff],
            residual_actual: Some(residual_actual),
            residual_expected: Some(residual_expected),
        }
    }
}

impl fmt::Display for DiffResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.diffs.is_empty() {
            return write!(f, "documents match");
        }
        writeln!(f, "{} difference(s):", self.diffs.len())?;
        for (i, diff) in self.diffs.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diff)?;
        }
        Ok(())
    }
}

/// Text rendering of a node: bare content for strings, JSON text otherwise.
pub(crate) fn render(node: &Value) -> String {
    match node {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) trait Indent {
    fn indent(&self, level: u32) -> String;
}

impl<T> Indent for T
where
    T: ToString,
{
    fn indent(&self, level: u32) -> String {
        let mut indent = String::new();
        for _ in 0..level {
            indent.push(' ');
        }

        self.to_string()
            .lines()
            .map(|line| format!("{}{}", indent, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render() {
        assert_eq!(render(&json!("plain")), "plain");
        assert_eq!(render(&json!(null)), "null");
        assert_eq!(render(&json!(1.5)), "1.5");
        assert_eq!(render(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_indent() {
        assert_eq!("  foo", "foo".indent(2));
        assert_eq!("  foo\n  bar", "foo\nbar".indent(2));
    }

    #[test]
    fn test_diff_display_includes_path_and_reason() {
        let diff = Diff::new(
            DiffKind::ValueMismatch,
            "$.a",
            "1",
            "2",
            "actual value [1] is not equal to expected [2]",
        );
        let rendered = diff.to_string();
        assert!(rendered.contains("$.a"));
        assert!(rendered.contains("actual value [1] is not equal to expected [2]"));
    }

    #[test]
    fn test_empty_result_is_match() {
        let result = DiffResult::default();
        assert!(result.is_match());
        assert_eq!(result.to_string(), "documents match");
        assert!(result.residual_actual.is_none());
        assert!(result.residual_expected.is_none());
    }
}
