mod array;
mod object;
mod scalar;

use crate::config::CompareConfig;
use crate::diff::{render, Diff, DiffKind, DiffResult};
use crate::path;
use array::ArrayComparator;
use log::debug;
use object::ObjectComparator;
use scalar::ScalarComparator;
use serde_json::Value;
use std::fmt;

/// Discriminated JSON node kind used for comparator dispatch and type-mismatch
/// reporting.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Null => write!(f, "null"),
            NodeKind::Boolean => write!(f, "boolean"),
            NodeKind::Number => write!(f, "number"),
            NodeKind::String => write!(f, "string"),
            NodeKind::Array => write!(f, "array"),
            NodeKind::Object => write!(f, "object"),
        }
    }
}

pub(crate) fn kind_of(node: &Value) -> NodeKind {
    match node {
        Value::Null => NodeKind::Null,
        Value::Bool(_) => NodeKind::Boolean,
        Value::Number(_) => NodeKind::Number,
        Value::String(_) => NodeKind::String,
        Value::Array(_) => NodeKind::Array,
        Value::Object(_) => NodeKind::Object,
    }
}

/// Everything one comparison step needs: the rule set, the rooted path of the
/// node pair, and the two nodes. Rebuilt per recursive call, so child calls
/// never see a sibling's path.
pub(crate) struct CompareContext<'a> {
    pub(crate) config: &'a CompareConfig,
    pub(crate) path: String,
    pub(crate) actual: &'a Value,
    pub(crate) expected: &'a Value,
}

impl<'a> CompareContext<'a> {
    pub(crate) fn child(
        &self,
        child_path: String,
        actual: &'a Value,
        expected: &'a Value,
    ) -> CompareContext<'a> {
        CompareContext {
            config: self.config,
            path: child_path,
            actual,
            expected,
        }
    }
}

/// One comparison policy per JSON node kind.
pub(crate) trait Comparator {
    fn compare(&self, ctx: &CompareContext<'_>, dispatcher: &Dispatcher) -> DiffResult;
}

/// Resolves the comparator for a node pair and funnels every comparison,
/// the top-level call and each recursive child call alike, through the
/// shared pre- and post-checks.
pub(crate) struct Dispatcher {
    scalar: ScalarComparator,
    array: ArrayComparator,
    object: ObjectComparator,
}

impl Dispatcher {
    pub(crate) fn new() -> Self {
        Self {
            scalar: ScalarComparator,
            array: ArrayComparator,
            object: ObjectComparator,
        }
    }

    /// The single entry point for every node-pair comparison.
    ///
    /// An ignored path short-circuits before anything else, including the
    /// kind check. A pair with identical serialized form needs no walk.
    /// Kind-mismatch detection is left to the comparators themselves.
    pub(crate) fn run(&self, mut ctx: CompareContext<'_>) -> DiffResult {
        ctx.path = path::rooted(&ctx.path).into_owned();

        if ctx.config.is_ignored(&ctx.path) {
            debug!("path [{}] is configured to be skipped", ctx.path);
            return DiffResult::default();
        }
        if ctx.actual.to_string() == ctx.expected.to_string() {
            return DiffResult::default();
        }

        let result = match kind_of(ctx.actual) {
            NodeKind::Array => self.array.compare(&ctx, self),
            NodeKind::Object => self.object.compare(&ctx, self),
            _ => self.scalar.compare(&ctx, self),
        };

        debug!(
            "comparison at [{}] produced {} diff(s)",
            ctx.path,
            result.diffs.len()
        );
        result
    }
}

/// Shared kind check run by every comparator before its own policy. A null on
/// either side is reported as a one-sided value, never as a type mismatch.
pub(crate) fn check_kinds(ctx: &CompareContext<'_>) -> Option<DiffResult> {
    let actual_kind = kind_of(ctx.actual);
    let expected_kind = kind_of(ctx.expected);
    if actual_kind == expected_kind {
        return None;
    }

    let (kind, reason) = if actual_kind == NodeKind::Null {
        (
            DiffKind::OnlyInExpected,
            format!("value [{}] only exists in expected", render(ctx.expected)),
        )
    } else if expected_kind == NodeKind::Null {
        (
            DiffKind::OnlyInActual,
            format!("value [{}] only exists in actual", render(ctx.actual)),
        )
    } else {
        (
            DiffKind::TypeMismatch,
            format!(
                "actual type [{}] is not equal to expected type [{}]",
                actual_kind, expected_kind
            ),
        )
    };

    Some(DiffResult::of(
        Diff::new(
            kind,
            ctx.path.clone(),
            ctx.actual.to_string(),
            ctx.expected.to_string(),
            reason,
        ),
        ctx.actual.clone(),
        ctx.expected.clone(),
    ))
}
