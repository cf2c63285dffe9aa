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

#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

use compare::{CompareContext, Dispatcher};
use log::debug;
use serde_json::Value;

mod compare;
mod config;
mod diff;
mod path;

pub use config::{CompareConfig, ConfigError, DisorderRule};
pub use diff::{Diff, DiffKind, DiffResult};

/// Compares an actual JSON document against an expected one under the given
/// rule configuration.
///
/// The comparison is a pure function of its three inputs: structural
/// mismatches are reported as [`Diff`] entries, never as errors. The result
/// also carries the residual documents, the sparse slices of actual and
/// expected responsible for the diffs.
///
/// # Examples
///
/// ```
/// use json_contrast::{compare, CompareConfig, DiffKind};
/// use serde_json::json;
///
/// let actual = json!({"name": "Ada", "age": 36});
/// let expected = json!({"name": "Ada", "age": 37});
///
/// let result = compare(&actual, &expected, &CompareConfig::new());
/// assert_eq!(result.diffs.len(), 1);
/// assert_eq!(result.diffs[0].kind, DiffKind::ValueMismatch);
/// assert_eq!(result.diffs[0].path, "$.age");
/// ```
pub fn compare(actual: &Value, expected: &Value, config: &CompareConfig) -> DiffResult {
    compare_at(actual, expected, config, path::ROOT)
}

/// Like [`compare`], but starts the walk at an externally supplied path.
///
/// The path is prefixed with the `$` root sentinel if it is not rooted
/// already, so rule paths keep lining up with the reported diff paths.
///
/// # Examples
///
/// ```
/// use json_contrast::{compare_at, CompareConfig};
/// use serde_json::json;
///
/// let actual = json!({"age": 36});
/// let expected = json!({"age": 37});
///
/// let result = compare_at(&actual, &expected, &CompareConfig::new(), "user");
/// assert_eq!(result.diffs[0].path, "$.user.age");
/// ```
pub fn compare_at(
    actual: &Value,
    expected: &Value,
    config: &CompareConfig,
    start_path: &str,
) -> DiffResult {
    let result = Dispatcher::new().run(CompareContext {
        config,
        path: start_path.to_string(),
        actual,
        expected,
    });
    debug!("comparison finished with {} diff(s)", result.diffs.len());
    result
}
