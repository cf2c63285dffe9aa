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

use crate::path;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Error raised when a comparison rule is malformed.
///
/// Structural differences between the two documents are never errors; they
/// are reported as [`Diff`](crate::Diff) entries. Only broken configuration
/// input fails fast.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A tolerance value could not be parsed as a decimal number.
    #[error("invalid tolerance [{value}] for path [{path}]: not a decimal number")]
    InvalidTolerance { path: String, value: String },
}

/// Disordered-array rule: the array at the configured path is compared as a
/// multiset. With a `unique_key`, elements are paired by equality of that
/// field's value; without one, pairing is greedy first-zero-diff matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisorderRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_key: Option<String>,
}

/// Configuration for how two JSON documents should be compared.
///
/// Each rule set is keyed by a path rooted at `$`; concrete array indices and
/// the `[*]` wildcard are interchangeable in rule paths, so
/// `$.employees[*].salary` applies to every element.
///
/// # Examples
///
/// ```
/// use json_contrast::CompareConfig;
///
/// let config = CompareConfig::new()
///     .ignore_path("$.timestamp")
///     .tolerance("$.score", "0.05".parse().unwrap())
///     .disordered_array_keyed("$.items", "id")
///     .field_mapping("$.user.uid", "id");
/// ```
///
/// The same configuration can be read from JSON:
///
/// ```
/// use json_contrast::CompareConfig;
///
/// let config = CompareConfig::from_json(
///     r#"{
///         "ignore_path": ["$.timestamp"],
///         "tolerant_path": {"$.score": "0.05"},
///         "array_with_disorder_path": {"$.items": {"unique_key": "id"}},
///         "field_mappings": {"$.user.uid": "id"}
///     }"#,
/// )
/// .unwrap();
/// assert!(config.is_ignored("$.timestamp"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Paths excluded from comparison entirely.
    #[serde(rename = "ignore_path", default, skip_serializing_if = "HashSet::is_empty")]
    ignore_paths: HashSet<String>,

    /// Arrays compared as multisets rather than sequences.
    #[serde(
        rename = "array_with_disorder_path",
        default,
        skip_serializing_if = "HashMap::is_empty"
    )]
    disordered_arrays: HashMap<String, DisorderRule>,

    /// Allowed absolute deviation for numeric nodes.
    #[serde(rename = "tolerant_path", default, skip_serializing_if = "HashMap::is_empty")]
    tolerances: HashMap<String, Decimal>,

    /// Aliases letting an actual field be compared against a differently
    /// named expected field.
    #[serde(rename = "field_mappings", default, skip_serializing_if = "HashMap::is_empty")]
    field_mappings: HashMap<String, String>,

    /// String nodes re-parsed as JSON and compared with a nested rule set.
    /// The nested rules are relative to the re-parsed document's own root.
    #[serde(rename = "escaped_json", default, skip_serializing_if = "HashMap::is_empty")]
    escaped_json: HashMap<String, CompareConfig>,
}

impl CompareConfig {
    /// Constructs an empty configuration: plain structural comparison.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a configuration from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Excludes a path from comparison.
    pub fn ignore_path(mut self, p: impl Into<String>) -> Self {
        self.ignore_paths.insert(p.into());
        self
    }

    /// Compares the array at `p` as a multiset, pairing elements greedily by
    /// content.
    pub fn disordered_array(mut self, p: impl Into<String>) -> Self {
        self.disordered_arrays
            .insert(p.into(), DisorderRule::default());
        self
    }

    /// Compares the array at `p` as a multiset, pairing elements by the value
    /// of `unique_key`.
    pub fn disordered_array_keyed(
        mut self,
        p: impl Into<String>,
        unique_key: impl Into<String>,
    ) -> Self {
        self.disordered_arrays.insert(
            p.into(),
            DisorderRule {
                unique_key: Some(unique_key.into()),
            },
        );
        self
    }

    /// Allows the number at `p` to deviate from the expected value by up to
    /// `tolerance` in either direction.
    pub fn tolerance(mut self, p: impl Into<String>, tolerance: Decimal) -> Self {
        self.tolerances.insert(p.into(), tolerance);
        self
    }

    /// Like [`CompareConfig::tolerance`] but parses the tolerance from text,
    /// failing fast on non-numeric input.
    pub fn try_tolerance(self, p: impl Into<String>, tolerance: &str) -> Result<Self, ConfigError> {
        let p = p.into();
        let parsed = tolerance
            .parse::<Decimal>()
            .map_err(|_| ConfigError::InvalidTolerance {
                path: p.clone(),
                value: tolerance.to_string(),
            })?;
        Ok(self.tolerance(p, parsed))
    }

    /// Compares the actual field at `p` against the expected field named
    /// `expected_field` instead of the same-named field.
    pub fn field_mapping(
        mut self,
        p: impl Into<String>,
        expected_field: impl Into<String>,
    ) -> Self {
        self.field_mappings.insert(p.into(), expected_field.into());
        self
    }

    /// Re-parses the string at `p` as JSON on both sides and compares the
    /// payloads with `nested`, whose rules are relative to the payload's own
    /// root.
    pub fn escaped_json(mut self, p: impl Into<String>, nested: CompareConfig) -> Self {
        self.escaped_json.insert(p.into(), nested);
        self
    }

    /// Checks whether `p` is excluded from comparison.
    pub fn is_ignored(&self, p: &str) -> bool {
        self.ignore_paths.contains(p) || self.ignore_paths.contains(path::normalize(p).as_ref())
    }

    pub(crate) fn disorder_at(&self, p: &str) -> Option<&DisorderRule> {
        lookup(&self.disordered_arrays, p)
    }

    pub(crate) fn tolerance_at(&self, p: &str) -> Option<Decimal> {
        lookup(&self.tolerances, p).copied()
    }

    pub(crate) fn mapping_at(&self, p: &str) -> Option<&str> {
        lookup(&self.field_mappings, p).map(String::as_str)
    }

    pub(crate) fn escaped_json_at(&self, p: &str) -> Option<&CompareConfig> {
        lookup(&self.escaped_json, p)
    }
}

// Exact path match wins; the wildcard-normalized form is the fallback.
fn lookup<'a, V>(rules: &'a HashMap<String, V>, p: &str) -> Option<&'a V> {
    rules
        .get(p)
        .or_else(|| rules.get(path::normalize(p).as_ref()))
}
