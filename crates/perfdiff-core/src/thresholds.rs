// Dweve PerfDiff - Benchmark Comparison Reports
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Threshold rules deciding when a change is significant.
//!
//! Rules are ordered; the first rule whose pattern matches the start of a
//! metric name applies. Every built-in table ends with a catch-all rule.

use crate::error::{ReportError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Unit a threshold tolerance is expressed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ThresholdUnit {
    /// Tolerance is a percentage of the base value.
    Percentage,
    /// Tolerance is an absolute difference in the named unit (`ns`, `ms`, `bytes`, ...).
    Absolute(String),
}

impl ThresholdUnit {
    /// Shorthand for an absolute unit.
    pub fn absolute(unit: impl Into<String>) -> Self {
        ThresholdUnit::Absolute(unit.into())
    }

    /// The unit label, `%` for percentages.
    pub fn as_str(&self) -> &str {
        match self {
            ThresholdUnit::Percentage => "%",
            ThresholdUnit::Absolute(unit) => unit,
        }
    }
}

impl From<String> for ThresholdUnit {
    fn from(value: String) -> Self {
        if value == "%" {
            ThresholdUnit::Percentage
        } else {
            ThresholdUnit::Absolute(value)
        }
    }
}

impl From<ThresholdUnit> for String {
    fn from(value: ThresholdUnit) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ThresholdUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (name pattern, tolerance, unit) rule.
#[derive(Debug, Clone)]
pub struct BenchmarkThreshold {
    pattern: String,
    regex: Regex,
    /// Largest change still considered similar, inclusive.
    pub threshold: f64,
    pub unit: ThresholdUnit,
}

impl BenchmarkThreshold {
    /// Compiles a rule. The pattern is anchored at the start of the name.
    pub fn new(pattern: impl Into<String>, threshold: f64, unit: ThresholdUnit) -> Result<Self> {
        let pattern = pattern.into();
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|e| {
            ReportError::invalid_config(format!("invalid threshold pattern '{pattern}': {e}"))
        })?;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ReportError::invalid_config(format!(
                "threshold for '{pattern}' must be a non-negative number, got {threshold}"
            )));
        }
        Ok(Self {
            pattern,
            regex,
            threshold,
            unit,
        })
    }

    /// The pattern as written in the configuration.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns whether this rule applies to `name`.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

impl PartialEq for BenchmarkThreshold {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.threshold == other.threshold && self.unit == other.unit
    }
}

/// Serialized form of a [`BenchmarkThreshold`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub pattern: String,
    pub threshold: f64,
    pub unit: ThresholdUnit,
}

impl TryFrom<ThresholdRule> for BenchmarkThreshold {
    type Error = ReportError;

    fn try_from(rule: ThresholdRule) -> Result<Self> {
        BenchmarkThreshold::new(rule.pattern, rule.threshold, rule.unit)
    }
}

impl From<&BenchmarkThreshold> for ThresholdRule {
    fn from(threshold: &BenchmarkThreshold) -> Self {
        Self {
            pattern: threshold.pattern.clone(),
            threshold: threshold.threshold,
            unit: threshold.unit.clone(),
        }
    }
}

/// Returns the first rule matching `name`.
pub fn find_threshold<'a>(
    thresholds: &'a [BenchmarkThreshold],
    name: &str,
) -> Option<&'a BenchmarkThreshold> {
    thresholds.iter().find(|t| t.matches(name))
}

fn builtin(rules: &[(&str, f64, &str)]) -> Vec<BenchmarkThreshold> {
    rules
        .iter()
        .filter_map(|(pattern, threshold, unit)| {
            BenchmarkThreshold::new(*pattern, *threshold, ThresholdUnit::from(unit.to_string())).ok()
        })
        .collect()
}

/// Latency rules, matched against benchmark names.
pub static BENCHMARK_THRESHOLDS: Lazy<Vec<BenchmarkThreshold>> = Lazy::new(|| {
    builtin(&[
        // Noisy GPU benchmarks.
        (r"^DeepLabV3.*GPU-Mali", 20.0, "%"),
        (r"^MobileBertSquad.*GPU-Mali", 20.0, "%"),
        (r"^MobileNetV3Small.*GPU-Mali", 20.0, "%"),
        // Benchmarks finishing in about 1ms, where percentages are too strict.
        (r"^PersonDetect.*GPU-Adreno", 100_000.0, "ns"),
        (r"^MobileSSD.*GPU-Adreno", 100_000.0, "ns"),
        (r".*", 5.0, "%"),
    ])
});

/// Compilation time rules.
pub static COMPILATION_TIME_THRESHOLDS: Lazy<Vec<BenchmarkThreshold>> =
    Lazy::new(|| builtin(&[(r".*", 10.0, "%")]));

/// Total dispatch size rules.
pub static TOTAL_DISPATCH_SIZE_THRESHOLDS: Lazy<Vec<BenchmarkThreshold>> =
    Lazy::new(|| builtin(&[(r".*", 5.0, "%")]));

/// Threshold tables for every metric kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSet {
    pub latency: Vec<BenchmarkThreshold>,
    pub compilation_time: Vec<BenchmarkThreshold>,
    pub total_dispatch_size: Vec<BenchmarkThreshold>,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            latency: BENCHMARK_THRESHOLDS.clone(),
            compilation_time: COMPILATION_TIME_THRESHOLDS.clone(),
            total_dispatch_size: TOTAL_DISPATCH_SIZE_THRESHOLDS.clone(),
        }
    }
}

/// On-disk threshold configuration. Omitted tables keep the built-in rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<Vec<ThresholdRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compilation_time: Option<Vec<ThresholdRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_dispatch_size: Option<Vec<ThresholdRule>>,
}

fn compile_rules(
    rules: Option<Vec<ThresholdRule>>,
    fallback: &[BenchmarkThreshold],
) -> Result<Vec<BenchmarkThreshold>> {
    match rules {
        Some(rules) => rules.into_iter().map(BenchmarkThreshold::try_from).collect(),
        None => Ok(fallback.to_vec()),
    }
}

impl ThresholdSet {
    /// Builds a set from a parsed configuration file.
    pub fn from_file_config(config: ThresholdFile) -> Result<Self> {
        Ok(Self {
            latency: compile_rules(config.latency, BENCHMARK_THRESHOLDS.as_slice())?,
            compilation_time: compile_rules(
                config.compilation_time,
                COMPILATION_TIME_THRESHOLDS.as_slice(),
            )?,
            total_dispatch_size: compile_rules(
                config.total_dispatch_size,
                TOTAL_DISPATCH_SIZE_THRESHOLDS.as_slice(),
            )?,
        })
    }

    /// Parses a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ThresholdFile = serde_json::from_str(json)
            .map_err(|e| ReportError::invalid_config(format!("threshold JSON: {e}")))?;
        Self::from_file_config(config)
    }

    /// Parses a YAML configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ThresholdFile = serde_yaml::from_str(yaml)
            .map_err(|e| ReportError::invalid_config(format!("threshold YAML: {e}")))?;
        Self::from_file_config(config)
    }

    /// Loads a configuration file, choosing the format by extension.
    ///
    /// `.yaml` and `.yml` are read as YAML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| ReportError::io_error(path, e))?;
        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        tracing::debug!(path = %path.display(), yaml = is_yaml, "loading threshold configuration");
        if is_yaml {
            Self::from_yaml_str(&contents)
        } else {
            Self::from_json_str(&contents)
        }
    }
}
