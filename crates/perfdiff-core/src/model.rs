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

//! Input records and aggregate metric values.
//!
//! The `*Results` types mirror the JSON files written by the CI benchmark
//! and compilation jobs. [`BenchmarkLatency`] and [`CompilationMetrics`] are
//! the per-name aggregates the categorizer and renderers work on.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregate latency numbers for one benchmark, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkLatency {
    /// Mean latency.
    pub mean_time: u64,
    /// Median latency.
    pub median_time: u64,
    /// Latency standard deviation.
    pub stddev_time: u64,
    /// Mean latency of the base commit to compare against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_mean_time: Option<u64>,
}

impl BenchmarkLatency {
    /// Creates an aggregate without a base value.
    pub fn new(mean_time: u64, median_time: u64, stddev_time: u64) -> Self {
        Self {
            mean_time,
            median_time,
            stddev_time,
            base_mean_time: None,
        }
    }

    /// Returns a copy carrying the given base mean time.
    pub fn with_base(self, base_mean_time: u64) -> Self {
        Self {
            base_mean_time: Some(base_mean_time),
            ..self
        }
    }
}

/// Identity of one compiled module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CompilationInfo {
    /// Explicit display name; wins over the model fields when non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub model_name: String,
    #[serde(default)]
    pub model_tags: Vec<String>,
    #[serde(default)]
    pub model_source: String,
    #[serde(default)]
    pub target_arch: String,
    #[serde(default)]
    pub compile_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gen_config_id: Option<String>,
}

impl CompilationInfo {
    /// Creates an identity that displays as `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

impl fmt::Display for CompilationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return f.write_str(name);
        }
        write!(
            f,
            "{} [{}] ({}) {} {}",
            self.model_name,
            self.model_tags.join(","),
            self.model_source,
            self.target_arch,
            self.compile_tags.join(",")
        )
    }
}

/// Compilation statistics of one module, optionally paired with base values.
///
/// Records are never mutated in place; see
/// [`crate::mapper::MetricsToTableMapper::update_base_value`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationMetrics {
    pub compilation_info: CompilationInfo,
    pub compilation_time_ms: u64,
    pub total_dispatch_component_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_compilation_time_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_total_dispatch_component_bytes: Option<u64>,
}

impl CompilationMetrics {
    /// Creates metrics without base values.
    pub fn new(
        compilation_info: CompilationInfo,
        compilation_time_ms: u64,
        total_dispatch_component_bytes: u64,
    ) -> Self {
        Self {
            compilation_info,
            compilation_time_ms,
            total_dispatch_component_bytes,
            base_compilation_time_ms: None,
            base_total_dispatch_component_bytes: None,
        }
    }
}

/// Unit of a reported benchmark time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[default]
    Ns,
    Us,
    Ms,
    S,
}

impl TimeUnit {
    /// Nanoseconds per one unit.
    pub fn nanos_per_unit(self) -> f64 {
        match self {
            TimeUnit::Ns => 1.0,
            TimeUnit::Us => 1e3,
            TimeUnit::Ms => 1e6,
            TimeUnit::S => 1e9,
        }
    }
}

/// Whether a run is a single iteration or a reported aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunType {
    #[default]
    Iteration,
    Aggregate,
}

/// One entry reported by the benchmark tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRun {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub run_type: RunType,
    /// `mean`, `median` or `stddev` for aggregate runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_name: Option<String>,
    pub real_time: f64,
    #[serde(default)]
    pub time_unit: TimeUnit,
}

impl BenchmarkRun {
    /// Real time converted to nanoseconds.
    pub fn real_time_ns(&self) -> f64 {
        self.real_time * self.time_unit.nanos_per_unit()
    }
}

/// Aggregates that can be read from a benchmark case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    Mean,
    Median,
    Stddev,
}

impl AggregateKind {
    /// The `aggregate_name` the benchmark tool reports for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            AggregateKind::Mean => "mean",
            AggregateKind::Median => "median",
            AggregateKind::Stddev => "stddev",
        }
    }
}

/// All runs reported for one benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkCase {
    pub name: String,
    #[serde(default)]
    pub results: Vec<BenchmarkRun>,
}

impl BenchmarkCase {
    /// Returns the aggregate time in nanoseconds.
    ///
    /// A reported aggregate run wins; otherwise the value is derived from
    /// the iteration runs.
    pub fn aggregate_time(&self, kind: AggregateKind) -> Result<u64> {
        if let Some(run) = self.results.iter().find(|run| {
            run.run_type == RunType::Aggregate && run.aggregate_name.as_deref() == Some(kind.as_str())
        }) {
            return Ok(to_nanos(run.real_time_ns()));
        }

        let samples: Vec<f64> = self
            .results
            .iter()
            .filter(|run| run.run_type == RunType::Iteration)
            .map(BenchmarkRun::real_time_ns)
            .collect();
        if samples.is_empty() {
            return Err(ReportError::missing_samples(&self.name, kind.as_str()));
        }

        let value = match kind {
            AggregateKind::Mean => mean(&samples),
            AggregateKind::Median => median(&samples),
            AggregateKind::Stddev => sample_stddev(&samples),
        };
        Ok(to_nanos(value))
    }

    /// Collapses the runs into a [`BenchmarkLatency`].
    pub fn latency(&self) -> Result<BenchmarkLatency> {
        Ok(BenchmarkLatency::new(
            self.aggregate_time(AggregateKind::Mean)?,
            self.aggregate_time(AggregateKind::Median)?,
            self.aggregate_time(AggregateKind::Stddev)?,
        ))
    }
}

/// A decoded benchmark results file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResults {
    pub commit: String,
    #[serde(default)]
    pub benchmarks: Vec<BenchmarkCase>,
}

/// Component size breakdown of a compiled module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModuleComponentSizes {
    #[serde(default)]
    pub file_bytes: u64,
    #[serde(default)]
    pub vm_component_bytes: u64,
    #[serde(default)]
    pub const_component_bytes: u64,
    pub total_dispatch_component_bytes: u64,
}

/// Statistics gathered while compiling one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationStatistics {
    pub compilation_info: CompilationInfo,
    pub compilation_time_ms: u64,
    pub module_component_sizes: ModuleComponentSizes,
}

impl CompilationStatistics {
    /// Converts the statistics into metrics without base values.
    pub fn to_metrics(&self) -> CompilationMetrics {
        CompilationMetrics::new(
            self.compilation_info.clone(),
            self.compilation_time_ms,
            self.module_component_sizes.total_dispatch_component_bytes,
        )
    }
}

/// A decoded compilation statistics file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationResults {
    pub commit: String,
    #[serde(default)]
    pub compilation_statistics: Vec<CompilationStatistics>,
}

fn to_nanos(value: f64) -> u64 {
    value.max(0.0).round() as u64
}

fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

fn median(samples: &[f64]) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn sample_stddev(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let avg = mean(samples);
    let variance = samples
        .iter()
        .map(|s| {
            let diff = s - avg;
            diff * diff
        })
        .sum::<f64>()
        / (samples.len() - 1) as f64;
    variance.sqrt()
}
