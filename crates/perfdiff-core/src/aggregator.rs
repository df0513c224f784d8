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

//! Loading and merging of result files.
//!
//! Every collection is keyed by benchmark or module name. A name may appear
//! only once across all merged files, and when an expected commit is given
//! every file must have been produced for it.

use crate::error::{ReportError, Result};
use crate::mapper::{MetricsToTableMapper, COMPILATION_METRIC_KINDS};
use crate::model::{BenchmarkLatency, BenchmarkResults, CompilationMetrics, CompilationResults};
use serde::de::DeserializeOwned;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default maximum input file size (100 MB).
///
/// Can be overridden via the `PERFDIFF_MAX_FILE_SIZE` environment variable.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Environment variable overriding [`DEFAULT_MAX_FILE_SIZE`], in bytes.
pub const MAX_FILE_SIZE_ENV: &str = "PERFDIFF_MAX_FILE_SIZE";

fn max_file_size() -> u64 {
    std::env::var(MAX_FILE_SIZE_ENV)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
}

/// Reads and decodes one JSON file.
///
/// The size is checked through `fs::metadata()` before anything is read.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let metadata = fs::metadata(path).map_err(|e| ReportError::io_error(path, e))?;
    let max = max_file_size();
    if metadata.len() > max {
        return Err(ReportError::file_too_large(path, metadata.len(), max));
    }

    let contents = fs::read_to_string(path).map_err(|e| ReportError::io_error(path, e))?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "loaded input file");
    serde_json::from_str(&contents).map_err(|e| ReportError::decode(path, e))
}

fn check_commit(path: &Path, commit: &str, expected_commit: Option<&str>) -> Result<()> {
    match expected_commit {
        Some(expected) if expected != commit => {
            Err(ReportError::consistency(path, expected, commit))
        }
        _ => Ok(()),
    }
}

fn insert_unique<T>(map: &mut BTreeMap<String, T>, name: String, value: T) -> Result<()> {
    match map.entry(name) {
        Entry::Occupied(entry) => Err(ReportError::duplicate_name(entry.key().as_str())),
        Entry::Vacant(entry) => {
            entry.insert(value);
            Ok(())
        }
    }
}

/// Merges decoded benchmark results into per-benchmark latencies.
///
/// Each record is paired with the path it was read from, for error context.
pub fn aggregate_benchmark_results(
    records: &[(PathBuf, BenchmarkResults)],
    expected_commit: Option<&str>,
) -> Result<BTreeMap<String, BenchmarkLatency>> {
    let mut latencies = BTreeMap::new();
    for (path, results) in records {
        check_commit(path, &results.commit, expected_commit)?;
        for case in &results.benchmarks {
            insert_unique(&mut latencies, case.name.clone(), case.latency()?)?;
        }
    }
    Ok(latencies)
}

/// Loads benchmark result files and merges them into per-benchmark latencies.
pub fn aggregate_all_benchmarks<P: AsRef<Path>>(
    files: &[P],
    expected_commit: Option<&str>,
) -> Result<BTreeMap<String, BenchmarkLatency>> {
    let records = files
        .iter()
        .map(|file| {
            let path = file.as_ref();
            load_json::<BenchmarkResults>(path).map(|results| (path.to_path_buf(), results))
        })
        .collect::<Result<Vec<_>>>()?;

    let latencies = aggregate_benchmark_results(&records, expected_commit)?;
    tracing::info!(
        files = files.len(),
        benchmarks = latencies.len(),
        "aggregated benchmark results"
    );
    Ok(latencies)
}

/// Merges decoded compilation statistics into per-module metrics, keyed by
/// the module's display name.
pub fn collect_compilation_results(
    records: &[(PathBuf, CompilationResults)],
    expected_commit: Option<&str>,
) -> Result<BTreeMap<String, CompilationMetrics>> {
    let mut metrics = BTreeMap::new();
    for (path, results) in records {
        check_commit(path, &results.commit, expected_commit)?;
        for statistics in &results.compilation_statistics {
            let name = statistics.compilation_info.to_string();
            insert_unique(&mut metrics, name, statistics.to_metrics())?;
        }
    }
    Ok(metrics)
}

/// Loads compilation statistics files and merges them into per-module metrics.
pub fn collect_all_compilation_metrics<P: AsRef<Path>>(
    files: &[P],
    expected_commit: Option<&str>,
) -> Result<BTreeMap<String, CompilationMetrics>> {
    let records = files
        .iter()
        .map(|file| {
            let path = file.as_ref();
            load_json::<CompilationResults>(path).map(|results| (path.to_path_buf(), results))
        })
        .collect::<Result<Vec<_>>>()?;

    let metrics = collect_compilation_results(&records, expected_commit)?;
    tracing::info!(
        files = files.len(),
        modules = metrics.len(),
        "collected compilation metrics"
    );
    Ok(metrics)
}

/// Returns `current` with base mean times taken from `base`.
///
/// Names missing from `base` keep no base value.
pub fn apply_base_latencies(
    current: &BTreeMap<String, BenchmarkLatency>,
    base: &BTreeMap<String, BenchmarkLatency>,
) -> BTreeMap<String, BenchmarkLatency> {
    current
        .iter()
        .map(|(name, latency)| {
            let latency = match base.get(name) {
                Some(base) => latency.with_base(base.mean_time),
                None => *latency,
            };
            (name.clone(), latency)
        })
        .collect()
}

/// Returns `current` with every registered metric kind's base value taken
/// from the matching record in `base`.
pub fn apply_base_compilation_metrics(
    current: &BTreeMap<String, CompilationMetrics>,
    base: &BTreeMap<String, CompilationMetrics>,
) -> BTreeMap<String, CompilationMetrics> {
    current
        .iter()
        .map(|(name, metrics)| {
            let metrics = match base.get(name) {
                Some(base) => COMPILATION_METRIC_KINDS
                    .iter()
                    .fold(metrics.clone(), |updated, kind| {
                        let (base_value, _) = kind.get_current_and_base_value(base);
                        kind.update_base_value(&updated, base_value)
                    }),
                None => metrics.clone(),
            };
            (name.clone(), metrics)
        })
        .collect()
}
