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

//! End-to-end tests: result files on disk to markdown report.

use perfdiff_core::{
    aggregate_all_benchmarks, apply_base_compilation_metrics, apply_base_latencies,
    collect_all_compilation_metrics, compose_compilation_report, compose_latency_report,
    compose_latency_report_with_config, ReportConfig, ReportError, ThresholdSet,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn benchmark_file(commit: &str, cases: &[(&str, f64)]) -> String {
    let benchmarks: Vec<String> = cases
        .iter()
        .map(|(name, ms)| {
            format!(
                r#"{{"name": "{name}", "results": [
                    {{"name": "BM/real_time", "run_type": "aggregate", "aggregate_name": "mean", "real_time": {ms}, "time_unit": "ms"}},
                    {{"name": "BM/real_time", "run_type": "aggregate", "aggregate_name": "median", "real_time": {ms}, "time_unit": "ms"}},
                    {{"name": "BM/real_time", "run_type": "aggregate", "aggregate_name": "stddev", "real_time": 0.25, "time_unit": "ms"}}
                ]}}"#
            )
        })
        .collect();
    format!(
        r#"{{"commit": "{commit}", "benchmarks": [{}]}}"#,
        benchmarks.join(",")
    )
}

fn compilation_file(commit: &str, modules: &[(&str, u64, u64)]) -> String {
    let stats: Vec<String> = modules
        .iter()
        .map(|(name, time, bytes)| {
            format!(
                r#"{{"compilation_info": {{"name": "{name}"}},
                    "compilation_time_ms": {time},
                    "module_component_sizes": {{"total_dispatch_component_bytes": {bytes}}}}}"#
            )
        })
        .collect();
    format!(
        r#"{{"commit": "{commit}", "compilation_statistics": [{}]}}"#,
        stats.join(",")
    )
}

#[test]
fn test_latency_report_end_to_end() {
    let dir = TempDir::new().unwrap();
    let current = [
        write(&dir, "pr-1.json", &benchmark_file("abc123", &[("A", 100.0), ("B", 55.0)])),
        write(&dir, "pr-2.json", &benchmark_file("abc123", &[("C", 10.0), ("New", 3.5)])),
    ];
    let base = [write(
        &dir,
        "base.json",
        &benchmark_file("base000", &[("A", 120.0), ("B", 50.0), ("C", 10.1)]),
    )];

    let current = aggregate_all_benchmarks(&current, Some("abc123")).unwrap();
    let base = aggregate_all_benchmarks(&base, Some("base000")).unwrap();
    let report = compose_latency_report(&apply_base_latencies(&current, &base), None).unwrap();

    let expected_sections = [
        "### Regressed Latencies 🚩",
        "### Improved Latencies 🎉",
        "### Similar Latencies",
        "### Raw Latencies",
    ];
    let positions: Vec<usize> = expected_sections
        .iter()
        .map(|section| report.find(section).unwrap())
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

    assert!(report.contains("55 (vs. 50, 10.00%↑)"));
    assert!(report.contains("100 (vs. 120, 16.67%↓)"));
    assert!(report.contains("10 (vs. 10.100, 0.99%↓)"));
    assert!(report.contains("[New](https://perf.iree.dev/serie?IREE?New)"));
    assert!(report.contains("| 3.500 "));
    assert!(report.contains("| 0.250 "));
}

#[test]
fn test_inconsistent_commit_is_rejected() {
    let dir = TempDir::new().unwrap();
    let files = [
        write(&dir, "a.json", &benchmark_file("abc123", &[("A", 1.0)])),
        write(&dir, "b.json", &benchmark_file("abc123", &[("B", 1.0)])),
    ];

    assert!(aggregate_all_benchmarks(&files, Some("abc123")).is_ok());
    let err = aggregate_all_benchmarks(&files, Some("xyz999")).unwrap_err();
    assert!(matches!(err, ReportError::Consistency { .. }));
}

#[test]
fn test_duplicate_across_files_is_rejected() {
    let dir = TempDir::new().unwrap();
    let files = [
        write(&dir, "a.json", &benchmark_file("abc123", &[("A", 1.0)])),
        write(&dir, "b.json", &benchmark_file("abc123", &[("A", 2.0)])),
    ];

    let err = aggregate_all_benchmarks(&files, None).unwrap_err();
    assert_eq!(err.to_string(), "Duplicated benchmarks: A");
}

#[test]
fn test_compilation_report_end_to_end() {
    let dir = TempDir::new().unwrap();
    let current = [write(
        &dir,
        "compile-pr.json",
        &compilation_file("abc123", &[("M", 50, 4096), ("N", 200, 1000)]),
    )];
    let base = [write(
        &dir,
        "compile-base.json",
        &compilation_file("base000", &[("M", 50, 4096), ("N", 100, 1000)]),
    )];

    let current = collect_all_compilation_metrics(&current, Some("abc123")).unwrap();
    let base = collect_all_compilation_metrics(&base, None).unwrap();
    let metrics = apply_base_compilation_metrics(&current, &base);

    let report = compose_compilation_report(&metrics, None).unwrap();
    assert!(report.starts_with("### Regressed Compilation Times 🚩"));
    assert!(report.contains("200 (vs. 100, 100.00%↑)"));
    assert!(!report.contains("Total Dispatch Sizes"));
    assert!(report.contains("### All Compilation Metrics"));
    assert!(report.contains("| Benchmark Name | Compilation Time (ms)"));

    let truncated = compose_compilation_report(&metrics, Some(1)).unwrap();
    assert!(!truncated.contains("All Compilation Metrics"));
}

#[test]
fn test_yaml_thresholds_drive_categorization() {
    let dir = TempDir::new().unwrap();
    let thresholds = write(
        &dir,
        "thresholds.yaml",
        "latency:\n  - { pattern: \"^A\", threshold: 25, unit: \"%\" }\n  - { pattern: \".*\", threshold: 5, unit: \"%\" }\n",
    );
    let current = [write(&dir, "pr.json", &benchmark_file("abc123", &[("A", 100.0)]))];
    let base = [write(&dir, "base.json", &benchmark_file("base000", &[("A", 120.0)]))];

    let config = ReportConfig::default().with_thresholds(ThresholdSet::load(&thresholds).unwrap());
    let current = aggregate_all_benchmarks(&current, None).unwrap();
    let base = aggregate_all_benchmarks(&base, None).unwrap();
    let report =
        compose_latency_report_with_config(&apply_base_latencies(&current, &base), &config)
            .unwrap();

    assert!(report.starts_with("### Similar Latencies"));
}
