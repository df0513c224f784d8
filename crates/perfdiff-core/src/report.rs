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

//! Report composition.
//!
//! A report is a sequence of level-3 sections, each a header followed by a
//! table, joined by blank lines. Empty groups contribute no section.

use crate::categorizer::categorize;
use crate::error::Result;
use crate::mapper::{MetricsToTableMapper, COMPILATION_METRIC_KINDS};
use crate::markdown::{header, series_link};
use crate::model::{BenchmarkLatency, CompilationMetrics};
use crate::render::{
    add_header_and_get_markdown_table, compare_text, render_generic_metric_table,
    render_latency_table, render_raw_latency_table,
};
use crate::thresholds::ThresholdSet;
use std::collections::BTreeMap;

/// Header level of every report section.
const SECTION_LEVEL: usize = 3;

/// Unit latencies are categorized in.
const LATENCY_UNIT: &str = "ns";

const NAME_HEADER: &str = "Benchmark Name";

/// Report generation settings.
///
/// # Example
///
/// ```
/// use perfdiff_core::{ReportConfig, ThresholdSet};
///
/// let config = ReportConfig::default()
///     .with_size_cut(10)
///     .with_thresholds(ThresholdSet::default());
/// assert_eq!(config.size_cut, Some(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportConfig {
    /// Show only the top N rows of each table, and skip the similar and
    /// "all metrics" sections.
    pub size_cut: Option<usize>,
    /// Threshold rules per metric kind.
    pub thresholds: ThresholdSet,
}

impl ReportConfig {
    /// Creates a configuration with the built-in thresholds.
    pub fn new(size_cut: Option<usize>) -> Self {
        Self {
            size_cut,
            thresholds: ThresholdSet::default(),
        }
    }

    /// Sets the top-N truncation.
    pub fn with_size_cut(mut self, size_cut: usize) -> Self {
        self.size_cut = Some(size_cut);
        self
    }

    /// Sets the threshold rules.
    pub fn with_thresholds(mut self, thresholds: ThresholdSet) -> Self {
        self.thresholds = thresholds;
        self
    }
}

fn push_section(sections: &mut Vec<String>, title: &str, body: String) {
    sections.push(header(title, SECTION_LEVEL));
    sections.push(body);
}

/// Composes the latency report using the built-in thresholds.
pub fn compose_latency_report(
    benchmarks: &BTreeMap<String, BenchmarkLatency>,
    size_cut: Option<usize>,
) -> Result<String> {
    compose_latency_report_with_config(benchmarks, &ReportConfig::new(size_cut))
}

/// Composes the latency report.
///
/// Similar latencies are left out when the report is truncated.
pub fn compose_latency_report_with_config(
    benchmarks: &BTreeMap<String, BenchmarkLatency>,
    config: &ReportConfig,
) -> Result<String> {
    let groups = categorize(
        benchmarks,
        |latency: &BenchmarkLatency| (latency.mean_time, latency.base_mean_time),
        &config.thresholds.latency,
        LATENCY_UNIT,
    )?;
    let size_cut = config.size_cut;

    let mut sections = Vec::new();
    if !groups.regressed.is_empty() {
        push_section(
            &mut sections,
            "Regressed Latencies 🚩",
            render_latency_table(&groups.regressed, size_cut),
        );
    }
    if !groups.improved.is_empty() {
        push_section(
            &mut sections,
            "Improved Latencies 🎉",
            render_latency_table(&groups.improved, size_cut),
        );
    }
    if !groups.similar.is_empty() && size_cut.is_none() {
        push_section(
            &mut sections,
            "Similar Latencies",
            render_latency_table(&groups.similar, size_cut),
        );
    }
    if !groups.raw.is_empty() {
        push_section(
            &mut sections,
            "Raw Latencies",
            render_raw_latency_table(&groups.raw, size_cut),
        );
    }

    tracing::debug!(sections = sections.len() / 2, "composed latency report");
    Ok(sections.join("\n\n"))
}

/// Composes the compilation report using the built-in thresholds.
pub fn compose_compilation_report(
    metrics: &BTreeMap<String, CompilationMetrics>,
    size_cut: Option<usize>,
) -> Result<String> {
    compose_compilation_report_with_config(metrics, &ReportConfig::new(size_cut))
}

/// Composes the compilation report.
///
/// Each metric kind gets regressed and improved sections. An untruncated
/// report ends with every module's values for all kinds.
pub fn compose_compilation_report_with_config(
    metrics: &BTreeMap<String, CompilationMetrics>,
    config: &ReportConfig,
) -> Result<String> {
    let size_cut = config.size_cut;
    let mut sections = Vec::new();

    for kind in COMPILATION_METRIC_KINDS {
        let groups = categorize(
            metrics,
            |obj: &CompilationMetrics| kind.get_current_and_base_value(obj),
            kind.thresholds_in(&config.thresholds),
            kind.get_unit(),
        )?;

        let title = kind.get_table_title();
        let headers = vec![NAME_HEADER.to_string(), kind.get_table_header()];
        if !groups.regressed.is_empty() {
            let table = render_generic_metric_table(&groups.regressed, &kind, &headers, size_cut)?;
            push_section(&mut sections, &format!("Regressed {title} 🚩"), table);
        }
        if !groups.improved.is_empty() {
            let table = render_generic_metric_table(&groups.improved, &kind, &headers, size_cut)?;
            push_section(&mut sections, &format!("Improved {title} 🎉"), table);
        }
    }

    if size_cut.is_none() && !metrics.is_empty() {
        push_section(
            &mut sections,
            "All Compilation Metrics",
            render_all_compilation_metrics(metrics),
        );
    }

    tracing::debug!(sections = sections.len() / 2, "composed compilation report");
    Ok(sections.join("\n\n"))
}

fn render_all_compilation_metrics(metrics: &BTreeMap<String, CompilationMetrics>) -> String {
    let mut headers = vec![NAME_HEADER.to_string()];
    headers.extend(COMPILATION_METRIC_KINDS.iter().map(|kind| kind.get_table_header()));

    let rows: Vec<Vec<String>> = metrics
        .iter()
        .map(|(name, obj)| {
            let mut row = vec![name.clone()];
            for kind in COMPILATION_METRIC_KINDS {
                let (current, base) = kind.get_current_and_base_value(obj);
                let text = compare_text(current as f64, base.map(|b| b as f64));
                let series = kind.get_series_name(name);
                row.push(series_link(&text, Some(series.as_str())));
            }
            row
        })
        .collect();

    add_header_and_get_markdown_table(&headers, &rows, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use crate::model::CompilationInfo;
    use crate::thresholds::{BenchmarkThreshold, ThresholdUnit};

    fn latency(mean_ms: u64, base_ms: Option<u64>) -> BenchmarkLatency {
        BenchmarkLatency {
            mean_time: mean_ms * 1_000_000,
            median_time: mean_ms * 1_000_000,
            stddev_time: 0,
            base_mean_time: base_ms.map(|b| b * 1_000_000),
        }
    }

    fn compilation(
        name: &str,
        time: u64,
        base_time: u64,
        bytes: u64,
        base_bytes: u64,
    ) -> CompilationMetrics {
        CompilationMetrics {
            base_compilation_time_ms: Some(base_time),
            base_total_dispatch_component_bytes: Some(base_bytes),
            ..CompilationMetrics::new(CompilationInfo::named(name), time, bytes)
        }
    }

    fn latency_map() -> BTreeMap<String, BenchmarkLatency> {
        let mut map = BTreeMap::new();
        map.insert("Regressed".to_string(), latency(150, Some(100)));
        map.insert("Improved".to_string(), latency(100, Some(120)));
        map.insert("Similar".to_string(), latency(101, Some(100)));
        map.insert("Raw".to_string(), latency(42, None));
        map
    }

    #[test]
    fn test_latency_sections_in_order() {
        let report = compose_latency_report(&latency_map(), None).unwrap();

        let regressed = report.find("### Regressed Latencies 🚩").unwrap();
        let improved = report.find("### Improved Latencies 🎉").unwrap();
        let similar = report.find("### Similar Latencies").unwrap();
        let raw = report.find("### Raw Latencies").unwrap();
        assert!(regressed < improved && improved < similar && similar < raw);
        assert!(report.contains("100 (vs. 120, 16.67%↓)"));
        assert!(report.starts_with("### Regressed Latencies 🚩\n\n|"));
    }

    #[test]
    fn test_size_cut_drops_similar() {
        let report = compose_latency_report(&latency_map(), Some(3)).unwrap();
        assert!(!report.contains("Similar Latencies"));
        assert!(report.contains("Raw Latencies"));
    }

    #[test]
    fn test_empty_latency_report() {
        let report = compose_latency_report(&BTreeMap::new(), None).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = ThresholdSet {
            latency: vec![BenchmarkThreshold::new(".*", 0.5, ThresholdUnit::Percentage).unwrap()],
            ..ThresholdSet::default()
        };
        let config = ReportConfig::default().with_thresholds(strict);
        let report = compose_latency_report_with_config(&latency_map(), &config).unwrap();
        assert!(!report.contains("Similar Latencies"));
    }

    #[test]
    fn test_latency_unmatched_threshold() {
        let config = ReportConfig::default().with_thresholds(ThresholdSet {
            latency: Vec::new(),
            ..ThresholdSet::default()
        });
        let err = compose_latency_report_with_config(&latency_map(), &config).unwrap_err();
        assert!(matches!(err, ReportError::UnmatchedThreshold { .. }));
    }

    #[test]
    fn test_compilation_report() {
        let mut map = BTreeMap::new();
        map.insert("M".to_string(), compilation("M", 50, 50, 8192, 4096));

        let report = compose_compilation_report(&map, None).unwrap();
        assert!(!report.contains("Compilation Times 🚩"));
        assert!(report.contains("### Regressed Total Dispatch Sizes 🚩"));
        assert!(report.contains("8192 (vs. 4096, 100.00%↑)"));
        assert!(report.contains("### All Compilation Metrics"));
        assert!(report.contains(
            "[50 (vs. 50, 0.00%)](https://perf.iree.dev/serie?IREE?M%20[compilation%3Amodule%3Acompilation-time])"
        ));
    }

    #[test]
    fn test_compilation_report_with_size_cut() {
        let mut map = BTreeMap::new();
        map.insert("M".to_string(), compilation("M", 50, 50, 50, 50));
        map.insert("N".to_string(), compilation("N", 100, 50, 50, 50));

        let report = compose_compilation_report(&map, Some(5)).unwrap();
        assert_eq!(
            report.lines().next(),
            Some("### Regressed Compilation Times 🚩")
        );
        assert!(!report.contains("All Compilation Metrics"));
    }

    #[test]
    fn test_all_compilation_metrics_without_base() {
        let mut map = BTreeMap::new();
        map.insert(
            "M".to_string(),
            CompilationMetrics::new(CompilationInfo::named("M"), 50, 4096),
        );

        let report = compose_compilation_report(&map, None).unwrap();
        assert!(report.starts_with("### All Compilation Metrics"));
        assert!(report.contains("[4096](https://perf.iree.dev/serie?IREE?"));
    }

    #[test]
    fn test_empty_compilation_report() {
        assert_eq!(compose_compilation_report(&BTreeMap::new(), None).unwrap(), "");
    }
}
