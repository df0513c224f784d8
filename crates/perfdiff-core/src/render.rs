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

//! Sorted, optionally truncated comparison tables.
//!
//! Rows are ordered by how far the current value moved away from the base,
//! largest first. Equal ratios fall back to name order, so the rendered
//! table depends only on the metric values.

use crate::categorizer::MetricGroup;
use crate::error::{ReportError, Result};
use crate::mapper::MetricsToTableMapper;
use crate::markdown::{italics, series_link, table};
use crate::model::BenchmarkLatency;

/// Column headers of every latency table.
pub const BENCHMARK_RESULTS_HEADERS: [&str; 4] = [
    "Benchmark Name",
    "Average Latency (ms)",
    "Median Latency (ms)",
    "Latency Standard Deviation (ms)",
];

const NANOS_PER_MILLI: f64 = 1e6;

/// Formats integer-valued numbers without decimals, others with three.
pub fn fixed_point_str(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.0}", value.floor())
    } else {
        format!("{:.3}", value)
    }
}

/// Relative deviation `|current - base| / base`.
///
/// A zero base yields `0` for an unchanged value and infinity otherwise.
pub fn deviation_ratio(current: f64, base: f64) -> f64 {
    let diff = (current - base).abs();
    if diff == 0.0 {
        0.0
    } else if base == 0.0 {
        f64::INFINITY
    } else {
        diff / base
    }
}

/// `"<current> (vs. <base>, <pct>%<arrow>)"`, or just the current value
/// when there is no base.
pub fn compare_text(current: f64, base: Option<f64>) -> String {
    let Some(base) = base else {
        return fixed_point_str(current);
    };

    let direction = if current > base {
        "↑"
    } else if current < base {
        "↓"
    } else {
        ""
    };
    format!(
        "{} (vs. {}, {:.2}%{})",
        fixed_point_str(current),
        fixed_point_str(base),
        deviation_ratio(current, base) * 100.0,
        direction
    )
}

/// Renders `rows` under `headers`, keeping only the first `size_cut` rows.
///
/// A note with the shown and total row counts follows a truncated table.
pub fn add_header_and_get_markdown_table<S: AsRef<str>>(
    headers: &[S],
    rows: &[Vec<String>],
    size_cut: Option<usize>,
) -> String {
    let total = rows.len();
    let shown = match size_cut {
        Some(cut) => &rows[..cut.min(total)],
        None => rows,
    };

    let mut rendered = table(headers, shown);
    if let Some(cut) = size_cut.filter(|cut| *cut < total) {
        rendered.push_str("\n\n");
        rendered.push_str(&italics(&format!(
            "[Top {} out of {} results showed]",
            cut, total
        )));
    }
    rendered
}

struct SortedRow {
    ratio: f64,
    name: String,
    cells: Vec<String>,
}

fn sort_rows(mut rows: Vec<SortedRow>) -> Vec<Vec<String>> {
    rows.sort_by(|a, b| b.ratio.total_cmp(&a.ratio).then_with(|| a.name.cmp(&b.name)));
    rows.into_iter().map(|row| row.cells).collect()
}

fn nanos_to_millis(nanos: u64) -> f64 {
    nanos as f64 / NANOS_PER_MILLI
}

/// Renders a latency group sorted by mean time deviation.
///
/// Entries without a base show their current mean only and sort as
/// unchanged.
pub fn render_latency_table(
    benchmarks: &MetricGroup<'_, BenchmarkLatency>,
    size_cut: Option<usize>,
) -> String {
    let rows = benchmarks
        .iter()
        .map(|(name, latency)| {
            let current = nanos_to_millis(latency.mean_time);
            let base = latency.base_mean_time.map(nanos_to_millis);
            SortedRow {
                ratio: base.map_or(0.0, |base| deviation_ratio(current, base)),
                name: name.to_string(),
                cells: vec![
                    series_link(name, None),
                    compare_text(current, base),
                    fixed_point_str(nanos_to_millis(latency.median_time)),
                    fixed_point_str(nanos_to_millis(latency.stddev_time)),
                ],
            }
        })
        .collect();

    add_header_and_get_markdown_table(&BENCHMARK_RESULTS_HEADERS, &sort_rows(rows), size_cut)
}

/// Renders the current values of a latency group, in name order.
pub fn render_raw_latency_table(
    benchmarks: &MetricGroup<'_, BenchmarkLatency>,
    size_cut: Option<usize>,
) -> String {
    let rows: Vec<Vec<String>> = benchmarks
        .iter()
        .map(|(name, latency)| {
            vec![
                series_link(name, None),
                fixed_point_str(nanos_to_millis(latency.mean_time)),
                fixed_point_str(nanos_to_millis(latency.median_time)),
                fixed_point_str(nanos_to_millis(latency.stddev_time)),
            ]
        })
        .collect();

    add_header_and_get_markdown_table(&BENCHMARK_RESULTS_HEADERS, &rows, size_cut)
}

/// Renders a group through `mapper`, sorted by deviation.
///
/// Every entry must carry a base value.
pub fn render_generic_metric_table<T, M>(
    metrics: &MetricGroup<'_, T>,
    mapper: &M,
    headers: &[String],
    size_cut: Option<usize>,
) -> Result<String>
where
    M: MetricsToTableMapper<T> + ?Sized,
{
    let rows = metrics
        .iter()
        .map(|(name, obj)| {
            let (current, base) = mapper.get_current_and_base_value(obj);
            let base = base.ok_or_else(|| {
                ReportError::contract_violation(format!("'{name}' has no base value to sort by"))
            })?;
            let (current, base) = (current as f64, base as f64);
            let series = mapper.get_series_name(name);
            Ok(SortedRow {
                ratio: deviation_ratio(current, base),
                name: name.to_string(),
                cells: vec![
                    series_link(name, Some(series.as_str())),
                    compare_text(current, Some(base)),
                ],
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(add_header_and_get_markdown_table(headers, &sort_rows(rows), size_cut))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::CompilationMetricKind;
    use crate::model::{CompilationInfo, CompilationMetrics};
    use std::collections::BTreeMap;

    fn latency(mean_ms: u64, base_ms: Option<u64>) -> BenchmarkLatency {
        BenchmarkLatency {
            mean_time: mean_ms * 1_000_000,
            median_time: mean_ms * 1_000_000,
            stddev_time: 500_000,
            base_mean_time: base_ms.map(|b| b * 1_000_000),
        }
    }

    fn data_rows(rendered: &str) -> Vec<&str> {
        rendered
            .lines()
            .skip(2)
            .take_while(|line| line.starts_with('|'))
            .collect()
    }

    #[test]
    fn test_fixed_point_str() {
        assert_eq!(fixed_point_str(4.0), "4");
        assert_eq!(fixed_point_str(4.12345), "4.123");
        assert_eq!(fixed_point_str(0.5), "0.500");
        assert_eq!(fixed_point_str(120.0), "120");
    }

    #[test]
    fn test_compare_text() {
        assert_eq!(compare_text(100.0, Some(120.0)), "100 (vs. 120, 16.67%↓)");
        assert_eq!(compare_text(120.0, Some(100.0)), "120 (vs. 100, 20.00%↑)");
        assert_eq!(compare_text(50.0, Some(50.0)), "50 (vs. 50, 0.00%)");
        assert_eq!(compare_text(1.5, None), "1.500");
    }

    #[test]
    fn test_truncation_note() {
        let rows: Vec<Vec<String>> = (0..5).map(|i| vec![i.to_string()]).collect();

        let rendered = add_header_and_get_markdown_table(&["N"], &rows, Some(2));
        assert_eq!(data_rows(&rendered).len(), 2);
        assert!(rendered.ends_with("\n\n*[Top 2 out of 5 results showed]*"));

        let rendered = add_header_and_get_markdown_table(&["N"], &rows, Some(5));
        assert_eq!(data_rows(&rendered).len(), 5);
        assert!(!rendered.contains("Top"));

        let rendered = add_header_and_get_markdown_table(&["N"], &rows, None);
        assert_eq!(data_rows(&rendered).len(), 5);
    }

    #[test]
    fn test_latency_table_sorted_by_ratio() {
        let mut map = BTreeMap::new();
        map.insert("Small".to_string(), latency(105, Some(100)));
        map.insert("Large".to_string(), latency(150, Some(100)));
        map.insert("Medium".to_string(), latency(120, Some(100)));
        let group: MetricGroup<'_, BenchmarkLatency> =
            map.iter().map(|(k, v)| (k.as_str(), v)).collect();

        let rendered = render_latency_table(&group, None);
        let rows = data_rows(&rendered);
        assert!(rows[0].contains("[Large]"));
        assert!(rows[1].contains("[Medium]"));
        assert!(rows[2].contains("[Small]"));
        assert!(rows[0].contains("150 (vs. 100, 50.00%↑)"));
        assert!(rows[0].contains("0.500"));
    }

    #[test]
    fn test_latency_table_ties_by_name() {
        let mut map = BTreeMap::new();
        map.insert("B".to_string(), latency(110, Some(100)));
        map.insert("A".to_string(), latency(110, Some(100)));
        let group: MetricGroup<'_, BenchmarkLatency> =
            map.iter().map(|(k, v)| (k.as_str(), v)).collect();

        let rendered = render_latency_table(&group, None);
        let rows = data_rows(&rendered);
        assert!(rows[0].contains("[A]"));
        assert!(rows[1].contains("[B]"));
    }

    #[test]
    fn test_latency_table_without_base() {
        let mut map = BTreeMap::new();
        map.insert("A".to_string(), latency(100, None));
        let group: MetricGroup<'_, BenchmarkLatency> =
            map.iter().map(|(k, v)| (k.as_str(), v)).collect();

        let rendered = render_latency_table(&group, None);
        assert!(rendered.contains("| 100 "));
        assert!(!rendered.contains("vs."));
    }

    #[test]
    fn test_generic_table_requires_base() {
        let mut map = BTreeMap::new();
        map.insert(
            "M".to_string(),
            CompilationMetrics::new(CompilationInfo::named("M"), 50, 4096),
        );
        let group: MetricGroup<'_, CompilationMetrics> =
            map.iter().map(|(k, v)| (k.as_str(), v)).collect();
        let headers = vec!["Benchmark Name".to_string(), "Compilation Time (ms)".to_string()];

        let err = render_generic_metric_table(
            &group,
            &CompilationMetricKind::CompilationTime,
            &headers,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::ContractViolation(_)));
    }

    #[test]
    fn test_generic_table_links_series() {
        let metrics = CompilationMetrics {
            base_compilation_time_ms: Some(40),
            ..CompilationMetrics::new(CompilationInfo::named("M"), 50, 4096)
        };
        let mut map = BTreeMap::new();
        map.insert("M".to_string(), metrics);
        let group: MetricGroup<'_, CompilationMetrics> =
            map.iter().map(|(k, v)| (k.as_str(), v)).collect();
        let headers = vec!["Benchmark Name".to_string(), "Compilation Time (ms)".to_string()];

        let rendered = render_generic_metric_table(
            &group,
            &CompilationMetricKind::CompilationTime,
            &headers,
            None,
        )
        .unwrap();
        assert!(rendered.contains(
            "[M](https://perf.iree.dev/serie?IREE?M%20[compilation%3Amodule%3Acompilation-time])"
        ));
        assert!(rendered.contains("50 (vs. 40, 25.00%↑)"));
    }
}
