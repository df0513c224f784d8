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

//! Mapping of metric kinds to table columns.
//!
//! A [`MetricsToTableMapper`] tells the categorizer and the table renderer
//! how to read one metric out of a record: current and base value, unit,
//! dashboard series and headers. Compilation metrics ship two kinds,
//! registered in [`COMPILATION_METRIC_KINDS`].

use crate::model::CompilationMetrics;
use crate::thresholds::{
    BenchmarkThreshold, ThresholdSet, COMPILATION_TIME_THRESHOLDS, TOTAL_DISPATCH_SIZE_THRESHOLDS,
};

/// Dashboard series suffix for module compilation time.
pub const COMPILATION_TIME_SERIES_SUFFIX: &str = "compilation:module:compilation-time";

/// Dashboard series suffix for total dispatch component size.
pub const TOTAL_DISPATCH_SIZE_SERIES_SUFFIX: &str =
    "compilation:module:component-size:total-dispatch-size";

/// Reads one metric out of records of type `T`.
pub trait MetricsToTableMapper<T> {
    /// Returns a new record with this metric's base value set.
    fn update_base_value(&self, obj: &T, base_value: u64) -> T;

    /// Returns the current and base (if any) value.
    fn get_current_and_base_value(&self, obj: &T) -> (u64, Option<u64>);

    /// Returns the dashboard series name for `name`.
    fn get_series_name(&self, name: &str) -> String;

    /// Returns the unit of the metric value.
    fn get_unit(&self) -> &'static str;

    /// Returns the table column header.
    fn get_table_header(&self) -> String {
        format!("{} ({})", self.get_label(), self.get_unit())
    }

    /// Returns the metric label used in headers.
    fn get_label(&self) -> &'static str;

    /// Returns the built-in threshold rules for this metric.
    fn get_metric_thresholds(&self) -> &'static [BenchmarkThreshold];

    /// Returns the title used in section headers.
    fn get_table_title(&self) -> &'static str;
}

/// Metric kinds extracted from [`CompilationMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompilationMetricKind {
    /// Module compilation time in milliseconds.
    CompilationTime,
    /// Total size of dispatch components in bytes.
    TotalDispatchSize,
}

/// Every compilation metric kind, in report order.
pub const COMPILATION_METRIC_KINDS: [CompilationMetricKind; 2] = [
    CompilationMetricKind::CompilationTime,
    CompilationMetricKind::TotalDispatchSize,
];

impl CompilationMetricKind {
    /// Fixed dashboard series suffix of this kind.
    pub fn series_suffix(self) -> &'static str {
        match self {
            CompilationMetricKind::CompilationTime => COMPILATION_TIME_SERIES_SUFFIX,
            CompilationMetricKind::TotalDispatchSize => TOTAL_DISPATCH_SIZE_SERIES_SUFFIX,
        }
    }

    /// Picks this kind's rules from a configured set.
    pub fn thresholds_in(self, set: &ThresholdSet) -> &[BenchmarkThreshold] {
        match self {
            CompilationMetricKind::CompilationTime => set.compilation_time.as_slice(),
            CompilationMetricKind::TotalDispatchSize => set.total_dispatch_size.as_slice(),
        }
    }
}

impl MetricsToTableMapper<CompilationMetrics> for CompilationMetricKind {
    fn update_base_value(&self, obj: &CompilationMetrics, base_value: u64) -> CompilationMetrics {
        match self {
            CompilationMetricKind::CompilationTime => CompilationMetrics {
                base_compilation_time_ms: Some(base_value),
                ..obj.clone()
            },
            CompilationMetricKind::TotalDispatchSize => CompilationMetrics {
                base_total_dispatch_component_bytes: Some(base_value),
                ..obj.clone()
            },
        }
    }

    fn get_current_and_base_value(&self, obj: &CompilationMetrics) -> (u64, Option<u64>) {
        match self {
            CompilationMetricKind::CompilationTime => {
                (obj.compilation_time_ms, obj.base_compilation_time_ms)
            }
            CompilationMetricKind::TotalDispatchSize => (
                obj.total_dispatch_component_bytes,
                obj.base_total_dispatch_component_bytes,
            ),
        }
    }

    fn get_series_name(&self, name: &str) -> String {
        format!("{} [{}]", name, self.series_suffix())
    }

    fn get_unit(&self) -> &'static str {
        match self {
            CompilationMetricKind::CompilationTime => "ms",
            CompilationMetricKind::TotalDispatchSize => "bytes",
        }
    }

    fn get_label(&self) -> &'static str {
        match self {
            CompilationMetricKind::CompilationTime => "Compilation Time",
            CompilationMetricKind::TotalDispatchSize => "Total Dispatch Size",
        }
    }

    fn get_metric_thresholds(&self) -> &'static [BenchmarkThreshold] {
        match self {
            CompilationMetricKind::CompilationTime => COMPILATION_TIME_THRESHOLDS.as_slice(),
            CompilationMetricKind::TotalDispatchSize => TOTAL_DISPATCH_SIZE_THRESHOLDS.as_slice(),
        }
    }

    fn get_table_title(&self) -> &'static str {
        match self {
            CompilationMetricKind::CompilationTime => "Compilation Times",
            CompilationMetricKind::TotalDispatchSize => "Total Dispatch Sizes",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CompilationInfo;

    fn metrics() -> CompilationMetrics {
        CompilationMetrics::new(CompilationInfo::named("M"), 50, 4096)
    }

    #[test]
    fn test_update_base_value_leaves_original() {
        let original = metrics();
        let updated = CompilationMetricKind::CompilationTime.update_base_value(&original, 40);

        assert_eq!(original.base_compilation_time_ms, None);
        assert_eq!(updated.base_compilation_time_ms, Some(40));
        assert_eq!(updated.base_total_dispatch_component_bytes, None);

        let updated =
            CompilationMetricKind::TotalDispatchSize.update_base_value(&updated, 2048);
        assert_eq!(
            CompilationMetricKind::TotalDispatchSize.get_current_and_base_value(&updated),
            (4096, Some(2048))
        );
        assert_eq!(
            CompilationMetricKind::CompilationTime.get_current_and_base_value(&updated),
            (50, Some(40))
        );
    }

    #[test]
    fn test_series_names() {
        assert_eq!(
            CompilationMetricKind::CompilationTime.get_series_name("M"),
            "M [compilation:module:compilation-time]"
        );
        assert_eq!(
            CompilationMetricKind::TotalDispatchSize.get_series_name("M"),
            "M [compilation:module:component-size:total-dispatch-size]"
        );
    }

    #[test]
    fn test_headers_and_titles() {
        assert_eq!(
            CompilationMetricKind::CompilationTime.get_table_header(),
            "Compilation Time (ms)"
        );
        assert_eq!(
            CompilationMetricKind::TotalDispatchSize.get_table_header(),
            "Total Dispatch Size (bytes)"
        );
        assert_eq!(
            CompilationMetricKind::TotalDispatchSize.get_table_title(),
            "Total Dispatch Sizes"
        );
    }

    #[test]
    fn test_thresholds_in_set() {
        let set = ThresholdSet::default();
        for kind in COMPILATION_METRIC_KINDS {
            assert_eq!(kind.thresholds_in(&set), kind.get_metric_thresholds());
        }
    }
}
