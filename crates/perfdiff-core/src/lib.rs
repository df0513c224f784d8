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

//! PerfDiff Core
//!
//! Benchmark comparison reports for CI: aggregates benchmark and compilation
//! result files, compares them against a base commit and renders categorized
//! markdown tables.
//!
//! ## Features
//!
//! - **Aggregation**: merge result files, enforce unique names and a single commit
//! - **Categorization**: regressed / improved / similar / raw, driven by
//!   ordered per-name threshold rules (percentage or absolute)
//! - **Rendering**: tables sorted by deviation, with optional top-N truncation
//!
//! ## Usage
//!
//! ```no_run
//! use perfdiff_core::{aggregate_all_benchmarks, apply_base_latencies, compose_latency_report};
//!
//! let current = aggregate_all_benchmarks(&["pr.json"], Some("abc123"))?;
//! let base = aggregate_all_benchmarks(&["main.json"], None)?;
//! let report = compose_latency_report(&apply_base_latencies(&current, &base), Some(10))?;
//! println!("{report}");
//! # Ok::<(), perfdiff_core::ReportError>(())
//! ```

pub mod aggregator;
pub mod categorizer;
pub mod error;
pub mod mapper;
pub mod markdown;
pub mod model;
pub mod render;
pub mod report;
pub mod thresholds;

pub use aggregator::{
    aggregate_all_benchmarks, aggregate_benchmark_results, apply_base_compilation_metrics,
    apply_base_latencies, collect_all_compilation_metrics, collect_compilation_results,
};
pub use categorizer::{categorize, Categorized, Category, MetricGroup};
pub use error::{ReportError, Result};
pub use mapper::{CompilationMetricKind, MetricsToTableMapper, COMPILATION_METRIC_KINDS};
pub use model::{
    BenchmarkLatency, BenchmarkResults, CompilationInfo, CompilationMetrics, CompilationResults,
};
pub use report::{
    compose_compilation_report, compose_compilation_report_with_config, compose_latency_report,
    compose_latency_report_with_config, ReportConfig,
};
pub use thresholds::{BenchmarkThreshold, ThresholdSet, ThresholdUnit};
