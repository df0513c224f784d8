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

//! Compilation command - compilation statistics comparison report

use super::{report_config, write_output};
use crate::cli::ReportArgs;
use crate::error::CliError;
use perfdiff_core::{
    apply_base_compilation_metrics, collect_all_compilation_metrics,
    compose_compilation_report_with_config,
};

/// Collect compilation statistics, apply base values and write the report.
///
/// # Errors
///
/// Returns `Err` if:
/// - An input file cannot be read or decoded
/// - A file reports a commit other than the expected one
/// - A module name appears twice within the current or the base files
/// - The threshold rules do not cover a compared module
/// - Writing the report fails
pub fn compilation(args: &ReportArgs) -> Result<(), CliError> {
    let config = report_config(args)?;

    let mut metrics =
        collect_all_compilation_metrics(&args.files, args.expected_commit.as_deref())?;
    if !args.base.is_empty() {
        let base = collect_all_compilation_metrics(&args.base, args.base_commit.as_deref())?;
        tracing::info!(base = base.len(), "applying base compilation metrics");
        metrics = apply_base_compilation_metrics(&metrics, &base);
    }

    let report = compose_compilation_report_with_config(&metrics, &config)?;
    write_output(&report, args.output.as_deref())
}
