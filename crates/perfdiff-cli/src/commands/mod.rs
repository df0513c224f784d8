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

//! CLI command implementations

mod completion;
mod compilation;
mod latency;

pub use compilation::compilation;
pub use completion::completion;
pub use latency::latency;

use crate::cli::ReportArgs;
use crate::error::CliError;
use perfdiff_core::{ReportConfig, ThresholdSet};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Builds the report configuration from command-line options.
///
/// Without `--thresholds` the built-in rules apply.
pub fn report_config(args: &ReportArgs) -> Result<ReportConfig, CliError> {
    let thresholds = match &args.thresholds {
        Some(path) => ThresholdSet::load(path)?,
        None => ThresholdSet::default(),
    };
    Ok(ReportConfig::new(args.size_cut).with_thresholds(thresholds))
}

/// Write a report to a file or stdout.
///
/// Files receive the report as is; stdout gets a trailing newline.
///
/// # Errors
///
/// Returns `Err` if file creation or writing fails.
pub fn write_output(content: &str, path: Option<&Path>) -> Result<(), CliError> {
    match path {
        Some(p) => fs::write(p, content).map_err(|e| CliError::output(p, e)),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", content).map_err(CliError::stdout)
        }
    }
}
