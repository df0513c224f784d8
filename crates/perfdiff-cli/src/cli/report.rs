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

//! Report commands: latency and compilation.

use crate::commands;
use crate::error::CliError;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Options shared by every report command.
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Result files of the commit under test
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Result files of the base commit to compare against
    #[arg(short, long = "base", value_name = "FILE")]
    pub base: Vec<PathBuf>,

    /// Commit every input file must report
    #[arg(long, value_name = "SHA")]
    pub expected_commit: Option<String>,

    /// Commit every base file must report
    #[arg(long, value_name = "SHA")]
    pub base_commit: Option<String>,

    /// Show only the top N rows per table and skip unchanged results
    #[arg(short = 'n', long, value_name = "N")]
    pub size_cut: Option<usize>,

    /// Threshold rules file (JSON, or YAML with a .yaml/.yml extension)
    #[arg(short, long, value_name = "PATH")]
    pub thresholds: Option<PathBuf>,

    /// Output file path (defaults to stdout)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Report commands.
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Compare benchmark latencies
    ///
    /// Aggregates benchmark result files, applies base mean latencies and
    /// prints regressed, improved, similar and raw latency tables.
    Latency(ReportArgs),

    /// Compare compilation statistics
    ///
    /// Aggregates compilation statistics files, applies base values and
    /// prints regressed and improved tables per metric, followed by all
    /// compilation metrics.
    Compilation(ReportArgs),
}

impl ReportCommands {
    /// Execute the report command.
    ///
    /// # Errors
    ///
    /// Returns `Err` if loading, aggregation, categorization or writing fails.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            ReportCommands::Latency(args) => commands::latency(&args),
            ReportCommands::Compilation(args) => commands::compilation(&args),
        }
    }
}
