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

//! CLI command definitions and argument parsing.
//!
//! - [`report`]: report commands (latency, compilation)
//! - [`utility`]: utility commands (completion)

mod report;
mod utility;

use crate::error::CliError;
use clap::{ArgAction, Parser, Subcommand};

pub use report::{ReportArgs, ReportCommands};
pub use utility::UtilityCommands;

/// PerfDiff - benchmark comparison reports
///
/// Compares benchmark and compilation results of a commit against a base
/// commit and renders markdown tables of regressions and improvements.
///
/// # Examples
///
/// ```bash
/// # Latency report for a pull request, top 10 rows per table
/// perfdiff latency pr-*.json --base main.json --expected-commit abc123 --size-cut 10
///
/// # Compilation report with custom thresholds, written to a file
/// perfdiff compilation compile-pr.json --base compile-main.json \
///     --thresholds thresholds.yaml --output report.md
/// ```
#[derive(Parser)]
#[command(name = "perfdiff")]
#[command(author, version, about = "PerfDiff - benchmark comparison reports", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    // Report commands - flattened to appear at top level
    #[command(flatten)]
    Report(ReportCommands),

    // Utility commands - flattened to appear at top level
    #[command(flatten)]
    Utility(UtilityCommands),
}

impl Commands {
    /// Execute the command with the provided arguments.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the command fails; see each command for details.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            Commands::Report(cmd) => cmd.execute(),
            Commands::Utility(cmd) => cmd.execute(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_latency() {
        let cli = Cli::try_parse_from([
            "perfdiff",
            "-vv",
            "latency",
            "a.json",
            "b.json",
            "--base",
            "base1.json",
            "--base",
            "base2.json",
            "--size-cut",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Report(ReportCommands::Latency(args)) => {
                assert_eq!(args.files.len(), 2);
                assert_eq!(args.base.len(), 2);
                assert_eq!(args.size_cut, Some(5));
                assert_eq!(args.expected_commit, None);
            }
            _ => panic!("Expected latency command"),
        }
    }

    #[test]
    fn test_files_required() {
        assert!(Cli::try_parse_from(["perfdiff", "compilation"]).is_err());
    }
}
