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

//! PerfDiff CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! - **latency**: compare benchmark latencies of a commit against a base commit
//! - **compilation**: compare compilation times and dispatch sizes
//! - **completion**: generate shell completion scripts
//!
//! Both report commands accept the same options: `--base` files,
//! `--expected-commit` / `--base-commit` checks, `--size-cut` truncation,
//! a `--thresholds` rules file and an `--output` path.
//!
//! # Environment
//!
//! - `RUST_LOG`: overrides the log filter selected by `-v`
//! - `PERFDIFF_MAX_FILE_SIZE`: maximum input file size in bytes (default 100 MB)

pub mod cli;
pub mod commands;
pub mod error;

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter(verbose: u8) -> String {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    format!("perfdiff_core={level},perfdiff_cli={level}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter() {
        assert_eq!(default_log_filter(0), "perfdiff_core=warn,perfdiff_cli=warn");
        assert_eq!(default_log_filter(1), "perfdiff_core=info,perfdiff_cli=info");
        assert_eq!(default_log_filter(5), "perfdiff_core=debug,perfdiff_cli=debug");
    }
}
