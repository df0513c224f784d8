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

//! Structured error types for the PerfDiff CLI.
//!
//! All commands return `Result<T, CliError>`; `main` prints the message and
//! exits with a failure code.

use perfdiff_core::ReportError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for CLI operations.
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// Aggregation, categorization or rendering failed.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Writing the report failed.
    #[error("Failed to write '{path}': {message}")]
    Output {
        /// The output path
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// Writing to stdout failed.
    #[error("Failed to write to stdout: {0}")]
    Stdout(String),
}

impl CliError {
    /// Create an output file error.
    pub fn output(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Output {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a stdout error.
    pub fn stdout(source: io::Error) -> Self {
        Self::Stdout(source.to_string())
    }
}
