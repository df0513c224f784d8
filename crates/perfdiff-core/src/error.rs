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

//! Error types for report generation.
//!
//! Every variant is fatal: report generation is a single pass over its
//! inputs and nothing is retried. Callers decide whether a failure aborts
//! the CI job or is merely reported.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while aggregating, categorizing or rendering metrics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    /// An input file was produced for a different commit than expected.
    #[error("Inconsistent pull request commit in '{path}': expected '{expected}', found '{actual}'")]
    Consistency {
        /// The offending input file
        path: PathBuf,
        /// The commit every file must report
        expected: String,
        /// The commit the file reported
        actual: String,
    },

    /// The same benchmark or metric name appeared twice in one collection.
    #[error("Duplicated benchmarks: {name}")]
    DuplicateName {
        /// The repeated name
        name: String,
    },

    /// No threshold rule matches a metric name.
    ///
    /// This is a gap in the threshold configuration, not a data problem.
    #[error("No matched threshold setting for: {name}")]
    UnmatchedThreshold {
        /// The metric name without a rule
        name: String,
    },

    /// A threshold rule's absolute unit differs from the metric's unit.
    #[error("Mismatch between metric unit '{metric_unit}' and threshold unit '{threshold_unit}'")]
    UnitMismatch {
        /// The unit the metric is measured in
        metric_unit: String,
        /// The unit declared by the threshold rule
        threshold_unit: String,
    },

    /// A caller broke an API precondition.
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// A benchmark case carried no usable timing samples.
    #[error("Benchmark '{name}' has no {kind} sample")]
    MissingSamples {
        /// The benchmark case name
        name: String,
        /// The aggregate that could not be derived (mean, median, stddev)
        kind: String,
    },

    /// Reading an input file failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// An input file exceeds the configured size limit.
    #[error("File '{path}' is too large ({actual} bytes). Maximum allowed: {max} bytes")]
    FileTooLarge {
        /// The file path that exceeded the limit
        path: PathBuf,
        /// The actual file size in bytes
        actual: u64,
        /// The maximum allowed file size in bytes
        max: u64,
    },

    /// An input file is not a valid results record.
    #[error("Failed to decode '{path}': {message}")]
    Decode {
        /// The file path that failed to decode
        path: PathBuf,
        /// The decoder message
        message: String,
    },

    /// The threshold configuration is malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ReportError {
    /// Create a commit consistency error.
    pub fn consistency(
        path: impl Into<PathBuf>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Consistency {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a duplicate name error.
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    /// Create an unmatched threshold error.
    pub fn unmatched_threshold(name: impl Into<String>) -> Self {
        Self::UnmatchedThreshold { name: name.into() }
    }

    /// Create a unit mismatch error.
    pub fn unit_mismatch(metric_unit: impl Into<String>, threshold_unit: impl Into<String>) -> Self {
        Self::UnitMismatch {
            metric_unit: metric_unit.into(),
            threshold_unit: threshold_unit.into(),
        }
    }

    /// Create a contract violation error.
    pub fn contract_violation(msg: impl Into<String>) -> Self {
        Self::ContractViolation(msg.into())
    }

    /// Create a missing samples error.
    pub fn missing_samples(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::MissingSamples {
            name: name.into(),
            kind: kind.into(),
        }
    }

    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a file-too-large error.
    pub fn file_too_large(path: impl Into<PathBuf>, actual: u64, max: u64) -> Self {
        Self::FileTooLarge {
            path: path.into(),
            actual,
            max,
        }
    }

    /// Create a decode error.
    pub fn decode(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Returns whether the error points at the threshold configuration
    /// rather than at the input data.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::UnmatchedThreshold { .. } | Self::UnitMismatch { .. } | Self::InvalidConfig(_)
        )
    }
}
