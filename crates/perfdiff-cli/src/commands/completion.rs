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

//! Completion command - shell completion scripts

use crate::cli::Cli;
use crate::error::CliError;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::{self, Write};

/// Print the completion script for `shell` to stdout.
///
/// # Errors
///
/// Returns `Err` if flushing stdout fails.
pub fn completion(shell: Shell) -> Result<(), CliError> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    let mut stdout = io::stdout();
    generate(shell, &mut cmd, name, &mut stdout);
    stdout.flush().map_err(CliError::stdout)
}
