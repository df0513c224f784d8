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

//! Markdown text primitives.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Prefix of every dashboard series link.
pub const PERFBOARD_SERIES_PREFIX: &str = "https://perf.iree.dev/serie?IREE?";

/// Characters escaped in series names: everything but alphanumerics,
/// `_.-~` and `()[]@,`.
const SERIES_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'(')
    .remove(b')')
    .remove(b'[')
    .remove(b']')
    .remove(b'@')
    .remove(b',');

/// Minimum column width of a rendered table.
const MIN_COLUMN_WIDTH: usize = 3;

/// Returns a header of the given level, e.g. `### text`.
pub fn header(text: &str, level: usize) -> String {
    format!("{} {}", "#".repeat(level.max(1)), text)
}

/// Returns an inline link.
pub fn link(text: &str, url: &str) -> String {
    format!("[{}]({})", text, url)
}

/// Returns italicized text.
pub fn italics(text: &str) -> String {
    format!("*{}*", text)
}

/// Percent-encodes a dashboard series name.
pub fn encode_series(series: &str) -> String {
    utf8_percent_encode(series, SERIES_ENCODE_SET).to_string()
}

/// Links `name` to a dashboard series; the series defaults to `name`.
pub fn series_link(name: &str, series: Option<&str>) -> String {
    let series = series.unwrap_or(name);
    let url = format!("{}{}", PERFBOARD_SERIES_PREFIX, encode_series(series));
    link(name, &url)
}

/// Renders a pipe table with a header row.
///
/// Every column is padded to its widest cell. Rows shorter than the header
/// are padded with empty cells; extra cells are dropped.
pub fn table<S: AsRef<str>>(headers: &[S], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .map(|h| h.as_ref().chars().count().max(MIN_COLUMN_WIDTH))
        .collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers.iter().map(|h| h.as_ref()), &widths));
    lines.push(format!(
        "|{}|",
        widths
            .iter()
            .map(|w| format!(" {} ", "-".repeat(*w)))
            .collect::<Vec<_>>()
            .join("|")
    ));
    for row in rows {
        lines.push(format_row(
            (0..widths.len()).map(|i| row.get(i).map(String::as_str).unwrap_or("")),
            &widths,
        ));
    }
    lines.join("\n")
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let cells: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let padding = width.saturating_sub(cell.chars().count());
            format!(" {}{} ", cell, " ".repeat(padding))
        })
        .collect();
    format!("|{}|", cells.join("|"))
}
