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

//! Regressed / improved / similar / raw partitioning.

use crate::error::{ReportError, Result};
use crate::thresholds::{find_threshold, BenchmarkThreshold, ThresholdUnit};
use std::collections::BTreeMap;

/// Metrics of one category, keyed and ordered by name.
pub type MetricGroup<'a, T> = BTreeMap<&'a str, &'a T>;

/// Category of a metric relative to its base value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Worse than the base beyond tolerance.
    Regressed,
    /// Better than the base beyond tolerance.
    Improved,
    /// Within tolerance of the base.
    Similar,
    /// No base value to compare against.
    Raw,
}

/// The four groups produced by [`categorize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Categorized<'a, T> {
    pub regressed: MetricGroup<'a, T>,
    pub improved: MetricGroup<'a, T>,
    pub similar: MetricGroup<'a, T>,
    pub raw: MetricGroup<'a, T>,
}

impl<'a, T> Default for Categorized<'a, T> {
    fn default() -> Self {
        Self {
            regressed: BTreeMap::new(),
            improved: BTreeMap::new(),
            similar: BTreeMap::new(),
            raw: BTreeMap::new(),
        }
    }
}

impl<'a, T> Categorized<'a, T> {
    /// Returns the group of a category.
    pub fn group(&self, category: Category) -> &MetricGroup<'a, T> {
        match category {
            Category::Regressed => &self.regressed,
            Category::Improved => &self.improved,
            Category::Similar => &self.similar,
            Category::Raw => &self.raw,
        }
    }

    fn group_mut(&mut self, category: Category) -> &mut MetricGroup<'a, T> {
        match category {
            Category::Regressed => &mut self.regressed,
            Category::Improved => &mut self.improved,
            Category::Similar => &mut self.similar,
            Category::Raw => &mut self.raw,
        }
    }

    /// Total number of categorized metrics.
    pub fn len(&self) -> usize {
        self.regressed.len() + self.improved.len() + self.similar.len() + self.raw.len()
    }

    /// Returns whether no metric was categorized.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Deviation of `current` from `base` in the unit of `threshold`.
///
/// Percentage rules yield `|current - base| / base * 100`; a rule in the
/// metric's own unit yields the absolute difference.
pub fn deviation(
    current: u64,
    base: u64,
    threshold: &BenchmarkThreshold,
    metric_unit: &str,
) -> Result<f64> {
    let diff = current.abs_diff(base) as f64;
    match &threshold.unit {
        ThresholdUnit::Percentage => Ok(if diff == 0.0 {
            0.0
        } else if base == 0 {
            f64::INFINITY
        } else {
            diff / base as f64 * 100.0
        }),
        ThresholdUnit::Absolute(unit) if unit == metric_unit => Ok(diff),
        ThresholdUnit::Absolute(unit) => Err(ReportError::unit_mismatch(metric_unit, unit.as_str())),
    }
}

/// Classifies a single metric.
///
/// Metrics without a base are [`Category::Raw`] and never looked up in
/// `thresholds`. A deviation equal to the threshold is still similar.
pub fn classify(
    name: &str,
    current: u64,
    base: Option<u64>,
    thresholds: &[BenchmarkThreshold],
    metric_unit: &str,
) -> Result<Category> {
    let Some(base) = base else {
        return Ok(Category::Raw);
    };

    let threshold =
        find_threshold(thresholds, name).ok_or_else(|| ReportError::unmatched_threshold(name))?;
    let ratio = deviation(current, base, threshold, metric_unit)?;

    Ok(if ratio <= threshold.threshold {
        Category::Similar
    } else if current > base {
        Category::Regressed
    } else {
        Category::Improved
    })
}

/// Splits `metrics_map` into regressed, improved, similar and raw groups.
///
/// `metric_func` extracts the current and optional base value of the metric
/// being compared. The first configuration error aborts categorization.
pub fn categorize<'a, T, F>(
    metrics_map: &'a BTreeMap<String, T>,
    metric_func: F,
    thresholds: &[BenchmarkThreshold],
    metric_unit: &str,
) -> Result<Categorized<'a, T>>
where
    F: Fn(&T) -> (u64, Option<u64>),
{
    let mut categorized = Categorized::default();
    for (name, metrics) in metrics_map {
        let (current, base) = metric_func(metrics);
        let category = classify(name, current, base, thresholds, metric_unit)?;
        categorized
            .group_mut(category)
            .insert(name.as_str(), metrics);
    }

    tracing::debug!(
        unit = metric_unit,
        regressed = categorized.regressed.len(),
        improved = categorized.improved.len(),
        similar = categorized.similar.len(),
        raw = categorized.raw.len(),
        "categorized metrics"
    );
    Ok(categorized)
}
