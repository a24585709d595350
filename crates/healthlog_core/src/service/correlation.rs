//! Correlation engine over same-day trend samples.
//!
//! # Responsibility
//! - Align two metrics on calendar days within a trailing window.
//! - Compute the Pearson correlation coefficient over aligned pairs.
//! - Provide qualitative banding for human-readable labels.
//!
//! # Invariants
//! - Only days carrying both metrics are aligned; no interpolation.
//! - The coefficient is always within `[-1, 1]`.
//! - Degenerate input (no pairs, constant series) yields `0.0`, never an
//!   error.

use crate::model::enums::MetricKind;
use crate::model::record::Stored;
use crate::model::trend::TrendEntry;
use crate::repo::record_repo::RepoResult;
use crate::service::local_today;
use crate::service::query_service::QueryService;
use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

const STRONG_THRESHOLD: f64 = 0.7;
const MODERATE_THRESHOLD: f64 = 0.4;
const WEAK_THRESHOLD: f64 = 0.2;

/// Source of windowed trend samples.
pub trait TrendSource {
    /// Samples of `kind` dated within `[today - window_days, today]`,
    /// most-recent-first, same-day samples in insertion order.
    fn trends_in_window(
        &self,
        kind: MetricKind,
        window_days: i64,
        today: NaiveDate,
    ) -> RepoResult<Vec<Stored<TrendEntry>>>;
}

impl TrendSource for QueryService<'_, '_> {
    fn trends_in_window(
        &self,
        kind: MetricKind,
        window_days: i64,
        today: NaiveDate,
    ) -> RepoResult<Vec<Stored<TrendEntry>>> {
        self.trends_by_type_as_of(kind, window_days, today)
    }
}

/// How several samples of one metric on the same day collapse to one value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SameDayPolicy {
    /// The most recently inserted sample wins.
    #[default]
    LastWritten,
    /// Arithmetic mean of the day's samples.
    Mean,
}

/// One aligned day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrelationPoint {
    pub date: NaiveDate,
    pub x: f64,
    pub y: f64,
}

/// Correlation of two metrics plus the aligned series it was computed on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Correlation {
    pub metric_a: MetricKind,
    pub metric_b: MetricKind,
    /// Pearson r, unrounded.
    pub coefficient: f64,
    /// Aligned days in ascending date order.
    pub points: Vec<CorrelationPoint>,
}

impl Correlation {
    pub fn strength(&self) -> Strength {
        Strength::from_coefficient(self.coefficient)
    }

    pub fn direction(&self) -> Direction {
        Direction::from_coefficient(self.coefficient)
    }

    /// Label such as `strong negative` or `no correlation`.
    pub fn describe(&self) -> String {
        match self.strength() {
            Strength::None => "no correlation".to_string(),
            strength => format!("{strength} {}", self.direction()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Strong,
    Moderate,
    Weak,
    None,
}

impl Strength {
    pub fn from_coefficient(coefficient: f64) -> Self {
        let magnitude = coefficient.abs();
        if magnitude > STRONG_THRESHOLD {
            Self::Strong
        } else if magnitude > MODERATE_THRESHOLD {
            Self::Moderate
        } else if magnitude > WEAK_THRESHOLD {
            Self::Weak
        } else {
            Self::None
        }
    }
}

impl Display for Strength {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Weak => "weak",
            Self::None => "none",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Positive,
    Negative,
    None,
}

impl Direction {
    pub fn from_coefficient(coefficient: f64) -> Self {
        if coefficient > 0.0 {
            Self::Positive
        } else if coefficient < 0.0 {
            Self::Negative
        } else {
            Self::None
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::None => "no",
        })
    }
}

/// Correlation use-case service.
pub struct CorrelationService<S: TrendSource> {
    source: S,
    policy: SameDayPolicy,
}

impl<S: TrendSource> CorrelationService<S> {
    /// Creates a service with the default `SameDayPolicy::LastWritten`.
    pub fn new(source: S) -> Self {
        Self::with_policy(source, SameDayPolicy::default())
    }

    pub fn with_policy(source: S, policy: SameDayPolicy) -> Self {
        Self { source, policy }
    }

    /// Correlates two metrics over the window ending today.
    pub fn correlate(
        &self,
        metric_a: MetricKind,
        metric_b: MetricKind,
        window_days: i64,
    ) -> RepoResult<Correlation> {
        self.correlate_as_of(metric_a, metric_b, window_days, local_today())
    }

    /// Correlates two metrics over the window ending at `today`.
    pub fn correlate_as_of(
        &self,
        metric_a: MetricKind,
        metric_b: MetricKind,
        window_days: i64,
        today: NaiveDate,
    ) -> RepoResult<Correlation> {
        let series_a = self.source.trends_in_window(metric_a, window_days, today)?;
        let series_b = self.source.trends_in_window(metric_b, window_days, today)?;
        let correlation = self.build(metric_a, metric_b, &series_a, &series_b);

        info!(
            "event=correlate module=correlation status=ok metric_a={} metric_b={} window_days={} points={}",
            metric_a,
            metric_b,
            window_days,
            correlation.points.len()
        );
        Ok(correlation)
    }

    /// Correlates every unordered pair of `metrics`, in input order.
    ///
    /// Each metric is fetched once. Duplicate metrics in the input are
    /// skipped.
    pub fn correlation_matrix(
        &self,
        metrics: &[MetricKind],
        window_days: i64,
        today: NaiveDate,
    ) -> RepoResult<Vec<Correlation>> {
        let mut unique: Vec<MetricKind> = Vec::with_capacity(metrics.len());
        for metric in metrics {
            if !unique.contains(metric) {
                unique.push(*metric);
            }
        }

        let series = unique
            .iter()
            .map(|metric| self.source.trends_in_window(*metric, window_days, today))
            .collect::<RepoResult<Vec<_>>>()?;

        let mut correlations = Vec::new();
        for (i, metric_a) in unique.iter().enumerate() {
            for (j, metric_b) in unique.iter().enumerate().skip(i + 1) {
                correlations.push(self.build(*metric_a, *metric_b, &series[i], &series[j]));
            }
        }
        Ok(correlations)
    }

    fn build(
        &self,
        metric_a: MetricKind,
        metric_b: MetricKind,
        series_a: &[Stored<TrendEntry>],
        series_b: &[Stored<TrendEntry>],
    ) -> Correlation {
        let points = align(series_a, series_b, self.policy);
        let (xs, ys): (Vec<f64>, Vec<f64>) = points.iter().map(|p| (p.x, p.y)).unzip();
        Correlation {
            metric_a,
            metric_b,
            coefficient: pearson(&xs, &ys),
            points,
        }
    }
}

#[derive(Default)]
struct DaySamples {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

/// Aligns two sample series on calendar days.
///
/// Samples are consumed in the given order, so with
/// `SameDayPolicy::LastWritten` the later sample of a day wins. Days missing
/// either metric are dropped. Output is in ascending date order.
pub fn align(
    series_a: &[Stored<TrendEntry>],
    series_b: &[Stored<TrendEntry>],
    policy: SameDayPolicy,
) -> Vec<CorrelationPoint> {
    let mut days: BTreeMap<NaiveDate, DaySamples> = BTreeMap::new();
    for sample in series_a {
        days.entry(sample.date).or_default().xs.push(sample.value);
    }
    for sample in series_b {
        days.entry(sample.date).or_default().ys.push(sample.value);
    }

    days.into_iter()
        .filter_map(|(date, samples)| {
            let x = collapse(&samples.xs, policy)?;
            let y = collapse(&samples.ys, policy)?;
            Some(CorrelationPoint { date, x, y })
        })
        .collect()
}

fn collapse(values: &[f64], policy: SameDayPolicy) -> Option<f64> {
    match policy {
        SameDayPolicy::LastWritten => values.last().copied(),
        SameDayPolicy::Mean if values.is_empty() => None,
        SameDayPolicy::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
    }
}

/// Pearson correlation coefficient of two paired series.
///
/// Pairs beyond the shorter series are ignored. Returns `0.0` for empty
/// input or when either series has zero variance; the result is clamped to
/// `[-1, 1]` to absorb floating-point drift.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    if sum_sq_x == 0.0 || sum_sq_y == 0.0 {
        return 0.0;
    }
    (numerator / (sum_sq_x * sum_sq_y).sqrt()).clamp(-1.0, 1.0)
}
