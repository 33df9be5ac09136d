//! Time-series metrics: peak period, average interest, trend direction
//!
//! Trend direction compares the means of a leading and a trailing window,
//! each `max(1, len / window_divisor)` points wide, against threshold
//! factors. The 3-way classification deliberately absorbs noise in short
//! series; the constants are configurable because they are empirical.

use crate::config::AnalysisConfig;
use crate::models::{PeakPeriod, TimeSeriesPoint, TrendDirection, TrendSummary};

/// Metrics derived from one keyword's interest series
///
/// All fields are absent for an empty series, never zeroed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesMetrics {
    pub peak: Option<PeakPeriod>,
    pub average: Option<f64>,
    pub trend: Option<TrendSummary>,
}

/// Analyzer for chronological interest series
#[derive(Debug, Clone)]
pub struct TimeSeriesAnalyzer {
    config: AnalysisConfig,
}

impl TimeSeriesAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Compute all metrics for one keyword's series
    #[must_use]
    pub fn analyze(&self, points: &[TimeSeriesPoint]) -> SeriesMetrics {
        SeriesMetrics {
            peak: Self::peak(points),
            average: Self::average(points),
            trend: self.trend(points),
        }
    }

    /// Point with the maximum value; ties go to the earliest timestamp
    #[must_use]
    pub fn peak(points: &[TimeSeriesPoint]) -> Option<PeakPeriod> {
        let mut best: Option<&TimeSeriesPoint> = None;
        for point in points {
            // Strictly greater keeps the earliest point on ties
            if best.map_or(true, |b| point.value > b.value) {
                best = Some(point);
            }
        }
        best.map(|p| PeakPeriod {
            peak_date: p.timestamp,
            peak_value: p.value,
        })
    }

    /// Arithmetic mean of all point values; `None` for an empty series
    #[must_use]
    pub fn average(points: &[TimeSeriesPoint]) -> Option<f64> {
        if points.is_empty() {
            return None;
        }
        let sum: u64 = points.iter().map(|p| u64::from(p.value)).sum();
        Some(sum as f64 / points.len() as f64)
    }

    /// Windowed early-vs-late trend comparison; `None` for an empty series
    #[must_use]
    pub fn trend(&self, points: &[TimeSeriesPoint]) -> Option<TrendSummary> {
        if points.is_empty() {
            return None;
        }

        let window = (points.len() / self.config.window_divisor).max(1);
        let start_average = Self::average(&points[..window])?;
        let end_average = Self::average(&points[points.len() - window..])?;

        let direction = if end_average > start_average * self.config.rising_factor {
            TrendDirection::Rising
        } else if end_average < start_average * self.config.declining_factor {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        };

        let change_percentage = if start_average > 0.0 {
            (end_average - start_average) / start_average * 100.0
        } else {
            0.0
        };

        Some(TrendSummary {
            direction,
            start_average,
            end_average,
            change_percentage,
        })
    }
}
