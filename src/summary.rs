//! Per-route summary aggregation.
//!
//! Sums the volume metrics (days, distance, elevation, elapsed time), takes
//! medians of the rate metrics (speeds, average heart rate) and the maximum
//! of peak heart rate. Metrics absent from every track stay absent — they
//! never materialize as zero.

use serde::Serialize;

use crate::error::{AtlasError, Result};
use crate::Track;

/// m/s to km/h.
const MS_TO_KMH: f64 = 3.6;

/// Aggregated statistics for one route group.
///
/// Each metric is `None` when no track in the group defines it, so callers
/// can tell a true zero apart from missing data. The display quirk of the
/// original maps (zero rows hidden) lives in [`RouteSummary::display_rows`],
/// not here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    /// Number of tracks (= days) in the route.
    pub day_count: usize,
    pub total_distance_km: Option<f64>,
    pub total_elevation_gain_m: Option<f64>,
    pub total_elevation_loss_m: Option<f64>,
    pub total_elapsed_hours: Option<f64>,
    pub median_avg_speed_kmh: Option<f64>,
    pub median_max_speed_kmh: Option<f64>,
    pub median_avg_heartrate: Option<f64>,
    pub max_heartrate: Option<f64>,
}

impl RouteSummary {
    /// Rows for the summary popup: `(label, value)` pairs with values
    /// rounded to one decimal place.
    ///
    /// Rows whose aggregated value is missing or exactly zero are dropped —
    /// the original maps treated zero as "not meaningful" and hid it. The
    /// raw `Option` fields remain available when the distinction matters.
    pub fn display_rows(&self) -> Vec<(String, String)> {
        let candidates = [
            ("Days", Some(self.day_count as f64)),
            ("Distance (km)", self.total_distance_km),
            ("Elevation Gain (m)", self.total_elevation_gain_m),
            ("Elevation Loss (m)", self.total_elevation_loss_m),
            ("Elapsed Time (hours)", self.total_elapsed_hours),
            ("Average Speed (km/h)", self.median_avg_speed_kmh),
            ("Max Speed (km/h)", self.median_max_speed_kmh),
            ("Average Heartrate", self.median_avg_heartrate),
            ("Max Heartrate", self.max_heartrate),
        ];

        candidates
            .into_iter()
            .filter_map(|(label, value)| {
                let value = value?;
                if value == 0.0 {
                    return None;
                }
                Some((label.to_string(), format!("{:.1}", value)))
            })
            .collect()
    }
}

/// Aggregate summary statistics over one route group.
///
/// Input order is irrelevant; all metric fields are individually optional,
/// so partial data never blocks aggregation.
///
/// # Errors
///
/// [`AtlasError::EmptyRouteGroup`] for empty input.
pub fn summarize_route(tracks: &[Track]) -> Result<RouteSummary> {
    if tracks.is_empty() {
        return Err(AtlasError::EmptyRouteGroup);
    }

    Ok(RouteSummary {
        day_count: tracks.len(),
        total_distance_km: sum_defined(tracks.iter().map(|t| t.distance_km)),
        total_elevation_gain_m: sum_defined(tracks.iter().map(|t| t.elevation_gain_m)),
        total_elevation_loss_m: sum_defined(tracks.iter().map(|t| t.elevation_loss_m)),
        total_elapsed_hours: sum_defined(tracks.iter().map(|t| t.elapsed_time_s))
            .map(|s| s / 3600.0),
        median_avg_speed_kmh: median_defined(tracks.iter().map(|t| t.avg_speed_ms))
            .map(|v| v * MS_TO_KMH),
        median_max_speed_kmh: median_defined(tracks.iter().map(|t| t.max_speed_ms))
            .map(|v| v * MS_TO_KMH),
        median_avg_heartrate: median_defined(tracks.iter().map(|t| t.avg_heartrate)),
        max_heartrate: max_defined(tracks.iter().map(|t| t.max_heartrate)),
    })
}

/// Sum of the defined values; `None` when every value is absent.
fn sum_defined(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let mut sum = None;
    for v in values.flatten() {
        sum = Some(sum.unwrap_or(0.0) + v);
    }
    sum
}

/// Maximum of the defined values; `None` when every value is absent.
fn max_defined(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    values.flatten().fold(None, |acc: Option<f64>, v| {
        Some(acc.map_or(v, |m| m.max(v)))
    })
}

/// Median of the defined values, averaging the two middle values for an
/// even count; `None` when every value is absent.
fn median_defined(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let mut defined: Vec<f64> = values.flatten().collect();
    if defined.is_empty() {
        return None;
    }
    defined.sort_by(|a, b| a.total_cmp(b));
    let mid = defined.len() / 2;
    if defined.len() % 2 == 0 {
        Some((defined[mid - 1] + defined[mid]) / 2.0)
    } else {
        Some(defined[mid])
    }
}
