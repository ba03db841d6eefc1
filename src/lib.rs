//! # Camino Atlas
//!
//! Route segmentation, summaries and map plans for multi-day GPS track
//! collections.
//!
//! A *route* is a named multi-day journey (a camino); a *track* is one day's
//! recorded outing, backed by one GPX file. Given a catalog of tracks and
//! their parsed GPX traces, this library:
//! - orders the tracks within each route and picks representative
//!   start / midpoint / end tracks for annotation ([`segment`]),
//! - aggregates per-route summary statistics ([`summary`]),
//! - emits a declarative map plan (polylines, markers, popup text) for an
//!   external interactive-map renderer ([`plan`]).
//!
//! The library never renders anything itself: tile layers, marker shapes and
//! popups are emitted as data and handed to the renderer as JSON.
//!
//! ## Quick Start
//!
//! ```rust
//! use camino_atlas::{segment_route, summarize_route, ActivityKind, OrderKey, Track};
//!
//! let tracks: Vec<Track> = (1..=5)
//!     .map(|day| Track {
//!         path: format!("day{day}.gpx"),
//!         route_name: "Camino Frances".to_string(),
//!         family: None,
//!         order: OrderKey::Day(day),
//!         activity: ActivityKind::Hiking,
//!         distance_km: Some(25.0),
//!         ..Track::default()
//!     })
//!     .collect();
//!
//! let plan = segment_route(&tracks).unwrap();
//! let summary = summarize_route(&tracks).unwrap();
//! assert_eq!(plan.start_track.path, "day1.gpx");
//! assert_eq!(summary.total_distance_km, Some(125.0));
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{AtlasError, Result};

// Route segmentation (start / midpoint / end track selection)
pub mod segment;
pub use segment::{order_tracks, segment_route, MarkerKind, SegmentationPlan};

// Per-route summary aggregation
pub mod summary;
pub use summary::{summarize_route, RouteSummary};

// Track catalog loading and grouping
pub mod catalog;
pub use catalog::{group_by_route, load_catalog, load_catalog_file};

// GPX trace loading
pub mod trace;
pub use trace::{read_trace, scan_gpx_dir, Trace, TracePoint};

// Map plan assembly for the external renderer
pub mod plan;
pub use plan::{
    build_map_plan, planned_overlay, single_track_plan, MapConfig, MapPlan, MapStyle, MarkerPlan,
    OverlayPlan, RouteOptions, RoutePlan, TileLayer, TrackPlan,
};

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point. Coordinates are trusted: the GPX parser
    /// rejects out-of-range values before they reach this type.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Bounding box for a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from GPS points. Returns `None` for an empty slice.
    pub fn from_points(points: &[GpsPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;

        for p in points {
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
            min_lng = min_lng.min(p.longitude);
            max_lng = max_lng.max(p.longitude);
        }

        Some(Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    /// Merge with another bounding box.
    pub fn merge(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_lat: self.min_lat.min(other.min_lat),
            max_lat: self.max_lat.max(other.max_lat),
            min_lng: self.min_lng.min(other.min_lng),
            max_lng: self.max_lng.max(other.max_lng),
        }
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GpsPoint {
        GpsPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

/// What kind of outing a track records.
///
/// Informs map styling (polyline color, marker icon) only — segmentation and
/// summary logic never branch on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Cycling,
    Hiking,
    /// A planned route that has not been walked/ridden yet.
    Planned,
    #[default]
    Other,
}

impl ActivityKind {
    /// Parse an activity name from the catalog. Unknown names map to `Other`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "cycling" => ActivityKind::Cycling,
            "hiking" => ActivityKind::Hiking,
            "planned" => ActivityKind::Planned,
            _ => ActivityKind::Other,
        }
    }
}

/// The field defining chronological order of tracks within a route.
///
/// Either an explicit day number or the outing date. A route should use one
/// kind consistently; the derived ordering places all `Day` keys before all
/// `Date` keys, so mixing kinds within a route orders by kind first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKey {
    /// Explicit 1-based sequence number within the route.
    Day(u32),
    /// Calendar date of the outing.
    Date(NaiveDate),
}

/// One day's recorded outing, backed by one GPX file.
///
/// `path` is the unique identifier and the join key against parsed trace
/// data. Metric fields are individually optional; an absent metric is simply
/// excluded from aggregation, never treated as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub path: String,
    pub route_name: String,
    pub family: Option<String>,
    pub order: OrderKey,
    pub activity: ActivityKind,
    pub distance_km: Option<f64>,
    pub elevation_gain_m: Option<f64>,
    pub elevation_loss_m: Option<f64>,
    pub elapsed_time_s: Option<f64>,
    /// Average moving speed in m/s.
    pub avg_speed_ms: Option<f64>,
    /// Maximum speed in m/s.
    pub max_speed_ms: Option<f64>,
    pub avg_heartrate: Option<f64>,
    pub max_heartrate: Option<f64>,
}

impl Default for OrderKey {
    fn default() -> Self {
        OrderKey::Day(1)
    }
}

/// All tracks sharing one route name.
///
/// Ephemeral — constructed by [`group_by_route`], never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteGroup {
    pub route_name: String,
    pub family: Option<String>,
    pub tracks: Vec<Track>,
}

// ============================================================================
// Tests
// ============================================================================
