//! Map plan assembly.
//!
//! Everything here is declarative: the plan describes which polylines to
//! draw, where the markers go and what text the popups carry. The actual
//! tiles, shapes and HTML widgets are the renderer's concern — the plan is
//! serialized to JSON and handed over.

use std::collections::HashMap;

use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, Result};
use crate::segment::{order_tracks, segment_route, MarkerKind};
use crate::summary::{summarize_route, RouteSummary};
use crate::trace::Trace;
use crate::{Bounds, GpsPoint, OrderKey, RouteGroup, Track};

/// Polyline weight used for all drawn tracks.
const TRACK_WEIGHT: f64 = 4.5;
/// Polyline opacity for recorded tracks.
const TRACK_OPACITY: f64 = 0.5;
/// Polyline opacity for planned-route overlays.
const PLANNED_OPACITY: f64 = 0.3;
/// Precision of encoded polylines (5 is the slippy-map convention).
const POLYLINE_PRECISION: u32 = 5;

/// A base tile layer the renderer can offer in its layer control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileLayer {
    pub name: &'static str,
    /// Tile URL template, or a provider id the renderer resolves itself.
    pub tiles: &'static str,
    pub attribution: Option<&'static str>,
}

const OPENSTREETMAP: TileLayer = TileLayer {
    name: "OpenStreet Map",
    tiles: "openstreetmap",
    attribution: None,
};

const NAT_GEO: TileLayer = TileLayer {
    name: "Nat Geo Map",
    tiles: "https://server.arcgisonline.com/ArcGIS/rest/services/NatGeo_World_Map/MapServer/tile/{z}/{y}/{x}",
    attribution: Some(
        "Tiles &copy; Esri &mdash; National Geographic, Esri, DeLorme, NAVTEQ, UNEP-WCMC, USGS, NASA, ESA, METI, NRCAN, GEBCO, NOAA, iPC",
    ),
};

const TERRAIN: TileLayer = TileLayer {
    name: "Terrain Map",
    tiles: "http://tile.stamen.com/terrain/{z}/{x}/{y}.jpg",
    attribution: Some("terrain-bcg"),
};

/// Which base tile layers the map offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapStyle {
    /// OpenStreetMap base with Nat Geo and terrain as alternatives.
    #[default]
    Regular,
    Terrain,
    NatGeo,
}

impl MapStyle {
    pub fn tile_layers(&self) -> Vec<TileLayer> {
        match self {
            MapStyle::Regular => vec![OPENSTREETMAP, NAT_GEO, TERRAIN],
            MapStyle::Terrain => vec![TERRAIN],
            MapStyle::NatGeo => vec![NAT_GEO],
        }
    }
}

/// Per-route display options, supplied by the caller instead of the
/// hard-coded route-name matching the original scripts used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteOptions {
    /// Whether the route's layer starts visible.
    pub visible: bool,
}

impl Default for RouteOptions {
    fn default() -> Self {
        // Maps with many routes start with all layers off
        Self { visible: false }
    }
}

/// Map-wide options.
#[derive(Debug, Clone, Default)]
pub struct MapConfig {
    pub style: MapStyle,
    pub zoom_level: Option<u8>,
    /// Draw a circle at the end of every non-final day of a route.
    pub mark_track_terminals: bool,
    pub terminal_radius_m: Option<f64>,
    pub fullscreen: bool,
    pub show_minimap: bool,
    /// Display options keyed by route name; absent routes use the default.
    pub route_options: HashMap<String, RouteOptions>,
}

impl MapConfig {
    const DEFAULT_ZOOM: u8 = 12;
    const DEFAULT_TERMINAL_RADIUS_M: f64 = 2000.0;

    pub fn zoom_level(&self) -> u8 {
        self.zoom_level.unwrap_or(Self::DEFAULT_ZOOM)
    }

    pub fn terminal_radius_m(&self) -> f64 {
        self.terminal_radius_m
            .unwrap_or(Self::DEFAULT_TERMINAL_RADIUS_M)
    }

    fn visible(&self, route_name: &str) -> bool {
        self.route_options
            .get(route_name)
            .copied()
            .unwrap_or_default()
            .visible
    }
}

/// One marker on the map. The kind implies the shape the renderer draws
/// (green circle + triangle for starts, red circle + square for ends, an
/// icon pin for summaries, a plain radius circle for day terminals).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerPlan {
    RouteStart {
        location: GpsPoint,
        fill_color: String,
        popup_html: String,
    },
    RouteEnd {
        location: GpsPoint,
        fill_color: String,
        popup_html: String,
    },
    RouteSummary {
        location: GpsPoint,
        color: String,
        icon: Option<String>,
        popup_html: String,
    },
    DayTerminal {
        location: GpsPoint,
        color: String,
        radius_m: f64,
        tooltip: String,
    },
}

/// One drawn polyline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackPlan {
    pub path: String,
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
    pub tooltip: Option<String>,
    pub points: Vec<GpsPoint>,
    /// Google-encoded polyline of `points`, for renderers that prefer it.
    pub encoded_polyline: String,
}

/// One route's layer: its polylines, markers and summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub route_name: String,
    pub visible: bool,
    pub tracks: Vec<TrackPlan>,
    pub markers: Vec<MarkerPlan>,
    pub summary: RouteSummary,
}

/// An extra overlay layer that is not a recorded route (planned journeys).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayPlan {
    pub name: String,
    pub visible: bool,
    pub tracks: Vec<TrackPlan>,
    pub markers: Vec<MarkerPlan>,
}

/// The complete handoff to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPlan {
    pub center: GpsPoint,
    pub zoom_level: u8,
    pub tile_layers: Vec<TileLayer>,
    pub fullscreen: bool,
    pub show_minimap: bool,
    pub routes: Vec<RoutePlan>,
    pub overlays: Vec<OverlayPlan>,
}

/// Polyline color and summary-marker icon for an activity.
fn activity_style(track: &Track) -> (&'static str, Option<&'static str>) {
    match track.activity {
        crate::ActivityKind::Cycling => ("red", Some("bicycle")),
        crate::ActivityKind::Hiking => ("green", Some("blind")),
        crate::ActivityKind::Planned => ("black", None),
        crate::ActivityKind::Other => ("red", None),
    }
}

fn encode_points(points: &[GpsPoint]) -> String {
    // LineString expects (x, y) = (lng, lat) order
    let line: LineString<f64> = points
        .iter()
        .map(|p| Coord {
            x: p.longitude,
            y: p.latitude,
        })
        .collect();
    polyline::encode_coordinates(line, POLYLINE_PRECISION).unwrap_or_default()
}

fn track_plan(track: &Track, trace: &Trace, tooltip: Option<String>, opacity: f64) -> TrackPlan {
    let (color, _) = activity_style(track);
    let points = trace.gps_points();
    let encoded_polyline = encode_points(&points);
    TrackPlan {
        path: track.path.clone(),
        color: color.to_string(),
        weight: TRACK_WEIGHT,
        opacity,
        tooltip,
        points,
        encoded_polyline,
    }
}

/// The summary popup: route heading plus the metric table rows.
fn summary_popup_html(heading: &str, rows: &[(String, String)]) -> String {
    let mut html = format!("<div align=\"center\"><h5>{heading}</h5></div>\n");
    html.push_str("<div align=\"center\"><table>\n");
    for (label, value) in rows {
        html.push_str(&format!("<tr><td>{label}</td><td>{value}</td></tr>\n"));
    }
    html.push_str("</table></div>");
    html
}

fn lookup<'a>(traces: &'a HashMap<String, Trace>, track: &Track) -> Result<&'a Trace> {
    traces.get(&track.path).ok_or_else(|| AtlasError::TraceNotFound {
        path: track.path.clone(),
    })
}

/// Build the layer plan for one route group.
fn build_route_plan(
    group: &RouteGroup,
    traces: &HashMap<String, Trace>,
    config: &MapConfig,
) -> Result<RoutePlan> {
    let segmentation = segment_route(&group.tracks)?;
    let summary = summarize_route(&group.tracks)?;
    let ordered = order_tracks(&group.tracks);

    let mut tracks = Vec::with_capacity(ordered.len());
    let mut markers = Vec::new();

    // Start marker on the first day's first point
    let start_trace = lookup(traces, &segmentation.start_track)?;
    markers.push(MarkerPlan::RouteStart {
        location: start_trace.start(),
        fill_color: "green".to_string(),
        popup_html: format!("Start of {}", group.route_name),
    });

    // Summary marker on the midpoint track
    let mid_trace = lookup(traces, &segmentation.mid_track)?;
    let location = match segmentation.marker_kind {
        MarkerKind::Mid => mid_trace.midpoint(),
        MarkerKind::End => mid_trace.end(),
    };
    let (color, icon) = activity_style(&segmentation.mid_track);
    markers.push(MarkerPlan::RouteSummary {
        location,
        color: color.to_string(),
        icon: icon.map(str::to_string),
        popup_html: summary_popup_html(&group.route_name, &summary.display_rows()),
    });

    // End marker on the last day's last point
    let end_trace = lookup(traces, &segmentation.end_track)?;
    markers.push(MarkerPlan::RouteEnd {
        location: end_trace.end(),
        fill_color: "red".to_string(),
        popup_html: format!("End of {}", group.route_name),
    });

    for (i, track) in ordered.iter().enumerate() {
        let trace = lookup(traces, track)?;
        tracks.push(track_plan(track, trace, None, TRACK_OPACITY));

        // Day terminals on every day but the route's last
        let is_final = track.path == segmentation.end_track.path;
        if config.mark_track_terminals && !is_final {
            let (color, _) = activity_style(track);
            let distance_km = track.distance_km.unwrap_or_else(|| trace.distance_km());
            // The catalog's own day number where one exists; date-ordered
            // routes fall back to the position in the sorted sequence.
            let day = match track.order {
                OrderKey::Day(day) => day,
                OrderKey::Date(_) => (i + 1) as u32,
            };
            markers.push(MarkerPlan::DayTerminal {
                location: trace.end(),
                color: color.to_string(),
                radius_m: config.terminal_radius_m(),
                tooltip: format!("End of day {day}. Distance: {distance_km:.1} km."),
            });
        }
    }

    Ok(RoutePlan {
        route_name: group.route_name.clone(),
        visible: config.visible(&group.route_name),
        tracks,
        markers,
        summary,
    })
}

/// Build the complete map plan for a set of route groups.
///
/// Every catalog track must have a trace in `traces`, keyed by the track's
/// `path`; a missing trace fails with [`AtlasError::TraceNotFound`]. The
/// map is centered on the combined bounds of everything drawn.
pub fn build_map_plan(
    groups: &[RouteGroup],
    traces: &HashMap<String, Trace>,
    config: &MapConfig,
) -> Result<MapPlan> {
    if groups.is_empty() {
        return Err(AtlasError::EmptyRouteGroup);
    }

    let mut routes = Vec::with_capacity(groups.len());
    let mut bounds: Option<Bounds> = None;

    for group in groups {
        let route_plan = build_route_plan(group, traces, config)?;
        for track in &route_plan.tracks {
            if let Some(b) = Bounds::from_points(&track.points) {
                bounds = Some(bounds.map_or(b, |acc| acc.merge(&b)));
            }
        }
        log::info!(
            "planned route '{}' ({} days)",
            group.route_name,
            group.tracks.len()
        );
        routes.push(route_plan);
    }

    // groups are non-empty and every trace has points, so bounds exist
    let center = bounds
        .map(|b| b.center())
        .ok_or(AtlasError::EmptyRouteGroup)?;

    Ok(MapPlan {
        center,
        zoom_level: config.zoom_level(),
        tile_layers: config.style.tile_layers(),
        fullscreen: config.fullscreen,
        show_minimap: config.show_minimap,
        routes,
        overlays: Vec::new(),
    })
}

/// Build a map plan for one day's track on its own — the per-day map
/// variant. `day` is the 1-based day number within the route.
pub fn single_track_plan(
    track: &Track,
    trace: &Trace,
    day: u32,
    config: &MapConfig,
) -> Result<MapPlan> {
    let summary = summarize_route(std::slice::from_ref(track))?;
    let (color, icon) = activity_style(track);

    // Daily stats: same table as the route popup, minus the day count
    let rows: Vec<(String, String)> = summary
        .display_rows()
        .into_iter()
        .filter(|(label, _)| label != "Days")
        .collect();

    let markers = vec![
        MarkerPlan::RouteStart {
            location: trace.start(),
            fill_color: "green".to_string(),
            popup_html: format!("Start of day {day}"),
        },
        MarkerPlan::RouteSummary {
            location: trace.midpoint(),
            color: color.to_string(),
            icon: icon.map(str::to_string),
            popup_html: summary_popup_html("Daily Stats", &rows),
        },
        MarkerPlan::RouteEnd {
            location: trace.end(),
            fill_color: "red".to_string(),
            popup_html: format!("End of day {day}"),
        },
    ];

    Ok(MapPlan {
        center: trace.bounds().center(),
        zoom_level: config.zoom_level(),
        tile_layers: config.style.tile_layers(),
        fullscreen: config.fullscreen,
        show_minimap: config.show_minimap,
        routes: vec![RoutePlan {
            route_name: track.route_name.clone(),
            visible: true,
            tracks: vec![track_plan(track, trace, None, TRACK_OPACITY)],
            markers,
            summary,
        }],
        overlays: Vec::new(),
    })
}

/// Build the hidden overlay layer for planned (not yet walked) routes:
/// black polylines with name tooltips and grey endpoint markers.
pub fn planned_overlay(traces: &[Trace]) -> OverlayPlan {
    let mut tracks = Vec::with_capacity(traces.len());
    let mut markers = Vec::new();

    for trace in traces {
        let name = trace
            .name
            .clone()
            .unwrap_or_else(|| trace.path.display().to_string());

        let points = trace.gps_points();
        let encoded_polyline = encode_points(&points);
        tracks.push(TrackPlan {
            path: trace.path.display().to_string(),
            color: "black".to_string(),
            weight: 4.0,
            opacity: PLANNED_OPACITY,
            tooltip: Some(name.clone()),
            points,
            encoded_polyline,
        });

        markers.push(MarkerPlan::RouteStart {
            location: trace.start(),
            fill_color: "grey".to_string(),
            popup_html: format!("Start of {name}"),
        });
        markers.push(MarkerPlan::RouteEnd {
            location: trace.end(),
            fill_color: "grey".to_string(),
            popup_html: format!("End of {name}"),
        });
    }

    OverlayPlan {
        name: "Planned routes".to_string(),
        visible: false,
        tracks,
        markers,
    }
}
