//! GPX trace loading.
//!
//! A *trace* is the ordered point sequence parsed from one GPX file. All
//! tracks and segments in the file are flattened in document order, which
//! matches how the recordings were made (one activity per file).

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use geo::prelude::Distance;
use geo::{point, Haversine, Point};
use time::OffsetDateTime;
use walkdir::WalkDir;

use crate::error::{AtlasError, Result};
use crate::{Bounds, GpsPoint};

/// One parsed GPX point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracePoint {
    pub longitude: f64,
    pub latitude: f64,
    pub elevation: Option<f64>,
    pub time: Option<DateTime<Utc>>,
}

impl TracePoint {
    pub fn gps(&self) -> GpsPoint {
        GpsPoint::new(self.latitude, self.longitude)
    }
}

/// The ordered point sequence of one GPX file, plus its recorded name.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    /// Path the trace was read from, as given to [`read_trace`].
    pub path: PathBuf,
    /// Track name, falling back to the GPX metadata name.
    pub name: Option<String>,
    /// Never empty.
    pub points: Vec<TracePoint>,
}

impl Trace {
    pub fn start(&self) -> GpsPoint {
        self.points[0].gps()
    }

    pub fn end(&self) -> GpsPoint {
        self.points[self.points.len() - 1].gps()
    }

    /// The point at index `ceil(len / 2)` — the approximate middle used for
    /// midpoint markers. Clamped for single-point traces.
    pub fn midpoint(&self) -> GpsPoint {
        let index = self.points.len().div_ceil(2).min(self.points.len() - 1);
        self.points[index].gps()
    }

    /// Polyline of the trace, in drawing order.
    pub fn gps_points(&self) -> Vec<GpsPoint> {
        self.points.iter().map(TracePoint::gps).collect()
    }

    /// Bounding box of the trace.
    pub fn bounds(&self) -> Bounds {
        // points is never empty, so from_points cannot fail
        Bounds::from_points(&self.gps_points()).unwrap_or(Bounds {
            min_lat: 0.0,
            max_lat: 0.0,
            min_lng: 0.0,
            max_lng: 0.0,
        })
    }

    /// Haversine length of the trace in kilometres.
    pub fn distance_km(&self) -> f64 {
        let mut total = 0.0;
        let mut last: Option<Point> = None;
        for p in &self.points {
            let current = point!(x: p.longitude, y: p.latitude);
            if let Some(prev) = last {
                total += Haversine.distance(prev, current);
            }
            last = Some(current);
        }
        total / 1000.0
    }
}

/// Parse one GPX file into a [`Trace`].
///
/// # Errors
///
/// I/O and GPX parse failures, plus [`AtlasError::EmptyTrace`] when the file
/// parses but holds no track points.
pub fn read_trace<P: AsRef<Path>>(path: P) -> Result<Trace> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let gpx = gpx::read(BufReader::new(file))?;

    let name = gpx
        .tracks
        .first()
        .and_then(|t| t.name.clone())
        .or_else(|| gpx.metadata.as_ref().and_then(|m| m.name.clone()));

    let mut points = Vec::new();
    for track in &gpx.tracks {
        for segment in &track.segments {
            for wpt in &segment.points {
                points.push(TracePoint {
                    longitude: wpt.point().x(),
                    latitude: wpt.point().y(),
                    elevation: wpt.elevation,
                    time: wpt.time.and_then(to_chrono),
                });
            }
        }
    }

    if points.is_empty() {
        return Err(AtlasError::EmptyTrace {
            path: path.to_path_buf(),
        });
    }

    log::debug!("parsed {} points from '{}'", points.len(), path.display());
    Ok(Trace {
        path: path.to_path_buf(),
        name,
        points,
    })
}

fn to_chrono(gpx_time: gpx::Time) -> Option<DateTime<Utc>> {
    let odt: OffsetDateTime = gpx_time.into();
    DateTime::from_timestamp(odt.unix_timestamp(), odt.nanosecond())
}

/// Collect the GPX files under `dir`, sorted by path.
///
/// Empty files are skipped with a warning — some exporters leave zero-byte
/// stubs behind for failed syncs.
pub fn scan_gpx_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir.as_ref()) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_gpx = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("gpx"));
        if !is_gpx {
            continue;
        }
        if entry.metadata()?.len() == 0 {
            log::warn!("skipping empty GPX file '{}'", entry.path().display());
            continue;
        }
        files.push(entry.path().to_path_buf());
    }
    files.sort();
    Ok(files)
}
