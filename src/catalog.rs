//! Track catalog loading and grouping.
//!
//! The catalog is a delimited text table with one row per recorded day:
//! file path, route name, optional family, an order key (date and/or day
//! number), the per-day metrics and the activity kind. Rows explicitly
//! flagged with `is_route_day = false` are standalone outings and are
//! skipped.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{AtlasError, Result};
use crate::{ActivityKind, OrderKey, RouteGroup, Track};

/// One raw catalog row. Every column except `path` and `route_name` may be
/// empty.
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    path: String,
    route_name: String,
    #[serde(default)]
    family: Option<String>,
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    day: Option<u32>,
    #[serde(default)]
    distance_km: Option<f64>,
    #[serde(default)]
    elevation_gain_m: Option<f64>,
    #[serde(default)]
    elevation_loss_m: Option<f64>,
    #[serde(default)]
    elapsed_time_s: Option<f64>,
    #[serde(default)]
    avg_speed_ms: Option<f64>,
    #[serde(default)]
    max_speed_ms: Option<f64>,
    #[serde(default)]
    avg_heartrate: Option<f64>,
    #[serde(default)]
    max_heartrate: Option<f64>,
    #[serde(default)]
    activity: Option<String>,
    #[serde(default)]
    is_route_day: Option<bool>,
}

impl CatalogRecord {
    fn into_track(self) -> Result<Track> {
        // An explicit day number wins over the date when both are present.
        let order = match (self.day, self.date) {
            (Some(day), _) => OrderKey::Day(day),
            (None, Some(date)) => OrderKey::Date(date),
            (None, None) => {
                return Err(AtlasError::MissingOrderKey { path: self.path });
            }
        };

        Ok(Track {
            path: self.path,
            route_name: self.route_name,
            family: self.family.filter(|f| !f.is_empty()),
            order,
            activity: self
                .activity
                .as_deref()
                .map(ActivityKind::from_name)
                .unwrap_or_default(),
            distance_km: self.distance_km,
            elevation_gain_m: self.elevation_gain_m,
            elevation_loss_m: self.elevation_loss_m,
            elapsed_time_s: self.elapsed_time_s,
            avg_speed_ms: self.avg_speed_ms,
            max_speed_ms: self.max_speed_ms,
            avg_heartrate: self.avg_heartrate,
            max_heartrate: self.max_heartrate,
        })
    }
}

/// Load the track catalog from CSV data.
///
/// Rows flagged `is_route_day = false` are skipped; a missing flag counts
/// as a route day. Row order is preserved — it is the tie-break order for
/// colliding order keys.
pub fn load_catalog<R: Read>(reader: R) -> Result<Vec<Track>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut tracks = Vec::new();

    for record in csv_reader.deserialize::<CatalogRecord>() {
        let record = record?;
        if record.is_route_day == Some(false) {
            log::debug!("skipping standalone outing '{}'", record.path);
            continue;
        }
        tracks.push(record.into_track()?);
    }

    log::info!("loaded {} catalog tracks", tracks.len());
    Ok(tracks)
}

/// Load the track catalog from a CSV file on disk.
pub fn load_catalog_file<P: AsRef<Path>>(path: P) -> Result<Vec<Track>> {
    let file = File::open(path.as_ref())?;
    load_catalog(file)
}

/// Group tracks by route name.
///
/// Routes appear in first-seen order and tracks keep their catalog order
/// within each group. The family is taken from the group's first track.
pub fn group_by_route(tracks: &[Track]) -> Vec<RouteGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<RouteGroup> = Vec::new();

    for track in tracks {
        match index.get(track.route_name.as_str()) {
            Some(&i) => groups[i].tracks.push(track.clone()),
            None => {
                index.insert(track.route_name.as_str(), groups.len());
                groups.push(RouteGroup {
                    route_name: track.route_name.clone(),
                    family: track.family.clone(),
                    tracks: vec![track.clone()],
                });
            }
        }
    }

    groups
}
