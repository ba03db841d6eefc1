//! Command-line entry point: catalog + GPX directory in, map-plan JSON out.
//!
//! ```text
//! camino-atlas <catalog.csv> <gpx-dir> <out.json> [planned-gpx-dir]
//! ```
//!
//! The optional fourth argument is a directory of planned-route GPX files,
//! added as a hidden overlay layer.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use camino_atlas::{
    build_map_plan, group_by_route, load_catalog_file, planned_overlay, read_trace, scan_gpx_dir,
    MapConfig, RouteOptions, Result, Trace, Track,
};

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 || args.len() > 5 {
        eprintln!("usage: {} <catalog.csv> <gpx-dir> <out.json> [planned-gpx-dir]", args[0]);
        return ExitCode::from(2);
    }

    let planned_dir = args.get(4).map(PathBuf::from);
    match run(
        Path::new(&args[1]),
        Path::new(&args[2]),
        Path::new(&args[3]),
        planned_dir.as_deref(),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(catalog: &Path, gpx_dir: &Path, out: &Path, planned_dir: Option<&Path>) -> Result<()> {
    let tracks = load_catalog_file(catalog)?;
    let (tracks, traces) = load_traces(&tracks, gpx_dir);
    let groups = group_by_route(&tracks);

    // Single-map runs start with every route layer on.
    let mut config = MapConfig {
        mark_track_terminals: true,
        ..MapConfig::default()
    };
    for group in &groups {
        config
            .route_options
            .insert(group.route_name.clone(), RouteOptions { visible: true });
    }

    let mut plan = build_map_plan(&groups, &traces, &config)?;

    if let Some(dir) = planned_dir {
        let mut planned = Vec::new();
        for path in scan_gpx_dir(dir)? {
            match read_trace(&path) {
                Ok(trace) => planned.push(trace),
                Err(err) => log::warn!("skipping planned route '{}': {err}", path.display()),
            }
        }
        if !planned.is_empty() {
            plan.overlays.push(planned_overlay(&planned));
        }
    }

    let file = File::create(out)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &plan)?;
    log::info!(
        "wrote map plan with {} routes and {} overlays to '{}'",
        plan.routes.len(),
        plan.overlays.len(),
        out.display()
    );
    Ok(())
}

/// Read the trace behind every catalog track. Tracks whose GPX file is
/// missing or unreadable are dropped with a warning rather than failing the
/// whole run.
fn load_traces(tracks: &[Track], gpx_dir: &Path) -> (Vec<Track>, HashMap<String, Trace>) {
    let mut kept = Vec::with_capacity(tracks.len());
    let mut traces = HashMap::new();

    for track in tracks {
        match read_trace(gpx_dir.join(&track.path)) {
            Ok(trace) => {
                traces.insert(track.path.clone(), trace);
                kept.push(track.clone());
            }
            Err(err) => log::warn!("skipping track '{}': {err}", track.path),
        }
    }

    (kept, traces)
}
