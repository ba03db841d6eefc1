//! End-to-end: catalog CSV + GPX files on disk through to a serialized
//! map plan.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use camino_atlas::{
    build_map_plan, group_by_route, load_catalog_file, planned_overlay, read_trace, scan_gpx_dir,
    MapConfig, MarkerPlan, RouteOptions, Trace,
};

fn write_file(dir: &Path, name: &str, contents: &str) {
    let mut file = File::create(dir.join(name)).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
}

fn gpx(name: &str, base_lat: f64, base_lng: f64) -> String {
    let points: String = (0..6)
        .map(|i| {
            format!(
                "<trkpt lat=\"{:.4}\" lon=\"{:.4}\"><ele>{}</ele></trkpt>",
                base_lat + i as f64 * 0.01,
                base_lng + i as f64 * 0.01,
                700 + i * 10
            )
        })
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <gpx version=\"1.1\" creator=\"test\" xmlns=\"http://www.topografix.com/GPX/1/1\">\n\
         <trk><name>{name}</name><trkseg>{points}</trkseg></trk></gpx>"
    )
}

const CATALOG: &str = "\
path,route_name,family,date,day,distance_km,elevation_gain_m,elevation_loss_m,elapsed_time_s,avg_speed_ms,max_speed_ms,avg_heartrate,max_heartrate,activity,is_route_day
f1.gpx,Camino Frances,Frances,,1,24.0,400,380,21600,1.4,2.1,110,150,hiking,
f2.gpx,Camino Frances,Frances,,2,26.5,520,510,25200,1.3,2.0,115,155,hiking,
f3.gpx,Camino Frances,Frances,,3,22.0,310,300,19800,1.5,2.2,112,148,hiking,
p1.gpx,Via de la Plata,,2024-04-10,,65.0,800,780,18000,5.2,14.0,130,170,cycling,
p2.gpx,Via de la Plata,,2024-04-11,,58.0,650,640,16200,5.0,13.5,128,168,cycling,
lunch.gpx,None,,,1,,,,,,,,,,false
";

#[test]
fn test_catalog_to_map_plan() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "catalog.csv", CATALOG);
    write_file(dir.path(), "f1.gpx", &gpx("Day 1", 42.9, -1.8));
    write_file(dir.path(), "f2.gpx", &gpx("Day 2", 42.8, -2.0));
    write_file(dir.path(), "f3.gpx", &gpx("Day 3", 42.7, -2.2));
    write_file(dir.path(), "p1.gpx", &gpx("Plata 1", 37.4, -6.0));
    write_file(dir.path(), "p2.gpx", &gpx("Plata 2", 37.9, -6.1));

    let tracks = load_catalog_file(dir.path().join("catalog.csv")).unwrap();
    // the standalone lunch ride is not part of any route
    assert_eq!(tracks.len(), 5);

    let mut traces: HashMap<String, Trace> = HashMap::new();
    for track in &tracks {
        let trace = read_trace(dir.path().join(&track.path)).unwrap();
        traces.insert(track.path.clone(), trace);
    }

    let groups = group_by_route(&tracks);
    assert_eq!(groups.len(), 2);

    let mut config = MapConfig {
        mark_track_terminals: true,
        ..MapConfig::default()
    };
    config
        .route_options
        .insert("Camino Frances".to_string(), RouteOptions { visible: true });

    let plan = build_map_plan(&groups, &traces, &config).unwrap();

    assert_eq!(plan.zoom_level, 12);
    assert_eq!(plan.routes.len(), 2);

    let frances = &plan.routes[0];
    assert_eq!(frances.route_name, "Camino Frances");
    assert!(frances.visible);
    assert_eq!(frances.tracks.len(), 3);
    assert_eq!(frances.summary.day_count, 3);
    assert_eq!(frances.summary.total_distance_km, Some(72.5));
    // start + summary + end + 2 day terminals
    assert_eq!(frances.markers.len(), 5);

    let plata = &plan.routes[1];
    assert!(!plata.visible);
    // date-ordered: p1 (April 10) is day 1
    assert_eq!(plata.tracks[0].path, "p1.gpx");
    assert_eq!(plata.tracks[0].color, "red");

    // center sits inside the combined bounds of both routes
    assert!(plan.center.latitude > 37.0 && plan.center.latitude < 43.0);
    assert!(plan.center.longitude > -6.2 && plan.center.longitude < -1.7);

    // the whole plan serializes
    let json = serde_json::to_string(&plan).unwrap();
    assert!(json.contains("\"route_start\""));
    assert!(json.contains("Camino Frances"));
}

#[test]
fn test_planned_routes_overlay_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "future-1.gpx", &gpx("Camino Portugues", 41.1, -8.6));
    write_file(dir.path(), "future-2.gpx", &gpx("Camino Ingles", 43.3, -8.2));
    write_file(dir.path(), "readme.txt", "not a gpx");

    let mut planned = Vec::new();
    for path in scan_gpx_dir(dir.path()).unwrap() {
        planned.push(read_trace(&path).unwrap());
    }
    assert_eq!(planned.len(), 2);

    let overlay = planned_overlay(&planned);
    assert_eq!(overlay.name, "Planned routes");
    assert!(!overlay.visible);
    assert_eq!(overlay.tracks.len(), 2);
    assert!(overlay.tracks.iter().all(|t| t.color == "black"));

    let names: Vec<_> = overlay
        .tracks
        .iter()
        .filter_map(|t| t.tooltip.as_deref())
        .collect();
    assert!(names.contains(&"Camino Portugues"));
    assert!(names.contains(&"Camino Ingles"));

    let grey_markers = overlay
        .markers
        .iter()
        .filter(|m| {
            matches!(
                m,
                MarkerPlan::RouteStart { fill_color, .. } | MarkerPlan::RouteEnd { fill_color, .. }
                    if fill_color == "grey"
            )
        })
        .count();
    assert_eq!(grey_markers, 4);
}
