//! Route segmentation: pick the start, midpoint and end tracks of a route.
//!
//! The midpoint rule is intentionally approximate — it picks one
//! representative track by *count*, not by distance or geography, to carry
//! the route's summary popup on the map.

use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, Result};
use crate::Track;

/// Where the route's summary marker is placed on the chosen midpoint track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// Place the marker midway along the track's points.
    Mid,
    /// Place the marker at the track's last point.
    End,
}

/// The chosen start / midpoint / end tracks for a route's map annotations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentationPlan {
    /// Track with the minimum order key.
    pub start_track: Track,
    /// The representative midpoint track (see [`segment_route`]).
    pub mid_track: Track,
    /// Track with the maximum order key.
    pub end_track: Track,
    /// How the summary marker is placed on `mid_track`.
    pub marker_kind: MarkerKind,
}

/// Return the route's tracks sorted ascending by order key.
///
/// The sort is stable: tracks with colliding order keys keep their relative
/// input order. The catalog does not define a tie-break, so this is the
/// documented deterministic rule.
pub fn order_tracks(tracks: &[Track]) -> Vec<&Track> {
    let mut sorted: Vec<&Track> = tracks.iter().collect();
    sorted.sort_by_key(|t| t.order);
    sorted
}

/// Determine the start, midpoint and end tracks for one route group.
///
/// With `n` tracks and `half = n / 2` (real division), the midpoint track
/// and marker placement are chosen as:
/// - `n == 1`: the only track, marker at its end;
/// - `half == 1` (`n == 2`): the *second* track, marker at its middle;
/// - `half` integral (`n` even, `n > 2`): track `half - 1` (0-based),
///   marker at its end;
/// - otherwise (`n` odd): track `ceil(half) - 1`, marker at its middle.
///
/// # Errors
///
/// [`AtlasError::EmptyRouteGroup`] for empty input and
/// [`AtlasError::MixedRouteNames`] when the group spans several routes.
pub fn segment_route(tracks: &[Track]) -> Result<SegmentationPlan> {
    let first = tracks.first().ok_or(AtlasError::EmptyRouteGroup)?;
    for track in tracks {
        if track.route_name != first.route_name {
            return Err(AtlasError::MixedRouteNames {
                expected: first.route_name.clone(),
                found: track.route_name.clone(),
            });
        }
    }

    let sorted = order_tracks(tracks);
    let n = sorted.len();
    let (mid_index, marker_kind) = select_midpoint(n);

    Ok(SegmentationPlan {
        start_track: sorted[0].clone(),
        mid_track: sorted[mid_index].clone(),
        end_track: sorted[n - 1].clone(),
        marker_kind,
    })
}

/// Midpoint index (0-based, over the sorted tracks) and marker placement
/// for a route of `n` tracks.
fn select_midpoint(n: usize) -> (usize, MarkerKind) {
    debug_assert!(n > 0);
    if n == 1 {
        // A single-day route: the summary marker doubles as the end marker.
        (0, MarkerKind::End)
    } else if n == 2 {
        // half == 1 would otherwise fall into the even branch and select the
        // first track; the second one is the better midpoint stand-in.
        (1, MarkerKind::Mid)
    } else if n % 2 == 0 {
        (n / 2 - 1, MarkerKind::End)
    } else {
        // ceil(n / 2) - 1
        (n / 2, MarkerKind::Mid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OrderKey;

    fn day_track(route: &str, day: u32) -> Track {
        Track {
            path: format!("{route}/day{day}.gpx"),
            route_name: route.to_string(),
            order: OrderKey::Day(day),
            ..Track::default()
        }
    }

    fn route(n: u32) -> Vec<Track> {
        (1..=n).map(|d| day_track("Camino Frances", d)).collect()
    }

    #[test]
    fn test_empty_group_fails() {
        assert!(matches!(
            segment_route(&[]),
            Err(AtlasError::EmptyRouteGroup)
        ));
    }

    #[test]
    fn test_mixed_route_names_fail() {
        let tracks = vec![
            day_track("Camino Frances", 1),
            day_track("Camino del Norte", 2),
        ];
        assert!(matches!(
            segment_route(&tracks),
            Err(AtlasError::MixedRouteNames { .. })
        ));
    }

    #[test]
    fn test_single_track_route() {
        let plan = segment_route(&route(1)).unwrap();
        assert_eq!(plan.start_track, plan.mid_track);
        assert_eq!(plan.mid_track, plan.end_track);
        assert_eq!(plan.marker_kind, MarkerKind::End);
    }

    #[test]
    fn test_two_track_route_picks_second() {
        let plan = segment_route(&route(2)).unwrap();
        assert_eq!(plan.mid_track.order, OrderKey::Day(2));
        assert_eq!(plan.marker_kind, MarkerKind::Mid);
    }

    #[test]
    fn test_four_track_route_even() {
        // half - 1 = 1 (0-based), marker at the track's end
        let plan = segment_route(&route(4)).unwrap();
        assert_eq!(plan.mid_track.order, OrderKey::Day(2));
        assert_eq!(plan.marker_kind, MarkerKind::End);
    }

    #[test]
    fn test_five_track_route_odd() {
        // ceil(2.5) - 1 = 2 (0-based), marker at the track's middle
        let plan = segment_route(&route(5)).unwrap();
        assert_eq!(plan.mid_track.order, OrderKey::Day(3));
        assert_eq!(plan.marker_kind, MarkerKind::Mid);
    }

    #[test]
    fn test_start_end_are_extremes() {
        for n in 1..12 {
            let plan = segment_route(&route(n)).unwrap();
            assert_eq!(plan.start_track.order, OrderKey::Day(1));
            assert_eq!(plan.end_track.order, OrderKey::Day(n));
        }
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut shuffled = route(7);
        shuffled.reverse();
        shuffled.swap(0, 3);

        let plan = segment_route(&route(7)).unwrap();
        let plan_shuffled = segment_route(&shuffled).unwrap();
        assert_eq!(plan, plan_shuffled);
    }

    #[test]
    fn test_order_key_ties_keep_input_order() {
        let mut a = day_track("Camino Frances", 1);
        a.path = "a.gpx".to_string();
        let mut b = day_track("Camino Frances", 1);
        b.path = "b.gpx".to_string();

        let forward = [a.clone(), b.clone()];
        let sorted = order_tracks(&forward);
        assert_eq!(sorted[0].path, "a.gpx");
        assert_eq!(sorted[1].path, "b.gpx");

        let reversed = [b, a];
        let sorted = order_tracks(&reversed);
        assert_eq!(sorted[0].path, "b.gpx");
    }

    #[test]
    fn test_idempotent() {
        let tracks = route(6);
        assert_eq!(
            segment_route(&tracks).unwrap(),
            segment_route(&tracks).unwrap()
        );
    }
}
