use core::cmp::Ordering;

use geo::stable_total_cmp;

use crate::photo::AnnotatedPhoto;
use crate::viewer::ViewerState;

/// Field of view used by the visual gallery, degrees. Photos within half
/// this angle of the current facing are "in view". Navigation (left/right
/// neighbors) does not use it.
pub const FOV_DEG: f64 = 60.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// The fully derived navigation triple plus its supporting sets.
///
/// Never independently mutated; recomputed whenever viewer state or the
/// candidate set changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationSelection {
    /// In-range photo best aligned with the current facing.
    pub front: Option<AnnotatedPhoto>,
    /// Nearest in-range neighbor counter-clockwise of the facing.
    pub left: Option<AnnotatedPhoto>,
    /// Nearest in-range neighbor clockwise of the facing.
    pub right: Option<AnnotatedPhoto>,
    pub in_range: Vec<AnnotatedPhoto>,
    pub in_view: Vec<AnnotatedPhoto>,
}

/// Derives the navigation selection from an annotated candidate set.
///
/// Ordering contract:
/// - `front` is the in-range argmin of `(|relative_deg|, distance_km,
///   key)` under deterministic float ordering; `None` when nothing is in
///   range.
/// - `left`/`right` are relative to the viewer's facing, not to `front`.
pub fn select(annotated: &[AnnotatedPhoto], viewer: &ViewerState) -> NavigationSelection {
    let range_km = viewer.range_km();
    let in_range: Vec<AnnotatedPhoto> = annotated
        .iter()
        .filter(|p| p.distance_km <= range_km)
        .cloned()
        .collect();
    let in_view: Vec<AnnotatedPhoto> = in_range
        .iter()
        .filter(|p| p.relative_deg.abs() <= FOV_DEG / 2.0)
        .cloned()
        .collect();

    let front = in_range.iter().min_by(|a, b| front_order(a, b)).cloned();
    let left = neighbor(&in_range, Direction::Left).cloned();
    let right = neighbor(&in_range, Direction::Right).cloned();

    NavigationSelection {
        front,
        left,
        right,
        in_range,
        in_view,
    }
}

/// Nearest angular neighbor strictly on the requested side of the current
/// facing.
///
/// - `Right`: smallest positive `relative_deg` (closest clockwise).
/// - `Left`: largest negative `relative_deg` (closest counter-clockwise).
/// - Ties break by smaller `distance_km`, then key.
/// - A photo dead ahead (`relative_deg == 0`) is on neither side.
///
/// Returns `None` at the edge of the photo set — a normal terminal state.
pub fn neighbor(in_range: &[AnnotatedPhoto], direction: Direction) -> Option<&AnnotatedPhoto> {
    let side = |p: &&AnnotatedPhoto| match direction {
        Direction::Right => p.relative_deg > 0.0,
        Direction::Left => p.relative_deg < 0.0,
    };
    in_range.iter().filter(side).min_by(|a, b| {
        let angular = match direction {
            Direction::Right => stable_total_cmp(a.relative_deg, b.relative_deg),
            Direction::Left => stable_total_cmp(b.relative_deg, a.relative_deg),
        };
        angular
            .then_with(|| stable_total_cmp(a.distance_km, b.distance_km))
            .then_with(|| a.photo.key.cmp(&b.photo.key))
    })
}

fn front_order(a: &AnnotatedPhoto, b: &AnnotatedPhoto) -> Ordering {
    stable_total_cmp(a.relative_deg.abs(), b.relative_deg.abs())
        .then_with(|| stable_total_cmp(a.distance_km, b.distance_km))
        .then_with(|| a.photo.key.cmp(&b.photo.key))
}
