use geo::{Coord, normalize_deg, relative_deg};

use crate::index::PhotoIndex;
use crate::photo::{AnnotatedPhoto, Photo, PhotoKey};
use crate::selector::{self, Direction, NavigationSelection};
use crate::trace::EventTrace;
use crate::viewer::{GeoBounds, ViewerState};

/// Which input family currently owns the viewer's bearing.
///
/// Exactly one writer at a time: while `Compass` is active only compass
/// samples may move the bearing, and every manual input path switches the
/// source back to `Manual` before applying its own delta.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum RotationSource {
    #[default]
    Manual,
    Compass,
}

/// The navigation engine: candidate set, viewer state, derived selection,
/// and the rotation-source arbitration gate.
///
/// Single-threaded and synchronous; every mutation of bearing, center,
/// zoom, bounds, or the photo set triggers a full re-derivation of the
/// annotated set and the front/left/right selection. No incremental
/// update — candidate sets are small and correctness wins.
///
/// Input adapters receive `&mut Engine` explicitly; nothing here reaches
/// into ambient or global state.
#[derive(Debug)]
pub struct Engine {
    index: PhotoIndex,
    viewer: ViewerState,
    rotation_source: RotationSource,
    /// Bearing the manual controls last settled on. Compass samples write
    /// the viewer bearing but never this baseline, so manual input resumes
    /// from where the user left it.
    manual_bearing_deg: f64,
    annotated: Vec<AnnotatedPhoto>,
    selection: NavigationSelection,
    /// Photos in the current set with unusable geometry; traced when it
    /// changes so the debug overlay can show bad feed data.
    dropped_photos: usize,
    trace: EventTrace,
}

impl Engine {
    pub fn new(viewer: ViewerState) -> Self {
        let manual_bearing_deg = viewer.bearing_deg;
        let mut engine = Self {
            index: PhotoIndex::new(),
            viewer,
            rotation_source: RotationSource::Manual,
            manual_bearing_deg,
            annotated: Vec::new(),
            selection: NavigationSelection::default(),
            dropped_photos: 0,
            trace: EventTrace::default(),
        };
        engine.rederive();
        engine
    }

    pub fn viewer(&self) -> &ViewerState {
        &self.viewer
    }

    pub fn selection(&self) -> &NavigationSelection {
        &self.selection
    }

    pub fn annotated(&self) -> &[AnnotatedPhoto] {
        &self.annotated
    }

    pub fn rotation_source(&self) -> RotationSource {
        self.rotation_source
    }

    pub fn trace(&self) -> &EventTrace {
        &self.trace
    }

    pub fn trace_mut(&mut self) -> &mut EventTrace {
        &mut self.trace
    }

    /// Atomically replaces the candidate photo set with a new snapshot.
    pub fn apply_snapshot(&mut self, photos: Vec<Photo>) {
        self.trace
            .emit("snapshot", format!("{} photo(s)", photos.len()));
        self.index.replace(photos);
        self.rederive();
    }

    pub fn set_center(&mut self, center: Coord) {
        self.viewer.center = center;
        self.rederive();
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.viewer.zoom = zoom;
        self.rederive();
    }

    pub fn set_bounds(&mut self, bounds: Option<GeoBounds>) {
        self.viewer.bounds = bounds;
        self.rederive();
    }

    /// Switches the bearing writer.
    ///
    /// Idempotent. An explicit switch to `Manual` (the user turning
    /// compass tracking off) adopts the current bearing as the new manual
    /// baseline — the user keeps facing where the compass left them.
    pub fn set_rotation_source(&mut self, source: RotationSource) {
        if self.rotation_source == source {
            return;
        }
        if source == RotationSource::Manual {
            self.manual_bearing_deg = self.viewer.bearing_deg;
        }
        self.rotation_source = source;
        self.trace
            .emit("rotation-source", format!("{source:?}"));
    }

    /// Manual relative rotation (keyboard steps, gesture deltas).
    ///
    /// If compass tracking is active it is disabled first and the rotation
    /// applies to the manual baseline, not to the last compass sample.
    pub fn rotate_bearing(&mut self, delta_deg: f64) {
        if !delta_deg.is_finite() {
            log::debug!("ignoring non-finite rotation delta");
            return;
        }
        self.reclaim_manual();
        let next = normalize_deg(self.manual_bearing_deg + delta_deg);
        self.manual_bearing_deg = next;
        self.viewer.bearing_deg = next;
        self.rederive();
    }

    /// Manual absolute facing (URL seed, programmatic navigation).
    pub fn set_bearing(&mut self, bearing_deg: f64) {
        if !bearing_deg.is_finite() {
            log::debug!("ignoring non-finite bearing");
            return;
        }
        self.reclaim_manual();
        let rel = relative_deg(normalize_deg(bearing_deg), self.manual_bearing_deg);
        self.rotate_bearing(rel);
    }

    /// Absolute heading sample from the device compass.
    ///
    /// Applied verbatim while `Compass` owns the bearing; a sample
    /// arriving after tracking stopped is stale and dropped, so a lagging
    /// sensor can never overwrite a manual change.
    pub fn compass_heading(&mut self, heading_deg: f64) {
        if self.rotation_source != RotationSource::Compass {
            log::debug!("dropping stale compass sample ({heading_deg} deg)");
            return;
        }
        if !heading_deg.is_finite() {
            log::debug!("ignoring non-finite compass heading");
            return;
        }
        self.viewer.bearing_deg = normalize_deg(heading_deg);
        self.rederive();
    }

    /// Rotates the viewer to face the nearest in-range photo on the
    /// requested side. Returns the chosen photo, or `None` (bearing
    /// unchanged) when no candidate exists on that side — the normal edge
    /// of the photo set, not an error.
    ///
    /// The state change is a single atomic bearing mutation; any animation
    /// is the presentation layer's business.
    pub fn turn_to(&mut self, direction: Direction) -> Option<PhotoKey> {
        self.reclaim_manual();
        let (rel, key) = {
            let candidate = selector::neighbor(&self.selection.in_range, direction)?;
            (candidate.relative_deg, candidate.photo.key.clone())
        };
        let next = normalize_deg(self.viewer.bearing_deg + rel);
        self.manual_bearing_deg = next;
        self.viewer.bearing_deg = next;
        self.rederive();
        self.trace.emit("turn", format!("{direction:?} to {key}"));
        Some(key)
    }

    /// Recenters on the named photo and faces its shot bearing (the URL
    /// `photo=` startup parameter). Returns false when the photo is not in
    /// the current candidate set.
    pub fn focus_photo(&mut self, key: &PhotoKey) -> bool {
        let Some(photo) = self.index.photos().iter().find(|p| &p.key == key) else {
            return false;
        };
        let (coord, shot) = (photo.coord, photo.bearing_deg);
        self.reclaim_manual();
        self.viewer.center = coord;
        let bearing = normalize_deg(shot);
        self.manual_bearing_deg = bearing;
        self.viewer.bearing_deg = bearing;
        self.rederive();
        self.trace.emit("focus", key.to_string());
        true
    }

    /// Manual input arriving while the compass owns the bearing first
    /// takes ownership back and restores the manual baseline the compass
    /// had been overriding.
    ///
    /// Rederives immediately: the cached selection was annotated against
    /// the compass heading, and callers like [`Engine::turn_to`] consult
    /// it right after reclaiming.
    fn reclaim_manual(&mut self) {
        if self.rotation_source == RotationSource::Compass {
            self.rotation_source = RotationSource::Manual;
            self.viewer.bearing_deg = self.manual_bearing_deg;
            self.rederive();
            self.trace.emit("rotation-source", "Manual (reclaimed)");
        }
        debug_assert_eq!(self.rotation_source, RotationSource::Manual);
    }

    fn rederive(&mut self) {
        let (annotated, dropped) = self.index.annotate(&self.viewer);
        if dropped != self.dropped_photos {
            self.trace
                .emit("drop", format!("{dropped} photo(s) with unusable geometry"));
            self.dropped_photos = dropped;
        }
        self.annotated = annotated;
        self.selection = selector::select(&self.annotated, &self.viewer);
    }
}

#[cfg(test)]
mod tests {
    use super::{Engine, RotationSource};
    use crate::photo::{ImageRef, Photo, PhotoKey, SourceId};
    use crate::selector::Direction;
    use crate::viewer::ViewerState;
    use approx::assert_relative_eq;
    use geo::{Coord, destination};

    const CENTER: Coord = Coord {
        lat: 50.0755,
        lon: 14.4378,
    };

    fn engine_with_range(range_km: f64) -> Engine {
        Engine::new(ViewerState::new(
            CENTER,
            ViewerState::zoom_for_range_km(CENTER, range_km),
        ))
    }

    /// Photo placed at the given absolute bearing and distance from CENTER.
    fn photo_at(id: &str, abs_bearing_deg: f64, distance_km: f64) -> Photo {
        Photo {
            key: PhotoKey::new(SourceId::new("test"), id),
            coord: destination(CENTER, abs_bearing_deg, distance_km),
            bearing_deg: abs_bearing_deg,
            image: ImageRef::single(format!("https://img.example/{id}")),
        }
    }

    #[test]
    fn range_filter_keeps_only_near_photos() {
        let mut engine = engine_with_range(1.0);
        engine.apply_snapshot(vec![
            photo_at("a", 10.0, 0.5),
            photo_at("b", 20.0, 1.5),
        ]);

        let ids: Vec<&str> = engine
            .selection()
            .in_range
            .iter()
            .map(|p| p.photo.key.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn turn_right_selects_nearest_clockwise_then_next() {
        // Photos at relative bearings -40, +15, +95 for a viewer facing 0.
        let mut engine = engine_with_range(5.0);
        engine.apply_snapshot(vec![
            photo_at("left", 320.0, 1.0),
            photo_at("near", 15.0, 1.0),
            photo_at("far", 95.0, 1.0),
        ]);

        let first = engine.turn_to(Direction::Right).expect("first turn");
        assert_eq!(first.id, "near");
        assert_relative_eq!(engine.viewer().bearing_deg, 15.0, epsilon = 1e-6);

        // After the first turn the +95 photo sits at relative +80.
        let second = engine.turn_to(Direction::Right).expect("second turn");
        assert_eq!(second.id, "far");
        assert_relative_eq!(engine.viewer().bearing_deg, 95.0, epsilon = 1e-6);
    }

    #[test]
    fn turn_is_a_no_op_at_the_edge_of_the_set() {
        let mut engine = engine_with_range(5.0);
        assert_eq!(engine.turn_to(Direction::Right), None);
        assert_eq!(engine.viewer().bearing_deg, 0.0);

        // Only counter-clockwise candidates: right turn still does nothing.
        engine.apply_snapshot(vec![photo_at("a", 320.0, 1.0), photo_at("b", 200.0, 1.0)]);
        assert_eq!(engine.turn_to(Direction::Right), None);
        assert_eq!(engine.viewer().bearing_deg, 0.0);

        let left = engine.turn_to(Direction::Left).expect("left turn");
        assert_eq!(left.id, "a");
    }

    #[test]
    fn front_updates_as_bearing_rotates() {
        let mut engine = engine_with_range(5.0);
        engine.apply_snapshot(vec![photo_at("n", 0.0, 1.0), photo_at("e", 90.0, 1.0)]);
        assert_eq!(
            engine.selection().front.as_ref().unwrap().photo.key.id,
            "n"
        );

        engine.rotate_bearing(80.0);
        assert_eq!(
            engine.selection().front.as_ref().unwrap().photo.key.id,
            "e"
        );
    }

    #[test]
    fn compass_owns_bearing_while_tracking() {
        let mut engine = engine_with_range(5.0);
        engine.rotate_bearing(40.0);

        engine.set_rotation_source(RotationSource::Compass);
        engine.compass_heading(123.0);
        assert_relative_eq!(engine.viewer().bearing_deg, 123.0, epsilon = 1e-12);
        engine.compass_heading(200.5);
        assert_relative_eq!(engine.viewer().bearing_deg, 200.5, epsilon = 1e-12);
    }

    #[test]
    fn manual_rotation_reclaims_from_compass_and_uses_manual_baseline() {
        let mut engine = engine_with_range(5.0);
        engine.rotate_bearing(40.0); // manual baseline: 40

        engine.set_rotation_source(RotationSource::Compass);
        engine.compass_heading(300.0);
        assert_eq!(engine.rotation_source(), RotationSource::Compass);

        // Keyboard rotate: tracking flips off first, then the delta
        // applies to the manual baseline, not to the compass sample.
        engine.rotate_bearing(5.0);
        assert_eq!(engine.rotation_source(), RotationSource::Manual);
        assert_relative_eq!(engine.viewer().bearing_deg, 45.0, epsilon = 1e-12);
    }

    #[test]
    fn explicit_compass_stop_adopts_current_bearing() {
        let mut engine = engine_with_range(5.0);
        engine.rotate_bearing(40.0);
        engine.set_rotation_source(RotationSource::Compass);
        engine.compass_heading(300.0);

        // User toggles tracking off: they keep facing 300.
        engine.set_rotation_source(RotationSource::Manual);
        assert_relative_eq!(engine.viewer().bearing_deg, 300.0, epsilon = 1e-12);
        engine.rotate_bearing(5.0);
        assert_relative_eq!(engine.viewer().bearing_deg, 305.0, epsilon = 1e-12);
    }

    #[test]
    fn turn_during_compass_tracking_faces_the_chosen_photo() {
        let mut engine = engine_with_range(5.0);
        engine.apply_snapshot(vec![photo_at("t", 200.0, 1.0)]);

        // Manual baseline stays 0 while the compass swings to 180.
        engine.set_rotation_source(RotationSource::Compass);
        engine.compass_heading(180.0);

        // The turn reclaims the manual baseline first, so the photo sits
        // at relative -160 (a left neighbor), not at the +20 its compass
        // annotation showed. The viewer must end up facing the photo.
        let key = engine.turn_to(Direction::Left).expect("turn");
        assert_eq!(key.id, "t");
        assert_eq!(engine.rotation_source(), RotationSource::Manual);
        assert_relative_eq!(engine.viewer().bearing_deg, 200.0, epsilon = 1e-6);
    }

    #[test]
    fn no_op_turn_during_compass_leaves_consistent_selection() {
        let mut engine = engine_with_range(5.0);
        engine.apply_snapshot(vec![photo_at("t", 200.0, 1.0)]);
        engine.set_rotation_source(RotationSource::Compass);
        engine.compass_heading(180.0);

        // Against the restored baseline 0 there is no clockwise
        // candidate, so the turn is a no-op — but the reclaim still
        // happened, and the selection matches the restored bearing.
        assert_eq!(engine.turn_to(Direction::Right), None);
        assert_eq!(engine.rotation_source(), RotationSource::Manual);
        assert_relative_eq!(engine.viewer().bearing_deg, 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            engine.selection().in_range[0].relative_deg,
            -160.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn unusable_photos_are_counted_in_the_trace() {
        let mut engine = engine_with_range(5.0);
        let mut bad = photo_at("bad", 10.0, 1.0);
        bad.bearing_deg = f64::NAN;
        engine.apply_snapshot(vec![photo_at("ok", 20.0, 1.0), bad]);

        assert_eq!(engine.annotated().len(), 1);
        assert!(
            engine
                .trace()
                .events()
                .any(|e| e.kind == "drop" && e.message.starts_with("1 "))
        );
    }

    #[test]
    fn stale_compass_sample_is_dropped_after_stop() {
        let mut engine = engine_with_range(5.0);
        engine.set_rotation_source(RotationSource::Compass);
        engine.compass_heading(90.0);
        engine.set_rotation_source(RotationSource::Manual);
        engine.rotate_bearing(10.0);
        let manual = engine.viewer().bearing_deg;

        // Sensor lag: a sample from before the stop arrives late.
        engine.compass_heading(77.0);
        assert_eq!(engine.viewer().bearing_deg, manual);
    }

    #[test]
    fn bearing_wraps_at_north() {
        let mut engine = engine_with_range(5.0);
        engine.rotate_bearing(-5.0);
        assert_relative_eq!(engine.viewer().bearing_deg, 355.0, epsilon = 1e-12);
        engine.rotate_bearing(10.0);
        assert_relative_eq!(engine.viewer().bearing_deg, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn set_bearing_is_absolute_manual() {
        let mut engine = engine_with_range(5.0);
        engine.set_bearing(270.0);
        assert_relative_eq!(engine.viewer().bearing_deg, 270.0, epsilon = 1e-12);
        engine.set_bearing(10.0);
        assert_relative_eq!(engine.viewer().bearing_deg, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn focus_photo_recenters_and_faces_shot_bearing() {
        let mut engine = engine_with_range(5.0);
        let target = photo_at("t", 45.0, 2.0);
        let coord = target.coord;
        engine.apply_snapshot(vec![target]);

        let key = PhotoKey::new(SourceId::new("test"), "t");
        assert!(engine.focus_photo(&key));
        assert_eq!(engine.viewer().center, coord);
        assert_relative_eq!(engine.viewer().bearing_deg, 45.0, epsilon = 1e-12);

        let missing = PhotoKey::new(SourceId::new("test"), "absent");
        assert!(!engine.focus_photo(&missing));
    }

    #[test]
    fn snapshot_replaces_candidates_atomically() {
        let mut engine = engine_with_range(5.0);
        engine.apply_snapshot(vec![photo_at("a", 0.0, 1.0)]);
        engine.apply_snapshot(vec![photo_at("b", 0.0, 1.0)]);
        assert_eq!(engine.annotated().len(), 1);
        assert_eq!(engine.annotated()[0].photo.key.id, "b");
    }
}
