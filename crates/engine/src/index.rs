use geo::{bearing_deg, distance_km, relative_deg};

use crate::photo::{AnnotatedPhoto, Photo};
use crate::viewer::ViewerState;

/// Holds the current candidate photo set.
///
/// The set is only ever replaced wholesale ([`PhotoIndex::replace`]); a
/// partial or streaming mutation is never observable. Derived geometry is
/// produced by [`PhotoIndex::annotate`] and owned by the caller.
#[derive(Debug, Default)]
pub struct PhotoIndex {
    photos: Vec<Photo>,
}

impl PhotoIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replaces the candidate set with a new snapshot.
    pub fn replace(&mut self, photos: Vec<Photo>) {
        self.photos = photos;
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Annotates every usable photo with geometry derived from `viewer`,
    /// returning the annotated set and the number of photos dropped.
    ///
    /// Photos with invalid coordinates or a non-finite shot bearing are
    /// dropped here — a data-quality guard, not an error. Drops are
    /// logged at debug level; the caller feeds the count to the event
    /// trace for the debug overlay. Output order is unspecified; sorting
    /// is the selector's job. One linear pass, one output allocation,
    /// safe to call on every pan/zoom event.
    pub fn annotate(&self, viewer: &ViewerState) -> (Vec<AnnotatedPhoto>, usize) {
        let mut out = Vec::with_capacity(self.photos.len());
        let mut dropped = 0usize;

        for photo in &self.photos {
            if !photo.coord.is_valid() || !photo.bearing_deg.is_finite() {
                dropped += 1;
                continue;
            }

            let dist = distance_km(viewer.center, photo.coord);
            let abs = bearing_deg(viewer.center, photo.coord);
            let rel = relative_deg(abs, viewer.bearing_deg);
            let diff = relative_deg(photo.bearing_deg, viewer.bearing_deg).abs();
            if !dist.is_finite() || !rel.is_finite() || !diff.is_finite() {
                dropped += 1;
                continue;
            }

            out.push(AnnotatedPhoto {
                photo: photo.clone(),
                distance_km: dist,
                abs_bearing_deg: abs,
                relative_deg: rel,
                bearing_diff_deg: diff,
            });
        }

        if dropped > 0 {
            log::debug!("photo index: dropped {dropped} photo(s) with unusable geometry");
        }
        (out, dropped)
    }
}
