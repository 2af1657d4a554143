//! The query-string serialization of viewer state.
//!
//! Literal format: `?lat=<float>&lon=<float>&zoom=<float>&bearing=<float>`
//! with an optional `&photo=<source>-<id>`. This is the only externally
//! visible serialization the engine owns.

use engine::{Engine, PhotoKey, ViewerState};
use geo::Coord;

/// Viewer state parsed from a query string. Every field is optional:
/// missing or malformed parameters stay `None` and the corresponding
/// defaults apply. Parsing never fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlState {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub zoom: Option<f64>,
    pub bearing: Option<f64>,
    pub photo: Option<PhotoKey>,
}

impl UrlState {
    /// Tolerant parse of a query string (with or without the leading
    /// `?`). Unknown parameters are ignored; of duplicates the last wins.
    pub fn parse(query: &str) -> Self {
        let mut state = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "lat" => state.lat = parse_finite(value),
                "lon" => state.lon = parse_finite(value),
                "zoom" => state.zoom = parse_finite(value),
                "bearing" => state.bearing = parse_finite(value),
                "photo" => state.photo = PhotoKey::parse(value),
                _ => {}
            }
        }
        state
    }

    /// Seeds the engine from whatever the URL carried; absent parameters
    /// leave defaults untouched. Returns the requested photo focus (to be
    /// applied once a snapshot actually contains that photo).
    pub fn apply_to(&self, engine: &mut Engine) -> Option<PhotoKey> {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            let center = Coord::new(lat, lon);
            if center.is_valid() {
                engine.set_center(center);
            }
        }
        if let Some(zoom) = self.zoom {
            engine.set_zoom(zoom);
        }
        if let Some(bearing) = self.bearing {
            engine.set_bearing(bearing);
        }
        self.photo.clone()
    }
}

fn parse_finite(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Serializes the current viewer state into the canonical query string.
pub fn query_for_viewer(viewer: &ViewerState, photo: Option<&PhotoKey>) -> String {
    let mut query = format!(
        "?lat={:.5}&lon={:.5}&zoom={:.2}&bearing={:.1}",
        viewer.center.lat, viewer.center.lon, viewer.zoom, viewer.bearing_deg
    );
    if let Some(photo) = photo {
        query.push_str("&photo=");
        query.push_str(&photo.to_string());
    }
    query
}
