//! JSON DTOs handed to the rendering layer.
//!
//! The engine carries no serde; this crate owns the wire shape the
//! browser UI consumes.

use std::collections::BTreeMap;

use engine::{AnnotatedPhoto, Engine, GeoBounds};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PhotoDto {
    pub key: String,
    pub lat: f64,
    pub lon: f64,
    pub distance_km: f64,
    pub abs_bearing_deg: f64,
    pub relative_deg: f64,
    pub bearing_diff_deg: f64,
    pub sizes: BTreeMap<String, String>,
}

impl PhotoDto {
    fn from_annotated(a: &AnnotatedPhoto) -> Self {
        Self {
            key: a.photo.key.to_string(),
            lat: a.photo.coord.lat,
            lon: a.photo.coord.lon,
            distance_km: a.distance_km,
            abs_bearing_deg: a.abs_bearing_deg,
            relative_deg: a.relative_deg,
            bearing_diff_deg: a.bearing_diff_deg,
            sizes: a.photo.image.sizes().clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BoundsDto {
    pub nw_lat: f64,
    pub nw_lon: f64,
    pub se_lat: f64,
    pub se_lon: f64,
}

impl BoundsDto {
    fn from_bounds(b: &GeoBounds) -> Self {
        Self {
            nw_lat: b.nw.lat,
            nw_lon: b.nw.lon,
            se_lat: b.se.lat,
            se_lon: b.se.lon,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ViewerDto {
    pub lat: f64,
    pub lon: f64,
    pub zoom: f64,
    pub bearing_deg: f64,
    pub range_km: f64,
    pub bounds: Option<BoundsDto>,
}

#[derive(Debug, Serialize)]
pub struct SelectionDto {
    pub viewer: ViewerDto,
    pub front: Option<PhotoDto>,
    pub left: Option<PhotoDto>,
    pub right: Option<PhotoDto>,
    pub in_view: Vec<PhotoDto>,
    pub in_range_count: usize,
}

impl SelectionDto {
    pub fn from_engine(engine: &Engine) -> Self {
        let viewer = engine.viewer();
        let selection = engine.selection();
        Self {
            viewer: ViewerDto {
                lat: viewer.center.lat,
                lon: viewer.center.lon,
                zoom: viewer.zoom,
                bearing_deg: viewer.bearing_deg,
                range_km: viewer.range_km(),
                bounds: viewer.bounds.as_ref().map(BoundsDto::from_bounds),
            },
            front: selection.front.as_ref().map(PhotoDto::from_annotated),
            left: selection.left.as_ref().map(PhotoDto::from_annotated),
            right: selection.right.as_ref().map(PhotoDto::from_annotated),
            in_view: selection
                .in_view
                .iter()
                .map(PhotoDto::from_annotated)
                .collect(),
            in_range_count: selection.in_range.len(),
        }
    }

    pub fn to_json(&self) -> String {
        // Serialize on all-finite plain fields does not fail.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_owned())
    }
}
