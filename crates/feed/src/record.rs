//! Wire format of the photo source feed.
//!
//! Sources (network fetch, device scan, live stream) deliver snapshots as
//! arrays of plain records: `{id, coord: {lat, lng}, bearing, sizes|url}`.
//! No ordering or completeness guarantees are assumed from any source.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use engine::{ImageRef, Photo, PhotoKey, SourceId};
use geo::Coord;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("snapshot decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoordRecord {
    pub lat: f64,
    pub lng: f64,
}

/// One photo as delivered by a source feed. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoRecord {
    pub id: String,
    pub coord: CoordRecord,
    pub bearing: f64,
    /// Size-variant name to URL. Opaque to the engine.
    #[serde(default)]
    pub sizes: BTreeMap<String, String>,
    /// Fallback single-URL form used by older sources.
    #[serde(default)]
    pub url: Option<String>,
}

impl PhotoRecord {
    /// Converts the wire record into the domain photo, prefixing the id
    /// with its source.
    ///
    /// Returns `None` for records with an empty id or no image reference
    /// at all — those cannot be rendered or addressed. Coordinate and
    /// bearing validation is the photo index's job and is not duplicated
    /// here.
    pub fn into_photo(self, source: &SourceId) -> Option<Photo> {
        if self.id.is_empty() {
            return None;
        }
        let image = if !self.sizes.is_empty() {
            ImageRef::from_sizes(self.sizes)
        } else if let Some(url) = self.url {
            ImageRef::single(url)
        } else {
            return None;
        };

        Some(Photo {
            key: PhotoKey::new(source.clone(), self.id),
            coord: Coord::new(self.coord.lat, self.coord.lng),
            bearing_deg: self.bearing,
            image,
        })
    }
}

/// Decodes one full snapshot from a source.
///
/// Unusable records (empty id, no image reference) are dropped with a
/// debug log; a snapshot that fails to parse as JSON is a [`FeedError`].
pub fn decode_snapshot(source: &SourceId, json: &str) -> Result<Vec<Photo>, FeedError> {
    let records: Vec<PhotoRecord> = serde_json::from_str(json)?;
    let total = records.len();
    let photos: Vec<Photo> = records
        .into_iter()
        .filter_map(|r| r.into_photo(source))
        .collect();
    if photos.len() < total {
        log::debug!(
            "feed {source}: dropped {} unusable record(s) of {total}",
            total - photos.len()
        );
    }
    Ok(photos)
}
