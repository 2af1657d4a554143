use std::collections::BTreeMap;
use std::fmt;

use geo::Coord;

/// Short name of a photo source feed (`hillview`, `mapillary`, `device`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session-unique photo identity.
///
/// The display form is the literal `<source>-<id>` string used by the
/// `photo` URL parameter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhotoKey {
    pub source: SourceId,
    pub id: String,
}

impl PhotoKey {
    pub fn new(source: SourceId, id: impl Into<String>) -> Self {
        Self {
            source,
            id: id.into(),
        }
    }

    /// Parses the `<source>-<id>` form. The id part may itself contain
    /// dashes; only the first dash separates.
    pub fn parse(s: &str) -> Option<Self> {
        let (source, id) = s.split_once('-')?;
        if source.is_empty() || id.is_empty() {
            return None;
        }
        Some(Self::new(SourceId::new(source), id))
    }
}

impl fmt::Display for PhotoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.id)
    }
}

/// Opaque reference to renderable image data, keyed by size-variant name.
///
/// Owned by the image-serving collaborator; the engine never inspects it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRef {
    sizes: BTreeMap<String, String>,
}

impl ImageRef {
    pub fn single(url: impl Into<String>) -> Self {
        let mut sizes = BTreeMap::new();
        sizes.insert("full".to_string(), url.into());
        Self { sizes }
    }

    pub fn from_sizes(sizes: BTreeMap<String, String>) -> Self {
        Self { sizes }
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn sizes(&self) -> &BTreeMap<String, String> {
        &self.sizes
    }
}

/// One directional photograph from the candidate set.
///
/// Created/replaced wholesale whenever a source emits a new snapshot;
/// never mutated in place. Derived per-viewer fields live on
/// [`AnnotatedPhoto`], not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub key: PhotoKey,
    /// Capture location.
    pub coord: Coord,
    /// Compass heading the camera pointed, degrees [0, 360).
    pub bearing_deg: f64,
    pub image: ImageRef,
}

/// A photo annotated with geometry derived from the current viewer state.
///
/// Pure function of `(Photo, ViewerState)`; recomputed on every viewer or
/// candidate-set change.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedPhoto {
    pub photo: Photo,
    /// Great-circle distance from the viewer, kilometers.
    pub distance_km: f64,
    /// Compass bearing from the viewer to the capture location, [0, 360).
    pub abs_bearing_deg: f64,
    /// `abs_bearing_deg` relative to the viewer's facing, (-180, 180].
    /// Positive means clockwise of the current facing.
    pub relative_deg: f64,
    /// How far the photo's own shot direction diverges from the viewer's
    /// facing, [0, 180]. Used to rank "looking the same way I am".
    pub bearing_diff_deg: f64,
}
