use geo::Coord;

/// Web-Mercator ground resolution at the equator, meters per pixel at
/// zoom 0. Halves per zoom level.
const GROUND_RESOLUTION_M_PER_PX: f64 = 156_543.033_92;

/// Half-extent of the assumed viewport, in on-screen pixels. Together with
/// the ground resolution this fixes the zoom-to-range conversion.
const RANGE_HALF_VIEWPORT_PX: f64 = 512.0;

pub const DEFAULT_CENTER: Coord = Coord {
    lat: 50.0755,
    lon: 14.4378,
};
pub const DEFAULT_ZOOM: f64 = 14.0;

/// Visible map extent as delivered by the map widget.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoBounds {
    pub nw: Coord,
    pub se: Coord,
}

/// The authoritative (position, zoom, bearing, visible-extent) tuple.
///
/// Single instance per session. Written only through [`crate::Engine`]
/// mutators (which enforce rotation-source arbitration); read by the photo
/// index, the selector, URL sync, and rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    pub center: Coord,
    pub zoom: f64,
    /// Current facing, degrees [0, 360).
    pub bearing_deg: f64,
    pub bounds: Option<GeoBounds>,
}

impl ViewerState {
    pub fn new(center: Coord, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            bearing_deg: 0.0,
            bounds: None,
        }
    }

    /// Ground distance considered "in range", derived from zoom and the
    /// center latitude via the fixed pixel-to-ground conversion. Input
    /// adapters never set this directly.
    pub fn range_km(&self) -> f64 {
        let m_per_px = GROUND_RESOLUTION_M_PER_PX * self.center.lat.to_radians().cos()
            / 2f64.powf(self.zoom);
        m_per_px * RANGE_HALF_VIEWPORT_PX / 1000.0
    }

    /// Zoom level whose derived range equals `range_km` at `center`.
    ///
    /// Inverse of [`ViewerState::range_km`]; used by tests and
    /// programmatic navigation.
    pub fn zoom_for_range_km(center: Coord, range_km: f64) -> f64 {
        let m_per_px = range_km * 1000.0 / RANGE_HALF_VIEWPORT_PX;
        (GROUND_RESOLUTION_M_PER_PX * center.lat.to_radians().cos() / m_per_px).log2()
    }
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER, DEFAULT_ZOOM)
    }
}
