use crate::angle::normalize_deg;

/// Mean Earth radius (kilometers) used by all great-circle math.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic position in degrees.
///
/// Valid range: lat in [-90, 90], lon in [-180, 180]. Construction does not
/// enforce the range; callers filter with [`Coord::is_valid`] at data
/// boundaries so bad upstream records never throw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Great-circle distance between two positions via the haversine formula.
///
/// Symmetric; zero iff `a == b` (within float tolerance). Non-finite input
/// propagates as NaN rather than being clamped.
pub fn distance_km(a: Coord, b: Coord) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial compass bearing travelling from `a` to `b`, in `[0, 360)`.
///
/// 0 = north, clockwise positive. Undefined for coincident points; returns
/// 0 in that case.
pub fn bearing_deg(a: Coord, b: Coord) -> f64 {
    if a == b {
        return 0.0;
    }
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let y = d_lon.sin() * lat_b.cos();
    let x = lat_a.cos() * lat_b.sin() - lat_a.sin() * lat_b.cos() * d_lon.cos();
    normalize_deg(y.atan2(x).to_degrees())
}

/// Destination point after travelling `distance_km` along the great circle
/// leaving `origin` at the given initial bearing.
///
/// Inverse of ([`distance_km`], [`bearing_deg`]) up to float tolerance.
pub fn destination(origin: Coord, bearing: f64, distance: f64) -> Coord {
    let delta = distance / EARTH_RADIUS_KM;
    let theta = bearing.to_radians();
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    let lon_deg = (lon2.to_degrees() + 180.0).rem_euclid(360.0) - 180.0;
    Coord::new(lat2.to_degrees(), lon_deg)
}
