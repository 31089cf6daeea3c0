//! Geographic coordinate type and geodesic distance.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Edge lengths are accumulated
//! over thousands of edges during a search and compared against haversine
//! estimates, so both sides use double precision to keep the A* heuristic
//! from overshooting the true cost through rounding.

use crate::error::{CoordError, CoordResult};

/// Mean Earth radius in metres used by every distance computation.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Unchecked constructor for trusted data (loaders, tests).
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Validating constructor for caller-supplied coordinates.
    ///
    /// Rejects NaN/infinite components, latitudes outside ±90 and longitudes
    /// outside ±180.
    pub fn try_new(lat: f64, lon: f64) -> CoordResult<Self> {
        let p = Self { lat, lon };
        p.validate()?;
        Ok(p)
    }

    /// Build from a `(lon, lat)` pair, the vertex order used by GeoJSON and
    /// OSM way geometries.
    #[inline]
    pub fn from_lon_lat(lon: f64, lat: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    pub fn validate(self) -> CoordResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(CoordError::InvalidCoordinate { lat: self.lat, lon: self.lon })
        }
    }

    /// Haversine great-circle distance in metres.
    ///
    /// Never exceeds the length of any road between the two points, which is
    /// what makes it an admissible A* heuristic.
    #[inline]
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        haversine_m(self, other)
    }

    /// Position on the unit sphere as `[x, y, z]`.
    ///
    /// Chord length between two unit vectors is a monotonic function of the
    /// great-circle distance, so Euclidean nearest-neighbour search over these
    /// vectors returns the geodesically nearest point.
    pub fn to_unit_vector(self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        [cos_lat * cos_lon, cos_lat * sin_lon, sin_lat]
    }
}

/// Great-circle distance in metres between `a` and `b` (haversine formula).
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat * 0.5).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

    // Rounding can push h a hair above 1 for antipodal points.  `clamp`
    // keeps NaN, so a malformed input yields NaN rather than half the globe.
    2.0 * EARTH_RADIUS_M * h.sqrt().clamp(0.0, 1.0).asin()
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
