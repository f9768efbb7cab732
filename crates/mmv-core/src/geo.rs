//! Geographic coordinate type.
//!
//! The server ships positions as `{ latitude, longitude }` objects with full
//! double precision, so `GeoPoint` keeps `f64` rather than the compact `f32`
//! a simulation store would use.  No projection happens here: interpolation
//! and distances are planar in degree space, which is what the renderer
//! expects along short polyline segments.

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub latitude:  f64,
    pub longitude: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Linear interpolation towards `other`; `t` is clamped to `[0, 1]`.
    #[inline]
    pub fn lerp(self, other: GeoPoint, t: f64) -> GeoPoint {
        let t = t.clamp(0.0, 1.0);
        GeoPoint {
            latitude:  self.latitude + (other.latitude - self.latitude) * t,
            longitude: self.longitude + (other.longitude - self.longitude) * t,
        }
    }

    /// Euclidean distance in degree space.
    ///
    /// Only meaningful as a relative weight between segments of the same
    /// polyline (see `Polyline` coefficient derivation in `mmv-model`).
    #[inline]
    pub fn planar_distance(self, other: GeoPoint) -> f64 {
        let d_lat = other.latitude - self.latitude;
        let d_lon = other.longitude - self.longitude;
        (d_lat * d_lat + d_lon * d_lon).sqrt()
    }

    /// `true` when both coordinates are finite numbers.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}
