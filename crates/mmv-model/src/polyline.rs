//! Vehicle paths between stops.
//!
//! A `Polyline` is an ordered list of points plus one traversal coefficient
//! per segment: the fraction of the leg's travel time spent on that segment.
//! Interpolating at progress `p ∈ [0, 1]` walks the segments until the
//! accumulated coefficients reach `p`.
//!
//! The server occasionally cannot compute coefficients and sends the single
//! placeholder `[1.0]` instead.  Construction expands that placeholder into
//! distance-proportional coefficients so the vehicle moves at constant speed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mmv_core::{GeoPoint, VehicleId};

use crate::{ModelError, ModelResult};

/// Wire shape of a polyline, validated into [`Polyline`].
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RawPolyline {
    polyline:     Vec<GeoPoint>,
    coefficients: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPolyline", into = "RawPolyline")]
pub struct Polyline {
    points:       Vec<GeoPoint>,
    coefficients: Vec<f64>,
}

impl Polyline {
    /// Validate `points`/`coefficients` and build the polyline.
    ///
    /// # Errors
    ///
    /// - [`ModelError::CoefficientMismatch`] when the count is neither
    ///   `points - 1` nor the `[1.0]` placeholder.
    /// - [`ModelError::ZeroLengthPolyline`] when the placeholder must be
    ///   expanded over a path of zero length.
    /// - [`ModelError::InvalidCoefficient`] for negative or non-finite values.
    pub fn new(points: Vec<GeoPoint>, coefficients: Vec<f64>) -> ModelResult<Self> {
        if points.len() < 2 {
            return Ok(Self { points, coefficients: Vec::new() });
        }

        let segments = points.len() - 1;
        let coefficients = if coefficients.len() == segments {
            coefficients
        } else if coefficients.len() == 1 && coefficients[0] == 1.0 {
            distance_coefficients(&points)?
        } else {
            return Err(ModelError::CoefficientMismatch {
                points:       points.len(),
                coefficients: coefficients.len(),
            });
        };

        if let Some(&bad) = coefficients.iter().find(|c| !c.is_finite() || **c < 0.0) {
            return Err(ModelError::InvalidCoefficient(bad));
        }

        Ok(Self { points, coefficients })
    }

    /// Straight two-point path.
    pub fn straight(from: GeoPoint, to: GeoPoint) -> Self {
        Self { points: vec![from, to], coefficients: vec![1.0] }
    }

    #[inline]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    #[inline]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn start(&self) -> Option<GeoPoint> {
        self.points.first().copied()
    }

    #[inline]
    pub fn end(&self) -> Option<GeoPoint> {
        self.points.last().copied()
    }

    /// Position after `progress` of the traversal (clamped to `[0, 1]`).
    ///
    /// Coefficients are normalised by their sum, so a slightly off total
    /// still ends exactly on the last point.
    pub fn point_at(&self, progress: f64) -> Option<GeoPoint> {
        let (first, last) = (self.start()?, self.end()?);
        let total: f64 = self.coefficients.iter().sum();
        if self.points.len() < 2 || total <= 0.0 || progress <= 0.0 {
            return Some(first);
        }
        if progress >= 1.0 {
            return Some(last);
        }

        let target = progress.clamp(0.0, 1.0) * total;
        let mut acc = 0.0;
        for (i, &coef) in self.coefficients.iter().enumerate() {
            if coef > 0.0 && target <= acc + coef {
                return Some(self.points[i].lerp(self.points[i + 1], (target - acc) / coef));
            }
            acc += coef;
        }
        Some(last)
    }
}

fn distance_coefficients(points: &[GeoPoint]) -> ModelResult<Vec<f64>> {
    let distances: Vec<f64> = points.windows(2).map(|w| w[0].planar_distance(w[1])).collect();
    let total: f64 = distances.iter().sum();
    if total == 0.0 {
        return Err(ModelError::ZeroLengthPolyline);
    }
    Ok(distances.into_iter().map(|d| d / total).collect())
}

impl TryFrom<RawPolyline> for Polyline {
    type Error = ModelError;

    fn try_from(raw: RawPolyline) -> ModelResult<Self> {
        Polyline::new(raw.polyline, raw.coefficients)
    }
}

impl From<Polyline> for RawPolyline {
    fn from(p: Polyline) -> Self {
        RawPolyline { polyline: p.points, coefficients: p.coefficients }
    }
}

// ── Per-vehicle collections ───────────────────────────────────────────────────

/// Paths parallel to a vehicle's concatenated stops: entry `i` is the path
/// arriving at stop `i`.
pub type VehiclePolylines = Vec<Polyline>;

/// Every vehicle's paths at a given polylines version.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllPolylines {
    pub version: u64,
    #[serde(rename = "polylinesByVehicleId", default)]
    pub by_vehicle: BTreeMap<VehicleId, VehiclePolylines>,
}

impl AllPolylines {
    pub fn new(version: u64) -> Self {
        Self { version, by_vehicle: BTreeMap::new() }
    }

    #[inline]
    pub fn for_vehicle(&self, id: &VehicleId) -> Option<&VehiclePolylines> {
        self.by_vehicle.get(id)
    }

    /// `true` when the server has published a newer polylines version.
    #[inline]
    pub fn is_stale(&self, current_version: u64) -> bool {
        self.version != current_version
    }
}
