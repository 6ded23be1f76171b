// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use serde::{Deserialize, Serialize};

use crate::lat_lng::LatLng;

/// Default padding radius in degrees (roughly 110 m of latitude).
pub const DEFAULT_PAD_DELTA_DEG: f64 = 0.001;

/// Axis-aligned geographic rectangle.
///
/// Invariants:
/// - `south <= north` and `west <= east`.
/// - A rectangle built from a single point is degenerate (zero area), not empty.
///
/// Antimeridian wrapping is not modelled; a rectangle always spans west to east
/// through increasing longitude.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl Bounds {
    /// Constructs bounds from two opposite corners, in any order.
    #[must_use]
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self {
            south: a.lat.min(b.lat),
            west: a.lng.min(b.lng),
            north: a.lat.max(b.lat),
            east: a.lng.max(b.lng),
        }
    }

    /// Degenerate bounds covering exactly one point.
    #[must_use]
    pub fn from_point(p: LatLng) -> Self {
        Self::from_corners(p, p)
    }

    /// Builds the minimal bounds that contain all `points`.
    ///
    /// Returns `None` for an empty input; there is no rectangle to report.
    #[must_use]
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(first), |acc, p| acc.extended(p)))
    }

    /// Southern edge (minimum latitude).
    #[must_use]
    pub fn south(&self) -> f64 {
        self.south
    }

    /// Western edge (minimum longitude).
    #[must_use]
    pub fn west(&self) -> f64 {
        self.west
    }

    /// Northern edge (maximum latitude).
    #[must_use]
    pub fn north(&self) -> f64 {
        self.north
    }

    /// Eastern edge (maximum longitude).
    #[must_use]
    pub fn east(&self) -> f64 {
        self.east
    }

    /// South-west corner.
    #[must_use]
    pub fn south_west(&self) -> LatLng {
        LatLng::new(self.south, self.west)
    }

    /// North-east corner.
    #[must_use]
    pub fn north_east(&self) -> LatLng {
        LatLng::new(self.north, self.east)
    }

    /// Midpoint of the rectangle.
    #[must_use]
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Returns `true` if `p` lies inside or on the edge of the rectangle.
    #[must_use]
    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south && p.lat <= self.north && p.lng >= self.west && p.lng <= self.east
    }

    /// Returns a copy grown just enough to include `p`.
    #[must_use]
    pub fn extended(&self, p: LatLng) -> Self {
        Self {
            south: self.south.min(p.lat),
            west: self.west.min(p.lng),
            north: self.north.max(p.lat),
            east: self.east.max(p.lng),
        }
    }

    /// Returns the union of two rectangles.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.extended(other.south_west()).extended(other.north_east())
    }

    /// Grows the rectangle by padding each corner outward by `delta_deg`.
    ///
    /// The south-west corner is padded toward the south-west and the north-east
    /// corner toward the north-east, each with the longitude correction of its
    /// own latitude.
    #[must_use]
    pub fn padded(&self, delta_deg: f64) -> Self {
        let sw = pad(self.south_west(), delta_deg).south_west();
        let ne = pad(self.north_east(), delta_deg).north_east();
        Self::from_corners(sw, ne)
    }
}

/// Longitude half-width that spans the same angle as `delta_deg` of latitude at
/// latitude `lat`.
///
/// Computed as `asin(sin(delta) / cos(lat))`. Close enough to a pole the ratio
/// exceeds one; it is clamped, giving a half-width of 90 degrees.
#[must_use]
pub fn pad_delta_lng(lat: f64, delta_deg: f64) -> f64 {
    let ratio = delta_deg.to_radians().sin() / lat.to_radians().cos().abs();
    ratio.clamp(-1.0, 1.0).asin().to_degrees()
}

/// Small square-ish rectangle centred on `p`, `delta_deg` tall on each side.
#[must_use]
pub fn pad(p: LatLng, delta_deg: f64) -> Bounds {
    let delta_lng = pad_delta_lng(p.lat, delta_deg);
    Bounds {
        south: p.lat - delta_deg,
        west: p.lng - delta_lng,
        north: p.lat + delta_deg,
        east: p.lng + delta_lng,
    }
}
