// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Geometry primitives for Wayback.

This crate provides:
- Geographic coordinates (`LatLng`).
- Axis-aligned geographic rectangles (`Bounds`) built from point sets.
- Fixed-radius padding around a point with the longitude half-width corrected
  for meridian convergence (`pad`, `Bounds::padded`).

Design notes:
- Pure and allocation-free; nothing here can fail.
- `f64` degrees throughout, matching the precision of the source data.
"]

/// Geographic coordinates.
pub mod lat_lng;
/// Enclosing rectangles and padding.
pub mod bounds;

pub use bounds::{pad, pad_delta_lng, Bounds, DEFAULT_PAD_DELTA_DEG};
pub use lat_lng::LatLng;
