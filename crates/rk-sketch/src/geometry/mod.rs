//! Plane geometry used by the sketch tools
//!
//! Every function in this module is total: degenerate input (collinear
//! points, zero-length vectors, empty sweeps) produces a stable fallback or
//! `None`, never a panic or a NaN. Interactive previews call these on every
//! pointer move.

pub mod arc;
pub mod basis;
pub mod circle;
pub mod rect;
pub mod spline;

pub use arc::ResolvedArc;
pub use basis::PlaneBasis;
pub use circle::Circle;

use std::f64::consts::TAU;

/// Threshold below which a cross product or determinant counts as zero
pub const DEGENERATE_EPSILON: f64 = 1e-12;

/// Looser collinearity threshold used while previewing under the cursor
pub const PREVIEW_EPSILON: f64 = 1e-6;

/// Minimum length of a centerline or rectangle edge
pub const ZERO_LENGTH_EPSILON: f64 = 1e-6;

/// Minimum angular sweep of an arc (radians)
pub const SWEEP_EPSILON: f64 = 1e-9;

/// Normalize an angle to `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle % TAU;
    if a < 0.0 { a + TAU } else { a }
}

/// Check whether `test` lies on the counter-clockwise sweep from `start` to `end`.
///
/// Boundaries are inclusive. All three angles may be given in any range.
pub fn angle_in_ccw_range(start: f64, end: f64, test: f64) -> bool {
    let start = normalize_angle(start);
    let mut end = normalize_angle(end);
    let mut test = normalize_angle(test);
    if end < start {
        end += TAU;
    }
    if test < start {
        test += TAU;
    }
    test <= end
}
