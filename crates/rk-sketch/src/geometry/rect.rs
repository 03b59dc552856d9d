//! Rectangle corners from a diagonal or a centerline

use glam::DVec3;

use super::{PlaneBasis, ZERO_LENGTH_EPSILON};

/// Corners of the rectangle with diagonal `a → c`, aligned to `basis`.
///
/// Corners run `a, a+2U, c, a+2V` around the outline, where `U` and `V`
/// are the components of the half diagonal along `basis.u` and `basis.v`.
/// The result lies in the plane through the midpoint even if `a` and `c`
/// are slightly off-plane.
pub fn two_point(a: DVec3, c: DVec3, basis: &PlaneBasis) -> [DVec3; 4] {
    let mid = (a + c) * 0.5;
    let half = (c - a) * 0.5;
    let u = basis.u * half.dot(basis.u);
    let v = basis.v * half.dot(basis.v);
    [mid - u - v, mid + u - v, mid + u + v, mid - u + v]
}

/// Corners of the rectangle whose centerline runs `p1 → p2` and whose
/// half-width is the offset of `p3` across that line.
///
/// Corners run `p1+off, p2+off, p2-off, p1-off`. A centerline shorter than
/// [`ZERO_LENGTH_EPSILON`] yields four copies of `p1`.
pub fn three_point(p1: DVec3, p2: DVec3, p3: DVec3, normal: DVec3) -> [DVec3; 4] {
    let tangent = p2 - p1;
    let len = tangent.length();
    if len < ZERO_LENGTH_EPSILON {
        return [p1; 4];
    }

    let normal = normal.try_normalize().unwrap_or(DVec3::Z);
    let tangent = tangent / len;
    let axis = normal.cross(tangent);
    let axis = if axis.length_squared() < ZERO_LENGTH_EPSILON {
        // centerline along the normal
        let reference = if normal.x.abs() < 0.9 { DVec3::X } else { DVec3::Y };
        normal.cross(reference).normalize()
    } else {
        axis.normalize()
    };

    let mid = (p1 + p2) * 0.5;
    let half_width = (p3 - mid).dot(axis);
    let offset = axis * half_width;
    [p1 + offset, p2 + offset, p2 - offset, p1 - offset]
}

/// True if any edge of the outline is shorter than `tolerance`.
pub fn is_degenerate(corners: &[DVec3; 4], tolerance: f64) -> bool {
    (0..4).any(|i| corners[i].distance(corners[(i + 1) % 4]) < tolerance)
}

/// Closed outline through the corners, first corner repeated at the end.
pub fn outline(corners: &[DVec3; 4]) -> Vec<DVec3> {
    let mut points = corners.to_vec();
    points.push(corners[0]);
    points
}
