//! Circle fitting from two or three picked points

use glam::DVec3;

use super::PlaneBasis;

/// A circle in 3D, lying in the plane of the basis it was fitted in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: DVec3,
    pub radius: f64,
}

impl Circle {
    /// Closed polyline of `segments + 1` points; the last point repeats the first.
    pub fn sample(&self, basis: &PlaneBasis, segments: u32) -> Vec<DVec3> {
        let segments = segments.max(3);
        (0..=segments)
            .map(|i| {
                let theta = std::f64::consts::TAU * i as f64 / segments as f64;
                basis.point_at(self.center, self.radius, theta)
            })
            .collect()
    }

    /// Largest deviation of `points` from the circumference.
    pub fn max_deviation(&self, points: &[DVec3]) -> f64 {
        points
            .iter()
            .map(|p| (p.distance(self.center) - self.radius).abs())
            .fold(0.0, f64::max)
    }
}

/// Circle centered on `p1` passing through `p2`.
pub fn two_point(p1: DVec3, p2: DVec3) -> Circle {
    Circle {
        center: p1,
        radius: p1.distance(p2),
    }
}

/// Circumcircle of three points in the plane with the given normal.
///
/// Returns `None` when the points are collinear within `tolerance`, which
/// is `DEGENERATE_EPSILON` for committed geometry and `PREVIEW_EPSILON`
/// while previewing.
pub fn three_point(p1: DVec3, p2: DVec3, p3: DVec3, normal: DVec3, tolerance: f64) -> Option<Circle> {
    circumcircle_in_basis(p1, p2, p3, &PlaneBasis::from_normal(normal), tolerance)
}

/// Circumcircle of three points projected into `basis`, with `p1` as the local origin.
pub fn circumcircle_in_basis(
    p1: DVec3,
    p2: DVec3,
    p3: DVec3,
    basis: &PlaneBasis,
    tolerance: f64,
) -> Option<Circle> {
    let a = basis.to_local(p1, p1);
    let b = basis.to_local(p1, p2);
    let c = basis.to_local(p1, p3);

    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < tolerance {
        return None;
    }

    let a2 = a.length_squared();
    let b2 = b.length_squared();
    let c2 = c.length_squared();
    let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
    let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;

    let center = p1 + basis.u * ux + basis.v * uy;
    let radius = center.distance(p1);
    if !radius.is_finite() {
        return None;
    }
    Some(Circle { center, radius })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{DEGENERATE_EPSILON, PREVIEW_EPSILON};
    use approx::assert_abs_diff_eq;

    fn assert_passes_through(circle: &Circle, points: &[DVec3]) {
        let tol = 1e-4 * circle.radius.max(1.0);
        assert!(
            circle.max_deviation(points) < tol,
            "deviation {} exceeds {}",
            circle.max_deviation(points),
            tol
        );
    }

    #[test]
    fn test_two_point() {
        let c = two_point(DVec3::new(1.0, 1.0, 0.0), DVec3::new(4.0, 5.0, 0.0));
        assert_eq!(c.center, DVec3::new(1.0, 1.0, 0.0));
        assert_abs_diff_eq!(c.radius, 5.0);
    }

    #[test]
    fn test_unit_circle() {
        let c = three_point(DVec3::X, DVec3::Y, DVec3::NEG_X, DVec3::Z, DEGENERATE_EPSILON)
            .expect("non-collinear");
        assert_abs_diff_eq!(c.center.length(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.radius, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_circumcircle_on_tilted_planes() {
        let normals = [
            DVec3::Z,
            DVec3::X,
            DVec3::Y,
            DVec3::new(1.0, 2.0, -0.5).normalize(),
        ];
        for normal in normals {
            let basis = PlaneBasis::from_normal(normal);
            let origin = DVec3::new(3.0, -1.0, 7.0);
            let pts = [
                basis.to_world(origin, glam::DVec2::new(0.0, 0.0)),
                basis.to_world(origin, glam::DVec2::new(10.0, 1.0)),
                basis.to_world(origin, glam::DVec2::new(4.0, -6.0)),
            ];
            let c = three_point(pts[0], pts[1], pts[2], normal, DEGENERATE_EPSILON)
                .expect("non-collinear");
            assert_passes_through(&c, &pts);
        }
    }

    #[test]
    fn test_large_and_small_circles() {
        for scale in [1e-3, 1.0, 1e4] {
            let pts = [
                DVec3::new(0.0, 0.0, 0.0) * scale,
                DVec3::new(2.0, 1.0, 0.0) * scale,
                DVec3::new(-1.0, 3.0, 0.0) * scale,
            ];
            let c = three_point(pts[0], pts[1], pts[2], DVec3::Z, DEGENERATE_EPSILON)
                .expect("non-collinear");
            assert_passes_through(&c, &pts);
        }
    }

    #[test]
    fn test_collinear_points_are_degenerate() {
        for normal in [DVec3::Z, DVec3::X, DVec3::Y, DVec3::new(1.0, 1.0, 1.0)] {
            assert!(
                three_point(
                    DVec3::ZERO,
                    DVec3::new(1.0, 0.0, 0.0),
                    DVec3::new(2.0, 0.0, 0.0),
                    normal,
                    DEGENERATE_EPSILON,
                )
                .is_none()
            );
        }
    }

    #[test]
    fn test_preview_tolerance_is_looser() {
        // nearly collinear: passes the strict check, fails the preview check
        let p1 = DVec3::ZERO;
        let p2 = DVec3::new(1.0, 0.0, 0.0);
        let p3 = DVec3::new(2.0, 1e-7, 0.0);
        assert!(three_point(p1, p2, p3, DVec3::Z, DEGENERATE_EPSILON).is_some());
        assert!(three_point(p1, p2, p3, DVec3::Z, PREVIEW_EPSILON).is_none());
    }

    #[test]
    fn test_sample_is_closed() {
        let c = Circle {
            center: DVec3::new(1.0, 2.0, 3.0),
            radius: 2.5,
        };
        let basis = PlaneBasis::from_normal(DVec3::Y);
        let pts = c.sample(&basis, 32);
        assert_eq!(pts.len(), 33);
        assert!(pts[0].distance(pts[32]) < 1e-9);
        assert!(c.max_deviation(&pts) < 1e-9);
    }
}
