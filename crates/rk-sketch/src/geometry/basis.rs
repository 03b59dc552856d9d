//! Orthonormal in-plane coordinate frames

use glam::{DVec2, DVec3};

use super::DEGENERATE_EPSILON;

/// An orthonormal frame on a plane: two in-plane axes and the normal.
///
/// `v = normal × u`, so `(u, v, normal)` is right-handed. A basis is always
/// derived from points or a normal and never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneBasis {
    pub normal: DVec3,
    pub u: DVec3,
    pub v: DVec3,
}

impl Default for PlaneBasis {
    fn default() -> Self {
        Self::from_normal(DVec3::Z)
    }
}

impl PlaneBasis {
    /// Frame of the plane through three points, with `u` along `p1 → p2`.
    ///
    /// Near-collinear points fall back to the world Z normal; a `p1 → p2`
    /// direction parallel to the normal falls back to world X for `u`.
    pub fn from_three_points(p1: DVec3, p2: DVec3, p3: DVec3) -> Self {
        let v12 = p2 - p1;
        let v13 = p3 - p1;

        let cross = v12.cross(v13);
        let len = cross.length();
        let normal = if len < DEGENERATE_EPSILON {
            DVec3::Z
        } else {
            cross / len
        };

        let rejected = v12 - normal * v12.dot(normal);
        let u = if rejected.length_squared() < DEGENERATE_EPSILON {
            DVec3::X
        } else {
            rejected.normalize()
        };

        // u is only guaranteed orthogonal to the normal on the non-fallback path
        let u = (u - normal * u.dot(normal)).try_normalize().unwrap_or_else(|| {
            Self::from_normal(normal).u
        });
        let v = normal.cross(u);

        Self { normal, u, v }
    }

    /// Frame of a plane with the given normal.
    ///
    /// The reference axis is world Z unless the normal is within ~8° of it,
    /// in which case world Y is used.
    pub fn from_normal(normal: DVec3) -> Self {
        let normal = normal.try_normalize().unwrap_or(DVec3::Z);
        let reference = if normal.z.abs() < 0.99 {
            DVec3::Z
        } else {
            DVec3::Y
        };
        let u = normal.cross(reference).normalize();
        let v = normal.cross(u).normalize();
        Self { normal, u, v }
    }

    /// Coordinates of `point` relative to `origin` in `(u, v)`.
    pub fn to_local(&self, origin: DVec3, point: DVec3) -> DVec2 {
        let offset = point - origin;
        DVec2::new(offset.dot(self.u), offset.dot(self.v))
    }

    /// World position of local coordinates relative to `origin`.
    pub fn to_world(&self, origin: DVec3, local: DVec2) -> DVec3 {
        origin + self.u * local.x + self.v * local.y
    }

    /// Polar angle of `point` around `center`, measured from `u` towards `v`.
    pub fn angle_of(&self, center: DVec3, point: DVec3) -> f64 {
        let offset = point - center;
        offset.dot(self.v).atan2(offset.dot(self.u))
    }

    /// Point at `angle` on the circle of `radius` around `center`.
    pub fn point_at(&self, center: DVec3, radius: f64, angle: f64) -> DVec3 {
        center + self.u * (radius * angle.cos()) + self.v * (radius * angle.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_orthonormal(basis: &PlaneBasis) {
        assert_abs_diff_eq!(basis.u.length(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(basis.v.length(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(basis.normal.length(), 1.0, epsilon = 1e-9);
        assert!(basis.u.dot(basis.v).abs() < 1e-6);
        assert!(basis.u.dot(basis.normal).abs() < 1e-6);
        assert!(basis.v.dot(basis.normal).abs() < 1e-6);
    }

    #[test]
    fn test_three_point_basis_is_orthonormal() {
        let samples = [
            (DVec3::ZERO, DVec3::X, DVec3::Y),
            (
                DVec3::new(1.0, 2.0, 3.0),
                DVec3::new(-4.0, 0.5, 2.0),
                DVec3::new(0.3, -7.0, 11.0),
            ),
            (
                DVec3::new(10.0, 10.0, 0.0),
                DVec3::new(10.0, 10.0, 5.0),
                DVec3::new(12.0, 9.0, 1.0),
            ),
        ];
        for (p1, p2, p3) in samples {
            let basis = PlaneBasis::from_three_points(p1, p2, p3);
            assert_orthonormal(&basis);
            // u points from p1 towards p2 inside the plane
            assert!(basis.u.dot(p2 - p1) > 0.0);
            assert!(basis.normal.dot(p3 - p1).abs() < 1e-9);
        }
    }

    #[test]
    fn test_collinear_points_fall_back() {
        let basis = PlaneBasis::from_three_points(
            DVec3::ZERO,
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
        );
        assert_eq!(basis.normal, DVec3::Z);
        assert_orthonormal(&basis);

        // p1 → p2 along the fallback normal
        let basis = PlaneBasis::from_three_points(DVec3::ZERO, DVec3::Z, DVec3::Z * 2.0);
        assert!(basis.u.is_finite());
        assert_orthonormal(&basis);
    }

    #[test]
    fn test_normal_basis() {
        for normal in [
            DVec3::X,
            DVec3::Y,
            DVec3::Z,
            DVec3::NEG_Z,
            DVec3::new(1.0, 1.0, 1.0),
            DVec3::new(0.0, 0.1, 0.995),
        ] {
            let basis = PlaneBasis::from_normal(normal);
            assert_orthonormal(&basis);
            assert!(basis.normal.dot(normal.normalize()) > 0.999_999);
        }
    }

    #[test]
    fn test_zero_normal_does_not_produce_nan() {
        let basis = PlaneBasis::from_normal(DVec3::ZERO);
        assert!(basis.u.is_finite() && basis.v.is_finite());
    }

    #[test]
    fn test_local_world_round_trip() {
        let basis = PlaneBasis::from_normal(DVec3::new(0.0, 1.0, 1.0));
        let origin = DVec3::new(1.0, -2.0, 3.0);
        let local = DVec2::new(4.5, -1.25);
        let world = basis.to_world(origin, local);
        let back = basis.to_local(origin, world);
        assert_abs_diff_eq!(back.x, local.x, epsilon = 1e-12);
        assert_abs_diff_eq!(back.y, local.y, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_and_point_at_agree() {
        let basis = PlaneBasis::from_normal(DVec3::X);
        let center = DVec3::new(0.0, 3.0, -1.0);
        let p = basis.point_at(center, 2.0, 1.1);
        assert_abs_diff_eq!(basis.angle_of(center, p), 1.1, epsilon = 1e-12);
        assert_abs_diff_eq!((p - center).length(), 2.0, epsilon = 1e-12);
    }
}
