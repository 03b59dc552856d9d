//! Arc resolution: which way an arc sweeps and how far
//!
//! Both constructions produce a `ResolvedArc` whose `start_angle` and
//! `end_angle` satisfy `start_angle <= end_angle <= start_angle + 2π` and
//! are exactly the angles the polyline was sampled with. Re-sampling with
//! [`sample`] reproduces the same points.

use std::f64::consts::TAU;

use glam::DVec3;

use super::{PlaneBasis, angle_in_ccw_range, circle};

/// A fully determined circular arc plus its sampled polyline
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedArc {
    pub center: DVec3,
    pub radius: f64,
    /// Sweep start, measured from `basis.u` towards `basis.v`
    pub start_angle: f64,
    /// Sweep end, always `>= start_angle`
    pub end_angle: f64,
    pub basis: PlaneBasis,
    /// `steps + 1` points from `start_angle` to `end_angle`
    pub points: Vec<DVec3>,
}

impl ResolvedArc {
    /// Angular span in radians
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn length(&self) -> f64 {
        self.radius * self.sweep().abs()
    }
}

/// Sample `steps + 1` points evenly in angle from `start` to `end`.
pub fn sample(
    center: DVec3,
    radius: f64,
    basis: &PlaneBasis,
    start: f64,
    end: f64,
    steps: u32,
) -> Vec<DVec3> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            basis.point_at(center, radius, start + (end - start) * t)
        })
        .collect()
}

/// Arc with endpoints `p1` and `p2` that passes through `p3`.
///
/// The circle is fitted in the plane of the three points. The CCW sweep
/// `p1 → p2` is used if it contains `p3`; otherwise the sweep runs CCW from
/// `p2` to `p1`. Returns `None` for collinear points.
pub fn three_point_arc(
    p1: DVec3,
    p2: DVec3,
    p3: DVec3,
    steps: u32,
    tolerance: f64,
) -> Option<ResolvedArc> {
    let basis = PlaneBasis::from_three_points(p1, p2, p3);
    let circle = circle::circumcircle_in_basis(p1, p2, p3, &basis, tolerance)?;

    let a1 = basis.angle_of(circle.center, p1);
    let a2 = basis.angle_of(circle.center, p2);
    let a3 = basis.angle_of(circle.center, p3);

    let (start, mut end) = if angle_in_ccw_range(a1, a2, a3) {
        (a1, a2)
    } else if angle_in_ccw_range(a2, a1, a3) {
        (a2, a1)
    } else {
        return None;
    };
    if end < start {
        end += TAU;
    }

    Some(ResolvedArc {
        center: circle.center,
        radius: circle.radius,
        start_angle: start,
        end_angle: end,
        basis,
        points: sample(circle.center, circle.radius, &basis, start, end, steps),
    })
}

/// Arc around `center` starting at `start`, sweeping CCW (about `normal`)
/// until the direction of `end`.
///
/// The radius is `|start - center|`; `end` only contributes its direction.
/// Returns `None` for a zero radius, an empty sweep or a full turn.
pub fn center_start_end_arc(
    center: DVec3,
    start: DVec3,
    end: DVec3,
    normal: DVec3,
    steps: u32,
    sweep_epsilon: f64,
) -> Option<ResolvedArc> {
    let radius = center.distance(start);
    if radius < super::DEGENERATE_EPSILON {
        return None;
    }

    let basis = PlaneBasis::from_normal(normal);
    let start_angle = basis.angle_of(center, start);
    let end_dir = basis.angle_of(center, end);
    let delta = ((end_dir - start_angle) % TAU + TAU) % TAU;
    if delta <= sweep_epsilon || delta >= TAU - sweep_epsilon {
        return None;
    }
    let end_angle = start_angle + delta;

    Some(ResolvedArc {
        center,
        radius,
        start_angle,
        end_angle,
        basis,
        points: sample(center, radius, &basis, start_angle, end_angle, steps),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{DEGENERATE_EPSILON, SWEEP_EPSILON};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_three_point_arc_contains_third_point() {
        let p1 = DVec3::new(1.0, 0.0, 0.0);
        let p2 = DVec3::new(0.0, 1.0, 0.0);
        let p3 = DVec3::new(-1.0, 0.0, 0.0);
        let arc = three_point_arc(p1, p2, p3, 48, DEGENERATE_EPSILON).expect("valid arc");

        let dir = (p3 - arc.center).normalize();
        let hit = arc
            .points
            .iter()
            .any(|p| ((*p - arc.center).normalize() - dir).length() < 1e-6);
        assert!(hit, "sampled arc misses the third point");

        // the long way round: 270°
        assert_abs_diff_eq!(arc.sweep(), 1.5 * PI, epsilon = 1e-9);
    }

    #[test]
    fn test_three_point_arc_endpoints() {
        let p1 = DVec3::new(2.0, 0.0, 1.0);
        let p2 = DVec3::new(0.0, 2.0, 1.0);
        let p3 = DVec3::new(2f64.sqrt(), 2f64.sqrt(), 1.0);
        let arc = three_point_arc(p1, p2, p3, 16, DEGENERATE_EPSILON).expect("valid arc");

        let first = arc.points[0];
        let last = arc.points[arc.points.len() - 1];
        let ends_match = (first.distance(p1) < 1e-9 && last.distance(p2) < 1e-9)
            || (first.distance(p2) < 1e-9 && last.distance(p1) < 1e-9);
        assert!(ends_match);
        assert_eq!(arc.points.len(), 17);
        assert_abs_diff_eq!(arc.sweep(), FRAC_PI_2, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.radius, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sweep_is_monotonic_and_bounded() {
        let cases = [
            (DVec3::X, DVec3::NEG_X, DVec3::Y),
            (DVec3::X, DVec3::NEG_X, DVec3::NEG_Y),
            (DVec3::Y, DVec3::X, DVec3::new(-0.6, -0.8, 0.0)),
        ];
        for (p1, p2, p3) in cases {
            let arc = three_point_arc(p1, p2, p3, 8, DEGENERATE_EPSILON).expect("valid arc");
            assert!(arc.end_angle >= arc.start_angle);
            assert!(arc.sweep() <= TAU);
        }
    }

    #[test]
    fn test_collinear_three_point_arc() {
        let arc = three_point_arc(
            DVec3::ZERO,
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(2.0, 2.0, 0.0),
            8,
            DEGENERATE_EPSILON,
        );
        assert!(arc.is_none());
    }

    #[test]
    fn test_center_start_end_quarter() {
        let arc = center_start_end_arc(
            DVec3::ZERO,
            DVec3::new(3.0, 0.0, 0.0),
            DVec3::new(0.0, 10.0, 0.0),
            DVec3::Z,
            32,
            SWEEP_EPSILON,
        )
        .expect("valid arc");
        assert_abs_diff_eq!(arc.radius, 3.0);
        let last = arc.points[arc.points.len() - 1];
        // end only fixes the direction
        assert_abs_diff_eq!(last.length(), 3.0, epsilon = 1e-9);
        assert!((last.normalize() - DVec3::Y).length() < 1e-9);
        assert_abs_diff_eq!(arc.sweep(), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.length(), 1.5 * PI, epsilon = 1e-9);
    }

    #[test]
    fn test_center_start_end_wraps_around() {
        let basis = PlaneBasis::from_normal(DVec3::Z);
        let center = DVec3::new(5.0, 5.0, 0.0);
        let start = basis.point_at(center, 1.0, 3.0);
        let end = basis.point_at(center, 1.0, -3.0);
        let arc = center_start_end_arc(center, start, end, DVec3::Z, 8, SWEEP_EPSILON)
            .expect("valid arc");
        // 3 rad → 2π - 3 rad, measured CCW
        assert_abs_diff_eq!(arc.sweep(), TAU - 6.0, epsilon = 1e-9);
        assert!(arc.points[8].distance(end) < 1e-9);
    }

    #[test]
    fn test_center_start_end_rejects_degenerate() {
        // zero radius
        assert!(
            center_start_end_arc(DVec3::ZERO, DVec3::ZERO, DVec3::X, DVec3::Z, 8, SWEEP_EPSILON)
                .is_none()
        );
        // end in the same direction as start: no sweep
        assert!(
            center_start_end_arc(
                DVec3::ZERO,
                DVec3::X,
                DVec3::X * 4.0,
                DVec3::Z,
                8,
                SWEEP_EPSILON
            )
            .is_none()
        );
    }

    #[test]
    fn test_center_start_end_rejects_full_turn() {
        let basis = PlaneBasis::from_normal(DVec3::Z);
        let center = DVec3::new(-2.0, 1.0, 0.0);
        let start = basis.point_at(center, 3.0, 1.0);

        // end just clockwise of start would need an almost complete CCW turn
        let end = basis.point_at(center, 3.0, 1.0 - 1e-12);
        assert!(center_start_end_arc(center, start, end, DVec3::Z, 16, SWEEP_EPSILON).is_none());

        let end = basis.point_at(center, 3.0, 1.0 - 1e-3);
        let arc = center_start_end_arc(center, start, end, DVec3::Z, 16, SWEEP_EPSILON)
            .expect("sweep below a full turn");
        assert_abs_diff_eq!(arc.sweep(), TAU - 1e-3, epsilon = 1e-9);
    }

    #[test]
    fn test_resample_reproduces_polyline() {
        let arc = three_point_arc(
            DVec3::new(0.0, 0.0, 2.0),
            DVec3::new(4.0, 0.0, 2.0),
            DVec3::new(2.0, 1.0, 2.0),
            24,
            DEGENERATE_EPSILON,
        )
        .expect("valid arc");
        let again = sample(
            arc.center,
            arc.radius,
            &arc.basis,
            arc.start_angle,
            arc.end_angle,
            24,
        );
        assert_eq!(arc.points, again);
    }
}
