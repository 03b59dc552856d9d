//! Uniform Catmull-Rom sampling through control points

use glam::DVec3;

/// Tension used when nothing else is configured
pub const DEFAULT_TENSION: f64 = 0.5;

/// Samples drawn along the whole curve when nothing else is configured
pub const DEFAULT_SEGMENTS: u32 = 128;

/// Sample `segments + 1` points along the Catmull-Rom curve through `points`.
///
/// The curve parameter is split uniformly between control points. Open
/// curves extrapolate a phantom point past each end (`2·p0 − p1`); closed
/// curves wrap around and the last sample repeats the first. Returns `None`
/// for fewer than two control points.
pub fn sample(points: &[DVec3], tension: f64, closed: bool, segments: u32) -> Option<Vec<DVec3>> {
    if points.len() < 2 {
        return None;
    }
    let segments = segments.max(1);
    Some(
        (0..=segments)
            .map(|i| point_at(points, tension, closed, i as f64 / segments as f64))
            .collect(),
    )
}

/// Point at curve parameter `t` in `[0, 1]`.
fn point_at(points: &[DVec3], tension: f64, closed: bool, t: f64) -> DVec3 {
    let l = points.len();
    let span = if closed { l } else { l - 1 };
    let p = span as f64 * t;

    let mut segment = p.floor() as usize;
    let mut weight = p - segment as f64;

    if closed {
        segment %= l;
    } else if weight == 0.0 && segment == l - 1 {
        segment = l - 2;
        weight = 1.0;
    }

    let p0 = if closed || segment > 0 {
        points[(segment + l - 1) % l]
    } else {
        points[0] * 2.0 - points[1]
    };
    let p1 = points[segment % l];
    let p2 = points[(segment + 1) % l];
    let p3 = if closed || segment + 2 < l {
        points[(segment + 2) % l]
    } else {
        points[l - 1] * 2.0 - points[l - 2]
    };

    hermite(p0, p1, p2, p3, tension, weight)
}

fn hermite(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3, tension: f64, w: f64) -> DVec3 {
    let t0 = (p2 - p0) * tension;
    let t1 = (p3 - p1) * tension;
    let c0 = p1;
    let c1 = t0;
    let c2 = p1 * -3.0 + p2 * 3.0 - t0 * 2.0 - t1;
    let c3 = p1 * 2.0 - p2 * 2.0 + t0 + t1;
    c0 + c1 * w + c2 * (w * w) + c3 * (w * w * w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_too_few_points() {
        assert!(sample(&[], DEFAULT_TENSION, false, 16).is_none());
        assert!(sample(&[DVec3::ONE], DEFAULT_TENSION, false, 16).is_none());
    }

    #[test]
    fn test_two_points_is_a_straight_line() {
        let a = DVec3::new(0.0, 0.0, 0.0);
        let b = DVec3::new(4.0, 2.0, 0.0);
        let pts = sample(&[a, b], DEFAULT_TENSION, false, 8).expect("two points");
        assert_eq!(pts.len(), 9);
        assert!(pts[0].distance(a) < 1e-12);
        assert!(pts[8].distance(b) < 1e-12);
        for p in &pts {
            assert_abs_diff_eq!((*p - a).cross(b - a).length(), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_open_curve_passes_through_control_points() {
        let ctrl = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 2.0, 0.0),
            DVec3::new(3.0, -1.0, 0.0),
            DVec3::new(4.0, 1.0, 1.0),
        ];
        // 3 spans, 4 samples each
        let pts = sample(&ctrl, DEFAULT_TENSION, false, 12).expect("enough points");
        for (i, c) in ctrl.iter().enumerate() {
            assert!(pts[i * 4].distance(*c) < 1e-9, "misses control point {i}");
        }
    }

    #[test]
    fn test_closed_curve_wraps() {
        let ctrl = [
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(-1.0, 0.0, 0.0),
            DVec3::new(0.0, -1.0, 0.0),
        ];
        let pts = sample(&ctrl, DEFAULT_TENSION, true, 16).expect("enough points");
        assert_eq!(pts.len(), 17);
        assert!(pts[0].distance(pts[16]) < 1e-12);
        for (i, c) in ctrl.iter().enumerate() {
            assert!(pts[i * 4].distance(*c) < 1e-9);
        }
    }

    #[test]
    fn test_zero_tension_midpoint() {
        // zero tangents: plain smoothstep between p1 and p2
        let ctrl = [DVec3::ZERO, DVec3::X * 2.0, DVec3::new(2.0, 2.0, 0.0)];
        let pts = sample(&ctrl, 0.0, false, 4).expect("enough points");
        assert!(pts[1].distance(DVec3::X) < 1e-12);
    }
}
