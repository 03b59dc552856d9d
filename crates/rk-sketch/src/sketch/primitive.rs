//! Sketch primitives
//!
//! Defines the geometric elements produced by the drawing tools. Each
//! primitive keeps the points the user picked; circle, arc and rectangle
//! also carry fields derived from those points, which `recompute` refreshes.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::config::{Precision, TessellationConfig, ToleranceConfig};
use crate::geometry::{PlaneBasis, ResolvedArc, arc, circle, rect, spline};
use crate::render::RenderShape;

/// How an arc is picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArcMode {
    /// Two endpoints, then a point the arc passes through
    #[default]
    ThreePoints,
    /// Center, start (fixes the radius), then the end direction
    CenterStartEnd,
}

impl ArcMode {
    /// Name used in sketch documents
    pub fn as_str(&self) -> &'static str {
        match self {
            ArcMode::ThreePoints => "threePoints",
            ArcMode::CenterStartEnd => "centerStartEnd",
        }
    }

    /// Parse a document name, accepting the hyphenated spelling too
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "threePoints" | "threePoint" | "three-points" | "three-point" => {
                Some(ArcMode::ThreePoints)
            }
            "centerStartEnd" | "center-start-end" => Some(ArcMode::CenterStartEnd),
            _ => None,
        }
    }
}

/// How a circle is picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CircleMode {
    /// Center, then a point on the circumference
    #[default]
    TwoPoint,
    /// Three points on the circumference
    ThreePoint,
}

impl CircleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircleMode::TwoPoint => "two-point",
            CircleMode::ThreePoint => "three-point",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "two-point" | "twoPoint" => Some(CircleMode::TwoPoint),
            "three-point" | "threePoint" => Some(CircleMode::ThreePoint),
            _ => None,
        }
    }

    /// Clicks needed to define the circle
    pub fn required_points(&self) -> usize {
        match self {
            CircleMode::TwoPoint => 2,
            CircleMode::ThreePoint => 3,
        }
    }
}

/// How a rectangle is picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RectMode {
    /// Two opposite corners
    #[default]
    TwoPoint,
    /// Centerline endpoints, then a point fixing the half-width
    ThreePoint,
}

impl RectMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RectMode::TwoPoint => "twoPoint",
            RectMode::ThreePoint => "threePoint",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "twoPoint" | "two-point" => Some(RectMode::TwoPoint),
            "threePoint" | "three-point" => Some(RectMode::ThreePoint),
            _ => None,
        }
    }

    /// Clicks needed to define the rectangle
    pub fn required_points(&self) -> usize {
        match self {
            RectMode::TwoPoint => 2,
            RectMode::ThreePoint => 3,
        }
    }
}

/// A single point
#[derive(Debug, Clone, PartialEq)]
pub struct PointPrimitive {
    pub position: DVec3,
}

/// A line segment; `end` is `None` until the second click
#[derive(Debug, Clone, PartialEq)]
pub struct LinePrimitive {
    pub start: DVec3,
    pub end: Option<DVec3>,
}

impl LinePrimitive {
    pub fn length(&self) -> Option<f64> {
        self.end.map(|end| self.start.distance(end))
    }
}

/// Derived circle and sweep of an arc
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    pub center: DVec3,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl ArcGeometry {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn length(&self) -> f64 {
        self.radius * self.sweep().abs()
    }
}

impl From<&ResolvedArc> for ArcGeometry {
    fn from(arc: &ResolvedArc) -> Self {
        Self {
            center: arc.center,
            radius: arc.radius,
            start_angle: arc.start_angle,
            end_angle: arc.end_angle,
        }
    }
}

/// A circular arc
#[derive(Debug, Clone, PartialEq)]
pub struct ArcPrimitive {
    pub mode: ArcMode,
    /// Picked points in click order, at most three
    pub points: Vec<DVec3>,
    /// Normal of the sketch plane
    pub plane_normal: DVec3,
    /// `None` while pending or when the points are degenerate
    pub geometry: Option<ArcGeometry>,
}

impl ArcPrimitive {
    pub fn new(mode: ArcMode, points: Vec<DVec3>, plane_normal: DVec3) -> Self {
        Self {
            mode,
            points,
            plane_normal,
            geometry: None,
        }
    }

    /// Frame the angles are measured in.
    ///
    /// Three-point arcs use the plane of their points; center-start-end arcs
    /// use the sketch plane normal.
    pub fn basis(&self) -> PlaneBasis {
        match (self.mode, self.points.as_slice()) {
            (ArcMode::ThreePoints, [p1, p2, p3, ..]) => PlaneBasis::from_three_points(*p1, *p2, *p3),
            _ => PlaneBasis::from_normal(self.plane_normal),
        }
    }

    /// Resolve the arc from its points, sampled with `steps` steps.
    pub fn resolve(
        &self,
        steps: u32,
        tolerances: &ToleranceConfig,
        precision: Precision,
    ) -> Option<ResolvedArc> {
        let [p1, p2, p3] = self.points.as_slice() else {
            return None;
        };
        let resolved = match self.mode {
            ArcMode::ThreePoints => arc::three_point_arc(
                *p1,
                *p2,
                *p3,
                steps,
                tolerances.collinear_threshold(precision),
            ),
            ArcMode::CenterStartEnd => arc::center_start_end_arc(
                *p1,
                *p2,
                *p3,
                self.plane_normal,
                steps,
                tolerances.sweep,
            ),
        }?;
        (resolved.radius >= tolerances.zero_length).then_some(resolved)
    }

    /// Refresh `geometry` from the points. Returns false if degenerate.
    pub fn recompute(&mut self, tolerances: &ToleranceConfig, precision: Precision) -> bool {
        self.geometry = self
            .resolve(1, tolerances, precision)
            .map(|resolved| ArcGeometry::from(&resolved));
        self.geometry.is_some()
    }

    /// Polyline along the resolved sweep
    pub fn polyline(&self, steps: u32) -> Option<Vec<DVec3>> {
        let g = self.geometry?;
        Some(arc::sample(
            g.center,
            g.radius,
            &self.basis(),
            g.start_angle,
            g.end_angle,
            steps,
        ))
    }
}

/// A full circle
#[derive(Debug, Clone, PartialEq)]
pub struct CirclePrimitive {
    pub mode: CircleMode,
    pub point1: DVec3,
    pub point2: Option<DVec3>,
    pub point3: Option<DVec3>,
    pub plane_normal: DVec3,
    pub center: DVec3,
    /// Zero while pending or degenerate
    pub radius: f64,
}

impl CirclePrimitive {
    pub fn new(mode: CircleMode, point1: DVec3, plane_normal: DVec3) -> Self {
        Self {
            mode,
            point1,
            point2: None,
            point3: None,
            plane_normal,
            center: point1,
            radius: 0.0,
        }
    }

    pub fn basis(&self) -> PlaneBasis {
        PlaneBasis::from_normal(self.plane_normal)
    }

    /// Refresh center and radius from the points. Returns false if degenerate,
    /// in which case the radius is reset to zero.
    pub fn recompute(&mut self, tolerances: &ToleranceConfig, precision: Precision) -> bool {
        let fitted = match (self.mode, self.point2, self.point3) {
            (CircleMode::TwoPoint, Some(p2), _) => Some(circle::two_point(self.point1, p2)),
            (CircleMode::ThreePoint, Some(p2), Some(p3)) => circle::three_point(
                self.point1,
                p2,
                p3,
                self.plane_normal,
                tolerances.collinear_threshold(precision),
            ),
            _ => None,
        };

        match fitted {
            Some(c) if c.radius >= tolerances.zero_length => {
                self.center = c.center;
                self.radius = c.radius;
                true
            }
            _ => {
                self.center = self.point1;
                self.radius = 0.0;
                false
            }
        }
    }

    pub fn polyline(&self, segments: u32) -> Option<Vec<DVec3>> {
        (self.radius > 0.0).then(|| {
            circle::Circle {
                center: self.center,
                radius: self.radius,
            }
            .sample(&self.basis(), segments)
        })
    }
}

/// A rectangle on the sketch plane
#[derive(Debug, Clone, PartialEq)]
pub struct RectPrimitive {
    pub mode: RectMode,
    pub start: DVec3,
    pub end: Option<DVec3>,
    pub p3: Option<DVec3>,
    pub plane_normal: DVec3,
    /// `None` while pending or degenerate
    pub corners: Option<[DVec3; 4]>,
}

impl RectPrimitive {
    pub fn new(mode: RectMode, start: DVec3, plane_normal: DVec3) -> Self {
        Self {
            mode,
            start,
            end: None,
            p3: None,
            plane_normal,
            corners: None,
        }
    }

    /// Refresh the corners. Returns false if degenerate.
    pub fn recompute(&mut self, tolerances: &ToleranceConfig) -> bool {
        let corners = match (self.mode, self.end, self.p3) {
            (RectMode::TwoPoint, Some(end), _) => Some(rect::two_point(
                self.start,
                end,
                &PlaneBasis::from_normal(self.plane_normal),
            )),
            (RectMode::ThreePoint, Some(end), Some(p3)) => {
                Some(rect::three_point(self.start, end, p3, self.plane_normal))
            }
            _ => None,
        };
        self.corners = corners.filter(|c| !rect::is_degenerate(c, tolerances.zero_length));
        self.corners.is_some()
    }
}

/// A Catmull-Rom spline through control points
#[derive(Debug, Clone, PartialEq)]
pub struct SplinePrimitive {
    pub control_points: Vec<DVec3>,
    pub tension: f64,
    pub closed: bool,
    /// Samples along the whole curve
    pub segments: u32,
    pub handles_visible: bool,
}

impl SplinePrimitive {
    pub fn new(control_points: Vec<DVec3>, tension: f64) -> Self {
        Self {
            control_points,
            tension,
            closed: false,
            segments: spline::DEFAULT_SEGMENTS,
            handles_visible: true,
        }
    }

    /// Sampled curve, `None` below two control points
    pub fn curve(&self) -> Option<Vec<DVec3>> {
        spline::sample(&self.control_points, self.tension, self.closed, self.segments)
    }

    /// Move one control point. Returns false if `index` is out of range.
    pub fn set_point(&mut self, index: usize, position: DVec3) -> bool {
        match self.control_points.get_mut(index) {
            Some(point) => {
                *point = position;
                true
            }
            None => false,
        }
    }

    /// Join the last control point back to the first
    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// Catmull-Rom tension; non-finite values are ignored
    pub fn set_tension(&mut self, tension: f64) -> bool {
        if !tension.is_finite() {
            return false;
        }
        self.tension = tension;
        true
    }

    /// Index of the control point nearest to `position` within `radius`
    pub fn pick_handle(&self, position: DVec3, radius: f64) -> Option<usize> {
        self.control_points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.distance(position)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}

/// A sketch primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Point(PointPrimitive),
    Line(LinePrimitive),
    Arc(ArcPrimitive),
    Circle(CirclePrimitive),
    Rect(RectPrimitive),
    Spline(SplinePrimitive),
}

impl Primitive {
    /// Get the type name of this primitive
    pub fn type_name(&self) -> &'static str {
        match self {
            Primitive::Point(_) => "Point",
            Primitive::Line(_) => "Line",
            Primitive::Arc(_) => "Arc",
            Primitive::Circle(_) => "Circle",
            Primitive::Rect(_) => "Rect",
            Primitive::Spline(_) => "Spline",
        }
    }

    /// Check if every point the primitive needs has been picked
    pub fn is_complete(&self) -> bool {
        match self {
            Primitive::Point(_) => true,
            Primitive::Line(line) => line.end.is_some(),
            Primitive::Arc(arc) => arc.points.len() == 3,
            Primitive::Circle(c) => match c.mode {
                CircleMode::TwoPoint => c.point2.is_some(),
                CircleMode::ThreePoint => c.point2.is_some() && c.point3.is_some(),
            },
            Primitive::Rect(r) => match r.mode {
                RectMode::TwoPoint => r.end.is_some(),
                RectMode::ThreePoint => r.end.is_some() && r.p3.is_some(),
            },
            Primitive::Spline(s) => s.control_points.len() >= 2,
        }
    }

    /// Check if a complete primitive has no usable geometry: zero length or
    /// radius, collinear fit points, an empty sweep or a collapsed edge.
    ///
    /// Derived fields must be current (see the `recompute` methods).
    pub fn is_degenerate(&self, tolerances: &ToleranceConfig) -> bool {
        if !self.is_complete() {
            return false;
        }
        match self {
            Primitive::Point(_) => false,
            Primitive::Line(line) => line.length().is_none_or(|len| len < tolerances.zero_length),
            Primitive::Arc(arc) => arc.geometry.is_none(),
            Primitive::Circle(c) => !(c.radius > 0.0 && c.radius.is_finite()),
            Primitive::Rect(r) => r.corners.is_none(),
            Primitive::Spline(_) => false,
        }
    }

    /// Points the user picked, in order
    pub fn control_points(&self) -> Vec<DVec3> {
        match self {
            Primitive::Point(p) => vec![p.position],
            Primitive::Line(l) => std::iter::once(l.start).chain(l.end).collect(),
            Primitive::Arc(a) => a.points.clone(),
            Primitive::Circle(c) => std::iter::once(c.point1).chain(c.point2).chain(c.point3).collect(),
            Primitive::Rect(r) => std::iter::once(r.start).chain(r.end).chain(r.p3).collect(),
            Primitive::Spline(s) => s.control_points.clone(),
        }
    }

    /// Shape to draw for this primitive.
    ///
    /// Pending primitives draw their construction lines dashed. Complete but
    /// degenerate primitives draw nothing.
    pub fn render_shape(&self, tessellation: &TessellationConfig) -> Option<RenderShape> {
        match self {
            Primitive::Point(p) => Some(RenderShape::Marker {
                position: p.position,
            }),
            Primitive::Line(line) => Some(match line.end {
                Some(end) => RenderShape::solid(vec![line.start, end], false),
                None => RenderShape::Marker {
                    position: line.start,
                },
            }),
            Primitive::Arc(arc) => {
                if let Some(points) = arc.polyline(tessellation.arc_segments) {
                    return Some(RenderShape::solid(points, false));
                }
                match arc.points.as_slice() {
                    [] => None,
                    [p] => Some(RenderShape::Marker { position: *p }),
                    [_, _] => Some(RenderShape::dashed(arc.points.clone())),
                    _ => None,
                }
            }
            Primitive::Circle(c) => {
                if let Some(points) = c.polyline(tessellation.circle_segments) {
                    return Some(RenderShape::solid(points, true));
                }
                if self.is_complete() {
                    return None;
                }
                match c.point2 {
                    Some(p2) => Some(RenderShape::dashed(vec![c.point1, p2])),
                    None => Some(RenderShape::Marker { position: c.point1 }),
                }
            }
            Primitive::Rect(r) => {
                if let Some(corners) = r.corners {
                    return Some(RenderShape::solid(corners.to_vec(), true));
                }
                if self.is_complete() {
                    return None;
                }
                match r.end {
                    Some(end) => Some(RenderShape::dashed(vec![r.start, end])),
                    None => Some(RenderShape::Marker { position: r.start }),
                }
            }
            Primitive::Spline(s) => match s.curve() {
                Some(points) => Some(RenderShape::solid(points, s.closed)),
                None => s
                    .control_points
                    .first()
                    .map(|p| RenderShape::Marker { position: *p }),
            },
        }
    }
}
