use glam::DVec3;

use crate::config::{Precision, SketchConfig, ToleranceConfig};
use crate::sketch::{ArcMode, ArcPrimitive, Primitive};

/// Draws arcs from three clicks.
///
/// `ThreePoints`: both endpoints, then a point on the arc.
/// `CenterStartEnd`: center, start, then the end direction.
#[derive(Debug, Clone)]
pub struct ArcTool {
    mode: ArcMode,
    plane_normal: DVec3,
    points: Vec<DVec3>,
    preview: Option<Primitive>,
    tolerances: ToleranceConfig,
}

impl ArcTool {
    pub fn new(mode: ArcMode, plane_normal: DVec3, config: &SketchConfig) -> Self {
        Self {
            mode,
            plane_normal,
            points: Vec::with_capacity(3),
            preview: None,
            tolerances: config.tolerances.clone(),
        }
    }

    pub fn mode(&self) -> ArcMode {
        self.mode
    }

    fn build(&self, points: Vec<DVec3>, precision: Precision) -> ArcPrimitive {
        let mut arc = ArcPrimitive::new(self.mode, points, self.plane_normal);
        if arc.points.len() == 3 {
            arc.recompute(&self.tolerances, precision);
        }
        arc
    }

    pub fn on_pointer_move(&mut self, point: DVec3) {
        if self.points.is_empty() || self.points.len() >= 3 {
            return;
        }
        let mut points = self.points.clone();
        points.push(point);
        self.preview = Some(Primitive::Arc(self.build(points, Precision::Preview)));
    }

    pub fn on_click(&mut self, point: DVec3) -> bool {
        if self.points.len() < 3 {
            self.points.push(point);
        }
        self.preview = Some(Primitive::Arc(self.build(self.points.clone(), Precision::Preview)));
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.points.len() == 3
    }

    pub fn is_drawing(&self) -> bool {
        !self.points.is_empty()
    }

    /// # Panics
    ///
    /// Panics unless all three points have been clicked.
    pub fn finalize(&mut self) -> Option<Primitive> {
        assert!(self.is_complete(), "finalize called on an arc with {} points", self.points.len());
        let points = std::mem::take(&mut self.points);
        self.preview = None;

        let arc = self.build(points, Precision::Commit);
        if arc.geometry.is_none() {
            tracing::warn!("Discarding degenerate arc through {:?}", arc.points);
            return None;
        }
        Some(Primitive::Arc(arc))
    }

    pub fn cancel(&mut self) {
        self.points.clear();
        self.preview = None;
    }

    pub fn preview(&self) -> Option<&Primitive> {
        self.preview.as_ref()
    }
}
