use glam::DVec3;

use crate::config::{Precision, SketchConfig, ToleranceConfig};
use crate::sketch::{CircleMode, CirclePrimitive, Primitive};

/// Draws circles from a center and rim point, or from three rim points
#[derive(Debug, Clone)]
pub struct CircleTool {
    mode: CircleMode,
    plane_normal: DVec3,
    points: Vec<DVec3>,
    preview: Option<Primitive>,
    tolerances: ToleranceConfig,
}

impl CircleTool {
    pub fn new(mode: CircleMode, plane_normal: DVec3, config: &SketchConfig) -> Self {
        Self {
            mode,
            plane_normal,
            points: Vec::with_capacity(3),
            preview: None,
            tolerances: config.tolerances.clone(),
        }
    }

    pub fn mode(&self) -> CircleMode {
        self.mode
    }

    fn build(&self, points: &[DVec3], precision: Precision) -> Option<CirclePrimitive> {
        let (first, rest) = points.split_first()?;
        let mut circle = CirclePrimitive::new(self.mode, *first, self.plane_normal);
        circle.point2 = rest.first().copied();
        circle.point3 = rest.get(1).copied();
        circle.recompute(&self.tolerances, precision);
        Some(circle)
    }

    pub fn on_pointer_move(&mut self, point: DVec3) {
        if self.points.is_empty() || self.is_complete() {
            return;
        }
        let mut points = self.points.clone();
        points.push(point);
        self.preview = self
            .build(&points, Precision::Preview)
            .map(Primitive::Circle);
    }

    pub fn on_click(&mut self, point: DVec3) -> bool {
        if !self.is_complete() {
            self.points.push(point);
        }
        self.preview = self
            .build(&self.points, Precision::Preview)
            .map(Primitive::Circle);
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.points.len() >= self.mode.required_points()
    }

    pub fn is_drawing(&self) -> bool {
        !self.points.is_empty()
    }

    /// # Panics
    ///
    /// Panics unless every point of the mode has been clicked.
    pub fn finalize(&mut self) -> Option<Primitive> {
        assert!(self.is_complete(), "finalize called on a circle with {} points", self.points.len());
        let points = std::mem::take(&mut self.points);
        self.preview = None;

        let circle = self.build(&points, Precision::Commit)?;
        if circle.radius <= 0.0 {
            tracing::warn!("Discarding degenerate circle through {:?}", points);
            return None;
        }
        Some(Primitive::Circle(circle))
    }

    pub fn cancel(&mut self) {
        self.points.clear();
        self.preview = None;
    }

    pub fn preview(&self) -> Option<&Primitive> {
        self.preview.as_ref()
    }
}
