use glam::DVec3;

use crate::config::SketchConfig;
use crate::sketch::{Primitive, SplinePrimitive};

/// Collects control points until the user finishes the spline.
///
/// Clicking never completes a spline on its own; the session calls
/// [`SplineTool::finish`] on Enter, double-click, Escape or the context menu.
#[derive(Debug, Clone)]
pub struct SplineTool {
    points: Vec<DVec3>,
    preview: Option<Primitive>,
    tension: f64,
    segments: u32,
    handles_visible: bool,
    min_spacing: f64,
}

impl SplineTool {
    pub fn new(config: &SketchConfig) -> Self {
        Self {
            points: Vec::new(),
            preview: None,
            tension: config.tools.spline_tension,
            segments: config.tessellation.spline_segments,
            handles_visible: config.tools.handles_visible,
            min_spacing: config.tolerances.zero_length,
        }
    }

    fn build(&self, points: Vec<DVec3>) -> SplinePrimitive {
        let mut spline = SplinePrimitive::new(points, self.tension);
        spline.segments = self.segments;
        spline.handles_visible = self.handles_visible;
        spline
    }

    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    pub fn on_pointer_move(&mut self, point: DVec3) {
        if self.points.is_empty() {
            return;
        }
        let mut points = self.points.clone();
        points.push(point);
        self.preview = Some(Primitive::Spline(self.build(points)));
    }

    /// Add a control point. Always false: splines finish on a signal.
    pub fn on_click(&mut self, point: DVec3) -> bool {
        // the two clicks of a double-click land on the same spot
        let duplicate = self
            .points
            .last()
            .is_some_and(|last| last.distance(point) < self.min_spacing);
        if duplicate {
            tracing::debug!("Ignoring repeated spline point at {:?}", point);
        } else {
            self.points.push(point);
        }
        self.preview = Some(Primitive::Spline(self.build(self.points.clone())));
        false
    }

    pub fn is_complete(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn is_drawing(&self) -> bool {
        !self.points.is_empty()
    }

    /// # Panics
    ///
    /// Panics with fewer than two control points.
    pub fn finalize(&mut self) -> Option<Primitive> {
        assert!(self.is_complete(), "finalize called on a spline with {} points", self.points.len());
        let points = std::mem::take(&mut self.points);
        self.preview = None;
        Some(Primitive::Spline(self.build(points)))
    }

    /// Commit the spline if it has enough points, otherwise discard it
    pub fn finish(&mut self) -> Option<Primitive> {
        if self.is_complete() {
            self.finalize()
        } else {
            if self.is_drawing() {
                tracing::debug!("Discarding spline with {} point", self.points.len());
            }
            self.cancel();
            None
        }
    }

    pub fn cancel(&mut self) {
        self.points.clear();
        self.preview = None;
    }

    pub fn preview(&self) -> Option<&Primitive> {
        self.preview.as_ref()
    }
}
