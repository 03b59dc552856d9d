use glam::DVec3;

use crate::config::{SketchConfig, ToleranceConfig};
use crate::sketch::{Primitive, RectMode, RectPrimitive};

/// Draws rectangles from a diagonal or from a centerline plus width
#[derive(Debug, Clone)]
pub struct RectTool {
    mode: RectMode,
    plane_normal: DVec3,
    points: Vec<DVec3>,
    preview: Option<Primitive>,
    tolerances: ToleranceConfig,
}

impl RectTool {
    pub fn new(mode: RectMode, plane_normal: DVec3, config: &SketchConfig) -> Self {
        Self {
            mode,
            plane_normal,
            points: Vec::with_capacity(3),
            preview: None,
            tolerances: config.tolerances.clone(),
        }
    }

    pub fn mode(&self) -> RectMode {
        self.mode
    }

    fn build(&self, points: &[DVec3]) -> Option<RectPrimitive> {
        let (start, rest) = points.split_first()?;
        let mut rect = RectPrimitive::new(self.mode, *start, self.plane_normal);
        rect.end = rest.first().copied();
        rect.p3 = rest.get(1).copied();
        rect.recompute(&self.tolerances);
        Some(rect)
    }

    pub fn on_pointer_move(&mut self, point: DVec3) {
        if self.points.is_empty() || self.is_complete() {
            return;
        }
        let mut points = self.points.clone();
        points.push(point);
        self.preview = self.build(&points).map(Primitive::Rect);
    }

    pub fn on_click(&mut self, point: DVec3) -> bool {
        if !self.is_complete() {
            self.points.push(point);
        }
        self.preview = self.build(&self.points).map(Primitive::Rect);
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
        assert!(self.is_complete(), "finalize called on a rectangle with {} points", self.points.len());
        let points = std::mem::take(&mut self.points);
        self.preview = None;

        let rect = self.build(&points)?;
        if rect.corners.is_none() {
            tracing::warn!("Discarding degenerate rectangle from {:?}", points);
            return None;
        }
        Some(Primitive::Rect(rect))
    }

    pub fn cancel(&mut self) {
        self.points.clear();
        self.preview = None;
    }

    pub fn preview(&self) -> Option<&Primitive> {
        self.preview.as_ref()
    }
}
