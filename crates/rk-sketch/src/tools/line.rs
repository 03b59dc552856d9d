use glam::DVec3;

use crate::config::SketchConfig;
use crate::sketch::{LinePrimitive, Primitive};

/// Draws line segments; in continuous mode each segment starts where the
/// previous one ended until the tool is cancelled.
#[derive(Debug, Clone)]
pub struct LineTool {
    start: Option<DVec3>,
    end: Option<DVec3>,
    preview: Option<Primitive>,
    continuous: bool,
    min_length: f64,
}

impl LineTool {
    pub fn new(config: &SketchConfig) -> Self {
        Self {
            start: None,
            end: None,
            preview: None,
            continuous: config.tools.continuous_line,
            min_length: config.tolerances.zero_length,
        }
    }

    pub fn on_pointer_move(&mut self, point: DVec3) {
        if let Some(start) = self.start {
            self.preview = Some(Primitive::Line(LinePrimitive {
                start,
                end: Some(point),
            }));
        }
    }

    pub fn on_click(&mut self, point: DVec3) -> bool {
        match self.start {
            None => {
                self.start = Some(point);
                self.preview = Some(Primitive::Line(LinePrimitive {
                    start: point,
                    end: None,
                }));
                false
            }
            Some(_) => {
                self.end = Some(point);
                true
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    pub fn is_drawing(&self) -> bool {
        self.start.is_some()
    }

    /// Take the segment and re-arm at its end in continuous mode.
    ///
    /// # Panics
    ///
    /// Panics if the segment has no end yet.
    pub fn finalize(&mut self) -> Option<Primitive> {
        let (Some(start), Some(end)) = (self.start, self.end.take()) else {
            panic!("finalize called on a line without both endpoints");
        };

        if self.continuous {
            self.start = Some(end);
            self.preview = Some(Primitive::Line(LinePrimitive { start: end, end: None }));
        } else {
            self.start = None;
            self.preview = None;
        }

        if start.distance(end) < self.min_length {
            tracing::debug!("Ignoring zero-length line at {:?}", start);
            return None;
        }
        Some(Primitive::Line(LinePrimitive {
            start,
            end: Some(end),
        }))
    }

    pub fn cancel(&mut self) {
        self.start = None;
        self.end = None;
        self.preview = None;
    }

    pub fn preview(&self) -> Option<&Primitive> {
        self.preview.as_ref()
    }
}
