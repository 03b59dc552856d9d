//! Drawing tools
//!
//! One state machine per primitive kind. A tool consumes plane-projected
//! points: `on_pointer_move` only refreshes the preview, `on_click` commits a
//! point and reports whether the primitive has all the points it needs.
//! `finalize` then hands over the primitive, or `None` if its geometry is
//! degenerate, and resets the tool for the next one.

mod arc;
mod circle;
mod line;
mod point;
mod rect;
mod spline;

pub use arc::ArcTool;
pub use circle::CircleTool;
pub use line::LineTool;
pub use point::PointTool;
pub use rect::RectTool;
pub use spline::SplineTool;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::config::SketchConfig;
use crate::sketch::{ArcMode, CircleMode, Primitive, RectMode, SketchPlane};

/// Tool for sketch drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Point,
    Line,
    Arc,
    Circle,
    Rect,
    Spline,
}

impl ToolKind {
    /// Get the display name of the tool
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Point => "Point",
            ToolKind::Line => "Line",
            ToolKind::Arc => "Arc",
            ToolKind::Circle => "Circle",
            ToolKind::Rect => "Rectangle",
            ToolKind::Spline => "Spline",
        }
    }
}

/// Sub-modes of the tools that have more than one way of picking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolModes {
    pub arc: ArcMode,
    pub circle: CircleMode,
    pub rect: RectMode,
}

impl ToolModes {
    pub fn from_config(config: &SketchConfig) -> Self {
        Self {
            arc: config.tools.default_arc_mode,
            circle: config.tools.default_circle_mode,
            rect: config.tools.default_rect_mode,
        }
    }
}

/// The tool currently receiving pick events, owning its pending primitive
#[derive(Debug, Clone)]
pub enum ActiveTool {
    Point(PointTool),
    Line(LineTool),
    Arc(ArcTool),
    Circle(CircleTool),
    Rect(RectTool),
    Spline(SplineTool),
}

impl ActiveTool {
    /// Create a fresh tool drawing on `plane`
    pub fn new(kind: ToolKind, modes: ToolModes, plane: &SketchPlane, config: &SketchConfig) -> Self {
        match kind {
            ToolKind::Point => ActiveTool::Point(PointTool::new()),
            ToolKind::Line => ActiveTool::Line(LineTool::new(config)),
            ToolKind::Arc => ActiveTool::Arc(ArcTool::new(modes.arc, plane.normal, config)),
            ToolKind::Circle => {
                ActiveTool::Circle(CircleTool::new(modes.circle, plane.normal, config))
            }
            ToolKind::Rect => ActiveTool::Rect(RectTool::new(modes.rect, plane.normal, config)),
            ToolKind::Spline => ActiveTool::Spline(SplineTool::new(config)),
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            ActiveTool::Point(_) => ToolKind::Point,
            ActiveTool::Line(_) => ToolKind::Line,
            ActiveTool::Arc(_) => ToolKind::Arc,
            ActiveTool::Circle(_) => ToolKind::Circle,
            ActiveTool::Rect(_) => ToolKind::Rect,
            ActiveTool::Spline(_) => ToolKind::Spline,
        }
    }

    pub fn on_pointer_move(&mut self, point: DVec3) {
        match self {
            ActiveTool::Point(t) => t.on_pointer_move(point),
            ActiveTool::Line(t) => t.on_pointer_move(point),
            ActiveTool::Arc(t) => t.on_pointer_move(point),
            ActiveTool::Circle(t) => t.on_pointer_move(point),
            ActiveTool::Rect(t) => t.on_pointer_move(point),
            ActiveTool::Spline(t) => t.on_pointer_move(point),
        }
    }

    /// Commit a point; true once the primitive is ready to finalize
    pub fn on_click(&mut self, point: DVec3) -> bool {
        match self {
            ActiveTool::Point(t) => t.on_click(point),
            ActiveTool::Line(t) => t.on_click(point),
            ActiveTool::Arc(t) => t.on_click(point),
            ActiveTool::Circle(t) => t.on_click(point),
            ActiveTool::Rect(t) => t.on_click(point),
            ActiveTool::Spline(t) => t.on_click(point),
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            ActiveTool::Point(t) => t.is_complete(),
            ActiveTool::Line(t) => t.is_complete(),
            ActiveTool::Arc(t) => t.is_complete(),
            ActiveTool::Circle(t) => t.is_complete(),
            ActiveTool::Rect(t) => t.is_complete(),
            ActiveTool::Spline(t) => t.is_complete(),
        }
    }

    /// Take the finished primitive and reset the tool.
    ///
    /// # Panics
    ///
    /// Panics if the tool is not complete.
    pub fn finalize(&mut self) -> Option<Primitive> {
        match self {
            ActiveTool::Point(t) => t.finalize(),
            ActiveTool::Line(t) => t.finalize(),
            ActiveTool::Arc(t) => t.finalize(),
            ActiveTool::Circle(t) => t.finalize(),
            ActiveTool::Rect(t) => t.finalize(),
            ActiveTool::Spline(t) => t.finalize(),
        }
    }

    /// Drop the pending primitive
    pub fn cancel(&mut self) {
        match self {
            ActiveTool::Point(t) => t.cancel(),
            ActiveTool::Line(t) => t.cancel(),
            ActiveTool::Arc(t) => t.cancel(),
            ActiveTool::Circle(t) => t.cancel(),
            ActiveTool::Rect(t) => t.cancel(),
            ActiveTool::Spline(t) => t.cancel(),
        }
    }

    /// The pending primitive as it should be shown, cursor included
    pub fn preview(&self) -> Option<&Primitive> {
        match self {
            ActiveTool::Point(t) => t.preview(),
            ActiveTool::Line(t) => t.preview(),
            ActiveTool::Arc(t) => t.preview(),
            ActiveTool::Circle(t) => t.preview(),
            ActiveTool::Rect(t) => t.preview(),
            ActiveTool::Spline(t) => t.preview(),
        }
    }

    /// Check if at least one point has been committed
    pub fn is_drawing(&self) -> bool {
        match self {
            ActiveTool::Point(t) => t.is_complete(),
            ActiveTool::Line(t) => t.is_drawing(),
            ActiveTool::Arc(t) => t.is_drawing(),
            ActiveTool::Circle(t) => t.is_drawing(),
            ActiveTool::Rect(t) => t.is_drawing(),
            ActiveTool::Spline(t) => t.is_drawing(),
        }
    }
}
