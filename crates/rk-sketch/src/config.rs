//! Sketch configuration
//!
//! Sampling density, numeric thresholds and tool defaults. Loaded and saved
//! by the host application; the library only reads it.

use serde::{Deserialize, Serialize};

use crate::geometry::{DEGENERATE_EPSILON, PREVIEW_EPSILON, SWEEP_EPSILON, ZERO_LENGTH_EPSILON};
use crate::geometry::spline::{DEFAULT_SEGMENTS, DEFAULT_TENSION};
use crate::sketch::{ArcMode, CircleMode, RectMode};

/// Number of samples used when turning curves into polylines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TessellationConfig {
    /// Steps along an arc sweep
    pub arc_segments: u32,
    /// Steps around a full circle
    pub circle_segments: u32,
    /// Steps along a whole spline
    pub spline_segments: u32,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            arc_segments: 64,
            circle_segments: 64,
            spline_segments: DEFAULT_SEGMENTS,
        }
    }
}

/// Which collinearity threshold a fit should use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Committing a primitive on click or reload
    Commit,
    /// Recomputing the preview under the cursor
    Preview,
}

/// Numeric thresholds for degeneracy checks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToleranceConfig {
    /// Collinearity threshold for committed circles and arcs
    pub collinear: f64,
    /// Collinearity threshold while previewing
    pub preview_collinear: f64,
    /// Shortest accepted line, radius or rectangle edge
    pub zero_length: f64,
    /// Smallest accepted arc sweep (radians)
    pub sweep: f64,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            collinear: DEGENERATE_EPSILON,
            preview_collinear: PREVIEW_EPSILON,
            zero_length: ZERO_LENGTH_EPSILON,
            sweep: SWEEP_EPSILON,
        }
    }
}

impl ToleranceConfig {
    pub fn collinear_threshold(&self, precision: Precision) -> f64 {
        match precision {
            Precision::Commit => self.collinear,
            Precision::Preview => self.preview_collinear,
        }
    }
}

/// Drawing tool defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolConfig {
    /// Re-arm the line tool at the end of each segment
    pub continuous_line: bool,
    pub default_rect_mode: RectMode,
    pub default_circle_mode: CircleMode,
    pub default_arc_mode: ArcMode,
    /// Catmull-Rom tension for new splines
    pub spline_tension: f64,
    /// Distance within which a press grabs a spline control point
    pub handle_pick_radius: f64,
    /// Show control-point handles on finished splines
    pub handles_visible: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            continuous_line: true,
            default_rect_mode: RectMode::TwoPoint,
            default_circle_mode: CircleMode::TwoPoint,
            default_arc_mode: ArcMode::ThreePoints,
            spline_tension: DEFAULT_TENSION,
            handle_pick_radius: 1.2,
            handles_visible: true,
        }
    }
}

/// Complete sketch configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SketchConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub tessellation: TessellationConfig,
    #[serde(default)]
    pub tolerances: ToleranceConfig,
    #[serde(default)]
    pub tools: ToolConfig,
}

impl SketchConfig {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            ..Default::default()
        }
    }
}
