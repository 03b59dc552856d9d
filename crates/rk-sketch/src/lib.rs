//! RK Sketch Core
//!
//! Interactive construction of 2D sketch primitives on 3D planes:
//! - Geometry: plane bases, circumcircles, arc resolution, rectangle corners, Catmull-Rom sampling
//! - Primitives: point, line, arc, circle, rectangle, spline
//! - Tools: one multi-click state machine per primitive kind
//! - Session: routes plane-projected pick events to the active tool and owns the sketch being built
//! - Render contract: scoped handles into an external scene
//! - Serialization: JSON records with derived-field recomputation
//!
//! The crate performs no I/O and owns no threads.

pub mod config;
pub mod geometry;
pub mod render;
pub mod session;
pub mod sketch;
pub mod tools;

pub use config::*;
pub use geometry::{Circle, PlaneBasis, ResolvedArc};
pub use render::*;
pub use session::*;
pub use sketch::*;
pub use tools::*;
