//! 2D Sketch Model
//!
//! Provides the data a sketch session builds:
//! - Construction planes (the named reference planes and custom ones)
//! - Primitives (points, lines, arcs, circles, rectangles, splines)
//! - Sketch items pairing a primitive with its scene objects
//! - JSON records for saving and loading sketches

mod primitive;
mod serialization;

pub use primitive::*;
pub use serialization::*;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::TessellationConfig;
use crate::geometry::PlaneBasis;
use crate::render::{RenderHandle, SceneHandle};

/// Sketch-related errors
#[derive(Debug, Clone, Error)]
pub enum SketchError {
    #[error("Unknown primitive type: {0}")]
    UnknownPrimitive(String),

    #[error("{kind}: missing field '{field}'")]
    MissingField { kind: &'static str, field: &'static str },

    #[error("{kind}: invalid field '{field}': {reason}")]
    InvalidField {
        kind: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("JSON error: {0}")]
    Json(String),

    #[error("No sketch in progress")]
    NoActiveSketch,

    #[error("A sketch is already in progress")]
    SketchInProgress,

    #[error("No construction plane selected")]
    NoActivePlane,

    #[error("Sketch item not found: {0}")]
    ItemNotFound(Uuid),
}

impl From<serde_json::Error> for SketchError {
    fn from(e: serde_json::Error) -> Self {
        SketchError::Json(e.to_string())
    }
}

/// Result type for sketch operations
pub type SketchResult<T> = Result<T, SketchError>;

/// Name of the reference plane closest to a sketch plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaneName {
    XY,
    XZ,
    YZ,
}

impl PlaneName {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaneName::XY => "XY",
            PlaneName::XZ => "XZ",
            PlaneName::YZ => "YZ",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "XY" => Some(PlaneName::XY),
            "XZ" => Some(PlaneName::XZ),
            "YZ" => Some(PlaneName::YZ),
            _ => None,
        }
    }

    /// The reference plane through the origin
    pub fn plane(&self) -> SketchPlane {
        match self {
            PlaneName::XY => SketchPlane::xy(),
            PlaneName::XZ => SketchPlane::xz(),
            PlaneName::YZ => SketchPlane::yz(),
        }
    }
}

/// A plane on which sketches are drawn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SketchPlane {
    /// Origin of the plane in 3D space
    pub origin: DVec3,
    /// Unit normal of the plane
    pub normal: DVec3,
}

impl Default for SketchPlane {
    fn default() -> Self {
        Self::xy()
    }
}

impl SketchPlane {
    /// XY plane at origin (Z = 0)
    pub fn xy() -> Self {
        Self {
            origin: DVec3::ZERO,
            normal: DVec3::Z,
        }
    }

    /// XZ plane at origin (Y = 0)
    pub fn xz() -> Self {
        Self {
            origin: DVec3::ZERO,
            normal: DVec3::Y,
        }
    }

    /// YZ plane at origin (X = 0)
    pub fn yz() -> Self {
        Self {
            origin: DVec3::ZERO,
            normal: DVec3::X,
        }
    }

    /// Create a custom plane. A zero normal falls back to +Z.
    pub fn new(origin: DVec3, normal: DVec3) -> Self {
        Self {
            origin,
            normal: normal.try_normalize().unwrap_or(DVec3::Z),
        }
    }

    /// Classify the plane by its dominant normal axis
    pub fn name(&self) -> PlaneName {
        if self.normal.x.abs() > 0.9 {
            PlaneName::YZ
        } else if self.normal.y.abs() > 0.9 {
            PlaneName::XZ
        } else {
            PlaneName::XY
        }
    }

    pub fn basis(&self) -> PlaneBasis {
        PlaneBasis::from_normal(self.normal)
    }

    /// Convert a 2D point on the sketch to 3D world coordinates
    pub fn to_world(&self, point: DVec2) -> DVec3 {
        self.basis().to_world(self.origin, point)
    }

    /// Convert a 3D world point to 2D sketch coordinates
    pub fn to_local(&self, point: DVec3) -> DVec2 {
        self.basis().to_local(self.origin, point)
    }

    /// Signed distance of `point` from the plane
    pub fn distance(&self, point: DVec3) -> f64 {
        (point - self.origin).dot(self.normal)
    }

    /// Orthogonal projection of `point` onto the plane
    pub fn project(&self, point: DVec3) -> DVec3 {
        point - self.normal * self.distance(point)
    }

    pub fn contains(&self, point: DVec3, tolerance: f64) -> bool {
        self.distance(point).abs() <= tolerance
    }
}

/// An opaque constraint record carried through load and save
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SketchConstraint {
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Constrained items: item ids, or item indices in older documents
    #[serde(default)]
    pub entities: Vec<serde_json::Value>,
    /// Any other fields, kept verbatim
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

/// A finalized primitive in a sketch together with its scene objects
#[derive(Debug)]
pub struct SketchItem {
    pub id: Uuid,
    pub name: String,
    pub primitive: Primitive,
    pub handle: RenderHandle,
}

impl SketchItem {
    /// Create an item that is not drawn yet
    pub fn new(primitive: Primitive) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: primitive.type_name().to_string(),
            primitive,
            handle: RenderHandle::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Draw or redraw the primitive, including spline handles
    pub fn draw(&mut self, scene: &mut dyn SceneHandle, tessellation: &TessellationConfig) {
        self.handle
            .show(scene, self.primitive.render_shape(tessellation));
        if let Primitive::Spline(spline) = &self.primitive {
            self.handle
                .show_handles(scene, &spline.control_points, spline.handles_visible);
        }
    }

    /// Release the scene objects
    pub fn remove(&mut self, scene: &mut dyn SceneHandle) {
        self.handle.remove(scene);
    }
}

/// A 2D sketch containing finalized primitives
#[derive(Debug)]
pub struct Sketch {
    /// Unique identifier
    pub id: Uuid,
    /// Name of the sketch
    pub name: String,
    /// Plane on which the sketch is drawn
    pub plane: SketchPlane,
    items: Vec<SketchItem>,
    constraints: Vec<SketchConstraint>,
}

impl Default for Sketch {
    fn default() -> Self {
        Self::new("Sketch", SketchPlane::xy())
    }
}

impl Sketch {
    /// Create a new sketch on the given plane
    pub fn new(name: impl Into<String>, plane: SketchPlane) -> Self {
        Self::with_id(Uuid::new_v4(), name, plane)
    }

    /// Create a sketch with a specific ID
    pub fn with_id(id: Uuid, name: impl Into<String>, plane: SketchPlane) -> Self {
        Self {
            id,
            name: name.into(),
            plane,
            items: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Append an item, returning its id
    pub fn add_item(&mut self, item: SketchItem) -> Uuid {
        let id = item.id;
        self.items.push(item);
        id
    }

    pub fn get_item(&self, id: Uuid) -> Option<&SketchItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn get_item_mut(&mut self, id: Uuid) -> Option<&mut SketchItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Remove an item; its scene objects are the caller's to release
    pub fn remove_item(&mut self, id: Uuid) -> SketchResult<SketchItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(SketchError::ItemNotFound(id))?;
        Ok(self.items.remove(index))
    }

    /// Items in the order they were finalized
    pub fn items(&self) -> &[SketchItem] {
        &self.items
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut SketchItem> {
        self.items.iter_mut()
    }

    pub fn add_constraint(&mut self, constraint: SketchConstraint) {
        self.constraints.push(constraint);
    }

    pub fn constraints(&self) -> &[SketchConstraint] {
        &self.constraints
    }

    /// Draw every item
    pub fn draw(&mut self, scene: &mut dyn SceneHandle, tessellation: &TessellationConfig) {
        for item in &mut self.items {
            item.draw(scene, tessellation);
        }
    }

    /// Release the scene objects of every item
    pub fn release(&mut self, scene: &mut dyn SceneHandle) {
        for item in &mut self.items {
            item.remove(scene);
        }
    }
}

/// Pick a sketch name, numbering the default name after existing ones.
///
/// An empty request or the bare default `"Sketch"` becomes `"Sketch N"`
/// with `N` one above the highest existing number.
pub fn resolve_sketch_name<'a>(
    requested: &str,
    existing: impl IntoIterator<Item = &'a str>,
) -> String {
    const DEFAULT_NAME: &str = "Sketch";

    let requested = requested.trim();
    if !requested.is_empty() && requested != DEFAULT_NAME {
        return requested.to_string();
    }

    let highest = existing
        .into_iter()
        .filter_map(|name| name.trim().strip_prefix(DEFAULT_NAME))
        .filter_map(|rest| rest.trim_start().parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{DEFAULT_NAME} {}", highest + 1)
}
