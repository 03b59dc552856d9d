//! Render contract between sketch primitives and an external scene
//!
//! The library never renders. It describes shapes and hands them to a
//! [`SceneHandle`], keeping the returned ids in a [`RenderHandle`] that
//! releases them exactly once.

use std::collections::HashMap;

use glam::DVec3;
use uuid::Uuid;

/// Opaque id of an object inserted into a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderId(pub Uuid);

impl RenderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RenderId {
    fn default() -> Self {
        Self::new()
    }
}

/// Stroke style for polylines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    /// Construction lines shown while a primitive is still pending
    Dashed,
}

/// Shape description handed to the scene
#[derive(Debug, Clone, PartialEq)]
pub enum RenderShape {
    /// A single point marker
    Marker { position: DVec3 },
    /// Connected segments through `points`, closed back to the first point if `closed`
    Polyline {
        points: Vec<DVec3>,
        closed: bool,
        style: LineStyle,
    },
    /// Draggable control-point handles
    Handles { points: Vec<DVec3> },
}

impl RenderShape {
    pub fn solid(points: Vec<DVec3>, closed: bool) -> Self {
        RenderShape::Polyline {
            points,
            closed,
            style: LineStyle::Solid,
        }
    }

    pub fn dashed(points: Vec<DVec3>) -> Self {
        RenderShape::Polyline {
            points,
            closed: false,
            style: LineStyle::Dashed,
        }
    }
}

/// Scene the sketch draws into
pub trait SceneHandle {
    /// Add a shape and return its id
    fn insert(&mut self, shape: RenderShape) -> RenderId;

    /// Replace the shape behind an existing id
    fn update(&mut self, id: RenderId, shape: RenderShape);

    /// Remove an object; the id is invalid afterwards
    fn remove(&mut self, id: RenderId);

    fn set_visible(&mut self, id: RenderId, visible: bool);
}

/// Scene objects owned by one primitive: its body and, for splines, its handles.
///
/// `remove` takes the ids out of the handle, so a second call is a no-op.
/// Dropping a handle that still owns objects logs a warning.
#[derive(Debug, Default)]
pub struct RenderHandle {
    body: Option<RenderId>,
    handles: Option<RenderId>,
}

impl RenderHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if any scene object is still owned
    pub fn is_live(&self) -> bool {
        self.body.is_some() || self.handles.is_some()
    }

    pub fn body(&self) -> Option<RenderId> {
        self.body
    }

    pub fn handles(&self) -> Option<RenderId> {
        self.handles
    }

    /// Draw or redraw the body. `None` removes it.
    pub fn show(&mut self, scene: &mut dyn SceneHandle, shape: Option<RenderShape>) {
        match (shape, self.body) {
            (Some(shape), Some(id)) => scene.update(id, shape),
            (Some(shape), None) => self.body = Some(scene.insert(shape)),
            (None, Some(id)) => {
                scene.remove(id);
                self.body = None;
            }
            (None, None) => {}
        }
    }

    /// Draw or redraw the control-point handles.
    pub fn show_handles(&mut self, scene: &mut dyn SceneHandle, points: &[DVec3], visible: bool) {
        let shape = RenderShape::Handles {
            points: points.to_vec(),
        };
        let id = match self.handles {
            Some(id) => {
                scene.update(id, shape);
                id
            }
            None => {
                let id = scene.insert(shape);
                self.handles = Some(id);
                id
            }
        };
        scene.set_visible(id, visible);
    }

    pub fn set_handles_visible(&mut self, scene: &mut dyn SceneHandle, visible: bool) {
        if let Some(id) = self.handles {
            scene.set_visible(id, visible);
        }
    }

    /// Release the handles, keeping the body
    pub fn remove_handles(&mut self, scene: &mut dyn SceneHandle) {
        if let Some(id) = self.handles.take() {
            scene.remove(id);
        }
    }

    /// Release every owned object.
    pub fn remove(&mut self, scene: &mut dyn SceneHandle) {
        if let Some(id) = self.body.take() {
            scene.remove(id);
        }
        if let Some(id) = self.handles.take() {
            scene.remove(id);
        }
    }
}

impl Drop for RenderHandle {
    fn drop(&mut self) {
        if self.is_live() {
            tracing::warn!(
                "Render handle dropped while still owning scene objects: body={:?}, handles={:?}",
                self.body,
                self.handles
            );
        }
    }
}

/// An object stored in a [`MemoryScene`]
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub shape: RenderShape,
    pub visible: bool,
}

/// In-memory scene for headless use and tests.
///
/// Tracks how often objects were removed by an id that was no longer
/// present, which indicates a double release.
#[derive(Debug, Default)]
pub struct MemoryScene {
    objects: HashMap<RenderId, SceneObject>,
    inserted: usize,
    stale_removals: usize,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects currently in the scene
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: RenderId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn contains(&self, id: RenderId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values()
    }

    /// Total number of inserts since creation
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    /// Removals of ids that were not in the scene
    pub fn stale_removals(&self) -> usize {
        self.stale_removals
    }
}

impl SceneHandle for MemoryScene {
    fn insert(&mut self, shape: RenderShape) -> RenderId {
        let id = RenderId::new();
        self.objects.insert(
            id,
            SceneObject {
                shape,
                visible: true,
            },
        );
        self.inserted += 1;
        id
    }

    fn update(&mut self, id: RenderId, shape: RenderShape) {
        match self.objects.get_mut(&id) {
            Some(obj) => obj.shape = shape,
            None => tracing::warn!("Update of unknown scene object {:?}", id),
        }
    }

    fn remove(&mut self, id: RenderId) {
        if self.objects.remove(&id).is_none() {
            tracing::warn!("Removal of unknown scene object {:?}", id);
            self.stale_removals += 1;
        }
    }

    fn set_visible(&mut self, id: RenderId, visible: bool) {
        if let Some(obj) = self.objects.get_mut(&id) {
            obj.visible = visible;
        }
    }
}
