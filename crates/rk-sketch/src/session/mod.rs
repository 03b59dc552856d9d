//! Sketch session
//!
//! Owns everything that changes while a sketch is drawn: the selected plane,
//! the active tool with its pending primitive, the tool sub-modes, the
//! handle-drag state and the sketch itself. Pick events and signals are
//! processed in delivery order. Only clicks and finish signals append items;
//! pointer moves only touch the preview.

mod interaction;

pub use interaction::*;

use glam::DVec3;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SketchConfig;
use crate::render::{RenderHandle, SceneHandle};
use crate::sketch::{
    ArcMode, CircleMode, Primitive, RectMode, Sketch, SketchError, SketchItem, SketchPlane,
    SketchResult, resolve_sketch_name,
};
use crate::tools::{ActiveTool, ToolKind, ToolModes};

/// Interactive sketch editing state
#[derive(Debug)]
pub struct SketchSession {
    config: SketchConfig,
    active_plane: Option<SketchPlane>,
    tool: Option<ActiveTool>,
    modes: ToolModes,
    interaction: InteractionState,
    sketch: Option<Sketch>,
    /// Scene objects of the pending primitive and its confirmed spline points
    preview: RenderHandle,
}

impl Default for SketchSession {
    fn default() -> Self {
        Self::new(SketchConfig::new())
    }
}

impl SketchSession {
    pub fn new(config: SketchConfig) -> Self {
        Self {
            modes: ToolModes::from_config(&config),
            config,
            active_plane: None,
            tool: None,
            interaction: InteractionState::Idle,
            sketch: None,
            preview: RenderHandle::new(),
        }
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn active_plane(&self) -> Option<SketchPlane> {
        self.active_plane
    }

    pub fn active_tool(&self) -> Option<ToolKind> {
        self.tool.as_ref().map(ActiveTool::kind)
    }

    pub fn tool(&self) -> Option<&ActiveTool> {
        self.tool.as_ref()
    }

    pub fn modes(&self) -> ToolModes {
        self.modes
    }

    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    /// The sketch being drawn
    pub fn sketch(&self) -> Option<&Sketch> {
        self.sketch.as_ref()
    }

    pub fn is_sketching(&self) -> bool {
        self.sketch.is_some()
    }

    /// Choose the plane the next sketch is drawn on
    pub fn select_plane(&mut self, plane: SketchPlane) -> SketchResult<()> {
        if self.sketch.is_some() {
            return Err(SketchError::SketchInProgress);
        }
        debug!("Selected {} plane at {:?}", plane.name().as_str(), plane.origin);
        self.active_plane = Some(plane);
        Ok(())
    }

    /// Start a sketch on the selected plane.
    ///
    /// An empty or default name is numbered after `existing` names.
    pub fn start_sketch<'a>(
        &mut self,
        name: &str,
        existing: impl IntoIterator<Item = &'a str>,
    ) -> SketchResult<Uuid> {
        if self.sketch.is_some() {
            return Err(SketchError::SketchInProgress);
        }
        let plane = self.active_plane.ok_or(SketchError::NoActivePlane)?;
        let sketch = Sketch::new(resolve_sketch_name(name, existing), plane);
        info!(
            "Started sketch '{}' on {} plane",
            sketch.name,
            plane.name().as_str()
        );
        let id = sketch.id;
        self.sketch = Some(sketch);
        Ok(id)
    }

    /// Activate a drawing tool, discarding any pending primitive
    pub fn set_tool(&mut self, scene: &mut dyn SceneHandle, kind: ToolKind) -> SketchResult<()> {
        let plane = self
            .sketch
            .as_ref()
            .map(|s| s.plane)
            .ok_or(SketchError::NoActiveSketch)?;
        self.clear_pending(scene);
        self.tool = Some(ActiveTool::new(kind, self.modes, &plane, &self.config));
        debug!("Selected {} tool", kind.name());
        Ok(())
    }

    /// Deactivate the current tool, discarding any pending primitive
    pub fn clear_tool(&mut self, scene: &mut dyn SceneHandle) {
        self.clear_pending(scene);
        self.tool = None;
    }

    pub fn set_rect_mode(&mut self, scene: &mut dyn SceneHandle, mode: RectMode) {
        self.modes.rect = mode;
        self.rebuild_tool(scene);
    }

    pub fn set_circle_mode(&mut self, scene: &mut dyn SceneHandle, mode: CircleMode) {
        self.modes.circle = mode;
        self.rebuild_tool(scene);
    }

    pub fn set_arc_mode(&mut self, scene: &mut dyn SceneHandle, mode: ArcMode) {
        self.modes.arc = mode;
        self.rebuild_tool(scene);
    }

    /// Route a pointer event to the drag state machine or the active tool
    pub fn handle_pointer(&mut self, scene: &mut dyn SceneHandle, event: PickEvent) -> EventOutcome {
        let Some(plane) = self.sketch.as_ref().map(|s| s.plane) else {
            return EventOutcome::Ignored;
        };
        let point = plane.project(event.point);

        if let InteractionState::Dragging { item, index } = self.interaction {
            return match event.kind {
                PickKind::Move => self.drag_handle(scene, item, index, point),
                PickKind::Up => {
                    self.interaction.release();
                    debug!("Released handle {} of {}", index, item);
                    EventOutcome::DragEnded
                }
                _ => EventOutcome::Ignored,
            };
        }

        match event.kind {
            PickKind::Move => self.pointer_move(scene, point),
            PickKind::Down => {
                self.interaction = InteractionState::Idle;
                self.try_start_drag(point)
            }
            PickKind::Up => EventOutcome::Ignored,
            PickKind::Click => {
                if self.interaction.take_suppressed_click() {
                    debug!("Suppressed click after handle drag");
                    return EventOutcome::ClickSuppressed;
                }
                self.click(scene, point)
            }
            PickKind::DoubleClick => {
                self.interaction = InteractionState::Idle;
                self.double_click(scene)
            }
        }
    }

    /// Handle Enter, Escape or right-click.
    ///
    /// The spline tool commits its confirmed points if there are at least
    /// two; every other tool drops its pending primitive.
    pub fn handle_signal(&mut self, scene: &mut dyn SceneHandle, signal: Signal) -> EventOutcome {
        self.interaction = InteractionState::Idle;
        let Some(tool) = self.tool.as_mut() else {
            return EventOutcome::Ignored;
        };
        if !tool.is_drawing() {
            return EventOutcome::Ignored;
        }
        debug!("{:?} signal on {} tool", signal, tool.kind().name());

        let finished = match tool {
            ActiveTool::Spline(spline) => spline.finish(),
            other => {
                other.cancel();
                None
            }
        };
        self.refresh_preview(scene);
        self.commit_or_cancel(scene, finished)
    }

    /// Show or hide the control-point handles of every spline
    pub fn set_all_handles_visible(&mut self, scene: &mut dyn SceneHandle, visible: bool) {
        let Some(sketch) = self.sketch.as_mut() else {
            return;
        };
        for item in sketch.items_mut() {
            if let Primitive::Spline(spline) = &mut item.primitive {
                spline.handles_visible = visible;
                item.handle.set_handles_visible(scene, visible);
            }
        }
    }

    /// Commit the pending spline if it has two points, hide every handle and
    /// leave the spline tool.
    pub fn finish_spline_and_exit(
        &mut self,
        scene: &mut dyn SceneHandle,
    ) -> SketchResult<Option<Uuid>> {
        if self.sketch.is_none() {
            return Err(SketchError::NoActiveSketch);
        }
        let finished = match self.tool.as_mut() {
            Some(ActiveTool::Spline(tool)) => tool.finish(),
            _ => None,
        };
        self.clear_tool(scene);

        let id = finished.and_then(|primitive| self.commit(scene, primitive));
        self.set_all_handles_visible(scene, false);
        Ok(id)
    }

    /// Delete an item and release its scene objects
    pub fn remove_item(&mut self, scene: &mut dyn SceneHandle, id: Uuid) -> SketchResult<()> {
        let sketch = self.sketch.as_mut().ok_or(SketchError::NoActiveSketch)?;
        let mut item = sketch.remove_item(id)?;
        item.remove(scene);
        if matches!(self.interaction, InteractionState::Dragging { item, .. } if item == id) {
            self.interaction = InteractionState::Idle;
        }
        debug!("Removed {} {}", item.name, id);
        Ok(())
    }

    /// End the sketch and hand it over with its items still drawn
    pub fn finish_sketch(&mut self, scene: &mut dyn SceneHandle) -> Option<Sketch> {
        self.clear_pending(scene);
        let sketch = self.sketch.take();
        self.reset();
        if let Some(sketch) = &sketch {
            info!(
                "Finished sketch '{}' with {} items",
                sketch.name,
                sketch.items().len()
            );
        }
        sketch
    }

    /// Abandon the sketch and release every scene object it owns
    pub fn cancel_sketch(&mut self, scene: &mut dyn SceneHandle) {
        self.clear_pending(scene);
        if let Some(mut sketch) = self.sketch.take() {
            sketch.release(scene);
            info!("Cancelled sketch '{}'", sketch.name);
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.tool = None;
        self.modes = ToolModes::from_config(&self.config);
        self.interaction = InteractionState::Idle;
        self.active_plane = None;
    }

    fn clear_pending(&mut self, scene: &mut dyn SceneHandle) {
        if let Some(tool) = self.tool.as_mut() {
            tool.cancel();
        }
        self.preview.remove(scene);
        self.interaction = InteractionState::Idle;
    }

    /// Recreate the active tool with the current modes
    fn rebuild_tool(&mut self, scene: &mut dyn SceneHandle) {
        self.clear_pending(scene);
        if let (Some(kind), Some(sketch)) = (self.active_tool(), self.sketch.as_ref()) {
            self.tool = Some(ActiveTool::new(kind, self.modes, &sketch.plane, &self.config));
        }
    }

    fn refresh_preview(&mut self, scene: &mut dyn SceneHandle) {
        let shape = self
            .tool
            .as_ref()
            .and_then(ActiveTool::preview)
            .and_then(|primitive| primitive.render_shape(&self.config.tessellation));
        self.preview.show(scene, shape);

        // confirmed spline points get handles while the curve is pending
        match self.tool.as_ref() {
            Some(ActiveTool::Spline(spline)) if !spline.points().is_empty() => {
                self.preview.show_handles(scene, spline.points(), true)
            }
            _ => self.preview.remove_handles(scene),
        }
    }

    fn pointer_move(&mut self, scene: &mut dyn SceneHandle, point: DVec3) -> EventOutcome {
        let Some(tool) = self.tool.as_mut() else {
            return EventOutcome::Ignored;
        };
        tool.on_pointer_move(point);
        self.refresh_preview(scene);
        EventOutcome::PreviewUpdated
    }

    fn click(&mut self, scene: &mut dyn SceneHandle, point: DVec3) -> EventOutcome {
        let Some(tool) = self.tool.as_mut() else {
            return EventOutcome::Ignored;
        };
        if !tool.on_click(point) {
            self.refresh_preview(scene);
            return EventOutcome::PointAdded;
        }

        let kind = tool.kind();
        let finalized = tool.finalize();
        self.refresh_preview(scene);
        match finalized {
            Some(primitive) => self
                .commit(scene, primitive)
                .map_or(EventOutcome::Ignored, EventOutcome::ItemAdded),
            None => {
                debug!("Absorbed degenerate {}", kind.name());
                EventOutcome::Absorbed
            }
        }
    }

    fn double_click(&mut self, scene: &mut dyn SceneHandle) -> EventOutcome {
        let Some(ActiveTool::Spline(tool)) = self.tool.as_mut() else {
            return EventOutcome::Ignored;
        };
        let finished = tool.finish();
        self.refresh_preview(scene);
        self.commit_or_cancel(scene, finished)
    }

    fn commit_or_cancel(
        &mut self,
        scene: &mut dyn SceneHandle,
        finished: Option<Primitive>,
    ) -> EventOutcome {
        match finished.and_then(|primitive| self.commit(scene, primitive)) {
            Some(id) => EventOutcome::ItemAdded(id),
            None => EventOutcome::Cancelled,
        }
    }

    fn try_start_drag(&mut self, point: DVec3) -> EventOutcome {
        if !matches!(self.tool, Some(ActiveTool::Spline(_))) {
            return EventOutcome::Ignored;
        }
        let Some(sketch) = self.sketch.as_ref() else {
            return EventOutcome::Ignored;
        };

        let radius = self.config.tools.handle_pick_radius;
        let hit = sketch
            .items()
            .iter()
            .filter_map(|item| match &item.primitive {
                Primitive::Spline(spline) if spline.handles_visible => spline
                    .pick_handle(point, radius)
                    .map(|index| (item.id, index, spline.control_points[index].distance(point))),
                _ => None,
            })
            .min_by(|a, b| a.2.total_cmp(&b.2));

        match hit {
            Some((item, index, _)) => {
                self.interaction = InteractionState::Dragging { item, index };
                debug!("Grabbed handle {} of {}", index, item);
                EventOutcome::DragStarted { item, index }
            }
            None => EventOutcome::Ignored,
        }
    }

    fn drag_handle(
        &mut self,
        scene: &mut dyn SceneHandle,
        id: Uuid,
        index: usize,
        point: DVec3,
    ) -> EventOutcome {
        let tessellation = &self.config.tessellation;
        let Some(item) = self.sketch.as_mut().and_then(|s| s.get_item_mut(id)) else {
            warn!("Dragged item {} no longer exists", id);
            self.interaction = InteractionState::Idle;
            return EventOutcome::Ignored;
        };
        let Primitive::Spline(spline) = &mut item.primitive else {
            return EventOutcome::Ignored;
        };
        if !spline.set_point(index, point) {
            return EventOutcome::Ignored;
        }
        item.draw(scene, tessellation);
        EventOutcome::Dragged
    }

    fn commit(&mut self, scene: &mut dyn SceneHandle, primitive: Primitive) -> Option<Uuid> {
        let sketch = self.sketch.as_mut()?;
        let mut item = SketchItem::new(primitive);
        item.draw(scene, &self.config.tessellation);
        info!("Added {} to sketch '{}'", item.name, sketch.name);
        Some(sketch.add_item(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{MemoryScene, RenderShape};
    use crate::sketch::LinePrimitive;

    fn sketching(plane: SketchPlane) -> SketchSession {
        let mut session = SketchSession::default();
        session.select_plane(plane).expect("no sketch yet");
        session.start_sketch("", []).expect("plane selected");
        session
    }

    fn click(session: &mut SketchSession, scene: &mut MemoryScene, x: f64, y: f64) -> EventOutcome {
        session.handle_pointer(scene, PickEvent::click(DVec3::new(x, y, 0.0)))
    }

    #[test]
    fn test_start_requires_plane() {
        let mut session = SketchSession::default();
        assert!(matches!(
            session.start_sketch("Base", []),
            Err(SketchError::NoActivePlane)
        ));

        session.select_plane(SketchPlane::xz()).expect("no sketch yet");
        session.start_sketch("", ["Sketch 2"]).expect("plane selected");
        assert_eq!(session.sketch().map(|s| s.name.as_str()), Some("Sketch 3"));
        assert!(matches!(
            session.start_sketch("Other", []),
            Err(SketchError::SketchInProgress)
        ));
        assert!(matches!(
            session.select_plane(SketchPlane::xy()),
            Err(SketchError::SketchInProgress)
        ));
    }

    #[test]
    fn test_set_tool_requires_sketch() {
        let mut scene = MemoryScene::new();
        let mut session = SketchSession::default();
        assert!(matches!(
            session.set_tool(&mut scene, ToolKind::Line),
            Err(SketchError::NoActiveSketch)
        ));
        assert_eq!(
            session.handle_pointer(&mut scene, PickEvent::click(DVec3::ZERO)),
            EventOutcome::Ignored
        );
    }

    #[test]
    fn test_same_point_circle_appends_nothing() {
        let mut scene = MemoryScene::new();
        let mut session = sketching(SketchPlane::xy());
        session.set_tool(&mut scene, ToolKind::Circle).expect("sketching");

        assert_eq!(click(&mut session, &mut scene, 2.0, 3.0), EventOutcome::PointAdded);
        assert_eq!(scene.len(), 1);
        assert_eq!(click(&mut session, &mut scene, 2.0, 3.0), EventOutcome::Absorbed);

        assert!(session.sketch().is_some_and(|s| s.items().is_empty()));
        assert!(scene.is_empty());
        assert_eq!(session.active_tool(), Some(ToolKind::Circle));
    }

    #[test]
    fn test_continuous_line_segments() {
        let mut scene = MemoryScene::new();
        let mut session = sketching(SketchPlane::xy());
        session.set_tool(&mut scene, ToolKind::Line).expect("sketching");

        assert_eq!(click(&mut session, &mut scene, 0.0, 0.0), EventOutcome::PointAdded);
        assert!(matches!(click(&mut session, &mut scene, 3.0, 0.0), EventOutcome::ItemAdded(_)));
        assert!(matches!(click(&mut session, &mut scene, 3.0, 4.0), EventOutcome::ItemAdded(_)));

        let segments: Vec<_> = session
            .sketch()
            .map(|s| s.items().iter().map(|i| i.primitive.clone()).collect())
            .unwrap_or_default();
        assert_eq!(
            segments,
            vec![
                Primitive::Line(LinePrimitive {
                    start: DVec3::ZERO,
                    end: Some(DVec3::new(3.0, 0.0, 0.0)),
                }),
                Primitive::Line(LinePrimitive {
                    start: DVec3::new(3.0, 0.0, 0.0),
                    end: Some(DVec3::new(3.0, 4.0, 0.0)),
                }),
            ]
        );
        // two segments plus the re-armed start marker
        assert_eq!(scene.len(), 3);

        assert_eq!(
            session.handle_signal(&mut scene, Signal::Finish),
            EventOutcome::Cancelled
        );
        assert_eq!(scene.len(), 2);

        session.cancel_sketch(&mut scene);
        assert!(scene.is_empty());
        assert_eq!(scene.stale_removals(), 0);
    }

    #[test]
    fn test_moves_never_append() {
        let mut scene = MemoryScene::new();
        let mut session = sketching(SketchPlane::xy());
        session.set_tool(&mut scene, ToolKind::Rect).expect("sketching");

        click(&mut session, &mut scene, 0.0, 0.0);
        for i in 1..10 {
            let outcome =
                session.handle_pointer(&mut scene, PickEvent::moved(DVec3::new(i as f64, 1.0, 0.0)));
            assert_eq!(outcome, EventOutcome::PreviewUpdated);
        }
        assert!(session.sketch().is_some_and(|s| s.items().is_empty()));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.inserted(), 1);
    }

    #[test]
    fn test_points_are_projected_onto_plane() {
        let mut scene = MemoryScene::new();
        let mut session = sketching(SketchPlane::new(DVec3::new(0.0, 0.0, 2.0), DVec3::Z));
        session.set_tool(&mut scene, ToolKind::Point).expect("sketching");

        session.handle_pointer(&mut scene, PickEvent::click(DVec3::new(1.0, 1.0, 5.0)));
        let item = &session.sketch().expect("sketching").items()[0];
        assert_eq!(item.primitive.control_points(), vec![DVec3::new(1.0, 1.0, 2.0)]);

        session.cancel_sketch(&mut scene);
    }

    #[test]
    fn test_tool_switch_releases_preview() {
        let mut scene = MemoryScene::new();
        let mut session = sketching(SketchPlane::xy());
        session.set_tool(&mut scene, ToolKind::Line).expect("sketching");

        click(&mut session, &mut scene, 0.0, 0.0);
        session.handle_pointer(&mut scene, PickEvent::moved(DVec3::new(1.0, 1.0, 0.0)));
        assert_eq!(scene.len(), 1);

        session.set_tool(&mut scene, ToolKind::Circle).expect("sketching");
        assert!(scene.is_empty());
        assert_eq!(scene.stale_removals(), 0);
        assert!(session.tool().is_some_and(|t| !t.is_drawing()));
    }

    #[test]
    fn test_mode_change_clears_pending_primitive() {
        let mut scene = MemoryScene::new();
        let mut session = sketching(SketchPlane::xy());
        session.set_tool(&mut scene, ToolKind::Circle).expect("sketching");
        click(&mut session, &mut scene, 1.0, 1.0);

        session.set_circle_mode(&mut scene, CircleMode::ThreePoint);
        assert!(scene.is_empty());
        assert_eq!(session.modes().circle, CircleMode::ThreePoint);
        match session.tool() {
            Some(ActiveTool::Circle(tool)) => {
                assert_eq!(tool.mode(), CircleMode::ThreePoint);
                assert!(!tool.is_drawing());
            }
            other => panic!("expected the circle tool, got {other:?}"),
        }
    }

    #[test]
    fn test_spline_escape_keeps_confirmed_points() {
        let mut scene = MemoryScene::new();
        let mut session = sketching(SketchPlane::xy());
        session.set_tool(&mut scene, ToolKind::Spline).expect("sketching");

        click(&mut session, &mut scene, 0.0, 0.0);
        click(&mut session, &mut scene, 1.0, 1.0);
        click(&mut session, &mut scene, 2.0, 0.0);
        session.handle_pointer(&mut scene, PickEvent::moved(DVec3::new(3.0, 2.0, 0.0)));
        assert!(matches!(
            session.handle_signal(&mut scene, Signal::Cancel),
            EventOutcome::ItemAdded(_)
        ));

        let items = session.sketch().expect("sketching").items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].primitive.control_points().len(), 3);
        // curve body and handles
        assert_eq!(scene.len(), 2);

        click(&mut session, &mut scene, 5.0, 5.0);
        assert_eq!(
            session.handle_signal(&mut scene, Signal::ContextMenu),
            EventOutcome::Cancelled
        );
        assert_eq!(session.sketch().expect("sketching").items().len(), 1);

        session.cancel_sketch(&mut scene);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_pending_spline_shows_point_handles() {
        let mut scene = MemoryScene::new();
        let mut session = sketching(SketchPlane::xy());
        session.set_tool(&mut scene, ToolKind::Spline).expect("sketching");

        click(&mut session, &mut scene, 0.0, 0.0);
        click(&mut session, &mut scene, 1.0, 1.0);
        session.handle_pointer(&mut scene, PickEvent::moved(DVec3::new(2.0, 0.0, 0.0)));

        let handles: Vec<_> = scene
            .objects()
            .filter_map(|o| match &o.shape {
                RenderShape::Handles { points } => Some(points.clone()),
                _ => None,
            })
            .collect();
        // confirmed points only, not the cursor
        assert_eq!(handles, vec![vec![DVec3::ZERO, DVec3::new(1.0, 1.0, 0.0)]]);
        assert_eq!(scene.len(), 2);

        let EventOutcome::ItemAdded(id) = session.handle_signal(&mut scene, Signal::Cancel) else {
            panic!("expected the spline to be committed");
        };
        // the committed item owns the only remaining handles
        let item = session.sketch().and_then(|s| s.get_item(id)).expect("item kept");
        assert_eq!(scene.len(), 2);
        assert!(item.handle.handles().is_some_and(|h| scene.contains(h)));

        session.cancel_sketch(&mut scene);
        assert!(scene.is_empty());
        assert_eq!(scene.stale_removals(), 0);
    }

    #[test]
    fn test_spline_double_click_finishes() {
        let mut scene = MemoryScene::new();
        let mut session = sketching(SketchPlane::xy());
        session.set_tool(&mut scene, ToolKind::Spline).expect("sketching");

        click(&mut session, &mut scene, 0.0, 0.0);
        click(&mut session, &mut scene, 2.0, 1.0);
        // a double-click arrives after its own two clicks
        click(&mut session, &mut scene, 2.0, 1.0);
        let outcome =
            session.handle_pointer(&mut scene, PickEvent::double_click(DVec3::new(2.0, 1.0, 0.0)));
        assert!(matches!(outcome, EventOutcome::ItemAdded(_)));

        let items = session.sketch().expect("sketching").items();
        assert_eq!(items[0].primitive.control_points().len(), 2);
        session.cancel_sketch(&mut scene);
    }

    #[test]
    fn test_handle_drag_suppresses_next_click() {
        let mut scene = MemoryScene::new();
        let mut session = sketching(SketchPlane::xy());
        session.set_tool(&mut scene, ToolKind::Spline).expect("sketching");

        click(&mut session, &mut scene, 0.0, 0.0);
        click(&mut session, &mut scene, 1.0, 1.0);
        click(&mut session, &mut scene, 2.0, 0.0);
        let EventOutcome::ItemAdded(id) = session.handle_signal(&mut scene, Signal::Finish) else {
            panic!("expected the spline to be committed");
        };

        let outcome = session.handle_pointer(&mut scene, PickEvent::down(DVec3::new(1.0, 1.1, 0.0)));
        assert_eq!(outcome, EventOutcome::DragStarted { item: id, index: 1 });

        let outcome = session.handle_pointer(&mut scene, PickEvent::moved(DVec3::new(1.0, 3.0, 0.0)));
        assert_eq!(outcome, EventOutcome::Dragged);
        assert_eq!(
            session.handle_pointer(&mut scene, PickEvent::up(DVec3::new(1.0, 3.0, 0.0))),
            EventOutcome::DragEnded
        );
        assert_eq!(
            click(&mut session, &mut scene, 1.0, 3.0),
            EventOutcome::ClickSuppressed
        );
        assert!(session.tool().is_some_and(|t| !t.is_drawing()));
        assert_eq!(session.interaction(), InteractionState::Idle);

        let item = session.sketch().and_then(|s| s.get_item(id)).expect("item kept");
        assert_eq!(item.primitive.control_points()[1], DVec3::new(1.0, 3.0, 0.0));
        assert_eq!(scene.len(), 2);

        assert_eq!(click(&mut session, &mut scene, 5.0, 5.0), EventOutcome::PointAdded);
        session.cancel_sketch(&mut scene);
        assert_eq!(scene.stale_removals(), 0);
    }

    #[test]
    fn test_finish_spline_and_exit_hides_handles() {
        let mut scene = MemoryScene::new();
        let mut session = sketching(SketchPlane::xy());
        session.set_tool(&mut scene, ToolKind::Spline).expect("sketching");
        click(&mut session, &mut scene, 0.0, 0.0);
        click(&mut session, &mut scene, 1.0, 2.0);

        let id = session
            .finish_spline_and_exit(&mut scene)
            .expect("sketching")
            .expect("two points commit");
        assert_eq!(session.active_tool(), None);

        let item = session.sketch().and_then(|s| s.get_item(id)).expect("item kept");
        let handles = item.handle.handles().expect("handles drawn");
        assert_eq!(scene.get(handles).map(|o| o.visible), Some(false));

        session.set_all_handles_visible(&mut scene, true);
        assert_eq!(scene.get(handles).map(|o| o.visible), Some(true));
        session.cancel_sketch(&mut scene);
    }

    #[test]
    fn test_remove_item_releases_objects() {
        let mut scene = MemoryScene::new();
        let mut session = sketching(SketchPlane::xy());
        session.set_tool(&mut scene, ToolKind::Point).expect("sketching");
        let EventOutcome::ItemAdded(id) = click(&mut session, &mut scene, 1.0, 1.0) else {
            panic!("expected a point");
        };
        assert_eq!(scene.len(), 1);

        session.remove_item(&mut scene, id).expect("item exists");
        assert!(scene.is_empty());
        assert!(matches!(
            session.remove_item(&mut scene, id),
            Err(SketchError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_finish_sketch_resets_session() {
        let mut scene = MemoryScene::new();
        let mut session = sketching(SketchPlane::yz());
        session.set_tool(&mut scene, ToolKind::Point).expect("sketching");
        session.set_arc_mode(&mut scene, ArcMode::CenterStartEnd);
        session.handle_pointer(&mut scene, PickEvent::click(DVec3::new(0.0, 1.0, 1.0)));

        let mut sketch = session.finish_sketch(&mut scene).expect("sketch in progress");
        assert_eq!(sketch.items().len(), 1);
        assert_eq!(scene.len(), 1);

        assert!(!session.is_sketching());
        assert_eq!(session.active_tool(), None);
        assert_eq!(session.active_plane(), None);
        assert_eq!(session.modes().arc, ArcMode::ThreePoints);
        assert!(session.finish_sketch(&mut scene).is_none());

        sketch.release(&mut scene);
        assert!(scene.is_empty());
    }
}
