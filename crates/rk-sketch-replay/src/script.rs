//! Input scripts and their replay through a sketch session

use glam::DVec3;
use rk_sketch::{
    ArcMode, CircleMode, EventOutcome, MemoryScene, PickEvent, PickKind, PlaneName, RectMode,
    Signal, Sketch, SketchConfig, SketchError, SketchPlane, SketchSession, ToolKind,
};
use serde::Deserialize;
use thiserror::Error;

use crate::config::ConfigError;

/// Replay errors
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid script: {0}")]
    Script(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sketch(#[from] SketchError),
}

impl From<serde_json::Error> for ReplayError {
    fn from(e: serde_json::Error) -> Self {
        ReplayError::Script(e.to_string())
    }
}

/// Plane a script draws on: a reference plane name or an explicit plane
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PlaneSpec {
    Named(String),
    Custom { origin: DVec3, normal: DVec3 },
}

impl PlaneSpec {
    pub fn resolve(&self) -> Result<SketchPlane, ReplayError> {
        match self {
            PlaneSpec::Named(name) => PlaneName::parse(name)
                .map(|name| name.plane())
                .ok_or_else(|| ReplayError::Script(format!("unknown plane '{}'", name))),
            PlaneSpec::Custom { origin, normal } => Ok(SketchPlane::new(*origin, *normal)),
        }
    }
}

/// Sub-mode change, using the document spellings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModeChange {
    Arc(String),
    Circle(String),
    Rect(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Key {
    Enter,
    Escape,
}

/// One scripted input
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    Tool(ToolKind),
    Mode(ModeChange),
    Move(DVec3),
    Down(DVec3),
    Up(DVec3),
    Click(DVec3),
    DoubleClick(DVec3),
    Key(Key),
    ContextMenu,
    /// Finish the pending spline, hide handles and drop the tool
    ExitSpline,
    Handles(bool),
}

/// A recorded sketching session
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub plane: PlaneSpec,
    #[serde(default)]
    pub name: String,
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(content: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Result of a replay
#[derive(Debug)]
pub struct Replay {
    pub sketch: Sketch,
    pub scene: MemoryScene,
    pub outcomes: Vec<EventOutcome>,
}

impl Replay {
    /// Count of steps that appended an item
    pub fn items_added(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EventOutcome::ItemAdded(_)))
            .count()
    }

    /// Count of complete primitives dropped as degenerate
    pub fn absorbed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| **o == EventOutcome::Absorbed)
            .count()
    }
}

fn parse_mode<T>(kind: &str, name: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T, ReplayError> {
    parse(name).ok_or_else(|| ReplayError::Script(format!("unknown {} mode '{}'", kind, name)))
}

/// Run every step of `script` through a fresh session
pub fn replay(script: &Script, config: &SketchConfig) -> Result<Replay, ReplayError> {
    let mut scene = MemoryScene::new();
    let mut session = SketchSession::new(config.clone());
    session.select_plane(script.plane.resolve()?)?;
    session.start_sketch(&script.name, [])?;

    let mut outcomes = Vec::with_capacity(script.steps.len());
    for (i, step) in script.steps.iter().enumerate() {
        let outcome = match step {
            Step::Tool(kind) => {
                session.set_tool(&mut scene, *kind)?;
                EventOutcome::Ignored
            }
            Step::Mode(change) => {
                match change {
                    ModeChange::Arc(name) => {
                        session.set_arc_mode(&mut scene, parse_mode("arc", name, ArcMode::parse)?)
                    }
                    ModeChange::Circle(name) => session.set_circle_mode(
                        &mut scene,
                        parse_mode("circle", name, CircleMode::parse)?,
                    ),
                    ModeChange::Rect(name) => {
                        session.set_rect_mode(&mut scene, parse_mode("rect", name, RectMode::parse)?)
                    }
                }
                EventOutcome::Ignored
            }
            Step::Move(p) => session.handle_pointer(&mut scene, PickEvent::new(PickKind::Move, *p)),
            Step::Down(p) => session.handle_pointer(&mut scene, PickEvent::new(PickKind::Down, *p)),
            Step::Up(p) => session.handle_pointer(&mut scene, PickEvent::new(PickKind::Up, *p)),
            Step::Click(p) => session.handle_pointer(&mut scene, PickEvent::new(PickKind::Click, *p)),
            Step::DoubleClick(p) => {
                session.handle_pointer(&mut scene, PickEvent::new(PickKind::DoubleClick, *p))
            }
            Step::Key(Key::Enter) => session.handle_signal(&mut scene, Signal::Finish),
            Step::Key(Key::Escape) => session.handle_signal(&mut scene, Signal::Cancel),
            Step::ContextMenu => session.handle_signal(&mut scene, Signal::ContextMenu),
            Step::ExitSpline => match session.finish_spline_and_exit(&mut scene)? {
                Some(id) => EventOutcome::ItemAdded(id),
                None => EventOutcome::Cancelled,
            },
            Step::Handles(visible) => {
                session.set_all_handles_visible(&mut scene, *visible);
                EventOutcome::Ignored
            }
        };
        tracing::debug!("Step {}: {:?} -> {:?}", i, step, outcome);
        outcomes.push(outcome);
    }

    let sketch = session
        .finish_sketch(&mut scene)
        .ok_or(SketchError::NoActiveSketch)?;
    Ok(Replay {
        sketch,
        scene,
        outcomes,
    })
}
