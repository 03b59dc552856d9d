use glam::DVec3;

use crate::sketch::{PointPrimitive, Primitive};

/// Places a single point per click
#[derive(Debug, Clone, Default)]
pub struct PointTool {
    placed: Option<DVec3>,
    preview: Option<Primitive>,
}

impl PointTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_pointer_move(&mut self, point: DVec3) {
        if self.placed.is_none() {
            self.preview = Some(Primitive::Point(PointPrimitive { position: point }));
        }
    }

    pub fn on_click(&mut self, point: DVec3) -> bool {
        self.placed = Some(point);
        true
    }

    pub fn is_complete(&self) -> bool {
        self.placed.is_some()
    }

    /// # Panics
    ///
    /// Panics if no point has been placed.
    pub fn finalize(&mut self) -> Option<Primitive> {
        assert!(self.is_complete(), "finalize called before a point was placed");
        self.preview = None;
        self.placed
            .take()
            .map(|position| Primitive::Point(PointPrimitive { position }))
    }

    pub fn cancel(&mut self) {
        self.placed = None;
        self.preview = None;
    }

    pub fn preview(&self) -> Option<&Primitive> {
        self.preview.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_click_completes() {
        let mut tool = PointTool::new();
        assert!(!tool.is_complete());
        assert!(tool.on_click(DVec3::new(1.0, 2.0, 0.0)));
        assert_eq!(
            tool.finalize(),
            Some(Primitive::Point(PointPrimitive {
                position: DVec3::new(1.0, 2.0, 0.0)
            }))
        );
        assert!(!tool.is_complete());
    }

    #[test]
    fn test_preview_follows_cursor() {
        let mut tool = PointTool::new();
        tool.on_pointer_move(DVec3::X);
        tool.on_pointer_move(DVec3::Y);
        assert_eq!(
            tool.preview(),
            Some(&Primitive::Point(PointPrimitive { position: DVec3::Y }))
        );
    }

    #[test]
    #[should_panic]
    fn test_finalize_without_click_panics() {
        PointTool::new().finalize();
    }
}
