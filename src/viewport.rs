use crate::config::ViewportConfig;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Panning { start_offset: Point },
}

/// Pan/zoom state for one rendered scene. Pointer events arrive as plain
/// points from the host; the controller never touches the DOM itself, which
/// keeps the drag machine testable and framework-free.
///
/// The host must forward move/up events at the document level for the whole
/// drag, otherwise a pointer leaving the canvas mid-drag would strand the
/// machine in `Panning`.
#[derive(Debug, Clone)]
pub struct Viewport {
    config: ViewportConfig,
    scale: f32,
    pan: Point,
    drag: DragState,
}

impl Viewport {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            config,
            scale: 1.0,
            pan: Point::default(),
            drag: DragState::Idle,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn zoom_in(&mut self) {
        self.scale = (self.scale + self.config.zoom_step).min(self.config.max_scale);
    }

    pub fn zoom_out(&mut self) {
        self.scale = (self.scale - self.config.zoom_step).max(self.config.min_scale);
    }

    /// Restores the default transform exactly, regardless of prior input.
    pub fn reset_view(&mut self) {
        self.scale = 1.0;
        self.pan = Point::default();
    }

    pub fn begin_pan(&mut self, pointer: Point) {
        self.drag = DragState::Panning {
            start_offset: Point::new(pointer.x - self.pan.x, pointer.y - self.pan.y),
        };
    }

    /// Honored only while panning; position is taken as-is even when the
    /// pointer is outside the canvas bounds.
    pub fn pointer_move(&mut self, pointer: Point) {
        if let DragState::Panning { start_offset } = self.drag {
            self.pan = Point::new(pointer.x - start_offset.x, pointer.y - start_offset.y);
        }
    }

    pub fn end_pan(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.drag, DragState::Panning { .. })
    }

    /// Scale outer, translate inner, origin top-left. The scene group gets
    /// this verbatim.
    pub fn transform(&self) -> String {
        format!(
            "scale({:.2}) translate({:.2}, {:.2})",
            self.scale, self.pan.x, self.pan.y
        )
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            (world.x + self.pan.x) * self.scale,
            (world.y + self.pan.y) * self.scale,
        )
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            screen.x / self.scale - self.pan.x,
            screen.y / self.scale - self.pan.y,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_clamps_at_both_ends() {
        let mut viewport = Viewport::default();
        for _ in 0..25 {
            viewport.zoom_in();
        }
        assert!(viewport.scale() <= 2.0);
        assert_eq!(viewport.scale(), 2.0);
        for _ in 0..40 {
            viewport.zoom_out();
        }
        assert!(viewport.scale() >= 0.5);
        assert_eq!(viewport.scale(), 0.5);
    }

    #[test]
    fn reset_restores_defaults_exactly() {
        let mut viewport = Viewport::default();
        viewport.zoom_in();
        viewport.begin_pan(Point::new(10.0, 20.0));
        viewport.pointer_move(Point::new(150.0, -40.0));
        viewport.end_pan();
        viewport.zoom_out();
        viewport.reset_view();
        assert_eq!(viewport.scale(), 1.0);
        assert_eq!(viewport.pan(), Point::default());
    }

    #[test]
    fn drag_tracks_pointer_relative_to_grab_point() {
        let mut viewport = Viewport::default();
        viewport.begin_pan(Point::new(100.0, 100.0));
        viewport.pointer_move(Point::new(130.0, 90.0));
        assert_eq!(viewport.pan(), Point::new(30.0, -10.0));
        // Pointer far outside the canvas still drives the pan.
        viewport.pointer_move(Point::new(-500.0, 2000.0));
        assert_eq!(viewport.pan(), Point::new(-600.0, 1900.0));
        viewport.end_pan();
        assert!(!viewport.is_panning());
        // Moves after release are ignored.
        viewport.pointer_move(Point::new(0.0, 0.0));
        assert_eq!(viewport.pan(), Point::new(-600.0, 1900.0));
    }

    #[test]
    fn second_drag_resumes_from_current_offset() {
        let mut viewport = Viewport::default();
        viewport.begin_pan(Point::new(0.0, 0.0));
        viewport.pointer_move(Point::new(50.0, 0.0));
        viewport.end_pan();
        viewport.begin_pan(Point::new(10.0, 10.0));
        viewport.pointer_move(Point::new(10.0, 10.0));
        assert_eq!(viewport.pan(), Point::new(50.0, 0.0));
        viewport.pointer_move(Point::new(20.0, 10.0));
        assert_eq!(viewport.pan(), Point::new(60.0, 0.0));
    }

    #[test]
    fn screen_world_round_trip() {
        let mut viewport = Viewport::default();
        viewport.zoom_in();
        viewport.begin_pan(Point::new(0.0, 0.0));
        viewport.pointer_move(Point::new(-35.0, 12.0));
        viewport.end_pan();
        let world = Point::new(420.0, 260.0);
        let screen = viewport.world_to_screen(world);
        let back = viewport.screen_to_world(screen);
        assert!((back.x - world.x).abs() < 1e-3);
        assert!((back.y - world.y).abs() < 1e-3);
    }
}
