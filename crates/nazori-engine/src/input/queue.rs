/// A pointer sample from the drawing surface, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Mouse button or finger pressed: opens a stroke.
    PointerDown { x: f32, y: f32 },
    /// Drag sample: extends the open stroke.
    PointerMove { x: f32, y: f32 },
    /// Release: closes the open stroke.
    PointerUp { x: f32, y: f32 },
}

/// Pending pointer events in arrival order.
///
/// The web bridge pushes as the browser fires events; [`crate::Session::drain_input`]
/// replays them into the stroke set.
#[derive(Debug, Default)]
pub struct InputQueue {
    pending: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(64),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    /// Take every pending event, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.pending.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
