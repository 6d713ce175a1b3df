use nazori_engine::{
    Category, DeviceClass, Feedback, InputEvent, InputQueue, PracticeError, SamplePoint, Score,
    Session, Tone,
};

/// Wires a [`Session`] to the browser.
///
/// Pointer events are queued and applied in order; the flattened stroke
/// buffer is rebuilt after every batch so JS can read it without copying.
pub struct PracticeRunner {
    session: Session,
    input: InputQueue,
    /// Every recorded point, 7 floats each (x, y, r, g, b, a, width).
    points: Vec<SamplePoint>,
    /// Index into `points` where each stroke starts, the open stroke last.
    stroke_starts: Vec<u32>,
}

impl PracticeRunner {
    pub fn new(width: u32, height: u32, window_width: u32) -> Result<Self, PracticeError> {
        let device = DeviceClass::from_window_width(window_width);
        Ok(Self {
            session: Session::new(width, height, device)?,
            input: InputQueue::new(),
            points: Vec::with_capacity(1024),
            stroke_starts: Vec::with_capacity(16),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Queue a pointer event and apply everything pending.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
        self.pump();
    }

    fn pump(&mut self) {
        self.session.drain_input(&mut self.input);
        self.rebuild_points();
    }

    fn rebuild_points(&mut self) {
        self.points.clear();
        self.stroke_starts.clear();
        let strokes = self.session.strokes();
        for stroke in strokes.strokes() {
            self.stroke_starts.push(self.points.len() as u32);
            self.points.extend_from_slice(stroke.points());
        }
        if !strokes.active_points().is_empty() {
            self.stroke_starts.push(self.points.len() as u32);
            self.points.extend_from_slice(strokes.active_points());
        }
    }

    // ---- Session control ----

    pub fn select_glyph(&mut self, category: Category, ch: char) -> Result<(), PracticeError> {
        self.session.select_glyph(category, ch)?;
        self.rebuild_points();
        Ok(())
    }

    pub fn select_category(&mut self, category: Category) -> Option<char> {
        let glyph = self.session.select_category(category)?;
        self.rebuild_points();
        Some(glyph.ch)
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.rebuild_points();
    }

    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        window_width: u32,
    ) -> Result<(), PracticeError> {
        self.session.resize(width, height)?;
        self.session.set_device_class(DeviceClass::from_window_width(window_width));
        Ok(())
    }

    pub fn set_pen(&mut self, color_hex: &str, width: f32) -> Result<(), PracticeError> {
        self.session.set_pen_color(color_hex)?;
        self.session.set_pen_width(width);
        Ok(())
    }

    pub fn check(&mut self) -> Result<Score, PracticeError> {
        self.pump();
        self.session.check()
    }

    // ---- Score accessors ----

    pub fn score(&self) -> Option<&Score> {
        self.session.last_score()
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.session.feedback()
    }

    fn tones(&self) -> &'static [Tone] {
        self.session
            .last_score()
            .map(|s| s.tier.tones())
            .unwrap_or(&[])
    }

    pub fn tones_ptr(&self) -> *const f32 {
        self.tones().as_ptr() as *const f32
    }

    pub fn tone_count(&self) -> u32 {
        self.tones().len() as u32
    }

    // ---- Buffer accessors ----

    pub fn points_ptr(&self) -> *const f32 {
        self.points.as_ptr() as *const f32
    }

    pub fn point_count(&self) -> u32 {
        self.points.len() as u32
    }

    pub fn stroke_starts_ptr(&self) -> *const u32 {
        self.stroke_starts.as_ptr()
    }

    pub fn stroke_count(&self) -> u32 {
        self.stroke_starts.len() as u32
    }

    /// Template alpha bytes, rendering the template if needed.
    pub fn mask_ptr(&mut self) -> Result<*const u8, PracticeError> {
        Ok(self.session.template()?.mask.as_bytes().as_ptr())
    }

    pub fn mask_len(&mut self) -> Result<u32, PracticeError> {
        Ok(self.session.template()?.mask.as_bytes().len() as u32)
    }

    /// Key points, 2 floats each, rendering the template if needed.
    pub fn key_points_ptr(&mut self) -> Result<*const f32, PracticeError> {
        Ok(self.session.template()?.key_points.as_ptr() as *const f32)
    }

    pub fn key_point_count(&mut self) -> Result<u32, PracticeError> {
        Ok(self.session.template()?.key_points.len() as u32)
    }
}
