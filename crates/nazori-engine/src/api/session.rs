//! Practice session: one glyph, one canvas, one learner's strokes.

use glam::Vec2;

use crate::device::DeviceClass;
use crate::error::PracticeError;
use crate::glyphs::{Category, Glyph, GlyphCatalog};
use crate::input::{InkColor, InputEvent, InputQueue, PenStyle, SamplePoint, StrokeSet};
use crate::raster::{extract_key_points, CanvasSize, KeyPoint, OpacityMask, TemplateRasterizer};
use crate::scoring::{self, Feedback, Score, ScoreContext, ScoringConfig};

/// Glyph selected when a session starts.
pub const DEFAULT_GLYPH: Glyph = Glyph::new(Category::Hiragana, 'あ');

/// Rendered reference for one (glyph, size, device) combination.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub glyph: Glyph,
    pub size: CanvasSize,
    pub device: DeviceClass,
    pub mask: OpacityMask,
    pub key_points: Vec<KeyPoint>,
}

impl Template {
    fn matches(&self, glyph: Glyph, size: CanvasSize, device: DeviceClass) -> bool {
        self.glyph == glyph && self.size == size && self.device == device
    }
}

/// Drawing session state. Owns the stroke set and the cached template;
/// the template is rebuilt lazily whenever glyph, size or device class change.
pub struct Session {
    catalog: &'static GlyphCatalog,
    config: ScoringConfig,
    glyph: Glyph,
    size: CanvasSize,
    device: DeviceClass,
    pen: PenStyle,
    strokes: StrokeSet,
    template: Option<Template>,
    rasterizer: TemplateRasterizer,
    last_score: Option<Score>,
}

impl Session {
    pub fn new(width: u32, height: u32, device: DeviceClass) -> Result<Self, PracticeError> {
        Self::with_config(width, height, device, ScoringConfig::default())
    }

    pub fn with_config(
        width: u32,
        height: u32,
        device: DeviceClass,
        config: ScoringConfig,
    ) -> Result<Self, PracticeError> {
        let size = CanvasSize::new(width, height)?;
        log::info!("session: {width}x{height} canvas, {device:?}");
        Ok(Self {
            catalog: GlyphCatalog::builtin(),
            config,
            glyph: DEFAULT_GLYPH,
            size,
            device,
            pen: PenStyle::default(),
            strokes: StrokeSet::new(),
            template: None,
            rasterizer: TemplateRasterizer::new(),
            last_score: None,
        })
    }

    // -- Selection ------------------------------------------------------

    /// Select a glyph to practise. Clears strokes and the last score.
    pub fn select_glyph(&mut self, category: Category, ch: char) -> Result<(), PracticeError> {
        let glyph = self.catalog.lookup(category, ch)?;
        self.glyph = glyph;
        self.reset();
        log::info!("selected {:?} ({})", glyph.ch, category.name());
        Ok(())
    }

    /// Switch category, selecting its first glyph.
    pub fn select_category(&mut self, category: Category) -> Option<Glyph> {
        let Some(glyph) = self.catalog.default_glyph(category) else {
            log::warn!("category {} has no glyphs", category.name());
            return None;
        };
        self.glyph = glyph;
        self.reset();
        log::info!("selected category {} ({:?})", category.name(), glyph.ch);
        Some(glyph)
    }

    /// Clear strokes and score and force a fresh template on the next check.
    pub fn reset(&mut self) {
        self.strokes.clear();
        self.last_score = None;
        self.template = None;
    }

    // -- Surface --------------------------------------------------------

    /// Change the canvas size. Strokes are kept; the template is re-rendered on demand.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), PracticeError> {
        let size = CanvasSize::new(width, height)?;
        if size != self.size {
            log::info!("resize: {}x{} -> {width}x{height}", self.size.width, self.size.height);
            self.size = size;
            self.template = None;
        }
        Ok(())
    }

    pub fn set_device_class(&mut self, device: DeviceClass) {
        if device != self.device {
            log::info!("device class: {:?} -> {device:?}", self.device);
            self.device = device;
            self.template = None;
        }
    }

    // -- Pen ------------------------------------------------------------

    /// Set the pen colour from `#RRGGBB`.
    pub fn set_pen_color(&mut self, hex: &str) -> Result<(), PracticeError> {
        self.pen.color = InkColor::from_hex(hex)?;
        Ok(())
    }

    /// Set the pen width in pixels, clamped to the accepted range.
    /// Non-positive or non-finite widths are ignored.
    pub fn set_pen_width(&mut self, width: f32) {
        match PenStyle::checked_width(width) {
            Some(width) => self.pen.width = width,
            None => log::warn!("ignoring pen width {width}"),
        }
    }

    // -- Drawing --------------------------------------------------------

    pub fn begin_stroke(&mut self) {
        self.strokes.begin();
    }

    /// Record a point on the open stroke with an explicit colour and width.
    /// The width is clamped like [`Session::set_pen_width`]. Returns false when
    /// no stroke is open or the point is rejected.
    pub fn append_point(&mut self, x: f32, y: f32, color: InkColor, width: f32) -> bool {
        let Some(width) = PenStyle::checked_width(width) else {
            log::warn!("ignoring point with pen width {width}");
            return false;
        };
        let pen = PenStyle { color, width };
        self.strokes.push(SamplePoint::new(Vec2::new(x, y), &pen))
    }

    pub fn end_stroke(&mut self) {
        self.strokes.end();
    }

    /// Apply one pointer event with the current pen.
    /// Presses outside the canvas do not start a stroke; moves outside it are dropped.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => {
                let pos = Vec2::new(x, y);
                if !self.size.contains(pos) {
                    return;
                }
                self.strokes.begin();
                self.strokes.push(SamplePoint::new(pos, &self.pen));
            }
            InputEvent::PointerMove { x, y } => {
                let pos = Vec2::new(x, y);
                if self.strokes.is_drawing() && self.size.contains(pos) {
                    self.strokes.push(SamplePoint::new(pos, &self.pen));
                }
            }
            InputEvent::PointerUp { .. } => {
                self.strokes.end();
            }
        }
    }

    /// Apply every queued event in arrival order.
    pub fn drain_input(&mut self, queue: &mut InputQueue) {
        for event in queue.drain() {
            self.apply(event);
        }
    }

    // -- Scoring --------------------------------------------------------

    /// Score the current strokes against the glyph template.
    /// Calling it again without new input returns the same score.
    pub fn check(&mut self) -> Result<Score, PracticeError> {
        let points: Vec<SamplePoint> = self.strokes.points().copied().collect();
        let ctx = ScoreContext::resolve(&self.config, self.device, self.glyph.category);
        let template = self.template()?;
        let score = scoring::score(&points, &template.mask, &template.key_points, &ctx);

        log::info!(
            "check {:?}: {} points, accuracy {:.1} coverage {:.1} key points {:.1} -> {} ({})",
            self.glyph.ch,
            points.len(),
            score.accuracy,
            score.coverage,
            score.key_points,
            score.composite,
            score.tier.name()
        );
        self.last_score = Some(score);
        Ok(score)
    }

    /// The template for the current glyph, size and device, rendering it if stale.
    pub fn template(&mut self) -> Result<&Template, PracticeError> {
        let template = match self.template.take() {
            Some(t) if t.matches(self.glyph, self.size, self.device) => t,
            _ => {
                let mask =
                    self.rasterizer.render(self.catalog, self.glyph, self.size, self.device)?;
                let key_points = extract_key_points(&mask);
                Template {
                    glyph: self.glyph,
                    size: self.size,
                    device: self.device,
                    mask,
                    key_points,
                }
            }
        };
        Ok(&*self.template.insert(template))
    }

    // -- Accessors ------------------------------------------------------

    pub fn catalog(&self) -> &'static GlyphCatalog {
        self.catalog
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn glyph(&self) -> Glyph {
        self.glyph
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    pub fn pen(&self) -> &PenStyle {
        &self.pen
    }

    pub fn strokes(&self) -> &StrokeSet {
        &self.strokes
    }

    pub fn is_drawing(&self) -> bool {
        self.strokes.is_drawing()
    }

    pub fn last_score(&self) -> Option<&Score> {
        self.last_score.as_ref()
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.last_score.map(|s| s.tier.feedback())
    }

    /// True when a template is cached for the current glyph, size and device.
    pub fn has_template(&self) -> bool {
        self.template
            .as_ref()
            .is_some_and(|t| t.matches(self.glyph, self.size, self.device))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyphs::StrokeShape;
    use crate::input::{DEFAULT_PEN_WIDTH, MAX_PEN_WIDTH};
    use crate::raster::GlyphFrame;
    use crate::scoring::Tier;

    fn draw_line(session: &mut Session, from: Vec2, to: Vec2, steps: usize, width: f32) {
        let color = session.pen().color;
        session.begin_stroke();
        for i in 0..=steps {
            let p = from.lerp(to, i as f32 / steps as f32);
            session.append_point(p.x, p.y, color, width);
        }
        session.end_stroke();
    }

    #[test]
    fn empty_check_is_zero_retry() {
        let mut session = Session::new(400, 400, DeviceClass::Mobile).unwrap();
        let score = session.check().unwrap();
        assert_eq!(score, Score::EMPTY);
        assert_eq!(score.tier, Tier::Retry);
        assert_eq!(session.last_score(), Some(&Score::EMPTY));
    }

    #[test]
    fn check_is_idempotent() {
        let mut session = Session::new(400, 400, DeviceClass::Desktop).unwrap();
        draw_line(&mut session, Vec2::new(120.0, 150.0), Vec2::new(280.0, 160.0), 40, 12.0);
        let first = session.check().unwrap();
        let second = session.check().unwrap();
        assert_eq!(first, second);
    }

    /// Canvas-space skeleton of the current glyph, sampled about every 2 px.
    fn skeleton(session: &Session) -> Vec<Vec<Vec2>> {
        let frame = GlyphFrame::new(session.size(), session.device());
        let def = session.catalog().def(session.glyph()).unwrap();
        def.strokes
            .iter()
            .map(|shape| match shape {
                StrokeShape::Polyline(points) => {
                    let mut out = vec![frame.to_canvas(points[0])];
                    for pair in points.windows(2) {
                        let (a, b) = (frame.to_canvas(pair[0]), frame.to_canvas(pair[1]));
                        let steps = (a.distance(b) / 2.0).ceil().max(1.0) as usize;
                        out.extend((1..=steps).map(|i| a.lerp(b, i as f32 / steps as f32)));
                    }
                    out
                }
                StrokeShape::Ellipse { center, radii } => {
                    let c = frame.to_canvas(*center);
                    let r = Vec2::from(*radii) * frame.em;
                    (0..=600)
                        .map(|i| {
                            let t = i as f32 / 600.0 * std::f32::consts::TAU;
                            c + Vec2::new(t.cos(), t.sin()) * r
                        })
                        .collect()
                }
            })
            .collect()
    }

    fn trace_skeleton(session: &mut Session) {
        let color = session.pen().color;
        for stroke in skeleton(session) {
            session.begin_stroke();
            for p in stroke {
                session.append_point(p.x, p.y, color, DEFAULT_PEN_WIDTH);
            }
            session.end_stroke();
        }
    }

    #[test]
    fn traced_ring_is_excellent() {
        let mut session = Session::new(800, 600, DeviceClass::Desktop).unwrap();
        session.select_glyph(Category::Digit, '0').unwrap();
        trace_skeleton(&mut session);

        let score = session.check().unwrap();
        assert_eq!(score.accuracy, 100.0, "{score:?}");
        assert_eq!(score.key_points, 100.0, "{score:?}");
        // A 12 px pen sweeps only part of the ring's width.
        assert!(score.coverage > 25.0 && score.coverage < 80.0, "{score:?}");
        assert_eq!(score.tier, Tier::Excellent, "{score:?}");
    }

    #[test]
    fn skeleton_trace_of_every_glyph_passes_on_desktop() {
        let mut session = Session::new(800, 600, DeviceClass::Desktop).unwrap();
        let catalog = session.catalog();
        for category in Category::ALL {
            for glyph in catalog.glyphs(category) {
                session.select_glyph(glyph.category, glyph.ch).unwrap();
                trace_skeleton(&mut session);
                let score = session.check().unwrap();
                assert_ne!(score.tier, Tier::Retry, "{glyph:?}: {score:?}");
            }
        }
    }

    #[test]
    fn wide_pen_tap_outside_the_glyph_fails() {
        let mut session = Session::new(800, 600, DeviceClass::Desktop).unwrap();
        session.set_pen_width(2000.0);
        assert_eq!(session.pen().width, MAX_PEN_WIDTH);

        session.apply(InputEvent::PointerDown { x: 5.0, y: 5.0 });
        session.apply(InputEvent::PointerUp { x: 5.0, y: 5.0 });
        let score = session.check().unwrap();
        assert_eq!(score.coverage, 0.0, "{score:?}");
        assert_eq!(score.key_points, 0.0, "{score:?}");
        assert_eq!(score.tier, Tier::Retry);

        // An explicit point gets the same clamp.
        let color = session.pen().color;
        session.begin_stroke();
        assert!(session.append_point(6.0, 6.0, color, 5000.0));
        session.end_stroke();
        assert!(session.strokes().points().all(|p| p.width == MAX_PEN_WIDTH));
    }

    #[test]
    fn append_point_rejects_invalid_input() {
        let mut session = Session::new(200, 200, DeviceClass::Desktop).unwrap();
        let color = session.pen().color;
        session.begin_stroke();
        assert!(!session.append_point(10.0, 10.0, color, f32::NAN));
        assert!(!session.append_point(10.0, 10.0, color, 0.0));
        assert!(!session.append_point(f32::NAN, 10.0, color, 12.0));
        assert!(session.append_point(10.0, 10.0, color, 12.0));
        session.end_stroke();
        assert_eq!(session.strokes().point_count(), 1);
    }

    #[test]
    fn resize_rerenders_the_template() {
        let mut session = Session::new(800, 600, DeviceClass::Desktop).unwrap();
        session.select_glyph(Category::Digit, '1').unwrap();
        // The bar of "1" runs down x = 400 at this size.
        draw_line(&mut session, Vec2::new(400.0, 140.0), Vec2::new(400.0, 400.0), 50, 12.0);

        let before = session.check().unwrap();
        assert!(session.has_template());

        session.resize(300, 300).unwrap();
        assert!(!session.has_template());
        let after = session.check().unwrap();

        assert_eq!(session.template().unwrap().size, CanvasSize::new(300, 300).unwrap());
        assert!(after.accuracy < before.accuracy, "{before:?} vs {after:?}");
    }

    #[test]
    fn device_change_invalidates_template() {
        let mut session = Session::new(400, 400, DeviceClass::Desktop).unwrap();
        session.template().unwrap();
        session.set_device_class(DeviceClass::Mobile);
        assert!(!session.has_template());
        assert_eq!(session.template().unwrap().device, DeviceClass::Mobile);
    }

    #[test]
    fn selection_clears_strokes_and_score() {
        let mut session = Session::new(300, 300, DeviceClass::Desktop).unwrap();
        draw_line(&mut session, Vec2::new(10.0, 10.0), Vec2::new(50.0, 50.0), 5, 12.0);
        session.check().unwrap();

        session.select_glyph(Category::Katakana, 'カ').unwrap();
        assert!(session.strokes().is_empty());
        assert!(session.last_score().is_none());
        assert_eq!(session.glyph(), Glyph::new(Category::Katakana, 'カ'));

        draw_line(&mut session, Vec2::new(10.0, 10.0), Vec2::new(50.0, 50.0), 5, 12.0);
        let zero = Glyph::new(Category::Digit, '0');
        assert_eq!(session.select_category(Category::Digit), Some(zero));
        assert!(session.strokes().is_empty());
    }

    #[test]
    fn invalid_selection_keeps_state() {
        let mut session = Session::new(300, 300, DeviceClass::Desktop).unwrap();
        draw_line(&mut session, Vec2::new(10.0, 10.0), Vec2::new(50.0, 50.0), 5, 12.0);
        assert!(session.select_glyph(Category::Digit, 'あ').is_err());
        assert_eq!(session.glyph(), DEFAULT_GLYPH);
        assert_eq!(session.strokes().point_count(), 6);
        assert!(session.resize(0, 10).is_err());
        assert_eq!(session.size(), CanvasSize::new(300, 300).unwrap());
    }

    #[test]
    fn pointer_events_outside_the_canvas_are_ignored() {
        let mut session = Session::new(200, 200, DeviceClass::Desktop).unwrap();
        let mut queue = InputQueue::new();
        queue.push(InputEvent::PointerDown { x: -5.0, y: 10.0 });
        queue.push(InputEvent::PointerMove { x: 10.0, y: 10.0 });
        queue.push(InputEvent::PointerUp { x: 10.0, y: 10.0 });
        session.drain_input(&mut queue);
        assert!(session.strokes().is_empty());

        queue.push(InputEvent::PointerDown { x: 10.0, y: 10.0 });
        queue.push(InputEvent::PointerMove { x: 250.0, y: 10.0 });
        queue.push(InputEvent::PointerMove { x: 20.0, y: 12.0 });
        queue.push(InputEvent::PointerUp { x: 20.0, y: 12.0 });
        session.drain_input(&mut queue);

        assert_eq!(session.strokes().strokes().len(), 1);
        let xs: Vec<f32> = session.strokes().points().map(|p| p.x).collect();
        assert_eq!(xs, vec![10.0, 20.0]);
        assert!(!session.is_drawing());
    }

    #[test]
    fn pen_applies_to_new_points() {
        let mut session = Session::new(200, 200, DeviceClass::Desktop).unwrap();
        session.set_pen_color("#4CACBC").unwrap();
        session.set_pen_width(20.0);
        session.set_pen_width(-1.0);
        assert!(session.set_pen_color("blue").is_err());

        session.apply(InputEvent::PointerDown { x: 5.0, y: 5.0 });
        let p = session.strokes().points().next().copied().unwrap();
        assert_eq!(p.width, 20.0);
        assert_eq!(p.color.to_hex(), "#4CACBC");
    }
}
