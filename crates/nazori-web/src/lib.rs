//! `#[wasm_bindgen]` exports for the tracing practice page.
//!
//! One [`PracticeRunner`] lives in a `thread_local!`; every export borrows it
//! through [`with_runner`]. Calling anything before `practice_init()` panics.

pub mod runner;

pub use runner::PracticeRunner;

use std::cell::RefCell;

use nazori_engine::{Category, InputEvent, PracticeError};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<PracticeRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut PracticeRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow
            .as_mut()
            .expect("Practice not initialized. Call practice_init() first.");
        f(runner)
    })
}

fn js_err(err: PracticeError) -> JsValue {
    let msg = JsValue::from_str(&err.to_string());
    web_sys::console::error_1(&msg);
    msg
}

fn parse_category(name: &str) -> Result<Category, JsValue> {
    Category::parse(name).ok_or_else(|| JsValue::from_str(&format!("unknown category: {name:?}")))
}

fn parse_char(s: &str) -> Result<char, JsValue> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(JsValue::from_str(&format!("expected a single character, got {s:?}"))),
    }
}

#[wasm_bindgen]
pub fn practice_init(width: u32, height: u32, window_width: u32) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = PracticeRunner::new(width, height, window_width).map_err(js_err)?;
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("nazori: initialized");
    Ok(())
}

// ---- Selection ----

#[wasm_bindgen]
pub fn practice_select_glyph(category: &str, ch: &str) -> Result<(), JsValue> {
    let category = parse_category(category)?;
    let ch = parse_char(ch)?;
    with_runner(|r| r.select_glyph(category, ch)).map_err(js_err)
}

/// Select a category's first glyph and return it.
#[wasm_bindgen]
pub fn practice_select_category(category: &str) -> Result<String, JsValue> {
    let category = parse_category(category)?;
    with_runner(|r| r.select_category(category))
        .map(String::from)
        .ok_or_else(|| JsValue::from_str(&format!("category {} is empty", category.name())))
}

/// Glyphs of a category in display order.
#[wasm_bindgen]
pub fn practice_glyphs(category: &str) -> Result<js_sys::Array, JsValue> {
    let category = parse_category(category)?;
    let glyphs = js_sys::Array::new();
    with_runner(|r| {
        for glyph in r.session().catalog().glyphs(category) {
            glyphs.push(&JsValue::from_str(&glyph.ch.to_string()));
        }
    });
    Ok(glyphs)
}

#[wasm_bindgen]
pub fn practice_current_glyph() -> String {
    with_runner(|r| r.session().glyph().ch.to_string())
}

#[wasm_bindgen]
pub fn practice_reset() {
    with_runner(|r| r.reset());
}

#[wasm_bindgen]
pub fn practice_resize(width: u32, height: u32, window_width: u32) -> Result<(), JsValue> {
    with_runner(|r| r.resize(width, height, window_width)).map_err(js_err)
}

#[wasm_bindgen]
pub fn practice_set_pen(color_hex: &str, width: f32) -> Result<(), JsValue> {
    with_runner(|r| r.set_pen(color_hex, width)).map_err(js_err)
}

#[wasm_bindgen]
pub fn practice_is_mobile() -> bool {
    with_runner(|r| r.session().device().is_mobile())
}

// ---- Pointer input ----

#[wasm_bindgen]
pub fn practice_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn practice_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn practice_pointer_up(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
}

// ---- Scoring ----

/// Score the current strokes; returns the composite (0-100).
#[wasm_bindgen]
pub fn practice_check() -> Result<u32, JsValue> {
    with_runner(|r| r.check()).map(|s| s.composite).map_err(js_err)
}

#[wasm_bindgen]
pub fn practice_score_accuracy() -> f32 {
    with_runner(|r| r.score().map_or(0.0, |s| s.accuracy))
}

#[wasm_bindgen]
pub fn practice_score_coverage() -> f32 {
    with_runner(|r| r.score().map_or(0.0, |s| s.coverage))
}

#[wasm_bindgen]
pub fn practice_score_key_points() -> f32 {
    with_runner(|r| r.score().map_or(0.0, |s| s.key_points))
}

/// Tier of the last check (`excellent`, `good` or `retry`), empty before the first check.
#[wasm_bindgen]
pub fn practice_tier() -> String {
    with_runner(|r| r.score().map_or_else(String::new, |s| s.tier.name().to_string()))
}

/// Star count of the last check (1-3), 0 before the first check.
#[wasm_bindgen]
pub fn practice_stars() -> u32 {
    with_runner(|r| r.score().map_or(0, |s| s.tier.stars()))
}

/// Last score as JSON, or `null` before the first check.
#[wasm_bindgen]
pub fn practice_score_json() -> String {
    with_runner(|r| serde_json::to_string(&r.score()).unwrap_or_else(|_| "null".into()))
}

/// Stars, message, colour and tone cue of the last check as JSON, or `null`.
#[wasm_bindgen]
pub fn practice_feedback_json() -> String {
    with_runner(|r| serde_json::to_string(&r.feedback()).unwrap_or_else(|_| "null".into()))
}

// ---- Buffer accessors ----

#[wasm_bindgen]
pub fn get_points_ptr() -> *const f32 {
    with_runner(|r| r.points_ptr())
}

#[wasm_bindgen]
pub fn get_point_count() -> u32 {
    with_runner(|r| r.point_count())
}

#[wasm_bindgen]
pub fn get_stroke_starts_ptr() -> *const u32 {
    with_runner(|r| r.stroke_starts_ptr())
}

#[wasm_bindgen]
pub fn get_stroke_count() -> u32 {
    with_runner(|r| r.stroke_count())
}

#[wasm_bindgen]
pub fn get_mask_ptr() -> Result<*const u8, JsValue> {
    with_runner(|r| r.mask_ptr()).map_err(js_err)
}

#[wasm_bindgen]
pub fn get_mask_len() -> Result<u32, JsValue> {
    with_runner(|r| r.mask_len()).map_err(js_err)
}

#[wasm_bindgen]
pub fn get_key_points_ptr() -> Result<*const f32, JsValue> {
    with_runner(|r| r.key_points_ptr()).map_err(js_err)
}

#[wasm_bindgen]
pub fn get_key_point_count() -> Result<u32, JsValue> {
    with_runner(|r| r.key_point_count()).map_err(js_err)
}

#[wasm_bindgen]
pub fn get_tones_ptr() -> *const f32 {
    with_runner(|r| r.tones_ptr())
}

#[wasm_bindgen]
pub fn get_tone_count() -> u32 {
    with_runner(|r| r.tone_count())
}
