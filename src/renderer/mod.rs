//! Canvas 2D rendering module
//!
//! Draws the play field in field units (1200x675) scaled to the canvas.
//! The layout helpers here are platform independent; the browser drawing
//! code lives in `canvas`.

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, GROUND_Y};
use crate::sim::{ParticleTint, PowerUpKind};

#[cfg(target_arch = "wasm32")]
mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

/// Spacing of the parallax lines on the ground
pub const GROUND_LINE_SPACING: f32 = 40.0;
/// Stars drawn on night themes
pub const STAR_COUNT: usize = 50;
/// Clouds drawn on day themes
pub const CLOUD_COUNT: usize = 5;

pub const CRASH_COLOR: &str = "#ef4444";
pub const JUMP_COLOR: &str = "#8b5cf6";
pub const INVINCIBLE_GLOW: &str = "#10b981";

pub fn power_up_color(kind: PowerUpKind) -> &'static str {
    match kind {
        PowerUpKind::DoubleJump => "#8b5cf6",
        PowerUpKind::SlowMotion => "#f59e0b",
        PowerUpKind::Invincible => "#10b981",
    }
}

/// Symbol drawn on the pickup box
pub fn power_up_glyph(kind: PowerUpKind) -> &'static str {
    match kind {
        PowerUpKind::DoubleJump => "↑↑",
        PowerUpKind::SlowMotion => "⏱",
        PowerUpKind::Invincible => "🛡",
    }
}

pub fn particle_color(tint: ParticleTint) -> &'static str {
    match tint {
        ParticleTint::Jump => JUMP_COLOR,
        ParticleTint::Crash => CRASH_COLOR,
        ParticleTint::Pickup(kind) => power_up_color(kind),
    }
}

/// Fixed star positions in the sky band above the ground
pub fn star_position(i: usize) -> (f32, f32) {
    let x = (i * 73) as f32 % FIELD_WIDTH;
    let y = (i * 137) as f32 % GROUND_Y;
    (x, y)
}

/// Twinkling star size at `time_ms`
pub fn star_size(i: usize, time_ms: f64) -> f32 {
    ((time_ms * 0.001 + i as f64).sin() + 1.5) as f32
}

/// X positions of the ground lines for the distance scrolled so far.
/// Covers one spacing past each edge so lines never pop in.
pub fn ground_lines(distance: f32) -> impl Iterator<Item = f32> {
    let offset = distance.rem_euclid(GROUND_LINE_SPACING);
    let count = (FIELD_WIDTH / GROUND_LINE_SPACING) as i32 + 1;
    (-1..=count).map(move |i| i as f32 * GROUND_LINE_SPACING - offset)
}

/// Cloud center for `i`, drifting at a quarter of the ground speed
pub fn cloud_position(i: usize, distance: f32) -> (f32, f32) {
    let span = FIELD_WIDTH + 200.0;
    let base = i as f32 * span / CLOUD_COUNT as f32;
    let x = (base - distance * 0.25).rem_euclid(span) - 100.0;
    let y = 60.0 + (i * 47 % 150) as f32;
    (x, y)
}

/// Leg swing of the running animation, in field units
pub fn leg_offset(time_ms: f64) -> f32 {
    ((time_ms * 0.1).sin() * 5.0) as f32
}

/// Scale and letterbox offset that fit the field into a canvas
pub fn fit_field(canvas_width: f64, canvas_height: f64) -> (f64, f64, f64) {
    let scale = (canvas_width / FIELD_WIDTH as f64).min(canvas_height / FIELD_HEIGHT as f64);
    let offset_x = (canvas_width - FIELD_WIDTH as f64 * scale) / 2.0;
    let offset_y = (canvas_height - FIELD_HEIGHT as f64 * scale) / 2.0;
    (scale, offset_x, offset_y)
}
