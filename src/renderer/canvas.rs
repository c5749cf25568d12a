//! Canvas 2D drawing of the game state

#![allow(deprecated)] // web-sys Canvas API deprecation warnings

use std::f64::consts::PI;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::*;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, GROUND_Y};
use crate::settings::Settings;
use crate::sim::level::{Palette, Theme};
use crate::sim::{GameState, Obstacle, ObstacleKind, Particle, Player, Pose, PowerUp};

/// Canvas renderer for drawing the game state.
pub struct CanvasRenderer {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    /// Creates a new canvas renderer from an HTML canvas element.
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Failed to get 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self {
            context,
            width: f64::from(canvas.width()),
            height: f64::from(canvas.height()),
        })
    }

    /// Track a canvas size change (device pixels)
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = f64::from(width);
        self.height = f64::from(height);
    }

    /// Renders the complete game state.
    pub fn render(&self, state: &GameState, settings: &Settings, time_ms: f64) {
        let ctx = &self.context;
        let theme = state.theme();

        // Letterbox, then work in field units
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
        ctx.set_fill_style(&JsValue::from_str("#000000"));
        ctx.fill_rect(0.0, 0.0, self.width, self.height);
        let (scale, ox, oy) = fit_field(self.width, self.height);
        ctx.set_transform(scale, 0.0, 0.0, scale, ox, oy).ok();

        let distance = if settings.effective_parallax() {
            state.distance
        } else {
            0.0
        };
        let twinkle_time = if settings.reduced_motion { 0.0 } else { time_ms };

        self.draw_sky(&theme.palette);
        if theme.has_stars && settings.quality.starfield_enabled() {
            self.draw_stars(twinkle_time);
        }
        if theme.has_clouds {
            self.draw_clouds(distance);
        }
        self.draw_ground(&theme.palette, distance);

        for particle in &state.particles {
            self.draw_particle(particle);
        }
        for obstacle in &state.obstacles {
            self.draw_obstacle(obstacle, theme);
        }
        for power_up in &state.power_ups {
            self.draw_power_up(power_up);
        }
        self.draw_player(
            &state.player,
            &theme.palette,
            state.modifiers().invincible,
            time_ms,
        );
    }

    fn fill(&self, color: &str) {
        self.context.set_fill_style(&JsValue::from_str(color));
    }

    fn draw_sky(&self, palette: &Palette) {
        let ctx = &self.context;
        let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, FIELD_HEIGHT as f64);
        gradient.add_color_stop(0.0, palette.sky_top).ok();
        gradient.add_color_stop(0.5, palette.sky_mid).ok();
        gradient.add_color_stop(1.0, palette.sky_bottom).ok();
        ctx.set_fill_style(&gradient);
        ctx.fill_rect(0.0, 0.0, FIELD_WIDTH as f64, FIELD_HEIGHT as f64);
    }

    fn draw_stars(&self, time_ms: f64) {
        self.fill("rgba(255, 255, 255, 0.6)");
        for i in 0..STAR_COUNT {
            let (x, y) = star_position(i);
            let size = star_size(i, time_ms) as f64;
            self.context.fill_rect(x as f64, y as f64, size, size);
        }
    }

    fn draw_clouds(&self, distance: f32) {
        let ctx = &self.context;
        self.fill("rgba(255, 255, 255, 0.7)");
        for i in 0..CLOUD_COUNT {
            let (x, y) = cloud_position(i, distance);
            let (x, y) = (x as f64, y as f64);
            ctx.begin_path();
            for (dx, r) in [(-30.0, 22.0), (0.0, 30.0), (30.0, 22.0)] {
                ctx.move_to(x + dx + r, y);
                ctx.arc(x + dx, y, r, 0.0, PI * 2.0).ok();
            }
            ctx.fill();
        }
    }

    fn draw_ground(&self, palette: &Palette, distance: f32) {
        let ctx = &self.context;
        let ground = GROUND_Y as f64;
        let bottom = FIELD_HEIGHT as f64;
        self.fill(palette.ground);
        ctx.fill_rect(0.0, ground, FIELD_WIDTH as f64, bottom - ground);

        ctx.set_stroke_style(&JsValue::from_str(palette.ground_lines));
        ctx.set_line_width(2.0);
        for x in ground_lines(distance) {
            ctx.begin_path();
            ctx.move_to(x as f64, ground);
            ctx.line_to(x as f64, bottom);
            ctx.stroke();
        }
    }

    fn draw_obstacle(&self, obstacle: &Obstacle, theme: &Theme) {
        let ctx = &self.context;
        let palette = &theme.palette;
        let (x, y) = (obstacle.pos.x as f64, obstacle.pos.y as f64);
        let (w, h) = (obstacle.size.x as f64, obstacle.size.y as f64);

        match obstacle.kind {
            ObstacleKind::Crate => {
                self.fill(palette.obstacle);
                ctx.fill_rect(x, y, w, h);
                self.fill(palette.obstacle_detail);
                ctx.fill_rect(x + 10.0, y + 10.0, 20.0, 20.0);
            }
            ObstacleKind::Barrier => {
                self.fill(palette.obstacle);
                ctx.fill_rect(x, y, w, h);
                // Hazard stripes
                self.fill(palette.obstacle_detail);
                let mut sy = y + 8.0;
                while sy < y + h - 8.0 {
                    ctx.fill_rect(x, sy, w, 6.0);
                    sy += 18.0;
                }
            }
            ObstacleKind::Spike | ObstacleKind::Crystal => {
                self.fill(palette.obstacle);
                ctx.begin_path();
                if obstacle.kind == ObstacleKind::Spike {
                    ctx.move_to(x, y + h);
                    ctx.line_to(x + w / 2.0, y);
                    ctx.line_to(x + w, y + h);
                } else {
                    ctx.move_to(x + w / 2.0, y);
                    ctx.line_to(x + w, y + h * 0.4);
                    ctx.line_to(x + w / 2.0, y + h);
                    ctx.line_to(x, y + h * 0.4);
                }
                ctx.close_path();
                ctx.fill();
                ctx.set_stroke_style(&JsValue::from_str(palette.obstacle_detail));
                ctx.set_line_width(2.0);
                ctx.stroke();
            }
            ObstacleKind::Cactus => {
                self.fill(palette.obstacle);
                let trunk = w * 0.4;
                ctx.fill_rect(x + (w - trunk) / 2.0, y, trunk, h);
                ctx.fill_rect(x, y + h * 0.3, w * 0.3, 6.0);
                ctx.fill_rect(x, y + h * 0.15, 6.0, h * 0.2);
                ctx.fill_rect(x + w * 0.7, y + h * 0.45, w * 0.3, 6.0);
                ctx.fill_rect(x + w - 6.0, y + h * 0.3, 6.0, h * 0.2);
            }
            ObstacleKind::Boulder => {
                self.fill(palette.obstacle);
                ctx.begin_path();
                ctx.ellipse(x + w / 2.0, y + h / 2.0, w / 2.0, h / 2.0, 0.0, 0.0, PI * 2.0)
                    .ok();
                ctx.fill();
                self.fill(palette.obstacle_detail);
                ctx.begin_path();
                ctx.arc(x + w * 0.35, y + h * 0.35, 5.0, 0.0, PI * 2.0).ok();
                ctx.fill();
            }
            ObstacleKind::Log => {
                self.fill(palette.obstacle);
                ctx.fill_rect(x, y, w, h);
                self.fill(palette.obstacle_detail);
                ctx.begin_path();
                ctx.ellipse(x + w - 8.0, y + h / 2.0, 6.0, h / 2.0 - 3.0, 0.0, 0.0, PI * 2.0)
                    .ok();
                ctx.fill();
            }
            ObstacleKind::Drone => {
                self.fill(palette.obstacle);
                ctx.fill_rect(x, y + h * 0.4, w, h * 0.6);
                // Rotors
                self.fill(palette.obstacle_detail);
                ctx.fill_rect(x - 4.0, y, w * 0.4, 4.0);
                ctx.fill_rect(x + w * 0.6 + 4.0, y, w * 0.4, 4.0);
                ctx.fill_rect(x + w / 2.0 - 4.0, y + h * 0.6, 8.0, 8.0);
            }
        }
    }

    fn draw_power_up(&self, power_up: &PowerUp) {
        let ctx = &self.context;
        let color = power_up_color(power_up.kind);
        let (w, h) = (power_up.size.x as f64, power_up.size.y as f64);

        ctx.save();
        ctx.translate(power_up.pos.x as f64 + w / 2.0, power_up.pos.y as f64 + h / 2.0)
            .ok();
        ctx.rotate(power_up.spin as f64).ok();

        // Glow
        ctx.set_shadow_blur(15.0);
        ctx.set_shadow_color(color);

        self.fill(color);
        ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);

        self.fill("#ffffff");
        ctx.set_font("20px sans-serif");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.fill_text(power_up_glyph(power_up.kind), 0.0, 0.0).ok();

        ctx.restore();
    }

    fn draw_particle(&self, particle: &Particle) {
        let ctx = &self.context;
        ctx.save();
        ctx.set_global_alpha(particle.life.clamp(0.0, 1.0) as f64);
        self.fill(particle_color(particle.tint));
        ctx.begin_path();
        ctx.arc(
            particle.pos.x as f64,
            particle.pos.y as f64,
            particle.size as f64,
            0.0,
            PI * 2.0,
        )
        .ok();
        ctx.fill();
        ctx.restore();
    }

    fn draw_player(&self, player: &Player, palette: &Palette, invincible: bool, time_ms: f64) {
        let ctx = &self.context;
        let bounds = player.bounds();
        let (x, y) = (bounds.x as f64, bounds.y as f64);
        let (w, h) = (bounds.width as f64, bounds.height as f64);

        ctx.save();
        if invincible {
            ctx.set_shadow_blur(20.0);
            ctx.set_shadow_color(INVINCIBLE_GLOW);
        }

        self.fill(palette.player);
        ctx.fill_rect(x, y, w, h);

        // Eyes
        self.fill("#ffffff");
        let eye_y = if player.is_sliding() { y + 10.0 } else { y + 20.0 };
        ctx.fill_rect(x + 15.0, eye_y, 10.0, 10.0);
        ctx.fill_rect(x + 35.0, eye_y, 10.0, 10.0);

        // Running legs
        if player.pose == Pose::Running {
            let swing = leg_offset(time_ms) as f64;
            ctx.fill_rect(x + 10.0, y + h - 15.0 + swing, 8.0, 15.0);
            ctx.fill_rect(x + w - 18.0, y + h - 15.0 - swing, 8.0, 15.0);
        }

        ctx.restore();
    }
}
