#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Sky Battle.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so the adapter depends on macroquad without its default `audio`
//! feature. Every actor is drawn as a filled rectangle scaled from playfield
//! units onto the window.

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_pressed, is_key_released, KeyCode};
use sky_battle_rendering::{
    Color, FrameInput, HudPresentation, Overlay, Presentation, RenderingBackend, Scene,
};
use std::time::Duration;
use tracing::debug;

const HUD_FONT_SIZE: f32 = 28.0;
const OVERLAY_FONT_SIZE: f32 = 56.0;
const SHIELD_THICKNESS: f32 = 4.0;

/// Edge-triggered key activity observed during a single frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyboardObservations {
    /// `Up` or `W` went down.
    pub up_pressed: bool,
    /// `Down` or `S` went down.
    pub down_pressed: bool,
    /// `Up` or `W` went up.
    pub up_released: bool,
    /// `Down` or `S` went up.
    pub down_released: bool,
    /// `Space` went down.
    pub fire_pressed: bool,
    /// `Enter` went down.
    pub confirm_pressed: bool,
    /// `Escape` or `Q` went down.
    pub quit_pressed: bool,
}

impl KeyboardObservations {
    fn poll() -> Self {
        Self {
            up_pressed: is_key_pressed(KeyCode::Up) || is_key_pressed(KeyCode::W),
            down_pressed: is_key_pressed(KeyCode::Down) || is_key_pressed(KeyCode::S),
            up_released: is_key_released(KeyCode::Up) || is_key_released(KeyCode::W),
            down_released: is_key_released(KeyCode::Down) || is_key_released(KeyCode::S),
            fire_pressed: is_key_pressed(KeyCode::Space),
            confirm_pressed: is_key_pressed(KeyCode::Enter),
            quit_pressed: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
        }
    }

    /// Converts the observed key edges into the adapter-neutral frame input.
    #[must_use]
    pub fn frame_input(self) -> FrameInput {
        FrameInput {
            move_up: self.up_pressed,
            move_down: self.down_pressed,
            stop_vertical: self.up_released || self.down_released,
            fire: self.fire_pressed,
            confirm: self.confirm_pressed,
            quit: self.quit_pressed,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> bool + 'static,
    {
        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.width.round() as i32,
            window_height: scene.height.round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = self.swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);

            loop {
                let keyboard = KeyboardObservations::poll();
                let input = keyboard.frame_input();
                if input.quit {
                    debug!("quit requested");
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                if !update_scene(frame_dt, input, &mut scene) {
                    break;
                }

                macroquad::window::clear_background(background);
                let metrics = SceneMetrics::from_scene(
                    &scene,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_actors(&scene, &metrics);
                draw_shield(&scene, &metrics);
                draw_hud(&scene.hud, &metrics);
                if let Some(overlay) = &scene.overlay {
                    draw_overlay(overlay, &metrics);
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Maps playfield units onto window pixels, letterboxing the playfield.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
    playfield: Vec2,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let scale = (screen_width / scene.width)
            .min(screen_height / scene.height)
            .max(0.0);
        let playfield = Vec2::new(scene.width * scale, scene.height * scale);
        let offset = Vec2::new(
            (screen_width - playfield.x) * 0.5,
            (screen_height - playfield.y) * 0.5,
        );

        Self {
            scale,
            offset,
            playfield,
        }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        self.offset + position * self.scale
    }
}

fn draw_actors(scene: &Scene, metrics: &SceneMetrics) {
    for actor in &scene.actors {
        let corner = metrics.to_screen(actor.position);
        let size = actor.size * metrics.scale;
        macroquad::shapes::draw_rectangle(
            corner.x,
            corner.y,
            size.x,
            size.y,
            to_macroquad_color(actor.color),
        );
    }
}

fn draw_shield(scene: &Scene, metrics: &SceneMetrics) {
    let Some((position, size)) = scene.shield else {
        return;
    };
    let corner = metrics.to_screen(position) - Vec2::splat(SHIELD_THICKNESS);
    let size = size * metrics.scale + Vec2::splat(SHIELD_THICKNESS * 2.0);
    macroquad::shapes::draw_rectangle_lines(
        corner.x,
        corner.y,
        size.x,
        size.y,
        SHIELD_THICKNESS,
        to_macroquad_color(scene.palette.shield),
    );
}

fn hud_lines(hud: &HudPresentation) -> Vec<String> {
    let mut lines = vec![format!("Health: {}", hud.hearts)];
    if let Some((kills, target)) = hud.kill_progress {
        lines.push(format!("Kills: {kills}/{target}"));
    }
    if let Some(health) = hud.boss_health {
        if hud.boss_shielded {
            lines.push(format!("Boss: {health} (shielded)"));
        } else {
            lines.push(format!("Boss: {health}"));
        }
    }
    lines
}

fn draw_hud(hud: &HudPresentation, metrics: &SceneMetrics) {
    let color = to_macroquad_color(Color::from_rgb_u8(0xff, 0xff, 0xff));
    for (index, line) in hud_lines(hud).iter().enumerate() {
        let baseline = metrics.offset.y + HUD_FONT_SIZE * (index as f32 + 1.0);
        let _ = macroquad::text::draw_text(
            line,
            metrics.offset.x + 10.0,
            baseline,
            HUD_FONT_SIZE,
            color,
        );
    }
}

fn draw_overlay(overlay: &Overlay, metrics: &SceneMetrics) {
    let shade = Color::new(0.0, 0.0, 0.0, 0.6);
    macroquad::shapes::draw_rectangle(
        metrics.offset.x,
        metrics.offset.y,
        metrics.playfield.x,
        metrics.playfield.y,
        to_macroquad_color(shade),
    );

    let headline = overlay.headline();
    let width = macroquad::text::measure_text(&headline, None, OVERLAY_FONT_SIZE as u16, 1.0).width;
    let center = metrics.offset + metrics.playfield * 0.5;
    let _ = macroquad::text::draw_text(
        &headline,
        center.x - width * 0.5,
        center.y,
        OVERLAY_FONT_SIZE,
        to_macroquad_color(Color::from_rgb_u8(0xff, 0xff, 0xff)),
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_battle_rendering::Palette;

    fn scene() -> Scene {
        Scene::new(1300.0, 750.0, Palette::default()).expect("valid scene")
    }

    #[test]
    fn metrics_letterbox_wide_windows() {
        let metrics = SceneMetrics::from_scene(&scene(), 2600.0, 750.0);
        assert_eq!(metrics.scale, 1.0);
        assert_eq!(metrics.offset, Vec2::new(650.0, 0.0));
        assert_eq!(metrics.to_screen(Vec2::new(5.0, 300.0)), Vec2::new(655.0, 300.0));
    }

    #[test]
    fn metrics_shrink_playfield_to_fit() {
        let metrics = SceneMetrics::from_scene(&scene(), 650.0, 750.0);
        assert_eq!(metrics.scale, 0.5);
        assert_eq!(metrics.playfield, Vec2::new(650.0, 375.0));
        assert_eq!(metrics.offset, Vec2::new(0.0, 187.5));
    }

    #[test]
    fn hud_lines_only_show_active_counters() {
        let squadron = HudPresentation {
            hearts: 4,
            kill_progress: Some((3, 10)),
            boss_health: None,
            boss_shielded: false,
        };
        assert_eq!(hud_lines(&squadron), vec!["Health: 4", "Kills: 3/10"]);

        let boss = HudPresentation {
            hearts: 2,
            kill_progress: None,
            boss_health: Some(6),
            boss_shielded: true,
        };
        assert_eq!(hud_lines(&boss), vec!["Health: 2", "Boss: 6 (shielded)"]);
    }
}
