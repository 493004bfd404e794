#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Sky Battle adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use sky_battle_core::{ActorKind, ActorView, Command, HudSnapshot, LevelId};
use std::time::Duration;
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Fill colors assigned to each actor kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Player plane and followers.
    pub friendly: Color,
    /// Enemy fighters.
    pub enemy: Color,
    /// Boss.
    pub boss: Color,
    /// Projectiles fired by the player side.
    pub user_projectile: Color,
    /// Projectiles fired by enemies and the boss.
    pub hostile_projectile: Color,
    /// Seeking power-up.
    pub power_up: Color,
    /// Outline drawn around a shielded boss.
    pub shield: Color,
}

impl Palette {
    /// Color used to fill an actor of the provided kind.
    #[must_use]
    pub const fn color_for(&self, kind: ActorKind) -> Color {
        match kind {
            ActorKind::UserPlane | ActorKind::Follower => self.friendly,
            ActorKind::EnemyPlane => self.enemy,
            ActorKind::Boss => self.boss,
            ActorKind::UserProjectile => self.user_projectile,
            ActorKind::EnemyProjectile | ActorKind::BossProjectile => self.hostile_projectile,
            ActorKind::PowerUp => self.power_up,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            friendly: Color::from_rgb_u8(0x3d, 0x8b, 0xd9),
            enemy: Color::from_rgb_u8(0xc8, 0x2a, 0x36),
            boss: Color::from_rgb_u8(0x6a, 0x1b, 0x9a),
            user_projectile: Color::from_rgb_u8(0xff, 0xc1, 0x07),
            hostile_projectile: Color::from_rgb_u8(0xff, 0x57, 0x22),
            power_up: Color::from_rgb_u8(0x2f, 0x95, 0x32),
            shield: Color::from_rgb_u8(0x80, 0xde, 0xea),
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Whether the up key was pressed on this frame.
    pub move_up: bool,
    /// Whether the down key was pressed on this frame.
    pub move_down: bool,
    /// Whether an up or down key was released on this frame.
    pub stop_vertical: bool,
    /// Whether the fire key was pressed on this frame.
    pub fire: bool,
    /// Whether the player confirmed the overlay shown between levels.
    pub confirm: bool,
    /// Whether the player asked to leave the game.
    pub quit: bool,
}

impl FrameInput {
    /// Translates the frame's key activity into player commands.
    ///
    /// Releases are applied before presses so a key pressed on the same frame
    /// another one was released keeps the plane moving.
    pub fn commands(&self, out: &mut Vec<Command>) {
        if self.stop_vertical {
            out.push(Command::StopVertical);
        }
        if self.move_up {
            out.push(Command::MoveUp);
        }
        if self.move_down {
            out.push(Command::MoveDown);
        }
        if self.fire {
            out.push(Command::Fire);
        }
    }
}

/// Single actor drawn as a filled rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorPresentation {
    /// Kind of actor being drawn.
    pub kind: ActorKind,
    /// Upper-left corner in screen units.
    pub position: Vec2,
    /// Width and height in screen units.
    pub size: Vec2,
    /// Fill color.
    pub color: Color,
}

/// Heads-up display content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct HudPresentation {
    /// Hearts the player has left.
    pub hearts: u32,
    /// Kill counter and target for kill-based levels.
    pub kill_progress: Option<(u32, u32)>,
    /// Remaining boss health once the boss entered.
    pub boss_health: Option<u32>,
    /// Whether the boss shield is raised.
    pub boss_shielded: bool,
}

impl From<HudSnapshot> for HudPresentation {
    fn from(hud: HudSnapshot) -> Self {
        Self {
            hearts: hud.health,
            kill_progress: hud.kill_target.map(|target| (hud.kills, target)),
            boss_health: hud.boss_health,
            boss_shielded: hud.boss_shielded,
        }
    }
}

/// Full-screen message drawn over the playfield.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Overlay {
    /// A level was cleared; the player confirms to continue.
    LevelCleared {
        /// Level that will be loaded on confirmation.
        next: LevelId,
    },
    /// The player plane was destroyed.
    GameOver,
    /// The boss was destroyed.
    Victory,
    /// A fatal error halted the game.
    Fatal {
        /// Message shown to the player.
        message: String,
    },
}

impl Overlay {
    /// Headline text displayed for the overlay.
    #[must_use]
    pub fn headline(&self) -> String {
        match self {
            Self::LevelCleared { next } => format!("Get ready for {next}! Press Enter"),
            Self::GameOver => "Game Over".to_owned(),
            Self::Victory => "You Won!".to_owned(),
            Self::Fatal { message } => format!("Error: {message}"),
        }
    }
}

/// Scene description combining the playfield, its actors and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Width of the playfield in screen units.
    pub width: f32,
    /// Height of the playfield in screen units.
    pub height: f32,
    /// Actors drawn this frame in deterministic order.
    pub actors: Vec<ActorPresentation>,
    /// Heads-up display content.
    pub hud: HudPresentation,
    /// Bounds of the boss shield, drawn while it is raised.
    pub shield: Option<(Vec2, Vec2)>,
    /// Message drawn over the playfield, if any.
    pub overlay: Option<Overlay>,
    /// Colors assigned to each actor kind.
    pub palette: Palette,
}

impl Scene {
    /// Creates an empty scene for a playfield of the provided size.
    ///
    /// Returns an error when either dimension is not positive.
    pub fn new(width: f32, height: f32, palette: Palette) -> Result<Self, RenderingError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(RenderingError::InvalidDimensions { width, height });
        }

        Ok(Self {
            width,
            height,
            actors: Vec::new(),
            hud: HudPresentation::default(),
            shield: None,
            overlay: None,
            palette,
        })
    }

    /// Replaces the drawn actors and HUD with the provided snapshots.
    pub fn refresh(&mut self, view: &ActorView, hud: HudSnapshot) {
        self.actors.clear();
        self.shield = None;
        for snapshot in view.iter() {
            let origin = snapshot.bounds.origin();
            let size = snapshot.bounds.size();
            let presentation = ActorPresentation {
                kind: snapshot.kind,
                position: Vec2::new(origin.x, origin.y),
                size: Vec2::new(size.width, size.height),
                color: self.palette.color_for(snapshot.kind),
            };
            if snapshot.kind == ActorKind::Boss && hud.boss_shielded {
                self.shield = Some((presentation.position, presentation.size));
            }
            self.actors.push(presentation);
        }
        self.hud = HudPresentation::from(hud);
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Sky Battle scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, and mutates the scene before
    /// it is rendered. Returning `false` closes the window.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> bool + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq)]
pub enum RenderingError {
    /// The playfield must have a positive area.
    #[error("scene dimensions must be positive (received {width}x{height})")]
    InvalidDimensions {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
}
