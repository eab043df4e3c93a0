/// Screen bounds and gameplay tuning.
///
/// A `GameConfig` is read once at startup and then travels inside every
/// `GameState`, so all boundary math reads the same fixed constants.

use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "INVADERS_CONFIG";

/// Number of shields placed along the bottom of the screen.
pub const SHIELD_COUNT: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Screen ────────────────────────────────────────────────────────────────
    pub canvas_width: f64,
    pub canvas_height: f64,

    // ── Player (aliens share the player's footprint) ─────────────────────────
    pub player_width: f64,
    pub player_height: f64,
    pub player_start_x: f64,
    pub player_start_y: f64,
    /// Lateral delta applied by a single move-start command.
    pub player_step: f64,

    // ── Swarm ─────────────────────────────────────────────────────────────────
    /// Boundary alien x at or beyond which the swarm drops and reverses.
    /// The left edge is always 0.
    pub swarm_right_bound: f64,
    pub swarm_drop: f64,
    pub alien_origin_x: f64,
    pub alien_origin_y: f64,
    pub alien_spacing: f64,

    // ── Shots ─────────────────────────────────────────────────────────────────
    pub player_shot_width: f64,
    pub player_shot_height: f64,
    pub enemy_shot_width: f64,
    pub enemy_shot_height: f64,
    pub shot_step: f64,
    pub max_player_shots: usize,
    /// Per-tick chance of an enemy shot while none is active.
    pub enemy_fire_chance: f64,

    // ── Shields ───────────────────────────────────────────────────────────────
    pub shield_width: f64,
    pub shield_height: f64,
    pub shield_y: f64,
    pub shield_xs: [f64; SHIELD_COUNT],

    // ── Rules ─────────────────────────────────────────────────────────────────
    pub score_per_alien: u32,
    pub starting_lives: u32,

    // ── Cadence (front end only) ─────────────────────────────────────────────
    pub tick_interval_ms: u64,
    pub frame_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 600.0,
            canvas_height: 600.0,
            player_width: 40.0,
            player_height: 25.0,
            player_start_x: 280.0,
            player_start_y: 535.0,
            player_step: 5.0,
            swarm_right_bound: 560.0,
            swarm_drop: 2.5,
            alien_origin_x: 40.0,
            alien_origin_y: 40.0,
            alien_spacing: 60.0,
            player_shot_width: 2.0,
            player_shot_height: 15.0,
            enemy_shot_width: 3.0,
            enemy_shot_height: 35.0,
            shot_step: 5.0,
            max_player_shots: 2,
            enemy_fire_chance: 0.01,
            shield_width: 80.0,
            shield_height: 50.0,
            shield_y: 425.0,
            shield_xs: [50.0, 190.0, 330.0, 470.0],
            score_per_alien: 10,
            starting_lives: 3,
            tick_interval_ms: 10,
            frame_interval_ms: 33,
        }
    }
}

impl GameConfig {
    /// Leftmost x the player may reach before wrapping to the right side.
    pub fn player_left_bound(&self) -> f64 {
        -self.player_width
    }

    /// Rightmost x the player may reach before wrapping to the left side.
    pub fn player_right_bound(&self) -> f64 {
        self.canvas_width + self.player_width
    }

    /// Parse a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from the file named by `INVADERS_CONFIG`, or fall back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_step", self.player_step),
            ("swarm_drop", self.swarm_drop),
            ("alien_spacing", self.alien_spacing),
            ("player_shot_width", self.player_shot_width),
            ("player_shot_height", self.player_shot_height),
            ("enemy_shot_width", self.enemy_shot_width),
            ("enemy_shot_height", self.enemy_shot_height),
            ("shot_step", self.shot_step),
            ("shield_width", self.shield_width),
            ("shield_height", self.shield_height),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                bail!("{name} must be positive, got {value}");
            }
        }
        if self.swarm_right_bound <= 0.0 || self.swarm_right_bound > self.canvas_width {
            bail!(
                "swarm_right_bound must lie within (0, {}], got {}",
                self.canvas_width,
                self.swarm_right_bound
            );
        }
        if !(0.0..=1.0).contains(&self.enemy_fire_chance) {
            bail!("enemy_fire_chance must be within [0, 1], got {}", self.enemy_fire_chance);
        }
        if self.max_player_shots == 0 {
            bail!("max_player_shots must be at least 1");
        }
        if self.starting_lives == 0 {
            bail!("starting_lives must be at least 1");
        }
        if self.tick_interval_ms == 0 || self.frame_interval_ms == 0 {
            bail!("tick and frame intervals must be non-zero");
        }
        Ok(())
    }
}
