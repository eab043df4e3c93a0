/// Game entity types. Pure data, no game rules.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

pub type EntityId = u64;

pub const ALIEN_ROWS: usize = 3;
pub const ALIEN_COLS: usize = 9;

// ── Bodies ────────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle with a stable id. `(x, y)` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Body {
    pub fn new(id: EntityId, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { id, x, y, width, height }
    }

    /// Same body displaced by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

// ── Alien grid ────────────────────────────────────────────────────────────────

/// Fixed 3×9 table of aliens. Destroyed aliens leave an empty slot; the
/// grid never grows or shrinks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AlienGrid {
    cells: [[Option<Body>; ALIEN_COLS]; ALIEN_ROWS],
}

impl AlienGrid {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Full grid laid out from the config origin, consuming ids from
    /// `first_id` in row-major order.
    pub fn populated(config: &GameConfig, first_id: EntityId) -> Self {
        let mut grid = Self::empty();
        let mut id = first_id;
        for row in 0..ALIEN_ROWS {
            for col in 0..ALIEN_COLS {
                grid.cells[row][col] = Some(Body::new(
                    id,
                    config.alien_origin_x + config.alien_spacing * col as f64,
                    config.alien_origin_y + config.alien_spacing * row as f64,
                    config.player_width,
                    config.player_height,
                ));
                id += 1;
            }
        }
        grid
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Body> {
        self.cells.get(row)?.get(col)?.as_ref()
    }

    pub fn set(&mut self, row: usize, col: usize, alien: Option<Body>) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = alien;
        }
    }

    /// Empty the slot, returning whatever alien occupied it.
    pub fn remove(&mut self, row: usize, col: usize) -> Option<Body> {
        self.cells.get_mut(row)?.get_mut(col)?.take()
    }

    /// Surviving aliens in row-major order with their `(row, col)` slot.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Body)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(col, cell)| cell.as_ref().map(|alien| (row, col, alien)))
        })
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = Option<&Body>> + '_ {
        self.cells.iter().map(move |row| row.get(col).and_then(Option::as_ref))
    }

    /// Same topology with every surviving alien replaced by `f(alien)`.
    pub fn map(&self, f: impl Fn(&Body) -> Body) -> Self {
        let mut next = self.clone();
        for cell in next.cells.iter_mut().flatten() {
            if let Some(alien) = cell {
                *alien = f(alien);
            }
        }
        next
    }

    pub fn alive_count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

// ── Shields ───────────────────────────────────────────────────────────────────

/// Exact position of an enemy shot a shield has blocked.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HitPoint {
    pub x: f64,
    pub y: f64,
}

impl HitPoint {
    pub fn of(body: &Body) -> Self {
        Self { x: body.x, y: body.y }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shield {
    pub body: Body,
    /// Unique coordinates; membership is exact equality.
    pub absorbed_hits: Vec<HitPoint>,
    /// The shield's reference point lies inside an alien. Recomputed every
    /// tick.
    pub touched: bool,
}

impl Shield {
    pub fn new(body: Body) -> Self {
        Self {
            body,
            absorbed_hits: Vec::new(),
            touched: false,
        }
    }

    pub fn has_absorbed(&self, point: HitPoint) -> bool {
        self.absorbed_hits.contains(&point)
    }

    /// Record a blocked shot. Returns `false` if the coordinate was already
    /// present.
    pub fn absorb(&mut self, point: HitPoint) -> bool {
        if self.has_absorbed(point) {
            return false;
        }
        self.absorbed_hits.push(point);
        true
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lateral {
    Left,
    Right,
}

impl Lateral {
    pub fn sign(self) -> f64 {
        match self {
            Lateral::Left => -1.0,
            Lateral::Right => 1.0,
        }
    }
}

/// One event folded into the snapshot by the reducer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveStart(Lateral),
    MoveStop(Lateral),
    Fire,
    Tick,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Lateral heading of the swarm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Left,
    Right,
}

impl Heading {
    pub fn sign(self) -> f64 {
        match self {
            Heading::Left => -1.0,
            Heading::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }
}

/// The world snapshot. Cloneable so the reducer can return a brand-new
/// value for every event without mutating the one observers hold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub player: Body,
    pub player_shots: Vec<Body>,
    /// Player shots retired this tick; gone from the next snapshot.
    pub expired_player_shots: Vec<Body>,
    pub enemy_shots: Vec<Body>,
    pub expired_enemy_shots: Vec<Body>,
    pub aliens: AlienGrid,
    pub leftmost_alien: Option<Body>,
    pub rightmost_alien: Option<Body>,
    /// Lowest surviving alien per column.
    pub bottom_aliens: [Option<Body>; ALIEN_COLS],
    pub shields: Vec<Shield>,
    pub swarm_heading: Heading,
    /// Set on a drop tick; the next tick steps laterally without checking
    /// the edges.
    pub pending_direction_flip: bool,
    pub next_id: EntityId,
    pub score: u32,
    pub lives: u32,
    pub game_over: bool,
    /// True for exactly one snapshot after the swarm was regenerated.
    pub reset_aliens: bool,
    pub tick_count: u64,
    pub config: GameConfig,
}

impl GameState {
    /// Allocate the next entity id.
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
