/// Enemy swarm motion policy.
///
/// Every tick the whole swarm moves by one shared vector. Normally that is a
/// lateral step in the current heading. When a boundary alien reaches a
/// screen edge the swarm drops instead and the heading reverses; the tick
/// after a drop always takes one lateral step in the reversed heading
/// without looking at the edges, which carries the swarm back inside.

use crate::config::GameConfig;
use crate::entities::{AlienGrid, Body, GameState, Heading, ALIEN_COLS};

/// Which boundary alien to look for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extreme {
    Leftmost,
    Rightmost,
}

impl Extreme {
    /// Whether `candidate` is strictly further toward this extreme than
    /// `current`.
    fn beats(self, candidate: f64, current: f64) -> bool {
        match self {
            Extreme::Leftmost => candidate < current,
            Extreme::Rightmost => candidate > current,
        }
    }
}

/// Leftmost or rightmost surviving alien by x. Ties keep the first found in
/// row-major order.
pub fn boundary_alien(grid: &AlienGrid, extreme: Extreme) -> Option<Body> {
    grid.iter().fold(None, |best: Option<Body>, (_, _, alien)| match best {
        Some(current) if !extreme.beats(alien.x, current.x) => Some(current),
        _ => Some(*alien),
    })
}

/// Lowest surviving alien in every column, `None` for a cleared column.
pub fn bottom_aliens(grid: &AlienGrid) -> [Option<Body>; ALIEN_COLS] {
    let mut bottoms = [None; ALIEN_COLS];
    for (col, slot) in bottoms.iter_mut().enumerate() {
        *slot = grid.column(col).flatten().last().copied();
    }
    bottoms
}

/// Outcome of the motion policy for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwarmStep {
    pub dx: f64,
    pub dy: f64,
    /// Heading stored for the next tick.
    pub heading: Heading,
    pub pending_direction_flip: bool,
}

fn at_edge(leftmost: Option<&Body>, rightmost: Option<&Body>, config: &GameConfig) -> bool {
    match (leftmost, rightmost) {
        (Some(left), Some(right)) => left.x <= 0.0 || right.x >= config.swarm_right_bound,
        _ => false,
    }
}

/// Decide this tick's move vector from the pre-move boundary aliens.
pub fn plan_step(
    leftmost: Option<&Body>,
    rightmost: Option<&Body>,
    heading: Heading,
    pending_direction_flip: bool,
    config: &GameConfig,
) -> SwarmStep {
    if !pending_direction_flip && at_edge(leftmost, rightmost, config) {
        return SwarmStep {
            dx: 0.0,
            dy: config.swarm_drop,
            heading: heading.reversed(),
            pending_direction_flip: true,
        };
    }
    SwarmStep {
        dx: heading.sign(),
        dy: 0.0,
        heading,
        pending_direction_flip: false,
    }
}

/// Recompute boundaries, move every surviving alien, and recompute the
/// bottom row from the moved grid.
pub fn advance(state: &GameState) -> GameState {
    let leftmost = boundary_alien(&state.aliens, Extreme::Leftmost);
    let rightmost = boundary_alien(&state.aliens, Extreme::Rightmost);
    let step = plan_step(
        leftmost.as_ref(),
        rightmost.as_ref(),
        state.swarm_heading,
        state.pending_direction_flip,
        &state.config,
    );
    if step.pending_direction_flip {
        log::debug!(
            "swarm drop at tick {}, heading now {:?}",
            state.tick_count,
            step.heading
        );
    }

    let aliens = state.aliens.map(|alien| alien.translated(step.dx, step.dy));
    let bottom_aliens = bottom_aliens(&aliens);

    GameState {
        aliens,
        leftmost_alien: leftmost,
        rightmost_alien: rightmost,
        bottom_aliens,
        swarm_heading: step.heading,
        pending_direction_flip: step.pending_direction_flip,
        ..state.clone()
    }
}
