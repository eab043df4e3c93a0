/// World construction, player commands and the reducer.
///
/// Functions here borrow a snapshot and hand back a new one. The per-tick
/// work is delegated to `swarm`, `projectiles` and `collision`; the only
/// source of randomness is the `Rng` the caller passes in.

use rand::Rng;

use crate::collision;
use crate::config::GameConfig;
use crate::entities::{AlienGrid, Body, Command, GameState, Heading, Lateral, Shield, ALIEN_COLS};
use crate::projectiles;
use crate::swarm;

// ── Constructors ─────────────────────────────────────────────────────────────

const PLAYER_ID: u64 = 0;

/// Build the initial world: player near the bottom, four shields, a full
/// 3×9 swarm heading right, zero score.
pub fn init_state(config: GameConfig) -> GameState {
    let player = Body::new(
        PLAYER_ID,
        config.player_start_x,
        config.player_start_y,
        config.player_width,
        config.player_height,
    );

    let mut next_id = PLAYER_ID + 1;
    let shields = config
        .shield_xs
        .iter()
        .map(|&x| {
            let body = Body::new(next_id, x, config.shield_y, config.shield_width, config.shield_height);
            next_id += 1;
            Shield::new(body)
        })
        .collect();

    let aliens = AlienGrid::populated(&config, next_id);
    next_id += aliens.alive_count() as u64;

    GameState {
        player,
        player_shots: Vec::new(),
        expired_player_shots: Vec::new(),
        enemy_shots: Vec::new(),
        expired_enemy_shots: Vec::new(),
        aliens,
        leftmost_alien: None,
        rightmost_alien: None,
        bottom_aliens: [None; ALIEN_COLS],
        shields,
        swarm_heading: Heading::Right,
        pending_direction_flip: false,
        next_id,
        score: 0,
        lives: config.starting_lives,
        game_over: false,
        reset_aliens: false,
        tick_count: 0,
        config,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// New player x after a lateral delta. Passing either bound teleports the
/// player to the far side instead of clamping.
pub fn wrapped_x(x: f64, dx: f64, config: &GameConfig) -> f64 {
    let left = config.player_left_bound();
    let right = config.player_right_bound();
    let target = x + dx;
    if target <= left {
        config.canvas_width - (x + config.player_width)
    } else if target >= right {
        left + target - right
    } else {
        target
    }
}

/// Shift the player by `dx` with wrap-around.
pub fn step_player(state: &GameState, dx: f64) -> GameState {
    GameState {
        player: Body {
            x: wrapped_x(state.player.x, dx, &state.config),
            ..state.player
        },
        ..state.clone()
    }
}

pub fn move_player(state: &GameState, direction: Lateral) -> GameState {
    step_player(state, direction.sign() * state.config.player_step)
}

/// Fire a shot from the player, capped at `max_player_shots`.
pub fn player_shoot(state: &GameState) -> GameState {
    projectiles::spawn_player_shot(state)
}

// ── Per-tick advance ────────────────────────────────────────────────────────

/// Advance the simulation by one tick: swarm motion, then shots, then
/// collisions.  All randomness comes through `rng` so callers control
/// determinism.
pub fn tick(state: &GameState, rng: &mut impl Rng) -> GameState {
    let swarmed = swarm::advance(state);
    let shot = projectiles::advance(&swarmed, rng);
    let resolved = collision::resolve(&shot);
    GameState {
        tick_count: state.tick_count + 1,
        ..resolved
    }
}

// ── Reducer ──────────────────────────────────────────────────────────────────

fn apply_command(state: &GameState, command: Command, rng: &mut impl Rng) -> GameState {
    match command {
        Command::MoveStart(direction) => move_player(state, direction),
        Command::MoveStop(_) => step_player(state, 0.0),
        Command::Fire => player_shoot(state),
        Command::Tick => tick(state, rng),
    }
}

/// Fold one command into the snapshot.
///
/// A cleared swarm is noticed before the command is applied; the result
/// then carries a fresh grid and `reset_aliens` set, which the following
/// command clears again. Score and lives carry over. Once `game_over` is
/// set the snapshot is returned unchanged.
pub fn reduce(state: &GameState, command: Command, rng: &mut impl Rng) -> GameState {
    if state.game_over {
        log::debug!("ignoring {:?} after game over", command);
        return state.clone();
    }

    let round_cleared = state.aliens.is_empty();
    let mut next = apply_command(state, command, rng);

    if round_cleared {
        let first_id = next.next_id;
        next.aliens = AlienGrid::populated(&next.config, first_id);
        next.next_id = first_id + next.aliens.alive_count() as u64;
        next.reset_aliens = true;
        log::debug!("swarm cleared, new round (score {})", next.score);
    } else if state.reset_aliens {
        next.reset_aliens = false;
    }
    next
}

/// Fold a command stream, stopping at the first snapshot with `game_over`.
/// `observe` sees every produced snapshot, in order.
pub fn run_commands<I, R, F>(state: &GameState, commands: I, rng: &mut R, mut observe: F) -> GameState
where
    I: IntoIterator<Item = Command>,
    R: Rng,
    F: FnMut(&GameState),
{
    let mut current = state.clone();
    for command in commands {
        if current.game_over {
            break;
        }
        current = reduce(&current, command, rng);
        observe(&current);
    }
    current
}
