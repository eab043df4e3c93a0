/// Shot lifecycle: spawn, advance, expire.
///
/// Player shots travel up, enemy shots travel down, both by `shot_step` per
/// tick. Expiry is judged on the position a shot had before it moves; an
/// expired shot leaves the active list at once and sits in the expired list
/// for one snapshot so the renderer can drop its visual.

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Body, GameState};

/// Gap between a fresh player shot and the player's top edge.
const PLAYER_SHOT_LIFT: f64 = 5.0;

/// Split into (advanced active, expired) player shots.
pub fn advance_player_shots(shots: &[Body], config: &GameConfig) -> (Vec<Body>, Vec<Body>) {
    let (expired, active): (Vec<Body>, Vec<Body>) =
        shots.iter().partition(|shot| shot.bottom() < 0.0);
    let active = active
        .iter()
        .map(|shot| shot.translated(0.0, -config.shot_step))
        .collect();
    (active, expired)
}

/// Split into (advanced active, expired) enemy shots.
pub fn advance_enemy_shots(shots: &[Body], config: &GameConfig) -> (Vec<Body>, Vec<Body>) {
    let (expired, active): (Vec<Body>, Vec<Body>) =
        shots.iter().partition(|shot| shot.y > config.canvas_height);
    let active = active
        .iter()
        .map(|shot| shot.translated(0.0, config.shot_step))
        .collect();
    (active, expired)
}

/// Fire from the player if fewer than `max_player_shots` are active.
/// Otherwise the request is dropped and no id is consumed.
pub fn spawn_player_shot(state: &GameState) -> GameState {
    let config = &state.config;
    if state.player_shots.len() >= config.max_player_shots {
        return state.clone();
    }
    let mut next = state.clone();
    let id = next.next_entity_id();
    let shot = Body::new(
        id,
        state.player.center_x() - config.player_shot_width / 2.0,
        state.player.y - PLAYER_SHOT_LIFT,
        config.player_shot_width,
        config.player_shot_height,
    );
    log::trace!("player shot {} at ({}, {})", shot.id, shot.x, shot.y);
    next.player_shots.push(shot);
    next
}

/// The bottom-row alien horizontally closest to `player_x`. Ties go to the
/// first candidate in scan order.
pub fn closest_shooter(bottoms: &[Option<Body>], player_x: f64) -> Option<Body> {
    bottoms
        .iter()
        .flatten()
        .fold(None, |best: Option<Body>, alien| match best {
            Some(current) if (current.x - player_x).abs() <= (alien.x - player_x).abs() => {
                Some(current)
            }
            _ => Some(*alien),
        })
}

/// Maybe spawn an enemy shot. Only rolls the dice when no enemy shot was
/// active at the start of the tick; consumes an id only on success.
///
/// `was_idle` reports whether the enemy shot list was empty before this
/// tick's expiry pass, and `state` must already carry the moved swarm.
pub fn maybe_spawn_enemy_shot(
    state: &GameState,
    was_idle: bool,
    rng: &mut impl Rng,
) -> GameState {
    let config = &state.config;
    if !was_idle || !rng.gen_bool(config.enemy_fire_chance) {
        return state.clone();
    }
    let Some(shooter) = closest_shooter(&state.bottom_aliens, state.player.x) else {
        return state.clone();
    };
    let mut next = state.clone();
    let id = next.next_entity_id();
    let shot = Body::new(
        id,
        shooter.center_x() - config.enemy_shot_width / 2.0,
        shooter.bottom(),
        config.enemy_shot_width,
        config.enemy_shot_height,
    );
    log::trace!("alien {} fired shot {}", shooter.id, shot.id);
    next.enemy_shots.push(shot);
    next
}

/// Advance both shot lists, then let the swarm fire.
pub fn advance(state: &GameState, rng: &mut impl Rng) -> GameState {
    let (player_shots, expired_player_shots) =
        advance_player_shots(&state.player_shots, &state.config);
    let (enemy_shots, expired_enemy_shots) =
        advance_enemy_shots(&state.enemy_shots, &state.config);
    let was_idle = state.enemy_shots.is_empty();

    let moved = GameState {
        player_shots,
        expired_player_shots,
        enemy_shots,
        expired_enemy_shots,
        ..state.clone()
    };
    maybe_spawn_enemy_shot(&moved, was_idle, rng)
}
