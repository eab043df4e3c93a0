/// Collision resolution for one tick.
///
/// Detection runs every pairwise test against the same post-movement
/// snapshot and only records what collided; application then builds the
/// next snapshot from that record in one pass. Nothing detected can affect
/// another test in the same tick, so a shot that overlaps two things is
/// spent once and every overlap it made still counts.

use std::collections::{BTreeMap, BTreeSet};

use crate::entities::{EntityId, GameState, HitPoint};
use crate::geometry::{overlaps, submerged};

/// Everything that collided in one snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionReport {
    /// Grid slots `(row, col)` of aliens hit by player shots.
    pub destroyed_aliens: BTreeSet<(usize, usize)>,
    pub spent_player_shots: BTreeSet<EntityId>,
    pub spent_enemy_shots: BTreeSet<EntityId>,
    /// Number of enemy shots overlapping the player.
    pub player_hits: u32,
    /// New blocked-shot coordinates per shield, merged across all shots.
    pub shield_hits: BTreeMap<EntityId, Vec<HitPoint>>,
    /// Shields whose reference point sits inside an alien: shallow contact.
    pub touched_shields: BTreeSet<EntityId>,
    /// Shields an alien has sunk into; removed for the rest of the round.
    pub sunk_shields: BTreeSet<EntityId>,
}

impl CollisionReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub fn detect(state: &GameState) -> CollisionReport {
    let mut report = CollisionReport::default();

    // ── Aliens ↔ player shots ────────────────────────────────────────────────
    for (row, col, alien) in state.aliens.iter() {
        for shot in &state.player_shots {
            if overlaps(alien, shot) {
                report.destroyed_aliens.insert((row, col));
                report.spent_player_shots.insert(shot.id);
            }
        }
    }

    // ── Player shots ↔ enemy shots ───────────────────────────────────────────
    for shot in &state.player_shots {
        for enemy_shot in &state.enemy_shots {
            if overlaps(shot, enemy_shot) {
                report.spent_player_shots.insert(shot.id);
                report.spent_enemy_shots.insert(enemy_shot.id);
            }
        }
    }

    // ── Enemy shots ↔ player ─────────────────────────────────────────────────
    for enemy_shot in &state.enemy_shots {
        if overlaps(&state.player, enemy_shot) {
            report.player_hits += 1;
            report.spent_enemy_shots.insert(enemy_shot.id);
        }
    }

    for shield in &state.shields {
        // Player fire is blocked on contact.
        for shot in &state.player_shots {
            if overlaps(shot, &shield.body) {
                report.spent_player_shots.insert(shot.id);
            }
        }

        // Enemy fire is blocked unless this exact coordinate was already
        // absorbed by this shield.
        for enemy_shot in &state.enemy_shots {
            let point = HitPoint::of(enemy_shot);
            if overlaps(enemy_shot, &shield.body) && !shield.has_absorbed(point) {
                report.spent_enemy_shots.insert(enemy_shot.id);
                let hits = report.shield_hits.entry(shield.body.id).or_default();
                if !hits.contains(&point) {
                    hits.push(point);
                }
            }
        }

        for (_, _, alien) in state.aliens.iter() {
            if submerged(alien, &shield.body) {
                report.touched_shields.insert(shield.body.id);
            }
            if submerged(&shield.body, alien) {
                report.sunk_shields.insert(shield.body.id);
            }
        }
    }

    report
}

/// Build the next snapshot from a detection report.
pub fn apply(state: &GameState, report: &CollisionReport) -> GameState {
    let config = &state.config;

    let mut aliens = state.aliens.clone();
    for &(row, col) in &report.destroyed_aliens {
        aliens.remove(row, col);
    }

    let player_shots = state
        .player_shots
        .iter()
        .filter(|shot| !report.spent_player_shots.contains(&shot.id))
        .copied()
        .collect();
    let enemy_shots = state
        .enemy_shots
        .iter()
        .filter(|shot| !report.spent_enemy_shots.contains(&shot.id))
        .copied()
        .collect();

    let shields = state
        .shields
        .iter()
        .filter(|shield| !report.sunk_shields.contains(&shield.body.id))
        .map(|shield| {
            let mut shield = shield.clone();
            if let Some(hits) = report.shield_hits.get(&shield.body.id) {
                for &point in hits {
                    shield.absorb(point);
                }
            }
            shield.touched = report.touched_shields.contains(&shield.body.id);
            shield
        })
        .collect();

    let score = state.score + report.destroyed_aliens.len() as u32 * config.score_per_alien;
    let lives = state.lives.saturating_sub(report.player_hits);
    let broke_through = aliens.iter().any(|(_, _, alien)| alien.y > config.canvas_height);
    let game_over = state.game_over || lives == 0 || broke_through;

    if game_over && !state.game_over {
        log::info!(
            "game over at tick {}: score {}, lives {}{}",
            state.tick_count,
            score,
            lives,
            if broke_through { ", swarm broke through" } else { "" }
        );
    }

    GameState {
        aliens,
        player_shots,
        enemy_shots,
        shields,
        score,
        lives,
        game_over,
        ..state.clone()
    }
}

/// Detect and apply in one step.
pub fn resolve(state: &GameState) -> GameState {
    apply(state, &detect(state))
}
