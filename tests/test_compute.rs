use space_invaders::compute::*;
use space_invaders::config::GameConfig;
use space_invaders::entities::*;

use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_state() -> GameState {
    init_state(GameConfig::default())
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// An RNG whose every `gen_bool(p < 1)` comes out false.
fn never_fire() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_layout() {
    let s = make_state();
    assert_eq!((s.player.x, s.player.y), (280.0, 535.0));
    assert_eq!(s.player.id, 0);
    assert_eq!(s.aliens.alive_count(), 27);
    assert_eq!(s.shields.len(), 4);
    let xs: Vec<f64> = s.shields.iter().map(|sh| sh.body.x).collect();
    assert_eq!(xs, vec![50.0, 190.0, 330.0, 470.0]);
    assert_eq!(s.lives, 3);
    assert_eq!(s.score, 0);
    assert!(!s.game_over);
    assert!(!s.reset_aliens);
    assert_eq!(s.swarm_heading, Heading::Right);
}

#[test]
fn init_state_ids_are_unique_and_counter_is_past_them() {
    let s = make_state();
    let mut ids: Vec<EntityId> = vec![s.player.id];
    ids.extend(s.shields.iter().map(|sh| sh.body.id));
    ids.extend(s.aliens.iter().map(|(_, _, a)| a.id));
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), ids.len());
    assert_eq!(s.next_id, 32);
    assert!(ids.iter().all(|&id| id < s.next_id));
}

// ── player movement ───────────────────────────────────────────────────────────

#[test]
fn move_start_steps_player() {
    let s = make_state();
    let left = reduce(&s, Command::MoveStart(Lateral::Left), &mut seeded_rng());
    assert_eq!(left.player.x, 275.0);
    let right = reduce(&s, Command::MoveStart(Lateral::Right), &mut seeded_rng());
    assert_eq!(right.player.x, 285.0);
}

#[test]
fn move_stop_leaves_player_in_place() {
    let s = make_state();
    let s2 = reduce(&s, Command::MoveStop(Lateral::Left), &mut seeded_rng());
    assert_eq!(s2.player, s.player);
}

#[test]
fn moving_left_past_bound_wraps_to_right() {
    let mut s = make_state();
    s.player.x = -38.0; // -38 - 5 <= -40
    let s2 = move_player(&s, Lateral::Left);
    assert_eq!(s2.player.x, 598.0); // 600 - (-38 + 40)
    assert_eq!(s2.player.width, s.player.width);
}

#[test]
fn moving_right_past_bound_wraps_to_left() {
    let mut s = make_state();
    s.player.x = 638.0; // 638 + 5 >= 640
    let s2 = move_player(&s, Lateral::Right);
    assert_eq!(s2.player.x, -37.0); // -40 + 643 - 640
    assert_eq!(s2.player.width, s.player.width);
}

#[test]
fn moving_near_bound_does_not_wrap() {
    let mut s = make_state();
    s.player.x = -30.0;
    assert_eq!(move_player(&s, Lateral::Left).player.x, -35.0);
    s.player.x = 630.0;
    assert_eq!(move_player(&s, Lateral::Right).player.x, 635.0);
}

#[test]
fn move_does_not_mutate_original() {
    let s = make_state();
    let _s2 = move_player(&s, Lateral::Left);
    let _s3 = step_player(&s, 50.0);
    assert_eq!(s.player.x, 280.0);
}

#[test]
fn movement_does_not_advance_the_world() {
    let s = make_state();
    let s2 = reduce(&s, Command::MoveStart(Lateral::Right), &mut seeded_rng());
    assert_eq!(s2.aliens, s.aliens);
    assert_eq!(s2.tick_count, s.tick_count);
    assert_eq!(s2.next_id, s.next_id);
}

// ── player_shoot ──────────────────────────────────────────────────────────────

#[test]
fn fire_spawns_shot_centered_above_player() {
    let s = make_state();
    let s2 = reduce(&s, Command::Fire, &mut seeded_rng());
    assert_eq!(s2.player_shots.len(), 1);
    let shot = s2.player_shots[0];
    assert_eq!(shot.id, s.next_id);
    assert_eq!(shot.x, 299.0); // 280 + 40/2 - 2/2
    assert_eq!(shot.y, 530.0); // 535 - 5
    assert_eq!((shot.width, shot.height), (2.0, 15.0));
    assert_eq!(s2.next_id, s.next_id + 1);
}

#[test]
fn fire_allows_second_shot() {
    let s = player_shoot(&make_state());
    let s2 = player_shoot(&s);
    assert_eq!(s2.player_shots.len(), 2);
    assert_ne!(s2.player_shots[0].id, s2.player_shots[1].id);
}

#[test]
fn fire_with_two_active_is_dropped() {
    let s = player_shoot(&player_shoot(&make_state()));
    let s2 = reduce(&s, Command::Fire, &mut seeded_rng());
    assert_eq!(s2.player_shots, s.player_shots);
    assert_eq!(s2.next_id, s.next_id);
}

#[test]
fn shoot_does_not_mutate_original() {
    let s = make_state();
    let _ = player_shoot(&s);
    assert!(s.player_shots.is_empty());
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_without_collisions_moves_swarm_laterally() {
    let s = make_state();
    let s2 = tick(&s, &mut never_fire());
    assert_eq!(s2.aliens.alive_count(), 27);
    assert_eq!(s2.score, 0);
    assert_eq!(s2.lives, 3);
    assert_eq!(s2.tick_count, 1);
    for (row, col, alien) in s2.aliens.iter() {
        let before = s.aliens.get(row, col).unwrap();
        assert_eq!(alien.x, before.x + 1.0);
        assert_eq!(alien.y, before.y);
    }
}

#[test]
fn tick_records_pre_move_boundaries_and_post_move_bottom_row() {
    let s = make_state();
    let s2 = tick(&s, &mut never_fire());
    assert_eq!(s2.leftmost_alien.unwrap().x, 40.0);
    assert_eq!(s2.rightmost_alien.unwrap().x, 520.0);
    let bottom = s2.bottom_aliens[0].unwrap();
    assert_eq!((bottom.x, bottom.y), (41.0, 160.0));
}

#[test]
fn tick_player_shot_moves_up() {
    let mut s = make_state();
    s.player_shots.push(Body::new(900, 10.0, 300.0, 2.0, 15.0));
    let s2 = tick(&s, &mut never_fire());
    assert_eq!(s2.player_shots.len(), 1);
    assert_eq!(s2.player_shots[0].y, 295.0);
}

#[test]
fn tick_expired_shots_live_for_one_snapshot() {
    let mut s = make_state();
    s.player_shots.push(Body::new(900, 10.0, -16.0, 2.0, 15.0)); // bottom edge at -1
    let s2 = tick(&s, &mut never_fire());
    assert!(s2.player_shots.is_empty());
    assert_eq!(s2.expired_player_shots.len(), 1);
    assert_eq!(s2.expired_player_shots[0].id, 900);
    let s3 = tick(&s2, &mut never_fire());
    assert!(s3.expired_player_shots.is_empty());
}

#[test]
fn tick_is_deterministic_for_a_seed() {
    let mut a = make_state();
    let mut b = make_state();
    let mut rng_a = seeded_rng();
    let mut rng_b = seeded_rng();
    for _ in 0..500 {
        a = reduce(&a, Command::Tick, &mut rng_a);
        b = reduce(&b, Command::Tick, &mut rng_b);
    }
    assert_eq!(a, b);
}

// ── round reset ───────────────────────────────────────────────────────────────

#[test]
fn cleared_swarm_is_regenerated_on_next_event() {
    let mut s = make_state();
    s.aliens = AlienGrid::empty();
    s.score = 270;
    s.lives = 2;

    let s2 = reduce(&s, Command::Fire, &mut seeded_rng());
    assert_eq!(s2.aliens.alive_count(), 27);
    assert!(s2.reset_aliens);
    assert_eq!(s2.score, 270);
    assert_eq!(s2.lives, 2);
    // The shot took the first id, the new swarm the next 27
    assert_eq!(s2.player_shots[0].id, 32);
    assert_eq!(s2.aliens.get(0, 0).unwrap().id, 33);
    assert_eq!(s2.next_id, 60);

    let s3 = reduce(&s2, Command::MoveStop(Lateral::Right), &mut seeded_rng());
    assert!(!s3.reset_aliens);
    assert_eq!(s3.aliens.alive_count(), 27);

    let s4 = reduce(&s3, Command::Tick, &mut never_fire());
    assert!(!s4.reset_aliens);
}

#[test]
fn regenerated_swarm_starts_at_origin() {
    let mut s = make_state();
    s.aliens = AlienGrid::empty();
    let s2 = reduce(&s, Command::Tick, &mut never_fire());
    let fresh = AlienGrid::populated(&s.config, s2.aliens.get(0, 0).unwrap().id);
    assert_eq!(s2.aliens, fresh);
}

// ── game over ─────────────────────────────────────────────────────────────────

#[test]
fn events_after_game_over_are_ignored() {
    let mut s = make_state();
    s.game_over = true;
    for command in [
        Command::Tick,
        Command::Fire,
        Command::MoveStart(Lateral::Left),
        Command::MoveStop(Lateral::Left),
    ] {
        assert_eq!(reduce(&s, command, &mut seeded_rng()), s);
    }
}

#[test]
fn run_commands_stops_at_game_over() {
    let mut s = make_state();
    s.lives = 1;
    // Moves from y=536 to y=541, inside the player.
    s.enemy_shots.push(Body::new(900, 290.0, 536.0, 3.0, 35.0));

    let mut seen = Vec::new();
    let end = run_commands(
        &s,
        [Command::Tick, Command::Tick, Command::Fire],
        &mut seeded_rng(),
        |snapshot| seen.push(snapshot.clone()),
    );
    assert_eq!(seen.len(), 1);
    assert!(end.game_over);
    assert_eq!(end.lives, 0);
    assert_eq!(end, seen[0]);
}

#[test]
fn run_commands_folds_in_order() {
    let s = make_state();
    let commands = [
        Command::MoveStart(Lateral::Left),
        Command::MoveStart(Lateral::Left),
        Command::MoveStop(Lateral::Left),
        Command::Fire,
    ];
    let end = run_commands(&s, commands, &mut seeded_rng(), |_| {});
    assert_eq!(end.player.x, 270.0);
    assert_eq!(end.player_shots.len(), 1);
    assert_eq!(end.player_shots[0].x, 289.0);
}
