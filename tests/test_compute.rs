use std::time::Duration;

use side_scroller::compute::*;
use side_scroller::config::Tuning;
use side_scroller::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: Duration = Duration::from_millis(16);

/// Player standing at x=100 with nothing in the world and both frontiers
/// far enough away that ticking never generates content.
fn make_state() -> GameState {
    GameState {
        player: Player { x: 100.0, y: 300.0, vy: 0.0, airborne: false },
        collectibles: Vec::new(),
        enemies: Vec::new(),
        session: Session { health: 3, score: 0, status: GameStatus::Playing },
        frontier: Frontier { collectible_x: 100_000.0, enemy_x: 100_000.0, next_id: 0 },
        tuning: Tuning::default(),
        frame: 0,
        elapsed: Duration::ZERO,
        last_dt: Duration::ZERO,
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn enemy_at(id: u64, x: f32, y: f32) -> Enemy {
    Enemy { id, x, y, facing: Facing::Right, patrol_range: 100.0, origin_x: x }
}

fn coin_at(id: u64, x: f32, y: f32) -> Collectible {
    Collectible { id, x, y, collected: false }
}

const RIGHT: InputState = InputState { left: false, right: true, jump: false };
const LEFT: InputState = InputState { left: true, right: false, jump: false };
const JUMP: InputState = InputState { left: false, right: false, jump: true };
const IDLE: InputState = InputState { left: false, right: false, jump: false };

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_on_ground_at_left_edge() {
    let s = init_state(Tuning::default(), &mut seeded_rng());
    assert_eq!(s.player.x, 25.0);
    assert_eq!(s.player.y, 300.0);
    assert_eq!(s.player.vy, 0.0);
    assert!(!s.player.airborne);
}

#[test]
fn init_state_session_and_initial_batches() {
    let s = init_state(Tuning::default(), &mut seeded_rng());
    assert_eq!(s.session.health, 3);
    assert_eq!(s.session.score, 0);
    assert_eq!(s.session.status, GameStatus::Playing);
    assert_eq!(s.collectibles.len(), 20);
    assert_eq!(s.enemies.len(), 10);
    assert_eq!(s.frame, 0);
}

#[test]
fn initial_collectible_frontier_is_last_coin() {
    let s = init_state(Tuning::default(), &mut seeded_rng());
    let last = s.collectibles.last().unwrap();
    assert_eq!(s.frontier.collectible_x, last.x);
    assert!(last.x >= 200.0 + 20.0 * 100.0);
    assert!(last.x <= 200.0 + 20.0 * 300.0);
}

#[test]
fn initial_enemy_frontier_is_last_enemy() {
    let s = init_state(Tuning::default(), &mut seeded_rng());
    let last = s.enemies.last().unwrap();
    assert_eq!(s.frontier.enemy_x, last.x);
    assert!(last.x >= 400.0 + 10.0 * 200.0);
    assert!(last.x <= 400.0 + 10.0 * 500.0);
}

#[test]
fn generated_content_respects_spawn_ranges() {
    let s = init_state(Tuning::default(), &mut seeded_rng());

    let mut prev = 200.0;
    for c in &s.collectibles {
        let gap = c.x - prev;
        assert!((100.0..300.0).contains(&gap), "coin gap {gap}");
        assert!((50.0..250.0).contains(&c.y), "coin y {}", c.y);
        assert!(!c.collected);
        prev = c.x;
    }

    let mut prev = 400.0;
    for e in &s.enemies {
        let gap = e.x - prev;
        assert!((200.0..500.0).contains(&gap), "enemy gap {gap}");
        assert_eq!(e.y, 300.0);
        assert_eq!(e.origin_x, e.x);
        assert!((50.0..150.0).contains(&e.patrol_range));
        prev = e.x;
    }
}

#[test]
fn generated_ids_are_unique() {
    let s = init_state(Tuning::default(), &mut seeded_rng());
    let mut ids: Vec<u64> = s
        .collectibles
        .iter()
        .map(|c| c.id)
        .chain(s.enemies.iter().map(|e| e.id))
        .collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 30);
}

#[test]
fn same_seed_same_world() {
    let a = init_state(Tuning::default(), &mut seeded_rng());
    let b = init_state(Tuning::default(), &mut seeded_rng());
    assert_eq!(a.collectibles, b.collectibles);
    assert_eq!(a.enemies, b.enemies);
}

// ── Horizontal movement ───────────────────────────────────────────────────────

#[test]
fn move_right_and_left() {
    let s = make_state();
    let physics = &s.tuning.physics;
    assert_eq!(move_horizontal(&s.player, &RIGHT, physics).x, 105.0);
    assert_eq!(move_horizontal(&s.player, &LEFT, physics).x, 95.0);
}

#[test]
fn both_directions_cancel() {
    let s = make_state();
    let both = InputState { left: true, right: true, jump: false };
    assert_eq!(move_horizontal(&s.player, &both, &s.tuning.physics).x, 100.0);
}

#[test]
fn move_clamps_at_left_bound() {
    let mut s = make_state();
    s.player.x = 27.0;
    assert_eq!(move_horizontal(&s.player, &LEFT, &s.tuning.physics).x, 25.0);
}

#[test]
fn move_clamps_at_right_bound() {
    let mut s = make_state();
    s.player.x = 9_923.0;
    assert_eq!(move_horizontal(&s.player, &RIGHT, &s.tuning.physics).x, 9_925.0);
}

#[test]
fn move_does_not_mutate_original() {
    let s = make_state();
    let _moved = move_horizontal(&s.player, &RIGHT, &s.tuning.physics);
    assert_eq!(s.player.x, 100.0);
}

#[test]
fn hundred_frames_right_scenario() {
    let mut s = make_state();
    s.player.x = 25.0;
    let mut rng = seeded_rng();
    for _ in 0..100 {
        s = tick(&s, &RIGHT, DT, &mut rng);
        assert_eq!(s.player.y, 300.0);
    }
    assert_eq!(s.player.x, 525.0);
    assert_eq!(s.frame, 100);
}

// ── Jumping & gravity ─────────────────────────────────────────────────────────

#[test]
fn jump_sets_exact_impulse() {
    let s = make_state();
    let p = apply_jump(&s.player, &JUMP, &s.tuning.physics);
    assert_eq!(p.vy, -15.0);
    assert!(p.airborne);
}

#[test]
fn jump_ignored_while_airborne() {
    let mut s = make_state();
    s.player.airborne = true;
    s.player.vy = -3.0;
    let p = apply_jump(&s.player, &JUMP, &s.tuning.physics);
    assert_eq!(p.vy, -3.0);
}

#[test]
fn jump_tick_applies_gravity_after_impulse() {
    let s = make_state();
    let s2 = tick(&s, &JUMP, DT, &mut seeded_rng());
    assert_eq!(s2.player.vy, -14.5);
    assert_eq!(s2.player.y, 285.5);
    assert!(s2.player.airborne);
}

#[test]
fn gravity_adds_half_unit_per_frame() {
    let mut s = make_state();
    s.player.y = 100.0;
    s.player.airborne = true;
    let mut rng = seeded_rng();
    for k in 1..=5 {
        s = tick(&s, &IDLE, DT, &mut rng);
        assert_eq!(s.player.vy, 0.5 * k as f32);
    }
    assert_eq!(s.player.y, 100.0 + 0.5 + 1.0 + 1.5 + 2.0 + 2.5);
}

#[test]
fn floor_contact_clamps_and_lands() {
    let mut s = make_state();
    s.player.y = 299.8;
    s.player.vy = 1.0;
    s.player.airborne = true;
    let p = update_player(&s.player, &IDLE, &s.tuning.physics);
    assert_eq!(p.y, 300.0);
    assert_eq!(p.vy, 0.0);
    assert!(!p.airborne);
}

#[test]
fn ceiling_contact_stops_rise_but_stays_airborne() {
    let mut s = make_state();
    s.player.y = 51.0;
    s.player.vy = -5.0;
    s.player.airborne = true;
    let p = update_player(&s.player, &IDLE, &s.tuning.physics);
    assert_eq!(p.y, 50.0);
    assert_eq!(p.vy, 0.0);
    assert!(p.airborne);
}

#[test]
fn full_jump_returns_to_ground() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s = tick(&s, &JUMP, DT, &mut rng);
    let mut min_y = s.player.y;
    for _ in 0..200 {
        s = tick(&s, &IDLE, DT, &mut rng);
        min_y = min_y.min(s.player.y);
        if !s.player.airborne {
            break;
        }
    }
    assert!(!s.player.airborne);
    assert_eq!(s.player.y, 300.0);
    assert!(min_y < 100.0 && min_y >= 50.0, "apex {min_y}");
}

// ── Enemy patrol ──────────────────────────────────────────────────────────────

#[test]
fn enemy_advances_in_facing_direction() {
    let e = enemy_at(0, 1_000.0, 300.0);
    assert_eq!(update_enemy(&e, 1.5).x, 1_001.5);
    let e = Enemy { facing: Facing::Left, ..e };
    assert_eq!(update_enemy(&e, 1.5).x, 998.5);
}

#[test]
fn enemy_overshoots_then_turns_on_same_tick() {
    let e = Enemy { patrol_range: 3.0, ..enemy_at(0, 1_000.0, 300.0) };
    let e = update_enemy(&e, 1.5); // 1001.5
    let e = update_enemy(&e, 1.5); // 1003.0, exactly at range
    assert_eq!(e.facing, Facing::Right);
    let e = update_enemy(&e, 1.5); // 1004.5, past range
    assert_eq!(e.x, 1_004.5);
    assert_eq!(e.facing, Facing::Left);
    let e = update_enemy(&e, 1.5); // back inside
    assert_eq!(e.x, 1_003.0);
    assert_eq!(e.facing, Facing::Left);
}

#[test]
fn enemy_patrol_stays_near_range() {
    let mut e = Enemy { patrol_range: 57.0, ..enemy_at(0, 2_000.0, 300.0) };
    let mut turns = 0;
    for _ in 0..1_000 {
        let next = update_enemy(&e, 1.5);
        if next.facing != e.facing {
            turns += 1;
        }
        assert!((next.x - next.origin_x).abs() <= next.patrol_range + 1.5);
        if (next.x - next.origin_x).abs() > next.patrol_range {
            assert_ne!(next.facing, e.facing);
        }
        e = next;
    }
    assert!(turns > 5);
}

// ── Generation ────────────────────────────────────────────────────────────────

#[test]
fn tick_generates_when_frontier_is_near() {
    let mut s = make_state();
    s.frontier.collectible_x = 1_099.0;
    s.frontier.enemy_x = 1_099.0;
    let s2 = tick(&s, &IDLE, DT, &mut seeded_rng());
    assert_eq!(s2.collectibles.len(), 5);
    assert_eq!(s2.enemies.len(), 3);
    assert!(s2.frontier.collectible_x > 1_099.0);
}

#[test]
fn tick_does_not_generate_at_exact_lookahead() {
    let mut s = make_state();
    s.frontier.collectible_x = 1_100.0;
    s.frontier.enemy_x = 1_100.0;
    let s2 = tick(&s, &IDLE, DT, &mut seeded_rng());
    assert!(s2.collectibles.is_empty());
    assert!(s2.enemies.is_empty());
}

#[test]
fn generation_only_appends() {
    let s = init_state(Tuning::default(), &mut seeded_rng());
    let s2 = generate_collectibles(&s, 5, &mut seeded_rng());
    assert_eq!(s2.collectibles.len(), 25);
    assert_eq!(&s2.collectibles[..20], &s.collectibles[..]);
    assert_eq!(s2.frontier.collectible_x, s2.collectibles[24].x);
}

// ── Pickups ───────────────────────────────────────────────────────────────────

#[test]
fn pickup_within_radius_scores_once() {
    let mut s = make_state();
    s.collectibles.push(coin_at(0, 129.0, 271.0));
    let s2 = collect_pickups(&s);
    assert!(s2.collectibles[0].collected);
    assert_eq!(s2.session.score, 10);

    let s3 = collect_pickups(&s2);
    assert_eq!(s3.session.score, 10);
    assert_eq!(s3.visible_collectibles().count(), 0);
    assert_eq!(s3.collectibles.len(), 1);
}

#[test]
fn pickup_radius_is_exclusive() {
    let mut s = make_state();
    s.collectibles.push(coin_at(0, 130.0, 300.0));
    s.collectibles.push(coin_at(1, 100.0, 270.0));
    let s2 = collect_pickups(&s);
    assert!(s2.collectibles.iter().all(|c| !c.collected));
    assert_eq!(s2.session.score, 0);
}

#[test]
fn several_coins_in_one_frame() {
    let mut s = make_state();
    s.collectibles.push(coin_at(0, 110.0, 300.0));
    s.collectibles.push(coin_at(1, 90.0, 290.0));
    s.collectibles.push(coin_at(2, 500.0, 300.0));
    let s2 = collect_pickups(&s);
    assert_eq!(s2.session.score, 20);
    assert!(!s2.collectibles[2].collected);
}

#[test]
fn tick_collects_after_moving() {
    let mut s = make_state();
    s.collectibles.push(coin_at(0, 134.0, 300.0)); // out of reach until we step right
    let s2 = tick(&s, &RIGHT, DT, &mut seeded_rng());
    assert!(s2.collectibles[0].collected);
    assert_eq!(s2.session.score, 10);
}

// ── Enemy contact ─────────────────────────────────────────────────────────────

#[test]
fn hit_costs_health_and_knocks_back() {
    let mut s = make_state();
    s.enemies.push(enemy_at(0, 130.0, 300.0));
    let s2 = resolve_enemy_contacts(&s);
    assert_eq!(s2.session.health, 2);
    assert_eq!(s2.player.x, 40.0);
    assert_eq!(s2.player.vy, -7.5);
    assert_eq!(s2.session.status, GameStatus::Playing);
}

#[test]
fn contact_radius_is_exclusive() {
    let mut s = make_state();
    s.enemies.push(enemy_at(0, 140.0, 300.0));
    let s2 = resolve_enemy_contacts(&s);
    assert_eq!(s2.session.health, 3);
    assert_eq!(s2.player.x, 100.0);
}

#[test]
fn knockback_is_clamped_to_world() {
    let mut s = make_state();
    s.player.x = 40.0;
    s.enemies.push(enemy_at(0, 40.0, 300.0));
    let s2 = resolve_enemy_contacts(&s);
    assert_eq!(s2.player.x, 25.0);
}

#[test]
fn three_contacts_end_the_session() {
    let mut s = make_state();
    s.enemies.push(enemy_at(0, 100.0, 300.0));
    let expected = [(2, GameStatus::Playing), (1, GameStatus::Playing), (0, GameStatus::GameOver)];
    for (health, status) in expected {
        // Keep the enemy on top of the player despite knockback
        s.enemies[0].x = s.player.x;
        s = resolve_enemy_contacts(&s);
        assert_eq!(s.session.health, health);
        assert_eq!(s.session.status, status);
    }
}

#[test]
fn overlapping_enemies_each_deal_a_hit() {
    let mut s = make_state();
    s.enemies.push(enemy_at(0, 100.0, 300.0));
    s.enemies.push(enemy_at(1, 110.0, 290.0));
    let s2 = resolve_enemy_contacts(&s);
    assert_eq!(s2.session.health, 1);
    assert_eq!(s2.player.x, 25.0); // 100 - 2 × 60, clamped
}

#[test]
fn extra_hits_after_game_over_are_ignored() {
    let mut s = make_state();
    for id in 0..5 {
        s.enemies.push(enemy_at(id, 100.0, 300.0));
    }
    let s2 = resolve_enemy_contacts(&s);
    assert_eq!(s2.session.health, 0);
    assert_eq!(s2.session.status, GameStatus::GameOver);
}

#[test]
fn airborne_player_clears_ground_enemy() {
    let mut s = make_state();
    s.player.y = 250.0;
    s.enemies.push(enemy_at(0, 100.0, 300.0));
    let s2 = resolve_enemy_contacts(&s);
    assert_eq!(s2.session.health, 3);
}

// ── Tick bookkeeping ──────────────────────────────────────────────────────────

#[test]
fn tick_records_time_without_scaling_movement() {
    let s = make_state();
    let fast = tick(&s, &RIGHT, Duration::from_millis(5), &mut seeded_rng());
    let slow = tick(&s, &RIGHT, Duration::from_millis(100), &mut seeded_rng());
    assert_eq!(fast.player.x, slow.player.x);
    assert_eq!(slow.last_dt, Duration::from_millis(100));

    let slow2 = tick(&slow, &IDLE, Duration::from_millis(20), &mut seeded_rng());
    assert_eq!(slow2.elapsed, Duration::from_millis(120));
    assert_eq!(slow2.frame, 2);
}

#[test]
fn game_over_freezes_state() {
    let mut s = make_state();
    s.session = Session { health: 0, score: 40, status: GameStatus::GameOver };
    s.enemies.push(enemy_at(0, 600.0, 300.0));
    s.frontier.collectible_x = 0.0;
    let s2 = tick(&s, &JUMP, DT, &mut seeded_rng());
    assert_eq!(s2.player, s.player);
    assert_eq!(s2.enemies, s.enemies);
    assert!(s2.collectibles.is_empty());
    assert_eq!(s2.frame, 0);
    assert_eq!(s2.session, s.session);
}

#[test]
fn tick_does_not_mutate_original() {
    let s = make_state();
    let _s2 = tick(&s, &RIGHT, DT, &mut seeded_rng());
    assert_eq!(s.player.x, 100.0);
    assert_eq!(s.frame, 0);
}
