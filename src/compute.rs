/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// value.  Side effects are limited to the injected RNG and log output.

use std::time::Duration;

use rand::Rng;

use crate::config::{Combat, Physics, Tuning};
use crate::entities::{
    Collectible, Enemy, Facing, Frontier, GameState, GameStatus, InputState, Player, Session,
};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh session: player standing at the left edge, initial
/// batches of coins and enemies already laid out.
pub fn init_state(tuning: Tuning, rng: &mut impl Rng) -> GameState {
    let physics = &tuning.physics;
    let state = GameState {
        player: Player {
            x: physics.clamp_x(0.0),
            y: physics.ground_y(),
            vy: 0.0,
            airborne: false,
        },
        collectibles: Vec::new(),
        enemies: Vec::new(),
        session: Session {
            health: tuning.combat.max_health,
            score: 0,
            status: GameStatus::Playing,
        },
        frontier: Frontier {
            collectible_x: tuning.spawn.collectible_start_x,
            enemy_x: tuning.spawn.enemy_start_x,
            next_id: 0,
        },
        tuning,
        frame: 0,
        elapsed: Duration::ZERO,
        last_dt: Duration::ZERO,
    };

    let state = generate_collectibles(&state, tuning.spawn.initial_collectibles, rng);
    let state = generate_enemies(&state, tuning.spawn.initial_enemies, rng);
    log::info!(
        "New session: {} coins, {} enemies, health {}",
        state.collectibles.len(),
        state.enemies.len(),
        state.session.health
    );
    state
}

// ── Player kinematics ────────────────────────────────────────────────────────

/// Apply held left/right keys and clamp to the world's horizontal bounds.
pub fn move_horizontal(player: &Player, input: &InputState, physics: &Physics) -> Player {
    let mut x = player.x;
    if input.right {
        x += physics.player_speed;
    }
    if input.left {
        x -= physics.player_speed;
    }
    Player {
        x: physics.clamp_x(x),
        ..player.clone()
    }
}

/// Start a jump if one is requested and the player is on the ground.
pub fn apply_jump(player: &Player, input: &InputState, physics: &Physics) -> Player {
    if input.jump && !player.airborne {
        Player {
            vy: -physics.jump_force,
            airborne: true,
            ..player.clone()
        }
    } else {
        player.clone()
    }
}

/// Accelerate by gravity, then integrate y.
pub fn apply_gravity(player: &Player, physics: &Physics) -> Player {
    let vy = player.vy + physics.gravity;
    Player {
        y: player.y + vy,
        vy,
        ..player.clone()
    }
}

/// Stop the player at the floor or the ceiling.  Only the floor ends a jump.
pub fn clamp_vertical(player: &Player, physics: &Physics) -> Player {
    let ground = physics.ground_y();
    if player.y >= ground {
        Player {
            y: ground,
            vy: 0.0,
            airborne: false,
            ..player.clone()
        }
    } else if player.y <= physics.ceiling_y {
        Player {
            y: physics.ceiling_y,
            vy: 0.0,
            ..player.clone()
        }
    } else {
        player.clone()
    }
}

pub fn update_player(player: &Player, input: &InputState, physics: &Physics) -> Player {
    let player = move_horizontal(player, input, physics);
    let player = apply_jump(&player, input, physics);
    let player = apply_gravity(&player, physics);
    clamp_vertical(&player, physics)
}

// ── Enemies ──────────────────────────────────────────────────────────────────

/// Step one enemy along its patrol.  The enemy may end up past its range by
/// less than one step; it turns around on that same tick.  Turning
/// instead of stepping would keep it strictly inside its range.
pub fn update_enemy(enemy: &Enemy, speed: f32) -> Enemy {
    let x = enemy.x + enemy.facing.sign() * speed;
    let facing = if (x - enemy.origin_x).abs() > enemy.patrol_range {
        enemy.facing.flipped()
    } else {
        enemy.facing
    };
    Enemy {
        x,
        facing,
        ..enemy.clone()
    }
}

pub fn update_enemies(enemies: &[Enemy], speed: f32) -> Vec<Enemy> {
    enemies.iter().map(|e| update_enemy(e, speed)).collect()
}

// ── Procedural generation ────────────────────────────────────────────────────

/// Append `count` coins past the collectible frontier.
pub fn generate_collectibles(state: &GameState, count: usize, rng: &mut impl Rng) -> GameState {
    let physics = &state.tuning.physics;
    let spawn = &state.tuning.spawn;
    let mut frontier = state.frontier.clone();
    let mut collectibles = state.collectibles.clone();
    collectibles.reserve(count);

    let top = physics.ceiling_y;
    let bottom = physics.floor_y - spawn.collectible_floor_clearance;
    for _ in 0..count {
        frontier.collectible_x +=
            rng.gen_range(spawn.collectible_gap_min..spawn.collectible_gap_max);
        collectibles.push(Collectible {
            id: frontier.next_id,
            x: frontier.collectible_x,
            y: rng.gen_range(top..bottom),
            collected: false,
        });
        frontier.next_id += 1;
    }
    log::debug!(
        "Generated {} coins, frontier now {:.0}",
        count,
        frontier.collectible_x
    );

    GameState {
        collectibles,
        frontier,
        ..state.clone()
    }
}

/// Append `count` patrolling enemies past the enemy frontier.
pub fn generate_enemies(state: &GameState, count: usize, rng: &mut impl Rng) -> GameState {
    let physics = &state.tuning.physics;
    let spawn = &state.tuning.spawn;
    let mut frontier = state.frontier.clone();
    let mut enemies = state.enemies.clone();
    enemies.reserve(count);

    for _ in 0..count {
        frontier.enemy_x += rng.gen_range(spawn.enemy_gap_min..spawn.enemy_gap_max);
        let facing = if rng.gen_bool(0.5) {
            Facing::Right
        } else {
            Facing::Left
        };
        enemies.push(Enemy {
            id: frontier.next_id,
            x: frontier.enemy_x,
            y: physics.ground_y(),
            facing,
            patrol_range: rng.gen_range(spawn.patrol_range_min..spawn.patrol_range_max),
            origin_x: frontier.enemy_x,
        });
        frontier.next_id += 1;
    }
    log::debug!(
        "Generated {} enemies, frontier now {:.0}",
        count,
        frontier.enemy_x
    );

    GameState {
        enemies,
        frontier,
        ..state.clone()
    }
}

/// Top up whichever frontier the player has come within `lookahead` of.
pub fn extend_world(state: &GameState, rng: &mut impl Rng) -> GameState {
    let spawn = state.tuning.spawn;
    let x = state.player.x;

    let state = if x > state.frontier.collectible_x - spawn.lookahead {
        generate_collectibles(state, spawn.collectible_batch, rng)
    } else {
        state.clone()
    };
    if x > state.frontier.enemy_x - spawn.lookahead {
        generate_enemies(&state, spawn.enemy_batch, rng)
    } else {
        state
    }
}

// ── Collisions ───────────────────────────────────────────────────────────────

/// Axis-aligned proximity test: strictly closer than `radius` on both axes.
pub fn within(ax: f32, ay: f32, bx: f32, by: f32, radius: f32) -> bool {
    (ax - bx).abs() < radius && (ay - by).abs() < radius
}

/// Collect every uncollected coin the player overlaps.
pub fn collect_pickups(state: &GameState) -> GameState {
    let combat = &state.tuning.combat;
    let p = &state.player;
    let mut gained = 0;

    let collectibles: Vec<Collectible> = state
        .collectibles
        .iter()
        .map(|c| {
            if !c.collected && within(p.x, p.y, c.x, c.y, combat.pickup_radius) {
                gained += combat.coin_value;
                log::debug!("Picked up coin {} at ({:.0}, {:.0})", c.id, c.x, c.y);
                Collectible {
                    collected: true,
                    ..c.clone()
                }
            } else {
                c.clone()
            }
        })
        .collect();

    GameState {
        collectibles,
        session: Session {
            score: state.session.score + gained,
            ..state.session.clone()
        },
        ..state.clone()
    }
}

/// Take one hit: lose a heart (ending the session on the last one) and get
/// knocked back.
pub fn apply_hit(
    player: &Player,
    session: &Session,
    physics: &Physics,
    combat: &Combat,
) -> (Player, Session) {
    let session = if session.health > 1 {
        Session {
            health: session.health - 1,
            ..session.clone()
        }
    } else {
        Session {
            health: 0,
            status: GameStatus::GameOver,
            ..session.clone()
        }
    };
    let player = Player {
        x: physics.clamp_x(player.x - combat.knockback),
        vy: -physics.jump_force / 2.0,
        ..player.clone()
    };
    (player, session)
}

/// Every enemy touching the player deals a separate hit; there is no
/// invulnerability window.  Contact is measured before any knockback.
pub fn resolve_enemy_contacts(state: &GameState) -> GameState {
    let physics = &state.tuning.physics;
    let combat = &state.tuning.combat;
    let p = &state.player;

    let hits = state
        .enemies
        .iter()
        .filter(|e| within(p.x, p.y, e.x, e.y, combat.hit_radius))
        .count();
    if hits == 0 {
        return state.clone();
    }

    let mut player = state.player.clone();
    let mut session = state.session.clone();
    for _ in 0..hits {
        if session.status == GameStatus::GameOver {
            break;
        }
        (player, session) = apply_hit(&player, &session, physics, combat);
        log::info!(
            "Hit at x={:.0}, health now {}",
            state.player.x,
            session.health
        );
    }
    if session.status == GameStatus::GameOver {
        log::info!("Game over, final score {}", session.score);
    }

    GameState {
        player,
        session,
        ..state.clone()
    }
}

// ── Per-frame tick (nearly pure, RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// A finished session is returned untouched.  `dt` is recorded but movement
/// is applied per frame.
pub fn tick(state: &GameState, input: &InputState, dt: Duration, rng: &mut impl Rng) -> GameState {
    if state.is_over() {
        return state.clone();
    }
    let tuning = &state.tuning;

    let player = update_player(&state.player, input, &tuning.physics);
    let enemies = update_enemies(&state.enemies, tuning.physics.enemy_speed);
    let moved = GameState {
        player,
        enemies,
        frame: state.frame + 1,
        elapsed: state.elapsed + dt,
        last_dt: dt,
        ..state.clone()
    };

    let extended = extend_world(&moved, rng);
    let collected = collect_pickups(&extended);
    resolve_enemy_contacts(&collected)
}
