/// Rendering layer. All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use side_scroller::entities::{Collectible, Enemy, Facing, GameState, Player};
use side_scroller::viewport::Viewport;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKDROP: Color = Color::DarkBlue;
const C_FLOOR: Color = Color::DarkYellow;
const C_HEART_FULL: Color = Color::Red;
const C_HEART_EMPTY: Color = Color::DarkGrey;
const C_SCORE: Color = Color::White;
const C_PLAYER: Color = Color::Cyan;
const C_ENEMY: Color = Color::Red;
const C_COIN: Color = Color::Yellow;
const C_NOTE: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

/// Two staggered rows of a brick wall, repeated across the backdrop.
const BRICKS: [&str; 2] = ["___|", "_|__"];

/// Shown painted on the world near the start, like a signpost.
const NOTE_X: f32 = 80.0;
const NOTE_Y: f32 = 120.0;
const NOTE: [&str; 3] = [
    "* Collect coins and dodge fireballs",
    "* You are given three lives",
    "* Each coin is worth 10 points",
];

/// Play area starts below the HUD row.
const PLAY_TOP: u16 = 1;

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.  `vp` covers the play area only; the HUD and
/// the hint line take one row each above and below it.
pub fn render<W: Write>(out: &mut W, state: &GameState, vp: &Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let camera = vp.camera_left(state.player.x);

    draw_backdrop(out, state, vp)?;
    draw_floor(out, state, vp)?;
    draw_note(out, vp, camera)?;

    for coin in state.visible_collectibles() {
        draw_collectible(out, coin, vp, camera)?;
    }
    for enemy in &state.enemies {
        draw_enemy(out, enemy, vp, camera)?;
    }
    draw_player(out, &state.player, state, vp, camera)?;

    draw_hud(out, state, vp)?;
    draw_controls_hint(out, vp)?;

    if state.is_over() {
        draw_game_over(out, state, vp)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, PLAY_TOP + vp.rows + 1))?;
    out.flush()?;
    Ok(())
}

/// Print `text` at a play-area cell, dropping it if it would run off the
/// right edge.
fn put<W: Write>(
    out: &mut W,
    vp: &Viewport,
    col: u16,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    if col as usize + text.chars().count() > vp.cols as usize {
        return Ok(());
    }
    out.queue(cursor::MoveTo(col, PLAY_TOP + row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Scenery ───────────────────────────────────────────────────────────────────

fn draw_backdrop<W: Write>(out: &mut W, state: &GameState, vp: &Viewport) -> std::io::Result<()> {
    let floor_row = vp.row(state.tuning.physics.floor_y).unwrap_or(vp.rows);
    let shift = vp.parallax_offset(state.player.x);

    for row in 0..floor_row {
        let pattern: Vec<char> = BRICKS[row as usize % 2].chars().collect();
        let line: String = (0..vp.cols as usize)
            .map(|c| pattern[(c + shift) % pattern.len()])
            .collect();
        put(out, vp, 0, row, &line, C_BACKDROP)?;
    }
    Ok(())
}

fn draw_floor<W: Write>(out: &mut W, state: &GameState, vp: &Viewport) -> std::io::Result<()> {
    let Some(floor_row) = vp.row(state.tuning.physics.floor_y) else {
        return Ok(());
    };
    let top = "▀".repeat(vp.cols as usize);
    let fill = "█".repeat(vp.cols as usize);
    put(out, vp, 0, floor_row, &top, C_FLOOR)?;
    for row in floor_row + 1..vp.rows {
        put(out, vp, 0, row, &fill, C_FLOOR)?;
    }
    Ok(())
}

fn draw_note<W: Write>(out: &mut W, vp: &Viewport, camera: f32) -> std::io::Result<()> {
    let (Some(col), Some(row)) = (vp.column(NOTE_X, camera), vp.row(NOTE_Y)) else {
        return Ok(());
    };
    for (i, line) in NOTE.iter().enumerate() {
        put(out, vp, col, row + i as u16, line, C_NOTE)?;
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_collectible<W: Write>(
    out: &mut W,
    coin: &Collectible,
    vp: &Viewport,
    camera: f32,
) -> std::io::Result<()> {
    if let (Some(col), Some(row)) = (vp.column(coin.x, camera), vp.row(coin.y)) {
        put(out, vp, col, row, "●", C_COIN)?;
    }
    Ok(())
}

fn draw_enemy<W: Write>(
    out: &mut W,
    enemy: &Enemy,
    vp: &Viewport,
    camera: f32,
) -> std::io::Result<()> {
    // Fireball with a tail trailing behind its direction of travel.
    let sprite = match enemy.facing {
        Facing::Left => "▲~",
        Facing::Right => "~▲",
    };
    if let (Some(col), Some(row)) = (vp.column(enemy.x, camera), vp.row(enemy.y)) {
        put(out, vp, col, row, sprite, C_ENEMY)?;
    }
    Ok(())
}

fn draw_player<W: Write>(
    out: &mut W,
    player: &Player,
    state: &GameState,
    vp: &Viewport,
    camera: f32,
) -> std::io::Result<()> {
    // 2-row sprite standing on the bottom of the player's box:
    //    o      ← head
    //   /█\     ← body
    let bottom_y = player.y + state.tuning.physics.player_height - 1.0;
    let (Some(col), Some(body_row)) = (vp.column(player.x, camera), vp.row(bottom_y)) else {
        return Ok(());
    };
    put(out, vp, col.saturating_sub(1), body_row, "/█\\", C_PLAYER)?;
    if body_row > 0 {
        put(out, vp, col, body_row - 1, "o", C_PLAYER)?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, vp: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    for i in 0..state.tuning.combat.max_health {
        if i < state.session.health {
            out.queue(style::SetForegroundColor(C_HEART_FULL))?;
            out.queue(Print("♥ "))?;
        } else {
            out.queue(style::SetForegroundColor(C_HEART_EMPTY))?;
            out.queue(Print("♡ "))?;
        }
    }

    let score = format!("Score: {}", state.session.score);
    let sx = vp.cols.saturating_sub(score.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(sx, 0))?;
    out.queue(style::SetForegroundColor(C_SCORE))?;
    out.queue(Print(&score))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, PLAY_TOP + vp.rows))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → : Move   ↑ / SPACE : Jump   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, state: &GameState, vp: &Viewport) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", state.session.score);
    let lines: [(&str, Color); 6] = [
        ("╔════════════════════╗", Color::Red),
        ("║     GAME  OVER     ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
        ("", Color::White),
        ("R - Play Again  Q - Quit", Color::White),
    ];

    let cx = vp.cols / 2;
    let start_row = (vp.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, PLAY_TOP + start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
