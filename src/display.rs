/// Rendering layer. All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; world coordinates are only
/// projected onto terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_invaders::entities::{Body, GameState, Shield};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_PLAYER: Color = Color::White;
const C_ALIEN: Color = Color::Red;
const C_SHOT: Color = Color::White;
const C_SHIELD: Color = Color::Green;
const C_SHIELD_TOUCHED: Color = Color::DarkGreen;
const C_HINT: Color = Color::DarkGrey;

/// Player colour darkens as lives run out.
fn player_colour(lives: u32) -> Color {
    match lives {
        3.. => C_PLAYER,
        2 => Color::Blue,
        1 => Color::DarkBlue,
        0 => Color::DarkGrey,
    }
}

// ── Projection ────────────────────────────────────────────────────────────────

/// Maps world units onto the play area inside the border (rows 2..h-2).
struct Viewport {
    cols: f64,
    rows: f64,
    world_w: f64,
    world_h: f64,
}

impl Viewport {
    fn new(state: &GameState, width: u16, height: u16) -> Self {
        Self {
            cols: f64::from(width.saturating_sub(2)),
            rows: f64::from(height.saturating_sub(4)),
            world_w: state.config.canvas_width,
            world_h: state.config.canvas_height,
        }
    }

    /// Terminal cell for a world point, or `None` when it is off screen.
    fn cell(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        let col = (x / self.world_w * self.cols).floor();
        let row = (y / self.world_h * self.rows).floor();
        if col < 0.0 || row < 0.0 || col >= self.cols || row >= self.rows {
            return None;
        }
        Some((col as u16 + 1, row as u16 + 2))
    }

    fn span(&self, width: f64) -> usize {
        ((width / self.world_w * self.cols).round() as usize).max(1)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport::new(state, width, height);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, state, width)?;

    for shield in &state.shields {
        draw_shield(out, &view, shield)?;
    }
    for (_, _, alien) in state.aliens.iter() {
        draw_alien(out, &view, alien)?;
    }
    for shot in &state.player_shots {
        draw_shot(out, &view, shot, "║")?;
    }
    for shot in &state.enemy_shots {
        draw_shot(out, &view, shot, "↓")?;
    }

    draw_player(out, &view, state)?;
    draw_controls_hint(out, height)?;

    if state.game_over {
        draw_game_over(out, state, width, height)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score | {:>6}", state.score)))?;

    let lives_str = format!("Lives | {}", state.lives);
    let lx = width.saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(player_colour(state.lives)))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, view: &Viewport, state: &GameState) -> std::io::Result<()> {
    let p = &state.player;
    if let Some((col, row)) = view.cell(p.x, p.y) {
        out.queue(style::SetForegroundColor(player_colour(state.lives)))?;
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print("/▲\\"))?;
    }
    Ok(())
}

fn draw_alien<W: Write>(out: &mut W, view: &Viewport, alien: &Body) -> std::io::Result<()> {
    if let Some((col, row)) = view.cell(alien.x, alien.y) {
        out.queue(style::SetForegroundColor(C_ALIEN))?;
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print("«▼»"))?;
    }
    Ok(())
}

fn draw_shield<W: Write>(out: &mut W, view: &Viewport, shield: &Shield) -> std::io::Result<()> {
    let body = &shield.body;
    if let Some((col, row)) = view.cell(body.x, body.y) {
        let colour = if shield.touched { C_SHIELD_TOUCHED } else { C_SHIELD };
        out.queue(style::SetForegroundColor(colour))?;
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print("▓".repeat(view.span(body.width))))?;
    }
    Ok(())
}

fn draw_shot<W: Write>(
    out: &mut W,
    view: &Viewport,
    shot: &Body,
    glyph: &str,
) -> std::io::Result<()> {
    if let Some((col, row)) = view.cell(shot.x, shot.y) {
        out.queue(style::SetForegroundColor(C_SHOT))?;
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", state.score);
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
        ("R - Play Again  Q - Quit", Color::White),
    ];

    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
