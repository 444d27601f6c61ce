/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable `Scene` (or plain
/// menu data).  No game logic is performed; this module only translates draw
/// commands and text into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use oops_i_missed::assets::AssetStore;
use oops_i_missed::config::GameConfig;
use oops_i_missed::entities::{AssetId, Bounds, DrawCommand, HudText, Scene, TargetKind, Vec2};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_LANDSCAPE: Color = Color::DarkGreen;
const C_WEAPON: Color = Color::Grey;
const C_WHITE_BIRD: Color = Color::White;
const C_BLUE_BIRD: Color = Color::Blue;
const C_TURBO_BIRD: Color = Color::Yellow;
const C_MONSTER: Color = Color::Magenta;
const C_HUD: Color = Color::White;
const C_MISSES: Color = Color::Red;
const C_RETICLE: Color = Color::White;
const C_TITLE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

fn asset_color(asset: AssetId) -> Color {
    match asset {
        AssetId::WhiteBird => C_WHITE_BIRD,
        AssetId::BlueBird => C_BLUE_BIRD,
        AssetId::TurboBird => C_TURBO_BIRD,
        AssetId::Monster => C_MONSTER,
        AssetId::Shotgun => C_WEAPON,
        AssetId::Landscape => C_LANDSCAPE,
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one gameplay frame: background, weapon, birds, HUD, reticle.  Once
/// the round is over only the background and the summary are shown.
pub fn render<W: Write>(
    out: &mut W,
    scene: &Scene,
    store: &AssetStore,
    bounds: Bounds,
) -> anyhow::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match &scene.game_over {
        Some((title, final_score)) => {
            for cmd in scene.draws.iter().filter(|c| c.asset == AssetId::Landscape) {
                draw_sprite(out, cmd, store, bounds)?;
            }
            draw_game_over(out, title, final_score, &scene.hud, bounds)?;
        }
        None => {
            for cmd in &scene.draws {
                draw_sprite(out, cmd, store, bounds)?;
            }
            draw_hud(out, &scene.hud, bounds)?;
            draw_reticle(out, scene.reticle, bounds)?;
        }
    }

    finish(out, bounds)
}

/// Title screen with the attract-mode birds flying behind it.
pub fn render_menu<W: Write>(
    out: &mut W,
    scene: &Scene,
    store: &AssetStore,
    bounds: Bounds,
    high_score: i32,
) -> anyhow::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    for cmd in scene.draws.iter().filter(|c| c.asset != AssetId::Shotgun) {
        draw_sprite(out, cmd, store, bounds)?;
    }

    let cx = bounds.width as u16 / 2;
    let cy = bounds.height as u16 / 2;
    let mut lines: Vec<(String, Color)> = vec![
        ("O O P S !".to_string(), C_TITLE),
        ("I  M I S S E D".to_string(), C_TITLE),
        ("Limited Edition".to_string(), C_HINT),
        (String::new(), C_HINT),
    ];
    if high_score > 0 {
        lines.push((format!("Best Score: {high_score}"), Color::Yellow));
    }
    lines.push(("[P] Play   [G] Guide   [Q] Quit".to_string(), C_HUD));

    let start = cy.saturating_sub(lines.len() as u16 / 2 + 2);
    for (i, (text, color)) in lines.iter().enumerate() {
        print_centered(out, text, *color, cx, start + i as u16)?;
    }

    finish(out, bounds)
}

/// How-to-play screen.
pub fn render_guide<W: Write>(
    out: &mut W,
    config: &GameConfig,
    bounds: Bounds,
) -> anyhow::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let mut lines = vec![
        "Game Guidelines".to_string(),
        String::new(),
        "Shoot as many birds as you can while avoiding misses.".to_string(),
        format!(
            "A streak of {} hits brings in the Turbo Bird, {} brings the Monster.",
            config.advanced_unlock_streak, config.elite_unlock_streak
        ),
        format!(
            "Every miss breaks your streak; past {} misses each one costs {} points.",
            config.miss_penalty_threshold, config.miss_penalty
        ),
        String::new(),
    ];
    for kind in TargetKind::ALL {
        let points = config.tuning(kind).points;
        let unit = if points == 1 { "point" } else { "points" };
        lines.push(format!("{:<12} {points} {unit}", kind.label()));
    }
    lines.push(String::new());
    lines.push("Mouse: aim & shoot   Tab: lock cursor   Q / Esc: quit".to_string());

    out.queue(style::SetForegroundColor(C_HUD))?;
    for (i, line) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(2, 1 + i as u16))?;
        out.queue(Print(line))?;
    }

    let note = format!("NOTE: {} MISSES WILL END THE GAME!", config.session_end_misses);
    out.queue(cursor::MoveTo(2, 3 + lines.len() as u16))?;
    out.queue(style::SetForegroundColor(C_MISSES))?;
    out.queue(Print(note))?;

    out.queue(cursor::MoveTo(2, 5 + lines.len() as u16))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Press any key to go back"))?;

    finish(out, bounds)
}

// ── Sprites ───────────────────────────────────────────────────────────────────

fn draw_sprite<W: Write>(
    out: &mut W,
    cmd: &DrawCommand,
    store: &AssetStore,
    bounds: Bounds,
) -> anyhow::Result<()> {
    let sheet = store.sheet(cmd.asset)?;
    let rows = sheet.frame_lines(cmd.source, cmd.scale.x < 0.0);
    let x0 = cmd.position.x.round() as i32;
    let y0 = cmd.position.y.round() as i32;

    out.queue(style::SetForegroundColor(asset_color(cmd.asset)))?;
    for (dy, row) in rows.iter().enumerate() {
        for (dx, &glyph) in row.iter().enumerate() {
            if glyph != ' ' {
                put(out, x0 + dx as i32, y0 + dy as i32, glyph, bounds)?;
            }
        }
    }

    if cmd.asset == AssetId::Shotgun {
        // Barrel tip above the muzzle shows the aim direction.
        let barrel = if cmd.rotation > 15.0 {
            '\\'
        } else if cmd.rotation < -15.0 {
            '/'
        } else {
            '|'
        };
        put(out, x0 + cmd.source.width as i32 / 2, y0 - 1, barrel, bounds)?;
    }
    Ok(())
}

/// Print one glyph if it lands inside the terminal.
fn put<W: Write>(out: &mut W, x: i32, y: i32, glyph: char, bounds: Bounds) -> std::io::Result<()> {
    if x < 0 || y < 0 || x >= bounds.width as i32 || y >= bounds.height as i32 {
        return Ok(());
    }
    out.queue(cursor::MoveTo(x as u16, y as u16))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── HUD & reticle ─────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, hud: &HudText, bounds: Bounds) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_HUD))?;
    for (row, text) in [&hud.score, &hud.high_score, &hud.streak].iter().enumerate() {
        out.queue(cursor::MoveTo(1, row as u16))?;
        out.queue(Print(text))?;
    }

    out.queue(cursor::MoveTo(1, (bounds.height as u16 / 2).max(4)))?;
    out.queue(style::SetForegroundColor(C_MISSES))?;
    out.queue(Print(&hud.misses))?;
    Ok(())
}

fn draw_reticle<W: Write>(out: &mut W, at: Vec2, bounds: Bounds) -> std::io::Result<()> {
    let x = at.x.round() as i32;
    let y = at.y.round() as i32;
    let arm = ((bounds.width / 30.0) as i32).max(1);

    out.queue(style::SetForegroundColor(C_RETICLE))?;
    for d in 1..=arm {
        put(out, x - d, y, '─', bounds)?;
        put(out, x + d, y, '─', bounds)?;
    }
    put(out, x, y - 1, '│', bounds)?;
    put(out, x, y + 1, '│', bounds)?;
    put(out, x, y, '┼', bounds)?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    title: &str,
    final_score: &str,
    hud: &HudText,
    bounds: Bounds,
) -> std::io::Result<()> {
    let banner = format!("║  {:^16}  ║", title.to_uppercase());
    let lines: [(&str, Color); 6] = [
        ("╔════════════════════╗", Color::Red),
        (banner.as_str(), Color::Red),
        ("╚════════════════════╝", Color::Red),
        (final_score, Color::Yellow),
        (hud.high_score.as_str(), C_HINT),
        ("Returning to menu…", Color::White),
    ];

    let cx = bounds.width as u16 / 2;
    let start_row = (bounds.height as u16 / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        print_centered(out, msg, *color, cx, start_row + i as u16)?;
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn print_centered<W: Write>(
    out: &mut W,
    text: &str,
    color: Color,
    cx: u16,
    row: u16,
) -> std::io::Result<()> {
    let col = cx.saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

/// Park the cursor in a harmless spot and flush.
fn finish<W: Write>(out: &mut W, bounds: Bounds) -> anyhow::Result<()> {
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, (bounds.height as u16).saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}
