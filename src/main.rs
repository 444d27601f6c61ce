mod display;

use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::filter::EnvFilter;

use oops_i_missed::assets::AssetStore;
use oops_i_missed::audio::{AudioSink, Bell, Muted};
use oops_i_missed::compute::{compose_scene, conclude_round, init_attract_round, init_round, tick};
use oops_i_missed::config::GameConfig;
use oops_i_missed::entities::{Bounds, FrameInput, InputEvent, Round, RoundStatus, Vec2};
use oops_i_missed::score_store::HighScoreStore;

#[derive(Parser)]
#[command(name = "oops_i_missed")]
#[command(about = "Shoot the birds, keep the streak, and don't miss ten times")]
struct Args {
    /// JSON file overriding gameplay tunables
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory of frame-sheet files to use instead of the bundled ones
    #[arg(long)]
    assets: Option<PathBuf>,
    /// High-score file (defaults to ~/.oops_i_missed_score)
    #[arg(long)]
    score_file: Option<PathBuf>,
    /// Seed for bird spawn rows and sides
    #[arg(long)]
    seed: Option<u64>,
    /// Don't ring the terminal bell on shots
    #[arg(long)]
    mute: bool,
    /// Where log output goes; the terminal itself is busy drawing
    #[arg(long, default_value = "oops_i_missed.log")]
    log_file: PathBuf,
}

/// Everything loaded once at start-up and shared by every round.
struct Session {
    config: GameConfig,
    store: AssetStore,
    scores: HighScoreStore,
    audio: Box<dyn AudioSink>,
    rng: StdRng,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_session(args: &Args) -> anyhow::Result<Session> {
    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let store = match &args.assets {
        Some(dir) => AssetStore::load_dir(dir)?,
        None => AssetStore::bundled()?,
    };
    let scores = HighScoreStore::new(
        args.score_file
            .clone()
            .unwrap_or_else(HighScoreStore::default_path),
    );
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let audio: Box<dyn AudioSink> = if args.mute {
        Box::new(Muted)
    } else {
        Box::new(Bell::new(stdout()))
    };

    tracing::info!(
        config = ?args.config,
        assets = ?args.assets,
        score_file = %scores.path().display(),
        seed = ?args.seed,
        "session loaded"
    );
    Ok(Session {
        config,
        store,
        scores,
        audio,
        rng,
    })
}

fn frame_duration(config: &GameConfig) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(config.fps))
}

fn terminal_bounds() -> std::io::Result<Bounds> {
    let (width, height) = terminal::size()?;
    Ok(Bounds::from_cells(width, height))
}

/// Sleep off whatever is left of this frame's budget.
fn pace(frame_start: Instant, frame: Duration) {
    let elapsed = frame_start.elapsed();
    if elapsed < frame {
        thread::sleep(frame - elapsed);
    }
}

/// Map a terminal event onto the core's input vocabulary, tracking the pointer.
fn translate(ev: Event, pointer: &mut Vec2) -> Option<InputEvent> {
    match ev {
        Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers,
            ..
        }) => match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(InputEvent::Quit)
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(InputEvent::Quit),
            KeyCode::Esc => Some(InputEvent::Escape),
            KeyCode::Tab => Some(InputEvent::ToggleCursorLock),
            _ => None,
        },
        Event::Mouse(MouseEvent {
            kind, column, row, ..
        }) => {
            *pointer = Vec2::new(f32::from(column), f32::from(row));
            match kind {
                MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::Fire {
                    x: pointer.x,
                    y: pointer.y,
                }),
                _ => None,
            }
        }
        _ => None,
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Guide,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    session: &mut Session,
    high_score: i32,
) -> anyhow::Result<MenuResult> {
    let frame = frame_duration(&session.config);
    let mut flock = init_attract_round(
        &session.config,
        &session.store,
        terminal_bounds()?,
        &mut session.rng,
    )?;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        while let Ok(ev) = rx.try_recv() {
            if let Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                modifiers,
                ..
            }) = ev
            {
                match code {
                    KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Enter => {
                        return Ok(MenuResult::Start);
                    }
                    KeyCode::Char('g') | KeyCode::Char('G') => return Ok(MenuResult::Guide),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(MenuResult::Quit);
                    }
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Ok(MenuResult::Quit);
                    }
                    _ => {}
                }
            }
        }

        let bounds = terminal_bounds()?;
        let input = FrameInput {
            elapsed: last.elapsed().as_secs_f32(),
            events: Vec::new(),
            pointer: flock.aim,
            bounds,
        };
        last = Instant::now();
        flock = tick(&flock, &input, &mut session.rng);

        display::render_menu(out, &compose_scene(&flock), &session.store, bounds, high_score)?;
        pace(frame_start, frame);
    }
}

/// Returns `true` if the player asked to quit from the guide.
fn show_guide<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> anyhow::Result<bool> {
    display::render_guide(out, config, terminal_bounds()?)?;
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                modifiers,
                ..
            })) => {
                let quit = matches!(code, KeyCode::Char('q') | KeyCode::Char('Q'))
                    || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL));
                return Ok(quit);
            }
            Ok(Event::Resize(..)) => display::render_guide(out, config, terminal_bounds()?)?,
            Ok(_) => {}
            Err(_) => return Ok(true),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Play one round to its end and hand back the final state.
///
/// Input is drained without blocking at the top of every frame; the pointer
/// position is whatever the latest mouse event reported.  When the round is
/// lost the summary stays up for the configured pause and any clicks made
/// meanwhile are thrown away.
fn game_loop<W: Write>(
    out: &mut W,
    mut round: Round,
    rx: &mpsc::Receiver<Event>,
    session: &mut Session,
) -> anyhow::Result<Round> {
    let frame = frame_duration(&session.config);
    let mut pointer = round.aim;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            if let Some(input) = translate(ev, &mut pointer) {
                events.push(input);
            }
        }

        let input = FrameInput {
            elapsed: last.elapsed().as_secs_f32(),
            events,
            pointer,
            bounds: terminal_bounds()?,
        };
        last = Instant::now();
        round = tick(&round, &input, &mut session.rng);

        for &cue in &round.cues {
            session.audio.play(cue);
        }

        match round.status {
            RoundStatus::Quit => return Ok(round),
            RoundStatus::Over => {
                display::render(out, &compose_scene(&round), &session.store, round.bounds)?;
                thread::sleep(Duration::from_secs_f32(session.config.game_over_pause_secs));
                while rx.try_recv().is_ok() {}
                return Ok(round);
            }
            RoundStatus::Playing => {}
        }

        display::render(out, &compose_scene(&round), &session.store, round.bounds)?;
        pace(frame_start, frame);
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    // Load everything before touching the terminal so a bad asset or config
    // is reported on a normal screen.
    let mut session = load_session(&args)?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(EnableMouseCapture)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &mut session);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        tracing::error!(error = %e, "exiting with error");
    }
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    session: &mut Session,
) -> anyhow::Result<()> {
    let mut high_score = session.scores.load();

    loop {
        match show_menu(out, rx, session, high_score)? {
            MenuResult::Quit => break,
            MenuResult::Guide => {
                if show_guide(out, rx, &session.config)? {
                    break;
                }
            }
            MenuResult::Start => {
                let round = init_round(
                    &session.config,
                    &session.store,
                    terminal_bounds()?,
                    high_score,
                    &mut session.rng,
                )?;
                let round = game_loop(out, round, rx, session)?;

                // Persist new high score if beaten
                if let Some(best) = conclude_round(&round) {
                    if let Err(e) = session.scores.save(best) {
                        tracing::warn!(error = %e, "could not write high score");
                    }
                    high_score = best;
                }

                if round.status == RoundStatus::Quit {
                    break;
                }
                // Otherwise loop back to the menu
            }
        }
    }
    Ok(())
}
