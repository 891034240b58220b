mod display;

use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal,
    ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use side_scroller::compute::{init_state, tick};
use side_scroller::config::{GameConfig, LoggingConfig, Physics};
use side_scroller::entities::GameState;
use side_scroller::input::{Command, KeyTracker};
use side_scroller::viewport::{Viewport, MIN_COLS, MIN_ROWS};
use side_scroller::Result;

/// Rows taken by the HUD line and the controls hint.
const CHROME_ROWS: u16 = 2;

#[derive(Parser)]
#[command(name = "side_scroller")]
#[command(about = "Side-scrolling platformer for the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for world generation (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The game owns the terminal, so logs only go to a file.  Without one no
/// logger is installed, since stderr would draw over the alternate screen.
fn init_logging(config: &LoggingConfig) -> Result<()> {
    if let Some(file) = config.open_target()? {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(config.level.as_str()),
        )
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    }
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum Outcome {
    Quit,
    Restart,
}

/// Play area for the current terminal size.  Shrinking below the minimum
/// mid-game clips instead of aborting.
fn current_viewport(physics: &Physics) -> Result<Viewport> {
    let (cols, rows) = terminal::size()?;
    Ok(Viewport::new(
        cols.max(MIN_COLS),
        rows.saturating_sub(CHROME_ROWS).max(MIN_ROWS),
        physics,
    ))
}

/// Runs one session until the player quits or restarts after game over.
///
/// Input is drained without blocking every frame and folded into the key
/// tracker; the held keys become the `InputState` for `tick`.  Once the
/// session is over the simulation stops and we block until a command.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    keys: &mut KeyTracker,
    frame_budget: Duration,
    rng: &mut StdRng,
) -> Result<Outcome> {
    let mut frame: u64 = 0;
    let mut last_tick = Instant::now();

    while !state.is_over() {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            if let Event::Key(key) = ev {
                if keys.handle(&key, frame) == Some(Command::Quit) {
                    log::info!("Quit at frame {}", state.frame);
                    return Ok(Outcome::Quit);
                }
            }
        }

        let input = keys.snapshot(frame);
        let dt = frame_start.duration_since(last_tick);
        last_tick = frame_start;
        *state = tick(state, &input, dt, rng);

        display::render(out, state, &current_viewport(&state.tuning.physics)?)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }

    log::info!(
        "Session over after {} frames ({:.1}s), score {}",
        state.frame,
        state.elapsed.as_secs_f32(),
        state.session.score
    );

    // Game over: no more ticks, redraw only on resize.
    loop {
        match rx.recv() {
            Ok(Event::Key(key)) => match keys.handle(&key, frame) {
                Some(Command::Quit) => return Ok(Outcome::Quit),
                Some(Command::Restart) => return Ok(Outcome::Restart),
                None => {}
            },
            Ok(Event::Resize(..)) => {
                display::render(out, state, &current_viewport(&state.tuning.physics)?)?;
            }
            Ok(_) => {}
            Err(_) => return Ok(Outcome::Quit),
        }
    }
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    seed: u64,
) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    Viewport::checked(cols, rows.saturating_sub(CHROME_ROWS), &config.tuning.physics)?;

    let frame_budget = Duration::from_secs_f64(1.0 / config.terminal.fps as f64);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut keys = KeyTracker::new();
    log::info!("Starting with seed {}", seed);

    loop {
        let mut state = init_state(config.tuning, &mut rng);
        match game_loop(out, &mut state, rx, &mut keys, frame_budget, &mut rng)? {
            Outcome::Quit => break,
            Outcome::Restart => {
                // Frame numbers restart with the session; stale entries
                // would read as held keys.
                keys.clear();
                log::info!("Restarting");
            }
        }
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("side_scroller: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = GameConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.log_file {
        config.logging.file = Some(path);
    }
    if cli.dump_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }
    init_logging(&config.logging)?;
    let seed = cli.seed.unwrap_or_else(rand::random);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for key-release events; terminals without support fall back to
    // the hold window in `KeyTracker`.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &config, seed);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        log::error!("Exiting with error: {err}");
    }
    result
}
