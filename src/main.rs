mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use space_invaders::compute::{init_state, reduce};
use space_invaders::config::GameConfig;
use space_invaders::entities::{Command, GameState};
use space_invaders::input::command_for_key;

/// Environment variable fixing the RNG seed for reproducible runs.
const SEED_ENV: &str = "INVADERS_SEED";

/// Max ticks run in one frame to catch up after a stall; any backlog beyond
/// this is dropped rather than replayed.
const MAX_CATCHUP_TICKS: u32 = 8;

// ── Logging ───────────────────────────────────────────────────────────────────

/// Route `RUST_LOG` output to a file so it never lands on the game screen.
fn init_logging() {
    let path = std::env::temp_dir().join("space_invaders.log");
    let Ok(file) = File::create(&path) else {
        return;
    };
    let _ = env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

fn seed() -> u64 {
    std::env::var(SEED_ENV)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(rand::random)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum Outcome {
    Quit,
    Restart,
}

/// Run one game until the player quits or asks for a restart.
///
/// Two sources feed the reducer: key events drained from the input thread,
/// and a fixed-timestep accumulator that emits a `Tick` every
/// `tick_interval_ms`.  Each command is folded in arrival order and the
/// latest snapshot is drawn once per frame.  Once `game_over` is set no more
/// commands are delivered.
fn game_loop<W: Write>(
    out: &mut W,
    mut state: GameState,
    rx: &mpsc::Receiver<Event>,
    rng: &mut Pcg32,
) -> std::io::Result<Outcome> {
    let tick_every = Duration::from_millis(state.config.tick_interval_ms);
    let frame = Duration::from_millis(state.config.frame_interval_ms);
    let mut accumulator = Duration::ZERO;
    let mut last = Instant::now();
    let mut dumped = false;

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(key) = ev else { continue };
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Ok(Outcome::Quit);
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(Outcome::Quit);
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') if state.game_over => {
                        return Ok(Outcome::Restart);
                    }
                    _ => {}
                }
            }
            if state.game_over {
                continue;
            }
            if let Some(command) = command_for_key(&key) {
                state = reduce(&state, command, rng);
            }
        }

        // ── Timer: fixed-cadence ticks ────────────────────────────────────────
        let now = Instant::now();
        accumulator += now - last;
        last = now;

        let mut ticks = 0;
        while accumulator >= tick_every && ticks < MAX_CATCHUP_TICKS && !state.game_over {
            state = reduce(&state, Command::Tick, rng);
            accumulator -= tick_every;
            ticks += 1;
        }
        if ticks == MAX_CATCHUP_TICKS || state.game_over {
            accumulator = Duration::ZERO;
        }

        if state.game_over && !dumped {
            dumped = true;
            match state.to_json() {
                Ok(json) => log::debug!("final snapshot: {json}"),
                Err(err) => log::warn!("could not serialize final snapshot: {err}"),
            }
        }

        display::render(out, &state)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: GameConfig,
    rng: &mut Pcg32,
) -> std::io::Result<()> {
    loop {
        match game_loop(out, init_state(config), rx, rng)? {
            Outcome::Quit => return Ok(()),
            Outcome::Restart => log::info!("restarting"),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_logging();
    let config = GameConfig::from_env()?;
    let seed = seed();
    log::info!("starting with seed {seed}");
    let mut rng = Pcg32::seed_from_u64(seed);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to press-only.
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

    let result = run(&mut out, &rx, config, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result?;
    Ok(())
}
