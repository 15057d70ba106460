//! Standalone host for the splash engine.
//!
//! Owns everything the engine deliberately does not: the real terminal, the
//! wall clock, and the event loop. Engine commands are interpreted here -
//! entering the alternate screen, scheduling ticks, quitting - and every
//! frame string the engine produces is written to the terminal verbatim.

use std::io::{Write, stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{execute, queue};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cortex_splash::{
    Command, ConfigStore, Key, Splash, SplashEvent, SystemEnv, TermProfile, should_show,
};

/// Cortex splash screen demo.
#[derive(Parser, Debug)]
#[command(name = "cortex-splash", version, about)]
struct Cli {
    /// Run the infinite torus mode instead of the scripted sequence.
    #[arg(long)]
    donut: bool,

    /// Run the infinite matrix-rain mode instead of the scripted sequence.
    #[arg(long, conflicts_with = "donut")]
    rain: bool,

    /// Seed for the rain mode's random streams (reproducible runs).
    #[arg(long, requires = "rain")]
    seed: Option<u64>,

    /// Show the splash even when the frequency policy says otherwise.
    #[arg(long)]
    force: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let env = SystemEnv;
    let profile = TermProfile::detect(&env);

    if profile.should_skip_splash() {
        debug!(width = profile.width, height = profile.height, "terminal below splash floor");
        return Ok(());
    }

    let splash = if cli.donut {
        Splash::donut(profile.width, profile.height)
    } else if cli.rain {
        match cli.seed {
            Some(seed) => Splash::rain_seeded(profile.width, profile.height, seed),
            None => Splash::rain(profile.width, profile.height),
        }
    } else {
        let store = ConfigStore::from_env(&env)?;
        let config = store.load(&env);
        let first_run = store.is_first_run();

        if !cli.force && !should_show(&config, first_run, &mut rand::rng()) {
            debug!(?config.splash_frequency, first_run, "frequency policy skipped the splash");
            return Ok(());
        }

        // Best effort: the splash still runs if the marker cannot be written.
        if let Err(err) = store.mark_shown() {
            debug!(%err, "could not write first-run marker");
        }

        if profile.should_use_fallback() || config.reduced_motion {
            Splash::simplified(&profile)
        } else {
            Splash::new(profile.width, profile.height, Some(store))
        }
    };

    let result = run(splash);
    restore_terminal();
    result
}

/// Drives the engine until it quits, interpreting its commands.
fn run(mut splash: Splash) -> Result<()> {
    let mut out = stdout();
    let mut next_tick = Instant::now();

    enable_raw_mode()?;

    for command in splash.init() {
        match command {
            Command::EnterAltScreen => execute!(out, EnterAlternateScreen, Hide)?,
            Command::Tick(delay) => next_tick = Instant::now() + delay,
            Command::Quit => return Ok(()),
        }
    }

    draw(&mut out, &mut splash)?;

    while !splash.is_done() {
        let timeout = next_tick.saturating_duration_since(Instant::now());

        let event = if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    // Ctrl+C always bails out of the host loop.
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        return Ok(());
                    }
                    match translate_key(key.code) {
                        Some(key) => SplashEvent::Key(key),
                        None => continue,
                    }
                }
                Event::Resize(width, height) => SplashEvent::Resize(width, height),
                _ => continue,
            }
        } else {
            SplashEvent::Tick(Instant::now())
        };

        let is_tick = matches!(event, SplashEvent::Tick(_));
        let commands = splash.update(event);

        for command in commands {
            match command {
                Command::EnterAltScreen => execute!(out, EnterAlternateScreen, Hide)?,
                Command::Tick(delay) => next_tick = Instant::now() + delay,
                Command::Quit => return Ok(()),
            }
        }

        // Frames are produced on ticks; key handling only mutates state.
        if is_tick && !splash.is_done() {
            draw(&mut out, &mut splash)?;
        }
    }

    Ok(())
}

/// Writes the complete frame from the top-left corner.
fn draw(out: &mut impl Write, splash: &mut Splash) -> Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    out.write_all(splash.view().as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Maps a crossterm key code onto the engine's key representation.
fn translate_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}

/// Leaves the alternate screen and restores the cursor and input modes.
fn restore_terminal() {
    let mut out = stdout();
    let _ = execute!(out, LeaveAlternateScreen, Show);
    let _ = disable_raw_mode();
}
