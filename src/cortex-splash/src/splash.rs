//! The splash state machine.
//!
//! Owns the current act, the frame counter, the adaptive frame-rate window,
//! and all input handling. The engine is driven entirely by the host event
//! loop: it consumes discrete events (ticks, keys, resizes) and answers with
//! commands ("enter the alternate screen", "call me again in N ms", "quit").
//! Nothing here blocks or spawns work; frames are produced atomically as
//! complete strings.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::boot::BootSequence;
use crate::closer::Closer;
use crate::color::{Rgb, colorize};
use crate::config::ConfigStore;
use crate::cortex::{ColorStyle, CortexRenderer};
use crate::env::SystemEnv;
use crate::fallback::TextOnlySplash;
use crate::logo::CORTEX_LOGO;
use crate::rain::MatrixRain;
use crate::term::TermProfile;

/// One phase of the scripted animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Act {
    /// Scripted boot log reveal.
    Boot,
    /// Rotating torus.
    Cortex,
    /// Final message box.
    Closer,
    /// Simplified text splash for limited terminals.
    Fallback,
}

/// Engine-owned key representation, decoupled from any terminal backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Enter/Return.
    Enter,
    /// Escape.
    Esc,
    /// A printable character.
    Char(char),
}

/// External event consumed by [`Splash::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplashEvent {
    /// Scheduled timer tick carrying the host's wall-clock timestamp.
    Tick(Instant),
    /// Key press.
    Key(Key),
    /// Terminal resized to `(width, height)`.
    Resize(u16, u16),
}

/// Follow-up command returned to the host event loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Switch the terminal to the alternate screen buffer.
    EnterAltScreen,
    /// Schedule the next tick after the given delay.
    Tick(Duration),
    /// The splash is finished; tear down and hand control back.
    Quit,
}

/// How this splash instance was launched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunMode {
    /// Normal timed boot → cortex → closer script.
    Scripted,
    /// Infinite torus (easter egg); only quit ends it.
    Donut,
    /// Infinite matrix rain; only quit ends it.
    Rain,
}

/// Konami sequence; completing it enables rainbow coloring.
const KONAMI: [Key; 10] = [
    Key::Up,
    Key::Up,
    Key::Down,
    Key::Down,
    Key::Left,
    Key::Right,
    Key::Left,
    Key::Right,
    Key::Char('b'),
    Key::Char('a'),
];

/// Act transition thresholds, in frames (30 FPS: 1s boot, 3s cortex, 1s closer).
const BOOT_FRAMES: u64 = 30;
const CORTEX_FRAMES: u64 = 120;
const CLOSER_FRAMES: u64 = 150;

/// Initial tick interval (~30 FPS).
const INITIAL_TICK: Duration = Duration::from_millis(33);

/// Adaptive frame-rate window.
const FRAME_WINDOW: usize = 30;
const FRAME_WINDOW_MIN_SAMPLES: usize = 10;
const SLOW_FRAME_THRESHOLD: Duration = Duration::from_millis(50);
const FPS_HIGH: u32 = 30;
const FPS_LOW: u32 = 15;

const HINT_COLOR: Rgb = Rgb::new(100, 100, 100);

/// The splash screen model.
pub struct Splash {
    act: Act,
    mode: RunMode,
    frame: u64,
    done: bool,
    width: u16,
    height: u16,
    boot: BootSequence,
    cortex: CortexRenderer,
    rain: Option<MatrixRain>,
    closer: Closer,
    skip_hint: bool,
    show_math: bool,
    rainbow: bool,
    konami_idx: usize,
    frame_times: VecDeque<Duration>,
    last_tick: Option<Instant>,
    target_fps: u32,
    store: Option<ConfigStore>,
}

impl Splash {
    /// Creates the normal scripted splash.
    ///
    /// The store, when present, backs the "disable forever" key; persistence
    /// failures are logged and never block the exit.
    pub fn new(width: u16, height: u16, store: Option<ConfigStore>) -> Self {
        Self::build(width, height, Act::Boot, RunMode::Scripted, store)
    }

    /// Infinite torus mode; runs until quit.
    pub fn donut(width: u16, height: u16) -> Self {
        Self::build(width, height, Act::Cortex, RunMode::Donut, None)
    }

    /// Infinite matrix-rain mode; runs until quit.
    pub fn rain(width: u16, height: u16) -> Self {
        let mut splash = Self::build(width, height, Act::Cortex, RunMode::Rain, None);
        splash.rain = Some(MatrixRain::new(width, height, CORTEX_LOGO));
        splash
    }

    /// Infinite matrix-rain mode with a fixed seed, for reproducible runs.
    pub fn rain_seeded(width: u16, height: u16, seed: u64) -> Self {
        let mut splash = Self::build(width, height, Act::Cortex, RunMode::Rain, None);
        splash.rain = Some(MatrixRain::with_seed(width, height, CORTEX_LOGO, seed));
        splash
    }

    /// Simplified splash for terminals that cannot carry the animation.
    pub fn simplified(profile: &TermProfile) -> Self {
        let mut splash =
            Self::build(profile.width, profile.height, Act::Fallback, RunMode::Scripted, None);
        splash.skip_hint = false;
        splash
    }

    fn build(width: u16, height: u16, act: Act, mode: RunMode, store: Option<ConfigStore>) -> Self {
        Self {
            act,
            mode,
            frame: 0,
            done: false,
            width,
            height,
            boot: BootSequence::new(),
            cortex: CortexRenderer::new(width, height),
            rain: None,
            closer: Closer::new(width, height),
            skip_hint: mode == RunMode::Scripted,
            show_math: false,
            rainbow: false,
            konami_idx: 0,
            frame_times: VecDeque::with_capacity(FRAME_WINDOW),
            last_tick: None,
            target_fps: FPS_HIGH,
            store,
        }
    }

    /// Returns the startup commands for the host.
    pub fn init(&self) -> Vec<Command> {
        vec![Command::EnterAltScreen, Command::Tick(INITIAL_TICK)]
    }

    /// Returns whether the splash has finished.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Current act.
    #[inline]
    pub fn act(&self) -> Act {
        self.act
    }

    /// Current frame counter. Monotonic; never reset mid-run.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Current target frame rate, as chosen by the adaptive controller.
    #[inline]
    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Returns whether the rainbow easter egg is active.
    #[inline]
    pub fn rainbow_active(&self) -> bool {
        self.rainbow
    }

    /// Consumes one external event and returns follow-up commands.
    pub fn update(&mut self, event: SplashEvent) -> Vec<Command> {
        match event {
            SplashEvent::Resize(width, height) => {
                self.resize(width, height);
                Vec::new()
            }
            SplashEvent::Key(key) => self.handle_key(key),
            SplashEvent::Tick(now) => self.handle_tick(now),
        }
    }

    /// Renders the complete current frame as a single string.
    pub fn view(&mut self) -> String {
        if self.show_math {
            return render_math_overlay();
        }

        let mut content = match (self.mode, self.act) {
            (RunMode::Rain, _) => match self.rain.as_mut() {
                Some(rain) => rain.render(),
                None => String::new(),
            },
            (_, Act::Boot) => self.boot.render(self.frame),
            (_, Act::Cortex) => self.cortex.render(),
            (_, Act::Closer) => self.closer.render(),
            (_, Act::Fallback) => TextOnlySplash::new(self.width, self.height).render(),
        };

        match self.mode {
            RunMode::Donut => {
                content.push_str("\n\n");
                content.push_str(&colorize("🍩 DONUT MODE ", Rgb::new(0, 255, 255)));
                content.push_str(&colorize("| Press 'Q' to quit | '?' for math", HINT_COLOR));
            }
            RunMode::Rain => {
                content.push_str("\n\n");
                content.push_str(&colorize("☔ RAIN MODE ", Rgb::new(0, 255, 100)));
                content.push_str(&colorize("| Press 'Q' to quit", HINT_COLOR));
            }
            RunMode::Scripted => {
                if self.skip_hint && matches!(self.act, Act::Boot | Act::Cortex) {
                    content.push_str("\n\n");
                    content.push_str(&colorize(
                        "Press 'S' to skip | ESC to disable forever | '?' for math",
                        HINT_COLOR,
                    ));
                }
            }
        }

        // Subtle progress marker while a Konami attempt is underway.
        if self.konami_idx > 0 && self.konami_idx < 5 {
            content.push('\n');
            content.push_str(&colorize("...", Rgb::new(50, 50, 50)));
        }

        content
    }

    /// Rebuilds renderer buffers against new dimensions. Not incremental:
    /// geometry state is reseeded, only the chosen color mode survives.
    fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cortex = CortexRenderer::new(width, height);
        if self.rainbow {
            self.cortex.set_style(ColorStyle::Rainbow);
        }
        if self.rain.is_some() {
            self.rain = Some(MatrixRain::new(width, height, CORTEX_LOGO));
        }
        self.closer = Closer::new(width, height);
    }

    fn handle_key(&mut self, key: Key) -> Vec<Command> {
        if self.mode == RunMode::Scripted {
            self.track_konami(key);
        }

        match key {
            // The simplified splash leaves on any key.
            _ if self.act == Act::Fallback => self.quit(),

            Key::Char('?') => {
                self.show_math = !self.show_math;
                Vec::new()
            }

            Key::Char('q') | Key::Char('Q') if self.mode != RunMode::Scripted => self.quit(),

            Key::Char('s') | Key::Char('S') if self.mode == RunMode::Scripted => self.quit(),

            Key::Esc if self.mode == RunMode::Scripted => {
                // One-way disable; best effort. The skip must always win.
                if let Some(store) = &self.store {
                    if let Err(err) = store.disable_permanently(&SystemEnv) {
                        warn!(%err, "failed to persist splash disable");
                    }
                }
                self.quit()
            }

            Key::Enter | Key::Char(' ')
                if self.mode == RunMode::Scripted && self.act == Act::Closer =>
            {
                self.quit()
            }

            _ => Vec::new(),
        }
    }

    fn track_konami(&mut self, key: Key) {
        if key == KONAMI[self.konami_idx] {
            self.konami_idx += 1;
            if self.konami_idx >= KONAMI.len() {
                self.konami_idx = 0;
                self.rainbow = true;
                self.cortex.set_style(ColorStyle::Rainbow);
            }
        } else if !matches!(key, Key::Char('?') | Key::Char('s') | Key::Char('S')) {
            self.konami_idx = 0;
        }
    }

    fn handle_tick(&mut self, now: Instant) -> Vec<Command> {
        self.record_frame_time(now);
        self.frame += 1;

        if self.mode == RunMode::Scripted {
            match self.act {
                Act::Boot if self.frame > BOOT_FRAMES => self.act = Act::Cortex,
                Act::Cortex if self.frame > CORTEX_FRAMES => self.act = Act::Closer,
                Act::Closer if self.frame > CLOSER_FRAMES => return self.quit(),
                _ => {}
            }
        }

        // Advance whichever renderer carries animation state.
        match self.mode {
            RunMode::Rain => {
                if let Some(rain) = self.rain.as_mut() {
                    rain.update();
                }
            }
            _ => {
                if self.act == Act::Cortex {
                    self.cortex.advance();
                }
            }
        }

        let interval = Duration::from_millis(u64::from(1000 / self.target_fps));
        vec![Command::Tick(interval)]
    }

    /// Records the wall-clock delta since the previous tick and re-derives
    /// the target rate. Hysteresis-free: re-evaluated every tick from the
    /// rolling average alone.
    fn record_frame_time(&mut self, now: Instant) {
        if let Some(last) = self.last_tick {
            let delta = now.saturating_duration_since(last);
            if self.frame_times.len() == FRAME_WINDOW {
                self.frame_times.pop_front();
            }
            self.frame_times.push_back(delta);

            if self.frame_times.len() >= FRAME_WINDOW_MIN_SAMPLES {
                let total: Duration = self.frame_times.iter().sum();
                let average = total / self.frame_times.len() as u32;
                self.target_fps = if average > SLOW_FRAME_THRESHOLD { FPS_LOW } else { FPS_HIGH };
            }
        }
        self.last_tick = Some(now);
    }

    fn quit(&mut self) -> Vec<Command> {
        self.done = true;
        vec![Command::Quit]
    }
}

/// Full-screen explanation overlay, toggled with `?`.
fn render_math_overlay() -> String {
    let cyan = Rgb::new(0, 255, 255);
    let gold = Rgb::new(255, 174, 0);

    let mut out = String::new();
    out.push_str(&colorize(
        "\n\
╔═══════════════════════════════════════════════════════════════════════╗\n\
║                                                                       ║\n\
║                   🧮 TORUS MATH - 3D Donut Equations                  ║\n\
║                                                                       ║\n\
╚═══════════════════════════════════════════════════════════════════════╝\n\n",
        cyan,
    ));
    out.push_str(
        "Torus Parametric Equations:\n\
  x(θ,φ) = (R + r·cos(φ))·cos(θ)\n\
  y(θ,φ) = (R + r·cos(φ))·sin(θ)\n\
  z(θ,φ) = r·sin(φ)\n\n\
Where:\n\
  R = 2 (major radius - distance from center to tube center)\n\
  r = 1 (minor radius - tube thickness)\n\
  θ = angle around torus (0 to 2π)\n\
  φ = angle around tube (0 to 2π)\n\n\
Rotation Matrices:\n\n\
  Rx(A) = [1    0       0    ]\n\
          [0  cos(A) -sin(A) ]\n\
          [0  sin(A)  cos(A) ]\n\n\
  Rz(B) = [cos(B) -sin(B)  0 ]\n\
          [sin(B)  cos(B)  0 ]\n\
          [0       0       1 ]\n\n\
Perspective Projection:\n\
  x_screen = width/2  + (30/z) * x\n\
  y_screen = height/2 - (15/z) * y\n\n\
Luminance:\n\
  L = cos(φ)·cos(θ)·sin(B) - cos(A)·cos(θ)·sin(φ) - sin(A)·sin(θ)\n\
      + cos(B)·(cos(A)·sin(φ) - cos(θ)·sin(A)·sin(θ))\n\n\
Character Mapping:\n\
  L ∈ [-1, 1] → { ' ', '.', '·', ':', '*', '◉', '◎', '⚡' }\n",
    );
    out.push_str(&colorize("\nPress '?' again to return\n", gold));
    out
}
