//! Animated terminal splash screen for Cortex.
//!
//! A self-contained, single-threaded animation engine that renders a
//! rotating 3D ASCII torus (the "neural cortex"), a matrix-style character
//! rain with a logo reveal, and scripted boot/closer screens, then hands
//! control back to the host:
//!
//! - [`Splash`] - the state machine driven by host events, emitting commands
//! - [`CortexRenderer`] / [`MatrixRain`] - the two animated visuals
//! - [`TermProfile`] - terminal capability detection and degradation rules
//! - [`ConfigStore`] / [`SplashConfig`] - persisted preferences and the
//!   first-run marker
//!
//! # Architecture
//!
//! The host owns the event loop and the terminal. The engine is purely
//! synchronous: every [`Splash::update`] consumes one event (tick, key, or
//! resize) and returns follow-up [`Command`]s, and [`Splash::view`] produces
//! the complete next frame as a single string for the host to draw.
//!
//! ```no_run
//! use cortex_splash::{Splash, SplashEvent};
//! use std::time::Instant;
//!
//! let mut splash = Splash::new(80, 24, None);
//! let mut pending = splash.init();
//!
//! while !splash.is_done() {
//!     // Host: wait for the scheduled tick or an input event, then:
//!     pending = splash.update(SplashEvent::Tick(Instant::now()));
//!     let frame = splash.view();
//!     // Host: draw `frame`, process `pending` commands.
//!     # let _ = (frame, &pending);
//!     # break;
//! }
//! ```

pub mod boot;
pub mod closer;
pub mod color;
pub mod config;
pub mod cortex;
pub mod env;
pub mod error;
pub mod fallback;
pub mod logo;
pub mod rain;
pub mod splash;
pub mod term;

pub use boot::BootSequence;
pub use closer::Closer;
pub use color::Rgb;
pub use config::{ConfigStore, SplashConfig, SplashFrequency, should_show};
pub use cortex::{ColorStyle, CortexRenderer};
pub use env::{EnvSource, SystemEnv};
pub use error::{Error, Result};
pub use fallback::TextOnlySplash;
pub use logo::CORTEX_LOGO;
pub use rain::MatrixRain;
pub use splash::{Act, Command, Key, Splash, SplashEvent};
pub use term::{ColorSupport, Performance, TermProfile};
