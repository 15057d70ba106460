//! Injected process environment for capability detection and config loading.
//!
//! Detection and config code never touch `std::env` directly; they read
//! through [`EnvSource`] so tests can substitute a fixed environment without
//! mutating process state.

use std::collections::HashMap;

/// Read-only view of the process environment and terminal geometry.
pub trait EnvSource {
    /// Returns the value of an environment variable, if set and non-empty.
    fn var(&self, key: &str) -> Option<String>;

    /// Returns the terminal size as `(width, height)`, if it can be read.
    fn terminal_size(&self) -> Option<(u16, u16)>;
}

/// The real process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemEnv;

impl EnvSource for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }

    fn terminal_size(&self) -> Option<(u16, u16)> {
        crossterm::terminal::size().ok()
    }
}

/// Fixed in-memory environment for tests.
#[derive(Clone, Debug, Default)]
pub struct FixedEnv {
    vars: HashMap<String, String>,
    size: Option<(u16, u16)>,
}

impl FixedEnv {
    /// Creates an empty environment with no terminal size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a variable, returning self for chaining.
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    /// Sets the reported terminal size.
    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.size = Some((width, height));
        self
    }
}

impl EnvSource for FixedEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).filter(|v| !v.is_empty()).cloned()
    }

    fn terminal_size(&self) -> Option<(u16, u16)> {
        self.size
    }
}
