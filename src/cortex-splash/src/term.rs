//! Terminal capability detection.
//!
//! Derives a [`TermProfile`] from environment variables and the reported
//! terminal size, then decides whether the full animation, the simplified
//! text splash, or nothing at all should run. Detection is conservative:
//! anything unreadable falls back to a safe default instead of failing.

use tracing::debug;

use crate::env::EnvSource;

/// Color support tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ColorSupport {
    /// Basic 16 colors.
    #[default]
    Basic,
    /// 256 color palette.
    Extended,
    /// 24-bit true color.
    TrueColor,
}

impl ColorSupport {
    /// Returns the tier's name as used in config files and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorSupport::Basic => "16",
            ColorSupport::Extended => "256",
            ColorSupport::TrueColor => "truecolor",
        }
    }
}

/// Coarse rendering performance estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Performance {
    /// Local, modern terminal.
    #[default]
    Fast,
    /// Remote session or otherwise constrained.
    Medium,
    /// Known-slow environment.
    Slow,
}

/// Minimum size below which the animation degrades to the text fallback.
const MIN_FULL_WIDTH: u16 = 80;
const MIN_FULL_HEIGHT: u16 = 24;

/// Absolute floor below which the splash is skipped outright.
const MIN_ANY_WIDTH: u16 = 60;
const MIN_ANY_HEIGHT: u16 = 20;

/// Fallback geometry when the size cannot be read.
const DEFAULT_SIZE: (u16, u16) = (80, 24);

/// Detected terminal capabilities.
///
/// Computed once at startup (or on resize) and treated as read-only by
/// every consumer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TermProfile {
    /// Terminal width in columns.
    pub width: u16,
    /// Terminal height in rows.
    pub height: u16,
    /// Detected color tier.
    pub colors: ColorSupport,
    /// Whether the terminal can be expected to render Unicode glyphs.
    pub unicode: bool,
    /// Coarse performance estimate (heuristic, not measured).
    pub performance: Performance,
    /// Whether the terminal is below the full-animation minimum.
    pub too_small: bool,
}

impl Default for TermProfile {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE.0,
            height: DEFAULT_SIZE.1,
            colors: ColorSupport::Basic,
            unicode: true,
            performance: Performance::Fast,
            too_small: false,
        }
    }
}

impl TermProfile {
    /// Detects capabilities from the given environment.
    pub fn detect(env: &dyn EnvSource) -> Self {
        let (width, height) = env.terminal_size().unwrap_or(DEFAULT_SIZE);

        let profile = Self {
            width,
            height,
            colors: detect_color_support(env),
            unicode: detect_unicode(env),
            performance: estimate_performance(env),
            too_small: width < MIN_FULL_WIDTH || height < MIN_FULL_HEIGHT,
        };

        debug!(
            width = profile.width,
            height = profile.height,
            colors = profile.colors.as_str(),
            unicode = profile.unicode,
            "terminal capabilities detected"
        );

        profile
    }

    /// Returns whether the simplified text splash should replace the animation.
    pub fn should_use_fallback(&self) -> bool {
        self.too_small || self.colors == ColorSupport::Basic || !self.unicode
    }

    /// Returns whether the splash should be skipped entirely.
    ///
    /// Below this floor not even the text fallback fits.
    pub fn should_skip_splash(&self) -> bool {
        self.width < MIN_ANY_WIDTH || self.height < MIN_ANY_HEIGHT
    }
}

/// Detects the color tier, in priority order.
fn detect_color_support(env: &dyn EnvSource) -> ColorSupport {
    // COLORTERM is the most reliable truecolor signal.
    if let Some(colorterm) = env.var("COLORTERM") {
        if colorterm == "truecolor" || colorterm == "24bit" {
            return ColorSupport::TrueColor;
        }
    }

    if let Some(term) = env.var("TERM") {
        if term.contains("256color") {
            return ColorSupport::Extended;
        }
    }

    // Explicit opt-out of color.
    if env.var("NO_COLOR").is_some() {
        return ColorSupport::Basic;
    }

    ColorSupport::Basic
}

/// Detects Unicode support.
fn detect_unicode(env: &dyn EnvSource) -> bool {
    // Legacy Windows console without Windows Terminal has spotty coverage.
    if cfg!(windows) && env.var("WT_SESSION").is_none() {
        return false;
    }

    if let Some(lang) = env.var("LANG") {
        if lang.to_lowercase().contains("utf") {
            return true;
        }
    }

    // Modern default.
    true
}

/// Estimates rendering performance from session hints. A heuristic, not a
/// measurement; the adaptive frame-rate controller corrects at runtime.
fn estimate_performance(env: &dyn EnvSource) -> Performance {
    // Remote sessions pay for every frame on the wire.
    if env.var("SSH_CONNECTION").is_some() {
        return Performance::Medium;
    }

    Performance::Fast
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::FixedEnv;

    #[test]
    fn test_truecolor_hint_wins() {
        let env = FixedEnv::new()
            .with_var("COLORTERM", "truecolor")
            .with_var("TERM", "xterm-256color")
            .with_var("NO_COLOR", "1")
            .with_size(100, 40);
        let profile = TermProfile::detect(&env);
        assert_eq!(profile.colors, ColorSupport::TrueColor);
    }

    #[test]
    fn test_256color_term() {
        let env = FixedEnv::new().with_var("TERM", "screen-256color").with_size(100, 40);
        assert_eq!(TermProfile::detect(&env).colors, ColorSupport::Extended);
    }

    #[test]
    fn test_no_color_forces_basic() {
        let env = FixedEnv::new()
            .with_var("TERM", "xterm")
            .with_var("NO_COLOR", "1")
            .with_size(100, 40);
        assert_eq!(TermProfile::detect(&env).colors, ColorSupport::Basic);
    }

    #[test]
    fn test_conservative_color_default() {
        let env = FixedEnv::new().with_size(100, 40);
        assert_eq!(TermProfile::detect(&env).colors, ColorSupport::Basic);
    }

    #[test]
    fn test_size_fallback_when_unreadable() {
        let env = FixedEnv::new().with_var("COLORTERM", "truecolor");
        let profile = TermProfile::detect(&env);
        assert_eq!((profile.width, profile.height), (80, 24));
        assert!(!profile.too_small);
    }

    #[test]
    fn test_too_small_flag() {
        let env = FixedEnv::new().with_size(79, 24);
        assert!(TermProfile::detect(&env).too_small);

        let env = FixedEnv::new().with_size(80, 23);
        assert!(TermProfile::detect(&env).too_small);

        let env = FixedEnv::new().with_size(80, 24);
        assert!(!TermProfile::detect(&env).too_small);
    }

    #[test]
    fn test_skip_guard() {
        let env = FixedEnv::new().with_size(30, 10);
        assert!(TermProfile::detect(&env).should_skip_splash());

        let env = FixedEnv::new().with_size(80, 24);
        assert!(!TermProfile::detect(&env).should_skip_splash());
    }

    #[test]
    fn test_ssh_lowers_performance() {
        let env = FixedEnv::new()
            .with_var("SSH_CONNECTION", "10.0.0.1 22 10.0.0.2 22")
            .with_size(100, 40);
        assert_eq!(TermProfile::detect(&env).performance, Performance::Medium);

        let env = FixedEnv::new().with_size(100, 40);
        assert_eq!(TermProfile::detect(&env).performance, Performance::Fast);
    }

    #[test]
    fn test_fallback_on_basic_colors() {
        let env = FixedEnv::new().with_size(100, 40);
        let profile = TermProfile::detect(&env);
        assert!(profile.should_use_fallback());

        let env = FixedEnv::new()
            .with_var("COLORTERM", "24bit")
            .with_var("WT_SESSION", "1")
            .with_size(100, 40);
        let profile = TermProfile::detect(&env);
        assert!(!profile.should_use_fallback());
    }
}
