//! RGB color values, truecolor escape sequences, and the splash gradients.
//!
//! Colors are plain 8-bit-per-channel values. Everything here is a pure
//! function: inputs outside the expected ranges are clamped, never rejected,
//! so renderers can feed raw angles and interpolation parameters straight in.

use std::f64::consts::TAU;
use std::fmt;

/// ANSI reset sequence, terminating every colorized span.
pub const RESET: &str = "\x1b[0m";

/// An RGB color with 8-bit components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgb {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its components.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns the ANSI truecolor foreground escape for this color.
    pub fn ansi(&self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }

    /// Returns the `#RRGGBB` hex representation.
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Scales the color by an opacity in `[0.0, 1.0]` (clamped).
    pub fn scale(&self, opacity: f64) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        Self {
            r: (f64::from(self.r) * opacity) as u8,
            g: (f64::from(self.g) * opacity) as u8,
            b: (f64::from(self.b) * opacity) as u8,
        }
    }

    /// Returns a brightened variant, each channel scaled by 1.5 and clamped.
    pub fn brightened(&self) -> Self {
        Self {
            r: (f64::from(self.r) * 1.5).min(255.0) as u8,
            g: (f64::from(self.g) * 1.5).min(255.0) as u8,
            b: (f64::from(self.b) * 1.5).min(255.0) as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

/// Linearly interpolates between two colors at `t` in `[0.0, 1.0]` (clamped).
pub fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (f64::from(a) * (1.0 - t) + f64::from(b) * t) as u8;
    Rgb {
        r: channel(a.r, b.r),
        g: channel(a.g, b.g),
        b: channel(a.b, b.b),
    }
}

/// Wraps text in a truecolor escape followed by a reset.
pub fn colorize(text: &str, color: Rgb) -> String {
    format!("{}{}{}", color.ansi(), text, RESET)
}

/// Normalizes an arbitrary angle (radians) into `[0.0, 1.0)` over a full turn.
fn normalize_angle(angle: f64) -> f64 {
    let mut t = (angle % TAU) / TAU;
    if t < 0.0 {
        t += 1.0;
    }
    t
}

/// Returns a color from the cyan-to-magenta sweep for the given angle.
///
/// The sweep is periodic over `2π`: `sweep_color(a) == sweep_color(a + 2π)`.
pub fn sweep_color(angle: f64) -> Rgb {
    const CYAN: Rgb = Rgb::new(0, 255, 255);
    const MAGENTA: Rgb = Rgb::new(255, 0, 255);
    lerp(CYAN, MAGENTA, normalize_angle(angle))
}

/// Seven-stop rainbow palette, red through violet.
const RAINBOW_STOPS: [Rgb; 7] = [
    Rgb::new(255, 0, 0),
    Rgb::new(255, 127, 0),
    Rgb::new(255, 255, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 255, 255),
    Rgb::new(0, 0, 255),
    Rgb::new(148, 0, 211),
];

/// Returns a color from the full rainbow sweep for the given angle.
///
/// The angle is normalized across the seven stops and the two nearest stops
/// are interpolated, wrapping violet back around to red.
pub fn rainbow_color(angle: f64) -> Rgb {
    let t = normalize_angle(angle) * RAINBOW_STOPS.len() as f64;
    let idx = (t as usize) % RAINBOW_STOPS.len();
    let next = (idx + 1) % RAINBOW_STOPS.len();
    lerp(RAINBOW_STOPS[idx], RAINBOW_STOPS[next], t.fract())
}

/// Returns a color from a brand gradient seeded by a single accent color.
///
/// Sweeps from the accent to its brightened variant across the full turn.
pub fn brand_gradient(accent: Rgb, angle: f64) -> Rgb {
    lerp(accent, accent.brightened(), normalize_angle(angle))
}
