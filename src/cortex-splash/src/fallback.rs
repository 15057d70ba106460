//! Simplified text-only splash for limited terminals, plus the shared
//! ANSI-aware centering helpers.

use unicode_width::UnicodeWidthStr;

use crate::color::{Rgb, colorize};

const CYAN: Rgb = Rgb::new(0, 255, 255);
const GOLD: Rgb = Rgb::new(255, 174, 0);
const GREEN: Rgb = Rgb::new(10, 255, 10);
const GRAY: Rgb = Rgb::new(100, 100, 100);

/// Static, animation-free splash used when the terminal cannot carry the
/// full animation (too small, basic colors, or no Unicode).
#[derive(Clone, Copy, Debug)]
pub struct TextOnlySplash {
    width: u16,
    height: u16,
}

impl TextOnlySplash {
    /// Creates a text-only splash for the given terminal size.
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Renders the static splash, vertically and horizontally centered.
    pub fn render(&self) -> String {
        let width = self.width as usize;
        let mut out = String::new();

        let top_padding = (self.height as usize).saturating_sub(15) / 2;
        for _ in 0..top_padding {
            out.push('\n');
        }

        let bar = "═══════════════════════════════════";
        out.push_str(&center_text(bar, width));
        out.push('\n');
        out.push_str(&center_text(&colorize("CORTEX NEURAL CORE", CYAN), width));
        out.push('\n');
        out.push_str(&center_text(bar, width));
        out.push_str("\n\n");

        let roster = [
            ("🧩 Claude", "Logical Reasoning"),
            ("⚙️  Gemini", "System Architecture"),
            ("💻 Codex", "Code Generation"),
            ("🔎 Qwen", "Research Pipeline"),
            ("🤖 Grok", "Chaos Engine"),
            ("✅ GPT", "Language Core"),
        ];
        for (name, role) in roster {
            let line = format!("{}  • {}", colorize(name, GREEN), role);
            out.push_str(&center_text(&line, width));
            out.push('\n');
        }
        out.push('\n');

        out.push_str(&center_text(&colorize("⚡ EVERY MIND. ONE TERMINAL.", GOLD), width));
        out.push_str("\n\n");
        out.push_str(&center_text(&colorize("Press any key to continue...", GRAY), width));

        out
    }
}

/// Static rendition of the closer screen for reduced-motion runs.
pub fn static_closer(width: u16, height: u16) -> String {
    let width = width as usize;
    let mut out = String::new();

    let top_padding = (height as usize).saturating_sub(8) / 2;
    for _ in 0..top_padding {
        out.push('\n');
    }

    let rows = [
        "╔════════════════════════════════════╗".to_string(),
        "║                                    ║".to_string(),
        format!("║  {}  ║", colorize("🌀 CORTEX NEURAL LINK ACTIVE 🌀", CYAN)),
        "║                                    ║".to_string(),
        format!("║    {}    ║", colorize("Every mind. One terminal.", GOLD)),
        "║                                    ║".to_string(),
        "╚════════════════════════════════════╝".to_string(),
    ];
    for (i, row) in rows.iter().enumerate() {
        out.push_str(&center_text(row, width));
        if i < rows.len() - 1 {
            out.push('\n');
        }
    }

    out
}

/// Centers a string within the given column count, measuring only visible
/// glyph width (ANSI escapes stripped, wide glyphs counted as two columns).
pub fn center_text(text: &str, width: usize) -> String {
    let visible = visible_width(text);
    if visible >= width {
        return text.to_string();
    }
    let padding = (width - visible) / 2;
    format!("{}{}", " ".repeat(padding), text)
}

/// Visible column width of a string, ignoring ANSI escape sequences.
pub fn visible_width(text: &str) -> usize {
    strip_ansi(text).width()
}

/// Removes ANSI CSI escape sequences (`ESC [ ... m` and friends).
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // Consume parameters up to and including the final byte.
            for escaped in chars.by_ref() {
                if escaped.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        out.push(ch);
    }

    out
}
