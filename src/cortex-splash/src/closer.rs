//! Closer act: a static centered message box shown before handoff.

use crate::color::{Rgb, colorize};
use crate::fallback::{center_text, visible_width};

const TITLE_COLOR: Rgb = Rgb::new(0, 255, 170);
const MESSAGE_COLOR: Rgb = Rgb::new(0, 204, 136);

const TITLE: &str = "🌀 CORTEX NEURAL LINK ACTIVE 🌀";
const QUOTE: [&str; 3] = [
    "\"Every model fused. Every edge case covered.",
    "You're not just coding.",
    "You're orchestrating intelligence.\"",
];
const PROMPT: &str = "Press any key to begin...";

/// Final screen of the scripted sequence. Fully rendered on every call;
/// centering is the only computed layout step.
#[derive(Clone, Copy, Debug)]
pub struct Closer {
    width: u16,
    height: u16,
}

impl Closer {
    /// Creates a closer sized to the terminal.
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Renders the centered message box.
    pub fn render(&self) -> String {
        let term_width = self.width as usize;

        // Responsive box: 70% of the terminal, clamped to 50..=70 columns.
        let content_width = (term_width * 7 / 10).clamp(50, 70);
        let inner = content_width - 2;

        let mut rows: Vec<String> = Vec::new();
        rows.push(format!("╭{}╮", "─".repeat(inner)));
        rows.push(boxed(inner, ""));
        rows.push(boxed(inner, &colorize(TITLE, TITLE_COLOR)));
        rows.push(boxed(inner, ""));
        for line in QUOTE {
            rows.push(boxed(inner, &colorize(line, MESSAGE_COLOR)));
        }
        rows.push(boxed(inner, ""));
        rows.push(boxed(inner, &colorize(PROMPT, TITLE_COLOR)));
        rows.push(boxed(inner, ""));
        rows.push(format!("╰{}╯", "─".repeat(inner)));

        let mut out = String::new();
        let top_padding = (self.height as usize).saturating_sub(rows.len()) / 2;
        for _ in 0..top_padding {
            out.push('\n');
        }
        for (i, row) in rows.iter().enumerate() {
            out.push_str(&center_text(row, term_width));
            if i < rows.len() - 1 {
                out.push('\n');
            }
        }

        out
    }
}

/// Wraps a content line in the box borders, centered within the interior.
fn boxed(inner: usize, content: &str) -> String {
    let centered = center_text(content, inner);
    let fill = inner.saturating_sub(visible_width(&centered));
    format!("│{}{}│", centered, " ".repeat(fill))
}
