//! Boot-sequence act: a timer-paced reveal of the model roster.

use crate::color::{Rgb, colorize};

/// One roster entry: name, role, status icon.
struct BootEntry {
    name: &'static str,
    role: &'static str,
    icon: &'static str,
}

/// Frames between line reveals (100ms at 30 FPS).
const FRAMES_PER_LINE: u64 = 3;

const ENTRIES: [BootEntry; 6] = [
    BootEntry { name: "Claude", role: "Logical Reasoning", icon: "🧩" },
    BootEntry { name: "Gemini", role: "System Architecture", icon: "⚙️" },
    BootEntry { name: "Codex", role: "Code Generation", icon: "💻" },
    BootEntry { name: "Qwen", role: "Research Pipeline", icon: "🔎" },
    BootEntry { name: "Grok", role: "Chaos Engine", icon: "🤖" },
    BootEntry { name: "GPT", role: "Language Core", icon: "✅" },
];

const HEADER_COLOR: Rgb = Rgb::new(0, 255, 255);
const ENTRY_COLOR: Rgb = Rgb::new(10, 255, 10);
const BANNER_COLOR: Rgb = Rgb::new(255, 174, 0);

/// Scripted boot log. Stateless: the output is a pure function of the
/// supplied frame count, which only ever reveals more lines, never fewer.
#[derive(Clone, Copy, Debug, Default)]
pub struct BootSequence;

impl BootSequence {
    /// Creates the boot sequence.
    pub fn new() -> Self {
        Self
    }

    /// Renders the reveal state for the given frame count.
    pub fn render(&self, frame: u64) -> String {
        let lines_shown = (frame / FRAMES_PER_LINE).min(ENTRIES.len() as u64) as usize;

        let mut out = String::new();
        out.push_str(&colorize("> [CORTEX NEURAL CORE v0.1.0]\n", HEADER_COLOR));
        out.push_str(">\n");

        for (i, entry) in ENTRIES.iter().take(lines_shown).enumerate() {
            let prefix = if i == ENTRIES.len() - 1 { "└─" } else { "├─" };
            let line = format!(
                "> {} {} ▸ {}: ONLINE {}\n",
                prefix, entry.name, entry.role, entry.icon
            );
            out.push_str(&colorize(&line, ENTRY_COLOR));
        }

        if lines_shown >= ENTRIES.len() {
            out.push_str(">\n");
            out.push_str(&colorize("> ⚡ EVERY MIND. ONE TERMINAL.\n", BANNER_COLOR));
        }

        out
    }
}
