//! Matrix-style falling character rain with a deterministic logo reveal.
//!
//! A fixed pool of streams falls over the grid; expired streams are
//! regenerated in place so the pool never grows. A target logo fades in
//! from behind the rain under a per-cell reveal mask that is a pure
//! function of cell position and fade progress, so the reveal order is
//! stable for a given frame count even though the rain itself is random.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::{self, Rgb};

/// Fraction of terminal columns carrying an active stream.
const STREAM_DENSITY_PERCENT: usize = 60;
const MIN_STREAM_LENGTH: usize = 5;
const MAX_STREAM_LENGTH: usize = 20;
/// Fall speed range in cells per frame.
const MIN_STREAM_SPEED: f64 = 0.3;
const MAX_STREAM_SPEED: f64 = 1.0;
/// Stream lifetime range in frames.
const MIN_STREAM_AGE: u32 = 60;
const MAX_STREAM_AGE: u32 = 180;

/// Frames for the full logo fade-in (3s at 30 FPS).
const LOGO_FADE_FRAMES: f64 = 90.0;
/// Fade progress at which cells start revealing.
const LOGO_REVEAL_THRESHOLD: f64 = 0.5;
/// Probability of one glyph mutating per stream per frame.
const CHAR_MUTATION_CHANCE: f64 = 0.1;

/// Intensity tier thresholds; the visual signature of the effect.
const INTENSITY_HEAD_MIN: f64 = 0.8;
const INTENSITY_BRIGHT_MIN: f64 = 0.5;
const INTENSITY_MID_MIN: f64 = 0.3;

/// Bright accent used for revealed logo glyphs.
const LOGO_COLOR: Rgb = Rgb::new(0, 255, 170);

/// Rain glyph pool: katakana, digits, and terminal punctuation.
const RAIN_GLYPHS: [char; 71] = [
    'ア', 'イ', 'ウ', 'エ', 'オ', 'カ', 'キ', 'ク', 'ケ', 'コ', //
    'サ', 'シ', 'ス', 'セ', 'ソ', 'タ', 'チ', 'ツ', 'テ', 'ト', //
    'ナ', 'ニ', 'ヌ', 'ネ', 'ノ', 'ハ', 'ヒ', 'フ', 'ヘ', 'ホ', //
    'マ', 'ミ', 'ム', 'メ', 'モ', 'ヤ', 'ユ', 'ヨ', 'ラ', 'リ', //
    'ル', 'レ', 'ロ', 'ワ', 'ヲ', 'ン', //
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', //
    ':', '.', '=', '*', '+', '-', '<', '>', '¦', '|', //
    '"', '\'', '^', '~', '`',
];

/// One falling column of characters.
///
/// A stream's identity is never referenced externally; when it expires it is
/// replaced in place by a freshly generated one.
struct RainStream {
    column: usize,
    /// Fractional head position; may start above the visible area.
    y: f64,
    speed: f64,
    glyphs: Vec<char>,
    age: u32,
    max_age: u32,
}

impl RainStream {
    fn spawn(width: usize, height: usize, rng: &mut StdRng) -> Self {
        let length = rng.random_range(MIN_STREAM_LENGTH..=MAX_STREAM_LENGTH);
        let glyphs = (0..length)
            .map(|_| RAIN_GLYPHS[rng.random_range(0..RAIN_GLYPHS.len())])
            .collect();

        Self {
            column: rng.random_range(0..width.max(1)),
            y: -(rng.random_range(0..height.max(1)) as f64),
            speed: rng.random_range(MIN_STREAM_SPEED..MAX_STREAM_SPEED),
            glyphs,
            age: 0,
            max_age: rng.random_range(MIN_STREAM_AGE..=MAX_STREAM_AGE),
        }
    }

    fn expired(&self, height: usize) -> bool {
        self.age >= self.max_age || self.y > (height + self.glyphs.len()) as f64
    }
}

/// Renders the falling rain and fades the logo in behind it.
pub struct MatrixRain {
    width: usize,
    height: usize,
    streams: Vec<RainStream>,
    logo_lines: Vec<Vec<char>>,
    logo_start_x: usize,
    logo_start_y: usize,
    frame: u64,
    screen: Vec<char>,
    intensity: Vec<f64>,
    mask: Vec<bool>,
    rng: StdRng,
}

impl MatrixRain {
    /// Creates a rain renderer with operating-system entropy.
    pub fn new(width: u16, height: u16, logo: &str) -> Self {
        Self::with_rng(width, height, logo, StdRng::from_os_rng())
    }

    /// Creates a rain renderer with a fixed seed, for reproducible runs.
    pub fn with_seed(width: u16, height: u16, logo: &str, seed: u64) -> Self {
        Self::with_rng(width, height, logo, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: u16, height: u16, logo: &str, mut rng: StdRng) -> Self {
        let width = width as usize;
        let height = height as usize;
        let size = width * height;

        let logo_lines: Vec<Vec<char>> = logo
            .trim_matches('\n')
            .lines()
            .map(|line| line.chars().collect())
            .collect();
        let logo_width = logo_lines.iter().map(Vec::len).max().unwrap_or(0);
        let logo_start_x = width.saturating_sub(logo_width) / 2;
        let logo_start_y = height.saturating_sub(logo_lines.len()) / 2;

        let stream_count = width * STREAM_DENSITY_PERCENT / 100;
        let streams = (0..stream_count)
            .map(|_| RainStream::spawn(width, height, &mut rng))
            .collect();

        Self {
            width,
            height,
            streams,
            logo_lines,
            logo_start_x,
            logo_start_y,
            frame: 0,
            screen: vec![' '; size],
            intensity: vec![0.0; size],
            mask: vec![false; size],
            rng,
        }
    }

    /// Current frame number.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advances the animation by one frame.
    pub fn update(&mut self) {
        self.frame += 1;

        for i in 0..self.streams.len() {
            let stream = &mut self.streams[i];
            stream.y += stream.speed;
            stream.age += 1;

            if self.rng.random::<f64>() < CHAR_MUTATION_CHANCE {
                let idx = self.rng.random_range(0..stream.glyphs.len());
                stream.glyphs[idx] = RAIN_GLYPHS[self.rng.random_range(0..RAIN_GLYPHS.len())];
            }

            if stream.expired(self.height) {
                self.streams[i] = RainStream::spawn(self.width, self.height, &mut self.rng);
            }
        }

        self.update_reveal_mask();
    }

    /// Recomputes the logo reveal mask from fade progress.
    ///
    /// Reveal order depends only on cell position and progress, so it is
    /// identical across runs and monotonic across frames.
    fn update_reveal_mask(&mut self) {
        let fade_progress = (self.frame as f64 / LOGO_FADE_FRAMES).min(1.0);

        self.mask.fill(false);

        if fade_progress <= LOGO_REVEAL_THRESHOLD {
            return;
        }
        let reveal_threshold =
            (fade_progress - LOGO_REVEAL_THRESHOLD) / (1.0 - LOGO_REVEAL_THRESHOLD);

        for (ly, line) in self.logo_lines.iter().enumerate() {
            let y = self.logo_start_y + ly;
            if y >= self.height {
                continue;
            }

            for (lx, glyph) in line.iter().enumerate() {
                let x = self.logo_start_x + lx;
                if x >= self.width || *glyph == ' ' {
                    continue;
                }

                let pos_hash = ((x * 7 + y * 13) % 100) as f64 / 100.0;
                if pos_hash < reveal_threshold {
                    self.mask[y * self.width + x] = true;
                }
            }
        }
    }

    /// Composites the current frame into a colored string.
    pub fn render(&mut self) -> String {
        self.screen.fill(' ');
        self.intensity.fill(0.0);

        // Paint streams; on overlap the brighter cell wins, never additive.
        for stream in &self.streams {
            let length = stream.glyphs.len();
            for j in 0..length {
                let y = stream.y as isize - j as isize;
                if y < 0 || y >= self.height as isize || stream.column >= self.width {
                    continue;
                }

                let idx = y as usize * self.width + stream.column;
                let dist_from_head = j as f64 / length as f64;
                let cell_intensity = 1.0 - dist_from_head * 0.8;

                if cell_intensity > self.intensity[idx] {
                    self.intensity[idx] = cell_intensity;
                    self.screen[idx] = stream.glyphs[j];
                }
            }
        }

        let mut out = String::with_capacity(self.width * self.height * 20);

        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;

                // Revealed logo wins over rain.
                if self.mask[idx] {
                    if let Some(glyph) = self.logo_glyph_at(x, y) {
                        out.push_str(&color::colorize(&glyph.to_string(), LOGO_COLOR));
                        continue;
                    }
                }

                let ch = self.screen[idx];
                if ch == ' ' {
                    out.push(' ');
                } else {
                    out.push_str(&colorize_by_intensity(ch, self.intensity[idx]));
                }
            }
            if y < self.height - 1 {
                out.push('\n');
            }
        }

        out
    }

    /// Returns the non-blank logo glyph covering a grid cell, if any.
    fn logo_glyph_at(&self, x: usize, y: usize) -> Option<char> {
        let ly = y.checked_sub(self.logo_start_y)?;
        let lx = x.checked_sub(self.logo_start_x)?;
        let glyph = *self.logo_lines.get(ly)?.get(lx)?;
        (glyph != ' ').then_some(glyph)
    }
}

/// Colors a rain glyph by its intensity tier: near-white head, bright green
/// upper section, standard green middle, dimmed green tail.
fn colorize_by_intensity(ch: char, intensity: f64) -> String {
    let color = if intensity > INTENSITY_HEAD_MIN {
        Rgb::new(220, 255, 220)
    } else if intensity > INTENSITY_BRIGHT_MIN {
        Rgb::new(50, 255, 130)
    } else if intensity > INTENSITY_MID_MIN {
        Rgb::new(0, 255, 100)
    } else {
        Rgb::new(0, (100.0 + intensity * 100.0) as u8, 40)
    };
    color::colorize(&ch.to_string(), color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logo::CORTEX_LOGO;

    #[test]
    fn test_stream_pool_sized_to_density() {
        let rain = MatrixRain::with_seed(100, 30, CORTEX_LOGO, 7);
        assert_eq!(rain.streams.len(), 60);
    }

    #[test]
    fn test_expired_streams_respawn_in_place() {
        let mut rain = MatrixRain::with_seed(80, 24, CORTEX_LOGO, 42);
        let pool_size = rain.streams.len();

        for _ in 0..400 {
            rain.update();
            assert_eq!(rain.streams.len(), pool_size);
            for stream in &rain.streams {
                assert!(stream.age <= stream.max_age, "stream outlived its lifetime");
                assert!(
                    stream.y <= (rain.height + stream.glyphs.len()) as f64 + MAX_STREAM_SPEED,
                    "stream fell past the respawn bound"
                );
            }
        }
    }

    #[test]
    fn test_buffers_stay_constant_over_many_frames() {
        let mut rain = MatrixRain::with_seed(80, 24, CORTEX_LOGO, 1);
        let (screen_len, intensity_len) = (rain.screen.len(), rain.intensity.len());

        for _ in 0..120 {
            rain.update();
            let _ = rain.render();
        }

        assert_eq!(rain.screen.len(), screen_len);
        assert_eq!(rain.intensity.len(), intensity_len);
    }

    #[test]
    fn test_reveal_mask_is_rng_independent() {
        let mut a = MatrixRain::with_seed(80, 24, CORTEX_LOGO, 3);
        let mut b = MatrixRain::with_seed(80, 24, CORTEX_LOGO, 99);

        for _ in 0..70 {
            a.update();
            b.update();
        }

        assert_eq!(a.mask, b.mask);
        assert!(a.mask.iter().any(|cell| *cell), "mask empty past the reveal threshold");
    }

    #[test]
    fn test_reveal_mask_is_monotonic() {
        let mut rain = MatrixRain::with_seed(80, 24, CORTEX_LOGO, 5);
        let mut revealed = vec![false; rain.mask.len()];

        for _ in 0..120 {
            rain.update();
            for (idx, cell) in rain.mask.iter().enumerate() {
                if revealed[idx] {
                    assert!(*cell, "cell {idx} un-revealed after being revealed");
                }
                if *cell {
                    revealed[idx] = true;
                }
            }
        }
    }

    #[test]
    fn test_full_fade_reveals_entire_logo() {
        let mut rain = MatrixRain::with_seed(80, 24, CORTEX_LOGO, 11);
        for _ in 0..90 {
            rain.update();
        }

        for (ly, line) in rain.logo_lines.clone().iter().enumerate() {
            let y = rain.logo_start_y + ly;
            for (lx, glyph) in line.iter().enumerate() {
                let x = rain.logo_start_x + lx;
                if *glyph != ' ' && x < rain.width && y < rain.height {
                    assert!(rain.mask[y * rain.width + x], "logo cell ({x},{y}) not revealed");
                }
            }
        }
    }

    #[test]
    fn test_no_reveal_before_threshold() {
        let mut rain = MatrixRain::with_seed(80, 24, CORTEX_LOGO, 13);
        for _ in 0..45 {
            rain.update();
        }
        assert!(rain.mask.iter().all(|cell| !*cell));
    }

    #[test]
    fn test_render_produces_full_grid() {
        let mut rain = MatrixRain::with_seed(80, 24, CORTEX_LOGO, 21);
        for _ in 0..30 {
            rain.update();
        }
        let frame = rain.render();
        assert_eq!(frame.lines().count(), 24);
    }

    #[test]
    fn test_overlap_keeps_brighter_intensity() {
        let mut rain = MatrixRain::with_seed(80, 24, CORTEX_LOGO, 2);

        // Force two streams onto the same column with the heads apart so the
        // tail of one crosses the head region of the other.
        rain.streams.truncate(2);
        rain.streams[0].column = 10;
        rain.streams[0].y = 12.0;
        rain.streams[1].column = 10;
        rain.streams[1].y = 8.0;

        let _ = rain.render();

        // The head cell of the second stream overlaps the first stream's
        // tail; its intensity must be the head value, not the dimmer one.
        let head_idx = 8 * rain.width + 10;
        assert!(rain.intensity[head_idx] >= 1.0 - f64::EPSILON);
    }
}
