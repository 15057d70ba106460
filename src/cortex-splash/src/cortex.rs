//! The rotating 3D torus ("neural cortex") renderer.
//!
//! Classic donut math: a parametric torus is swept at fixed angular steps,
//! rotated by two persistent angles, perspective-projected onto the
//! character grid through a depth buffer, and shaded by mapping a
//! closed-form luminance onto an 8-glyph ramp. Color is applied in a
//! separate pass so the coloring mode never affects geometry or shading.

use std::f64::consts::TAU;

use crate::color::{self, Rgb};

/// Luminance ramp, sparse to dense, indexed by shading level.
const LUMINANCE_RAMP: [char; 8] = [' ', '.', '·', ':', '*', '◉', '◎', '⚡'];

/// Torus shape: distance from center to tube center, and tube thickness.
const MAJOR_RADIUS: f64 = 2.0;
const MINOR_RADIUS: f64 = 1.0;

/// Angular sweep steps: ~90 samples around the ring, ~314 around the tube.
const THETA_STEP: f64 = 0.07;
const PHI_STEP: f64 = 0.02;

/// Camera offset along the view axis.
const CAMERA_DISTANCE: f64 = 5.0;

/// Focal scales; the horizontal one is doubled to correct for character
/// cells being roughly twice as tall as wide.
const FOCAL_X: f64 = 30.0;
const FOCAL_Y: f64 = 15.0;

/// Per-frame rotation increments. The asymmetric rates produce a tumbling,
/// non-repeating precession.
const TILT_RATE: f64 = 0.04;
const SPIN_RATE: f64 = 0.02;

/// Hidden message overlaid on a deterministic schedule.
const SECRET_MESSAGE: &str = "THE CORTEX SEES YOU";

/// Coloring mode for the final per-glyph color lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ColorStyle {
    /// Cyan-to-magenta sweep rotating with the torus.
    #[default]
    Sweep,
    /// Full rainbow sweep (Konami easter egg).
    Rainbow,
    /// Gradient between an accent color and its brightened variant.
    Brand(Rgb),
}

/// Renders the rotating torus into owned character/depth arenas.
///
/// Both arenas are renderer-private, indexed `y * width + x`, and fully
/// overwritten at the start of every frame; their contents are unspecified
/// between frames.
pub struct CortexRenderer {
    width: usize,
    height: usize,
    /// Tilt angle. Monotonic and non-wrapping; only its sine/cosine are used.
    a: f64,
    /// Spin angle. Monotonic and non-wrapping.
    b: f64,
    screen: Vec<char>,
    zbuffer: Vec<f64>,
    /// Cells claimed by the secret-message overlay; these win every depth test.
    overlay: Vec<bool>,
    style: ColorStyle,
}

impl CortexRenderer {
    /// Creates a renderer for the given grid size.
    pub fn new(width: u16, height: u16) -> Self {
        let width = width as usize;
        let height = height as usize;
        let size = width * height;
        Self {
            width,
            height,
            a: 0.0,
            b: 0.0,
            screen: vec![' '; size],
            zbuffer: vec![0.0; size],
            overlay: vec![false; size],
            style: ColorStyle::default(),
        }
    }

    /// Sets the coloring mode. Geometry and shading are unaffected.
    pub fn set_style(&mut self, style: ColorStyle) {
        self.style = style;
    }

    /// Returns the current coloring mode.
    #[inline]
    pub fn style(&self) -> ColorStyle {
        self.style
    }

    /// Current rotation angles `(tilt, spin)`.
    #[inline]
    pub fn angles(&self) -> (f64, f64) {
        (self.a, self.b)
    }

    /// Sweeps one frame of torus samples into the arenas and advances the
    /// rotation angles.
    pub fn advance(&mut self) {
        self.screen.fill(' ');
        self.zbuffer.fill(0.0);
        self.overlay.fill(false);

        let (sin_a, cos_a) = self.a.sin_cos();
        let (sin_b, cos_b) = self.b.sin_cos();

        let mut theta = 0.0;
        while theta < TAU {
            let (sin_theta, cos_theta) = theta.sin_cos();

            let mut phi = 0.0;
            while phi < TAU {
                let (sin_phi, cos_phi) = phi.sin_cos();

                // Ring cross-section before rotation.
                let circle_x = MAJOR_RADIUS + MINOR_RADIUS * cos_phi;
                let circle_y = MINOR_RADIUS * sin_phi;

                // Tilt around X, then spin around Z.
                let x = circle_x * (cos_b * cos_theta + sin_a * sin_b * sin_theta)
                    - circle_y * cos_a * sin_b;
                let y = circle_x * (sin_b * cos_theta - sin_a * cos_b * sin_theta)
                    + circle_y * cos_a * cos_b;
                let z = CAMERA_DISTANCE + cos_a * circle_x * sin_theta + circle_y * sin_a;

                let ooz = 1.0 / z;
                let xp = (self.width as f64 * 0.5 + FOCAL_X * ooz * x) as isize;
                let yp = (self.height as f64 * 0.5 - FOCAL_Y * ooz * y) as isize;

                if xp < 0 || xp >= self.width as isize || yp < 0 || yp >= self.height as isize {
                    phi += PHI_STEP;
                    continue;
                }

                let luminance = cos_phi * cos_theta * sin_b
                    - cos_a * cos_theta * sin_phi
                    - sin_a * sin_theta
                    + cos_b * (cos_a * sin_phi - cos_theta * sin_a * sin_theta);

                // Nearer-wins depth test on inverse distance.
                let idx = yp as usize * self.width + xp as usize;
                if ooz > self.zbuffer[idx] {
                    self.zbuffer[idx] = ooz;
                    let level = (((luminance + 1.0) * 3.5) as isize)
                        .clamp(0, LUMINANCE_RAMP.len() as isize - 1);
                    self.screen[idx] = LUMINANCE_RAMP[level as usize];
                }

                phi += PHI_STEP;
            }
            theta += THETA_STEP;
        }

        self.a += TILT_RATE;
        self.b += SPIN_RATE;

        self.stamp_secret_message();
    }

    /// Occasionally overlays the hidden message, centered on the grid.
    ///
    /// The schedule is derived from the tilt angle so it stays deterministic
    /// for a given rotation state: visible for 30 pseudo-frames out of every
    /// 600. Overlay cells are flagged so nothing can draw over them.
    fn stamp_secret_message(&mut self) {
        let pseudo_frame = (self.a * 100.0) as i64 % 600;
        if !(300..330).contains(&pseudo_frame) {
            return;
        }

        let len = SECRET_MESSAGE.chars().count();
        let start_x = (self.width / 2).saturating_sub(len / 2);
        let center_y = self.height / 2;
        if center_y >= self.height {
            return;
        }

        for (i, ch) in SECRET_MESSAGE.chars().enumerate() {
            let x = start_x + i;
            if x < self.width {
                let idx = center_y * self.width + x;
                self.screen[idx] = ch;
                self.overlay[idx] = true;
            }
        }
    }

    /// Renders the current arenas as a colored frame string.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.width * self.height * 20);

        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let ch = self.screen[idx];

                if ch == ' ' {
                    out.push(' ');
                    continue;
                }

                let dy = y as f64 - self.height as f64 / 2.0;
                let dx = x as f64 - self.width as f64 / 2.0;
                let angle = dy.atan2(dx);

                let color = match self.style {
                    ColorStyle::Sweep => color::sweep_color(angle + self.b),
                    ColorStyle::Rainbow => color::rainbow_color(angle + self.a + self.b),
                    ColorStyle::Brand(accent) => color::brand_gradient(accent, angle + self.b),
                };

                out.push_str(&color::colorize(&ch.to_string(), color));
            }
            if y < self.height - 1 {
                out.push('\n');
            }
        }

        out
    }

    /// Renders the current arenas without color codes.
    pub fn plain(&self) -> String {
        let mut out = String::with_capacity(self.width * self.height + self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(self.screen[y * self.width + x]);
            }
            if y < self.height - 1 {
                out.push('\n');
            }
        }
        out
    }

    #[cfg(test)]
    fn depth_at(&self, x: usize, y: usize) -> f64 {
        self.zbuffer[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Euclidean distance of every torus sample from the origin stays within
    /// `[R - r, R + r]` before projection.
    #[test]
    fn test_torus_geometry_bounds() {
        let mut theta = 0.0f64;
        while theta < TAU {
            let mut phi = 0.0f64;
            while phi < TAU {
                let circle_x = MAJOR_RADIUS + MINOR_RADIUS * phi.cos();
                let circle_y = MINOR_RADIUS * phi.sin();

                let x = circle_x * theta.cos();
                let y = circle_x * theta.sin();
                let z = circle_y;

                let dist = (x * x + y * y + z * z).sqrt();
                assert!(
                    (MAJOR_RADIUS - MINOR_RADIUS - 1e-9..=MAJOR_RADIUS + MINOR_RADIUS + 1e-9)
                        .contains(&dist),
                    "sample out of bounds: dist={dist:.3} at theta={theta:.2} phi={phi:.2}"
                );

                phi += 0.5;
            }
            theta += 0.5;
        }
    }

    #[test]
    fn test_advance_populates_depth() {
        let mut r = CortexRenderer::new(80, 24);
        r.advance();

        let populated = r.zbuffer.iter().filter(|z| **z > 0.0).count();
        assert!(populated > 0, "no samples survived the depth test");

        // The torus covers the grid center.
        assert!(r.depth_at(40, 12) > 0.0, "center cell is empty");
    }

    #[test]
    fn test_depth_buffer_keeps_nearest() {
        let mut r = CortexRenderer::new(80, 24);
        r.advance();

        // Every non-empty cell must hold a strictly positive inverse depth,
        // and every empty cell must hold zero (outside the overlay).
        for (idx, ch) in r.screen.iter().enumerate() {
            if r.overlay[idx] {
                continue;
            }
            if *ch == ' ' {
                assert_eq!(r.zbuffer[idx], 0.0);
            } else {
                assert!(r.zbuffer[idx] > 0.0);
            }
        }
    }

    /// Recomputes the sweep independently, taking the max inverse depth per
    /// cell regardless of sample order, and compares against the renderer's
    /// buffer. Equality means the visible frame is order-independent.
    #[test]
    fn test_depth_buffer_order_independent() {
        let mut r = CortexRenderer::new(80, 24);
        r.advance(); // sweeps with a = 0, b = 0

        let (width, height) = (80usize, 24usize);
        let mut expected = vec![0.0f64; width * height];

        let (sin_a, cos_a) = (0.0f64, 1.0f64);
        let (sin_b, cos_b) = (0.0f64, 1.0f64);

        let mut theta = 0.0;
        while theta < TAU {
            let (sin_theta, cos_theta) = theta.sin_cos();
            let mut phi = 0.0;
            while phi < TAU {
                let (sin_phi, cos_phi) = phi.sin_cos();
                let circle_x = MAJOR_RADIUS + MINOR_RADIUS * cos_phi;
                let circle_y = MINOR_RADIUS * sin_phi;

                let x = circle_x * (cos_b * cos_theta + sin_a * sin_b * sin_theta)
                    - circle_y * cos_a * sin_b;
                let y = circle_x * (sin_b * cos_theta - sin_a * cos_b * sin_theta)
                    + circle_y * cos_a * cos_b;
                let z = CAMERA_DISTANCE + cos_a * circle_x * sin_theta + circle_y * sin_a;

                let ooz = 1.0 / z;
                let xp = (width as f64 * 0.5 + FOCAL_X * ooz * x) as isize;
                let yp = (height as f64 * 0.5 - FOCAL_Y * ooz * y) as isize;

                if xp >= 0 && xp < width as isize && yp >= 0 && yp < height as isize {
                    let idx = yp as usize * width + xp as usize;
                    if ooz > expected[idx] {
                        expected[idx] = ooz;
                    }
                }
                phi += PHI_STEP;
            }
            theta += THETA_STEP;
        }

        for (idx, want) in expected.iter().enumerate() {
            if !r.overlay[idx] {
                assert_eq!(r.zbuffer[idx], *want, "depth mismatch at cell {idx}");
            }
        }
    }

    #[test]
    fn test_hundred_frames_constant_footprint() {
        let mut r = CortexRenderer::new(80, 24);
        let screen_len = r.screen.len();
        let depth_len = r.zbuffer.len();

        for _ in 0..100 {
            r.advance();
            let _ = r.render();
        }

        assert_eq!(r.screen.len(), screen_len);
        assert_eq!(r.zbuffer.len(), depth_len);
    }

    #[test]
    fn test_rotation_angles_advance() {
        let mut r = CortexRenderer::new(80, 24);
        let (a0, b0) = r.angles();
        r.advance();
        let (a1, b1) = r.angles();
        assert!(a1 > a0);
        assert!(b1 > b0);

        // Asymmetric rates.
        assert!((a1 - a0) > (b1 - b0));
    }

    #[test]
    fn test_style_does_not_affect_geometry() {
        let mut sweep = CortexRenderer::new(80, 24);
        let mut brand = CortexRenderer::new(80, 24);
        brand.set_style(ColorStyle::Brand(Rgb::new(224, 120, 86)));

        sweep.advance();
        brand.advance();

        assert_eq!(sweep.plain(), brand.plain());
    }

    #[test]
    fn test_render_outputs_colored_frame() {
        let mut r = CortexRenderer::new(80, 24);
        r.advance();
        let frame = r.render();
        assert!(!frame.is_empty());
        assert!(frame.contains("\x1b[38;2;"));
        assert_eq!(frame.lines().count(), 24);
    }

    #[test]
    fn test_tiny_grid_does_not_panic() {
        let mut r = CortexRenderer::new(3, 2);
        for _ in 0..10 {
            r.advance();
            let _ = r.render();
        }
    }

    #[test]
    fn test_secret_message_schedule_is_bounded() {
        let mut r = CortexRenderer::new(80, 24);

        // Drive through several full overlay periods and count frames where
        // the overlay is active; it must appear and disappear.
        let mut active_frames = 0;
        let frames = 400; // a ~ 16 rad, i.e. more than two 600-pseudo-frame periods
        for _ in 0..frames {
            r.advance();
            if r.overlay.iter().any(|cell| *cell) {
                active_frames += 1;
            }
        }

        assert!(active_frames > 0, "overlay never activated");
        assert!(active_frames < frames, "overlay never deactivated");
    }
}
