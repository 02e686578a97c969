//! Lit-window grid.
//!
//! The mask is cut into a regular grid of small cells over the band where the
//! buildings stand.  A cell is *active* when it sits on a building pixel
//! outside every exclusion rectangle; active cells light up at build time
//! with probability equal to the density.  After that the only mutation is
//! [`WindowGrid::dim`], which switches lights off and never back on.

use rand::Rng;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::WindowConfig;
use crate::mask::SkylineMask;

/// One grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WindowCell {
    pub active: bool,
    pub on: bool,
    /// Red channel and brightness anchor, [180, 255).
    pub base: f32,
    /// Warm/cool tint offset, [-30, 30).
    pub warm: f32,
    /// Opacity, [170, 255).
    pub alpha: f32,
}

impl WindowCell {
    pub fn is_lit(&self) -> bool {
        self.active && self.on
    }

    pub fn color(&self) -> Color {
        Color::rgba(
            self.base,
            self.base - 60.0 + self.warm * 0.3,
            COOL_BIAS + self.warm,
            self.alpha,
        )
        .clamped()
    }
}

/// Blue channel every window starts from before its tint.
const COOL_BIAS: f32 = 120.0;

#[derive(Clone, Debug)]
pub struct WindowGrid {
    cells: Vec<WindowCell>,
    rows: usize,
    cols: usize,
    top: u32,
    cell_w: u32,
    cell_h: u32,
}

impl WindowGrid {
    /// Classify every cell against `mask` and light each active one with
    /// probability `density`.
    pub fn build<R: Rng + ?Sized>(
        mask: &SkylineMask,
        density: f32,
        cfg: &WindowConfig,
        rng: &mut R,
    ) -> Self {
        let cell_w = cfg.cell_width.max(1);
        let cell_h = cfg.cell_height.max(1);
        let h = mask.height() as f32;
        let top = (h * cfg.band.start) as u32;
        let bottom = (h * cfg.band.end) as u32;

        let rows = (bottom.saturating_sub(top) + cell_h - 1) / cell_h;
        let rows = rows as usize;
        let cols = ((mask.width() + cell_w - 1) / cell_w) as usize;

        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            let y = top + row as u32 * cell_h;
            for col in 0..cols {
                let x = col as u32 * cell_w;
                let mut cell = WindowCell::default();

                let blocked = cfg.exclusions.iter().any(|r| r.contains(x, y));
                if mask.is_building(x, y) && !blocked {
                    cell.active = true;
                    if rng.gen::<f32>() < density {
                        cell.on = true;
                        cell.base = rng.gen_range(180.0..255.0);
                        cell.warm = rng.gen_range(-30.0..30.0);
                        cell.alpha = rng.gen_range(170.0..255.0);
                    }
                }
                cells.push(cell);
            }
        }

        WindowGrid { cells, rows, cols, top, cell_w, cell_h }
    }

    /// Switch each lit window off with probability `off_probability`.
    /// Returns how many went dark.
    pub fn dim<R: Rng + ?Sized>(&mut self, off_probability: f32, rng: &mut R) -> usize {
        let p = off_probability.clamp(0.0, 1.0);
        let mut switched = 0;
        for cell in self.cells.iter_mut().filter(|c| c.is_lit()) {
            if rng.gen::<f32>() < p {
                cell.on = false;
                switched += 1;
            }
        }
        switched
    }

    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let w = self.cell_w as f32 - 2.0;
        let h = self.cell_h as f32 - 2.0;
        for (i, cell) in self.cells.iter().enumerate() {
            if !cell.is_lit() {
                continue;
            }
            let (x, y) = self.origin(i / self.cols, i % self.cols);
            canvas.fill_rect(x as f32 + 1.0, y as f32 + 1.0, w, h, cell.color());
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }

    pub fn cell(&self, row: usize, col: usize) -> Option<&WindowCell> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn cells(&self) -> &[WindowCell] {
        &self.cells
    }

    /// Top-left pixel of a cell.
    pub fn origin(&self, row: usize, col: usize) -> (u32, u32) {
        (col as u32 * self.cell_w, self.top + row as u32 * self.cell_h)
    }

    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_lit()).count()
    }

    pub fn active_count(&self) -> usize {
        self.cells.iter().filter(|c| c.active).count()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
