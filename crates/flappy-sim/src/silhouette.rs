//! Pixel-accurate collision silhouettes.
//!
//! A silhouette is a bit mask of a sprite's opaque pixels. Two silhouettes
//! collide when any set pixel of one lands on a set pixel of the other at
//! their relative offset, so agents can graze an obstacle's bounding box
//! without dying.

use glam::IVec2;
use thiserror::Error;

use flappy_core::constants::*;

/// Alpha at or below this value is treated as transparent.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 127;

#[derive(Debug, Error, PartialEq)]
pub enum SilhouetteError {
    #[error("expected {expected} pixel values, got {actual}")]
    Length { expected: usize, actual: usize },
    #[error("row {row} has width {actual}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Bit mask of opaque pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Silhouette {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Silhouette {
    /// Fully opaque rectangle.
    pub fn filled(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Build from one alpha byte per pixel.
    pub fn from_alpha(
        width: u32,
        height: u32,
        alpha: &[u8],
        threshold: u8,
    ) -> Result<Self, SilhouetteError> {
        let expected = width as usize * height as usize;
        if alpha.len() != expected {
            return Err(SilhouetteError::Length {
                expected,
                actual: alpha.len(),
            });
        }
        Ok(Self::from_fn(width, height, |x, y| {
            alpha[y as usize * width as usize + x as usize] > threshold
        }))
    }

    /// Build from RGBA8 sprite data using the alpha channel.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, SilhouetteError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(SilhouetteError::Length {
                expected,
                actual: rgba.len(),
            });
        }
        let alpha: Vec<u8> = rgba.chunks_exact(4).map(|px| px[3]).collect();
        Self::from_alpha(width, height, &alpha, DEFAULT_ALPHA_THRESHOLD)
    }

    /// Build from ASCII rows where `#` marks an opaque pixel.
    pub fn from_rows(rows: &[&str]) -> Result<Self, SilhouetteError> {
        let width = rows.first().map_or(0, |r| r.chars().count());
        for (row, line) in rows.iter().enumerate() {
            let actual = line.chars().count();
            if actual != width {
                return Err(SilhouetteError::RaggedRow {
                    row,
                    expected: width,
                    actual,
                });
            }
        }
        let cells: Vec<Vec<bool>> = rows
            .iter()
            .map(|r| r.chars().map(|c| c == '#').collect())
            .collect();
        Ok(Self::from_fn(width as u32, rows.len() as u32, |x, y| {
            cells[y as usize][x as usize]
        }))
    }

    /// Ellipse inscribed in `width` x `height`, the default agent footprint.
    pub fn ellipse(width: u32, height: u32) -> Self {
        let (rx, ry) = (width as f64 / 2.0, height as f64 / 2.0);
        Self::from_fn(width, height, |x, y| {
            let dx = (x as f64 + 0.5 - rx) / rx;
            let dy = (y as f64 + 0.5 - ry) / ry;
            dx * dx + dy * dy <= 1.0
        })
    }

    /// Upright pipe: a full-width cap on top of a body inset on both sides.
    pub fn pipe(width: u32, height: u32, cap_height: u32, inset: u32) -> Self {
        Self::from_fn(width, height, |x, y| {
            y < cap_height || (x >= inset && x + inset < width)
        })
    }

    /// An empty mask (zero width or height) never overlaps anything.
    fn from_fn(width: u32, height: u32, mut opaque: impl FnMut(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(opaque(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of opaque pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    pub fn is_set(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[y as usize * self.width as usize + x as usize]
    }

    /// Mirror top-to-bottom (the hanging half of an obstacle).
    pub fn flipped_vertical(&self) -> Self {
        let w = self.width as usize;
        if w == 0 {
            return self.clone();
        }
        let bits = self.bits.chunks_exact(w).rev().flatten().copied().collect();
        Self {
            width: self.width,
            height: self.height,
            bits,
        }
    }

    /// First pixel (in this silhouette's coordinates) where `other`, placed
    /// with its top-left at `offset`, overlaps this one.
    pub fn overlap(&self, other: &Silhouette, offset: IVec2) -> Option<IVec2> {
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (offset.x + other.width as i32).min(self.width as i32);
        let y1 = (offset.y + other.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        for y in y0..y1 {
            for x in x0..x1 {
                if self.is_set(x, y) && other.is_set(x - offset.x, y - offset.y) {
                    return Some(IVec2::new(x, y));
                }
            }
        }
        None
    }
}

/// The three silhouettes an episode collides with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Silhouettes {
    pub agent: Silhouette,
    /// Hanging half of every obstacle; its bottom edge is the gap top.
    pub obstacle_top: Silhouette,
    /// Standing half of every obstacle; its top edge is the gap bottom.
    pub obstacle_bottom: Silhouette,
}

impl Silhouettes {
    /// Use host-supplied sprites. The obstacle sprite is given upright.
    pub fn from_sprites(agent: Silhouette, obstacle: Silhouette) -> Self {
        Self {
            agent,
            obstacle_top: obstacle.flipped_vertical(),
            obstacle_bottom: obstacle,
        }
    }

    /// Horizontal extent of an obstacle.
    pub fn obstacle_width(&self) -> f64 {
        self.obstacle_bottom.width() as f64
    }

    /// Vertical extent of an agent.
    pub fn agent_height(&self) -> f64 {
        self.agent.height() as f64
    }
}

impl Default for Silhouettes {
    /// Procedural footprints matching the stock 2x-scaled sprites.
    fn default() -> Self {
        Self::from_sprites(
            Silhouette::ellipse(AGENT_WIDTH, AGENT_HEIGHT),
            Silhouette::pipe(PIPE_WIDTH, PIPE_HEIGHT, PIPE_CAP_HEIGHT, PIPE_BODY_INSET),
        )
    }
}
