//! Color palette store
//!
//! The palette is an immutable shared sequence of nine colors. Shuffling never
//! touches the current allocation: it builds a fresh one and swaps the handle, so
//! anything holding the previous palette can tell it changed by identity alone.

use crate::core::error::{LayoutError, LayoutResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;

pub const PALETTE_LEN: usize = 9;

pub const DEFAULT_COLORS: [&str; PALETTE_LEN] = [
    "#0289DF", "#E53458", "#8C7A5B", "#B75E61", "#7F00CB", "#01B09F", "#007A67", "#6953FE",
    "#475B6C",
];

/// Ordered, fixed-length color sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Arc<[String; PALETTE_LEN]>,
}

impl Palette {
    pub fn new(colors: [String; PALETTE_LEN]) -> Self {
        Self {
            colors: Arc::new(colors),
        }
    }

    /// Build from a list, checking length and `#RRGGBB` format
    pub fn from_list<S: AsRef<str>>(colors: &[S]) -> LayoutResult<Self> {
        if colors.len() != PALETTE_LEN {
            return Err(LayoutError::PaletteSize {
                expected: PALETTE_LEN,
                actual: colors.len(),
            });
        }

        for (index, color) in colors.iter().enumerate() {
            if !is_hex_color(color.as_ref()) {
                return Err(LayoutError::InvalidColor {
                    index,
                    value: color.as_ref().to_string(),
                });
            }
        }

        let colors: [String; PALETTE_LEN] =
            std::array::from_fn(|i| colors[i].as_ref().to_string());
        Ok(Self::new(colors))
    }

    pub fn colors(&self) -> &[String] {
        self.colors.as_slice()
    }

    /// True when both handles point at the same underlying sequence
    pub fn same_identity(&self, other: &Palette) -> bool {
        Arc::ptr_eq(&self.colors, &other.colors)
    }

    /// Multiset comparison: same colors, any order
    #[cfg(test)]
    pub fn is_permutation_of(&self, other: &Palette) -> bool {
        let mut a: Vec<&String> = self.colors.iter().collect();
        let mut b: Vec<&String> = other.colors.iter().collect();
        a.sort();
        b.sort();
        a == b
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(DEFAULT_COLORS.map(String::from))
    }
}

/// `#RRGGBB`, case-insensitive
pub fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .map(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}

/// Holds the current palette and reshuffles it on request
pub struct PaletteStore {
    seed: Palette,
    current: Palette,
    rng: StdRng,
    shuffles: u64,
}

impl PaletteStore {
    pub fn new(seed: Palette, rng: StdRng) -> Self {
        Self {
            current: seed.clone(),
            seed,
            rng,
            shuffles: 0,
        }
    }

    /// Store with a reproducible shuffle sequence
    pub fn seeded(seed: Palette, rng_seed: u64) -> Self {
        Self::new(seed, StdRng::seed_from_u64(rng_seed))
    }

    pub fn from_entropy(seed: Palette) -> Self {
        Self::new(seed, StdRng::from_entropy())
    }

    pub fn current(&self) -> Palette {
        self.current.clone()
    }

    pub fn shuffle_count(&self) -> u64 {
        self.shuffles
    }

    /// Replace the palette with a new random permutation of itself
    pub fn shuffle(&mut self) -> Palette {
        let mut next: [String; PALETTE_LEN] = (*self.current.colors).clone();
        next.shuffle(&mut self.rng);

        self.current = Palette::new(next);
        self.shuffles += 1;
        tracing::debug!(shuffles = self.shuffles, colors = ?self.current.colors(), "Palette shuffled");
        self.current()
    }

    /// Go back to the configured order (as a new sequence)
    pub fn reset(&mut self) -> Palette {
        self.current = Palette::new((*self.seed.colors).clone());
        tracing::debug!("Palette reset to configured order");
        self.current()
    }
}
