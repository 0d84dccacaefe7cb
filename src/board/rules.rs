//! Board-level design rules that shape pad copper

use crate::geometry::{Length, Ratio, UnsignedLength};
use serde::{Deserialize, Serialize};

/// Annular ring rules for THT pads
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardDesignRules {
    /// Component side gets only an annular ring instead of the full pad shape
    pub pad_cmp_side_auto_annular_ring: bool,
    /// Inner layers get only an annular ring instead of the full pad shape
    pub pad_inner_auto_annular_ring: bool,
    pub pad_annular_ring_ratio: Ratio,
    pub pad_annular_ring_min: UnsignedLength,
    pub pad_annular_ring_max: UnsignedLength,
}

impl Default for BoardDesignRules {
    fn default() -> Self {
        Self {
            pad_cmp_side_auto_annular_ring: false,
            pad_inner_auto_annular_ring: true,
            pad_annular_ring_ratio: Ratio::from_percent(25),
            pad_annular_ring_min: UnsignedLength::from_nm(250_000), // 0.25mm
            pad_annular_ring_max: UnsignedLength::from_nm(2_000_000),
        }
    }
}

impl BoardDesignRules {
    /// Ratio of the drill, clamped to [min, max]
    pub fn calc_pad_annular_ring(&self, drill_diameter: Length) -> UnsignedLength {
        let ring = self.pad_annular_ring_ratio.apply(drill_diameter);
        let min = self.pad_annular_ring_min.get();
        let max = self.pad_annular_ring_max.get().max(min);
        UnsignedLength::new(ring.clamp(min, max)).unwrap_or_default()
    }
}
