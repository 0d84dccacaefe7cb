//! Per-run copper area cache

use crate::board::Board;
use crate::error::Result;
use crate::generation::{BoardPathGenerator, NetFilter};
use crate::kernel::{Area, PolygonKernel};
use indexmap::map::Entry;
use indexmap::IndexMap;

/// Copper areas keyed by (layer, net filter), alive for one run
#[derive(Default)]
pub struct CopperCache {
    areas: IndexMap<(String, NetFilter), Area>,
}

impl CopperCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Copper of `layer` admitted by `filter`, built on first request
    pub fn copper(
        &mut self,
        board: &Board,
        kernel: &PolygonKernel,
        layer: &str,
        filter: &NetFilter,
        ignore_planes: bool,
    ) -> Result<&Area> {
        match self.areas.entry((layer.to_string(), filter.clone())) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let mut generator = BoardPathGenerator::new(board, kernel);
                generator.add_copper(layer, filter, ignore_planes)?;
                Ok(e.insert(generator.into_area()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{NetSegment, Via};
    use crate::geometry::{Length, Point, PositiveLength};

    #[test]
    fn test_cache_reuses_entries() {
        let board = Board {
            net_segments: vec![NetSegment {
                id: 1,
                vias: vec![Via {
                    id: 1,
                    position: Point::ORIGIN,
                    size: PositiveLength::new(Length(500_000)).unwrap(),
                    drill_diameter: PositiveLength::new(Length(250_000)).unwrap(),
                }],
                ..Default::default()
            }],
            ..Default::default()
        };
        let kernel = PolygonKernel::default();
        let mut cache = CopperCache::new();
        let filter = NetFilter::new();
        assert!(!cache.copper(&board, &kernel, "top_cu", &filter, false).unwrap().is_empty());
        cache.copper(&board, &kernel, "top_cu", &filter, false).unwrap();
        assert_eq!(cache.len(), 1);
        cache.copper(&board, &kernel, "bot_cu", &filter, false).unwrap();
        assert_eq!(cache.len(), 2);
    }
}
