//! Presentation-only fog overlay maintained alongside the tile index.

use std::collections::BTreeSet;

use dungeon_vision_core::Coordinate;

/// Set of coordinates currently painted with fog.
///
/// The layer is independent of tile data: it never consults descriptors and
/// may hold coordinates that no longer carry one.
#[derive(Clone, Debug, Default)]
pub(crate) struct FogLayer {
    fogged: BTreeSet<Coordinate>,
}

impl FogLayer {
    /// Clears fog from every provided coordinate. Repeated calls are harmless.
    pub(crate) fn reveal<I>(&mut self, coordinates: I)
    where
        I: IntoIterator<Item = Coordinate>,
    {
        for coordinate in coordinates {
            let _ = self.fogged.remove(&coordinate);
        }
    }

    /// Paints fog over every provided coordinate. Repeated calls are harmless.
    pub(crate) fn hide<I>(&mut self, coordinates: I)
    where
        I: IntoIterator<Item = Coordinate>,
    {
        self.fogged.extend(coordinates);
    }

    pub(crate) fn contains(&self, coordinate: Coordinate) -> bool {
        self.fogged.contains(&coordinate)
    }

    pub(crate) fn coordinates(&self) -> &BTreeSet<Coordinate> {
        &self.fogged
    }
}
