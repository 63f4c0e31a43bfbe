#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state for the dungeon vision engine.
//!
//! The board owns the backing list of tile descriptors, a coordinate index
//! derived from that list, and the fog overlay. All mutations flow through
//! [`apply`]; systems observe the board through the [`query`] module.

mod fog;

use std::collections::HashMap;

use dungeon_vision_core::{Command, Coordinate, Event, FogDelta, TileDescriptor};

use crate::fog::FogLayer;

/// Represents the authoritative board state.
#[derive(Clone, Debug)]
pub struct Board {
    tiles: Vec<TileDescriptor>,
    index: HashMap<Coordinate, TileDescriptor>,
    fog: Option<FogLayer>,
}

impl Board {
    /// Creates an empty board with an enabled fog layer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tiles: Vec::new(),
            index: HashMap::new(),
            fog: Some(FogLayer::default()),
        }
    }

    /// Creates a board from a backing descriptor list.
    ///
    /// When several descriptors share a coordinate, the last one wins and the
    /// earlier ones are dropped from the backing list, as with
    /// [`Command::PlaceTile`].
    #[must_use]
    pub fn from_tiles(tiles: Vec<TileDescriptor>) -> Self {
        let mut last_position = HashMap::with_capacity(tiles.len());
        for (position, descriptor) in tiles.iter().enumerate() {
            let _ = last_position.insert(descriptor.coordinate, position);
        }
        let tiles = tiles
            .into_iter()
            .enumerate()
            .filter(|(position, descriptor)| {
                last_position.get(&descriptor.coordinate) == Some(position)
            })
            .map(|(_, descriptor)| descriptor)
            .collect();

        let mut board = Self {
            tiles,
            ..Self::new()
        };
        board.rebuild_index();
        board
    }

    /// Disables the fog layer. Fog commands are accepted but change nothing.
    #[must_use]
    pub fn without_fog_layer(mut self) -> Self {
        self.fog = None;
        self
    }

    /// Recomputes the coordinate index from the backing descriptor list.
    pub fn rebuild_index(&mut self) {
        self.index.clear();
        for descriptor in &self.tiles {
            let _ = self.index.insert(descriptor.coordinate, *descriptor);
        }
        log::trace!(
            "rebuilt board index: {} descriptors, {} coordinates",
            self.tiles.len(),
            self.index.len()
        );
    }

    fn place(&mut self, descriptor: TileDescriptor) {
        self.tiles
            .retain(|existing| existing.coordinate != descriptor.coordinate);
        self.tiles.push(descriptor);
        let _ = self.index.insert(descriptor.coordinate, descriptor);
    }

    fn remove(&mut self, coordinate: Coordinate) -> bool {
        if self.index.remove(&coordinate).is_none() {
            return false;
        }
        self.tiles
            .retain(|existing| existing.coordinate != coordinate);
        true
    }

    fn apply_fog(&mut self, delta: FogDelta) -> Option<(usize, usize)> {
        let Some(fog) = self.fog.as_mut() else {
            log::debug!("board has no fog layer; ignoring fog update");
            return None;
        };

        let (reveal, hide) = delta.into_parts();
        let counts = (reveal.len(), hide.len());
        fog.reveal(reveal);
        fog.hide(hide);
        Some(counts)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the board, mutating state deterministically.
pub fn apply(board: &mut Board, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceTile { descriptor } => {
            board.place(descriptor);
            out_events.push(Event::TilePlaced {
                coordinate: descriptor.coordinate,
                kind: descriptor.kind,
            });
        }
        Command::RemoveTile { coordinate } => {
            if board.remove(coordinate) {
                out_events.push(Event::TileRemoved { coordinate });
            } else {
                out_events.push(Event::TileRemovalRejected { coordinate });
            }
        }
        Command::ApplyFog { delta } => {
            if let Some((revealed, hidden)) = board.apply_fog(delta) {
                out_events.push(Event::FogApplied { revealed, hidden });
            }
        }
    }
}

/// Query functions that provide read-only access to the board state.
pub mod query {
    use dungeon_vision_core::{BoardView, Coordinate, TileDescriptor, TileKind};

    use super::Board;

    /// Captures a read-only view of the coordinate index.
    #[must_use]
    pub fn board_view(board: &Board) -> BoardView<'_> {
        BoardView::new(&board.index)
    }

    /// Descriptor stored at the coordinate, if any.
    #[must_use]
    pub fn descriptor(board: &Board, coordinate: Coordinate) -> Option<&TileDescriptor> {
        board.index.get(&coordinate)
    }

    /// Terrain category at the coordinate, [`TileKind::Empty`] when absent.
    #[must_use]
    pub fn tile_kind(board: &Board, coordinate: Coordinate) -> TileKind {
        board_view(board).tile_kind(coordinate)
    }

    /// Reports whether the coordinate stops vision.
    #[must_use]
    pub fn is_blocking_vision(board: &Board, coordinate: Coordinate) -> bool {
        board_view(board).is_blocking_vision(coordinate)
    }

    /// Reports whether the coordinate is shadowed.
    #[must_use]
    pub fn is_shadow(board: &Board, coordinate: Coordinate) -> bool {
        board_view(board).is_shadow(coordinate)
    }

    /// Every coordinate that carries a descriptor, in ascending order.
    #[must_use]
    pub fn known_coordinates(board: &Board) -> Vec<Coordinate> {
        let mut coordinates: Vec<Coordinate> = board.index.keys().copied().collect();
        coordinates.sort_unstable();
        coordinates
    }

    /// Backing descriptor list in insertion order.
    #[must_use]
    pub fn tiles(board: &Board) -> &[TileDescriptor] {
        &board.tiles
    }

    /// Reports whether the board carries a fog layer.
    #[must_use]
    pub fn has_fog_layer(board: &Board) -> bool {
        board.fog.is_some()
    }

    /// Reports whether fog is currently painted over the coordinate.
    #[must_use]
    pub fn is_fogged(board: &Board, coordinate: Coordinate) -> bool {
        board
            .fog
            .as_ref()
            .is_some_and(|fog| fog.contains(coordinate))
    }

    /// Coordinates currently painted with fog, in ascending order.
    #[must_use]
    pub fn fogged_coordinates(board: &Board) -> Vec<Coordinate> {
        board
            .fog
            .as_ref()
            .map(|fog| fog.coordinates().iter().copied().collect())
            .unwrap_or_default()
    }
}
