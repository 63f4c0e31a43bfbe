#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns a visibility pass into a fog command.

use dungeon_vision_core::{BoardView, Command, Coordinate, MissingCollaborator, Profession};
use dungeon_vision_system_visibility::VisibilityEngine;

/// Fog-of-war orchestration wrapped around a [`VisibilityEngine`].
#[derive(Clone, Debug, Default)]
pub struct FogOfWar {
    engine: VisibilityEngine,
}

impl FogOfWar {
    /// Creates a fog-of-war system backed by the provided engine.
    #[must_use]
    pub fn new(engine: VisibilityEngine) -> Self {
        Self { engine }
    }

    /// Engine used to compute visibility.
    #[must_use]
    pub fn engine(&self) -> &VisibilityEngine {
        &self.engine
    }

    /// Emits a single [`Command::ApplyFog`] describing what `profession` sees from `origin`.
    ///
    /// The reveal and hide halves travel in one command so the board applies
    /// them together.
    ///
    /// # Errors
    ///
    /// Returns [`MissingCollaborator::Board`] without emitting anything when
    /// no board is available.
    pub fn update_fog(
        &self,
        board: Option<BoardView<'_>>,
        origin: Coordinate,
        profession: Profession,
        out: &mut Vec<Command>,
    ) -> Result<(), MissingCollaborator> {
        self.update_fog_with_range_bonus(board, origin, profession, 0, out)
    }

    /// Same as [`Self::update_fog`], with a progression-supplied vision range bonus.
    ///
    /// # Errors
    ///
    /// Returns [`MissingCollaborator::Board`] without emitting anything when
    /// no board is available.
    pub fn update_fog_with_range_bonus(
        &self,
        board: Option<BoardView<'_>>,
        origin: Coordinate,
        profession: Profession,
        range_bonus: u32,
        out: &mut Vec<Command>,
    ) -> Result<(), MissingCollaborator> {
        let Some(board) = board else {
            log::warn!("fog update for {profession} at {origin} skipped: no board available");
            return Err(MissingCollaborator::Board);
        };

        let delta = self
            .engine
            .compute_with_range_bonus(origin, profession, range_bonus, board);
        out.push(Command::ApplyFog { delta });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn missing_board_emits_nothing() {
        let fog = FogOfWar::default();
        let mut commands = Vec::new();

        let result = fog.update_fog(None, Coordinate::new(0, 0), Profession::Hunter, &mut commands);

        assert_eq!(result, Err(MissingCollaborator::Board));
        assert!(commands.is_empty());
    }

    #[test]
    fn present_board_emits_single_fog_command() {
        let fog = FogOfWar::default();
        let tiles = HashMap::new();
        let mut commands = Vec::new();

        fog.update_fog(
            Some(BoardView::new(&tiles)),
            Coordinate::new(0, 0),
            Profession::Hunter,
            &mut commands,
        )
        .expect("board supplied");

        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], Command::ApplyFog { .. }));
    }
}
