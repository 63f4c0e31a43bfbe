#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes which board coordinates a unit can see.
//!
//! Vision spreads outward from the origin one axis-aligned step at a time.
//! Every step costs one unit of the profile's range budget; shadow tiles are
//! evaluated against a reduced budget, and vision-blocking tiles are seen but
//! stop propagation unless the profile may peek one step past a single
//! blocker. The result is partitioned against the board's known coordinates
//! into a [`FogDelta`].

use std::collections::{BTreeSet, VecDeque};

use dungeon_vision_core::{
    BoardView, Coordinate, FogDelta, Profession, VisionProfile, VisionProfiles,
};

/// Resolves vision profiles and runs field-of-view searches against a board.
#[derive(Clone, Debug, Default)]
pub struct VisibilityEngine {
    profiles: VisionProfiles,
}

impl VisibilityEngine {
    /// Creates an engine that resolves profiles from the provided table.
    #[must_use]
    pub fn new(profiles: VisionProfiles) -> Self {
        Self { profiles }
    }

    /// Profile table consulted on every call.
    #[must_use]
    pub fn profiles(&self) -> &VisionProfiles {
        &self.profiles
    }

    /// Resolves the profile that governs vision for the profession.
    #[must_use]
    pub fn resolve_profile(&self, profession: Profession) -> VisionProfile {
        self.profiles.resolve(profession)
    }

    /// Computes the reveal and hide sets for a unit standing at `origin`.
    #[must_use]
    pub fn compute(
        &self,
        origin: Coordinate,
        profession: Profession,
        board: BoardView<'_>,
    ) -> FogDelta {
        self.compute_with_range_bonus(origin, profession, 0, board)
    }

    /// Same as [`Self::compute`], with the resolved base range raised by `range_bonus`.
    ///
    /// Character progression supplies the bonus; a bonus of zero leaves the
    /// resolved profile untouched.
    #[must_use]
    pub fn compute_with_range_bonus(
        &self,
        origin: Coordinate,
        profession: Profession,
        range_bonus: u32,
        board: BoardView<'_>,
    ) -> FogDelta {
        let profile = self.resolve_profile(profession).with_range_bonus(range_bonus);
        let delta = compute_for_profile(origin, &profile, board);
        log::debug!(
            "{profession} at {origin} (range {}, shadow penalty {}, peek {}): \
             {} revealed, {} hidden",
            profile.base_range(),
            profile.shadow_penalty(),
            profile.peek_beyond_blocker(),
            delta.reveal().len(),
            delta.hide().len()
        );
        delta
    }
}

/// Runs the search for an explicit profile and partitions the board's known coordinates.
///
/// The origin is always revealed. It appears in neither set's universe when
/// the board holds no descriptor for it, so it is never hidden.
#[must_use]
pub fn compute_for_profile(
    origin: Coordinate,
    profile: &VisionProfile,
    board: BoardView<'_>,
) -> FogDelta {
    let reveal = field_of_view(origin, profile, board);
    let hide: BTreeSet<Coordinate> = board
        .known_coordinates()
        .filter(|coordinate| !reveal.contains(coordinate))
        .collect();
    FogDelta::new(reveal, hide)
}

/// Collects every coordinate visible from `origin` under `profile`.
///
/// Coordinates without a descriptor count as open, unshadowed terrain. The
/// origin itself is never tested against blocking or shadow rules.
#[must_use]
pub fn field_of_view(
    origin: Coordinate,
    profile: &VisionProfile,
    board: BoardView<'_>,
) -> BTreeSet<Coordinate> {
    let base_range = profile.base_range();
    let mut visible = BTreeSet::new();
    let mut frontier = Frontier::default();

    let _ = visible.insert(origin);
    frontier.push(SearchNode {
        position: origin,
        cost: 0,
        peeked: false,
    });

    while let Some(node) = frontier.pop() {
        if node.cost >= base_range {
            continue;
        }

        let next_cost = node.cost + 1;

        for neighbor in node.position.neighbors() {
            let descriptor = board.descriptor(neighbor);
            let is_shadow = descriptor.is_some_and(|descriptor| descriptor.is_shadow);
            let effective_range = profile.effective_range(is_shadow);

            if next_cost > effective_range {
                continue;
            }

            if !visible.insert(neighbor) {
                continue;
            }

            let blocks_vision = descriptor.is_some_and(|descriptor| descriptor.blocks_vision);
            if !blocks_vision {
                frontier.push(SearchNode {
                    position: neighbor,
                    cost: next_cost,
                    peeked: node.peeked,
                });
            } else if !node.peeked && profile.peek_beyond_blocker() && next_cost < effective_range
            {
                // The jump past the blocker costs one extra step.
                frontier.push(SearchNode {
                    position: neighbor,
                    cost: next_cost + 1,
                    peeked: true,
                });
            }
        }
    }

    visible
}

#[derive(Clone, Copy, Debug)]
struct SearchNode {
    position: Coordinate,
    cost: u32,
    peeked: bool,
}

/// Search frontier bucketed by cost.
///
/// Nodes leave in ascending cost, un-peeked nodes ahead of peeked ones at the
/// same cost, and in insertion order otherwise. Since the first node to
/// reach a coordinate claims it, every coordinate is claimed by its cheapest
/// arrival even though a peek advances the cost by two.
#[derive(Debug, Default)]
struct Frontier {
    levels: Vec<[VecDeque<SearchNode>; 2]>,
    cursor: usize,
}

impl Frontier {
    fn push(&mut self, node: SearchNode) {
        let Ok(level) = usize::try_from(node.cost) else {
            return;
        };

        if self.levels.len() <= level {
            self.levels.resize_with(level + 1, Default::default);
        }

        self.levels[level][usize::from(node.peeked)].push_back(node);
    }

    fn pop(&mut self) -> Option<SearchNode> {
        while let Some([open, peeked]) = self.levels.get_mut(self.cursor) {
            if let Some(node) = open.pop_front().or_else(|| peeked.pop_front()) {
                return Some(node);
            }
            self.cursor += 1;
        }
        None
    }
}
