#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the dungeon vision engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative board, and pure systems. Adapters submit [`Command`] values
//! describing desired board mutations, the board executes those commands via
//! its `apply` entry point and broadcasts [`Event`] values in response.
//! Systems read the board exclusively through [`BoardView`] snapshots and
//! respond with new command batches.

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base vision range used when neither a profession entry nor a default is configured.
pub const FALLBACK_BASE_RANGE: u32 = 6;

/// Shadow penalty used when neither a profession entry nor a default is configured.
pub const FALLBACK_SHADOW_PENALTY: u32 = 1;

/// Commands that express all permissible board mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Inserts or replaces the descriptor stored at its coordinate.
    PlaceTile {
        /// Descriptor that should become authoritative for its coordinate.
        descriptor: TileDescriptor,
    },
    /// Removes the descriptor stored at the provided coordinate.
    RemoveTile {
        /// Coordinate whose descriptor should be dropped.
        coordinate: Coordinate,
    },
    /// Clears fog from the reveal set and paints fog over the hide set in one step.
    ApplyFog {
        /// Partition of the known coordinates produced by a visibility pass.
        delta: FogDelta,
    },
}

/// Events broadcast by the board after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a descriptor was stored at its coordinate.
    TilePlaced {
        /// Coordinate that received the descriptor.
        coordinate: Coordinate,
        /// Terrain category of the stored descriptor.
        kind: TileKind,
    },
    /// Confirms that a descriptor was removed from the board.
    TileRemoved {
        /// Coordinate that no longer carries a descriptor.
        coordinate: Coordinate,
    },
    /// Reports that a removal targeted a coordinate without a descriptor.
    TileRemovalRejected {
        /// Coordinate named by the rejected request.
        coordinate: Coordinate,
    },
    /// Confirms that the fog layer was updated.
    FogApplied {
        /// Number of coordinates cleared of fog.
        revealed: usize,
        /// Number of coordinates painted with fog.
        hidden: usize,
    },
}

/// Integer grid address. Boards are sparse, so no bounds are implied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    column: i32,
    row: i32,
}

impl Coordinate {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column component of the coordinate.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row component of the coordinate.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: Coordinate) -> u32 {
        self.column
            .abs_diff(other.column)
            .saturating_add(self.row.abs_diff(other.row))
    }

    /// Coordinate one step away in the provided direction.
    ///
    /// Returns `None` when the step would leave the `i32` address space.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (column_offset, row_offset) = direction.offset();
        Some(Self::new(
            self.column.checked_add(column_offset)?,
            self.row.checked_add(row_offset)?,
        ))
    }

    /// Axis-aligned neighbours in [`Direction::ALL`] order.
    pub fn neighbors(self) -> impl Iterator<Item = Coordinate> {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.step(direction))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.column, self.row)
    }
}

impl FromStr for Coordinate {
    type Err = InvalidArgument;

    /// Parses the `column,row` text form.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidArgument::MalformedCoordinate(value.to_owned());
        let (column, row) = value.split_once(',').ok_or_else(malformed)?;
        let column = column.trim().parse::<i32>().map_err(|_| malformed())?;
        let row = row.trim().parse::<i32>().map_err(|_| malformed())?;
        Ok(Self::new(column, row))
    }
}

/// Cardinal directions used for vision propagation. Diagonals are never used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
    /// Toward increasing column indices.
    East,
}

impl Direction {
    /// All directions in the order the search expands them.
    pub const ALL: [Direction; 4] = [Self::North, Self::South, Self::West, Self::East];

    /// Column and row delta of a single step.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::West => (-1, 0),
            Self::East => (1, 0),
        }
    }
}

/// Terrain category of a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    /// No terrain. Also reported for coordinates without a descriptor.
    #[default]
    Empty,
    /// Walkable floor.
    Floor,
    /// Solid wall.
    Wall,
    /// Water surface.
    Water,
    /// Decorative prop.
    Decor,
}

/// Logical description of the tile stored at a coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileDescriptor {
    /// Coordinate the descriptor belongs to.
    pub coordinate: Coordinate,
    /// Terrain category of the tile.
    pub kind: TileKind,
    /// True when the tile blocks movement. Vision ignores this flag.
    #[serde(default)]
    pub blocks_movement: bool,
    /// True when the tile stops vision propagation.
    #[serde(default)]
    pub blocks_vision: bool,
    /// True when the tile is darkened and subject to the shadow penalty.
    #[serde(default)]
    pub is_shadow: bool,
}

impl TileDescriptor {
    /// Open, unshadowed tile of the provided kind.
    #[must_use]
    pub const fn open(coordinate: Coordinate, kind: TileKind) -> Self {
        Self {
            coordinate,
            kind,
            blocks_movement: false,
            blocks_vision: false,
            is_shadow: false,
        }
    }

    /// Wall tile that blocks both movement and vision.
    #[must_use]
    pub const fn wall(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            kind: TileKind::Wall,
            blocks_movement: true,
            blocks_vision: true,
            is_shadow: false,
        }
    }

    /// Shadowed floor tile.
    #[must_use]
    pub const fn shadow(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            kind: TileKind::Floor,
            blocks_movement: false,
            blocks_vision: false,
            is_shadow: true,
        }
    }
}

/// Professions that select a vision profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profession {
    /// Stealth specialist.
    Rogue,
    /// Ranged scout.
    Hunter,
    /// Melee fighter.
    Warrior,
    /// Spellcaster.
    Mage,
}

impl Profession {
    /// Every profession in declaration order.
    pub const ALL: [Profession; 4] = [Self::Rogue, Self::Hunter, Self::Warrior, Self::Mage];

    /// Lowercase display name of the profession.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rogue => "rogue",
            Self::Hunter => "hunter",
            Self::Warrior => "warrior",
            Self::Mage => "mage",
        }
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Profession {
    type Err = InvalidArgument;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|profession| profession.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| InvalidArgument::UnknownProfession(value.to_owned()))
    }
}

/// Immutable bundle of vision parameters bound to a profession.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ProfileFields", into = "ProfileFields")]
pub struct VisionProfile {
    profession: Profession,
    base_range: u32,
    shadow_penalty: u32,
    peek_beyond_blocker: bool,
}

impl VisionProfile {
    /// Creates a validated vision profile.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when `base_range` is below one or
    /// `shadow_penalty` is negative.
    pub fn new(
        profession: Profession,
        base_range: i32,
        shadow_penalty: i32,
        peek_beyond_blocker: bool,
    ) -> Result<Self, ConfigurationError> {
        let base_range = u32::try_from(base_range)
            .ok()
            .filter(|range| *range >= 1)
            .ok_or(ConfigurationError::BaseRangeTooSmall { base_range })?;
        let shadow_penalty = u32::try_from(shadow_penalty)
            .map_err(|_| ConfigurationError::NegativeShadowPenalty { shadow_penalty })?;

        Ok(Self {
            profession,
            base_range,
            shadow_penalty,
            peek_beyond_blocker,
        })
    }

    /// Last-resort profile used when nothing is configured for a profession.
    #[must_use]
    pub const fn fallback(profession: Profession) -> Self {
        Self {
            profession,
            base_range: FALLBACK_BASE_RANGE,
            shadow_penalty: FALLBACK_SHADOW_PENALTY,
            peek_beyond_blocker: false,
        }
    }

    /// Profession the profile was configured for.
    #[must_use]
    pub const fn profession(&self) -> Profession {
        self.profession
    }

    /// Maximum search cost on unshadowed tiles. Always at least one.
    #[must_use]
    pub const fn base_range(&self) -> u32 {
        self.base_range
    }

    /// Range reduction applied when evaluating a shadow tile.
    #[must_use]
    pub const fn shadow_penalty(&self) -> u32 {
        self.shadow_penalty
    }

    /// Whether vision may jump one step past a single blocking tile.
    #[must_use]
    pub const fn peek_beyond_blocker(&self) -> bool {
        self.peek_beyond_blocker
    }

    /// Range budget for a tile, floored at zero.
    #[must_use]
    pub const fn effective_range(&self, is_shadow: bool) -> u32 {
        if is_shadow {
            self.base_range.saturating_sub(self.shadow_penalty)
        } else {
            self.base_range
        }
    }

    /// Copy of the profile with its base range raised by `bonus`.
    #[must_use]
    pub const fn with_range_bonus(self, bonus: u32) -> Self {
        Self {
            base_range: self.base_range.saturating_add(bonus),
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct ProfileFields {
    profession: Profession,
    base_range: i32,
    #[serde(default = "default_shadow_penalty")]
    shadow_penalty: i32,
    #[serde(default)]
    peek_beyond_blocker: bool,
}

fn default_shadow_penalty() -> i32 {
    FALLBACK_SHADOW_PENALTY as i32
}

impl TryFrom<ProfileFields> for VisionProfile {
    type Error = ConfigurationError;

    fn try_from(fields: ProfileFields) -> Result<Self, Self::Error> {
        Self::new(
            fields.profession,
            fields.base_range,
            fields.shadow_penalty,
            fields.peek_beyond_blocker,
        )
    }
}

impl From<VisionProfile> for ProfileFields {
    fn from(profile: VisionProfile) -> Self {
        Self {
            profession: profile.profession,
            base_range: i32::try_from(profile.base_range).unwrap_or(i32::MAX),
            shadow_penalty: i32::try_from(profile.shadow_penalty).unwrap_or(i32::MAX),
            peek_beyond_blocker: profile.peek_beyond_blocker,
        }
    }
}

/// Lookup table mapping professions to vision profiles.
///
/// Resolution walks an ordered fallback chain: the profession's own entry,
/// then the designated default entry, then [`VisionProfile::fallback`]. A
/// resolved profile therefore always exists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisionProfiles {
    entries: Vec<VisionProfile>,
    default: Option<VisionProfile>,
}

impl VisionProfiles {
    /// Creates an empty table that resolves every profession to the fallback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the entry for the profile's profession.
    #[must_use]
    pub fn with_profile(mut self, profile: VisionProfile) -> Self {
        self.insert(profile);
        self
    }

    /// Designates the profile used for professions without their own entry.
    #[must_use]
    pub fn with_default(mut self, profile: VisionProfile) -> Self {
        self.default = Some(profile);
        self
    }

    /// Adds or replaces the entry for the profile's profession in place.
    pub fn insert(&mut self, profile: VisionProfile) {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.profession == profile.profession)
        {
            Some(entry) => *entry = profile,
            None => self.entries.push(profile),
        }
    }

    /// Entry configured specifically for the profession, if any.
    #[must_use]
    pub fn profile_for(&self, profession: Profession) -> Option<&VisionProfile> {
        self.entries
            .iter()
            .find(|entry| entry.profession == profession)
    }

    /// Designated default entry, if any.
    #[must_use]
    pub fn default_profile(&self) -> Option<&VisionProfile> {
        self.default.as_ref()
    }

    /// Resolves the profile that governs vision for the profession.
    #[must_use]
    pub fn resolve(&self, profession: Profession) -> VisionProfile {
        self.profile_for(profession)
            .or(self.default.as_ref())
            .copied()
            .unwrap_or_else(|| VisionProfile::fallback(profession))
    }
}

/// Partition of a board's known coordinates into visible and fogged sets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FogDelta {
    reveal: BTreeSet<Coordinate>,
    hide: BTreeSet<Coordinate>,
}

impl FogDelta {
    /// Creates a delta from explicit reveal and hide sets.
    #[must_use]
    pub fn new(reveal: BTreeSet<Coordinate>, hide: BTreeSet<Coordinate>) -> Self {
        Self { reveal, hide }
    }

    /// Coordinates that are currently visible, in ascending order.
    #[must_use]
    pub fn reveal(&self) -> &BTreeSet<Coordinate> {
        &self.reveal
    }

    /// Known coordinates that are currently not visible, in ascending order.
    #[must_use]
    pub fn hide(&self) -> &BTreeSet<Coordinate> {
        &self.hide
    }

    /// Reports whether the coordinate is part of the reveal set.
    #[must_use]
    pub fn is_visible(&self, coordinate: Coordinate) -> bool {
        self.reveal.contains(&coordinate)
    }

    /// Consumes the delta, yielding the reveal and hide sets.
    #[must_use]
    pub fn into_parts(self) -> (BTreeSet<Coordinate>, BTreeSet<Coordinate>) {
        (self.reveal, self.hide)
    }
}

/// Read-only view into the board's coordinate index.
#[derive(Clone, Copy, Debug)]
pub struct BoardView<'a> {
    tiles: &'a HashMap<Coordinate, TileDescriptor>,
}

impl<'a> BoardView<'a> {
    /// Captures a view backed by the provided coordinate index.
    #[must_use]
    pub fn new(tiles: &'a HashMap<Coordinate, TileDescriptor>) -> Self {
        Self { tiles }
    }

    /// Descriptor stored at the coordinate, if any.
    #[must_use]
    pub fn descriptor(&self, coordinate: Coordinate) -> Option<&'a TileDescriptor> {
        self.tiles.get(&coordinate)
    }

    /// Terrain category at the coordinate. Missing descriptors report [`TileKind::Empty`].
    #[must_use]
    pub fn tile_kind(&self, coordinate: Coordinate) -> TileKind {
        self.descriptor(coordinate)
            .map_or(TileKind::Empty, |descriptor| descriptor.kind)
    }

    /// Reports whether the coordinate stops vision. Missing descriptors never do.
    #[must_use]
    pub fn is_blocking_vision(&self, coordinate: Coordinate) -> bool {
        self.descriptor(coordinate)
            .is_some_and(|descriptor| descriptor.blocks_vision)
    }

    /// Reports whether the coordinate is shadowed. Missing descriptors never are.
    #[must_use]
    pub fn is_shadow(&self, coordinate: Coordinate) -> bool {
        self.descriptor(coordinate)
            .is_some_and(|descriptor| descriptor.is_shadow)
    }

    /// Every coordinate that carries a descriptor, in unspecified order.
    pub fn known_coordinates(&self) -> impl Iterator<Item = Coordinate> + 'a {
        self.tiles.keys().copied()
    }

    /// Number of coordinates that carry a descriptor.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether the board carries no descriptors at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Invalid vision or progression parameters, raised at construction time.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigurationError {
    /// The base vision range was below one.
    #[error("base vision range must be at least 1, got {base_range}")]
    BaseRangeTooSmall {
        /// Rejected base range.
        base_range: i32,
    },
    /// The shadow penalty was negative.
    #[error("shadow penalty must not be negative, got {shadow_penalty}")]
    NegativeShadowPenalty {
        /// Rejected shadow penalty.
        shadow_penalty: i32,
    },
    /// A job trait magnitude fell outside the supported range.
    #[error("job trait magnitude must lie within 0..=5, got {magnitude}")]
    TraitMagnitudeOutOfRange {
        /// Rejected magnitude.
        magnitude: f32,
    },
}

/// Malformed caller input, rejected before any search runs.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidArgument {
    /// The text did not follow the `column,row` form.
    #[error("'{0}' is not a coordinate, expected 'column,row'")]
    MalformedCoordinate(String),
    /// The text did not name a known profession.
    #[error("unknown profession '{0}'")]
    UnknownProfession(String),
}

/// A collaborator required by an orchestration step was not available.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MissingCollaborator {
    /// No board was supplied.
    #[error("fog update requires a board")]
    Board,
}
