//! TOML scenario files describing a board, vision profiles and an optional job.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use dungeon_vision_board::Board;
use dungeon_vision_core::{
    Coordinate, Profession, TileDescriptor, TileKind, VisionProfile, VisionProfiles,
};
use dungeon_vision_system_progression::JobDefinition;
use serde::Deserialize;

/// Glyph marking the origin inside a layout. The tile beneath it is floor.
pub(crate) const ORIGIN_GLYPH: char = '@';

/// Parsed scenario file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    /// Origin in `column,row` form. Overrides the layout's origin glyph.
    #[serde(default)]
    origin: Option<String>,
    /// Profession whose vision is evaluated.
    #[serde(default)]
    profession: Option<String>,
    /// Character level used to derive a vision bonus from the job.
    #[serde(default)]
    level: Option<u32>,
    /// Character map; each line is a row, each character a column.
    #[serde(default)]
    layout: String,
    /// Explicit descriptors, applied after the layout.
    #[serde(default)]
    tiles: Vec<TileDescriptor>,
    /// Profession-specific vision profiles.
    #[serde(default)]
    profiles: Vec<VisionProfile>,
    /// Profile used by professions without their own entry.
    #[serde(default)]
    default_profile: Option<VisionProfile>,
    /// Job that drives the character's vision bonus.
    #[serde(default)]
    job: Option<JobDefinition>,
}

impl Scenario {
    /// Reads and parses the scenario stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load scenario at {}", path.display()))
    }

    /// Parses scenario TOML contents.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse scenario toml contents")
    }

    /// Builds the profile table declared by the scenario.
    pub(crate) fn profiles(&self) -> VisionProfiles {
        let mut profiles = VisionProfiles::new();
        for profile in &self.profiles {
            profiles.insert(*profile);
        }
        match self.default_profile {
            Some(default) => profiles.with_default(default),
            None => profiles,
        }
    }

    /// Builds the board along with the origin marked in the layout, if any.
    pub(crate) fn board(&self) -> Result<(Board, Option<Coordinate>)> {
        let (mut tiles, marked_origin) = parse_layout(&self.layout)?;
        tiles.extend(self.tiles.iter().copied());
        Ok((Board::from_tiles(tiles), marked_origin))
    }

    /// Origin declared explicitly by the scenario.
    pub(crate) fn origin(&self) -> Result<Option<Coordinate>> {
        self.origin
            .as_deref()
            .map(str::parse)
            .transpose()
            .context("invalid scenario origin")
    }

    /// Profession declared by the scenario.
    pub(crate) fn profession(&self) -> Result<Option<Profession>> {
        self.profession
            .as_deref()
            .map(str::parse)
            .transpose()
            .context("invalid scenario profession")
    }

    /// Character level declared by the scenario.
    pub(crate) fn level(&self) -> Option<u32> {
        self.level
    }

    /// Job declared by the scenario.
    pub(crate) fn job(&self) -> Option<&JobDefinition> {
        self.job.as_ref()
    }
}

fn parse_layout(layout: &str) -> Result<(Vec<TileDescriptor>, Option<Coordinate>)> {
    let mut tiles = Vec::new();
    let mut origin = None;

    for (row, line) in layout.lines().enumerate() {
        let row = i32::try_from(row).context("layout has too many rows")?;
        for (column, glyph) in line.chars().enumerate() {
            let column = i32::try_from(column).context("layout row is too wide")?;
            let coordinate = Coordinate::new(column, row);

            if glyph == ORIGIN_GLYPH && origin.replace(coordinate).is_some() {
                bail!("layout marks more than one origin; second one at {coordinate}");
            }

            if let Some(descriptor) = descriptor_for_glyph(glyph, coordinate)? {
                tiles.push(descriptor);
            }
        }
    }

    Ok((tiles, origin))
}

fn descriptor_for_glyph(glyph: char, coordinate: Coordinate) -> Result<Option<TileDescriptor>> {
    let descriptor = match glyph {
        ' ' => return Ok(None),
        '.' | ORIGIN_GLYPH => TileDescriptor::open(coordinate, TileKind::Floor),
        ',' => TileDescriptor::shadow(coordinate),
        '#' => TileDescriptor::wall(coordinate),
        '~' => TileDescriptor {
            blocks_movement: true,
            ..TileDescriptor::open(coordinate, TileKind::Water)
        },
        '*' => TileDescriptor {
            blocks_movement: true,
            blocks_vision: true,
            ..TileDescriptor::open(coordinate, TileKind::Decor)
        },
        _ => bail!("unknown layout glyph `{glyph}` at {coordinate}"),
    };
    Ok(Some(descriptor))
}

#[cfg(test)]
mod tests {
    use dungeon_vision_board::query;

    use super::*;

    #[test]
    fn layout_glyphs_become_descriptors() {
        let scenario = Scenario::parse(
            r##"
            layout = """
#,~
*@.
"""
            "##,
        )
        .expect("scenario parses");

        let (board, origin) = scenario.board().expect("layout parses");

        assert_eq!(origin, Some(Coordinate::new(1, 1)));
        assert!(query::is_blocking_vision(&board, Coordinate::new(0, 0)));
        assert!(query::is_shadow(&board, Coordinate::new(1, 0)));
        assert_eq!(query::tile_kind(&board, Coordinate::new(2, 0)), TileKind::Water);
        assert!(query::is_blocking_vision(&board, Coordinate::new(0, 1)));
        assert_eq!(query::tile_kind(&board, Coordinate::new(1, 1)), TileKind::Floor);
        assert_eq!(query::known_coordinates(&board).len(), 6);
    }

    #[test]
    fn explicit_tiles_override_layout() {
        let scenario = Scenario::parse(
            r#"
            layout = ".."

            [[tiles]]
            coordinate = { column = 1, row = 0 }
            kind = "wall"
            blocks_vision = true
            "#,
        )
        .expect("scenario parses");

        let (board, _) = scenario.board().expect("layout parses");

        assert!(query::is_blocking_vision(&board, Coordinate::new(1, 0)));
        assert_eq!(query::tiles(&board).len(), 2);
    }

    #[test]
    fn profiles_resolve_through_default() {
        let scenario = Scenario::parse(
            r#"
            default_profile = { profession = "warrior", base_range = 3 }

            [[profiles]]
            profession = "rogue"
            base_range = 5
            shadow_penalty = 2
            peek_beyond_blocker = true
            "#,
        )
        .expect("scenario parses");

        let profiles = scenario.profiles();

        let rogue = profiles.resolve(Profession::Rogue);
        assert_eq!(rogue.base_range(), 5);
        assert_eq!(rogue.shadow_penalty(), 2);
        assert!(rogue.peek_beyond_blocker());
        let mage = profiles.resolve(Profession::Mage);
        assert_eq!(mage.base_range(), 3);
        assert_eq!(mage.shadow_penalty(), 1);
    }

    #[test]
    fn invalid_profile_is_rejected_on_load() {
        let error = Scenario::parse(
            r#"
            [[profiles]]
            profession = "hunter"
            base_range = 0
            "#,
        )
        .expect_err("zero range must be rejected");

        assert!(format!("{error:#}").contains("base vision range must be at least 1"));
    }

    #[test]
    fn unknown_glyph_is_rejected() {
        let scenario = Scenario::parse(r#"layout = ".?""#).expect("scenario parses");
        let error = scenario.board().expect_err("glyph must be rejected");
        assert!(error.to_string().contains("unknown layout glyph `?` at 1,0"));
    }

    #[test]
    fn duplicate_origin_is_rejected() {
        let scenario = Scenario::parse(r#"layout = "@.@""#).expect("scenario parses");
        assert!(scenario.board().is_err());
    }

    #[test]
    fn origin_and_profession_are_validated() {
        let scenario = Scenario::parse(
            r#"
            origin = "2,x"
            profession = "bard"
            "#,
        )
        .expect("scenario parses");

        assert!(scenario.origin().is_err());
        assert!(scenario.profession().is_err());
    }
}
