#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that prints what a unit can see on a dungeon board.

mod render;
mod scenario;

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use dungeon_vision_board::{self as board, query};
use dungeon_vision_core::{Coordinate, Event, Profession};
use dungeon_vision_system_fog_of_war::FogOfWar;
use dungeon_vision_system_progression::CharacterStats;
use dungeon_vision_system_visibility::VisibilityEngine;

use crate::scenario::Scenario;

/// Highest character level the tool will simulate.
const MAX_LEVEL: u32 = 100;

/// Command-line arguments for the dungeon vision tool.
#[derive(Debug, Parser)]
#[command(
    name = "dungeon-vision",
    about = "Renders the field of view of a unit on a dungeon board."
)]
struct CliArgs {
    /// Scenario file describing the board, vision profiles and job.
    #[arg(long, value_name = "PATH")]
    scenario: PathBuf,
    /// Origin in `column,row` form. Overrides the scenario and layout marker.
    #[arg(long, value_name = "COLUMN,ROW")]
    origin: Option<Coordinate>,
    /// Profession whose vision profile is used.
    #[arg(long)]
    profession: Option<Profession>,
    /// Character level used to derive the job's vision bonus.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_LEVEL)))]
    level: Option<u32>,
}

/// Entry point for the dungeon vision command-line interface.
fn main() -> Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let output = run(&args)?;
    print!("{output}");
    Ok(())
}

fn run(args: &CliArgs) -> Result<String> {
    let scenario = Scenario::load(&args.scenario)?;
    let (mut board, marked_origin) = scenario.board()?;

    let origin = match args.origin {
        Some(origin) => Some(origin),
        None => scenario.origin()?.or(marked_origin),
    }
    .context("no origin given; pass --origin or mark one with `@` in the layout")?;
    let profession = match args.profession {
        Some(profession) => Some(profession),
        None => scenario.profession()?,
    }
    .context("no profession given; pass --profession or set one in the scenario")?;
    let level = args.level.or(scenario.level()).unwrap_or(1);
    ensure!(
        (1..=MAX_LEVEL).contains(&level),
        "level {level} is outside the supported range 1..={MAX_LEVEL}"
    );
    let range_bonus = vision_range_bonus(&scenario, level);
    log::info!("evaluating {profession} at {origin}, level {level}, range bonus {range_bonus}");

    let fog_of_war = FogOfWar::new(VisibilityEngine::new(scenario.profiles()));
    let mut commands = Vec::new();
    fog_of_war.update_fog_with_range_bonus(
        Some(query::board_view(&board)),
        origin,
        profession,
        range_bonus,
        &mut commands,
    )?;

    let mut events = Vec::new();
    for command in commands {
        board::apply(&mut board, command, &mut events);
    }
    for event in &events {
        if let Event::FogApplied { revealed, hidden } = event {
            log::debug!("fog applied: {revealed} revealed, {hidden} hidden");
        }
    }

    let known = query::known_coordinates(&board).len();
    let fogged = query::fogged_coordinates(&board).len();
    let mut output = format!("{profession} at {origin}: {fogged} of {known} tiles fogged\n");
    output.push_str(&render::render(&board, origin));
    Ok(output)
}

fn vision_range_bonus(scenario: &Scenario, level: u32) -> u32 {
    let Some(job) = scenario.job() else {
        return 0;
    };
    let mut stats = CharacterStats::new(job.clone());
    for _ in 1..level {
        stats.level_up();
    }
    stats.vision_range_bonus()
}
