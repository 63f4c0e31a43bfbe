#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Character progression: jobs, traits and level-driven stat growth.
//!
//! The only link to the vision engine is [`CharacterStats::vision_range_bonus`],
//! which callers may hand to the visibility system as a range bonus.

use dungeon_vision_core::ConfigurationError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Largest magnitude a job trait may carry.
pub const MAX_TRAIT_MAGNITUDE: f32 = 5.0;

/// Kinds of passive bonuses a job may grant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobTraitType {
    /// Placeholder trait with no effect.
    #[default]
    None,
    /// Scales victory points awarded for defeating a boss.
    BossVictoryBonus,
    /// Adds directly to the chance of avoiding a trap.
    TrapEvasion,
    /// Extends vision, both as a flat bonus and on every level-up.
    BonusVision,
    /// Extends movement, both as a flat bonus and on every level-up.
    BonusMovement,
}

/// Passive bonus granted by a job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TraitFields", into = "TraitFields")]
pub struct JobTrait {
    kind: JobTraitType,
    magnitude: f32,
    description: String,
}

impl JobTrait {
    /// Creates a validated trait.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::TraitMagnitudeOutOfRange`] when the
    /// magnitude lies outside `0..=5` or is not a number.
    pub fn new(
        kind: JobTraitType,
        magnitude: f32,
        description: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        if !(0.0..=MAX_TRAIT_MAGNITUDE).contains(&magnitude) {
            return Err(ConfigurationError::TraitMagnitudeOutOfRange { magnitude });
        }

        Ok(Self {
            kind,
            magnitude,
            description: description.into(),
        })
    }

    /// Kind of bonus the trait grants.
    #[must_use]
    pub const fn kind(&self) -> JobTraitType {
        self.kind
    }

    /// Strength of the bonus.
    #[must_use]
    pub const fn magnitude(&self) -> f32 {
        self.magnitude
    }

    /// Player-facing description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TraitFields {
    kind: JobTraitType,
    magnitude: f32,
    #[serde(default)]
    description: String,
}

impl TryFrom<TraitFields> for JobTrait {
    type Error = ConfigurationError;

    fn try_from(fields: TraitFields) -> Result<Self, Self::Error> {
        Self::new(fields.kind, fields.magnitude, fields.description)
    }
}

impl From<JobTrait> for TraitFields {
    fn from(job_trait: JobTrait) -> Self {
        Self {
            kind: job_trait.kind,
            magnitude: job_trait.magnitude,
            description: job_trait.description,
        }
    }
}

/// Whole-number character statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBlock {
    /// Maximum hit points.
    pub hp: i32,
    /// Attack strength.
    pub attack: i32,
    /// Damage mitigation.
    pub defense: i32,
    /// Luck, used for trap evasion.
    pub luck: i32,
    /// Vision stat.
    pub vision: i32,
    /// Movement allowance per turn.
    pub movement: i32,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self {
            hp: 10,
            attack: 2,
            defense: 1,
            luck: 0,
            vision: 4,
            movement: 4,
        }
    }
}

/// Fractional per-level growth, rounded when applied.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatGrowthRates {
    /// Hit point growth per level.
    pub hp: f32,
    /// Attack growth per level.
    pub attack: f32,
    /// Defense growth per level.
    pub defense: f32,
    /// Luck growth per level.
    pub luck: f32,
    /// Vision growth per level.
    pub vision: f32,
    /// Movement growth per level.
    pub movement: f32,
}

impl Default for StatGrowthRates {
    fn default() -> Self {
        Self {
            hp: 1.5,
            attack: 0.75,
            defense: 0.5,
            luck: 0.25,
            vision: 0.1,
            movement: 0.05,
        }
    }
}

/// Job description: starting stats, growth and traits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobDefinition {
    name: String,
    initial_stats: StatBlock,
    growth_rates: StatGrowthRates,
    traits: Vec<JobTrait>,
}

impl JobDefinition {
    /// Creates a job with default stats, default growth and no traits.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Replaces the starting stats.
    #[must_use]
    pub fn with_initial_stats(mut self, initial_stats: StatBlock) -> Self {
        self.initial_stats = initial_stats;
        self
    }

    /// Replaces the per-level growth rates.
    #[must_use]
    pub fn with_growth_rates(mut self, growth_rates: StatGrowthRates) -> Self {
        self.growth_rates = growth_rates;
        self
    }

    /// Appends a trait.
    #[must_use]
    pub fn with_trait(mut self, job_trait: JobTrait) -> Self {
        self.traits.push(job_trait);
        self
    }

    /// Display name of the job.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stats a level-one character starts with.
    #[must_use]
    pub const fn initial_stats(&self) -> StatBlock {
        self.initial_stats
    }

    /// Per-level growth rates.
    #[must_use]
    pub const fn growth_rates(&self) -> StatGrowthRates {
        self.growth_rates
    }

    /// Traits in declaration order.
    #[must_use]
    pub fn traits(&self) -> &[JobTrait] {
        &self.traits
    }

    /// Magnitude of the first trait of the given kind, or zero.
    #[must_use]
    pub fn trait_magnitude(&self, kind: JobTraitType) -> f32 {
        self.traits
            .iter()
            .find(|job_trait| job_trait.kind == kind)
            .map_or(0.0, |job_trait| job_trait.magnitude)
    }
}

impl Default for JobDefinition {
    fn default() -> Self {
        Self {
            name: "New Job".to_owned(),
            initial_stats: StatBlock::default(),
            growth_rates: StatGrowthRates::default(),
            traits: Vec::new(),
        }
    }
}

/// Level and stats of a single character.
#[derive(Clone, Debug, PartialEq)]
pub struct CharacterStats {
    job: Option<JobDefinition>,
    level: u32,
    stats: StatBlock,
}

impl CharacterStats {
    /// Creates a level-one character with the job's initial stats.
    #[must_use]
    pub fn new(job: JobDefinition) -> Self {
        let mut stats = Self {
            job: Some(job),
            level: 1,
            stats: ZERO_STATS,
        };
        stats.apply_initial_stats();
        stats
    }

    /// Creates a level-one character without a job. All stats stay at zero.
    #[must_use]
    pub fn without_job() -> Self {
        let mut stats = Self {
            job: None,
            level: 1,
            stats: ZERO_STATS,
        };
        stats.apply_initial_stats();
        stats
    }

    /// Resets the stats to the job's initial values.
    pub fn apply_initial_stats(&mut self) {
        let Some(job) = self.job.as_ref() else {
            log::warn!("character stats were created without a job definition");
            return;
        };
        self.stats = job.initial_stats;
    }

    /// Advances one level, applying growth and then level-up trait hooks.
    pub fn level_up(&mut self) {
        let Some(job) = self.job.as_ref() else {
            log::warn!("cannot level up without a job definition");
            return;
        };

        self.level = self.level.saturating_add(1);

        // Stats saturate instead of overflowing on very long level chains.
        let growth = job.growth_rates;
        let stats = &mut self.stats;
        stats.hp = stats.hp.saturating_add(round_to_int(growth.hp));
        stats.attack = stats.attack.saturating_add(round_to_int(growth.attack));
        stats.defense = stats.defense.saturating_add(round_to_int(growth.defense));
        stats.luck = stats.luck.saturating_add(round_to_int(growth.luck));
        stats.vision = stats.vision.saturating_add(round_to_int(growth.vision));
        stats.movement = stats.movement.saturating_add(round_to_int(growth.movement));

        if let Some(bonus) = first_trait(job, JobTraitType::BonusVision) {
            stats.vision = stats.vision.saturating_add(round_to_int(bonus.magnitude));
        }
        if let Some(bonus) = first_trait(job, JobTraitType::BonusMovement) {
            stats.movement = stats.movement.saturating_add(round_to_int(bonus.magnitude));
        }
    }

    /// Job driving growth, if any.
    #[must_use]
    pub fn job(&self) -> Option<&JobDefinition> {
        self.job.as_ref()
    }

    /// Current level, starting at one.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Current stats.
    #[must_use]
    pub const fn stats(&self) -> StatBlock {
        self.stats
    }

    /// Scales boss victory points by the job's boss bonus.
    #[must_use]
    pub fn resolve_boss_victory_points(&self, base_victory_points: i32) -> i32 {
        let Some(job) = self.job.as_ref() else {
            return base_victory_points;
        };

        let bonus = job.trait_magnitude(JobTraitType::BossVictoryBonus);
        round_to_int(base_victory_points as f32 * (1.0 + bonus))
    }

    /// Rolls a trap evasion check against the provided difficulty.
    ///
    /// The chance is `(luck + 1) / max(1, difficulty)` plus the job's trap
    /// evasion trait, each clamped to `0..=1`.
    pub fn try_avoid_trap<R>(&self, trap_difficulty: f32, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        let base_chance =
            ((self.stats.luck as f32 + 1.0) / trap_difficulty.max(1.0)).clamp(0.0, 1.0);
        let trait_bonus = self.trait_magnitude(JobTraitType::TrapEvasion);
        let final_chance = (base_chance + trait_bonus).clamp(0.0, 1.0);
        rng.gen::<f32>() <= final_chance
    }

    /// Adds the job's flat vision bonus to `current_vision`.
    #[must_use]
    pub fn apply_vision_bonus(&self, current_vision: i32) -> i32 {
        current_vision.saturating_add(round_to_int(self.trait_magnitude(JobTraitType::BonusVision)))
    }

    /// Adds the job's flat movement bonus to `current_move`.
    #[must_use]
    pub fn apply_movement_bonus(&self, current_move: i32) -> i32 {
        current_move.saturating_add(round_to_int(self.trait_magnitude(JobTraitType::BonusMovement)))
    }

    /// Vision range bonus suitable for the visibility engine.
    ///
    /// Counts the vision gained since level one plus the job's flat vision
    /// bonus. Never negative.
    #[must_use]
    pub fn vision_range_bonus(&self) -> u32 {
        let initial = self.job.as_ref().map_or(0, |job| job.initial_stats.vision);
        let gained = self.stats.vision.saturating_sub(initial);
        u32::try_from(self.apply_vision_bonus(gained)).unwrap_or(0)
    }

    fn trait_magnitude(&self, kind: JobTraitType) -> f32 {
        self.job
            .as_ref()
            .map_or(0.0, |job| job.trait_magnitude(kind))
    }
}

const ZERO_STATS: StatBlock = StatBlock {
    hp: 0,
    attack: 0,
    defense: 0,
    luck: 0,
    vision: 0,
    movement: 0,
};

fn first_trait(job: &JobDefinition, kind: JobTraitType) -> Option<&JobTrait> {
    job.traits.iter().find(|job_trait| job_trait.kind == kind)
}

/// Rounds half-way values to the nearest even integer.
fn round_to_int(value: f32) -> i32 {
    value.round_ties_even() as i32
}
