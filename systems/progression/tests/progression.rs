use dungeon_vision_system_progression::{
    CharacterStats, JobDefinition, JobTrait, JobTraitType, StatBlock, StatGrowthRates,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn scout() -> JobDefinition {
    JobDefinition::new("Scout")
        .with_trait(JobTrait::new(JobTraitType::BonusVision, 1.0, "Sharp eyes").expect("valid"))
        .with_trait(JobTrait::new(JobTraitType::BonusMovement, 0.5, "Light feet").expect("valid"))
}

#[test]
fn new_character_starts_with_job_initial_stats() {
    let stats = CharacterStats::new(JobDefinition::new("Squire"));

    assert_eq!(stats.level(), 1);
    assert_eq!(stats.stats(), StatBlock::default());
}

#[test]
fn level_up_applies_rounded_growth() {
    let mut stats = CharacterStats::new(JobDefinition::new("Squire"));

    stats.level_up();

    assert_eq!(stats.level(), 2);
    assert_eq!(
        stats.stats(),
        StatBlock {
            hp: 12,
            attack: 3,
            defense: 1,
            luck: 0,
            vision: 4,
            movement: 4,
        },
        "1.5 rounds to 2, 0.75 to 1, and 0.5 to even zero"
    );
}

#[test]
fn level_up_adds_trait_bonuses_after_growth() {
    let job = scout().with_growth_rates(StatGrowthRates {
        hp: 0.0,
        attack: 0.0,
        defense: 0.0,
        luck: 0.0,
        vision: 0.0,
        movement: 0.0,
    });
    let mut stats = CharacterStats::new(job);

    stats.level_up();
    stats.level_up();

    assert_eq!(stats.stats().vision, 6);
    assert_eq!(stats.stats().movement, 4, "a 0.5 movement bonus rounds to zero");
    assert_eq!(stats.vision_range_bonus(), 3, "two level-up bonuses plus the flat bonus");
}

#[test]
fn level_up_saturates_instead_of_overflowing() {
    let job = scout().with_initial_stats(StatBlock {
        hp: i32::MAX,
        vision: i32::MAX - 1,
        ..StatBlock::default()
    });
    let mut stats = CharacterStats::new(job);

    stats.level_up();

    assert_eq!(stats.stats().hp, i32::MAX);
    assert_eq!(stats.stats().vision, i32::MAX);
    assert_eq!(stats.level(), 2);
}

#[test]
fn jobless_character_ignores_level_up() {
    let mut stats = CharacterStats::without_job();

    stats.level_up();

    assert_eq!(stats.level(), 1);
    assert_eq!(stats.stats().hp, 0);
    assert_eq!(stats.vision_range_bonus(), 0);
    assert_eq!(stats.resolve_boss_victory_points(40), 40);
}

#[test]
fn flat_bonuses_follow_traits() {
    let stats = CharacterStats::new(scout());

    assert_eq!(stats.apply_vision_bonus(4), 5);
    assert_eq!(stats.apply_movement_bonus(4), 4);
    assert_eq!(stats.vision_range_bonus(), 1);
}

#[test]
fn boss_bonus_scales_victory_points() {
    let job = JobDefinition::new("Slayer").with_trait(
        JobTrait::new(JobTraitType::BossVictoryBonus, 0.25, "Trophy hunter").expect("valid"),
    );
    let stats = CharacterStats::new(job);

    assert_eq!(stats.resolve_boss_victory_points(100), 125);
}

#[test]
fn trap_evasion_is_certain_when_chance_saturates() {
    let job = JobDefinition::new("Thief").with_initial_stats(StatBlock {
        luck: 9,
        ..StatBlock::default()
    });
    let stats = CharacterStats::new(job);
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);

    assert!((0..200).all(|_| stats.try_avoid_trap(10.0, &mut rng)));
}

#[test]
fn trap_evasion_trait_lifts_hopeless_odds() {
    let unlucky = StatBlock {
        luck: -5,
        ..StatBlock::default()
    };
    let plain = CharacterStats::new(JobDefinition::new("Peasant").with_initial_stats(unlucky));
    let nimble = CharacterStats::new(
        JobDefinition::new("Acrobat")
            .with_initial_stats(unlucky)
            .with_trait(JobTrait::new(JobTraitType::TrapEvasion, 1.0, "Tumble").expect("valid")),
    );
    let mut rng = ChaCha8Rng::seed_from_u64(0x7a11);

    let plain_successes = (0..200)
        .filter(|_| plain.try_avoid_trap(4.0, &mut rng))
        .count();
    let nimble_successes = (0..200)
        .filter(|_| nimble.try_avoid_trap(4.0, &mut rng))
        .count();

    assert!(plain_successes < 5, "zero chance should almost never succeed");
    assert_eq!(nimble_successes, 200);
}

#[test]
fn job_definition_defaults_to_standard_stats() {
    let job = JobDefinition::new("Ranger")
        .with_trait(JobTrait::new(JobTraitType::BonusVision, 2.0, "").expect("valid"));

    assert_eq!(job.name(), "Ranger");
    assert_eq!(job.traits().len(), 1);
    assert_eq!(job.initial_stats(), StatBlock::default());
    assert_eq!(job.growth_rates(), StatGrowthRates::default());
}
