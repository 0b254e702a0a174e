//! Synthetic player input: a seeded wander that keeps the tip heading
//! roughly downward, plus random splits and card pickups.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rooted_growth::{GrowthError, StatModifier, StatOperation, StatType, TreeCard};
use rooted_world::seed::world_rng;

/// Offset mixed into the world seed so steering draws never share a
/// stream with world generation.
const STEERING_SEED_OFFSET: u32 = 0x5EED;

/// Cards the wanderer can pick up.
const DECK: [(StatType, StatOperation, f32); 7] = [
    (StatType::Energy, StatOperation::Addition, 10.0),
    (StatType::Energy, StatOperation::Addition, 25.0),
    (StatType::GrowthSpeed, StatOperation::Multiplication, 1.25),
    (StatType::GrowthManeuverability, StatOperation::Addition, 15.0),
    (StatType::Scoring, StatOperation::Addition, 50.0),
    (StatType::Scoring, StatOperation::Multiplication, 2.0),
    (StatType::Scoring, StatOperation::Max, 5000.0),
];

/// Chances and per-day limits for random events.
#[derive(Debug, Clone, Copy)]
pub struct SteeringLimits {
    /// Per-tick probability of a split.
    pub split_chance: f64,
    /// Splits allowed per day.
    pub max_splits_per_day: u32,
    /// Per-tick probability of a card pickup.
    pub card_chance: f64,
    /// Card pickups allowed per day.
    pub max_cards_per_day: u32,
}

/// Seeded wander steering.
pub struct Steering {
    rng: ChaCha8Rng,
    limits: SteeringLimits,
    target: f32,
    hold_ticks: u32,
    splits_today: u32,
    cards_today: u32,
}

impl Steering {
    pub fn new(world_seed: u32, limits: SteeringLimits) -> Self {
        Self {
            rng: world_rng(world_seed.wrapping_add(STEERING_SEED_OFFSET)),
            limits,
            target: 0.0,
            hold_ticks: 0,
            splits_today: 0,
            cards_today: 0,
        }
    }

    /// Clears the per-day split and card counters.
    pub fn start_day(&mut self) {
        self.splits_today = 0;
        self.cards_today = 0;
        self.hold_ticks = 0;
    }

    /// Rotation input for this tick given the current heading.
    ///
    /// The wander target is re-rolled every 10 to 60 ticks; the heading is
    /// pulled back toward straight down so the tip keeps digging.
    pub fn rotation(&mut self, heading_degrees: f32) -> f32 {
        if self.hold_ticks == 0 {
            self.target = self.rng.random_range(-1.0..=1.0);
            self.hold_ticks = self.rng.random_range(10..=60);
        }
        self.hold_ticks -= 1;
        (self.target - heading_degrees / 90.0).clamp(-1.0, 1.0)
    }

    /// Whether the tip splits this tick.
    pub fn roll_split(&mut self) -> bool {
        if self.splits_today >= self.limits.max_splits_per_day {
            return false;
        }
        let split = self.rng.random_bool(self.limits.split_chance.clamp(0.0, 1.0));
        if split {
            self.splits_today += 1;
        }
        split
    }

    /// A card picked up this tick, if any.
    pub fn roll_card(&mut self) -> Result<Option<TreeCard>, GrowthError> {
        if self.cards_today >= self.limits.max_cards_per_day
            || !self.rng.random_bool(self.limits.card_chance.clamp(0.0, 1.0))
        {
            return Ok(None);
        }
        self.cards_today += 1;
        let (stat_type, operation, value) = DECK[self.rng.random_range(0..DECK.len())];
        Ok(Some(TreeCard::new(
            stat_type,
            StatModifier::new(operation, value)?,
        )))
    }
}
