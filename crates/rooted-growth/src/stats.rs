//! Tree stats and the modifiers that cards attach to them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GrowthError;

/// Arithmetic applied by a [`StatModifier`].
///
/// Modifiers are applied highest priority first, so `Max` caps the base
/// before any division, multiplication, subtraction or addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatOperation {
    /// `current + value`, applied last.
    Addition,
    /// `current - value`.
    Subtraction,
    /// `current * value`.
    Multiplication,
    /// `current / value`. Zero divisors are rejected at construction.
    Division,
    /// `min(current, value)`: caps the stat, applied first.
    Max,
}

impl StatOperation {
    /// Ordering priority; higher runs earlier.
    pub fn priority(self) -> u8 {
        match self {
            Self::Addition => 1,
            Self::Subtraction => 2,
            Self::Multiplication => 3,
            Self::Division => 4,
            Self::Max => 5,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Addition => "+",
            Self::Subtraction => "-",
            Self::Multiplication => "x",
            Self::Division => "÷",
            Self::Max => "Max of ",
        }
    }

    fn apply(self, current: f32, value: f32) -> f32 {
        match self {
            Self::Addition => current + value,
            Self::Subtraction => current - value,
            Self::Multiplication => current * value,
            Self::Division => current / value,
            Self::Max => current.min(value),
        }
    }
}

/// An operation paired with its operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatModifier {
    operation: StatOperation,
    value: f32,
}

impl StatModifier {
    /// Creates a modifier, rejecting non-finite operands and division by zero.
    pub fn new(operation: StatOperation, value: f32) -> Result<Self, GrowthError> {
        if !value.is_finite() {
            return Err(GrowthError::InvalidModifier(format!(
                "{operation:?} by non-finite value {value}"
            )));
        }
        if operation == StatOperation::Division && value == 0.0 {
            return Err(GrowthError::InvalidModifier("division by zero".to_string()));
        }
        Ok(Self { operation, value })
    }

    /// The arithmetic this modifier applies.
    pub fn operation(&self) -> StatOperation {
        self.operation
    }

    /// The operand, always finite.
    pub fn value(&self) -> f32 {
        self.value
    }
}

impl fmt::Display for StatModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operation.symbol(), self.value)
    }
}

/// Which tree stat a modifier targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatType {
    /// Targets nothing; modifiers for it are discarded.
    None,
    /// Energy per branch; also the divisor for root width.
    Energy,
    /// Growth speed in units per second.
    GrowthSpeed,
    /// Turn rate in degrees per second at full input.
    GrowthManeuverability,
    /// Extra-root stat carried by cards.
    ExtraRoot,
    /// Folds the depth and length scores through its modifiers.
    Scoring,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "None",
            Self::Energy => "Energy",
            Self::GrowthSpeed => "GrowthSpeed",
            Self::GrowthManeuverability => "GrowthManeuverability",
            Self::ExtraRoot => "ExtraRoot",
            Self::Scoring => "Scoring",
        };
        f.write_str(name)
    }
}

/// A base value and the modifiers collected for it.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeStat {
    base: f32,
    modifiers: Vec<StatModifier>,
}

impl TreeStat {
    /// A stat with no modifiers yet.
    pub fn new(base: f32) -> Self {
        Self {
            base,
            modifiers: Vec::new(),
        }
    }

    /// The unmodified value.
    pub fn base(&self) -> f32 {
        self.base
    }

    /// Modifiers in collection order.
    pub fn modifiers(&self) -> &[StatModifier] {
        &self.modifiers
    }

    /// Appends `modifier`; it applies to every later [`value`](Self::value).
    pub fn add_modifier(&mut self, modifier: StatModifier) {
        self.modifiers.push(modifier);
    }

    /// The base folded through every modifier.
    pub fn value(&self) -> f32 {
        self.one_off_value(self.base)
    }

    /// `input` folded through this stat's modifiers, ignoring the base.
    ///
    /// Modifiers are applied in descending priority; modifiers of equal
    /// priority keep their insertion order.
    pub fn one_off_value(&self, input: f32) -> f32 {
        let mut ordered: Vec<&StatModifier> = self.modifiers.iter().collect();
        ordered.sort_by_key(|m| std::cmp::Reverse(m.operation.priority()));
        ordered
            .into_iter()
            .fold(input, |current, m| m.operation.apply(current, m.value))
    }
}

/// One [`TreeStat`] per stat type.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeStats {
    /// Energy per branch.
    pub energy: TreeStat,
    /// Units grown per second.
    pub growth_speed: TreeStat,
    /// Degrees turned per second at full input.
    pub growth_maneuverability: TreeStat,
    /// Extra-root stat.
    pub extra_root: TreeStat,
    /// Score multiplier stat; its base is unused.
    pub scoring: TreeStat,
}

impl TreeStats {
    /// Stats with the given base values and no modifiers.
    pub fn new(
        energy: f32,
        growth_speed: f32,
        growth_maneuverability: f32,
        extra_root: f32,
        scoring: f32,
    ) -> Self {
        Self {
            energy: TreeStat::new(energy),
            growth_speed: TreeStat::new(growth_speed),
            growth_maneuverability: TreeStat::new(growth_maneuverability),
            extra_root: TreeStat::new(extra_root),
            scoring: TreeStat::new(scoring),
        }
    }

    /// The stat for `stat_type`, or `None` for [`StatType::None`].
    pub fn get(&self, stat_type: StatType) -> Option<&TreeStat> {
        match stat_type {
            StatType::None => None,
            StatType::Energy => Some(&self.energy),
            StatType::GrowthSpeed => Some(&self.growth_speed),
            StatType::GrowthManeuverability => Some(&self.growth_maneuverability),
            StatType::ExtraRoot => Some(&self.extra_root),
            StatType::Scoring => Some(&self.scoring),
        }
    }

    fn get_mut(&mut self, stat_type: StatType) -> Option<&mut TreeStat> {
        match stat_type {
            StatType::None => None,
            StatType::Energy => Some(&mut self.energy),
            StatType::GrowthSpeed => Some(&mut self.growth_speed),
            StatType::GrowthManeuverability => Some(&mut self.growth_maneuverability),
            StatType::ExtraRoot => Some(&mut self.extra_root),
            StatType::Scoring => Some(&mut self.scoring),
        }
    }

    /// Attaches a modifier. Modifiers for [`StatType::None`] are dropped.
    pub fn add_modifier(&mut self, stat_type: StatType, modifier: StatModifier) {
        match self.get_mut(stat_type) {
            Some(stat) => stat.add_modifier(modifier),
            None => tracing::debug!("Ignoring modifier {modifier} without a stat"),
        }
    }
}
