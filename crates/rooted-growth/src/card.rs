//! Stat cards picked up while growing, and their icon table.

use rooted_world::AssetHandle;
use rustc_hash::FxHashMap;

use crate::stats::{StatModifier, StatOperation, StatType};

/// A pickup that attaches a modifier to one tree stat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeCard {
    pub stat_type: StatType,
    pub modifier: StatModifier,
}

impl TreeCard {
    pub fn new(stat_type: StatType, modifier: StatModifier) -> Self {
        Self {
            stat_type,
            modifier,
        }
    }

    /// Text shown on the card, e.g. `"Energy +10"` or `"Scoring Max of 500"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.stat_type, self.modifier)
    }

    /// Flat energy bonus granted immediately on pickup, if any.
    pub fn extra_energy(&self) -> Option<f32> {
        let flat = self.stat_type == StatType::Energy
            && self.modifier.operation() == StatOperation::Addition;
        flat.then(|| self.modifier.value())
    }
}

/// Immutable mapping from stat type to card icon.
#[derive(Debug, Clone, Default)]
pub struct CardIcons {
    icons: FxHashMap<StatType, AssetHandle>,
}

impl CardIcons {
    pub fn new(icons: impl IntoIterator<Item = (StatType, AssetHandle)>) -> Self {
        Self {
            icons: icons.into_iter().collect(),
        }
    }

    /// Icon for `stat_type`, if one was registered.
    pub fn icon(&self, stat_type: StatType) -> Option<AssetHandle> {
        self.icons.get(&stat_type).copied()
    }

    /// Icon for the stat a card targets.
    pub fn icon_for(&self, card: &TreeCard) -> Option<AssetHandle> {
        self.icon(card.stat_type)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(stat_type: StatType, operation: StatOperation, value: f32) -> TreeCard {
        TreeCard::new(stat_type, StatModifier::new(operation, value).unwrap())
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            card(StatType::Energy, StatOperation::Addition, 10.0).label(),
            "Energy +10"
        );
        assert_eq!(
            card(StatType::Scoring, StatOperation::Multiplication, 2.0).label(),
            "Scoring x2"
        );
        assert_eq!(
            card(StatType::GrowthSpeed, StatOperation::Division, 2.0).label(),
            "GrowthSpeed ÷2"
        );
        assert_eq!(
            card(StatType::Scoring, StatOperation::Max, 500.0).label(),
            "Scoring Max of 500"
        );
    }

    #[test]
    fn test_extra_energy_only_for_flat_energy() {
        assert_eq!(
            card(StatType::Energy, StatOperation::Addition, 25.0).extra_energy(),
            Some(25.0)
        );
        assert_eq!(
            card(StatType::Energy, StatOperation::Multiplication, 2.0).extra_energy(),
            None
        );
        assert_eq!(
            card(StatType::GrowthSpeed, StatOperation::Addition, 1.0).extra_energy(),
            None
        );
    }

    #[test]
    fn test_icon_lookup() {
        let icons = CardIcons::new([
            (StatType::Energy, AssetHandle(1)),
            (StatType::Scoring, AssetHandle(2)),
        ]);
        assert_eq!(icons.len(), 2);
        assert_eq!(icons.icon(StatType::Scoring), Some(AssetHandle(2)));
        assert_eq!(icons.icon(StatType::ExtraRoot), None);
        let energy = card(StatType::Energy, StatOperation::Addition, 5.0);
        assert_eq!(icons.icon_for(&energy), Some(AssetHandle(1)));
    }
}
