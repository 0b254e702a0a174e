//! Root growth: the branching root tree, stat cards, scoring, level
//! progression and the per-tick growth session that drives them.

mod card;
mod error;
mod progress;
mod recap;
mod root_tree;
mod score;
mod session;
mod stats;
mod width_curve;

pub use card::{CardIcons, TreeCard};
pub use error::GrowthError;
pub use progress::{LevelCurve, TreeProgress};
pub use recap::{RECAP_TOLERANCE, recap_line, simplify};
pub use root_tree::{Root, RootId, RootPoint, RootTree};
pub use score::{DayStats, ScoreBreakdown, ScoreModel, ScoringConfig};
pub use session::{
    DayReport, GRAVITY, GrowthConfig, GrowthEvent, GrowthInput, GrowthSession, TickOutcome,
};
pub use stats::{StatModifier, StatOperation, StatType, TreeStat, TreeStats};
pub use width_curve::{WidthCurve, WidthKey};
