//! Strategy registry
//!
//! Maps registry names to [`StrategyKind`]s. Names are resolved once, when a
//! session is created; the engine never looks a strategy up by string again.

use serde::Serialize;

use crate::error::GameError;
use crate::strategy::StrategyKind;

/// Opponents eligible for random selection
pub const POOL: [StrategyKind; 29] = [
    StrategyKind::TitForTat,
    StrategyKind::Grudger,
    StrategyKind::Random,
    StrategyKind::GrimTrigger,
    StrategyKind::TitForTwoTats,
    StrategyKind::Pavlov,
    StrategyKind::SuspiciousTitForTat,
    StrategyKind::GenerousTitForTat,
    StrategyKind::Prober,
    StrategyKind::Joss,
    StrategyKind::Spiteful,
    StrategyKind::HitAndRun,
    StrategyKind::TrickyAlternator,
    StrategyKind::TwoTimer,
    StrategyKind::AntiTitForTat,
    StrategyKind::CycleBreaker,
    StrategyKind::StubbornDefector,
    StrategyKind::DisloyalFriend,
    StrategyKind::MirrorMirror,
    StrategyKind::PeoplePleaser,
    StrategyKind::Opportunist,
    StrategyKind::GuiltTripper,
    StrategyKind::SlowLearner,
    StrategyKind::Backstabber,
    StrategyKind::MirrorNarcissist,
    StrategyKind::Flatterer,
    StrategyKind::Standoffish,
    StrategyKind::Detective,
    StrategyKind::Peacemaker,
];

/// Resolvable by name, but too predictable to be dealt at random
pub const FIXED: [StrategyKind; 2] = [StrategyKind::AlwaysCooperate, StrategyKind::AlwaysDefect];

/// Every registered strategy, pool first
pub fn all() -> impl Iterator<Item = StrategyKind> {
    POOL.into_iter().chain(FIXED)
}

/// Resolve a registry name
pub fn lookup(name: &str) -> Result<StrategyKind, GameError> {
    all()
        .find(|kind| kind.name() == name)
        .ok_or_else(|| GameError::UnknownStrategy { name: name.to_string() })
}

/// Catalog entry for front ends
#[derive(Clone, Debug, Serialize)]
pub struct StrategyInfo {
    pub id: &'static str,
    pub name: String,
    pub description: &'static str,
    pub in_pool: bool,
}

impl From<StrategyKind> for StrategyInfo {
    fn from(kind: StrategyKind) -> Self {
        Self {
            id: kind.name(),
            name: kind.display_name(),
            description: kind.description(),
            in_pool: POOL.contains(&kind),
        }
    }
}

/// Catalog of every registered strategy
pub fn catalog() -> Vec<StrategyInfo> {
    all().map(StrategyInfo::from).collect()
}
