//! Strategy definitions and execution
//!
//! Every strategy sees the world from its own side of the table: the first
//! history argument is always the opponent's moves, the second its own.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::random::SeededRng;

/// A move in the Prisoner's Dilemma
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    #[serde(rename = "C")]
    Cooperate,
    #[serde(rename = "D")]
    Defect,
}

impl Move {
    /// The other move
    pub fn flip(self) -> Self {
        match self {
            Move::Cooperate => Move::Defect,
            Move::Defect => Move::Cooperate,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Move::Cooperate => 'C',
            Move::Defect => 'D',
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Move {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C" => Ok(Move::Cooperate),
            "D" => Ok(Move::Defect),
            other => Err(GameError::InvalidMove { token: other.to_string() }),
        }
    }
}

/// Identifier of a scripted opponent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Never defects.
    AlwaysCooperate,
    /// Never cooperates.
    AlwaysDefect,
    /// Copy opponent's last move. Start with cooperate.
    TitForTat,
    /// Cooperate until the opponent defects once.
    Grudger,
    /// Coin flip every round.
    Random,
    /// Cooperate until opponent defects once, then always defect.
    GrimTrigger,
    /// Defect only if opponent defected twice in a row.
    TitForTwoTats,
    /// Keep the last move if both players matched, otherwise switch.
    Pavlov,
    /// Tit-for-Tat but start with defect.
    SuspiciousTitForTat,
    /// Tit-for-Tat that forgives a defection 30% of the time.
    GenerousTitForTat,
    /// Opens D, C, C then punishes any early defection forever.
    Prober,
    /// Tit-for-Tat with a 10% sneak defection after cooperation.
    Joss,
    /// Punishes each defection with three rounds of defection.
    Spiteful,
    /// Five defections, then cooperation.
    HitAndRun,
    /// Alternates, but exploits two cooperations in a row.
    TrickyAlternator,
    /// Defects every third round.
    TwoTimer,
    /// Opposite of the opponent's last move.
    AntiTitForTat,
    /// Breaks an alternating C, D, C, D opponent.
    CycleBreaker,
    /// Ten defections, then rewards a fully cooperative opening.
    StubbornDefector,
    /// Tit-for-Tat that turns on the opponent every fifth round.
    DisloyalFriend,
    /// Flips its own last move.
    MirrorMirror,
    /// Only two defections in a row provoke it.
    PeoplePleaser,
    /// Exploits four cooperations in a row.
    Opportunist,
    /// Every defection costs two rounds of defection.
    GuiltTripper,
    /// Watches ten rounds, then commits to the opponent's majority.
    SlowLearner,
    /// Tit-for-Tat with a 1-in-7 betrayal.
    Backstabber,
    /// Follows the opponent's overall majority.
    MirrorNarcissist,
    /// Answers the opponent's move from two rounds ago with its opposite.
    Flatterer,
    /// Defects except on every third round.
    Standoffish,
    /// Opens C, D, C, D then plays grudger or tit-for-tat.
    Detective,
    /// Slow to anger and never angry for long.
    Peacemaker,
}

impl StrategyKind {
    /// Registry key
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::AlwaysCooperate => "always_cooperate",
            StrategyKind::AlwaysDefect => "always_defect",
            StrategyKind::TitForTat => "tit_for_tat",
            StrategyKind::Grudger => "grudger",
            StrategyKind::Random => "random",
            StrategyKind::GrimTrigger => "grim_trigger",
            StrategyKind::TitForTwoTats => "tit_for_two_tats",
            StrategyKind::Pavlov => "pavlov",
            StrategyKind::SuspiciousTitForTat => "suspicious_tit_for_tat",
            StrategyKind::GenerousTitForTat => "generous_tit_for_tat",
            StrategyKind::Prober => "prober",
            StrategyKind::Joss => "joss",
            StrategyKind::Spiteful => "spiteful",
            StrategyKind::HitAndRun => "hit_and_run",
            StrategyKind::TrickyAlternator => "tricky_alternator",
            StrategyKind::TwoTimer => "two_timer",
            StrategyKind::AntiTitForTat => "anti_tit_for_tat",
            StrategyKind::CycleBreaker => "cycle_breaker",
            StrategyKind::StubbornDefector => "stubborn_defector",
            StrategyKind::DisloyalFriend => "disloyal_friend",
            StrategyKind::MirrorMirror => "mirror_mirror",
            StrategyKind::PeoplePleaser => "people_pleaser",
            StrategyKind::Opportunist => "opportunist",
            StrategyKind::GuiltTripper => "guilt_tripper",
            StrategyKind::SlowLearner => "slow_learner",
            StrategyKind::Backstabber => "backstabber",
            StrategyKind::MirrorNarcissist => "mirror_narcissist",
            StrategyKind::Flatterer => "flatterer",
            StrategyKind::Standoffish => "standoffish",
            StrategyKind::Detective => "detective",
            StrategyKind::Peacemaker => "peacemaker",
        }
    }

    /// Human-readable title, e.g. "Tit for Tat"
    pub fn display_name(self) -> String {
        self.name()
            .split('_')
            .enumerate()
            .map(|(i, word)| match (i, word) {
                (i, "for" | "and") if i > 0 => word.to_string(),
                _ => {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect(),
                        None => String::new(),
                    }
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// One-sentence explanation shown next to results
    pub fn description(self) -> &'static str {
        match self {
            StrategyKind::AlwaysCooperate => "Never defects. Always cooperates.",
            StrategyKind::AlwaysDefect => "Never cooperates. Always defects.",
            StrategyKind::TitForTat => "Cooperates first, then copies your last move.",
            StrategyKind::Grudger => "Cooperates until you defect even once.",
            StrategyKind::Random => "Flips a coin every round.",
            StrategyKind::GrimTrigger => "Cooperates until betrayed, then always defects.",
            StrategyKind::TitForTwoTats => "Only retaliates after two consecutive defections.",
            StrategyKind::Pavlov => "Repeats its move when you both matched, switches otherwise.",
            StrategyKind::SuspiciousTitForTat => "Like Tit for Tat, but opens with a defection.",
            StrategyKind::GenerousTitForTat => "Tit for Tat that forgives a defection 30% of the time.",
            StrategyKind::Prober => "Opens D, C, C to test you, then punishes any early defection.",
            StrategyKind::Joss => "Tit for Tat that sneaks in a defection 10% of the time.",
            StrategyKind::Spiteful => "Defects for three rounds after each defection, then forgives.",
            StrategyKind::HitAndRun => "Defects for the first five rounds, then cooperates forever.",
            StrategyKind::TrickyAlternator => "Alternates C and D, but defects after two cooperations in a row.",
            StrategyKind::TwoTimer => "Defects every third round, otherwise cooperates.",
            StrategyKind::AntiTitForTat => "Does the opposite of your last move.",
            StrategyKind::CycleBreaker => "Defects to break an alternating C, D, C, D pattern.",
            StrategyKind::StubbornDefector => "Defects for ten rounds, then cooperates only if you never defected in them.",
            StrategyKind::DisloyalFriend => "Tit for Tat that flips sides every fifth round.",
            StrategyKind::MirrorMirror => "Always does the opposite of its own last move.",
            StrategyKind::PeoplePleaser => "Cooperates unless you defect twice in a row.",
            StrategyKind::Opportunist => "Defects after you cooperate four times in a row.",
            StrategyKind::GuiltTripper => "Answers each defection with two rounds of defection.",
            StrategyKind::SlowLearner => "Cooperates for ten rounds, then sticks to your most common move in them.",
            StrategyKind::Backstabber => "Tit for Tat with a 1-in-7 chance of betrayal.",
            StrategyKind::MirrorNarcissist => "Mimics your overall majority behaviour.",
            StrategyKind::Flatterer => "Plays the opposite of your move from two rounds ago.",
            StrategyKind::Standoffish => "Defects except on every third round.",
            StrategyKind::Detective => "Opens C, D, C, D, then plays Grudger if you defected, Tit for Tat otherwise.",
            StrategyKind::Peacemaker => "Defects once you have defected three times, but never more than twice in a row.",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::registry::lookup(s)
    }
}

/// Anything that can pick the next move from both histories
pub trait Strategy {
    /// Decide the next move.
    ///
    /// # Arguments
    /// * `opponent_history` - Moves the other side has played so far
    /// * `own_history` - Moves this strategy has played so far
    /// * `rng` - Random number generator for this round
    fn next_move(
        &mut self,
        opponent_history: &[Move],
        own_history: &[Move],
        rng: &mut SeededRng,
    ) -> Move;
}

/// One strategy instance seated against the user.
///
/// Created fresh for every opponent slot of every session, so the memory a
/// strategy keeps beyond the histories never leaks between games.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opponent {
    pub kind: StrategyKind,
    /// Rounds of punishment left (spiteful only)
    #[serde(default)]
    punish_timer: u8,
}

impl Opponent {
    pub fn new(kind: StrategyKind) -> Self {
        Self { kind, punish_timer: 0 }
    }
}

impl Strategy for Opponent {
    fn next_move(
        &mut self,
        opponent_history: &[Move],
        own_history: &[Move],
        rng: &mut SeededRng,
    ) -> Move {
        match self.kind {
            StrategyKind::Spiteful => {
                execute_spiteful(opponent_history, &mut self.punish_timer)
            }
            kind => execute_strategy(kind, opponent_history, own_history, rng),
        }
    }
}

/// Execute a memoryless strategy for one round
///
/// Spiteful needs its countdown and is only reachable through [`Opponent`];
/// called here it behaves as if freshly seated.
pub fn execute_strategy(
    kind: StrategyKind,
    opponent_history: &[Move],
    own_history: &[Move],
    rng: &mut SeededRng,
) -> Move {
    match kind {
        StrategyKind::AlwaysCooperate => Move::Cooperate,
        StrategyKind::AlwaysDefect => Move::Defect,
        StrategyKind::TitForTat => copy_last(opponent_history, Move::Cooperate),
        StrategyKind::Grudger | StrategyKind::GrimTrigger => {
            execute_grim_trigger(opponent_history)
        }
        StrategyKind::Random => {
            if rng.chance(50) {
                Move::Cooperate
            } else {
                Move::Defect
            }
        }
        StrategyKind::TitForTwoTats | StrategyKind::PeoplePleaser => {
            execute_tit_for_two_tats(opponent_history)
        }
        StrategyKind::Pavlov => execute_pavlov(opponent_history, own_history),
        StrategyKind::SuspiciousTitForTat => copy_last(opponent_history, Move::Defect),
        StrategyKind::GenerousTitForTat => {
            execute_generous_tit_for_tat(opponent_history, rng)
        }
        StrategyKind::Prober => execute_prober(opponent_history, own_history),
        StrategyKind::Joss => execute_joss(opponent_history, rng),
        StrategyKind::Spiteful => execute_spiteful(opponent_history, &mut 0),
        StrategyKind::HitAndRun => {
            if own_history.len() < 5 {
                Move::Defect
            } else {
                Move::Cooperate
            }
        }
        StrategyKind::TrickyAlternator => {
            execute_tricky_alternator(opponent_history, own_history)
        }
        StrategyKind::TwoTimer => {
            if (own_history.len() + 1) % 3 == 0 {
                Move::Defect
            } else {
                Move::Cooperate
            }
        }
        StrategyKind::AntiTitForTat => match opponent_history.last() {
            None => Move::Cooperate,
            Some(last) => last.flip(),
        },
        StrategyKind::CycleBreaker => execute_cycle_breaker(opponent_history),
        StrategyKind::StubbornDefector => {
            execute_stubborn_defector(opponent_history, own_history)
        }
        StrategyKind::DisloyalFriend => execute_disloyal_friend(opponent_history),
        StrategyKind::MirrorMirror => match own_history.last() {
            None => Move::Cooperate,
            Some(last) => last.flip(),
        },
        StrategyKind::Opportunist => execute_opportunist(opponent_history),
        StrategyKind::GuiltTripper => execute_guilt_tripper(opponent_history),
        StrategyKind::SlowLearner => {
            if opponent_history.len() < 10 {
                Move::Cooperate
            } else {
                majority(&opponent_history[..10])
            }
        }
        StrategyKind::Backstabber => execute_backstabber(opponent_history, rng),
        StrategyKind::MirrorNarcissist => {
            if opponent_history.is_empty() {
                Move::Cooperate
            } else {
                majority(opponent_history)
            }
        }
        StrategyKind::Flatterer => {
            if opponent_history.len() < 2 {
                Move::Cooperate
            } else {
                opponent_history[opponent_history.len() - 2].flip()
            }
        }
        StrategyKind::Standoffish => {
            if own_history.len() % 3 == 2 {
                Move::Cooperate
            } else {
                Move::Defect
            }
        }
        StrategyKind::Detective => execute_detective(opponent_history, own_history),
        StrategyKind::Peacemaker => execute_peacemaker(opponent_history),
    }
}

fn copy_last(opponent_history: &[Move], opening: Move) -> Move {
    opponent_history.last().copied().unwrap_or(opening)
}

fn defections(history: &[Move]) -> usize {
    history.iter().filter(|m| **m == Move::Defect).count()
}

/// Most common move, ties go to cooperation
fn majority(history: &[Move]) -> Move {
    let defects = defections(history);
    if history.len() - defects >= defects {
        Move::Cooperate
    } else {
        Move::Defect
    }
}

/// True if the history ends with exactly `pattern`
fn ends_with(history: &[Move], pattern: &[Move]) -> bool {
    history.len() >= pattern.len() && history[history.len() - pattern.len()..] == *pattern
}

/// Grim Trigger: Cooperate until opponent defects, then always defect
fn execute_grim_trigger(opponent_history: &[Move]) -> Move {
    if opponent_history.contains(&Move::Defect) {
        Move::Defect
    } else {
        Move::Cooperate
    }
}

/// Tit-for-Two-Tats: Only defect if opponent defected twice in a row
fn execute_tit_for_two_tats(opponent_history: &[Move]) -> Move {
    if ends_with(opponent_history, &[Move::Defect, Move::Defect]) {
        Move::Defect
    } else {
        Move::Cooperate
    }
}

/// Pavlov: if both sides played the same move last round keep it,
/// otherwise switch
fn execute_pavlov(opponent_history: &[Move], own_history: &[Move]) -> Move {
    match (opponent_history.last(), own_history.last()) {
        (Some(theirs), Some(mine)) if theirs == mine => *mine,
        (Some(_), Some(mine)) => mine.flip(),
        _ => Move::Cooperate,
    }
}

fn execute_generous_tit_for_tat(opponent_history: &[Move], rng: &mut SeededRng) -> Move {
    match opponent_history.last() {
        None => Move::Cooperate,
        Some(Move::Cooperate) => Move::Cooperate,
        Some(Move::Defect) => {
            if rng.chance(30) {
                Move::Cooperate
            } else {
                Move::Defect
            }
        }
    }
}

/// Prober: fixed D, C, C opening, then Tit-for-Tat unless the opponent
/// defected during the opening
fn execute_prober(opponent_history: &[Move], own_history: &[Move]) -> Move {
    const OPENING: [Move; 3] = [Move::Defect, Move::Cooperate, Move::Cooperate];

    if let Some(m) = OPENING.get(own_history.len()) {
        return *m;
    }
    if opponent_history.iter().take(OPENING.len()).any(|m| *m == Move::Defect) {
        Move::Defect
    } else {
        copy_last(opponent_history, Move::Cooperate)
    }
}

fn execute_joss(opponent_history: &[Move], rng: &mut SeededRng) -> Move {
    match opponent_history.last() {
        None => Move::Cooperate,
        Some(Move::Cooperate) => {
            if rng.chance(10) {
                Move::Defect
            } else {
                Move::Cooperate
            }
        }
        Some(Move::Defect) => Move::Defect,
    }
}

/// Spiteful: a defection (re)arms a three-round countdown of defections
fn execute_spiteful(opponent_history: &[Move], punish_timer: &mut u8) -> Move {
    if opponent_history.last() == Some(&Move::Defect) {
        *punish_timer = 3;
    }
    if *punish_timer > 0 {
        *punish_timer -= 1;
        Move::Defect
    } else {
        Move::Cooperate
    }
}

fn execute_tricky_alternator(opponent_history: &[Move], own_history: &[Move]) -> Move {
    if ends_with(opponent_history, &[Move::Cooperate, Move::Cooperate]) {
        return Move::Defect;
    }
    if own_history.len() % 2 == 0 {
        Move::Cooperate
    } else {
        Move::Defect
    }
}

/// Cycle Breaker: defect against an opponent alternating C, D, C, D
fn execute_cycle_breaker(opponent_history: &[Move]) -> Move {
    const CYCLE: [Move; 4] = [Move::Cooperate, Move::Defect, Move::Cooperate, Move::Defect];

    if ends_with(opponent_history, &CYCLE) {
        Move::Defect
    } else {
        Move::Cooperate
    }
}

fn execute_stubborn_defector(opponent_history: &[Move], own_history: &[Move]) -> Move {
    if own_history.len() < 10 {
        return Move::Defect;
    }
    if opponent_history.iter().take(10).all(|m| *m == Move::Cooperate) {
        Move::Cooperate
    } else {
        Move::Defect
    }
}

fn execute_disloyal_friend(opponent_history: &[Move]) -> Move {
    match opponent_history.last() {
        None => Move::Cooperate,
        Some(last) if opponent_history.len() % 5 == 0 => last.flip(),
        Some(last) => *last,
    }
}

fn execute_opportunist(opponent_history: &[Move]) -> Move {
    if ends_with(opponent_history, &[Move::Cooperate; 4]) {
        Move::Defect
    } else {
        Move::Cooperate
    }
}

fn execute_guilt_tripper(opponent_history: &[Move]) -> Move {
    if opponent_history.iter().rev().take(2).any(|m| *m == Move::Defect) {
        Move::Defect
    } else {
        Move::Cooperate
    }
}

fn execute_backstabber(opponent_history: &[Move], rng: &mut SeededRng) -> Move {
    let Some(last) = opponent_history.last() else {
        return Move::Cooperate;
    };
    if rng.one_in(7) {
        Move::Defect
    } else {
        *last
    }
}

/// Detective: fixed C, D, C, D opening, then Grudger if the opponent ever
/// defected during it, Tit-for-Tat otherwise
fn execute_detective(opponent_history: &[Move], own_history: &[Move]) -> Move {
    const OPENING: [Move; 4] = [Move::Cooperate, Move::Defect, Move::Cooperate, Move::Defect];

    if let Some(m) = OPENING.get(own_history.len()) {
        return *m;
    }
    if opponent_history.iter().take(OPENING.len()).any(|m| *m == Move::Defect) {
        Move::Defect
    } else {
        copy_last(opponent_history, Move::Cooperate)
    }
}

fn execute_peacemaker(opponent_history: &[Move]) -> Move {
    let count = defections(opponent_history);
    if count >= 2 && ends_with(opponent_history, &[Move::Defect, Move::Defect]) {
        Move::Cooperate
    } else if count >= 3 {
        Move::Defect
    } else {
        Move::Cooperate
    }
}
