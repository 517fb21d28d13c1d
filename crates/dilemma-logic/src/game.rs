//! Game session engine
//!
//! A session walks the user through an ordered lineup of opponents. Each
//! submitted move plays one round against the seated opponent; after the
//! configured number of rounds the match is snapshotted into a
//! [`MatchResult`] and the next opponent sits down. The session is terminal
//! once every opponent has been played.

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::evaluate_round;
use crate::pairing::select_opponents;
use crate::random::SeededRng;
use crate::registry::lookup;
use crate::strategy::{Move, Opponent, Strategy, StrategyKind};

/// Session shape
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Rounds played against each opponent before rotating
    pub rounds_per_opponent: u32,
    /// Opponents dealt by [`GameSession::random`]
    pub opponents_per_game: usize,
}

impl GameConfig {
    /// 24 rounds against each of 5 opponents
    pub fn standard() -> Self {
        Self { rounds_per_opponent: 24, opponents_per_game: 5 }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Result of a single round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round within the current match
    pub round: u32,
    pub user_move: Move,
    pub ai_move: Move,
    pub user_points: u8,
    pub ai_points: u8,
}

/// Result of a complete match against one opponent. Never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub opponent: StrategyKind,
    pub user_score: u32,
    pub ai_score: u32,
    pub user_moves: Vec<Move>,
    pub ai_moves: Vec<Move>,
}

impl MatchResult {
    pub fn rounds_played(&self) -> usize {
        self.user_moves.len()
    }
}

/// What a finished session hands to the results view and to storage
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishedGame {
    pub results: Vec<MatchResult>,
    pub total_user_score: u32,
}

/// One play session: the full lineup and the match in progress
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    seed: [u8; 32],
    config: GameConfig,
    opponents: Vec<StrategyKind>,
    current_opponent_index: usize,
    /// Seated strategy instance, replaced on every rotation
    opponent: Opponent,
    round: u32,
    user_score: u32,
    ai_score: u32,
    user_moves: Vec<Move>,
    ai_moves: Vec<Move>,
    round_history: Vec<RoundRecord>,
    completed_opponents: Vec<StrategyKind>,
    results: Vec<MatchResult>,
    game_over: bool,
}

impl GameSession {
    /// Start a session against `opponents`, in order
    ///
    /// # Arguments
    /// * `opponents` - Lineup; must not be empty
    /// * `seed` - Randomness seed for the stochastic strategies
    /// * `config` - Rounds per opponent; must be at least 1
    pub fn new(
        opponents: Vec<StrategyKind>,
        seed: [u8; 32],
        config: GameConfig,
    ) -> Result<Self, GameError> {
        let Some(&first) = opponents.first() else {
            return Err(GameError::EmptyOpponentList);
        };
        if config.rounds_per_opponent == 0 {
            return Err(GameError::NoRounds);
        }

        log::info!(
            "new session against {}",
            opponents.iter().map(|k| k.name()).collect::<Vec<_>>().join(", ")
        );

        Ok(Self {
            seed,
            config,
            opponents,
            current_opponent_index: 0,
            opponent: Opponent::new(first),
            round: 1,
            user_score: 0,
            ai_score: 0,
            user_moves: Vec::new(),
            ai_moves: Vec::new(),
            round_history: Vec::new(),
            completed_opponents: Vec::new(),
            results: Vec::new(),
            game_over: false,
        })
    }

    /// Start a session from registry names
    ///
    /// Every name is resolved before anything is built; one unknown name
    /// fails the whole call.
    pub fn from_names<S: AsRef<str>>(
        names: &[S],
        seed: [u8; 32],
        config: GameConfig,
    ) -> Result<Self, GameError> {
        if names.is_empty() {
            return Err(GameError::EmptyOpponentList);
        }
        let opponents = names
            .iter()
            .map(|name| lookup(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(opponents, seed, config)
    }

    /// Start a session against opponents dealt from the pool by `seed`
    pub fn random(seed: [u8; 32], config: GameConfig) -> Result<Self, GameError> {
        let opponents = select_opponents(&seed, config.opponents_per_game);
        Self::new(opponents, seed, config)
    }

    /// Parse a raw move token and play it
    ///
    /// A bad token is rejected before the session is touched.
    pub fn play(&mut self, token: &str) -> Result<RoundRecord, GameError> {
        let user_move = token.parse::<Move>()?;
        self.step(user_move)
    }

    /// Play one round against the seated opponent
    ///
    /// The opponent sees the user's history as its opponent history and its
    /// own moves as its own. Fails with [`GameError::GameOver`] once the
    /// lineup is exhausted, leaving the session untouched.
    pub fn step(&mut self, user_move: Move) -> Result<RoundRecord, GameError> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }

        let mut rng = SeededRng::new(&self.seed, self.current_opponent_index as u32)
            .for_round(self.round);
        let ai_move = self.opponent.next_move(&self.user_moves, &self.ai_moves, &mut rng);

        let (user_points, ai_points) = evaluate_round(user_move, ai_move);
        let record = RoundRecord {
            round: self.round,
            user_move,
            ai_move,
            user_points,
            ai_points,
        };

        self.user_moves.push(user_move);
        self.ai_moves.push(ai_move);
        self.user_score += user_points as u32;
        self.ai_score += ai_points as u32;
        self.round_history.push(record);
        self.round += 1;

        log::debug!(
            "{} round {}: user {} ai {} ({}-{})",
            self.opponent.kind,
            record.round,
            user_move,
            ai_move,
            user_points,
            ai_points
        );

        if self.round > self.config.rounds_per_opponent {
            self.advance_opponent();
        }

        Ok(record)
    }

    /// Close out the seated opponent and rotate to the next one
    ///
    /// The only place a [`MatchResult`] is created. After the last opponent
    /// the final match stays readable on the session.
    fn advance_opponent(&mut self) {
        let finished = self.opponent.kind;
        let result = MatchResult {
            opponent: finished,
            user_score: self.user_score,
            ai_score: self.ai_score,
            user_moves: self.user_moves.clone(),
            ai_moves: self.ai_moves.clone(),
        };
        log::info!(
            "finished {} after {} rounds: user {} ai {}",
            finished,
            result.rounds_played(),
            result.user_score,
            result.ai_score
        );

        self.results.push(result);
        self.completed_opponents.push(finished);
        self.current_opponent_index += 1;

        match self.opponents.get(self.current_opponent_index) {
            Some(&next) => {
                self.opponent = Opponent::new(next);
                self.round = 1;
                self.user_score = 0;
                self.ai_score = 0;
                self.user_moves.clear();
                self.ai_moves.clear();
                self.round_history.clear();
            }
            None => {
                self.game_over = true;
                log::info!("game over: total user score {}", self.total_user_score());
            }
        }
    }

    /// Sum of the user's score over completed matches only
    pub fn total_user_score(&self) -> u32 {
        self.results.iter().map(|r| r.user_score).sum()
    }

    /// Hand over the results of a finished session
    pub fn finish(self) -> Result<FinishedGame, GameError> {
        if !self.is_game_over() {
            return Err(GameError::GameInProgress);
        }
        let total_user_score = self.total_user_score();
        Ok(FinishedGame { results: self.results, total_user_score })
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over || self.current_opponent_index >= self.opponents.len()
    }

    /// Seated opponent, `None` once the game is over
    pub fn current_opponent(&self) -> Option<StrategyKind> {
        if self.is_game_over() {
            None
        } else {
            Some(self.opponent.kind)
        }
    }

    pub fn current_opponent_index(&self) -> usize {
        self.current_opponent_index
    }

    pub fn opponents(&self) -> &[StrategyKind] {
        &self.opponents
    }

    pub fn completed_opponents(&self) -> &[StrategyKind] {
        &self.completed_opponents
    }

    /// 1-based round about to be played
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn rounds_per_opponent(&self) -> u32 {
        self.config.rounds_per_opponent
    }

    /// Running user score against the seated opponent
    pub fn user_score(&self) -> u32 {
        self.user_score
    }

    /// Running opponent score in the current match
    pub fn ai_score(&self) -> u32 {
        self.ai_score
    }

    pub fn user_moves(&self) -> &[Move] {
        &self.user_moves
    }

    pub fn ai_moves(&self) -> &[Move] {
        &self.ai_moves
    }

    /// Rounds of the current match so far
    pub fn round_history(&self) -> &[RoundRecord] {
        &self.round_history
    }

    pub fn results(&self) -> &[MatchResult] {
        &self.results
    }

    pub fn seed(&self) -> &[u8; 32] {
        &self.seed
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const C: Move = Move::Cooperate;
    const D: Move = Move::Defect;
    const SEED: [u8; 32] = [42u8; 32];

    fn session(names: &[&str]) -> GameSession {
        GameSession::from_names(names, SEED, GameConfig::standard()).unwrap()
    }

    #[test]
    fn test_init_state() {
        let game = session(&["grudger", "tit_for_tat"]);
        assert_eq!(game.current_opponent(), Some(StrategyKind::Grudger));
        assert_eq!(game.current_opponent_index(), 0);
        assert_eq!(game.round(), 1);
        assert_eq!((game.user_score(), game.ai_score()), (0, 0));
        assert!(game.user_moves().is_empty());
        assert!(game.ai_moves().is_empty());
        assert!(game.results().is_empty());
        assert!(game.completed_opponents().is_empty());
        assert!(!game.is_game_over());
        assert_eq!(game.total_user_score(), 0);
    }

    #[test]
    fn test_empty_lineup_rejected() {
        let names: [&str; 0] = [];
        assert_eq!(
            GameSession::from_names(&names, SEED, GameConfig::standard()),
            Err(GameError::EmptyOpponentList)
        );
        assert_eq!(
            GameSession::new(Vec::new(), SEED, GameConfig::standard()),
            Err(GameError::EmptyOpponentList)
        );
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let result = GameSession::from_names(&["grudger", "nope"], SEED, GameConfig::standard());
        assert_eq!(result, Err(GameError::UnknownStrategy { name: "nope".to_string() }));
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let config = GameConfig { rounds_per_opponent: 0, opponents_per_game: 1 };
        assert_eq!(
            GameSession::from_names(&["grudger"], SEED, config.clone()),
            Err(GameError::NoRounds)
        );
        assert_eq!(GameSession::random(SEED, config), Err(GameError::NoRounds));
    }

    #[test]
    fn test_tokens_are_exact() {
        assert_eq!(
            GameSession::from_names(&[" tit_for_tat "], SEED, GameConfig::standard()),
            Err(GameError::UnknownStrategy { name: " tit_for_tat ".to_string() })
        );

        let mut game = session(&["tit_for_tat"]);
        let before = game.clone();
        assert_eq!(game.play("c"), Err(GameError::InvalidMove { token: "c".to_string() }));
        assert_eq!(game.play(" d\n"), Err(GameError::InvalidMove { token: " d\n".to_string() }));
        assert_eq!(game, before);
    }

    #[test]
    fn test_invalid_move_leaves_session_untouched() {
        let mut game = session(&["tit_for_tat"]);
        game.play("C").unwrap();
        let before = game.clone();
        assert_eq!(
            game.play("X"),
            Err(GameError::InvalidMove { token: "X".to_string() })
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_step_scores_round() {
        let mut game = session(&["tit_for_tat"]);
        let first = game.step(D).unwrap();
        assert_eq!(first, RoundRecord { round: 1, user_move: D, ai_move: C, user_points: 5, ai_points: 0 });

        let second = game.step(C).unwrap();
        assert_eq!(second, RoundRecord { round: 2, user_move: C, ai_move: D, user_points: 0, ai_points: 5 });

        assert_eq!(game.round(), 3);
        assert_eq!((game.user_score(), game.ai_score()), (5, 5));
        assert_eq!(game.user_moves(), &[D, C]);
        assert_eq!(game.ai_moves(), &[C, D]);
        assert_eq!(game.round_history(), &[first, second]);
    }

    #[test]
    fn test_opponent_rotation() {
        let mut game = session(&["grudger", "tit_for_tat"]);
        for _ in 0..23 {
            game.step(C).unwrap();
        }
        assert_eq!(game.current_opponent(), Some(StrategyKind::Grudger));
        assert_eq!(game.round(), 24);
        assert!(game.results().is_empty());

        game.step(C).unwrap();

        assert_eq!(game.current_opponent(), Some(StrategyKind::TitForTat));
        assert_eq!(game.current_opponent_index(), 1);
        assert_eq!(game.round(), 1);
        assert_eq!((game.user_score(), game.ai_score()), (0, 0));
        assert!(game.user_moves().is_empty());
        assert!(game.round_history().is_empty());
        assert_eq!(game.completed_opponents(), &[StrategyKind::Grudger]);
        assert_eq!(game.results().len(), 1);

        let result = &game.results()[0];
        assert_eq!(result.opponent, StrategyKind::Grudger);
        assert_eq!((result.user_score, result.ai_score), (72, 72));
        assert_eq!(result.rounds_played(), 24);
        // running score of the new opponent is not counted
        game.step(D).unwrap();
        assert_eq!(game.total_user_score(), 72);
    }

    #[test]
    fn test_all_defect_end_to_end() {
        let mut game = session(&["always_defect"]);
        for i in 1..=24 {
            assert!(!game.is_game_over());
            let record = game.step(C).unwrap();
            assert_eq!(record.round, i);
            assert_eq!((record.user_points, record.ai_points), (0, 5));
        }
        assert!(game.is_game_over());
        assert_eq!(game.current_opponent(), None);
        assert_eq!(game.total_user_score(), 0);

        let result = &game.results()[0];
        assert_eq!((result.user_score, result.ai_score), (0, 120));
        assert_eq!(result.user_moves, vec![C; 24]);
        assert_eq!(result.ai_moves, vec![D; 24]);

        // the last match is still readable and agrees with its result
        assert_eq!(game.user_moves(), result.user_moves.as_slice());
        assert_eq!(game.ai_moves(), result.ai_moves.as_slice());
        assert_eq!(game.round_history().len(), 24);
        assert_eq!((game.user_score(), game.ai_score()), (0, 120));
    }

    #[test]
    fn test_terminal_is_monotonic() {
        let mut game = session(&["always_cooperate"]);
        for _ in 0..24 {
            game.step(D).unwrap();
        }
        let snapshot = game.clone();
        for m in [C, D, C] {
            assert_eq!(game.step(m), Err(GameError::GameOver));
        }
        assert_eq!(game.play("D"), Err(GameError::GameOver));
        assert_eq!(game, snapshot);
        assert!(game.is_game_over());
    }

    #[test]
    fn test_full_session_results() {
        let names = ["pavlov", "random", "spiteful", "detective", "joss"];
        let mut game = session(&names);
        let mut steps = 0;
        while !game.is_game_over() {
            let m = if steps % 3 == 0 { D } else { C };
            game.step(m).unwrap();
            steps += 1;
        }
        assert_eq!(steps, 5 * 24);
        assert_eq!(game.results().len(), 5);
        for (result, name) in game.results().iter().zip(names) {
            assert_eq!(result.opponent.name(), name);
            assert_eq!(result.user_moves.len(), 24);
            assert_eq!(result.ai_moves.len(), 24);
        }
        let expected: u32 = game.results().iter().map(|r| r.user_score).sum();
        assert_eq!(game.total_user_score(), expected);
    }

    #[test]
    fn test_spiteful_memory_resets_between_opponents() {
        let mut game = session(&["spiteful", "spiteful"]);
        for _ in 0..22 {
            game.step(C).unwrap();
        }
        game.step(D).unwrap();
        // sees the defection, arms its countdown and punishes
        assert_eq!(game.step(C).unwrap().ai_move, D);
        // fresh instance for the second seat
        assert_eq!(game.current_opponent_index(), 1);
        assert_eq!(game.step(C).unwrap().ai_move, C);
    }

    #[test]
    fn test_spiteful_sessions_do_not_share_state() {
        let mut provoked = session(&["spiteful"]);
        let mut calm = session(&["spiteful"]);

        provoked.step(D).unwrap();
        assert_eq!(provoked.step(C).unwrap().ai_move, D);
        assert_eq!(calm.step(C).unwrap().ai_move, C);
        assert_eq!(calm.step(C).unwrap().ai_move, C);
    }

    #[test]
    fn test_finish() {
        let mut game = session(&["always_cooperate"]);
        game.step(C).unwrap();
        assert_eq!(game.clone().finish(), Err(GameError::GameInProgress));

        for _ in 0..23 {
            game.step(C).unwrap();
        }
        let finished = game.finish().unwrap();
        assert_eq!(finished.total_user_score, 72);
        assert_eq!(finished.results.len(), 1);
    }

    #[test]
    fn test_short_config() {
        let config = GameConfig { rounds_per_opponent: 3, opponents_per_game: 2 };
        let mut game = GameSession::random(SEED, config).unwrap();
        assert_eq!(game.opponents().len(), 2);
        for _ in 0..6 {
            game.step(C).unwrap();
        }
        assert!(game.is_game_over());
        assert!(game.results().iter().all(|r| r.rounds_played() == 3));
    }

    #[test]
    fn test_random_lineup_matches_selection() {
        let game = GameSession::random(SEED, GameConfig::standard()).unwrap();
        assert_eq!(game.opponents(), select_opponents(&SEED, 5).as_slice());
    }

    #[test]
    fn test_session_json_round_trip_replays_identically() {
        let mut live = session(&["random", "backstabber", "spiteful"]);
        for i in 0..30 {
            live.step(if i % 4 == 0 { D } else { C }).unwrap();
        }
        let json = serde_json::to_string(&live).unwrap();
        let mut restored: GameSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, live);

        for i in 0..42 {
            let m = if i % 5 == 0 { D } else { C };
            assert_eq!(live.step(m), restored.step(m));
        }
        assert!(live.is_game_over());
        assert_eq!(live, restored);
    }

    #[test]
    fn test_same_seed_same_game() {
        let play = |seed: [u8; 32]| {
            let mut game = GameSession::from_names(&["random"], seed, GameConfig::standard()).unwrap();
            while !game.is_game_over() {
                game.step(C).unwrap();
            }
            game.results()[0].ai_moves.clone()
        };
        assert_eq!(play(SEED), play(SEED));
        assert_ne!(play(SEED), play([7u8; 32]));
    }
}
