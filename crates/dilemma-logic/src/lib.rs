//! Game logic for Dilemma Arcade
//!
//! The iterated Prisoner's Dilemma as played by a human against a rotation
//! of scripted opponents. This crate is compiled to:
//! - Native (for the terminal front end)
//! - WASM (for a browser front end, behind the `wasm` feature)

mod error;
mod game;
mod pairing;
mod random;
pub mod registry;
mod strategy;

#[cfg(feature = "wasm")]
mod wasm;

pub use error::GameError;
pub use game::{FinishedGame, GameConfig, GameSession, MatchResult, RoundRecord};
pub use pairing::select_opponents;
pub use random::SeededRng;
pub use registry::{lookup, StrategyInfo};
pub use strategy::{execute_strategy, Move, Opponent, Strategy, StrategyKind};

/// Payoff matrix for the Prisoner's Dilemma
/// Returns (score_a, score_b)
pub fn payoff(a: Move, b: Move) -> (u8, u8) {
    match (a, b) {
        (Move::Cooperate, Move::Cooperate) => (3, 3),
        (Move::Cooperate, Move::Defect) => (0, 5),
        (Move::Defect, Move::Cooperate) => (5, 0),
        (Move::Defect, Move::Defect) => (1, 1),
    }
}

/// Score one round from the user's side: (user points, opponent points)
pub fn evaluate_round(user_move: Move, ai_move: Move) -> (u8, u8) {
    payoff(user_move, ai_move)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payoff_matrix() {
        assert_eq!(payoff(Move::Cooperate, Move::Cooperate), (3, 3));
        assert_eq!(payoff(Move::Cooperate, Move::Defect), (0, 5));
        assert_eq!(payoff(Move::Defect, Move::Cooperate), (5, 0));
        assert_eq!(payoff(Move::Defect, Move::Defect), (1, 1));
    }

    #[test]
    fn test_payoff_swap_symmetry() {
        let moves = [Move::Cooperate, Move::Defect];
        for a in moves {
            for b in moves {
                let (x, y) = payoff(a, b);
                assert_eq!(payoff(b, a), (y, x));
                assert_eq!(evaluate_round(a, b), (x, y));
            }
        }
    }
}
