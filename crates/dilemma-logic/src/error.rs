//! Errors surfaced by the game engine

/// Validation failures. None of these are transient; callers decide how to
/// present them (a finished game is usually a redirect to the results view).
#[derive(Clone, Debug, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GameError {
    #[display("invalid move `{token}`: expected C or D")]
    InvalidMove { token: String },
    #[display("unknown strategy `{name}`")]
    UnknownStrategy { name: String },
    #[display("game is over; read the results instead")]
    GameOver,
    #[display("game still has opponents left to play")]
    GameInProgress,
    #[display("a game needs at least one opponent")]
    EmptyOpponentList,
    #[display("rounds per opponent must be at least 1")]
    NoRounds,
}
