//! Interactive play loop

use std::io::{BufRead, Write};

use dilemma_logic::{FinishedGame, GameError, GameSession, MatchResult, Move};

/// How a play loop ended
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Finished,
    /// User quit or input ran out; nothing is recorded
    Abandoned,
}

fn prompt<W: Write>(session: &GameSession, out: &mut W) -> std::io::Result<()> {
    let Some(opponent) = session.current_opponent() else {
        return Ok(());
    };
    write!(
        out,
        "[{}/{} {} | round {}/{} | you {} - {} them] C/D (q quits): ",
        session.current_opponent_index() + 1,
        session.opponents().len(),
        opponent.display_name(),
        session.round(),
        session.rounds_per_opponent(),
        session.user_score(),
        session.ai_score(),
    )?;
    out.flush()
}

fn moves_line(moves: &[Move]) -> String {
    moves.iter().map(|m| m.as_char()).collect()
}

fn print_match<W: Write>(result: &MatchResult, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "-- match over: {} --", result.opponent.display_name())?;
    writeln!(out, "   you  {}  {:>3}", moves_line(&result.user_moves), result.user_score)?;
    writeln!(out, "   them {}  {:>3}", moves_line(&result.ai_moves), result.ai_score)
}

/// Feed moves from `input` into `session` until the game ends or the user
/// quits
pub fn run<R: BufRead, W: Write>(
    session: &mut GameSession,
    input: R,
    out: &mut W,
) -> anyhow::Result<Outcome> {
    let mut lines = input.lines();

    while !session.is_game_over() {
        prompt(session, out)?;
        let Some(line) = lines.next().transpose()? else {
            writeln!(out)?;
            return Ok(Outcome::Abandoned);
        };
        let token = line.trim();
        if token.eq_ignore_ascii_case("q") {
            return Ok(Outcome::Abandoned);
        }

        let opponent = session.current_opponent();
        let completed = session.results().len();
        match session.play(&token.to_ascii_uppercase()) {
            Ok(record) => {
                writeln!(
                    out,
                    "you {} / {} {}  (+{} / +{})",
                    record.user_move,
                    opponent.map(|k| k.display_name()).unwrap_or_default(),
                    record.ai_move,
                    record.user_points,
                    record.ai_points
                )?;
            }
            Err(GameError::InvalidMove { .. }) => {
                writeln!(out, "{}", GameError::InvalidMove { token: token.to_string() })?;
                continue;
            }
            Err(e) => return Err(e.into()),
        }

        if let Some(result) = session.results().get(completed) {
            print_match(result, out)?;
        }
    }

    Ok(Outcome::Finished)
}

/// Final results table
pub fn print_results<W: Write>(finished: &FinishedGame, out: &mut W) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{:<26}{:>8}{:>8}{:>8}", "opponent", "rounds", "you", "them")?;
    for result in &finished.results {
        writeln!(
            out,
            "{:<26}{:>8}{:>8}{:>8}",
            result.opponent.display_name(),
            result.rounds_played(),
            result.user_score,
            result.ai_score
        )?;
        writeln!(out, "    {}", result.opponent.description())?;
    }
    writeln!(out, "total score: {}", finished.total_user_score)
}
