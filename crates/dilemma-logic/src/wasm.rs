//! WASM bindings for a browser front end
//!
//! The session lives on the JS side as a JSON string; every call takes the
//! current snapshot and returns the next one.

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;

use crate::registry::catalog;
use crate::{GameConfig, GameSession, RoundRecord};

fn parse_seed(seed: &[u8]) -> Result<[u8; 32], JsError> {
    seed.try_into()
        .map_err(|_| JsError::new("Seed must be exactly 32 bytes"))
}

fn parse_session(session_json: &str) -> Result<GameSession, JsError> {
    serde_json::from_str(session_json)
        .map_err(|e| JsError::new(&format!("Invalid session: {}", e)))
}

/// All names, or `None` if any entry was not a string
fn lineup_names<I: IntoIterator<Item = Option<String>>>(values: I) -> Option<Vec<String>> {
    values.into_iter().collect()
}

fn to_json(session: &GameSession) -> Result<String, JsError> {
    serde_json::to_string(session)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Start a session
///
/// # Arguments
/// * `opponents` - Array of registry names; empty deals a random lineup
/// * `seed` - 32-byte randomness seed
///
/// # Returns
/// JSON serialized GameSession
#[wasm_bindgen]
pub fn new_game(opponents: js_sys::Array, seed: &[u8]) -> Result<String, JsError> {
    let seed = parse_seed(seed)?;
    let names = lineup_names(opponents.iter().map(|v| v.as_string()))
        .ok_or_else(|| JsError::new("Opponent names must be strings"))?;

    let session = if names.is_empty() {
        GameSession::random(seed, GameConfig::standard())
    } else {
        GameSession::from_names(&names, seed, GameConfig::standard())
    }
    .map_err(|e| JsError::new(&e.to_string()))?;

    to_json(&session)
}

#[derive(serde::Serialize)]
struct PlayOutcome {
    session: String,
    round: RoundRecord,
    game_over: bool,
}

/// Submit one move ("C" or "D") against the seated opponent
///
/// # Returns
/// `{session, round, game_over}` where `session` is the updated snapshot
#[wasm_bindgen]
pub fn play_move(session_json: &str, user_move: &str) -> Result<JsValue, JsError> {
    let mut session = parse_session(session_json)?;
    let round = session
        .play(user_move)
        .map_err(|e| JsError::new(&e.to_string()))?;

    let outcome = PlayOutcome {
        session: to_json(&session)?,
        round,
        game_over: session.is_game_over(),
    };

    serde_wasm_bindgen::to_value(&outcome)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Results of a finished session: `{results, total_user_score}`
#[wasm_bindgen]
pub fn finish_game(session_json: &str) -> Result<JsValue, JsError> {
    let finished = parse_session(session_json)?
        .finish()
        .map_err(|e| JsError::new(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&finished)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Get every registered strategy with its description
#[wasm_bindgen]
pub fn get_strategy_catalog() -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(&catalog())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lineup_names_rejects_non_strings() {
        let names = lineup_names([Some("grudger".to_string()), Some("joss".to_string())]);
        assert_eq!(names, Some(vec!["grudger".to_string(), "joss".to_string()]));
        assert_eq!(lineup_names([Some("grudger".to_string()), None]), None);
        assert_eq!(lineup_names([None]), None);
        assert_eq!(lineup_names(Vec::new()), Some(Vec::new()));
    }
}
