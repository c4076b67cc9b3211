//! An optional outside opinion on which move is best.
//!
//! The selector only consults an oracle when it is choosing between roomy moves and nothing more
//! urgent (low health, being outgrown) is going on. Whatever sits behind it, a trained model or a
//! hand written heuristic, is the caller's business.

use crate::{geometry::Direction, wire::Game};

pub trait MoveOracle {
    /// How good moving `direction` looks for `agent_id`, higher is better. Scores are expected to
    /// land in `[0, 1]`.
    fn score(&self, game: &Game, direction: Direction, agent_id: &str) -> anyhow::Result<f64>;
}

/// Has no opinion, every move scores the same
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralOracle;

impl MoveOracle for NeutralOracle {
    fn score(&self, _game: &Game, _direction: Direction, _agent_id: &str) -> anyhow::Result<f64> {
        Ok(0.0)
    }
}

impl<F> MoveOracle for F
where
    F: Fn(&Game, Direction, &str) -> anyhow::Result<f64>,
{
    fn score(&self, game: &Game, direction: Direction, agent_id: &str) -> anyhow::Result<f64> {
        self(game, direction, agent_id)
    }
}
