#[macro_use]
extern crate serde_derive;

use std::sync::Arc;

use rand::thread_rng;
use tracing::info;

pub mod a_prime;
pub mod error;
pub mod flood_fill;
pub mod geometry;
pub mod grid;
pub mod options;
pub mod oracle;
pub mod risk;
pub mod selector;
pub mod session;
pub mod wire;

#[cfg(test)]
mod test_utils;

pub use error::EngineError;
pub use geometry::Direction;
pub use grid::Grid;
pub use options::SnakeOptions;
pub use oracle::{MoveOracle, NeutralOracle};
pub use risk::{RiskMap, RiskWeights};
pub use selector::{choose_move, Candidate, Decision, MoveSelector, Reason};
pub use session::{GameSummary, Outcome, SessionRegistry, Stats};
pub use wire::{BattleSnake, Board, Game, NestedGame, Position, Ruleset};

/// The `{move}` body handed back to the Battlesnake engine
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MoveOutput {
    pub r#move: String,
    pub shout: Option<String>,
}

impl From<Direction> for MoveOutput {
    fn from(direction: Direction) -> Self {
        MoveOutput {
            r#move: format!("{}", direction),
            shout: None,
        }
    }
}

pub type BoxedSnake = Box<dyn BattlesnakeAI + Send + Sync>;
pub type BoxedFactory = Box<dyn BattlesnakeFactory + Send + Sync>;

pub trait BattlesnakeAI {
    fn end(&self) {}
    fn make_move(&self) -> Result<MoveOutput, Box<dyn std::error::Error + Send + Sync>>;
}

pub trait BattlesnakeFactory {
    fn name(&self) -> String;
    fn from_wire_game(&self, game: Game) -> BoxedSnake;
}

pub struct FloodFiller {
    game: Game,
    selector: Arc<MoveSelector>,
}

impl BattlesnakeAI for FloodFiller {
    fn make_move(&self) -> Result<MoveOutput, Box<dyn std::error::Error + Send + Sync>> {
        let mut rng = thread_rng();
        let direction = self.selector.choose_move(&self.game, &mut rng);

        Ok(direction.into())
    }

    fn end(&self) {
        info!(game_id = %self.game.game.id, turn = self.game.turn, "flood-filler has ended");
    }
}

/// Builds a [`FloodFiller`] per request while sharing one configured selector
pub struct FloodFillerFactory {
    selector: Arc<MoveSelector>,
}

impl FloodFillerFactory {
    pub fn new(selector: MoveSelector) -> Self {
        Self {
            selector: Arc::new(selector),
        }
    }
}

impl Default for FloodFillerFactory {
    fn default() -> Self {
        Self::new(MoveSelector::new(SnakeOptions::from_env()))
    }
}

impl BattlesnakeFactory for FloodFillerFactory {
    fn name(&self) -> String {
        "flood-filler".to_owned()
    }

    fn from_wire_game(&self, game: Game) -> BoxedSnake {
        Box::new(FloodFiller {
            game,
            selector: Arc::clone(&self.selector),
        })
    }
}

pub fn all_factories() -> Vec<BoxedFactory> {
    vec![Box::new(FloodFillerFactory::default())]
}
