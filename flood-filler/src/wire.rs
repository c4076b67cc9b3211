//! The JSON shapes the Battlesnake engine sends us every turn.
//!
//! Only the fields the engine needs are modelled, everything else in the payload (latency,
//! customizations, ruleset settings) is ignored when deserializing.

use std::collections::VecDeque;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Ruleset {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

impl Default for Ruleset {
    fn default() -> Self {
        Ruleset {
            name: "standard".to_owned(),
            version: String::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NestedGame {
    pub id: String,
    #[serde(default)]
    pub ruleset: Ruleset,
    #[serde(default)]
    pub timeout: i64,
    #[serde(default)]
    pub map: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BattleSnake {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub health: i32,
    pub body: VecDeque<Position>,
    pub head: Position,
    #[serde(default)]
    pub shout: Option<String>,
    #[serde(default)]
    pub squad: Option<String>,
}

impl BattleSnake {
    pub fn length(&self) -> usize {
        self.body.len()
    }

    pub fn tail(&self) -> Option<&Position> {
        self.body.back()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub height: u32,
    pub width: u32,
    #[serde(default)]
    pub food: Vec<Position>,
    #[serde(default)]
    pub hazards: Vec<Position>,
    #[serde(default)]
    pub snakes: Vec<BattleSnake>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub game: NestedGame,
    pub turn: i32,
    pub board: Board,
    pub you: BattleSnake,
}

impl Game {
    /// Every snake on the board other than the one we control
    pub fn opponents(&self) -> impl Iterator<Item = &BattleSnake> {
        let you_id = &self.you.id;
        self.board.snakes.iter().filter(move |s| &s.id != you_id)
    }

    /// Length of the longest opponent, `0` when we are alone on the board
    pub fn longest_opponent_length(&self) -> usize {
        self.opponents().map(BattleSnake::length).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_engine_payload() {
        let board_json = r#"{"game":{"id":"abc","ruleset":{"name":"standard","version":"v1.0.17","settings":{"foodSpawnChance":15}},"timeout":500},"turn":60,"board":{"height":11,"width":11,"food":[{"x":1,"y":2}],"hazards":[],"snakes":[{"id":"me","name":"me","health":93,"body":[{"x":7,"y":10},{"x":6,"y":10},{"x":5,"y":10}],"latency":"84","head":{"x":7,"y":10},"length":3,"shout":"","squad":""},{"id":"them","name":"them","health":99,"body":[{"x":5,"y":4},{"x":5,"y":5},{"x":4,"y":5},{"x":3,"y":5}],"latency":327,"head":{"x":5,"y":4},"length":4,"shout":""}]},"you":{"id":"me","name":"me","health":93,"body":[{"x":7,"y":10},{"x":6,"y":10},{"x":5,"y":10}],"latency":"84","head":{"x":7,"y":10},"length":3,"shout":"","squad":""}}"#;
        let game: Game = serde_json::from_str(board_json).unwrap();

        assert_eq!(game.game.id, "abc");
        assert_eq!(game.game.ruleset.name, "standard");
        assert_eq!(game.turn, 60);
        assert_eq!(game.board.food, vec![Position { x: 1, y: 2 }]);
        assert_eq!(game.you.length(), 3);
        assert_eq!(game.you.tail(), Some(&Position { x: 5, y: 10 }));
        assert_eq!(game.opponents().count(), 1);
        assert_eq!(game.longest_opponent_length(), 4);
    }

    #[test]
    fn test_optional_fields_default() {
        let board_json = r#"{"game":{"id":""},"turn":0,"board":{"height":7,"width":7},"you":{"id":"me","health":100,"body":[{"x":3,"y":3}],"head":{"x":3,"y":3}}}"#;
        let game: Game = serde_json::from_str(board_json).unwrap();

        assert!(game.board.snakes.is_empty());
        assert!(game.board.food.is_empty());
        assert_eq!(game.game.ruleset, Ruleset::default());
        assert_eq!(game.longest_opponent_length(), 0);
    }
}
