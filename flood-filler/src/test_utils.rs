use std::collections::VecDeque;

use crate::wire::{BattleSnake, Board, Game, NestedGame, Position, Ruleset};

pub(crate) const YOU_ID: &str = "you";

pub(crate) fn snake(id: &str, body: &[(i32, i32)]) -> BattleSnake {
    let body: VecDeque<Position> = body.iter().map(|&(x, y)| Position::new(x, y)).collect();

    BattleSnake {
        id: id.to_owned(),
        name: id.to_owned(),
        health: 100,
        head: body.front().copied().unwrap_or_default(),
        body,
        shout: None,
        squad: None,
    }
}

/// A board with us first in the snake list followed by `rivals`
pub(crate) fn game_with(
    width: u32,
    height: u32,
    you: &[(i32, i32)],
    rivals: &[(&str, &[(i32, i32)])],
    food: &[(i32, i32)],
) -> Game {
    let you = snake(YOU_ID, you);
    let mut snakes = vec![you.clone()];
    snakes.extend(rivals.iter().map(|(id, body)| snake(id, body)));

    Game {
        game: NestedGame {
            id: "test-game".to_owned(),
            ruleset: Ruleset::default(),
            timeout: 500,
            map: None,
            source: None,
        },
        turn: 10,
        board: Board {
            width,
            height,
            food: food.iter().map(|&(x, y)| Position::new(x, y)).collect(),
            hazards: vec![],
            snakes,
        },
        you,
    }
}

pub(crate) fn set_health(game: &mut Game, health: i32) {
    game.you.health = health;
    for s in game.board.snakes.iter_mut().filter(|s| s.id == YOU_ID) {
        s.health = health;
    }
}

pub(crate) fn fixture(json: &str) -> Game {
    serde_json::from_str(json).unwrap()
}
