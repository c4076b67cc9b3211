use std::fmt;

use itertools::Itertools;
use tracing::debug;

use crate::{geometry::Direction, grid::Grid, wire::Game};

/// How much each kind of hazard adds to a move's risk.
///
/// Walls and bodies are certain death so they get a full point. A rival head is only dangerous
/// if the rival actually moves into the same cell, so it gets a fraction.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct RiskWeights {
    pub wall: f64,
    pub body: f64,
    pub rival_head: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        RiskWeights {
            wall: 1.0,
            body: 1.0,
            rival_head: 0.25,
        }
    }
}

/// A risk score for every direction, lower is safer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RiskMap {
    scores: [f64; 4],
}

impl RiskMap {
    pub fn get(&self, direction: Direction) -> f64 {
        self.scores[direction.as_index()]
    }

    fn add(&mut self, direction: Direction, amount: f64) {
        self.scores[direction.as_index()] += amount;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, f64)> + '_ {
        Direction::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    pub fn lowest(&self) -> f64 {
        self.scores.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Every direction tied for the lowest score, in up, down, left, right order.
    ///
    /// When nothing is actually safe these are the least bad moves.
    pub fn safest_moves(&self) -> Vec<Direction> {
        let lowest = self.lowest();

        self.iter()
            .filter(|(_, score)| *score == lowest)
            .map(|(d, _)| d)
            .collect()
    }
}

impl fmt::Display for RiskMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scores = self
            .iter()
            .map(|(direction, score)| format!("{}: {}", direction, score))
            .join(", ");

        f.write_str(&scores)
    }
}

pub fn score_moves(game: &Game, grid: &Grid, weights: &RiskWeights) -> RiskMap {
    let mut risks = RiskMap::default();

    avoid_walls(game, grid, weights, &mut risks);
    avoid_snake_bodies(game, grid, weights, &mut risks);
    avoid_heads(game, grid, weights, &mut risks);

    debug!(%risks, "scored moves");

    risks
}

fn avoid_walls(game: &Game, grid: &Grid, weights: &RiskWeights, risks: &mut RiskMap) {
    let head = game.you.head;

    if head.x == 0 {
        risks.add(Direction::Left, weights.wall);
    }
    if head.x == grid.width() as i32 - 1 {
        risks.add(Direction::Right, weights.wall);
    }
    if head.y == 0 {
        risks.add(Direction::Down, weights.wall);
    }
    if head.y == grid.height() as i32 - 1 {
        risks.add(Direction::Up, weights.wall);
    }
}

fn avoid_snake_bodies(game: &Game, grid: &Grid, weights: &RiskWeights, risks: &mut RiskMap) {
    for direction in Direction::ALL {
        let target = game.you.head.step(direction);

        if grid.contains(&target) && grid.obstacle(&target) > 0 {
            risks.add(direction, weights.body);
        }
    }
}

/// Cells a rival at least our size could move into are a possible head-on collision we would
/// lose
fn avoid_heads(game: &Game, grid: &Grid, weights: &RiskWeights, risks: &mut RiskMap) {
    let my_length = game.you.length();

    for rival in game.opponents().filter(|s| s.length() >= my_length) {
        let contested = grid.neighbors(&rival.head);

        for direction in Direction::ALL {
            if contested.contains(&game.you.head.step(direction)) {
                risks.add(direction, weights.rival_head);
            }
        }
    }
}
