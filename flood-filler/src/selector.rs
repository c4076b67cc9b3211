use rand::{seq::SliceRandom, Rng};
use tracing::{debug, info, info_span, warn};

use crate::{
    a_prime::APrimeCalculable,
    error::EngineError,
    flood_fill::ReachableSpace,
    geometry::Direction,
    grid::Grid,
    options::SnakeOptions,
    oracle::MoveOracle,
    risk::{score_moves, RiskMap},
    wire::{Game, Position},
};

/// Which branch of the policy picked the move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Every direction scored worse than some other, which can't happen with a real risk map
    NoSafeMoves,
    OnlySafeMove,
    /// None of the safe moves leave room for our body, so we guessed
    NoSuitableSpace,
    /// Low on health or not the biggest snake, closest food wins
    SeekingFood,
    /// Room everywhere, picked at random weighted by how much room
    OpenSpace,
}

/// A safe move and how much room there is after taking it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub direction: Direction,
    pub position: Position,
    pub depth: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub direction: Direction,
    pub risks: RiskMap,
    pub reason: Reason,
    /// Every safe move that was measured, in up, down, left, right order. Empty when there was
    /// nothing to compare.
    pub candidates: Vec<Candidate>,
}

impl Decision {
    /// The measured candidate for the chosen direction, if there was one
    pub fn chosen(&self) -> Option<&Candidate> {
        self.candidates
            .iter()
            .find(|c| c.direction == self.direction)
    }
}

pub struct MoveSelector {
    options: SnakeOptions,
    oracle: Option<Box<dyn MoveOracle + Send + Sync>>,
}

impl Default for MoveSelector {
    fn default() -> Self {
        Self::new(SnakeOptions::default())
    }
}

impl MoveSelector {
    pub fn new(options: SnakeOptions) -> Self {
        Self {
            options,
            oracle: None,
        }
    }

    pub fn with_oracle(mut self, oracle: impl MoveOracle + Send + Sync + 'static) -> Self {
        self.oracle = Some(Box::new(oracle));
        self
    }

    pub fn options(&self) -> &SnakeOptions {
        &self.options
    }

    pub fn choose_move<R: Rng + ?Sized>(&self, game: &Game, rng: &mut R) -> Direction {
        self.decide(game, rng).direction
    }

    pub fn decide<R: Rng + ?Sized>(&self, game: &Game, rng: &mut R) -> Decision {
        info_span!("choose_move", game_id = %game.game.id, turn = game.turn).in_scope(|| {
            let decision = self.decide_inner(game, rng);

            info!(
                direction = %decision.direction,
                reason = ?decision.reason,
                risks = %decision.risks,
                "chose move"
            );

            decision
        })
    }

    fn decide_inner<R: Rng + ?Sized>(&self, game: &Game, rng: &mut R) -> Decision {
        let grid = Grid::from_game(game);
        let risks = score_moves(game, &grid, &self.options.risk);
        let safe_moves = risks.safest_moves();

        let decision = |direction, reason, candidates| Decision {
            direction,
            risks,
            reason,
            candidates,
        };

        match safe_moves.as_slice() {
            [] => {
                let direction = Direction::ALL
                    .choose(rng)
                    .copied()
                    .unwrap_or(Direction::Up);
                return decision(direction, Reason::NoSafeMoves, vec![]);
            }
            [only] => return decision(*only, Reason::OnlySafeMove, vec![]),
            _ => {}
        }

        let body_length = game.you.length() as u32;
        let head = game.you.head;
        let starts: Vec<Position> = safe_moves.iter().map(|d| head.step(*d)).collect();

        let candidates: Vec<Candidate> = safe_moves
            .iter()
            .zip(grid.reachable_space(&starts, body_length))
            .map(|(direction, (position, depth))| Candidate {
                direction: *direction,
                position,
                depth,
            })
            .collect();
        debug!(?candidates, body_length, "measured reachable space");

        let suitable: Vec<Candidate> = candidates
            .iter()
            .filter(|c| c.depth >= body_length)
            .copied()
            .collect();

        if suitable.is_empty() {
            let direction = safe_moves.choose(rng).copied().unwrap_or(Direction::Up);
            return decision(direction, Reason::NoSuitableSpace, candidates);
        }

        let hungry = game.you.health < self.options.low_health_threshold
            || game.you.length() <= game.longest_opponent_length();

        if hungry {
            let closest = suitable
                .iter()
                .min_by_key(|c| grid.nearest_food_distance(&c.position).unwrap_or(u32::MAX))
                .unwrap_or(&suitable[0]);
            return decision(closest.direction, Reason::SeekingFood, candidates);
        }

        let favourites = self.favourites(game, &suitable);
        let chosen = favourites
            .choose_weighted(rng, |c| c.depth)
            .unwrap_or(&favourites[0]);

        decision(chosen.direction, Reason::OpenSpace, candidates)
    }

    /// The candidates the oracle likes best, or all of them when there is no oracle
    fn favourites(&self, game: &Game, suitable: &[Candidate]) -> Vec<Candidate> {
        let Some(oracle) = &self.oracle else {
            return suitable.to_vec();
        };

        let scores: Vec<f64> = suitable
            .iter()
            .map(|c| match oracle.score(game, c.direction, &game.you.id) {
                Ok(score) if score.is_nan() => 0.0,
                Ok(score) => score.clamp(0.0, 1.0),
                Err(e) => {
                    let error = EngineError::OracleUnavailable(e.to_string());
                    warn!(direction = %c.direction, %error, "scoring as 0.0");
                    0.0
                }
            })
            .collect();
        debug!(?scores, "oracle scores");

        let best = scores.iter().copied().fold(0.0, f64::max);

        suitable
            .iter()
            .zip(scores)
            .filter(|(_, score)| *score == best)
            .map(|(c, _)| *c)
            .collect()
    }
}

/// Picks a move with the default options and no oracle
pub fn choose_move<R: Rng + ?Sized>(game: &Game, rng: &mut R) -> Direction {
    MoveSelector::default().choose_move(game, rng)
}
