use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{info, warn};

use crate::wire::Game;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
}

/// What we remember about one of our snakes while its game is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SessionRecord {
    max_length: usize,
    turns_survived: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub outcome: Outcome,
    pub max_length: usize,
    pub turns_survived: i32,
}

/// Totals over every game that has ended
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub sizes: Vec<usize>,
    pub turns: Vec<i32>,
}

impl Stats {
    pub fn average_size(&self) -> Option<f64> {
        average(self.sizes.iter().map(|&s| s as f64))
    }

    pub fn average_turns(&self) -> Option<f64> {
        average(self.turns.iter().map(|&t| t as f64))
    }

    fn record(&mut self, summary: &GameSummary) {
        self.games += 1;
        match summary.outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
        }
        self.sizes.push(summary.max_length);
        self.turns.push(summary.turns_survived);
    }
}

fn average(values: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
    let count = values.len();
    if count == 0 {
        return None;
    }

    Some(values.sum::<f64>() / count as f64)
}

#[derive(Debug, Default)]
struct Inner {
    /// game id to our snake id to its record. One game can have several of our snakes in it
    ongoing: FxHashMap<String, FxHashMap<String, SessionRecord>>,
    stats: Stats,
}

/// Keeps track of our snakes across the turns of every game they are playing in.
///
/// The registry is shared by everything handling requests, so all of its state sits behind one
/// lock.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    inner: Mutex<Inner>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_game_start(&self, game_id: &str, agent_id: &str, initial_body_length: usize) {
        let mut inner = self.inner.lock();

        inner.ongoing.entry(game_id.to_owned()).or_default().insert(
            agent_id.to_owned(),
            SessionRecord {
                max_length: initial_body_length,
                turns_survived: 0,
            },
        );

        info!(game_id, agent_id, "game started");
    }

    /// Refreshes the record for a snake that is about to move. Snakes we never saw start get a
    /// record now.
    pub fn on_turn(&self, game_id: &str, agent_id: &str, body_length: usize, turn: i32) {
        let mut inner = self.inner.lock();

        let record = inner
            .ongoing
            .entry(game_id.to_owned())
            .or_default()
            .entry(agent_id.to_owned())
            .or_insert(SessionRecord {
                max_length: body_length,
                turns_survived: turn,
            });

        record.max_length = record.max_length.max(body_length);
        record.turns_survived = turn;
    }

    /// Closes out a snake's game, folding it into the stats.
    ///
    /// `None` when we were never told about this snake.
    pub fn on_game_end(
        &self,
        game_id: &str,
        agent_id: &str,
        final_state: &Game,
    ) -> Option<GameSummary> {
        let mut inner = self.inner.lock();

        let Some(agents) = inner.ongoing.get_mut(game_id) else {
            warn!(game_id, agent_id, "game ended that was never started");
            return None;
        };
        let Some(record) = agents.remove(agent_id) else {
            warn!(game_id, agent_id, "game ended for a snake that was never started");
            return None;
        };
        if agents.is_empty() {
            inner.ongoing.remove(game_id);
        }

        let survivors = &final_state.board.snakes;
        let outcome = if survivors.len() == 1 && survivors[0].id == agent_id {
            Outcome::Win
        } else {
            Outcome::Loss
        };

        let summary = GameSummary {
            outcome,
            max_length: record.max_length,
            turns_survived: record.turns_survived,
        };
        inner.stats.record(&summary);

        let stats = &inner.stats;
        info!(
            game_id,
            agent_id,
            ?outcome,
            games = stats.games,
            wins = stats.wins,
            losses = stats.losses,
            average_size = stats.average_size().unwrap_or_default(),
            average_turns = stats.average_turns().unwrap_or_default(),
            "game over"
        );

        Some(summary)
    }

    pub fn stats(&self) -> Stats {
        self.inner.lock().stats.clone()
    }

    /// Number of games with at least one of our snakes still in them
    pub fn ongoing_games(&self) -> usize {
        self.inner.lock().ongoing.len()
    }

    pub fn is_tracking(&self, game_id: &str, agent_id: &str) -> bool {
        self.inner
            .lock()
            .ongoing
            .get(game_id)
            .map_or(false, |agents| agents.contains_key(agent_id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_utils::*;

    fn final_board(survivors: &[&str]) -> Game {
        let mut game = game_with(11, 11, &[(5, 5), (5, 4), (5, 3)], &[], &[]);
        game.board.snakes = survivors
            .iter()
            .map(|id| snake(id, &[(1, 1), (1, 2), (1, 3)]))
            .collect();
        game
    }

    #[test]
    fn test_start_turn_end() {
        let registry = SessionRegistry::new();

        registry.on_game_start("g1", "you", 3);
        assert!(registry.is_tracking("g1", "you"));

        registry.on_turn("g1", "you", 4, 1);
        registry.on_turn("g1", "you", 6, 2);
        registry.on_turn("g1", "you", 5, 3);

        let summary = registry
            .on_game_end("g1", "you", &final_board(&["you"]))
            .unwrap();

        assert_eq!(
            summary,
            GameSummary {
                outcome: Outcome::Win,
                max_length: 6,
                turns_survived: 3,
            }
        );
        assert!(!registry.is_tracking("g1", "you"));
        assert_eq!(registry.ongoing_games(), 0);
    }

    #[test]
    fn test_win_needs_to_be_the_last_one_standing() {
        let registry = SessionRegistry::new();
        for game_id in ["a", "b", "c"] {
            registry.on_game_start(game_id, "you", 3);
        }

        let draw = registry.on_game_end("a", "you", &final_board(&[])).unwrap();
        let lost = registry
            .on_game_end("b", "you", &final_board(&["them"]))
            .unwrap();
        let shared = registry
            .on_game_end("c", "you", &final_board(&["you", "them"]))
            .unwrap();

        assert_eq!(draw.outcome, Outcome::Loss);
        assert_eq!(lost.outcome, Outcome::Loss);
        assert_eq!(shared.outcome, Outcome::Loss);

        let stats = registry.stats();
        assert_eq!(stats.games, 3);
        assert_eq!(stats.wins, 0);
        assert_eq!(stats.losses, 3);
    }

    #[test]
    fn test_several_of_our_snakes_in_one_game() {
        let registry = SessionRegistry::new();
        registry.on_game_start("g1", "first", 3);
        registry.on_game_start("g1", "second", 3);

        registry.on_game_end("g1", "first", &final_board(&["second"]));
        assert_eq!(registry.ongoing_games(), 1);
        assert!(registry.is_tracking("g1", "second"));

        let summary = registry
            .on_game_end("g1", "second", &final_board(&["second"]))
            .unwrap();
        assert_eq!(summary.outcome, Outcome::Win);
        assert_eq!(registry.ongoing_games(), 0);
    }

    #[test]
    fn test_end_without_start() {
        let registry = SessionRegistry::new();

        assert_eq!(
            registry.on_game_end("nope", "you", &final_board(&["you"])),
            None
        );

        registry.on_game_start("g1", "you", 3);
        assert_eq!(
            registry.on_game_end("g1", "someone-else", &final_board(&["you"])),
            None
        );
        assert!(registry.is_tracking("g1", "you"));
        assert_eq!(registry.stats(), Stats::default());
    }

    #[test]
    fn test_turn_without_start_creates_a_record() {
        let registry = SessionRegistry::new();
        registry.on_turn("late", "you", 7, 42);

        let summary = registry
            .on_game_end("late", "you", &final_board(&["you"]))
            .unwrap();
        assert_eq!(summary.max_length, 7);
        assert_eq!(summary.turns_survived, 42);
    }

    #[test]
    fn test_averages() {
        let registry = SessionRegistry::new();
        assert_eq!(registry.stats().average_size(), None);

        registry.on_game_start("a", "you", 3);
        registry.on_turn("a", "you", 10, 100);
        registry.on_game_end("a", "you", &final_board(&["you"]));

        registry.on_game_start("b", "you", 3);
        registry.on_turn("b", "you", 4, 20);
        registry.on_game_end("b", "you", &final_board(&[]));

        let stats = registry.stats();
        assert_eq!(stats.sizes, vec![10, 4]);
        assert_eq!(stats.turns, vec![100, 20]);
        assert_eq!(stats.average_size(), Some(7.0));
        assert_eq!(stats.average_turns(), Some(60.0));
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.losses, 1);
    }

    #[test]
    fn test_shared_between_threads() {
        let registry = Arc::new(SessionRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let game_id = format!("game-{}", i);
                    registry.on_game_start(&game_id, "you", 3);
                    for turn in 1..=10 {
                        registry.on_turn(&game_id, "you", 3 + turn as usize, turn);
                    }
                    registry.on_game_end(&game_id, "you", &final_board(&["you"]))
                })
            })
            .collect();

        for handle in handles {
            let summary = handle.join().unwrap().unwrap();
            assert_eq!(summary.max_length, 13);
        }

        let stats = registry.stats();
        assert_eq!(stats.games, 8);
        assert_eq!(stats.wins, 8);
        assert_eq!(registry.ongoing_games(), 0);
    }
}
