use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::{grid::Grid, wire::Position};

/// One cell of a path under construction. Paths share their prefixes through `parent`
#[derive(Copy, Clone, Debug)]
pub(crate) struct Step {
    pub position: Position,
    pub parent: Option<usize>,
    /// Cells in the path so far, this one included
    pub length: u32,
    pub food_in_path: u32,
}

impl Step {
    pub fn start(grid: &Grid, position: Position) -> Self {
        Step {
            position,
            parent: None,
            length: 1,
            food_in_path: grid.has_food(&position) as u32,
        }
    }

    pub fn next(&self, grid: &Grid, index: usize, position: Position) -> Self {
        Step {
            position,
            parent: Some(index),
            length: self.length + 1,
            food_in_path: self.food_in_path + grid.has_food(&position) as u32,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq)]
struct Node {
    cost: u32,
    order: u64,
    step: usize,
}

// The priority queue depends on `Ord`.
// Explicitly implement the trait so the queue becomes a min-heap
// instead of a max-heap.
impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flip both so the cheapest, and then the oldest, node comes out first
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.order.cmp(&self.order))
    }
}

// `PartialOrd` needs to be implemented as well.
impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub trait APrimeCalculable {
    /// Cells from `start` to `goal`, both included, or `None` when the bodies in the way never
    /// clear in time
    fn shortest_path(&self, start: &Position, goal: &Position) -> Option<Vec<Position>>;

    /// Moves needed to get from `start` to `goal`
    fn shortest_distance(&self, start: &Position, goal: &Position) -> Option<u32> {
        self.shortest_path(start, goal)
            .map(|path| path.len() as u32 - 1)
    }

    /// Moves from `position` to the closest reachable food
    fn nearest_food_distance(&self, position: &Position) -> Option<u32>;
}

impl APrimeCalculable for Grid {
    fn shortest_path(&self, start: &Position, goal: &Position) -> Option<Vec<Position>> {
        if !self.contains(start) || !self.contains(goal) {
            return None;
        }

        let mut steps = vec![Step::start(self, *start)];
        let mut to_search: BinaryHeap<Node> = BinaryHeap::new();
        let mut explored: Vec<Option<u32>> = vec![None; self.cell_count()];
        let mut order = 0;

        to_search.push(Node {
            cost: 1 + start.dist_from(goal),
            order,
            step: 0,
        });

        while let Some(Node { step: index, .. }) = to_search.pop() {
            let current = steps[index];

            if current.position == *goal {
                return Some(unwind(&steps, index));
            }

            let cell = self.index(&current.position)?;
            if explored[cell].map_or(false, |seen| seen <= current.length) {
                continue;
            }
            explored[cell] = Some(current.length);

            for neighbor in self.neighbors(&current.position) {
                if !self.is_traversable(&neighbor, current.length + 1, current.food_in_path) {
                    continue;
                }

                let next = current.next(self, index, neighbor);
                order += 1;
                to_search.push(Node {
                    cost: next.length + neighbor.dist_from(goal),
                    order,
                    step: steps.len(),
                });
                steps.push(next);
            }
        }

        None
    }

    fn nearest_food_distance(&self, position: &Position) -> Option<u32> {
        let mut best: Option<u32> = None;

        for food in self.food_positions() {
            // Manhattan distance is a lower bound, skip food that can't beat what we have
            if best.map_or(false, |b| position.dist_from(food) >= b) {
                continue;
            }

            if let Some(distance) = self.shortest_distance(position, food) {
                if best.map_or(true, |b| distance < b) {
                    best = Some(distance);
                }
            }
        }

        best
    }
}

fn unwind(steps: &[Step], last: usize) -> Vec<Position> {
    let mut path = vec![];
    let mut current = Some(last);

    while let Some(index) = current {
        path.push(steps[index].position);
        current = steps[index].parent;
    }

    path.reverse();

    path
}
