use tracing::trace;

use crate::{a_prime::Step, grid::Grid, wire::Position};

pub trait ReachableSpace {
    /// How far we can keep moving from each of `starts`, in cells, searching no further than
    /// `body_length`.
    ///
    /// Results are in the same order as `starts`. A start that is off the board gets `0`.
    fn reachable_space(&self, starts: &[Position], body_length: u32) -> Vec<(Position, u32)> {
        starts
            .iter()
            .map(|start| (*start, self.reachable_from(start, body_length)))
            .collect()
    }

    /// Length of the longest survivable path found from `start`, capped once it reaches
    /// `body_length`
    fn reachable_from(&self, start: &Position, body_length: u32) -> u32;
}

impl ReachableSpace for Grid {
    fn reachable_from(&self, start: &Position, body_length: u32) -> u32 {
        if !self.contains(start) {
            return 0;
        }

        let mut steps = vec![Step::start(self, *start)];
        let mut to_search = vec![0];
        let mut longest: Vec<u32> = vec![0; self.cell_count()];
        let mut depth = 0;

        while let Some(index) = to_search.pop() {
            let current = steps[index];
            depth = depth.max(current.length);

            if depth >= body_length {
                break;
            }

            for neighbor in self.neighbors(&current.position) {
                if !self.is_traversable(&neighbor, current.length + 1, current.food_in_path) {
                    continue;
                }

                // Walking back over ourselves is only fine once that part of the body is gone
                if let Some(first) = first_visit(&steps, index, &neighbor) {
                    if current.length - first < body_length + 1 {
                        continue;
                    }
                }

                let Some(cell) = self.index(&neighbor) else {
                    continue;
                };
                if current.length + 1 <= longest[cell] {
                    continue;
                }
                longest[cell] = current.length + 1;

                to_search.push(steps.len());
                steps.push(current.next(self, index, neighbor));
            }
        }

        trace!(?start, depth, explored = steps.len(), "flood fill");

        depth
    }
}

/// Index along the path ending at `last` where `position` first shows up
fn first_visit(steps: &[Step], last: usize, position: &Position) -> Option<u32> {
    let mut current = Some(last);
    let mut first = None;

    while let Some(index) = current {
        let step = &steps[index];
        if &step.position == position {
            first = Some(step.length - 1);
        }
        current = step.parent;
    }

    first
}
