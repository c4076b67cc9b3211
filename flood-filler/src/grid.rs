use tinyvec::ArrayVec;

use crate::wire::{Game, Position};

/// Per-turn view of the board used by every search.
///
/// `obstacles` holds how many more turns the body segment in a cell sticks around for, `0`
/// meaning the cell is free. Tails are always left at `0`: whether a tail moves next turn depends
/// on whether its snake just ate, and the searches account for that with the food they picked up
/// along the way.
///
/// A `Grid` is rebuilt from the wire game every turn and never carried across turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    obstacles: Vec<u32>,
    food: Vec<bool>,
    own_body: Vec<bool>,
    food_positions: Vec<Position>,
}

impl Grid {
    pub fn from_game(game: &Game) -> Self {
        let width = game.board.width;
        let height = game.board.height;
        let cells = (width * height) as usize;

        let mut grid = Grid {
            width,
            height,
            obstacles: vec![0; cells],
            food: vec![false; cells],
            own_body: vec![false; cells],
            food_positions: Vec::with_capacity(game.board.food.len()),
        };

        for snake in &game.board.snakes {
            let length = snake.body.len();

            for (i, part) in snake.body.iter().take(length.saturating_sub(1)).enumerate() {
                if let Some(index) = grid.index(part) {
                    grid.obstacles[index] = (length - (i + 1)) as u32;
                }
            }
        }

        for part in &game.you.body {
            if let Some(index) = grid.index(part) {
                grid.own_body[index] = true;
            }
        }

        for food in &game.board.food {
            if let Some(index) = grid.index(food) {
                grid.food[index] = true;
                grid.food_positions.push(*food);
            }
        }

        grid
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn cell_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    pub fn contains(&self, pos: &Position) -> bool {
        pos.in_bounds(self.width, self.height)
    }

    pub(crate) fn index(&self, pos: &Position) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Turns until the segment in this cell is gone, `0` for free or off-board cells
    pub fn obstacle(&self, pos: &Position) -> u32 {
        self.index(pos).map_or(0, |i| self.obstacles[i])
    }

    pub fn has_food(&self, pos: &Position) -> bool {
        self.index(pos).map_or(false, |i| self.food[i])
    }

    pub fn is_own_body(&self, pos: &Position) -> bool {
        self.index(pos).map_or(false, |i| self.own_body[i])
    }

    pub fn food_positions(&self) -> &[Position] {
        &self.food_positions
    }

    pub fn neighbors(&self, pos: &Position) -> ArrayVec<[Position; 4]> {
        pos.adjacent(self.width, self.height)
    }

    /// Can we stand on `pos` when it is the `arrival`th cell of a path that has eaten
    /// `food_in_path` food so far?
    ///
    /// Every piece of food we eat holds our own tail back one turn, so our own segments stay
    /// around that much longer.
    pub fn is_traversable(&self, pos: &Position, arrival: u32, food_in_path: u32) -> bool {
        let Some(index) = self.index(pos) else {
            return false;
        };

        let lifetime = if self.own_body[index] {
            self.obstacles[index] + food_in_path
        } else {
            self.obstacles[index]
        };

        arrival > lifetime
    }
}
