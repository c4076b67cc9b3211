use std::{fmt, str::FromStr};

use tinyvec::ArrayVec;

use crate::{error::EngineError, wire::Position};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The order moves are scored and tie-broken in
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn all() -> [Direction; 4] {
        Self::ALL
    }

    pub(crate) fn as_index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Unit step on the board, y grows upwards
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The move that takes `from` onto `to`, if they are one step apart
    pub fn from_step(from: &Position, to: &Position) -> Option<Direction> {
        Self::ALL
            .into_iter()
            .find(|direction| &from.step(*direction) == to)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(EngineError::InvalidDirection(other.to_owned())),
        }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position { x, y }
    }
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Where we end up after one move. The result may be off the board
    pub fn step(&self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();

        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Manhattan distance, the fewest moves between two cells
    pub fn dist_from(&self, other: &Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn in_bounds(&self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as u32) < width && (self.y as u32) < height
    }

    /// The neighbouring cells that are on a `width` x `height` board, in up, down, left, right
    /// order
    pub fn adjacent(&self, width: u32, height: u32) -> ArrayVec<[Position; 4]> {
        Direction::ALL
            .iter()
            .map(|direction| self.step(*direction))
            .filter(|neighbor| neighbor.in_bounds(width, height))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_follows_board_axes() {
        let origin = Position::new(5, 5);

        assert_eq!(origin.step(Direction::Up), Position::new(5, 6));
        assert_eq!(origin.step(Direction::Down), Position::new(5, 4));
        assert_eq!(origin.step(Direction::Left), Position::new(4, 5));
        assert_eq!(origin.step(Direction::Right), Position::new(6, 5));
    }

    #[test]
    fn test_step_can_leave_the_board() {
        assert_eq!(
            Position::new(0, 0).step(Direction::Left),
            Position::new(-1, 0)
        );
        assert!(!Position::new(-1, 0).in_bounds(11, 11));
        assert!(!Position::new(11, 0).in_bounds(11, 11));
        assert!(Position::new(10, 10).in_bounds(11, 11));
    }

    #[test]
    fn test_adjacent_in_the_corner() {
        let neighbors = Position::new(0, 0).adjacent(11, 11);

        assert_eq!(
            neighbors.as_slice(),
            &[Position::new(0, 1), Position::new(1, 0)]
        );
    }

    #[test]
    fn test_adjacent_in_the_middle_is_ordered() {
        let neighbors = Position::new(3, 3).adjacent(7, 7);

        assert_eq!(
            neighbors.as_slice(),
            &[
                Position::new(3, 4),
                Position::new(3, 2),
                Position::new(2, 3),
                Position::new(4, 3),
            ]
        );
    }

    #[test]
    fn test_adjacent_on_a_single_cell_board() {
        assert!(Position::new(0, 0).adjacent(1, 1).is_empty());
    }

    #[test]
    fn test_dist_from() {
        assert_eq!(Position::new(1, 1).dist_from(&Position::new(2, 2)), 2);
        assert_eq!(Position::new(4, 0).dist_from(&Position::new(0, 3)), 7);
        assert_eq!(Position::new(4, 4).dist_from(&Position::new(4, 4)), 0);
    }

    #[test]
    fn test_parse_and_display() {
        for direction in Direction::all() {
            assert_eq!(direction.to_string().parse::<Direction>(), Ok(direction));
        }
    }

    #[test]
    fn test_invalid_direction() {
        assert_eq!(
            "north".parse::<Direction>(),
            Err(EngineError::InvalidDirection("north".to_owned()))
        );
        assert!("Up".parse::<Direction>().is_err());
    }

    #[test]
    fn test_from_step() {
        let head = Position::new(2, 2);

        assert_eq!(
            Direction::from_step(&head, &Position::new(2, 3)),
            Some(Direction::Up)
        );
        assert_eq!(
            Direction::from_step(&head, &Position::new(1, 2)),
            Some(Direction::Left)
        );
        assert_eq!(Direction::from_step(&head, &head), None);
        assert_eq!(Direction::from_step(&head, &Position::new(3, 3)), None);
    }

    #[test]
    fn test_serde_uses_engine_names() {
        assert_eq!(
            serde_json::to_string(&Direction::Right).unwrap(),
            r#""right""#
        );
        let parsed: Direction = serde_json::from_str(r#""down""#).unwrap();
        assert_eq!(parsed, Direction::Down);
    }
}
