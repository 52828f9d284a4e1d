use std::fmt;

use serde::{Deserialize, Serialize};

/// Immutable cell coordinate. Ordered by x, then y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dir: Direction) -> Point {
        match dir {
            Direction::Left => Point::new(self.x - 1, self.y),
            Direction::Right => Point::new(self.x + 1, self.y),
            Direction::Down => Point::new(self.x, self.y + 1),
            Direction::Up => Point::new(self.x, self.y - 1),
        }
    }

    /// Direction of an adjacent point, `None` if `other` is this point.
    pub fn dir_to(self, other: Point) -> Option<Direction> {
        let x_diff = other.x - self.x;
        let y_diff = other.y - self.y;
        if x_diff > 0 {
            Some(Direction::Right)
        } else if x_diff < 0 {
            Some(Direction::Left)
        } else if y_diff > 0 {
            Some(Direction::Down)
        } else if y_diff < 0 {
            Some(Direction::Up)
        } else {
            None
        }
    }

    pub fn in_grid(self, n: i32) -> bool {
        self.x >= 0 && self.x < n && self.y >= 0 && self.y < n
    }

    /// Strict Chebyshev window of `radius` around `center`.
    pub fn within(self, center: Point, radius: i32) -> bool {
        self.x > center.x - radius
            && self.x < center.x + radius
            && self.y > center.y - radius
            && self.y < center.y + radius
    }

    pub fn diff_x(self, other: Point) -> i32 {
        (self.x - other.x).abs()
    }

    pub fn diff_y(self, other: Point) -> i32 {
        (self.y - other.y).abs()
    }

    /// Row-major index into an `n * n` cell array.
    pub fn index(self, n: i32) -> usize {
        (self.y * n + self.x) as usize
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// Search expands neighbors in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Down,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Down,
        Direction::Up,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
        }
    }
}

/// One cell of a path: where we are, how we got here and the cell's time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub point: Point,
    pub direction: Option<Direction>,
    pub time: u32,
}

impl Step {
    pub fn origin(point: Point, time: u32) -> Self {
        Self {
            point,
            direction: None,
            time,
        }
    }

    pub fn new(point: Point, direction: Direction, time: u32) -> Self {
        Self {
            point,
            direction: Some(direction),
            time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_and_dir_to_agree() {
        let p = Point::new(3, 3);
        for dir in Direction::ALL {
            assert_eq!(p.dir_to(p.offset(dir)), Some(dir));
            assert_eq!(p.offset(dir).offset(dir.opposite()), p);
        }
        assert_eq!(p.dir_to(p), None);
    }

    #[test]
    fn within_is_strict() {
        let c = Point::new(5, 5);
        assert!(Point::new(7, 3).within(c, 3));
        assert!(!Point::new(8, 5).within(c, 3));
        assert!(!Point::new(5, 5).within(c, 0));
    }
}
