use crate::domain::types::Point;

/// Inclusive rectangle around a set of points, clamped to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    start_x: i32,
    start_y: i32,
    end_x: i32,
    end_y: i32,
}

impl Bounds {
    /// Smallest rectangle holding every point, grown by `expansion` on each side.
    /// Returns `None` for an empty point set.
    pub fn around<'a>(
        points: impl IntoIterator<Item = &'a Point>,
        expansion: i32,
        n: i32,
    ) -> Option<Bounds> {
        let mut points = points.into_iter().peekable();
        points.peek()?;

        let (mut min_x, mut min_y) = (i32::MAX, i32::MAX);
        let (mut max_x, mut max_y) = (i32::MIN, i32::MIN);
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Some(Bounds {
            start_x: (min_x - expansion).max(0),
            start_y: (min_y - expansion).max(0),
            end_x: (max_x + expansion).min(n - 1),
            end_y: (max_y + expansion).min(n - 1),
        })
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.start_x && p.x <= self.end_x && p.y >= self.start_y && p.y <= self.end_y
    }
}
