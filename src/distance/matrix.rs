use std::collections::BTreeMap;

use crate::domain::types::Point;
use crate::error::{Result, RoutingError};

/// Dense travel times between cached points, in the half time units of
/// `Path::time_cost`. Every point gets an index the first time it is written;
/// unset entries stay `None`.
#[derive(Debug, Clone, Default)]
pub struct TimeLookup {
    index: BTreeMap<Point, usize>,
    depot: Vec<Option<u32>>,
    edges: Vec<Vec<Option<u32>>>,
}

impl TimeLookup {
    pub fn with_capacity(points: usize) -> Self {
        Self {
            index: BTreeMap::new(),
            depot: Vec::with_capacity(points),
            edges: Vec::with_capacity(points),
        }
    }

    fn register(&mut self, p: Point) -> usize {
        if let Some(&i) = self.index.get(&p) {
            return i;
        }
        let i = self.depot.len();
        self.index.insert(p, i);
        self.depot.push(None);
        for row in &mut self.edges {
            row.push(None);
        }
        self.edges.push(vec![None; i + 1]);
        i
    }

    fn index_of(&self, p: Point) -> Result<usize> {
        self.index
            .get(&p)
            .copied()
            .ok_or(RoutingError::UnknownPoint(p))
    }

    pub fn len(&self) -> usize {
        self.depot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depot.is_empty()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.index.contains_key(&p)
    }

    /// Records `from -> to`. Writing a different time for a known edge is an error.
    pub fn set_edge(&mut self, from: Point, to: Point, time: u32) -> Result<()> {
        let a = self.register(from);
        let b = self.register(to);
        match self.edges[a][b] {
            Some(cached) if cached != time => Err(RoutingError::AsymmetricEdge {
                from,
                to,
                cached,
                found: time,
            }),
            _ => {
                self.edges[a][b] = Some(time);
                Ok(())
            }
        }
    }

    pub fn set_depot(&mut self, p: Point, time: u32) {
        let i = self.register(p);
        self.depot[i] = Some(time);
    }

    pub fn edge(&self, from: Point, to: Point) -> Result<u32> {
        let a = self.index_of(from)?;
        let b = self.index_of(to)?;
        self.edges[a][b].ok_or(RoutingError::MissingEdge { from, to })
    }

    pub fn has_edge(&self, from: Point, to: Point) -> bool {
        self.edge(from, to).is_ok()
    }

    pub fn to_depot(&self, p: Point) -> Result<u32> {
        let i = self.index_of(p)?;
        self.depot[i].ok_or(RoutingError::MissingDepotPath(p))
    }
}
