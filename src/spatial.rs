//! Cell → bodies mapping, rebuilt once per tick.
//!
//! Two interchangeable layouts live here. [`SortedIndex`] keeps body indices
//! in one flat array ordered by cell id with a per-cell range table, and is the
//! default. [`BucketIndex`] keeps one list per cell and only moves a body when
//! its cell changed since the previous rebuild. Both hold plain indices into
//! the simulation's body slice and never own bodies.

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::grid::{Cell, Grid};

/// Which [`SpatialIndex`] layout a simulation uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    #[default]
    Sorted,
    Buckets,
}

impl Partition {
    pub fn build(self, grid: Grid) -> Box<dyn SpatialIndex> {
        match self {
            Partition::Sorted => Box::new(SortedIndex::new(grid)),
            Partition::Buckets => Box::new(BucketIndex::new(grid)),
        }
    }
}

pub trait SpatialIndex: Send + Sync {
    fn grid(&self) -> &Grid;

    /// Re-derives cell membership from the bodies' current positions.
    fn rebuild(&mut self, bodies: &[Body]);

    /// Indices of the bodies in one cell. Cells outside the grid are empty.
    fn query(&self, cell: Cell) -> &[usize];

    /// Cell a body was filed under by the last rebuild.
    fn indexed_cell(&self, body: usize) -> Option<Cell>;

    /// Bodies of the 3×3 block around `cell`, clipped at the grid edges.
    fn neighborhood(&self, cell: Cell, out: &mut Vec<usize>) {
        self.neighborhood_range(cell, 1, out);
    }

    /// Bodies of the `(2·reach+1)²` block around `cell`.
    fn neighborhood_range(&self, cell: Cell, reach: u32, out: &mut Vec<usize>) {
        out.clear();
        for c in self.grid().block(cell, reach) {
            out.extend_from_slice(self.query(c));
        }
    }

    /// Iterates over the non-empty cells.
    fn occupied(&self) -> Box<dyn Iterator<Item = Cell> + '_> {
        let grid = *self.grid();
        Box::new(
            (0..grid.cell_count())
                .map(move |id| grid.cell_from_id(id))
                .filter(move |&c| !self.query(c).is_empty()),
        )
    }
}

/// Flat array of body indices sorted by cell id plus a range table.
#[derive(Debug)]
pub struct SortedIndex {
    grid: Grid,
    /// Body indices, sorted by `cell_ids`. Kept across ticks so the next sort
    /// starts from nearly sorted input.
    order: Vec<usize>,
    /// Cell id of every body, by body index.
    cell_ids: Vec<usize>,
    /// `order[starts[c]..starts[c + 1]]` are the bodies of cell `c`.
    starts: Vec<usize>,
}

impl SortedIndex {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            order: Vec::new(),
            cell_ids: Vec::new(),
            starts: vec![0; grid.cell_count() + 1],
        }
    }
}

impl SpatialIndex for SortedIndex {
    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn rebuild(&mut self, bodies: &[Body]) {
        let grid = self.grid;
        self.cell_ids.clear();
        self.cell_ids.extend(bodies.iter().map(|b| grid.id_of(b.pos)));

        if self.order.len() != bodies.len() {
            self.order.clear();
            self.order.extend(0..bodies.len());
        }

        // The std stable sort is adaptive: frame-to-frame the order is
        // almost sorted already and this runs in close to linear time.
        let cell_ids = &self.cell_ids;
        self.order.sort_by_key(|&i| cell_ids[i]);

        let mut pos = 0;
        for (cell, start) in self.starts.iter_mut().enumerate() {
            while pos < self.order.len() && cell_ids[self.order[pos]] < cell {
                pos += 1;
            }
            *start = pos;
        }
    }

    fn query(&self, cell: Cell) -> &[usize] {
        if !self.grid.contains(cell) {
            return &[];
        }
        let id = self.grid.id(cell);
        &self.order[self.starts[id]..self.starts[id + 1]]
    }

    fn indexed_cell(&self, body: usize) -> Option<Cell> {
        self.cell_ids.get(body).map(|&id| self.grid.cell_from_id(id))
    }

    fn occupied(&self) -> Box<dyn Iterator<Item = Cell> + '_> {
        // Consecutive runs of the sorted array are exactly the occupied cells.
        let mut last = None;
        Box::new(self.order.iter().filter_map(move |&i| {
            let id = self.cell_ids[i];
            if last == Some(id) {
                return None;
            }
            last = Some(id);
            Some(self.grid.cell_from_id(id))
        }))
    }
}

/// One list per cell, updated incrementally.
#[derive(Debug)]
pub struct BucketIndex {
    grid: Grid,
    buckets: Vec<Vec<usize>>,
    /// Cell id every body is currently filed under.
    assigned: Vec<usize>,
}

impl BucketIndex {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            buckets: vec![Vec::new(); grid.cell_count()],
            assigned: Vec::new(),
        }
    }

    fn fill(&mut self, bodies: &[Body]) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.assigned.clear();
        for (i, body) in bodies.iter().enumerate() {
            let id = self.grid.id_of(body.pos);
            self.buckets[id].push(i);
            self.assigned.push(id);
        }
    }

    /// Moves a body to `to` if it is not already filed there.
    /// Returns whether the body changed cells.
    fn relocate(&mut self, body: usize, to: usize) -> bool {
        let from = self.assigned[body];
        if from == to {
            return false;
        }
        let bucket = &mut self.buckets[from];
        if let Some(slot) = bucket.iter().position(|&b| b == body) {
            bucket.swap_remove(slot);
        }
        self.buckets[to].push(body);
        self.assigned[body] = to;
        true
    }
}

impl SpatialIndex for BucketIndex {
    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn rebuild(&mut self, bodies: &[Body]) {
        if self.assigned.len() != bodies.len() {
            self.fill(bodies);
            return;
        }

        let mut moved = 0usize;
        for (i, body) in bodies.iter().enumerate() {
            let to = self.grid.id_of(body.pos);
            if self.relocate(i, to) {
                moved += 1;
            }
        }
        log::trace!("bucket index: {moved} of {} bodies changed cells", bodies.len());
    }

    fn query(&self, cell: Cell) -> &[usize] {
        if !self.grid.contains(cell) {
            return &[];
        }
        &self.buckets[self.grid.id(cell)]
    }

    fn indexed_cell(&self, body: usize) -> Option<Cell> {
        self.assigned.get(body).map(|&id| self.grid.cell_from_id(id))
    }
}
