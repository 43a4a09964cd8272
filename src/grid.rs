use ultraviolet::Vec2;

/// Integer coordinates of a grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Uniform partition of the world rectangle into `columns × rows` cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    pub columns: u32,
    pub rows: u32,
    /// Size of one cell, `world / (columns, rows)`.
    pub cell_size: Vec2,
}

impl Grid {
    /// `columns` and `rows` must be non-zero; configuration validation
    /// guarantees it before a grid is built.
    pub fn new(world: Vec2, columns: u32, rows: u32) -> Self {
        debug_assert!(columns > 0 && rows > 0);
        Self {
            columns,
            rows,
            cell_size: Vec2::new(world.x / columns as f32, world.y / rows as f32),
        }
    }

    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.columns && cell.y < self.rows
    }

    /// Flat cell id, `x + y * columns`.
    #[inline(always)]
    pub fn id(&self, cell: Cell) -> usize {
        cell.x as usize + cell.y as usize * self.columns as usize
    }

    pub fn cell_from_id(&self, id: usize) -> Cell {
        let columns = self.columns as usize;
        Cell::new((id % columns) as u32, (id / columns) as u32)
    }

    /// Cell containing `pos`, clamped into the grid even when the position
    /// lies outside the world.
    #[inline(always)]
    pub fn cell_of(&self, pos: Vec2) -> Cell {
        Cell::new(
            Self::axis(pos.x, self.cell_size.x, self.columns),
            Self::axis(pos.y, self.cell_size.y, self.rows),
        )
    }

    #[inline(always)]
    pub fn id_of(&self, pos: Vec2) -> usize {
        self.id(self.cell_of(pos))
    }

    // Float-to-int casts saturate and map NaN to 0, so the clamp covers everything.
    #[inline(always)]
    fn axis(coord: f32, size: f32, count: u32) -> u32 {
        let c = (coord / size).floor();
        if c <= 0.0 {
            0
        } else {
            (c as u32).min(count - 1)
        }
    }

    /// Cells of the `(2·reach+1)²` block centered on `center`, clipped at the
    /// grid edges. Never wraps around.
    pub fn block(&self, center: Cell, reach: u32) -> impl Iterator<Item = Cell> + use<> {
        let x0 = center.x.saturating_sub(reach);
        let y0 = center.y.saturating_sub(reach);
        let x1 = center.x.saturating_add(reach).min(self.columns - 1);
        let y1 = center.y.saturating_add(reach).min(self.rows - 1);
        (y0..=y1).flat_map(move |y| (x0..=x1).map(move |x| Cell::new(x, y)))
    }

    /// Neighborhood reach needed so that any two touching bodies of diameter
    /// up to `max_diameter` are found: at least one cell in every direction.
    pub fn reach_for(&self, max_diameter: f32) -> u32 {
        let smallest = self.cell_size.x.min(self.cell_size.y);
        let cells = (max_diameter / smallest).ceil();
        if cells.is_finite() && cells > 1.0 {
            cells as u32
        } else {
            1
        }
    }
}
