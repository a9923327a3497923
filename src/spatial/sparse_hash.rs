//! Sparse hash grid for neighbour queries over the agent roster

use ahash::AHashMap;
use glam::Vec2;

/// Sparse hash grid keyed by roster index
pub struct SparseHashGrid {
    cell_size: f32,
    cells: AHashMap<(i32, i32), Vec<usize>>,
}

impl SparseHashGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: AHashMap::new(),
        }
    }

    #[inline]
    fn cell_coord(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn insert(&mut self, index: usize, pos: Vec2) {
        let coord = self.cell_coord(pos);
        self.cells.entry(coord).or_default().push(index);
    }

    /// Indices whose stored position lies within `radius` of `center`,
    /// in ascending roster order
    pub fn query_radius(&self, center: Vec2, radius: f32, positions: &[Option<Vec2>]) -> Vec<usize> {
        let reach = (radius / self.cell_size).ceil() as i32;
        let (cx, cy) = self.cell_coord(center);

        let mut found: Vec<usize> = (-reach..=reach)
            .flat_map(|dx| (-reach..=reach).map(move |dy| (cx + dx, cy + dy)))
            .filter_map(|coord| self.cells.get(&coord))
            .flatten()
            .copied()
            .filter(|&idx| {
                positions
                    .get(idx)
                    .copied()
                    .flatten()
                    .map(|pos| center.distance(pos) <= radius)
                    .unwrap_or(false)
            })
            .collect();

        found.sort_unstable();
        found
    }

    /// Rebuild grid from positions; agents without a position are skipped
    pub fn rebuild(&mut self, positions: &[Option<Vec2>]) {
        self.clear();
        for (idx, pos) in positions.iter().enumerate() {
            if let Some(pos) = pos {
                self.insert(idx, *pos);
            }
        }
    }
}
