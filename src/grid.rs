//! Occupancy grid and text formatting for puzzle boards.
//!
//! The grid is a flat boolean array indexed x-major, owned by one solver or
//! board instance and mutated only through symmetric place/remove calls. It
//! is never shared across puzzle instances.

use rustc_hash::FxHashMap;

use crate::pieces::{Coord, PlacedPiece};
use crate::target::TargetArea;

/// 3D boolean occupancy, `width` x `height` x `depth`.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    depth: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Creates an empty grid of the given dimensions.
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
            cells: vec![false; width * height * depth],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Index order is x-major: `idx = x * height * depth + y * depth + z`.
    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> usize {
        (x as usize) * self.height * self.depth + (y as usize) * self.depth + z as usize
    }

    /// Whether a coordinate lies within the grid.
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && (x as usize) < self.width
            && y >= 0
            && (y as usize) < self.height
            && z >= 0
            && (z as usize) < self.depth
    }

    /// Whether a cell is occupied; out-of-bounds cells read as free.
    #[inline]
    pub fn is_occupied(&self, x: i32, y: i32, z: i32) -> bool {
        self.in_bounds(x, y, z) && self.cells[self.index(x, y, z)]
    }

    /// Sets one cell; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, z: i32, occupied: bool) {
        if self.in_bounds(x, y, z) {
            let idx = self.index(x, y, z);
            self.cells[idx] = occupied;
        }
    }

    /// Marks every block occupied. Exact inverse of [`Self::remove_blocks`].
    pub fn place_blocks(&mut self, blocks: &[Coord]) {
        for &(x, y, z) in blocks {
            self.set(x, y, z, true);
        }
    }

    /// Marks every block free. Exact inverse of [`Self::place_blocks`].
    pub fn remove_blocks(&mut self, blocks: &[Coord]) {
        for &(x, y, z) in blocks {
            self.set(x, y, z, false);
        }
    }

    /// Number of occupied cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&occupied| occupied).count()
    }
}

/// Formats a solved placement as text.
///
/// Displays the two y layers side by side, one row per z. Cells show the
/// 1-based piece number (hex above 9), unfilled footprint cells show '.',
/// cells outside the footprint show ' '.
pub fn format_solution(solution: &[PlacedPiece], area: &TargetArea) -> String {
    use crate::target::REQUIRED_HEIGHT;

    let mut piece_at: FxHashMap<Coord, u8> = FxHashMap::default();
    for placed in solution {
        let piece_number = (placed.piece_index + 1) as u8;
        for &block in placed.blocks() {
            piece_at.insert(block, piece_number);
        }
    }

    let min_x = area.column_positions().map(|(x, _)| x).min().unwrap_or(0);
    let min_z = area.column_positions().map(|(_, z)| z).min().unwrap_or(0);
    let width = area.width();

    let mut output = String::new();

    let mut header = String::new();
    for y in 0..REQUIRED_HEIGHT {
        if y > 0 {
            header.push_str("  ");
        }
        header.push_str(&format!("y={:<width$}", y, width = width));
    }
    output.push_str(header.trim_end());
    output.push('\n');

    for z in min_z..min_z + area.depth() as i32 {
        let mut row = String::new();
        for y in 0..REQUIRED_HEIGHT as i32 {
            if y > 0 {
                row.push_str("  ");
            }
            for x in min_x..min_x + width as i32 {
                let display_char = match piece_at.get(&(x, y, z)) {
                    Some(&n) if n < 10 => char::from(b'0' + n),
                    Some(&n) => char::from(b'A' + n - 10),
                    None if area.contains(x, z) => '.',
                    None => ' ',
                };
                row.push(display_char);
            }
        }
        output.push_str(row.trim_end());
        output.push('\n');
    }

    output
}
