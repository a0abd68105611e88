//! Puzzle piece definitions and coordinate types.
//!
//! Each piece is a small polycube given as unit-cube offsets in an unrotated
//! local frame, normalized to start at the origin. The catalog is fixed,
//! read-only data; pieces are referenced by value (`Copy`) everywhere.

use rgb::RGB8;

/// A 3D coordinate representing a unit cube position.
pub type Coord = (i32, i32, i32);

/// Maximum number of blocks in any catalog piece.
pub const MAX_BLOCKS_PER_PIECE: usize = 4;

/// An immutable polycube piece: identity, blocks, and display metadata.
///
/// `color` and `symmetry_group` are plain data for external collaborators
/// (rendering, HUD); no engine logic depends on them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceDefinition {
    pub id: &'static str,
    pub name: &'static str,
    /// Block offsets in the piece's local frame, minimum coordinates at 0.
    pub blocks: &'static [Coord],
    pub color: RGB8,
    pub symmetry_group: u8,
}

impl PieceDefinition {
    /// Number of unit cubes in this piece.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

/// Small L: two blocks along x with a foot along z (3 blocks).
pub const SMALL_L: PieceDefinition = PieceDefinition {
    id: "1",
    name: "Small-L",
    blocks: &[(0, 0, 0), (1, 0, 0), (0, 0, 1)],
    color: RGB8 { r: 255, g: 51, b: 51 }, // red
    symmetry_group: 1,
};

/// Straight line of three blocks along x.
pub const LINE_3: PieceDefinition = PieceDefinition {
    id: "2",
    name: "Line-3",
    blocks: &[(0, 0, 0), (1, 0, 0), (2, 0, 0)],
    color: RGB8 { r: 51, g: 102, b: 255 }, // blue
    symmetry_group: 2,
};

/// Corner rising out of the ground plane (3 blocks).
pub const CORNER_3D: PieceDefinition = PieceDefinition {
    id: "3",
    name: "Corner-3D",
    blocks: &[(0, 0, 0), (1, 0, 0), (0, 1, 0)],
    color: RGB8 { r: 51, g: 204, b: 51 }, // green
    symmetry_group: 3,
};

/// Flat T-tetromino in the xz plane.
pub const T_SHAPE: PieceDefinition = PieceDefinition {
    id: "4",
    name: "T-Shape",
    blocks: &[(0, 0, 0), (1, 0, 0), (2, 0, 0), (1, 0, 1)],
    color: RGB8 { r: 255, g: 255, b: 51 }, // yellow
    symmetry_group: 4,
};

/// Flat L-tetromino in the xz plane.
pub const L_SHAPE: PieceDefinition = PieceDefinition {
    id: "5",
    name: "L-Shape",
    blocks: &[(0, 0, 0), (0, 0, 1), (0, 0, 2), (1, 0, 2)],
    color: RGB8 { r: 153, g: 51, b: 204 }, // purple
    symmetry_group: 5,
};

/// Flat Z-tetromino in the xz plane.
pub const Z_SHAPE: PieceDefinition = PieceDefinition {
    id: "6",
    name: "Z-Shape",
    blocks: &[(0, 0, 0), (1, 0, 0), (1, 0, 1), (2, 0, 1)],
    color: RGB8 { r: 255, g: 128, b: 26 }, // orange
    symmetry_group: 6,
};

/// Two-step staircase climbing in y (4 blocks).
pub const STAIRS_3D: PieceDefinition = PieceDefinition {
    id: "7",
    name: "Stairs-3D",
    blocks: &[(0, 0, 0), (1, 0, 0), (1, 1, 0), (2, 1, 0)],
    color: RGB8 { r: 51, g: 230, b: 230 }, // cyan
    symmetry_group: 7,
};

/// Upright 2x2 wall in the xy plane.
pub const TOWER: PieceDefinition = PieceDefinition {
    id: "8",
    name: "Tower",
    blocks: &[(0, 0, 0), (1, 0, 0), (0, 1, 0), (1, 1, 0)],
    color: RGB8 { r: 153, g: 102, b: 51 }, // brown
    symmetry_group: 8,
};

/// The eight standard pieces, three 3-block and five 4-block shapes.
pub const CATALOG: &[PieceDefinition] = &[
    SMALL_L, LINE_3, CORNER_3D, T_SHAPE, L_SHAPE, Z_SHAPE, STAIRS_3D, TOWER,
];

/// Returns the catalog pieces with exactly `count` blocks.
pub fn pieces_with_block_count(count: usize) -> Vec<PieceDefinition> {
    CATALOG
        .iter()
        .copied()
        .filter(|piece| piece.block_count() == count)
        .collect()
}

/// Looks up a catalog piece by its id.
pub fn piece_by_id(id: &str) -> Option<PieceDefinition> {
    CATALOG.iter().copied().find(|piece| piece.id == id)
}

/// Looks up a catalog piece by its display name.
pub fn piece_by_name(name: &str) -> Option<PieceDefinition> {
    CATALOG.iter().copied().find(|piece| piece.name == name)
}

/// A piece placed at specific world coordinates.
///
/// Uses a fixed-size array to avoid heap allocation in the solver's hot loop.
#[derive(Clone, Copy, Debug)]
pub struct PlacedPiece {
    /// Index into the piece list the solver was given.
    pub piece_index: usize,
    pub positions: [Coord; MAX_BLOCKS_PER_PIECE],
    pub block_count: u8,
}

impl PlacedPiece {
    /// A zero-valued placeholder for fixed-size array initialization.
    pub const EMPTY: Self = Self {
        piece_index: 0,
        positions: [(0, 0, 0); MAX_BLOCKS_PER_PIECE],
        block_count: 0,
    };

    /// Returns the valid block positions for this placement.
    #[inline]
    pub fn blocks(&self) -> &[Coord] {
        &self.positions[..self.block_count as usize]
    }
}
