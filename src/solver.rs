//! Backtracking exact-fill solver.
//!
//! Attempts to place every piece, one at a time, onto a scratch occupancy
//! board until the target area is tiled exactly. For each piece it tries its
//! unique rotations (symmetric duplicates removed), anchored at every target
//! column and both height levels; placements are undone on backtrack. The
//! search is complete: a `None` result means no tiling exists for that piece
//! order and area (or the defensive node budget was hit).

use tracing::debug;

use crate::geometry::{rotate_piece, unique_rotations};
use crate::grid::OccupancyGrid;
use crate::pieces::{Coord, PieceDefinition, PlacedPiece, MAX_BLOCKS_PER_PIECE};
use crate::target::{TargetArea, REQUIRED_HEIGHT};
use crate::validate::{can_place_piece, is_area_completely_filled};

/// Scratch board padding beyond the footprint bounding box, so a rotation's
/// local origin offset can never push a legal placement against the edge.
const BOARD_MARGIN: usize = 2;

/// Upper bound on placement attempts before the search gives up.
///
/// Real puzzles (at most 7 pieces over at most 24 cells) stay far below
/// this; the bound only stops runaway searches on malformed input.
const MAX_NODES: usize = 5_000_000;

struct Search<'a> {
    /// Distinct rotated shapes per piece, origin-normalized.
    shapes: Vec<Vec<Vec<Coord>>>,
    /// Target columns in sorted order for a deterministic search.
    columns: Vec<(i32, i32)>,
    area: &'a TargetArea,
    nodes: usize,
}

/// Searches for a placement of all `pieces` that exactly tiles `area`.
///
/// Returns the placements in piece order, or `None` when no tiling exists.
/// Piece block totals that cannot match the area's cell count fail without
/// searching.
pub fn solve(pieces: &[PieceDefinition], area: &TargetArea) -> Option<Vec<PlacedPiece>> {
    let total_blocks: usize = pieces.iter().map(|piece| piece.block_count()).sum();
    if total_blocks != area.total_cells() || area.footprint_size() == 0 {
        return None;
    }

    let shapes = pieces
        .iter()
        .map(|piece| {
            unique_rotations(piece.blocks)
                .into_iter()
                .map(|rotation_index| rotate_piece(piece.blocks, rotation_index))
                .collect()
        })
        .collect();

    let mut columns: Vec<(i32, i32)> = area.column_positions().collect();
    columns.sort_unstable();

    let mut search = Search {
        shapes,
        columns,
        area,
        nodes: 0,
    };
    let mut grid = OccupancyGrid::new(
        area.width() + BOARD_MARGIN,
        REQUIRED_HEIGHT,
        area.depth() + BOARD_MARGIN,
    );
    let mut placed = Vec::with_capacity(pieces.len());

    let solved = place_next(&mut search, 0, &mut grid, &mut placed);
    debug!(
        pieces = pieces.len(),
        cells = area.total_cells(),
        nodes = search.nodes,
        solved,
        "solver finished"
    );
    solved.then_some(placed)
}

/// True when at least one exact tiling exists.
pub fn is_solvable(pieces: &[PieceDefinition], area: &TargetArea) -> bool {
    solve(pieces, area).is_some()
}

fn place_next(
    search: &mut Search<'_>,
    piece_index: usize,
    grid: &mut OccupancyGrid,
    placed: &mut Vec<PlacedPiece>,
) -> bool {
    if piece_index == search.shapes.len() {
        // every piece is down; confirm nothing in the footprint was missed
        return is_area_completely_filled(grid, search.area);
    }

    for shape_index in 0..search.shapes[piece_index].len() {
        for column_index in 0..search.columns.len() {
            let (x, z) = search.columns[column_index];
            for y in 0..REQUIRED_HEIGHT as i32 {
                search.nodes += 1;
                if search.nodes > MAX_NODES {
                    return false;
                }

                let shape = &search.shapes[piece_index][shape_index];
                if !can_place_piece(shape, (x, y, z), grid, search.area) {
                    continue;
                }

                let mut positions = [(0, 0, 0); MAX_BLOCKS_PER_PIECE];
                for (slot, &(bx, by, bz)) in positions.iter_mut().zip(shape.iter()) {
                    *slot = (x + bx, y + by, z + bz);
                }
                let block_count = shape.len() as u8;
                let world_blocks = &positions[..block_count as usize];

                grid.place_blocks(world_blocks);
                placed.push(PlacedPiece {
                    piece_index,
                    positions,
                    block_count,
                });

                if place_next(search, piece_index + 1, grid, placed) {
                    return true;
                }

                // backtrack: unplace is the exact inverse of place
                let undone = placed.pop();
                if let Some(undone) = undone {
                    grid.remove_blocks(undone.blocks());
                }
            }
        }
    }

    false
}
