//! 3D rotation and transformation utilities.
//!
//! A cube has 24 proper orientations in 3D space (its rotation group). Each
//! is a signed permutation matrix with entries in {-1, 0, 1}. The full set is
//! generated once by breadth-first closure over the three 90-degree axis
//! generators and cached for the process lifetime; the cached table is
//! read-only afterwards and safe to share between threads.

use std::collections::VecDeque;
use std::sync::OnceLock;

use rustc_hash::FxHashSet;

use crate::pieces::Coord;

/// A 3x3 integer rotation matrix, stored row-major.
pub type RotationMatrix = [[i32; 3]; 3];

/// Number of proper rotations of the cube.
pub const NUM_ROTATIONS: usize = 24;

const IDENTITY: RotationMatrix = [[1, 0, 0], [0, 1, 0], [0, 0, 1]];

/// 90 degrees around the x axis.
const ROT_X_90: RotationMatrix = [[1, 0, 0], [0, 0, -1], [0, 1, 0]];
/// 90 degrees around the y axis.
const ROT_Y_90: RotationMatrix = [[0, 0, 1], [0, 1, 0], [-1, 0, 0]];
/// 90 degrees around the z axis.
const ROT_Z_90: RotationMatrix = [[0, -1, 0], [1, 0, 0], [0, 0, 1]];

fn multiply(a: &RotationMatrix, b: &RotationMatrix) -> RotationMatrix {
    let mut result = [[0; 3]; 3];
    for (i, row) in result.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    result
}

/// Returns the complete table of 24 rotation matrices.
///
/// Computed on first use by breadth-first closure: starting from the
/// identity, repeatedly compose with the x/y/z generators and keep every
/// matrix not seen before. The closure saturates at exactly 24 matrices.
/// Ordering is stable within a process run but carries no external meaning.
pub fn all_rotations() -> &'static [RotationMatrix] {
    static TABLE: OnceLock<Vec<RotationMatrix>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut seen: FxHashSet<RotationMatrix> = FxHashSet::default();
        let mut table = Vec::with_capacity(NUM_ROTATIONS);
        let mut queue = VecDeque::new();

        seen.insert(IDENTITY);
        table.push(IDENTITY);
        queue.push_back(IDENTITY);

        while let Some(current) = queue.pop_front() {
            for generator in [&ROT_X_90, &ROT_Y_90, &ROT_Z_90] {
                let neighbor = multiply(&current, generator);
                if seen.insert(neighbor) {
                    table.push(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }

        debug_assert_eq!(table.len(), NUM_ROTATIONS);
        table
    })
}

/// Applies a rotation matrix to a single coordinate.
#[inline]
pub fn apply(matrix: &RotationMatrix, (x, y, z): Coord) -> Coord {
    (
        matrix[0][0] * x + matrix[0][1] * y + matrix[0][2] * z,
        matrix[1][0] * x + matrix[1][1] * y + matrix[1][2] * z,
        matrix[2][0] * x + matrix[2][1] * y + matrix[2][2] * z,
    )
}

/// Rotates a block set by the table entry at `rotation_index`, then
/// normalizes the result to the origin.
///
/// An out-of-range index is a programming error; the blocks are returned
/// unchanged rather than treated as a recoverable condition.
pub fn rotate_piece(blocks: &[Coord], rotation_index: usize) -> Vec<Coord> {
    let table = all_rotations();
    let Some(matrix) = table.get(rotation_index) else {
        return blocks.to_vec();
    };
    let rotated = blocks.iter().map(|&block| apply(matrix, block)).collect();
    normalize_to_origin(rotated)
}

/// Translates coordinates so the minimum x, y, z values are all zero, then
/// sorts them into canonical order (ascending x, then y, then z).
///
/// Two block sets that are equal as sets normalize to identical sequences;
/// the operation is idempotent.
pub fn normalize_to_origin(mut blocks: Vec<Coord>) -> Vec<Coord> {
    if blocks.is_empty() {
        return blocks;
    }

    let min_x = blocks.iter().map(|(x, _, _)| *x).min().unwrap_or(0);
    let min_y = blocks.iter().map(|(_, y, _)| *y).min().unwrap_or(0);
    let min_z = blocks.iter().map(|(_, _, z)| *z).min().unwrap_or(0);

    for (x, y, z) in &mut blocks {
        *x -= min_x;
        *y -= min_y;
        *z -= min_z;
    }

    blocks.sort_unstable();
    blocks
}

/// Returns the rotation indices producing distinct shapes of a piece.
///
/// Applies all 24 rotations, normalizes each result, and keeps the first
/// rotation index per distinct normalized shape. Symmetric pieces yield far
/// fewer than 24 indices, which keeps the solver from re-trying orientations
/// that are geometrically identical.
pub fn unique_rotations(blocks: &[Coord]) -> Vec<usize> {
    if blocks.is_empty() {
        return vec![0];
    }

    let mut seen_shapes: FxHashSet<Vec<Coord>> = FxHashSet::default();
    let mut indices = Vec::new();

    for rotation_index in 0..all_rotations().len() {
        let shape = rotate_piece(blocks, rotation_index);
        if seen_shapes.insert(shape) {
            indices.push(rotation_index);
        }
    }

    indices
}

/// Returns the lexicographically smallest normalized form across all 24
/// rotations.
///
/// Used as a cross-orientation identity key, not by the solver path.
pub fn canonical_form(blocks: &[Coord]) -> Vec<Coord> {
    if blocks.is_empty() {
        return Vec::new();
    }

    let mut canonical = normalize_to_origin(blocks.to_vec());
    for rotation_index in 1..all_rotations().len() {
        let candidate = rotate_piece(blocks, rotation_index);
        if candidate < canonical {
            canonical = candidate;
        }
    }
    canonical
}

fn rotation_index_of(matrix: &RotationMatrix) -> usize {
    all_rotations()
        .iter()
        .position(|candidate| candidate == matrix)
        .unwrap_or(0)
}

/// Rotates a piece 90 degrees around the x axis.
pub fn rotate_x90(blocks: &[Coord]) -> Vec<Coord> {
    rotate_piece(blocks, rotation_index_of(&ROT_X_90))
}

/// Rotates a piece 90 degrees around the y axis.
pub fn rotate_y90(blocks: &[Coord]) -> Vec<Coord> {
    rotate_piece(blocks, rotation_index_of(&ROT_Y_90))
}

/// Rotates a piece 90 degrees around the z axis.
pub fn rotate_z90(blocks: &[Coord]) -> Vec<Coord> {
    rotate_piece(blocks, rotation_index_of(&ROT_Z_90))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{CORNER_3D, LINE_3, L_SHAPE, TOWER};

    /// A fully symmetric 2x2x2 cube (not in the catalog).
    const CUBE_2X2X2: &[Coord] = &[
        (0, 0, 0),
        (1, 0, 0),
        (0, 1, 0),
        (1, 1, 0),
        (0, 0, 1),
        (1, 0, 1),
        (0, 1, 1),
        (1, 1, 1),
    ];

    fn determinant(m: &RotationMatrix) -> i32 {
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    #[test]
    fn test_exactly_24_distinct_rotations() {
        let table = all_rotations();
        assert_eq!(table.len(), NUM_ROTATIONS);

        let distinct: FxHashSet<RotationMatrix> = table.iter().copied().collect();
        assert_eq!(distinct.len(), NUM_ROTATIONS);
    }

    #[test]
    fn test_rotations_are_proper_signed_permutations() {
        for matrix in all_rotations() {
            assert_eq!(determinant(matrix), 1, "improper rotation {matrix:?}");
            for i in 0..3 {
                let row_nonzero = (0..3).filter(|&j| matrix[i][j] != 0).count();
                let col_nonzero = (0..3).filter(|&j| matrix[j][i] != 0).count();
                assert_eq!(row_nonzero, 1);
                assert_eq!(col_nonzero, 1);
                assert!(matrix[i].iter().all(|&v| (-1..=1).contains(&v)));
            }
        }
    }

    #[test]
    fn test_rotation_group_is_closed() {
        let table = all_rotations();
        let set: FxHashSet<RotationMatrix> = table.iter().copied().collect();
        for a in table {
            for b in table {
                assert!(set.contains(&multiply(a, b)), "product left the group");
            }
        }
    }

    #[test]
    fn test_first_rotation_is_identity() {
        assert_eq!(all_rotations()[0], IDENTITY);
        assert_eq!(rotate_piece(LINE_3.blocks, 0), LINE_3.blocks.to_vec());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for piece in crate::pieces::CATALOG {
            let offset: Vec<Coord> = piece
                .blocks
                .iter()
                .map(|&(x, y, z)| (x + 3, y - 2, z + 7))
                .collect();
            let once = normalize_to_origin(offset);
            let twice = normalize_to_origin(once.clone());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_normalization_is_order_independent() {
        let forward = normalize_to_origin(L_SHAPE.blocks.to_vec());
        let mut reversed = L_SHAPE.blocks.to_vec();
        reversed.reverse();
        assert_eq!(forward, normalize_to_origin(reversed));
    }

    #[test]
    fn test_rotation_round_trip_via_inverse() {
        let table = all_rotations();
        let original = normalize_to_origin(L_SHAPE.blocks.to_vec());

        for (i, matrix) in table.iter().enumerate() {
            // find the inverse by search; the group is closed so it exists
            let inverse = table
                .iter()
                .position(|candidate| multiply(candidate, matrix) == IDENTITY)
                .expect("every rotation has an inverse in the group");

            let rotated = rotate_piece(L_SHAPE.blocks, i);
            let restored = rotate_piece(&rotated, inverse);
            assert_eq!(restored, original, "round trip failed for rotation {i}");
        }
    }

    #[test]
    fn test_unique_rotations_of_symmetric_pieces() {
        // a full cube looks the same under every rotation
        assert_eq!(unique_rotations(CUBE_2X2X2).len(), 1);
        // a straight line only distinguishes its axis
        assert_eq!(unique_rotations(LINE_3.blocks).len(), 3);
        // a flat 2x2 square only distinguishes its plane
        assert_eq!(unique_rotations(TOWER.blocks).len(), 3);
        // an L-tromino has a single diagonal flip symmetry
        assert_eq!(unique_rotations(CORNER_3D.blocks).len(), 12);
    }

    #[test]
    fn test_unique_rotations_of_asymmetric_piece() {
        // the flat L-tetromino has no rotational symmetry in 3D
        assert_eq!(unique_rotations(L_SHAPE.blocks).len(), 24);
    }

    #[test]
    fn test_unique_rotation_indices_map_to_distinct_shapes() {
        let indices = unique_rotations(CORNER_3D.blocks);
        let shapes: FxHashSet<Vec<Coord>> = indices
            .iter()
            .map(|&i| rotate_piece(CORNER_3D.blocks, i))
            .collect();
        assert_eq!(shapes.len(), indices.len());
    }

    #[test]
    fn test_canonical_form_is_rotation_invariant() {
        let reference = canonical_form(L_SHAPE.blocks);
        for rotation_index in 0..NUM_ROTATIONS {
            let rotated = rotate_piece(L_SHAPE.blocks, rotation_index);
            assert_eq!(canonical_form(&rotated), reference);
        }
    }

    #[test]
    fn test_out_of_range_rotation_returns_input_unchanged() {
        let blocks = vec![(2, 3, 4), (3, 3, 4)];
        assert_eq!(rotate_piece(&blocks, NUM_ROTATIONS + 5), blocks);
    }

    #[test]
    fn test_axis_rotations_match_generators() {
        assert_eq!(
            rotate_x90(LINE_3.blocks),
            rotate_piece(LINE_3.blocks, rotation_index_of(&ROT_X_90))
        );
        // a line along x is fixed by rotation around x
        assert_eq!(rotate_x90(LINE_3.blocks), LINE_3.blocks.to_vec());
        // rotating around y or z moves it onto another axis
        assert_ne!(rotate_y90(LINE_3.blocks), LINE_3.blocks.to_vec());
        assert_ne!(rotate_z90(LINE_3.blocks), LINE_3.blocks.to_vec());
    }
}
