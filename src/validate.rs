//! Placement and solution validation.
//!
//! Pure functions over (piece blocks, position, grid, target area). Nothing
//! here panics or throws; every outcome is returned as data, either a single
//! [`PlacementValidity`] tag or an accumulated [`ValidationResult`], for the
//! caller to react to.

use crate::grid::OccupancyGrid;
use crate::pieces::Coord;
use crate::target::{FillState, TargetArea, REQUIRED_HEIGHT};

/// Outcome of a single placement check: the first failing reason, or valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementValidity {
    Valid,
    OutOfBounds,
    HeightExceeded,
    OutsideTarget,
    Collision,
}

/// Kinds of errors recorded while validating a full or partial solution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    IncompleteFill,
    ExceedsHeight,
    OutOfBounds,
    Collision,
}

/// A validation error at a specific cell.
#[derive(Clone, Debug)]
pub struct ValidationIssue {
    pub kind: ValidationError,
    pub position: Coord,
    pub message: String,
}

/// Accumulated validation errors; valid (or solved) iff empty.
#[derive(Clone, Debug, Default)]
pub struct ValidationResult {
    issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no errors were recorded.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// True when the puzzle state passed as a complete solution.
    #[inline]
    pub fn is_solved(&self) -> bool {
        self.is_valid()
    }

    pub fn error_count(&self) -> usize {
        self.issues.len()
    }

    pub fn add_issue(&mut self, kind: ValidationError, position: Coord, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            kind,
            position,
            message: message.into(),
        });
    }

    pub fn has_error(&self, kind: ValidationError) -> bool {
        self.issues.iter().any(|issue| issue.kind == kind)
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn issues_of_kind(&self, kind: ValidationError) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |issue| issue.kind == kind)
    }

    pub fn clear(&mut self) {
        self.issues.clear();
    }
}

/// Checks whether a piece can be placed with its local origin at `position`.
///
/// Every block must be inside the grid, below the height limit, inside the
/// target footprint, and unoccupied. Short-circuits on the first violation.
/// An empty target area rejects everything.
pub fn can_place_piece(
    blocks: &[Coord],
    position: Coord,
    grid: &OccupancyGrid,
    area: &TargetArea,
) -> bool {
    validate_placement(blocks, position, grid, area) == PlacementValidity::Valid
}

/// Like [`can_place_piece`], but reports the first failing reason.
pub fn validate_placement(
    blocks: &[Coord],
    position: Coord,
    grid: &OccupancyGrid,
    area: &TargetArea,
) -> PlacementValidity {
    for &(bx, by, bz) in blocks {
        let (x, y, z) = (position.0 + bx, position.1 + by, position.2 + bz);

        if !grid.in_bounds(x, y, z) {
            return PlacementValidity::OutOfBounds;
        }
        if y as usize >= REQUIRED_HEIGHT {
            return PlacementValidity::HeightExceeded;
        }
        if !area.contains(x, z) {
            return PlacementValidity::OutsideTarget;
        }
        if grid.is_occupied(x, y, z) {
            return PlacementValidity::Collision;
        }
    }
    PlacementValidity::Valid
}

/// Validates a proposed placement given world block positions, recording
/// every violating block rather than stopping at the first.
///
/// Used by interactive collaborators to highlight each offending cell.
pub fn validate_placement_report(
    world_blocks: &[Coord],
    grid: &OccupancyGrid,
    area: &TargetArea,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    for &(x, y, z) in world_blocks {
        if !grid.in_bounds(x, y, z) {
            result.add_issue(
                ValidationError::OutOfBounds,
                (x, y, z),
                format!("block at ({x}, {y}, {z}) is outside grid bounds"),
            );
            continue;
        }
        if y as usize >= REQUIRED_HEIGHT {
            result.add_issue(
                ValidationError::ExceedsHeight,
                (x, y, z),
                format!("block at ({x}, {y}, {z}) exceeds height limit of {REQUIRED_HEIGHT}"),
            );
        }
        if !area.contains(x, z) {
            result.add_issue(
                ValidationError::OutOfBounds,
                (x, y, z),
                format!("block at ({x}, {y}, {z}) is outside the target area"),
            );
        }
        if grid.is_occupied(x, y, z) {
            result.add_issue(
                ValidationError::Collision,
                (x, y, z),
                format!("block at ({x}, {y}, {z}) collides with an existing block"),
            );
        }
    }

    result
}

/// Validates a complete solution: every target column filled at y = 0 and
/// y = 1, and nothing above.
///
/// An empty target area is an always-invalid configuration and reports an
/// error rather than passing vacuously.
pub fn validate_solution(grid: &OccupancyGrid, area: &TargetArea) -> ValidationResult {
    let mut result = ValidationResult::new();

    if area.footprint_size() == 0 {
        result.add_issue(
            ValidationError::OutOfBounds,
            (0, 0, 0),
            "no target area defined",
        );
        return result;
    }

    for (x, z) in area.column_positions() {
        if x < 0 || x as usize >= grid.width() || z < 0 || z as usize >= grid.depth() {
            result.add_issue(
                ValidationError::OutOfBounds,
                (x, 0, z),
                format!("target column ({x}, {z}) is outside the grid"),
            );
            continue;
        }

        for y in 0..REQUIRED_HEIGHT as i32 {
            if !grid.is_occupied(x, y, z) {
                result.add_issue(
                    ValidationError::IncompleteFill,
                    (x, y, z),
                    format!("layer {y} at ({x}, {z}) is not filled"),
                );
            }
        }

        for y in REQUIRED_HEIGHT as i32..grid.height() as i32 {
            if grid.is_occupied(x, y, z) {
                result.add_issue(
                    ValidationError::ExceedsHeight,
                    (x, y, z),
                    format!("block at ({x}, {y}, {z}) exceeds maximum height of {REQUIRED_HEIGHT}"),
                );
            }
        }
    }

    result
}

/// True when both layers of every target column are occupied.
pub fn is_area_completely_filled(grid: &OccupancyGrid, area: &TargetArea) -> bool {
    if area.footprint_size() == 0 {
        return false;
    }
    area.all_cells().all(|(x, y, z)| grid.is_occupied(x, y, z))
}

/// Computes per-layer filled counts and progress for the target area.
pub fn calculate_fill_state(grid: &OccupancyGrid, area: &TargetArea) -> FillState {
    let mut layer0_filled = 0;
    let mut layer1_filled = 0;

    for (x, z) in area.column_positions() {
        if grid.is_occupied(x, 0, z) {
            layer0_filled += 1;
        }
        if grid.is_occupied(x, 1, z) {
            layer1_filled += 1;
        }
    }

    FillState::new(layer0_filled, layer1_filled, area.total_cells())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{CATALOG, LINE_3};

    fn filled_board(area: &TargetArea) -> OccupancyGrid {
        let mut grid = OccupancyGrid::new(area.width(), REQUIRED_HEIGHT, area.depth());
        for (x, y, z) in area.all_cells() {
            grid.set(x, y, z, true);
        }
        grid
    }

    #[test]
    fn test_valid_placement() {
        let area = TargetArea::rectangular(3, 2);
        let grid = OccupancyGrid::new(3, 2, 2);
        assert_eq!(
            validate_placement(LINE_3.blocks, (0, 0, 0), &grid, &area),
            PlacementValidity::Valid
        );
        assert!(can_place_piece(LINE_3.blocks, (0, 0, 1), &grid, &area));
    }

    #[test]
    fn test_block_at_layer_two_is_height_exceeded() {
        let area = TargetArea::rectangular(3, 2);
        // grid tall enough that bounds pass and the height rule triggers
        let grid = OccupancyGrid::new(3, 3, 2);
        assert_eq!(
            validate_placement(LINE_3.blocks, (0, 2, 0), &grid, &area),
            PlacementValidity::HeightExceeded
        );
    }

    #[test]
    fn test_column_outside_footprint_is_outside_target() {
        let area = TargetArea::l_shaped(3, 3, 1, 1);
        let grid = OccupancyGrid::new(3, 2, 3);
        // anchored so one block lands on the cut corner (2, 2)
        assert_eq!(
            validate_placement(LINE_3.blocks, (0, 0, 2), &grid, &area),
            PlacementValidity::OutsideTarget
        );
    }

    #[test]
    fn test_overlap_is_collision() {
        let area = TargetArea::rectangular(3, 2);
        let mut grid = OccupancyGrid::new(3, 2, 2);
        grid.set(1, 0, 0, true);
        assert_eq!(
            validate_placement(LINE_3.blocks, (0, 0, 0), &grid, &area),
            PlacementValidity::Collision
        );
    }

    #[test]
    fn test_leaving_the_grid_is_out_of_bounds() {
        let area = TargetArea::rectangular(3, 2);
        let grid = OccupancyGrid::new(3, 2, 2);
        assert_eq!(
            validate_placement(LINE_3.blocks, (1, 0, 0), &grid, &area),
            PlacementValidity::OutOfBounds
        );
        assert_eq!(
            validate_placement(LINE_3.blocks, (0, -1, 0), &grid, &area),
            PlacementValidity::OutOfBounds
        );
    }

    #[test]
    fn test_can_place_agrees_with_validate_placement() {
        let area = TargetArea::l_shaped(4, 3, 2, 1);
        let mut grid = OccupancyGrid::new(4, 2, 3);
        grid.set(0, 0, 0, true);
        grid.set(2, 1, 1, true);

        for piece in CATALOG {
            for x in -2..6 {
                for y in -1..3 {
                    for z in -2..5 {
                        let validity = validate_placement(piece.blocks, (x, y, z), &grid, &area);
                        assert_eq!(
                            can_place_piece(piece.blocks, (x, y, z), &grid, &area),
                            validity == PlacementValidity::Valid,
                            "disagreement for {} at ({x}, {y}, {z})",
                            piece.name
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_placement_report_accumulates_all_blocks() {
        let area = TargetArea::rectangular(2, 2);
        let grid = OccupancyGrid::new(2, 2, 2);
        // both blocks outside the footprint
        let result = validate_placement_report(&[(0, 0, 5), (1, 0, 5)], &grid, &area);
        assert!(!result.is_valid());
        assert_eq!(result.error_count(), 2);
        assert!(result.has_error(ValidationError::OutOfBounds));
    }

    #[test]
    fn test_validate_solution_full_then_one_missing() {
        let area = TargetArea::rectangular(3, 2);
        let mut grid = filled_board(&area);

        let solved = validate_solution(&grid, &area);
        assert!(solved.is_solved());
        assert_eq!(solved.error_count(), 0);

        // removing one block from layer 1 reintroduces exactly one error
        grid.set(2, 1, 1, false);
        let broken = validate_solution(&grid, &area);
        assert!(!broken.is_solved());
        assert_eq!(broken.error_count(), 1);
        let issue = &broken.issues()[0];
        assert_eq!(issue.kind, ValidationError::IncompleteFill);
        assert_eq!(issue.position, (2, 1, 1));
    }

    #[test]
    fn test_validate_solution_flags_blocks_above_layer_two() {
        let area = TargetArea::rectangular(2, 1);
        let mut grid = OccupancyGrid::new(2, 3, 1);
        for (x, y, z) in area.all_cells() {
            grid.set(x, y, z, true);
        }
        grid.set(0, 2, 0, true);

        let result = validate_solution(&grid, &area);
        assert!(!result.is_solved());
        assert!(result.has_error(ValidationError::ExceedsHeight));
        assert_eq!(result.issues_of_kind(ValidationError::ExceedsHeight).count(), 1);
    }

    #[test]
    fn test_empty_target_never_validates() {
        let area = TargetArea::new();
        let grid = OccupancyGrid::new(2, 2, 2);

        assert!(!validate_solution(&grid, &area).is_solved());
        assert!(!is_area_completely_filled(&grid, &area));
        assert!(!can_place_piece(LINE_3.blocks, (0, 0, 0), &grid, &area));
    }

    #[test]
    fn test_fill_state_over_partial_board() {
        let area = TargetArea::rectangular(2, 2);
        let mut grid = OccupancyGrid::new(2, 2, 2);
        grid.set(0, 0, 0, true);
        grid.set(1, 0, 0, true);
        grid.set(0, 1, 0, true);

        let state = calculate_fill_state(&grid, &area);
        assert_eq!(state.layer0_filled, 2);
        assert_eq!(state.layer1_filled, 1);
        assert_eq!(state.total_target_cells, 8);
        assert!(!state.is_complete);

        let complete = calculate_fill_state(&filled_board(&area), &area);
        assert!(complete.is_complete);
    }

    #[test]
    fn test_completely_filled_matches_validate_solution() {
        let area = TargetArea::t_shaped(3, 1, 1, 2);
        let grid = filled_board(&area);
        assert!(is_area_completely_filled(&grid, &area));
        assert!(validate_solution(&grid, &area).is_solved());
    }
}
