//! Target area model: the footprint that must be filled two layers high.
//!
//! A target area is a duplicate-free set of (x, z) columns plus cached
//! bounding dimensions. Every column must be filled at y = 0 and y = 1 and
//! nothing may sit above. Areas are built once per level (rectangle, L, T,
//! or an explicit mask) and are immutable for the lifetime of a round.

use rustc_hash::FxHashSet;

use crate::pieces::Coord;

/// Every target column must be filled to exactly this many layers.
pub const REQUIRED_HEIGHT: usize = 2;

/// The footprint to fill, with cached bounding box dimensions.
#[derive(Clone, Debug, Default)]
pub struct TargetArea {
    footprint: FxHashSet<(i32, i32)>,
    width: usize,
    depth: usize,
}

impl TargetArea {
    /// Creates an empty target area.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a rectangular target area with columns in `0..width` x `0..depth`.
    pub fn rectangular(width: usize, depth: usize) -> Self {
        let mut area = Self::new();
        for x in 0..width as i32 {
            for z in 0..depth as i32 {
                area.footprint.insert((x, z));
            }
        }
        area.recalculate_bounds();
        area
    }

    /// Creates an L-shaped area: a `width` x `depth` rectangle with a
    /// `cut_width` x `cut_depth` corner rectangle removed.
    pub fn l_shaped(width: usize, depth: usize, cut_width: usize, cut_depth: usize) -> Self {
        let cut_from_x = width.saturating_sub(cut_width) as i32;
        let cut_from_z = depth.saturating_sub(cut_depth) as i32;

        let mut area = Self::new();
        for x in 0..width as i32 {
            for z in 0..depth as i32 {
                if x >= cut_from_x && z >= cut_from_z {
                    continue;
                }
                area.footprint.insert((x, z));
            }
        }
        area.recalculate_bounds();
        area
    }

    /// Creates a T-shaped area: a `top_width` x `top_depth` bar with a
    /// centered `stem_width` x `stem_depth` stem attached behind it.
    pub fn t_shaped(
        top_width: usize,
        top_depth: usize,
        stem_width: usize,
        stem_depth: usize,
    ) -> Self {
        let stem_offset = (top_width.saturating_sub(stem_width) / 2) as i32;

        let mut area = Self::new();
        for x in 0..top_width as i32 {
            for z in 0..top_depth as i32 {
                area.footprint.insert((x, z));
            }
        }
        for x in stem_offset..stem_offset + stem_width as i32 {
            for z in top_depth as i32..(top_depth + stem_depth) as i32 {
                area.footprint.insert((x, z));
            }
        }
        area.recalculate_bounds();
        area
    }

    /// Creates a target area from explicit column positions (duplicates are
    /// collapsed).
    pub fn from_columns(columns: impl IntoIterator<Item = (i32, i32)>) -> Self {
        let mut area = Self {
            footprint: columns.into_iter().collect(),
            width: 0,
            depth: 0,
        };
        area.recalculate_bounds();
        area
    }

    /// Creates a target area from a boolean mask indexed as `mask[x][z]`.
    pub fn from_mask(mask: &[&[bool]]) -> Self {
        let mut area = Self::new();
        for (x, row) in mask.iter().enumerate() {
            for (z, &included) in row.iter().enumerate() {
                if included {
                    area.footprint.insert((x as i32, z as i32));
                }
            }
        }
        area.recalculate_bounds();
        area
    }

    fn recalculate_bounds(&mut self) {
        if self.footprint.is_empty() {
            self.width = 0;
            self.depth = 0;
            return;
        }

        let mut min_x = i32::MAX;
        let mut max_x = i32::MIN;
        let mut min_z = i32::MAX;
        let mut max_z = i32::MIN;
        for &(x, z) in &self.footprint {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_z = min_z.min(z);
            max_z = max_z.max(z);
        }

        self.width = (max_x - min_x + 1) as usize;
        self.depth = (max_z - min_z + 1) as usize;
    }

    /// Number of columns in the footprint.
    #[inline]
    pub fn footprint_size(&self) -> usize {
        self.footprint.len()
    }

    /// Total cells to fill: every column times the required height.
    #[inline]
    pub fn total_cells(&self) -> usize {
        self.footprint_size() * REQUIRED_HEIGHT
    }

    /// Width of the footprint bounding box.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Depth of the footprint bounding box.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Column membership test.
    #[inline]
    pub fn contains(&self, x: i32, z: i32) -> bool {
        self.footprint.contains(&(x, z))
    }

    /// Cell membership test: column membership plus `0 <= y < 2`.
    #[inline]
    pub fn contains_cell(&self, x: i32, y: i32, z: i32) -> bool {
        y >= 0 && (y as usize) < REQUIRED_HEIGHT && self.contains(x, z)
    }

    /// All column (x, z) positions. Order is stable within one call only.
    pub fn column_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.footprint.iter().copied()
    }

    /// All 3D cells to fill, both layers of every column.
    pub fn all_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.footprint
            .iter()
            .flat_map(|&(x, z)| (0..REQUIRED_HEIGHT as i32).map(move |y| (x, y, z)))
    }

    /// Cells of one layer; an out-of-range layer yields nothing.
    pub fn layer_cells(&self, layer: usize) -> impl Iterator<Item = Coord> + '_ {
        self.footprint
            .iter()
            .filter(move |_| layer < REQUIRED_HEIGHT)
            .map(move |&(x, z)| (x, layer as i32, z))
    }

    /// Adds a column and recomputes bounds. Construction-time only.
    pub fn add_column(&mut self, x: i32, z: i32) {
        self.footprint.insert((x, z));
        self.recalculate_bounds();
    }

    /// Removes a column and recomputes bounds; returns whether it existed.
    pub fn remove_column(&mut self, x: i32, z: i32) -> bool {
        let removed = self.footprint.remove(&(x, z));
        if removed {
            self.recalculate_bounds();
        }
        removed
    }

    /// Removes every column.
    pub fn clear(&mut self) {
        self.footprint.clear();
        self.width = 0;
        self.depth = 0;
    }

    /// Renders the footprint as text, one row per z, `#` for a column.
    pub fn format_footprint(&self) -> String {
        if self.footprint.is_empty() {
            return String::new();
        }

        let min_x = self.footprint.iter().map(|&(x, _)| x).min().unwrap_or(0);
        let min_z = self.footprint.iter().map(|&(_, z)| z).min().unwrap_or(0);

        let mut output = String::new();
        for z in min_z..min_z + self.depth as i32 {
            for x in min_x..min_x + self.width as i32 {
                output.push(if self.contains(x, z) { '#' } else { '.' });
            }
            output.push('\n');
        }
        output
    }
}

/// Derived fill progress of a target area; computed, never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillState {
    pub layer0_filled: usize,
    pub layer1_filled: usize,
    pub total_target_cells: usize,
    pub layer0_progress: f32,
    pub layer1_progress: f32,
    pub total_progress: f32,
    pub is_complete: bool,
}

impl FillState {
    /// Builds a fill state from per-layer filled counts and the target's
    /// total cell count.
    pub fn new(layer0_filled: usize, layer1_filled: usize, total_target_cells: usize) -> Self {
        let per_layer = total_target_cells / REQUIRED_HEIGHT;
        let fraction = |filled: usize, out_of: usize| {
            if out_of > 0 {
                filled as f32 / out_of as f32
            } else {
                0.0
            }
        };

        Self {
            layer0_filled,
            layer1_filled,
            total_target_cells,
            layer0_progress: fraction(layer0_filled, per_layer),
            layer1_progress: fraction(layer1_filled, per_layer),
            total_progress: fraction(layer0_filled + layer1_filled, total_target_cells),
            is_complete: per_layer > 0
                && layer0_filled == per_layer
                && layer1_filled == per_layer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_cells_is_twice_footprint() {
        let areas = [
            TargetArea::rectangular(3, 2),
            TargetArea::l_shaped(4, 3, 2, 1),
            TargetArea::t_shaped(3, 2, 1, 3),
            TargetArea::from_columns([(0, 0), (5, 5), (-2, 1)]),
        ];
        for area in &areas {
            assert_eq!(area.total_cells(), area.footprint_size() * 2);
        }
    }

    #[test]
    fn test_rectangular_area() {
        let area = TargetArea::rectangular(4, 3);
        assert_eq!(area.footprint_size(), 12);
        assert_eq!((area.width(), area.depth()), (4, 3));
        assert!(area.contains(0, 0));
        assert!(area.contains(3, 2));
        assert!(!area.contains(4, 0));
        assert!(!area.contains(0, 3));
    }

    #[test]
    fn test_l_shaped_cuts_the_far_corner() {
        let area = TargetArea::l_shaped(3, 3, 1, 1);
        assert_eq!(area.footprint_size(), 8);
        assert!(!area.contains(2, 2));
        assert!(area.contains(2, 1));
        assert!(area.contains(1, 2));
        assert_eq!((area.width(), area.depth()), (3, 3));
    }

    #[test]
    fn test_t_shaped_bar_plus_centered_stem() {
        let area = TargetArea::t_shaped(3, 2, 1, 3);
        // 3x2 bar and a 1x3 stem behind the middle column
        assert_eq!(area.footprint_size(), 9);
        assert!(area.contains(1, 4));
        assert!(!area.contains(0, 2));
        assert!(!area.contains(2, 2));
        assert_eq!((area.width(), area.depth()), (3, 5));
    }

    #[test]
    fn test_from_columns_collapses_duplicates() {
        let area = TargetArea::from_columns([(0, 0), (1, 0), (0, 0)]);
        assert_eq!(area.footprint_size(), 2);
        assert_eq!((area.width(), area.depth()), (2, 1));
    }

    #[test]
    fn test_from_mask() {
        let mask: &[&[bool]] = &[&[true, false], &[true, true]];
        let area = TargetArea::from_mask(mask);
        assert_eq!(area.footprint_size(), 3);
        assert!(area.contains(0, 0));
        assert!(!area.contains(0, 1));
        assert!(area.contains(1, 1));
    }

    #[test]
    fn test_contains_cell_enforces_height() {
        let area = TargetArea::rectangular(2, 2);
        assert!(area.contains_cell(0, 0, 0));
        assert!(area.contains_cell(0, 1, 0));
        assert!(!area.contains_cell(0, 2, 0));
        assert!(!area.contains_cell(0, -1, 0));
        assert!(!area.contains_cell(2, 0, 0));
    }

    #[test]
    fn test_cell_enumerations() {
        let area = TargetArea::rectangular(2, 2);
        assert_eq!(area.all_cells().count(), 8);
        assert_eq!(area.layer_cells(0).count(), 4);
        assert_eq!(area.layer_cells(1).count(), 4);
        assert_eq!(area.layer_cells(2).count(), 0);
        assert!(area.all_cells().all(|(x, y, z)| area.contains_cell(x, y, z)));
    }

    #[test]
    fn test_mutators_recompute_bounds() {
        let mut area = TargetArea::new();
        assert_eq!((area.width(), area.depth()), (0, 0));

        area.add_column(2, 3);
        assert_eq!((area.width(), area.depth()), (1, 1));
        area.add_column(5, 3);
        assert_eq!((area.width(), area.depth()), (4, 1));

        assert!(area.remove_column(5, 3));
        assert!(!area.remove_column(5, 3));
        assert_eq!((area.width(), area.depth()), (1, 1));

        area.clear();
        assert_eq!(area.footprint_size(), 0);
        assert_eq!((area.width(), area.depth()), (0, 0));
    }

    #[test]
    fn test_fill_state_math() {
        let state = FillState::new(3, 1, 12);
        assert_eq!(state.layer0_progress, 0.5);
        assert!((state.layer1_progress - 1.0 / 6.0).abs() < 1e-6);
        assert!((state.total_progress - 4.0 / 12.0).abs() < 1e-6);
        assert!(!state.is_complete);

        let complete = FillState::new(6, 6, 12);
        assert!(complete.is_complete);
        assert_eq!(complete.total_progress, 1.0);

        // an empty target never reports complete
        assert!(!FillState::new(0, 0, 0).is_complete);
    }

    #[test]
    fn test_format_footprint_snapshots() {
        insta::assert_snapshot!(TargetArea::rectangular(3, 2).format_footprint(), @r"
        ###
        ###
        ");
        insta::assert_snapshot!(TargetArea::l_shaped(3, 3, 1, 1).format_footprint(), @r"
        ###
        ###
        ##.
        ");
        insta::assert_snapshot!(TargetArea::t_shaped(3, 1, 1, 2).format_footprint(), @r"
        ###
        .#.
        .#.
        ");
    }
}
