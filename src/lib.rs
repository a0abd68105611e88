//! Polycube Packing Puzzle Engine
//!
//! Generates and verifies solvable two-layer polycube packing puzzles: a
//! generator selects pieces from a fixed catalog, builds a matching target
//! footprint, and proves via backtracking search that the pieces tile it
//! exactly. A validator provides the placement and win-check rules for
//! interactive callers. The engine renders nothing and owns no game state;
//! it hands a [`generate::LevelDescriptor`] to the board layer and answers
//! its validation queries.

pub mod generate;
pub mod geometry;
pub mod grid;
pub mod pieces;
pub mod solver;
pub mod target;
pub mod validate;

pub use generate::{DifficultyLevel, DifficultyProfile, GenerationOutcome, Generator, LevelDescriptor};
pub use grid::OccupancyGrid;
pub use pieces::{PieceDefinition, PlacedPiece};
pub use target::{FillState, TargetArea};
pub use validate::{PlacementValidity, ValidationResult};
