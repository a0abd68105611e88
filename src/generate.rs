//! Level generation: difficulty profiles, piece selection, footprint
//! construction, and the bounded retry loop that proves solvability.
//!
//! A generation attempt walks `select pieces -> size footprint -> build
//! target area -> exact-cell gate -> solve`. Attempts that miss any gate are
//! abandoned and retried with a fresh random selection, up to a bounded
//! attempt count. The outcome is explicit: either a verified level or an
//! exhaustion report carrying the last unverified attempt.

use std::time::Duration;

use rand::prelude::*;
use tracing::{debug, info, warn};

use crate::pieces::PieceDefinition;
use crate::solver;
use crate::target::{TargetArea, REQUIRED_HEIGHT};

/// Default cap on generation attempts per level request.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// The four difficulty tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl DifficultyLevel {
    /// Maps a 1-based round number onto the difficulty progression.
    pub fn for_round(round: u32) -> Self {
        match round {
            0..=2 => Self::Easy,
            3..=5 => Self::Medium,
            6..=8 => Self::Hard,
            _ => Self::Expert,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Expert => "Expert",
        }
    }

    /// Whether this tier may use L- and T-shaped footprints.
    fn uses_shaped_footprints(self) -> bool {
        matches!(self, Self::Hard | Self::Expert)
    }
}

/// Fixed parameters for one difficulty tier.
///
/// `solution_range` is advisory tuning data only; the engine confirms that
/// at least one solution exists and never counts them.
#[derive(Clone, Copy, Debug)]
pub struct DifficultyProfile {
    pub level: DifficultyLevel,
    pub min_pieces: usize,
    pub max_pieces: usize,
    /// Total block count to select; always even so the two-layer footprint
    /// is an integer number of columns.
    pub target_blocks: usize,
    pub time_limit: Duration,
    pub solution_range: (u32, u32),
}

impl DifficultyProfile {
    /// Returns the fixed profile for a tier.
    pub fn for_level(level: DifficultyLevel) -> Self {
        match level {
            DifficultyLevel::Easy => Self {
                level,
                min_pieces: 3,
                max_pieces: 4,
                target_blocks: 12,
                time_limit: Duration::from_secs(90),
                solution_range: (2, 4),
            },
            DifficultyLevel::Medium => Self {
                level,
                min_pieces: 4,
                max_pieces: 5,
                target_blocks: 16,
                time_limit: Duration::from_secs(75),
                solution_range: (2, 3),
            },
            DifficultyLevel::Hard => Self {
                level,
                min_pieces: 5,
                max_pieces: 6,
                target_blocks: 18,
                time_limit: Duration::from_secs(60),
                solution_range: (1, 2),
            },
            DifficultyLevel::Expert => Self {
                level,
                min_pieces: 6,
                max_pieces: 7,
                target_blocks: 22,
                time_limit: Duration::from_secs(45),
                solution_range: (1, 1),
            },
        }
    }
}

/// A complete, playable puzzle instance.
#[derive(Clone, Debug)]
pub struct LevelDescriptor {
    pub round: u32,
    pub difficulty: DifficultyLevel,
    pub time_limit: Duration,
    pub pieces: Vec<PieceDefinition>,
    /// Bounding board dimensions: footprint width x 2 x footprint depth.
    pub board_size: (usize, usize, usize),
    pub target_area: TargetArea,
}

/// Result of a generation request.
#[derive(Clone, Debug)]
pub enum GenerationOutcome {
    /// A level whose solvability was proven by the solver.
    Solved(LevelDescriptor),
    /// No attempt within the budget was proven solvable. The last attempted
    /// configuration (unverified) is kept for callers that want the
    /// best-effort behavior; `None` when no attempt got as far as a
    /// descriptor.
    ExhaustedRetries { last_attempt: Option<LevelDescriptor> },
}

impl GenerationOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Solved(_))
    }

    /// The verified descriptor, if generation succeeded.
    pub fn descriptor(&self) -> Option<&LevelDescriptor> {
        match self {
            Self::Solved(descriptor) => Some(descriptor),
            Self::ExhaustedRetries { .. } => None,
        }
    }

    /// Any descriptor, verified or not.
    pub fn into_descriptor(self) -> Option<LevelDescriptor> {
        match self {
            Self::Solved(descriptor) => Some(descriptor),
            Self::ExhaustedRetries { last_attempt } => last_attempt,
        }
    }
}

/// Puzzle generator over a borrowed piece catalog.
#[derive(Clone, Copy, Debug)]
pub struct Generator<'a> {
    catalog: &'a [PieceDefinition],
    max_attempts: usize,
}

impl<'a> Generator<'a> {
    /// Creates a generator drawing from `catalog` with the default attempt
    /// budget.
    pub fn new(catalog: &'a [PieceDefinition]) -> Self {
        Self {
            catalog,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the attempt budget (minimum 1).
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Generates a level for a round, deriving the difficulty tier from the
    /// round number.
    pub fn generate_level(&self, round: u32, rng: &mut impl Rng) -> GenerationOutcome {
        self.generate_solvable_puzzle(DifficultyLevel::for_round(round), round, rng)
    }

    /// Generates a level at an explicit difficulty.
    pub fn generate_solvable_puzzle(
        &self,
        difficulty: DifficultyLevel,
        round: u32,
        rng: &mut impl Rng,
    ) -> GenerationOutcome {
        let profile = DifficultyProfile::for_level(difficulty);
        let mut last_attempt = None;

        for attempt in 1..=self.max_attempts {
            let Some(pieces) = self.select_pieces(&profile, rng) else {
                debug!(attempt, "piece selection missed the block target");
                continue;
            };

            let total_blocks: usize = pieces.iter().map(|piece| piece.block_count()).sum();
            let columns = total_blocks / REQUIRED_HEIGHT;
            let Some(target_area) = build_target_area(difficulty, columns, rng) else {
                debug!(attempt, columns, "no footprint shape matched the column count");
                continue;
            };

            // exact-match gate: partial puzzles are never emitted
            if target_area.total_cells() != total_blocks {
                debug!(attempt, "footprint cell count mismatch");
                continue;
            }

            let descriptor = LevelDescriptor {
                round,
                difficulty,
                time_limit: profile.time_limit,
                board_size: (target_area.width(), REQUIRED_HEIGHT, target_area.depth()),
                pieces,
                target_area,
            };

            if solver::is_solvable(&descriptor.pieces, &descriptor.target_area) {
                info!(attempt, ?difficulty, round, "generated solvable level");
                return GenerationOutcome::Solved(descriptor);
            }

            debug!(attempt, "configuration not solvable, retrying");
            last_attempt = Some(descriptor);
        }

        warn!(
            ?difficulty,
            attempts = self.max_attempts,
            "generation budget exhausted without a proven-solvable level"
        );
        GenerationOutcome::ExhaustedRetries { last_attempt }
    }

    /// Randomly selects pieces summing exactly to the profile's block
    /// target.
    ///
    /// Greedy pass: draw random catalog pieces (the same shape may be drawn
    /// more than once) and keep every draw that still fits under the target
    /// and the piece-count cap. Second pass: top up with any catalog piece
    /// whose block count lands exactly on the target. A selection that
    /// misses the exact target or the piece-count range is discarded.
    fn select_pieces(
        &self,
        profile: &DifficultyProfile,
        rng: &mut impl Rng,
    ) -> Option<Vec<PieceDefinition>> {
        // bounded draw count so an unlucky streak cannot spin forever
        const MAX_DRAWS: usize = 32;

        let mut selected = Vec::with_capacity(profile.max_pieces);
        let mut total = 0;

        for _ in 0..MAX_DRAWS {
            if total == profile.target_blocks || selected.len() == profile.max_pieces {
                break;
            }
            let piece = self.catalog[rng.gen_range(0..self.catalog.len())];
            if total + piece.block_count() <= profile.target_blocks {
                total += piece.block_count();
                selected.push(piece);
            }
        }

        if total < profile.target_blocks && selected.len() < profile.max_pieces {
            if let Some(piece) = self
                .catalog
                .iter()
                .find(|piece| total + piece.block_count() == profile.target_blocks)
            {
                total += piece.block_count();
                selected.push(*piece);
            }
        }

        (total == profile.target_blocks
            && selected.len() >= profile.min_pieces
            && selected.len() <= profile.max_pieces)
            .then_some(selected)
    }
}

/// Builds a footprint with exactly `columns` columns for the given tier.
///
/// Easy and Medium always use a clean rectangle. Hard and Expert pick
/// randomly among rectangle, L, and T, falling back to a rectangle when the
/// chosen shape cannot hit the exact column count.
fn build_target_area(
    difficulty: DifficultyLevel,
    columns: usize,
    rng: &mut impl Rng,
) -> Option<TargetArea> {
    if columns == 0 {
        return None;
    }
    if !difficulty.uses_shaped_footprints() {
        return rectangular_footprint(columns);
    }

    let shaped = match rng.gen_range(0..3) {
        0 => rectangular_footprint(columns),
        1 => l_footprint(columns),
        _ => t_footprint(columns),
    };
    shaped.or_else(|| rectangular_footprint(columns))
}

/// Searches depth 2..=4 for an exact factorization of the column count.
fn rectangular_footprint(columns: usize) -> Option<TargetArea> {
    (2..=4)
        .find(|depth| columns % depth == 0)
        .map(|depth| TargetArea::rectangular(columns / depth, depth))
}

/// Searches for a rectangle-minus-corner with the exact column count.
fn l_footprint(columns: usize) -> Option<TargetArea> {
    for depth in 2..=4 {
        for (cut_width, cut_depth) in [(1, 1), (1, 2), (2, 1), (2, 2)] {
            let full = columns + cut_width * cut_depth;
            if full % depth != 0 {
                continue;
            }
            let width = full / depth;
            if cut_width < width && cut_depth < depth {
                let area = TargetArea::l_shaped(width, depth, cut_width, cut_depth);
                if area.footprint_size() == columns {
                    return Some(area);
                }
            }
        }
    }
    None
}

/// Searches for a bar-plus-centered-stem with the exact column count.
fn t_footprint(columns: usize) -> Option<TargetArea> {
    for top_width in 2..=6 {
        for top_depth in 1..=2 {
            let bar = top_width * top_depth;
            if bar >= columns {
                continue;
            }
            for stem_width in 1..=2 {
                // the stem must center under the bar on whole columns
                if stem_width > top_width || (top_width - stem_width) % 2 != 0 {
                    continue;
                }
                let remainder = columns - bar;
                if remainder % stem_width != 0 {
                    continue;
                }
                let stem_depth = remainder / stem_width;
                if (1..=3).contains(&stem_depth) {
                    let area = TargetArea::t_shaped(top_width, top_depth, stem_width, stem_depth);
                    if area.footprint_size() == columns {
                        return Some(area);
                    }
                }
            }
        }
    }
    None
}
