//! Polycube puzzle generator CLI.
//!
//! Drives the engine from the command line: generate a level for a round or
//! difficulty, print the proving tiling, or list the piece catalog. Passing
//! a seed makes the output reproducible.

use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::Level;

use polypack::generate::{DifficultyLevel, GenerationOutcome, Generator, LevelDescriptor};
use polypack::{geometry, grid, pieces, solver};

/// Generates provably solvable two-layer polycube packing puzzles.
#[derive(Parser)]
#[command(name = "polypack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log solver and generator diagnostics.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a level and print its descriptor.
    Generate(GenerateArgs),
    /// Generate a level and print the tiling that proves it solvable.
    Solve(GenerateArgs),
    /// List the piece catalog.
    Pieces,
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Round number; selects the difficulty when none is given.
    #[arg(short, long, default_value_t = 1)]
    round: u32,

    /// Difficulty tier, overriding the round-based progression.
    #[arg(short, long, value_enum)]
    difficulty: Option<DifficultyArg>,

    /// RNG seed for reproducible generation.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Generation attempt budget.
    #[arg(short, long, default_value_t = polypack::generate::DEFAULT_MAX_ATTEMPTS)]
    attempts: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl From<DifficultyArg> for DifficultyLevel {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Self::Easy,
            DifficultyArg::Medium => Self::Medium,
            DifficultyArg::Hard => Self::Hard,
            DifficultyArg::Expert => Self::Expert,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    match cli.command {
        Some(Command::Generate(args)) => run_generate(&args, false),
        Some(Command::Solve(args)) => run_generate(&args, true),
        Some(Command::Pieces) => run_pieces(),
        None => run_generate(
            &GenerateArgs {
                round: 1,
                difficulty: None,
                seed: None,
                attempts: polypack::generate::DEFAULT_MAX_ATTEMPTS,
            },
            true,
        ),
    }
}

/// Generates a level, prints it, and optionally prints a proving tiling.
fn run_generate(args: &GenerateArgs, show_solution: bool) {
    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let generator = Generator::new(pieces::CATALOG).with_max_attempts(args.attempts);
    let outcome = match args.difficulty {
        Some(difficulty) => {
            generator.generate_solvable_puzzle(difficulty.into(), args.round, &mut rng)
        }
        None => generator.generate_level(args.round, &mut rng),
    };

    match outcome {
        GenerationOutcome::Solved(descriptor) => {
            print_descriptor(&descriptor);
            if show_solution {
                match solver::solve(&descriptor.pieces, &descriptor.target_area) {
                    Some(solution) => {
                        println!("Solution:");
                        print!("{}", grid::format_solution(&solution, &descriptor.target_area));
                    }
                    None => eprintln!("verified level failed to re-solve"),
                }
            }
        }
        GenerationOutcome::ExhaustedRetries { last_attempt } => {
            eprintln!("No solvable level found within {} attempts.", args.attempts);
            if let Some(descriptor) = last_attempt {
                eprintln!("Last (unverified) attempt:");
                print_descriptor(&descriptor);
            }
        }
    }
}

fn print_descriptor(descriptor: &LevelDescriptor) {
    let (width, height, depth) = descriptor.board_size;
    println!(
        "Round {} - {} ({} s limit)",
        descriptor.round,
        descriptor.difficulty.display_name(),
        descriptor.time_limit.as_secs()
    );
    println!("Board {width}x{height}x{depth}, {} target cells", descriptor.target_area.total_cells());
    println!("Pieces:");
    for piece in &descriptor.pieces {
        println!("  [{}] {} ({} blocks)", piece.id, piece.name, piece.block_count());
    }
    println!("Footprint:");
    print!("{}", descriptor.target_area.format_footprint());
}

/// Prints the catalog with each piece's distinct orientation count.
fn run_pieces() {
    for piece in pieces::CATALOG {
        let orientations = geometry::unique_rotations(piece.blocks).len();
        println!(
            "[{}] {:10} {} blocks, {:2} orientations, color #{:02x}{:02x}{:02x}",
            piece.id,
            piece.name,
            piece.block_count(),
            orientations,
            piece.color.r,
            piece.color.g,
            piece.color.b
        );
    }
}
