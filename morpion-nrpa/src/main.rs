use clap::{Parser, ValueEnum};

use morpion_nrpa::engine::{Game, Move, Variant};
use morpion_nrpa::experiment::{self, ExperimentParams};

#[derive(Parser, Debug)]
#[command(
    name = "morpion-nrpa",
    version,
    about = "Search for long Morpion Solitaire sequences with NRPA"
)]
struct Cli {
    /// Number of independent top-level searches
    #[arg(short = 'b', long, default_value_t = 1)]
    batch_size: u32,
    /// RNG seed
    #[arg(short = 's', long, default_value_t = 1)]
    seed: u64,
    /// NRPA nesting depth (0 = plain playouts)
    #[arg(short = 'l', long, default_value_t = 1)]
    levels: u32,
    /// Iterations per NRPA level
    #[arg(short = 'i', long, default_value_t = 100)]
    iterations: u32,
    /// Adaptation step size
    #[arg(short = 'a', long, default_value_t = 1.0)]
    alpha: f32,
    /// Game variant
    #[arg(long, value_enum, default_value_t = VariantArg::T5)]
    variant: VariantArg,
    /// Print the final board after the best sequence
    #[arg(long)]
    board: bool,
    /// Emit the report as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum VariantArg {
    T5,
    D5,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Variant {
        match v {
            VariantArg::T5 => Variant::T5,
            VariantArg::D5 => Variant::D5,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let params = ExperimentParams {
        batch_size: cli.batch_size,
        random_seed: cli.seed,
        levels: cli.levels,
        iterations: cli.iterations,
        alpha: cli.alpha,
        variant: cli.variant.into(),
        weights: Vec::new(),
    };
    let report = experiment::run(&params)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "variant {}, levels {}, iterations {}, alpha {}, seed {}, batch {}",
        params.variant, params.levels, params.iterations, params.alpha,
        params.random_seed, params.batch_size
    );
    println!("best sequence: {} moves", report.best_length());
    let mut game = Game::new(params.variant);
    for (n, &id) in report.best_sequence.iter().enumerate() {
        let m = Move::from_id(id).expect("report contains an invalid move id");
        println!("  {:3}. {}", n + 1, m);
        game.make_move(m);
    }
    if cli.board {
        println!("{}", game);
    }
    let buckets: Vec<String> = report
        .histogram
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(len, count)| format!("{len}:{count}"))
        .collect();
    println!("length histogram: {}", buckets.join(" "));
    println!(
        "playouts: {}, moves simulated: {}, time: {:.3}s",
        report.sequences,
        report.moves,
        report.time_us as f64 / 1e6
    );
    Ok(())
}
