use anyhow::{ensure, Context, Result};
use clap::Parser;
use csv::ReaderBuilder;
use linfa::ParamGuard;
use log::info;
use ndarray::Array2;
use ndarray_csv::Array2Reader;
use optdoe::doe::generate_candidate_set;
use optdoe::{optimal_design, Criterion, DesignInfo, Method, OptimalDesignParams};
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;

/// Generates an optimal design of experiments selected among candidate points
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of factors of the candidate grid
    #[arg(short, long, default_value_t = 2)]
    factors: usize,
    /// Number of levels by factor of the candidate grid within [-1, 1]
    #[arg(short, long, default_value_t = 3)]
    levels: usize,
    /// CSV file of candidate points (one point by line, no header) used instead of the grid
    #[arg(short, long)]
    candidates: Option<PathBuf>,
    /// Number of points of the design
    #[arg(short = 'n', long)]
    points: usize,
    /// Degree of the polynomial model
    #[arg(short, long, default_value_t = 1)]
    degree: usize,
    /// Optimality criterion: D, A, I, C, E, G, V, S or T
    #[arg(long, default_value = "D")]
    criterion: String,
    /// Search strategy: sequential, simple_exchange, fedorov, modified_fedorov or detmax
    #[arg(short, long, default_value = "sequential")]
    method: String,
    /// Ridge augmentation of the information matrix
    #[arg(short, long, default_value_t = 0.)]
    alpha: f64,
    /// Maximum number of iterations of exchange strategies
    #[arg(long, default_value_t = 200)]
    max_iter: usize,
}

#[derive(Serialize)]
struct Output {
    design: Vec<Vec<f64>>,
    info: DesignInfo<f64>,
}

fn read_candidates(path: &PathBuf) -> Result<Array2<f64>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b',')
        .from_reader(file);
    let candidates: Array2<f64> = reader
        .deserialize_array2_dynamic()
        .with_context(|| format!("cannot read candidates from {}", path.display()))?;
    Ok(candidates)
}

fn main() -> Result<()> {
    let env = env_logger::Env::new().filter_or("OPTDOE_LOG", "info");
    let mut builder = env_logger::Builder::from_env(env);
    let builder = builder.target(env_logger::Target::Stderr);
    builder.try_init().ok();

    let args = Args::parse();
    let criterion: Criterion = args.criterion.parse()?;
    let method: Method = args.method.parse()?;

    let candidates = match args.candidates.as_ref() {
        Some(path) => read_candidates(path)?,
        None => {
            ensure!(args.factors > 0, "at least one factor is required");
            ensure!(args.levels > 1, "at least two levels by factor are required");
            generate_candidate_set(args.factors, args.levels)
        }
    };
    info!(
        "{} candidates in dimension {}",
        candidates.nrows(),
        candidates.ncols()
    );

    let params = OptimalDesignParams::new(args.points, args.degree)
        .criterion(criterion)
        .method(method)
        .alpha(args.alpha)
        .max_iter(args.max_iter)
        .check()?;
    let (design, info) = optimal_design(&candidates, &params)?;

    let output = Output {
        design: design.outer_iter().map(|row| row.to_vec()).collect(),
        info,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
