/*
This program generates a LASSO problem and stores the data in the local filesystem.
*/

use std::path::Path;
use std::time::Instant;

use clap::Parser;
use lassopath_core::{data::DatasetStore, grid::LambdaGrid, problem::ProblemData};

/// Program to generate the data matrix A and target vector b for a LASSO
/// problem.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The number of rows in A
    #[arg(short, long)]
    m: usize,

    /// The number of columns in A
    #[arg(short, long)]
    n: usize,

    /// The number of non-zero elements in x_true
    #[arg(short, long)]
    k: usize,

    /// RNG seed for the synthetic data
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// The prefix for the output files
    #[arg(short, long, default_value_t = ("lasso").to_string())]
    prefix: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let store = DatasetStore::new(Path::new("data"), "");

    println!(
        "[Main] Generating {}x{} problem with {} active coefficients...",
        args.m, args.n, args.k
    );
    let data_gen_start_time = Instant::now();

    let problem = ProblemData::synthetic(args.m, args.n, args.k, args.seed)
        .expect("Failed to generate problem data");

    println!(
        "[Main] Problem generated in {:?}",
        data_gen_start_time.elapsed()
    );

    println!("[Main] Lambda_max: {}", LambdaGrid::lambda_max(&problem));

    store
        .write(&format!("{}-problem", args.prefix), &problem)
        .await
        .expect("Failed to write problem data");

    println!(
        "[Main] Data generation complete in {:?}",
        data_gen_start_time.elapsed()
    );
}
