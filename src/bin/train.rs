//! Batch training entry point: ingestion, transformation, model selection.

use std::path::PathBuf;

use clap::Parser;

use carprice::pipeline::TrainPipeline;

#[derive(Parser, Debug)]
#[command(name = "carprice-train", about = "Run the car-price training pipeline")]
struct Args {
    /// Raw listings CSV.
    #[arg(long, default_value = "data/car.csv")]
    data: PathBuf,
    /// Directory the CSV and model artifacts are written to.
    #[arg(long, default_value = "artifacts")]
    artifacts: PathBuf,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let pipeline = TrainPipeline::new(&args.data, &args.artifacts);
    match pipeline.run() {
        Ok(score) => {
            println!(
                "best model: {} (r2 = {:.4}, rmse = {:.4})",
                score.name, score.r_squared, score.rmse
            );
        }
        Err(err) => {
            log::error!("training failed: {}", err);
            eprintln!("training failed: {err}");
            std::process::exit(1);
        }
    }
}
