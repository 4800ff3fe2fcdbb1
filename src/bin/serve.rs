//! HTTP serving entry point for the prediction endpoint.

use std::path::PathBuf;

use clap::Parser;

use carprice::predict::{PredictConfig, PredictPipeline};
use carprice::server;

#[derive(Parser, Debug)]
#[command(name = "carprice-serve", about = "Serve car-price predictions over HTTP")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8000")]
    addr: String,
    /// Directory holding the trained artifacts.
    #[arg(long, default_value = "artifacts")]
    artifacts: PathBuf,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    let pipeline = PredictPipeline::new(PredictConfig::new(&args.artifacts));
    let router = server::app(pipeline);

    let listener = match tokio::net::TcpListener::bind(&args.addr).await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("failed to bind {}: {err}", args.addr);
            std::process::exit(1);
        }
    };
    log::info!("listening on {}", args.addr);

    if let Err(err) = axum::serve(listener, router).await {
        eprintln!("server error: {err}");
        std::process::exit(1);
    }
}
