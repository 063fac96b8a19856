use clap::Parser;
use hurdat2_processor::cli::{run, Cli};
use hurdat2_processor::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
