use std::process::ExitCode;

use clap::Parser;
use fleetward::adapter::inbound::cli::{self, command::Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    cli::run(Cli::parse()).await
}
