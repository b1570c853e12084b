//! Command-line adapter: parses arguments and drives [`FleetOperations`].
//!
//! [`FleetOperations`]: crate::port::inbound::FleetOperations

pub mod chat;
pub mod command;
pub mod config;
pub mod fleet;
pub mod output;
pub mod paths;
pub mod setup;

use std::process::ExitCode;

use tracing::debug;

use self::command::{Cli, Commands, ConfigCommand};
use self::fleet::Lifecycle;
use self::output::OutputConfig;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::{Caller, FleetOperations};

/// Run one CLI invocation and map the outcome to an exit status.
pub async fn run(cli: Cli) -> ExitCode {
    let output_config = OutputConfig::new(cli.json, cli.quiet, cli.verbose);
    output::configure(output_config);

    match execute(cli, output_config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::failure(&e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli, output_config: OutputConfig) -> Result<()> {
    if let Commands::Config(ConfigCommand::Validate) = &cli.command {
        return config::execute_validate(&cli.config);
    }

    let config = Config::load(&cli.config)?;
    match output_config.log_level() {
        Some(level) => config.logging.with_level(level).init(),
        None => config.logging.init(),
    }
    debug!(config = %cli.config.display(), "Configuration loaded");

    let manager = bootstrap::build_manager(&config);
    let caller = cli
        .token
        .as_deref()
        .map_or_else(Caller::anonymous, Caller::bearer);

    dispatch(&manager, &caller, &cli.command).await
}

/// Route a parsed command to its handler.
pub async fn dispatch(ops: &dyn FleetOperations, caller: &Caller, command: &Commands) -> Result<()> {
    match command {
        Commands::Setup(args) => setup::execute(ops, caller, args).await,
        Commands::Models => fleet::models(ops, caller).await,
        Commands::Workers => fleet::workers(ops, caller).await,
        Commands::Create(args) => fleet::create(ops, caller, args).await,
        Commands::Pause(args) => fleet::lifecycle(ops, caller, Lifecycle::Pause, args).await,
        Commands::Resume(args) => fleet::lifecycle(ops, caller, Lifecycle::Resume, args).await,
        Commands::Delete(args) => fleet::lifecycle(ops, caller, Lifecycle::Delete, args).await,
        Commands::Chat(args) => chat::execute(ops, caller, args).await,
        Commands::Config(ConfigCommand::Validate) => Ok(()),
    }
}
