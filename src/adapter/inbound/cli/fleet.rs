//! Handlers for the model, worker and lifecycle commands.

use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::command::{CreateArgs, WorkerArg};
use super::output;
use crate::domain::WorkerSummary;
use crate::error::Result;
use crate::port::inbound::{Caller, CreateWorkerRequest, FleetOperations, WorkerRequest};

#[derive(Tabled)]
struct WorkerRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Model")]
    model: String,
}

impl From<&WorkerSummary> for WorkerRow {
    fn from(worker: &WorkerSummary) -> Self {
        Self {
            name: worker.name.clone(),
            status: worker.status.to_string(),
            address: worker.address.clone().unwrap_or_else(|| "-".into()),
            model: worker.model.clone().unwrap_or_else(|| "-".into()),
        }
    }
}

/// Execute `models`.
pub async fn models(ops: &dyn FleetOperations, caller: &Caller) -> Result<()> {
    let models = ops.list_models(caller).await?;

    if output::is_json() {
        output::json_output(json!({ "command": "models", "models": models }));
        return Ok(());
    }
    output::section("Models");
    for model in &models {
        output::note(&format!("- {model}"));
    }
    Ok(())
}

/// Execute `workers`.
pub async fn workers(ops: &dyn FleetOperations, caller: &Caller) -> Result<()> {
    let workers = ops.list_workers(caller).await?;

    if output::is_json() {
        output::json_output(json!({ "command": "workers", "workers": workers }));
        return Ok(());
    }
    if workers.is_empty() {
        output::note("No workers");
        return Ok(());
    }
    let rows: Vec<WorkerRow> = workers.iter().map(WorkerRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    output::table(table);
    Ok(())
}

/// Execute `create`.
pub async fn create(ops: &dyn FleetOperations, caller: &Caller, args: &CreateArgs) -> Result<()> {
    let request = CreateWorkerRequest {
        model: args.model.clone(),
        quantization: args.quantization.clone(),
        gpu_type: args.gpu_type.clone(),
        gpu_count: args.gpu_count,
        name: args.name.clone(),
    };
    let name = ops.create_worker(caller, request).await?;

    if output::is_json() {
        output::json_output(json!({ "command": "create", "worker": name }));
        return Ok(());
    }
    output::success(&format!("Creating worker {name}"));
    output::field("Model", &args.model);
    output::note("The worker accepts chat requests once it reports Running");
    Ok(())
}

/// Lifecycle verbs sharing one handler.
#[derive(Debug, Clone, Copy)]
pub enum Lifecycle {
    Pause,
    Resume,
    Delete,
}

impl Lifecycle {
    const fn command(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Delete => "delete",
        }
    }

    const fn done(self) -> &'static str {
        match self {
            Self::Pause => "Paused",
            Self::Resume => "Resumed",
            Self::Delete => "Deleted",
        }
    }
}

/// Execute `pause`, `resume` or `delete`.
pub async fn lifecycle(
    ops: &dyn FleetOperations,
    caller: &Caller,
    verb: Lifecycle,
    args: &WorkerArg,
) -> Result<()> {
    let request = WorkerRequest::new(args.name.clone());
    let name = match verb {
        Lifecycle::Pause => ops.pause_worker(caller, request).await?,
        Lifecycle::Resume => ops.resume_worker(caller, request).await?,
        Lifecycle::Delete => ops.delete_worker(caller, request).await?,
    };

    if output::is_json() {
        output::json_output(json!({ "command": verb.command(), "worker": name }));
        return Ok(());
    }
    output::success(&format!("{} {name}", verb.done()));
    Ok(())
}
