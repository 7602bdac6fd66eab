//! Status.io API CLI binary.
//!
//! A command-line interface for interacting with the Status.io API.

use clap::Parser;
use serde::Serialize;
use statusio::cli::{call_params, Cli, Command, Entity};
use statusio::output::PrettyPrint;
use statusio::{
    status_summary, Component, Get, Incident, List, Maintenance, Operation, StatusioClient,
    StatusioError, Subscriber, SubscriberMethod,
};
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Command::Operations = cli.command {
        print_operations();
        return ExitCode::SUCCESS;
    }

    let client = match StatusioClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set STATUSIO_API_ID and STATUSIO_API_KEY environment variables");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &StatusioClient, cli: Cli) -> statusio::Result<()> {
    let json = cli.json;
    match cli.command {
        Command::Summary => {
            let page = require_page(cli.page.as_deref())?;
            let summary = status_summary(client, page).await?.into_result()?;
            match summary {
                Some(summary) if !json => println!("{}", summary.pretty_print()),
                other => println!("{}", serde_json::to_string_pretty(&other)?),
            }
            Ok(())
        }
        Command::List { entity } => {
            let page = require_page(cli.page.as_deref())?;
            handle_list(client, entity, page, json).await
        }
        Command::Get { entity, id } => {
            let page = require_page(cli.page.as_deref())?;
            handle_get(client, entity, page, &id, json).await
        }
        Command::Operations => {
            print_operations();
            Ok(())
        }
        Command::Call {
            operation,
            segments,
            params,
            numbers,
            lists,
        } => {
            let operation = Operation::from_name(&operation).ok_or_else(|| {
                StatusioError::InvalidParameter {
                    name: "operation".to_string(),
                    reason: format!("unknown operation '{operation}'"),
                }
            })?;
            let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
            let params = call_params(&params, &numbers, &lists)?;

            let response: statusio::ApiResponse =
                client.invoke(operation, &segments, params).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            response.into_result().map(|_| ())
        }
    }
}

fn require_page(page: Option<&str>) -> statusio::Result<&str> {
    page.ok_or_else(|| {
        StatusioError::ConfigMissing(
            "status page ID not set (use --page or STATUSIO_STATUSPAGE_ID)".to_string(),
        )
    })
}

async fn handle_get(
    client: &StatusioClient,
    entity: Entity,
    page: &str,
    id: &str,
    json: bool,
) -> statusio::Result<()> {
    match entity {
        Entity::Incident => {
            let incident = Incident::get(client, page, id).await?.into_result()?;
            output_single(incident.as_ref(), json)?;
        }
        Entity::Maintenance => {
            let maintenance = Maintenance::get(client, page, id).await?.into_result()?;
            output_single(maintenance.as_ref(), json)?;
        }
        Entity::Component | Entity::Subscriber => {
            eprintln!("Hint: Use 'statusio list {}'", entity_name(entity));
            return Err(StatusioError::InvalidParameter {
                name: "entity".to_string(),
                reason: format!("{} cannot be retrieved individually", entity_name(entity)),
            });
        }
    }
    Ok(())
}

async fn handle_list(
    client: &StatusioClient,
    entity: Entity,
    page: &str,
    json: bool,
) -> statusio::Result<()> {
    match entity {
        Entity::Component => {
            let components = Component::list(client, page).await?.into_result()?.unwrap_or_default();
            output_rows(&components, json, components.iter().map(ComponentRow::from))?;
        }
        Entity::Incident => {
            let listing = Incident::list(client, page).await?.into_result()?.unwrap_or_default();
            let rows = listing
                .active_incidents
                .iter()
                .map(|i| IncidentRow::new(i, "active"))
                .chain(
                    listing
                        .resolved_incidents
                        .iter()
                        .map(|i| IncidentRow::new(i, "resolved")),
                );
            output_rows(&listing, json, rows)?;
        }
        Entity::Maintenance => {
            let listing = Maintenance::list(client, page).await?.into_result()?.unwrap_or_default();
            let rows = listing
                .active_maintenances
                .iter()
                .map(|m| MaintenanceRow::new(m, "active"))
                .chain(
                    listing
                        .upcoming_maintenances
                        .iter()
                        .map(|m| MaintenanceRow::new(m, "upcoming")),
                )
                .chain(
                    listing
                        .resolved_maintenances
                        .iter()
                        .map(|m| MaintenanceRow::new(m, "resolved")),
                );
            output_rows(&listing, json, rows)?;
        }
        Entity::Subscriber => {
            let listing = Subscriber::list(client, page).await?.into_result()?.unwrap_or_default();
            let rows = listing.all().map(|(method, s)| SubscriberRow::new(method, s));
            output_rows(&listing, json, rows)?;
        }
    }
    Ok(())
}

fn output_single<T: Serialize + PrettyPrint>(item: Option<&T>, json: bool) -> statusio::Result<()> {
    match item {
        Some(item) if !json => println!("{}", item.pretty_print()),
        other => println!("{}", serde_json::to_string_pretty(&other)?),
    }
    Ok(())
}

fn output_rows<T, R>(raw: &T, json: bool, rows: impl Iterator<Item = R>) -> statusio::Result<()>
where
    T: Serialize,
    R: Tabled,
{
    if json {
        println!("{}", serde_json::to_string_pretty(raw)?);
    } else {
        let rows: Vec<R> = rows.collect();
        let count = rows.len();
        println!("{}", Table::new(rows));
        println!("\n{} total", count);
    }
    Ok(())
}

fn print_operations() {
    let rows: Vec<OperationRow> = Operation::ALL.into_iter().map(OperationRow::from).collect();
    println!("{}", Table::new(rows));
}

fn entity_name(entity: Entity) -> &'static str {
    match entity {
        Entity::Component => "components",
        Entity::Incident => "incidents",
        Entity::Maintenance => "maintenances",
        Entity::Subscriber => "subscribers",
    }
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct ComponentRow {
    id: String,
    name: String,
    containers: String,
}

impl From<&Component> for ComponentRow {
    fn from(c: &Component) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            containers: c
                .containers
                .iter()
                .map(|k| k.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[derive(Tabled)]
struct IncidentRow {
    id: String,
    name: String,
    state: &'static str,
    opened: String,
}

impl IncidentRow {
    fn new(i: &Incident, state: &'static str) -> Self {
        Self {
            id: i.id.clone(),
            name: i.name.clone(),
            state,
            opened: i.datetime_open.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct MaintenanceRow {
    id: String,
    name: String,
    state: &'static str,
    #[tabled(rename = "planned start")]
    start: String,
}

impl MaintenanceRow {
    fn new(m: &Maintenance, state: &'static str) -> Self {
        Self {
            id: m.id.clone(),
            name: m.name.clone(),
            state,
            start: m.datetime_planned_start.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct SubscriberRow {
    id: String,
    method: String,
    address: String,
    granular: String,
}

impl SubscriberRow {
    fn new(method: SubscriberMethod, s: &Subscriber) -> Self {
        Self {
            id: s.id.clone(),
            method: method.to_string(),
            address: s.address.clone(),
            granular: if s.granular.is_empty() {
                "all".to_string()
            } else {
                s.granular.join(", ")
            },
        }
    }
}

#[derive(Tabled)]
struct OperationRow {
    name: &'static str,
    verb: String,
    path: &'static str,
    segments: String,
    required: String,
    optional: String,
}

impl From<Operation> for OperationRow {
    fn from(op: Operation) -> Self {
        let spec = op.spec();
        let names = |required: bool| {
            spec.params
                .iter()
                .filter(|p| p.is_required() == required)
                .map(|p| p.name)
                .collect::<Vec<_>>()
                .join(", ")
        };
        Self {
            name: spec.name,
            verb: spec.verb.to_string(),
            path: spec.path,
            segments: spec.segments.join(", "),
            required: names(true),
            optional: names(false),
        }
    }
}
