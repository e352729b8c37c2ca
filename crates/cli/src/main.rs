use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mocktty_engine::{MockRequest, SIMULATED_LATENCY, missing_selection_result};
use mocktty_registry::ServiceRegistry;
use mocktty_types::{ServerRecord, ServiceDefinition};
use mocktty_util::{ServerStore, new_record_id};
use serde_json::{Map, Value};
use tracing::{Level, warn};

#[derive(Parser)]
#[command(name = "mocktty", about = "Business-function testing console over mock services")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the service/function catalog
    Catalog,
    /// Execute one function and print the result envelope
    Run {
        /// Service id (e.g. "order")
        #[arg(long)]
        service: String,
        /// Function id (e.g. "query")
        #[arg(long)]
        function: String,
        /// Server record id; defaults to the first server owned by the service
        #[arg(long)]
        server: Option<String>,
        /// Parameter override, repeatable
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
    /// Manage server records
    Servers {
        #[command(subcommand)]
        command: ServersCommand,
    },
}

#[derive(Subcommand)]
enum ServersCommand {
    /// Print all server records
    List,
    /// Add a server record owned by a service
    Add {
        #[arg(long)]
        service: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
    },
    /// Rename or re-address a server record; the owning service is fixed at
    /// creation
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Remove a server record by id
    Remove { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let registry = ServiceRegistry::load();

    match cli.command {
        // No subcommand => TUI
        None => mocktty_tui::run(mocktty_tui::SharedCtx {
            registry,
            store: load_store(),
        })
        .await,
        Some(Command::Catalog) => {
            print_catalog(&registry);
            Ok(())
        }
        Some(Command::Run {
            service,
            function,
            server,
            params,
        }) => run_once(&registry, &service, &function, server.as_deref(), &params).await,
        Some(Command::Servers { command }) => run_servers_cmd(&registry, command),
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .try_init();
}

/// Load the durable server store, degrading to an in-memory seed copy when
/// the config directory is unusable.
fn load_store() -> ServerStore {
    ServerStore::load().unwrap_or_else(|error| {
        warn!(error = %error, "Failed to persist server list; continuing in memory");
        ServerStore::ephemeral()
    })
}

fn print_catalog(registry: &ServiceRegistry) {
    for service in registry.services() {
        println!("{} ({})", service.name, service.id);
        for function in &service.functions {
            let auto = if function.auto_execute { "  [auto]" } else { "" };
            println!("  {} ({}){}", function.name, function.id, auto);
            for param in &function.params {
                let default = param
                    .default_value
                    .as_deref()
                    .map(|value| format!(" = {value}"))
                    .unwrap_or_default();
                println!("    {} ({}){}", param.name, param.id, default);
            }
        }
    }
}

/// One-shot execution: seed defaults from the catalog, apply overrides, wait
/// out the simulated latency, and print the envelope.
async fn run_once(
    registry: &ServiceRegistry,
    service_id: &str,
    function_id: &str,
    server_id: Option<&str>,
    overrides: &[String],
) -> Result<()> {
    let service = registry
        .service(service_id)
        .with_context(|| format!("unknown service: {service_id}"))?;
    let function = service
        .function(function_id)
        .with_context(|| format!("unknown function: {service_id}/{function_id}"))?;

    let store = load_store();
    let server = match server_id {
        Some(id) => store.record(id),
        None => store.records_for_service(&service.id).into_iter().next(),
    };
    let Some(server) = server else {
        println!("{}", missing_selection_result());
        return Ok(());
    };

    let mut params: Map<String, Value> = function
        .params
        .iter()
        .map(|param| {
            (
                param.id.clone(),
                Value::String(param.default_value.clone().unwrap_or_default()),
            )
        })
        .collect();
    for entry in overrides {
        let (key, value) = entry
            .split_once('=')
            .with_context(|| format!("invalid --param (expected KEY=VALUE): {entry}"))?;
        params.insert(key.to_string(), Value::String(value.to_string()));
    }

    let request = MockRequest {
        service_id: service.id.clone(),
        service_name: service.name.clone(),
        function_name: function.name.clone(),
        server_address: server.address,
        params,
    };

    tokio::time::sleep(SIMULATED_LATENCY).await;
    println!("{}", mocktty_engine::execute(&request));
    Ok(())
}

fn run_servers_cmd(registry: &ServiceRegistry, command: ServersCommand) -> Result<()> {
    let store = load_store();
    match command {
        ServersCommand::List => {
            for record in store.records() {
                println!(
                    "{}\t{}\t{}\t{}",
                    record.id, record.service_id, record.name, record.address
                );
            }
        }
        ServersCommand::Add {
            service,
            name,
            address,
        } => {
            let service = find_service(registry, &service)?;
            let record = ServerRecord {
                id: new_record_id(),
                name,
                address,
                service_id: service.id.clone(),
            };
            let id = record.id.clone();
            store.add(record)?;
            println!("added {id}");
        }
        ServersCommand::Update { id, name, address } => {
            let mut record = store
                .record(&id)
                .with_context(|| format!("no server with id {id}"))?;
            if let Some(name) = name {
                record.name = name;
            }
            if let Some(address) = address {
                record.address = address;
            }
            store.update(record)?;
            println!("updated {id}");
        }
        ServersCommand::Remove { id } => {
            if store.remove(&id)? {
                println!("removed {id}");
            } else {
                println!("no server with id {id}");
            }
        }
    }
    Ok(())
}

fn find_service<'a>(registry: &'a ServiceRegistry, service_id: &str) -> Result<&'a ServiceDefinition> {
    registry
        .service(service_id)
        .with_context(|| format!("unknown service: {service_id}"))
}
