//! CSI dashboard CLI binary.
//!
//! Conversational swarm intelligence simulator.
//!
//! # Commands
//!
//! - `serve` - Start the HTTP dashboard server
//! - `simulate` - Run one offline session and print the result
//! - `personas` - List/inspect the persona roster
//! - `ask` - Send a prompt to one persona (or all of them)

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use csi::{
    agents::{AgentContext, AgentRegistry},
    config::{validate_credentials, Config},
    server::{create_router, AppState, ServerConfig},
    session::SessionController,
    VERSION,
};

#[derive(Parser)]
#[command(name = "csi")]
#[command(version = VERSION)]
#[command(about = "Conversational swarm intelligence simulator", long_about = None)]
struct Cli {
    /// Config file path (default: <config dir>/csi/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP dashboard server
    Serve {
        /// Listen port
        #[arg(short, long)]
        port: Option<u16>,

        /// Listen host
        #[arg(long)]
        host: Option<String>,

        /// Bind to all interfaces (mutually exclusive with --host)
        #[arg(long, conflicts_with = "host")]
        bind_all: bool,

        /// Disable CORS
        #[arg(long)]
        no_cors: bool,

        /// Fixed seed for reproducible sessions
        #[arg(short, long)]
        seed: Option<u64>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run one offline session and print the result
    Simulate {
        /// Brainstorming topic
        #[arg(short, long)]
        topic: Option<String>,

        /// Participant count
        #[arg(short = 'n', long)]
        participants: Option<u32>,

        /// Fixed seed for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output the session summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List and inspect personas
    Personas {
        #[command(subcommand)]
        action: Option<PersonasAction>,
    },

    /// Send a prompt to one persona, or all of them
    Ask {
        /// Persona key (omit with --all)
        persona: Option<String>,

        /// Ask every persona in the roster
        #[arg(short, long)]
        all: bool,

        /// Discussion topic
        #[arg(short, long)]
        topic: String,

        /// Ideas collected so far (repeatable)
        #[arg(short, long)]
        idea: Vec<String>,

        /// Perspectives to reconcile (repeatable)
        #[arg(long)]
        perspective: Vec<String>,
    },
}

#[derive(Subcommand)]
enum PersonasAction {
    /// List the persona roster
    List,

    /// Get info about a specific persona
    Info {
        /// Persona key
        key: String,
    },
}

fn main() -> anyhow::Result<()> {
    // Credentials live in .env during development
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve {
            port,
            host,
            bind_all,
            no_cors,
            seed,
            verbose,
        } => cmd_serve(&config, port, host, bind_all, no_cors, seed, verbose),

        Commands::Simulate {
            topic,
            participants,
            seed,
            json,
        } => cmd_simulate(&config, topic, participants, seed, json),

        Commands::Personas { action } => cmd_personas(action),

        Commands::Ask {
            persona,
            all,
            topic,
            idea,
            perspective,
        } => cmd_ask(&config, persona, all, topic, idea, perspective),
    }
}

/// Load config from the given file (or the default location) with
/// environment variables layered on top.
fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let base = match path {
        Some(path) => Config::from_file(path)?,
        None => match Config::default_path() {
            Some(default) if default.exists() => Config::from_file(default)?,
            _ => Config::default(),
        },
    };
    Ok(base.merge(Config::from_env()))
}

fn controller_for(config: &Config, seed: Option<u64>) -> SessionController {
    match seed.or(config.simulation.seed) {
        Some(seed) => SessionController::with_seed(seed),
        None => SessionController::new(),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_serve(
    config: &Config,
    port: Option<u16>,
    host: Option<String>,
    bind_all: bool,
    no_cors: bool,
    seed: Option<u64>,
    verbose: bool,
) -> anyhow::Result<()> {
    // Initialize logging
    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    // Every provider credential must be present before serving anything
    validate_credentials()?;

    let host = host.unwrap_or_else(|| config.dashboard.host.clone());
    let port = port.unwrap_or(config.dashboard.port);

    let mut server_config = ServerConfig::default();
    if bind_all {
        server_config = server_config.with_port(port).bind_all();
    } else {
        server_config = server_config.with_addr(format!("{host}:{port}").parse()?);
    }
    if no_cors {
        server_config = server_config.without_cors();
    }

    let controller = controller_for(config, seed);
    let state = Arc::new(AppState::new(server_config.clone(), controller));
    let app = create_router(state);

    tracing::info!("Starting CSI dashboard server on {}", server_config.addr);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(server_config.addr).await?;
        axum::serve(listener, app).await?;
        Ok::<_, anyhow::Error>(())
    })
}

fn cmd_simulate(
    config: &Config,
    topic: Option<String>,
    participants: Option<u32>,
    seed: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let topic = topic.unwrap_or_else(|| config.simulation.default_topic.clone());
    let participants = participants.unwrap_or(config.simulation.default_participants);

    let mut controller = controller_for(config, seed);
    let session = controller.start_new_session(&topic, participants)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session.summary())?);
        return Ok(());
    }

    println!("Session {}", session.id());
    println!("  Topic:        {}", session.topic());
    println!("  Participants: {}", session.participant_count());
    if session.dropped_participants() > 0 {
        println!("  Dropped:      {}", session.dropped_participants());
    }
    println!("  Subgroups:    {}", session.subgroups().len());
    println!(
        "  Network:      {} nodes, {} edges",
        session.network().node_count(),
        session.network().edge_count()
    );
    println!();

    let network = session.network();
    for subgroup in session.subgroups() {
        let degree = network.degree_of(&subgroup.label()).unwrap_or(0);
        println!(
            "  {:<14} {} .. {}  ({degree} persona links)",
            subgroup.label(),
            subgroup.participants[0],
            subgroup.participants[subgroup.participants.len() - 1],
        );
    }

    let metrics = session.metrics();
    println!();
    println!("Metrics:");
    println!("  Active participants: {}", metrics.active_participants);
    println!("  Total ideas:         {}", metrics.total_ideas);
    println!("  Engagement score:    {}%", metrics.engagement_score);
    println!("  Consensus level:     {}%", metrics.consensus_level);

    Ok(())
}

fn cmd_personas(action: Option<PersonasAction>) -> anyhow::Result<()> {
    let registry = csi::personas::PersonaRegistry::new();

    match action {
        None | Some(PersonasAction::List) => {
            println!("Personas ({}):", registry.len());
            println!();
            println!(
                "{:<14} {:<18} {:<12} {:<22}",
                "Key", "Role", "Provider", "Model"
            );
            println!("{}", "-".repeat(68));

            for card in registry.iter() {
                println!(
                    "{:<14} {:<18} {:<12} {:<22}",
                    card.key,
                    card.role,
                    card.provider.name(),
                    card.model
                );
            }
        },

        Some(PersonasAction::Info { key }) => match registry.get(&key) {
            Some(card) => {
                println!("Persona: {}", card.key);
                println!("Role: {}", card.role);
                println!("Provider: {}", card.provider.name());
                println!("Model: {}", card.model);
                println!("Credential: {}", card.provider.credential_var());
                if let Some(system) = &card.system_prompt {
                    println!("System prompt: {system}");
                }
                println!("Task prompt: {}: ...", card.task_prompt);
            },
            None => {
                eprintln!("Persona not found: {key}");
                eprintln!("Try 'csi personas list' to see the roster");
                std::process::exit(1);
            },
        },
    }

    Ok(())
}

fn cmd_ask(
    config: &Config,
    persona: Option<String>,
    all: bool,
    topic: String,
    ideas: Vec<String>,
    perspectives: Vec<String>,
) -> anyhow::Result<()> {
    let registry = AgentRegistry::new(&config.agents)?;
    let context = AgentContext {
        topic,
        ideas,
        perspectives,
    };

    let runtime = tokio::runtime::Runtime::new()?;

    if all {
        let outcomes = runtime.block_on(registry.respond_all(&context));
        let mut failures = 0;
        for (key, outcome) in outcomes {
            match outcome {
                Ok(reply) => {
                    println!("[{key}] ({})", reply.role);
                    println!("{}", reply.text);
                    println!();
                },
                Err(e) => {
                    failures += 1;
                    eprintln!("[{key}] failed: {e}");
                },
            }
        }
        if failures > 0 {
            eprintln!("{failures} persona call(s) failed");
        }
        return Ok(());
    }

    let Some(key) = persona else {
        anyhow::bail!("provide a persona key, or pass --all");
    };
    let reply = runtime.block_on(registry.respond(&key, &context))?;
    println!("[{}] ({})", reply.persona, reply.role);
    println!("{}", reply.text);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_host_and_bind_all_conflict() {
        let result = Cli::try_parse_from(["csi", "serve", "--host", "10.0.0.1", "--bind-all"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_serve_accepts_either_bind_flag_alone() {
        assert!(Cli::try_parse_from(["csi", "serve", "--host", "10.0.0.1"]).is_ok());
        assert!(Cli::try_parse_from(["csi", "serve", "--bind-all"]).is_ok());
    }
}
