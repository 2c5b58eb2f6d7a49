mod script;

use anyhow::Result;
use clap::Parser;
use pivotslice_core::{GraphData, PublicationGraph};
use pivotslice_events::{Event, EventBus, EventListener};
use pivotslice_grid::{GridSession, GridSnapshot, SessionConfig};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Publication graph as JSON: {"publications": [...], "citations": [...]}
    #[arg(short, long)]
    graph: PathBuf,

    /// JSON array of grid operations to apply in order
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Session settings (layout parameters)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the resulting grid
    #[arg(long)]
    pretty: bool,
}

struct EventLog {
    count: usize,
}

impl EventListener for EventLog {
    fn handle_event(&mut self, event: &Event) {
        self.count += 1;
        tracing::debug!("Event: {:?}", event);
    }
}

fn load_graph(path: &Path) -> Result<PublicationGraph> {
    let content = fs::read_to_string(path)?;
    let data: GraphData = serde_json::from_str(&content)?;
    Ok(PublicationGraph::from_data(data)?)
}

fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        }
        None => Ok(SessionConfig::default()),
    }
}

fn run(args: &Args) -> Result<GridSnapshot> {
    let graph = load_graph(&args.graph)?;
    let config = load_config(args.config.as_deref())?;
    println!(
        "Loaded {} publications and {} citations.",
        graph.len(),
        graph.citation_count()
    );

    let bus = EventBus::new();
    let mut session = GridSession::new(graph, config).with_event_bus(bus.clone());
    if let Some(path) = &args.script {
        let operations = script::load(path)?;
        let total = operations.len();
        let applied = script::run(&mut session, operations)?;
        println!("Applied {} of {} operations.", applied, total);
    }

    let mut log = EventLog { count: 0 };
    bus.dispatch_to(&mut log);
    tracing::info!("{} structural events", log.count);

    session.validate()?;
    Ok(session.snapshot())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let snapshot = run(&args)?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };
    println!("{}", json);
    Ok(())
}
