//! FLUMORE CLI: drive the reader and writer protocols from the command line.

use clap::{Parser, Subcommand};
use flumore_core::prelude::{AdapterConfig, SchemaDescriptor, SourceFormat};
use flumore_geom::{GeometryNode, StandardGeometryTools};
use flumore_plugin::{Feature, FlumoreReader, FlumoreWriter, HostContext};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flumore")]
#[command(about = "FLUMORE simulation reader and geometry writer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a dataset and print one JSON feature per line
    Read {
        /// Dataset file (.json or .csv)
        dataset: PathBuf,

        /// Source format (overrides FLUMORE_SOURCE_FORMAT)
        #[arg(long)]
        format: Option<SourceFormat>,

        /// Stop after this many records
        #[arg(long)]
        limit: Option<usize>,

        /// Reader parameters; when given the schema exchange is skipped
        #[arg(long = "param")]
        parameters: Vec<String>,
    },

    /// Print the FLUMORE schema descriptor
    Schema,

    /// Write one feature whose geometry is read from a JSON file and print
    /// the decomposition trace
    Decompose {
        /// Geometry JSON file
        geometry: PathBuf,

        /// Feature type of the written feature
        #[arg(long, default_value = "FLUMORE")]
        feature_type: String,
    },
}

fn main() {
    let filter = EnvFilter::try_from_env("FLUMORE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Read {
            dataset,
            format,
            limit,
            parameters,
        } => read_dataset(&dataset, format, limit, &parameters),
        Commands::Schema => print_schema(),
        Commands::Decompose {
            geometry,
            feature_type,
        } => decompose_geometry(&geometry, &feature_type),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn read_dataset(
    dataset: &PathBuf,
    format: Option<SourceFormat>,
    limit: Option<usize>,
    parameters: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AdapterConfig::from_env();
    if let Some(format) = format {
        config.source_format = format;
    }
    let mut reader = FlumoreReader::with_host(HostContext::new(config));
    reader.open(&dataset.to_string_lossy(), parameters)?;

    let outcome = drain_reader(&mut reader, limit, parameters.is_empty());
    match &outcome {
        Ok(count) => {
            reader.close()?;
            info!(records = count, "read complete");
        }
        Err(_) => reader.abort()?,
    }
    outcome.map(|_| ())
}

fn drain_reader(
    reader: &mut FlumoreReader,
    limit: Option<usize>,
    negotiate: bool,
) -> Result<usize, Box<dyn std::error::Error>> {
    if negotiate {
        loop {
            let reply = reader.read_schema()?;
            if reply.end_of_schema {
                break;
            }
            let json = reply.feature.to_json()?;
            debug!(schema = %json, "schema feature");
        }
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut count = 0usize;
    while limit.map_or(true, |l| count < l) {
        match reader.read()? {
            Some(feature) => writeln!(out, "{}", feature.to_json()?)?,
            None => break,
        }
        count += 1;
    }
    out.flush()?;
    Ok(count)
}

fn print_schema() -> Result<(), Box<dyn std::error::Error>> {
    let descriptor = SchemaDescriptor::flumore();
    println!("{}", serde_json::to_string_pretty(&descriptor)?);
    Ok(())
}

fn decompose_geometry(
    path: &PathBuf,
    feature_type: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let geometry: GeometryNode = serde_json::from_str(&text)?;

    let tools = Arc::new(StandardGeometryTools::new());
    let host = HostContext::from_env().with_tools(tools.clone());
    let mut writer = FlumoreWriter::with_host(host);
    writer.open(&path.to_string_lossy(), &[feature_type.to_string()])?;

    let outcome = writer.write(&Feature::new(feature_type).with_geometry(geometry));
    if let Some(trace) = writer.last_trace() {
        println!("{}", serde_json::to_string_pretty(trace)?);
    }
    writer.close()?;

    let ledger = tools.ledger().snapshot();
    debug!(
        created = ledger.created,
        destroyed = ledger.destroyed,
        iterators = ledger.iterators_acquired,
        "geometry tool usage"
    );
    outcome?;
    Ok(())
}
