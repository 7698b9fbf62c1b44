// src/main.rs - Render a board's pin tables, or blink two pins
use clap::{Parser, Subcommand};
use firmata_table::simulator::{SimulatedBoard, load_snapshot};
use firmata_table::{BoardModel, Config, Session, load_config};
use std::io::Write;
use std::path::PathBuf;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Parser)]
#[command(name = "firmata-table", version, about = "Markdown pin tables for Firmata boards")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Args)]
struct BoardArgs {
    /// Board layout to use
    #[arg(long, value_enum)]
    board: Option<BoardModel>,

    /// Recorded pin state to load instead of simulating the layout
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Connect, query every pin and print one Markdown table per header
    Render {
        #[command(flatten)]
        board: BoardArgs,

        /// Write the tables to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Drive the configured blink pins with alternating levels
    Blink {
        #[command(flatten)]
        board: BoardArgs,

        /// Stop after this many cycles
        #[arg(long)]
        cycles: Option<u64>,

        /// Milliseconds between level flips
        #[arg(long)]
        interval_ms: Option<u64>,
    },
    /// List the built-in board layouts
    Boards,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for the tables
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            load_config(path).map_err(|e| {
                tracing::error!("Failed to load config from '{}': {}", path, e);
                Box::new(e) as BoxError
            })?
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Render { board, out } => {
            apply_board_args(&mut config, board);
            if out.is_some() {
                config.output.path = out;
            }
            render(&config).await
        }
        Command::Blink { board, cycles, interval_ms } => {
            apply_board_args(&mut config, board);
            if let Some(interval_ms) = interval_ms {
                config.blink.interval_ms = interval_ms;
            }
            config.validate()?;
            blink(&config, cycles).await
        }
        Command::Boards => {
            list_boards();
            Ok(())
        }
    }
}

fn apply_board_args(config: &mut Config, args: BoardArgs) {
    if let Some(model) = args.board {
        config.board.model = model;
    }
    if args.snapshot.is_some() {
        config.board.snapshot = args.snapshot;
    }
}

fn open_board(config: &Config) -> Result<SimulatedBoard, BoxError> {
    match &config.board.snapshot {
        Some(path) => {
            tracing::info!("Loading pin snapshot from: {}", path.display());
            Ok(SimulatedBoard::from_snapshot(load_snapshot(path)?))
        }
        None => {
            tracing::info!("No snapshot configured, simulating {} from its layout", config.board.model);
            Ok(SimulatedBoard::from_layout(config.board.model.board()))
        }
    }
}

async fn connect(config: &Config) -> Result<Session<SimulatedBoard>, BoxError> {
    let client = open_board(config)?;
    Session::connect(client, config.session.clone()).await.map_err(|e| {
        tracing::error!("Failed to connect to board: {}", e);
        Box::new(e) as BoxError
    })
}

async fn render(config: &Config) -> Result<(), BoxError> {
    let model = config.board.model;
    let mut session = connect(config).await?;
    session.query_pin_states().await?;
    session.probe_digital_ports().await?;

    let tables = session.render(model.board(), model.names()).map_err(|e| {
        tracing::error!("Failed to render {} tables: {}", model, e);
        Box::new(e) as BoxError
    })?;

    match &config.output.path {
        Some(path) => {
            std::fs::write(path, tables.concat())?;
            tracing::info!("Wrote {} tables to {}", tables.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            for table in &tables {
                stdout.write_all(table.as_bytes())?;
            }
            stdout.flush()?;
        }
    }
    Ok(())
}

async fn blink(config: &Config, cycles: Option<u64>) -> Result<(), BoxError> {
    let mut session = connect(config).await?;
    tokio::select! {
        result = session.blink(&config.blink.pins, config.blink.interval(), cycles) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted, stopping blink"),
    }
    Ok(())
}

fn list_boards() {
    for model in BoardModel::ALL {
        let board = model.board();
        println!("{} ({} pins, {} analog)", model, board.pin_end, board.analog_pins.len());
        for header in &board.headers {
            let range = header.pin_range();
            println!(
                "  {}: {} slots, pins {}..{}, {} padding",
                header.name,
                header.total,
                range.start,
                range.end,
                header.padding.len()
            );
        }
    }
}
