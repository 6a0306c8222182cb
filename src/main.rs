use anyhow::Result;
use beco_core::{AppConfig, ByteOrder};
use beco_lib::commands;
use beco_lib::logging::init_logging;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "beco.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print header fields, fingerprint and area coverage
    Info {
        /// Map file (defaults to `paths.map`)
        #[arg(short, long)]
        map: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up the area id at a world position
    #[command(allow_negative_numbers = true)]
    Query {
        x: f64,
        z: f64,

        #[arg(short, long)]
        map: Option<PathBuf>,
    },
    /// Rewrite every segment of one area id to another
    Replace {
        old: u16,
        new: u16,

        #[arg(short, long)]
        map: Option<PathBuf>,

        /// Output file (defaults to `paths.output`, then the input map)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Re-encode the map in another byte order
    Convert {
        #[arg(long, value_enum)]
        order: Order,

        #[arg(short, long)]
        map: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List placements that fall inside the given areas
    Filter {
        /// Area ids to keep
        #[arg(short, long = "area", required = true)]
        areas: Vec<u16>,

        #[arg(short, long)]
        map: Option<PathBuf>,

        /// JSON array of placements with a `Translate` field
        #[arg(short, long)]
        placements: Option<PathBuf>,

        /// Write the matching `[x, z]` pairs here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Order {
    Big,
    Little,
}

impl From<Order> for ByteOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Big => ByteOrder::Big,
            Order::Little => ByteOrder::Little,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(&args.config)?;
    init_logging(&config.logging.level);
    tracing::debug!(config = %args.config.display(), "Configuration loaded");

    match args.command {
        Command::Info { map, json } => {
            let path = commands::resolve_path(map, &config.paths.map, "map")?;
            let info = commands::info(&commands::open_map(&path, &config)?)?;
            if json {
                println!("{}", beco_io::to_json_pretty(&info)?);
            } else {
                println!("{info}");
            }
        }
        Command::Query { x, z, map } => {
            let path = commands::resolve_path(map, &config.paths.map, "map")?;
            let beco = commands::open_map(&path, &config)?;
            println!("{}", commands::query(&beco, x, z)?);
        }
        Command::Replace {
            old,
            new,
            map,
            output,
        } => {
            let path = commands::resolve_path(map, &config.paths.map, "map")?;
            let output = output
                .or_else(|| config.paths.output.clone())
                .unwrap_or_else(|| path.clone());
            let mut beco = commands::open_map(&path, &config)?;
            let rewritten = commands::replace(&mut beco, old, new, &output)?;
            println!("Rewrote {rewritten} segments ({old} -> {new}) into {}", output.display());
        }
        Command::Convert { order, map, output } => {
            let path = commands::resolve_path(map, &config.paths.map, "map")?;
            let output = commands::resolve_path(output, &config.paths.output, "output")?;
            let beco = commands::open_map(&path, &config)?;
            let converted = commands::convert(&beco, order.into(), &output)?;
            println!("{}", converted.fingerprint());
        }
        Command::Filter {
            areas,
            map,
            placements,
            output,
        } => {
            let path = commands::resolve_path(map, &config.paths.map, "map")?;
            let placements_path =
                commands::resolve_path(placements, &config.paths.placements, "placements")?;
            let beco = commands::open_map(&path, &config)?;
            let placements = beco_io::load_placements(&placements_path)?;
            let matches = commands::filter(&beco, &placements, &areas, output.as_deref())?;
            if output.is_none() {
                println!("{}", beco_io::to_json_pretty(&matches.points)?);
            }
            if matches.skipped > 0 {
                eprintln!("{} placements lie outside the map", matches.skipped);
            }
        }
    }

    Ok(())
}
