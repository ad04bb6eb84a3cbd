use crate::config::load_config;
use crate::layout::compute_layout;
use crate::layout_dump::{LayoutDocument, LayoutDump, write_layout_dump};
use anyhow::Result;
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "rgl", version, about = "Hierarchical layout for RAN/core network graphs")]
pub struct Args {
    /// Input graph JSON ({ nodes, edges }) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout config file (JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Horizontal margin added after centring
    #[arg(long = "marginX")]
    pub margin_x: Option<f32>,

    /// Top margin
    #[arg(long = "marginY")]
    pub margin_y: Option<f32>,

    /// Spread siblings by subtree weight
    #[arg(long = "balance")]
    pub balance: bool,

    /// Pretty-print the output JSON
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    if let Some(margin_x) = args.margin_x {
        config.layout.margin_x = margin_x;
    }
    if let Some(margin_y) = args.margin_y {
        config.layout.margin_y = margin_y;
    }
    if args.balance {
        config.layout.balance_by_subtree = true;
    }

    let input = read_input(args.input.as_deref())?;
    let document = LayoutDocument::from_json(&input)
        .map_err(|err| anyhow::anyhow!("invalid graph document: {err}"))?;
    log::info!(
        "laying out {} node(s), {} edge(s)",
        document.nodes.len(),
        document.edges.len()
    );

    let result = compute_layout(&document.nodes, &document.edges, &config.layout);
    if result.removed_edges > 0 {
        log::info!("dropped {} dangling edge(s)", result.removed_edges);
    }
    let dump = LayoutDump::from_result(result, document.extra);
    write_layout_dump(args.output.as_deref(), &dump, args.pretty)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    let _ = env_logger::builder()
        .format_timestamp(None)
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
