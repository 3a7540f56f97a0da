use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use shelf_packer::generate::{GenerateConfig, generate};
use shelf_packer::render;
use shelf_packer::{ItemSpec, OverflowPolicy, Packer, PackingInput, PackingResult, Strategy};
use tracing::Level;

#[derive(Parser)]
#[command(name = "shelf_packer", about = "Shelf-based strip packing of rectangles")]
struct Cli {
    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pack rectangles into levels of a fixed-width bin
    Pack(PackArgs),
    /// Write a random input file
    Generate(GenerateArgs),
    /// Render a previously saved packing result
    Show(ShowArgs),
}

#[derive(clap::Args)]
struct PackArgs {
    /// Input JSON file ({"width_of_bin": .., "rectangle_list": [..]})
    #[arg(long, conflicts_with_all = ["bin_width", "items"])]
    input: Option<PathBuf>,

    /// Bin width, when not reading an input file
    #[arg(long, requires = "items")]
    bin_width: Option<i64>,

    /// Rectangles as WxH:qty (e.g. 6x4:1 5x3:2)
    #[arg(long, num_args = 1.., requires = "bin_width")]
    items: Vec<String>,

    /// Strategy: naive, next-fit, or first-fit
    #[arg(long, default_value = "first-fit", value_parser = parse_strategy)]
    strategy: Strategy,

    /// Keep rectangles wider than the bin instead of rejecting them
    #[arg(long)]
    allow_overflow: bool,

    /// Output JSON file (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Show ASCII layout of the bin
    #[arg(long)]
    layout: bool,

    /// Print height, level count and waste
    #[arg(long)]
    summary: bool,
}

#[derive(clap::Args)]
struct GenerateArgs {
    #[arg(long)]
    bin_width: u64,

    /// Number of distinct rectangle types
    #[arg(long)]
    types: u64,

    /// Total number of rectangles
    #[arg(long)]
    count: u64,

    #[arg(long, default_value_t = 1)]
    min_height: u64,

    #[arg(long)]
    max_height: u64,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Existing rectangles to keep, as WxH:qty
    #[arg(long, num_args = 1..)]
    items: Vec<String>,

    /// Output JSON file (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct ShowArgs {
    /// Result JSON file written by `pack`
    result: PathBuf,
}

fn parse_strategy(s: &str) -> Result<Strategy, String> {
    s.parse()
}

fn parse_item(s: &str) -> Result<ItemSpec, String> {
    let (dims, qty) = s
        .split_once(':')
        .ok_or_else(|| format!("invalid item '{}', expected WxH:qty", s))?;
    let (w, h) = dims
        .split_once('x')
        .ok_or_else(|| format!("invalid dimensions '{}', expected WxH", dims))?;
    let width = w
        .parse::<i64>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let height = h
        .parse::<i64>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    let quantity = qty
        .parse::<i64>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    Ok(ItemSpec::new(width, height, quantity))
}

fn parse_items(items: &[String]) -> Result<Vec<ItemSpec>, String> {
    items.iter().map(|s| parse_item(s)).collect()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&contents).map_err(|e| format!("invalid JSON in {}: {}", path.display(), e))
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&Path>) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .map_err(|e| format!("cannot write {}: {}", path.display(), e))?;
            eprintln!("Saved to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_pack(args: PackArgs) -> Result<(), String> {
    let input = match (&args.input, args.bin_width) {
        (Some(path), _) => read_json(path)?,
        (None, Some(bin_width)) => PackingInput::new(bin_width, parse_items(&args.items)?),
        (None, None) => return Err("either --input or --bin-width with --items is required".into()),
    };

    let overflow = if args.allow_overflow {
        OverflowPolicy::Allow
    } else {
        OverflowPolicy::Reject
    };
    let result = Packer::new(args.strategy)
        .with_overflow_policy(overflow)
        .pack(&input)
        .map_err(|e| e.to_string())?;

    if result.has_overflow() {
        tracing::warn!("some rectangles are wider than the bin");
    }

    write_json(&result, args.output.as_deref())?;

    if args.layout {
        eprint!("{}", render::render_packing(&result));
    }
    if args.summary {
        eprintln!("{} ({})", summary(&result), args.strategy);
    }
    Ok(())
}

fn summary(result: &PackingResult) -> String {
    format!(
        "Summary: total height {}, {} rectangle{} on {} level{}, {:.1}% waste",
        result.total_height,
        result.placements.len(),
        if result.placements.len() == 1 { "" } else { "s" },
        result.level_count(),
        if result.level_count() == 1 { "" } else { "s" },
        result.waste_percent(),
    )
}

fn run_show(args: ShowArgs) -> Result<(), String> {
    let result: PackingResult = read_json(&args.result)?;
    for (i, p) in result.placements.iter().enumerate() {
        let flag = if p.overflows { " [overflow]" } else { "" };
        println!("  {:>3}: {} @ ({}, {}){}", i + 1, p.item(), p.x, p.y, flag);
    }
    print!("{}", render::render_packing(&result));
    println!("{}", summary(&result));
    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let seed = args.seed.unwrap_or_else(rand::random);
    eprintln!("Seed: {seed}");
    let config = GenerateConfig {
        bin_width: args.bin_width,
        types: args.types,
        count: args.count,
        min_height: args.min_height,
        max_height: args.max_height,
        seed: Some(seed),
    };
    let seeds = parse_items(&args.items)?;
    let input = generate(&config, &seeds).map_err(|e| e.to_string())?;
    write_json(&input, args.output.as_deref())
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let outcome = match cli.command {
        Command::Pack(args) => run_pack(args),
        Command::Generate(args) => run_generate(args),
        Command::Show(args) => run_show(args),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
