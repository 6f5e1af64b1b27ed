use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use glob::glob;
use onvista_extract::{
    extract_index, extract_stock, read_stocks, DumpStorage, IndexGroup, RunContext, Stock,
};
use rayon::prelude::*;
use serde::Serialize;
use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "onvista-extract")]
#[command(about = "Extract stock and index metrics from a local onvista dump")]
struct Args {
    /// Root of the dump (one folder per index)
    #[arg(long, default_value = "dump")]
    dump_root: PathBuf,

    /// Index to extract; repeatable. Defaults to every index found in the dump
    #[arg(long = "index")]
    indices: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Reference date as DD.MM.YYYY (default: today)
    #[arg(long, value_parser = parse_day)]
    today: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

#[derive(Serialize)]
struct IndexReport {
    index: IndexGroup,
    stocks: Vec<Stock>,
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%d.%m.%Y").map_err(|e| format!("{}: {}", s, e))
}

/// Index names that have a `<name>/<name>.list.html` under `root`.
fn discover_indices(root: &Path) -> Result<Vec<String>> {
    let pattern = format!("{}/*/*.list.html", root.display());
    let mut names = Vec::new();
    for entry in glob(&pattern).with_context(|| format!("invalid glob pattern '{}'", pattern))? {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                warn!("cannot read glob entry: {}", e);
                continue;
            }
        };
        let stem = path
            .file_name()
            .and_then(|f| f.to_str())
            .and_then(|f| f.strip_suffix(".list.html"));
        let folder = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|f| f.to_str());
        if let (Some(stem), Some(folder)) = (stem, folder) {
            if stem == folder {
                names.push(stem.to_owned());
            }
        }
    }
    names.sort();
    Ok(names)
}

fn extract_one_index(root: &Path, name: &str, ctx: &RunContext) -> Result<IndexReport> {
    let storage = DumpStorage::for_index(root, name);
    let mut index = IndexGroup::new(name);

    read_stocks(&mut index, &storage)
        .with_context(|| format!("reading constituents of {}", name))?;
    extract_index(&mut index, &storage, ctx)
        .with_context(|| format!("reading prices of {}", name))?;

    let stocks: Vec<Stock> = index
        .stocks
        .par_iter()
        .filter_map(|entry| {
            let storage = DumpStorage::for_stock(root, name, &entry.id);
            match extract_stock(Stock::from(entry), &storage, ctx) {
                Ok(stock) => Some(stock),
                Err(e) => {
                    error!(index = name, stock = %entry.id, "skipping stock: {}", e);
                    None
                }
            }
        })
        .collect();

    info!(
        index = name,
        listed = index.stocks.len(),
        extracted = stocks.len(),
        "index done"
    );
    Ok(IndexReport { index, stocks })
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let ctx = args.today.map(RunContext::new).unwrap_or_else(RunContext::now);
    info!(today = %ctx.today, root = %args.dump_root.display(), "startup");

    let names = if args.indices.is_empty() {
        discover_indices(&args.dump_root)?
    } else {
        args.indices.clone()
    };
    if names.is_empty() {
        anyhow::bail!("no indices found under '{}'", args.dump_root.display());
    }

    let mut reports = Vec::with_capacity(names.len());
    for name in &names {
        match extract_one_index(&args.dump_root, name, &ctx) {
            Ok(report) => reports.push(report),
            Err(e) => error!("index {} failed: {:#}", name, e),
        }
    }

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    match args.format {
        Format::Json => serde_json::to_writer_pretty(&mut out, &reports)?,
        Format::Yaml => serde_yaml::to_writer(&mut out, &reports)?,
    }
    writeln!(out)?;

    info!(indices = reports.len(), "wrote report");
    Ok(())
}
