//! fsimage parser
//!
//! Decodes an fsimage checkpoint and prints its namespace summary

use anyhow::Context;
use clap::Parser;
use fsimage_rs::{
    child_counts, name_frequencies, ChildCount, DecodeOptions, EntityCount, FsImage, NameCount,
    SectionDescriptor,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fsimage-parse")]
#[command(about = "Decode an fsimage checkpoint and print its namespace")]
struct Args {
    /// Path to the fsimage file
    image: PathBuf,

    /// TOML file with decode options
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Number of decoded paths to print
    #[arg(short = 'n', long, default_value = "10")]
    samples: usize,

    /// Print the N most common names and largest directories
    #[arg(long, default_value = "0")]
    top: usize,

    /// Also print paths of directories that have children
    #[arg(long)]
    include_directories: bool,

    /// Leave empty directories out of the path list
    #[arg(long)]
    exclude_empty_dirs: bool,

    /// Fail on unknown inode kinds instead of warning
    #[arg(long)]
    strict_kinds: bool,

    /// Deepest namespace nesting accepted
    #[arg(long)]
    max_depth: Option<usize>,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    image: &'a std::path::Path,
    root_id: u64,
    layout_version: u32,
    counts: EntityCount,
    node_count: usize,
    path_count: usize,
    sample_paths: &'a [String],
    sections: Vec<&'a SectionDescriptor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    top_names: Vec<NameCount>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    top_parents: Vec<ChildCount>,
}

fn options_from(args: &Args) -> anyhow::Result<DecodeOptions> {
    let mut options = match &args.config {
        Some(path) => DecodeOptions::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DecodeOptions::default(),
    };

    if args.include_directories {
        options = options.include_directories(true);
    }
    if args.exclude_empty_dirs {
        options = options.include_empty_dirs(false);
    }
    if args.strict_kinds {
        options = options.strict_kinds(true);
    }
    if let Some(max_depth) = args.max_depth {
        options = options.max_depth(max_depth);
    }
    Ok(options)
}

fn run(args: Args) -> anyhow::Result<()> {
    let options = options_from(&args)?;
    info!("Decoding {:?}", args.image);

    let image = FsImage::open_with(&args.image, options)
        .with_context(|| format!("failed to decode {}", args.image.display()))?;
    let paths = image.paths();
    let sample = &paths[..paths.len().min(args.samples)];

    let (top_names, top_parents) = if args.top > 0 {
        let mut names = name_frequencies(image.nodes());
        names.truncate(args.top);
        let mut parents = child_counts(image.adjacency());
        parents.truncate(args.top);
        (names, parents)
    } else {
        (Vec::new(), Vec::new())
    };

    let report = Report {
        image: &args.image,
        root_id: image.options().root_id,
        layout_version: image.summary().layout_version,
        counts: image.counts(),
        node_count: image.node_count(),
        path_count: paths.len(),
        sample_paths: sample,
        sections: image.sections().iter().collect(),
        top_names,
        top_parents,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &Report<'_>) {
    println!("Root INode ID: {}", report.root_id);
    println!("Total Number of Files: {}", report.counts.files);
    println!("Total Number of Directories: {}", report.counts.directories);
    println!("Total Number of Symlinks: {}", report.counts.symlinks);
    if report.counts.unknown > 0 {
        println!("Total Number of Unknown Inodes: {}", report.counts.unknown);
    }
    println!("Total Number of Nodes: {}", report.node_count);
    println!("No of Paths: {}", report.path_count);

    println!("First {} paths", report.sample_paths.len());
    for path in report.sample_paths {
        println!("  {}", path);
    }

    if !report.top_names.is_empty() {
        println!("Most common names");
        for entry in &report.top_names {
            println!("  {:>10}  {}", entry.count, entry.name);
        }
        println!("Largest directories");
        for entry in &report.top_parents {
            println!("  {:>10}  {}", entry.children, entry.parent);
        }
    }

    println!("Sections");
    for section in &report.sections {
        println!(
            "  {:<24} offset {:>12}  length {:>12}",
            section.name, section.offset, section.length
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
