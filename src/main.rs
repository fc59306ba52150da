use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use ruby_outline::config::{load_from_path, ScanConfig};
use ruby_outline::{Node, NodeKind, Outline, Scanner};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ruby-outline")]
#[command(about = "Map the modules, classes and methods of Ruby source", long_about = None)]
#[command(version)]
struct Cli {
    /// Scan settings file (TOML with a [scan] table)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Exclusion regex over paths relative to the scanned directory ("" disables)
    #[arg(short, long, global = true)]
    exclude: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the declaration tree of a file or directory
    Tree {
        path: PathBuf,

        /// Emit JSON instead of an indented listing
        #[arg(long)]
        json: bool,
    },

    /// List declarations with the given name
    Find {
        path: PathBuf,
        name: String,

        /// Only match this kind of declaration
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
    },

    /// Print the numbered source of declarations with the given name
    Show {
        path: PathBuf,
        name: String,

        /// Only match this kind of declaration
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Module,
    Class,
    ClassMethod,
    InstanceMethod,
}

impl From<KindArg> for NodeKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Module => NodeKind::Module,
            KindArg::Class => NodeKind::Class,
            KindArg::ClassMethod => NodeKind::ClassMethod,
            KindArg::InstanceMethod => NodeKind::InstanceMethod,
        }
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let scanner = build_scanner(cli.config.as_deref(), cli.exclude)?;

    match cli.command {
        Commands::Tree { path, json } => cmd_tree(&scanner, &path, json),
        Commands::Find { path, name, kind } => cmd_find(&scanner, &path, &name, kind),
        Commands::Show { path, name, kind } => cmd_show(&scanner, &path, &name, kind),
    }
}

/// Helper: Combine the config file (if any) with command-line overrides.
fn build_scanner(config_path: Option<&Path>, exclude: Option<String>) -> Result<Scanner> {
    let mut config = match config_path {
        Some(path) => load_from_path(path)?.scan,
        None => ScanConfig::default(),
    };
    if let Some(exclude) = exclude {
        config.exclude = exclude;
    }
    Scanner::new(config).context("invalid scan settings")
}

fn scan(scanner: &Scanner, path: &Path) -> Result<Outline> {
    scanner
        .scan(path)
        .with_context(|| format!("failed to scan {}", path.display()))
}

fn matching<'a>(outline: &'a Outline, name: &str, kind: Option<KindArg>) -> Vec<&'a Node> {
    let kind = kind.map(NodeKind::from);
    outline.find_all(|node| {
        node.name() == Some(name) && kind.map_or(true, |kind| node.kind() == kind)
    })
}

fn cmd_tree(scanner: &Scanner, path: &Path, json: bool) -> Result<()> {
    let outline = scan(scanner, path)?;

    if json {
        let report = TreeReport {
            root: NodeReport::from(outline.root()),
            failures: outline
                .failures()
                .iter()
                .map(|f| FailureReport {
                    path: f.path.display().to_string(),
                    error: f.error.to_string(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", outline.root().to_string().bold());
    for child in outline.children() {
        print_node(child, 1, true);
    }
    Ok(())
}

fn print_node(node: &Node, depth: usize, top_level: bool) {
    let indent = "  ".repeat(depth);
    let name = node.name().unwrap_or_default();
    let (first, last) = (
        node.first_line().unwrap_or_default(),
        node.last_line().unwrap_or_default(),
    );
    let location = if top_level {
        format!("{}:{}-{}", node.file_path().display(), first, last)
    } else {
        format!("{}-{}", first, last)
    };

    println!(
        "{}{} {} {}",
        indent,
        node.human_name().cyan(),
        name.bold(),
        location.dimmed()
    );
    for child in node.children() {
        print_node(child, depth + 1, false);
    }
}

fn cmd_find(scanner: &Scanner, path: &Path, name: &str, kind: Option<KindArg>) -> Result<()> {
    let outline = scan(scanner, path)?;
    let matches = matching(&outline, name, kind);

    if matches.is_empty() {
        eprintln!("{}", format!("No declarations named '{}'", name).yellow());
        std::process::exit(1);
    }

    for node in matches {
        println!(
            "{}:{}-{}\t{}\t{}",
            node.file_path().display(),
            node.first_line().unwrap_or_default(),
            node.last_line().unwrap_or_default(),
            node.human_name(),
            node.name().unwrap_or_default()
        );
    }
    Ok(())
}

fn cmd_show(scanner: &Scanner, path: &Path, name: &str, kind: Option<KindArg>) -> Result<()> {
    let outline = scan(scanner, path)?;
    let matches = matching(&outline, name, kind);

    if matches.is_empty() {
        eprintln!("{}", format!("No declarations named '{}'", name).yellow());
        std::process::exit(1);
    }

    for (idx, node) in matches.into_iter().enumerate() {
        if idx > 0 {
            println!();
        }
        println!("{}", format!("==> {}", node).bold());
        for (number, line) in node.source_lines_with_numbers()? {
            println!("{} {}", format!("{:>5} |", number).dimmed(), line);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct TreeReport<'a> {
    root: NodeReport<'a>,
    failures: Vec<FailureReport>,
}

#[derive(Serialize)]
struct FailureReport {
    path: String,
    error: String,
}

#[derive(Serialize)]
struct NodeReport<'a> {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_line: Option<usize>,
    children: Vec<NodeReport<'a>>,
}

impl<'a> From<&'a Node> for NodeReport<'a> {
    fn from(node: &'a Node) -> Self {
        NodeReport {
            kind: node.human_name(),
            name: node.name(),
            file: node.file_path().display().to_string(),
            first_line: node.first_line(),
            last_line: node.last_line(),
            children: node.children().iter().map(NodeReport::from).collect(),
        }
    }
}
