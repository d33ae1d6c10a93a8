//! `ng-target`: resolve an offset in a serialized template tree.
//!
//! Usage:
//!   ng-target <tree.json> <offset> [--path] [--context] [--validate]
//!
//! The tree is a JSON `Render3ParseResult`. The result is printed as JSON,
//! `null` when nothing is under the offset.

use angular_compiler::Render3ParseResult;
use angular_language_service::{PositionResolver, ResolverOptions, TargetNode, TemplateTarget};
use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ng-target")]
#[command(about = "Find the Angular template node at an offset", long_about = None)]
struct Cli {
    /// JSON file holding a parsed template
    tree: PathBuf,

    /// Byte offset into the template text
    offset: usize,

    /// Print every containing node, outermost first
    #[arg(long, conflicts_with = "context")]
    path: bool,

    /// Print the parent and the position context along with the node
    #[arg(long)]
    context: bool,

    /// Check span preconditions before resolving
    #[arg(long)]
    validate: bool,

    /// Resolve microsyntax keywords and punctuation to the binding or
    /// element around them
    #[arg(long)]
    include_punctuation: bool,

    /// Resolver options as JSON
    #[arg(long)]
    options: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut options = match &cli.options {
        Some(path) => ResolverOptions::load(path)
            .with_context(|| format!("loading options from {}", path.display()))?,
        None => ResolverOptions::default(),
    };
    if cli.validate {
        options.validate_spans = true;
    }
    if cli.include_punctuation {
        options.key_value_spans_only = false;
    }

    let content = fs::read_to_string(&cli.tree)
        .with_context(|| format!("reading {}", cli.tree.display()))?;
    let parsed: Render3ParseResult = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", cli.tree.display()))?;

    if parsed.has_errors() {
        log::warn!(
            "{} carries parse errors; spans may not match the template text",
            cli.tree.display()
        );
    }

    let resolver = PositionResolver::new(options);
    // Range and span checks happen once up front; the lookups below are
    // infallible.
    let found = resolver.find_in(&parsed, cli.offset)?;

    let output = if cli.path {
        Value::Array(
            resolver
                .path(&parsed.nodes, cli.offset)
                .iter()
                .map(summary)
                .collect::<Result<_>>()?,
        )
    } else if cli.context {
        match resolver.target(&parsed.nodes, cli.offset) {
            Some(target) => target_json(&target)?,
            None => Value::Null,
        }
    } else {
        match &found {
            Some(node) => summary(node)?,
            None => Value::Null,
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn summary(node: &TargetNode<'_>) -> Result<Value> {
    serde_json::to_value(node.summary()).context("serializing node summary")
}

fn target_json(target: &TemplateTarget<'_>) -> Result<Value> {
    Ok(json!({
        "node": summary(&target.node)?,
        "parent": target.parent.as_ref().map(summary).transpose()?,
        "context": target.context.kind(),
    }))
}
