//! # Schema Subcommands
//!
//! `olcat check-schema` runs the Draft 2020-12 meta-schema check over schema
//! files; `olcat schema` prints generated schemas, the identifiers the
//! configured registry answers, and the drift report between the generated
//! and hand-authored item schema.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::Value;

use olcat_schema::codegen::{
    array_container_schema, constraint_drift, item_schema, keyed_container_schema,
    PropertyNames, ARRAY_SCHEMA_ID, CONTAINER_KEY, CONTAINER_SCHEMA_ID, ITEM_SCHEMA_ID,
};
use olcat_schema::store::{load_checked, load_document};
use olcat_core::IdentifierKind;
use olcat_schema::{check_schema_document, SchemaDocument, SchemaRegistry};

use crate::config::OlcatConfig;

/// Arguments for the `olcat check-schema` subcommand.
#[derive(Args, Debug)]
pub struct CheckSchemaArgs {
    /// Schema file to check (JSON or YAML).
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Top-level key wrapping the schema in a YAML file.
    #[arg(long, value_name = "KEY")]
    pub root_key: Option<String>,

    /// Check every configured schema source (the default without PATH).
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the `olcat schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub command: SchemaCommand,
}

/// What to print.
#[derive(Subcommand, Debug)]
pub enum SchemaCommand {
    /// Item schema with wire aliases as property names.
    Item,
    /// Item schema with internal field names.
    ItemInternal,
    /// Keyed container schema.
    Container,
    /// Legacy array container schema.
    Array,
    /// Identifiers the configured registry answers, with their spelling.
    Registry,
    /// Differences between the generated and a hand-authored item schema.
    Drift {
        /// Authored schema (default: the configured YAML item source).
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Top-level key wrapping the schema in a YAML file.
        #[arg(long, value_name = "KEY")]
        root_key: Option<String>,
    },
}

/// Execute the check-schema subcommand.
///
/// Returns exit code: 0 if every checked schema is valid, 1 otherwise.
pub fn run_check_schema(
    args: &CheckSchemaArgs,
    config: &OlcatConfig,
    repo_root: &Path,
) -> Result<u8> {
    let mut failed = 0usize;
    let mut checked = 0usize;

    if let Some(path) = &args.path {
        let path = crate::resolve_path(path, repo_root);
        let root_key = args
            .root_key
            .clone()
            .or_else(|| config.source_for(&path).and_then(|s| s.root_key.clone()));
        checked += 1;
        let outcome = load_document(&path, root_key.as_deref())
            .map_err(anyhow::Error::from)
            .and_then(|doc| check_schema_document(&doc).map_err(anyhow::Error::from));
        if !report(&path, outcome) {
            failed += 1;
        }
    }

    if args.all || args.path.is_none() {
        let dir = config.schema_dir(repo_root);
        for source in &config.sources {
            checked += 1;
            let outcome = load_checked(&dir, source).map(|_| ()).map_err(anyhow::Error::from);
            if !report(&dir.join(&source.file), outcome) {
                failed += 1;
            }
        }
    }

    println!("Schemas: {}/{checked} valid", checked - failed);
    Ok(u8::from(failed > 0))
}

fn report(path: &Path, outcome: Result<()>) -> bool {
    match outcome {
        Ok(()) => {
            println!("OK: {} is a valid Draft 2020-12 schema", path.display());
            true
        }
        Err(e) => {
            println!("FAIL: {e:#}");
            false
        }
    }
}

/// Execute the schema subcommand.
///
/// Printing always succeeds with 0; `drift` returns 1 when the schemas
/// disagree.
pub fn run_schema(args: &SchemaArgs, config: &OlcatConfig, repo_root: &Path) -> Result<u8> {
    let generated = match &args.command {
        SchemaCommand::Item => item_schema(ITEM_SCHEMA_ID, PropertyNames::Alias),
        SchemaCommand::ItemInternal => item_schema(ITEM_SCHEMA_ID, PropertyNames::Internal),
        SchemaCommand::Container => keyed_container_schema(CONTAINER_SCHEMA_ID, CONTAINER_KEY),
        SchemaCommand::Array => array_container_schema(ARRAY_SCHEMA_ID, ITEM_SCHEMA_ID),
        SchemaCommand::Registry => {
            let registry = config.registry(repo_root)?;
            for line in registry_listing(&registry) {
                println!("{line}");
            }
            return Ok(0);
        }
        SchemaCommand::Drift { path, root_key } => {
            let authored = load_authored(path.as_deref(), root_key.as_deref(), config, repo_root)?;
            return Ok(print_drift(&authored));
        }
    };
    println!("{}", serde_json::to_string_pretty(&generated)?);
    Ok(0)
}

/// One `kind  identifier -> label` line per registry entry.
fn registry_listing(registry: &SchemaRegistry) -> Vec<String> {
    registry
        .identifiers()
        .map(|id| {
            let target = registry.resolve(id).map(|doc| doc.label()).unwrap_or_default();
            format!("{:<4}  {id} -> {target}", IdentifierKind::of(id))
        })
        .collect()
}

fn load_authored(
    path: Option<&Path>,
    root_key: Option<&str>,
    config: &OlcatConfig,
    repo_root: &Path,
) -> Result<SchemaDocument> {
    let (path, root_key) = match path {
        Some(path) => {
            let path = crate::resolve_path(path, repo_root);
            let key = root_key
                .map(str::to_string)
                .or_else(|| config.source_for(&path).and_then(|s| s.root_key.clone()));
            (path, key)
        }
        None => {
            let source = config
                .sources
                .iter()
                .find(|s| s.root_key.is_some())
                .context("no hand-authored item schema configured")?;
            (config.schema_dir(repo_root).join(&source.file), source.root_key.clone())
        }
    };
    load_document(&path, root_key.as_deref())
        .with_context(|| format!("failed to load {}", path.display()))
}

fn print_drift(authored: &SchemaDocument) -> u8 {
    let generated: Value = item_schema(ITEM_SCHEMA_ID, PropertyNames::Alias);
    let drift = constraint_drift(&generated, &authored.to_value());
    if drift.is_empty() {
        println!("OK: {} matches the record model", authored.label());
        return 0;
    }
    println!("FAIL: {} drifts from the record model:", authored.label());
    for d in &drift {
        println!("  {d}");
    }
    1
}
