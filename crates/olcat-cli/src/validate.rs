//! # Validate Subcommand
//!
//! Checks an exported payload file against the schema registry. The file
//! is read as UTF-8 with an optional byte order mark; its shape (array or
//! single-key object) is detected from the content, and the version tag
//! that shape implies is reported.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde_json::Value;

use olcat_core::{inspect, SchemaVersion, ShapeError};
use olcat_schema::store::read_text;
use olcat_schema::{ValidationError, Validator};

use crate::config::OlcatConfig;

/// Arguments for the `olcat validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Exported payload (list or keyed JSON).
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Fail unless the payload has this version's shape (`array/1`, `keyed/2`).
    #[arg(long, value_name = "TAG")]
    pub expect_version: Option<String>,
}

fn parse_version(tag: &str) -> Result<SchemaVersion> {
    match SchemaVersion::from_tag(tag) {
        Some(version) => Ok(version),
        None => {
            let known: Vec<&str> = SchemaVersion::ALL.iter().map(|v| v.tag()).collect();
            bail!("unknown version tag '{tag}' (known: {})", known.join(", "))
        }
    }
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 on success, 1 on validation failure. Schema
/// configuration problems are errors.
pub fn run_validate(args: &ValidateArgs, config: &OlcatConfig, repo_root: &Path) -> Result<u8> {
    let expected = args.expect_version.as_deref().map(parse_version).transpose()?;
    let path = crate::resolve_path(&args.path, repo_root);
    let text = read_text(&path)?;
    let payload: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            println!("FAIL: {}: invalid JSON: {e}", path.display());
            return Ok(1);
        }
    };

    if let (Some(expected), Ok(view)) = (expected, inspect(&payload)) {
        if expected.shape() != view.shape {
            let mismatch = ShapeError::VersionMismatch {
                version: expected.tag().to_string(),
                expected: expected.shape().as_str(),
                found: view.shape.as_str(),
            };
            println!("FAIL: {}: shape error: {mismatch}", path.display());
            return Ok(1);
        }
    }

    let registry = config.registry(repo_root)?;
    let validator = Validator::new(config.entry_points());
    match validator.validate_value(&payload, &registry) {
        Ok(()) => {
            let view = inspect(&payload)?;
            let version = SchemaVersion::for_shape(view.shape);
            println!(
                "OK: {} ({version}, {} categories)",
                path.display(),
                view.items.len()
            );
            Ok(0)
        }
        Err(e @ (ValidationError::NonConforming(_) | ValidationError::Shape(_))) => {
            println!("FAIL: {}: {e}", path.display());
            Ok(1)
        }
        Err(e) => Err(e).context("schema configuration error"),
    }
}
