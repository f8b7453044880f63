//! # Export Subcommand
//!
//! Turns raw collector output (an array of alias-keyed mappings) into a
//! validated category container and writes it to disk.
//!
//! Records are normalized through the record model, wrapped in the
//! requested shape, and checked against the schema registry before
//! anything is written. A numeric `ClassName` from the collector is
//! resolved to its class name first.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use olcat_core::{resolve_class_name, CategoryContainer, CategoryRecord};
use olcat_schema::{ValidationError, Validator};

use crate::config::{OlcatConfig, OutputShape};

/// Arguments for the `olcat export` subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Raw collector output (JSON array of records); `-` reads stdin.
    #[arg(long, short, value_name = "PATH")]
    pub input: PathBuf,

    /// Container shape to write (default from config: map).
    #[arg(long, value_enum)]
    pub shape: Option<OutputShape>,

    /// Drop the Application/Session detail fields.
    #[arg(long)]
    pub simplified: bool,

    /// Output file (default: `categories-YYYYMMDD.json` in the current directory).
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Execute the export subcommand.
///
/// Returns exit code: 0 on success, 1 if a record or the container fails
/// validation. Unreadable input and schema problems are errors.
pub fn run_export(args: &ExportArgs, config: &OlcatConfig, repo_root: &Path) -> Result<u8> {
    let text = read_input(&args.input)?;
    let raw: Value = serde_json::from_str(text.trim_start_matches('\u{feff}'))
        .with_context(|| format!("input {} is not valid JSON", args.input.display()))?;
    let Value::Array(items) = raw else {
        bail!("input {} must be a JSON array of records", args.input.display());
    };

    let simplified = args.simplified || config.export.simplified;
    let mut records = Vec::with_capacity(items.len());
    for (index, mut item) in items.into_iter().enumerate() {
        normalize_class_name(&mut item);
        match CategoryRecord::from_value(&item) {
            Ok(record) if simplified => records.push(record.simplified()),
            Ok(record) => records.push(record),
            Err(e) => {
                println!("FAIL: record [{index}]: {e}");
                return Ok(1);
            }
        }
    }

    let registry = config.registry(repo_root)?;
    let validator = Validator::new(config.entry_points());
    let container = match args.shape.unwrap_or(config.export.shape) {
        OutputShape::List => CategoryContainer::from_list(records),
        OutputShape::Map => {
            let key = validator
                .expected_key(&registry)
                .context("cannot determine the container key")?;
            CategoryContainer::from_map(key, records)?
        }
    };

    match validator.validate(&container, &registry) {
        Ok(()) => {}
        Err(e @ (ValidationError::NonConforming(_) | ValidationError::Shape(_))) => {
            println!("FAIL: {e}");
            return Ok(1);
        }
        Err(e) => return Err(e).context("schema configuration error"),
    }

    let output = args.output.clone().unwrap_or_else(|| {
        default_output_name(&config.export.file_prefix, chrono::Local::now().date_naive())
    });
    let mut body = serde_json::to_string_pretty(&container.to_value())?;
    body.push('\n');
    std::fs::write(&output, body)
        .with_context(|| format!("failed to write {}", output.display()))?;

    tracing::info!(
        records = container.len(),
        version = container.version().tag(),
        output = %output.display(),
        "export complete"
    );
    println!(
        "OK: exported {} categories ({}) to {}",
        container.len(),
        container.version().tag(),
        output.display()
    );
    Ok(0)
}

/// `<prefix>-YYYYMMDD.json`.
pub fn default_output_name(prefix: &str, date: NaiveDate) -> PathBuf {
    PathBuf::from(format!("{prefix}-{}.json", date.format("%Y%m%d")))
}

/// Replace a numeric `ClassName` with the class name it denotes.
pub fn normalize_class_name(item: &mut Value) {
    if let Some(map) = item.as_object_mut() {
        if let Some(code) = map.get("ClassName").and_then(Value::as_i64) {
            map.insert("ClassName".to_string(), Value::String(resolve_class_name(code)));
        }
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repo_root() -> PathBuf {
        let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        dir.pop(); // crates/
        dir.pop(); // repo root
        dir
    }

    fn raw_record(color: Value, class_name: Value) -> Value {
        json!({
            "Account": "user@example.com",
            "CategoryID": "{0A1B2C3D-4E5F-6789-ABCD-EF0123456789}",
            "Color": color,
            "Name": "Red category",
            "ClassName": class_name,
            "Application": {"Name": "Outlook", "Version": "16.0.0.0"},
            "Session": {"CurrentUser": "Alice", "DefaultStore": "alice@example.com"}
        })
    }

    fn export_to(dir: &Path, input: Value, shape: OutputShape, simplified: bool) -> (u8, PathBuf) {
        let input_path = dir.join("raw.json");
        std::fs::write(&input_path, input.to_string()).unwrap();
        let output = dir.join("out.json");
        let args = ExportArgs {
            input: input_path,
            shape: Some(shape),
            simplified,
            output: Some(output.clone()),
        };
        let code = run_export(&args, &OlcatConfig::default(), &repo_root()).unwrap();
        (code, output)
    }

    #[test]
    fn default_output_name_uses_local_date_format() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 17).unwrap();
        assert_eq!(
            default_output_name("categories", date),
            PathBuf::from("categories-20250517.json")
        );
    }

    #[test]
    fn numeric_class_name_is_resolved() {
        let mut item = json!({"ClassName": 152});
        normalize_class_name(&mut item);
        assert_eq!(item["ClassName"], json!("olCategory"));
        let mut item = json!({"ClassName": 9});
        normalize_class_name(&mut item);
        assert_eq!(item["ClassName"], json!("Unknown(9)"));
        let mut item = json!({"ClassName": "olCategory"});
        normalize_class_name(&mut item);
        assert_eq!(item["ClassName"], json!("olCategory"));
    }

    #[test]
    fn export_map_shape_writes_keyed_container() {
        let tmp = tempfile::tempdir().unwrap();
        let input = json!([raw_record(json!(7), json!(152))]);
        let (code, output) = export_to(tmp.path(), input, OutputShape::Map, false);
        assert_eq!(code, 0);
        let written: Value = serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
        let map = written.as_object().unwrap();
        assert_eq!(map.len(), 1);
        let records = map.values().next().unwrap().as_array().unwrap();
        assert_eq!(records[0]["Color"], json!(7));
        assert_eq!(records[0]["Application.Name"], json!("Outlook"));
    }

    #[test]
    fn export_list_shape_simplified_drops_detail() {
        let tmp = tempfile::tempdir().unwrap();
        let input = json!([raw_record(json!(1), json!("olCategory"))]);
        let (code, output) = export_to(tmp.path(), input, OutputShape::List, true);
        assert_eq!(code, 0);
        let written: Value = serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
        let record = &written.as_array().unwrap()[0];
        assert!(record.get("Application.Name").is_none());
        assert_eq!(record["Name"], json!("Red category"));
    }

    #[test]
    fn export_invalid_record_fails_without_writing() {
        let tmp = tempfile::tempdir().unwrap();
        let input = json!([raw_record(json!(99), json!(152))]);
        let (code, output) = export_to(tmp.path(), input, OutputShape::Map, false);
        assert_eq!(code, 1);
        assert!(!output.exists());
    }

    #[test]
    fn export_unknown_class_code_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let input = json!([raw_record(json!(3), json!(153))]);
        let (code, _) = export_to(tmp.path(), input, OutputShape::List, false);
        assert_eq!(code, 1);
    }

    #[test]
    fn export_non_array_input_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let input_path = tmp.path().join("raw.json");
        std::fs::write(&input_path, "{}").unwrap();
        let args = ExportArgs {
            input: input_path,
            shape: None,
            simplified: false,
            output: Some(tmp.path().join("out.json")),
        };
        assert!(run_export(&args, &OlcatConfig::default(), &repo_root()).is_err());
    }
}
