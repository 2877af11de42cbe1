//! Check command handler.

use anyhow::{Result, bail};

use super::load_schema;
use crate::cli::CheckArgs;
use crate::cli::config::Config;
use crate::cli::output::{CheckResult, Output, OutputFormat};
use crate::harness::{load_result, validate_document};

pub fn handle_check(args: &CheckArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let schema = load_schema(config.schema(args.schema.as_ref()).as_deref())?;
    let codec = config.codec();

    // 1. Decode, then schema and invariants
    let outcome = load_result(&args.file, args.passphrase.as_deref(), &codec)
        .and_then(|value| validate_document(&schema, value));

    let result = match &outcome {
        Ok(document) => CheckResult {
            path: args.file.display().to_string(),
            ok: true,
            encrypted: Some(document.encrypted()),
            notes: Some(document.notes().len()),
            kind: None,
            error: None,
        },
        Err(kind) => CheckResult {
            path: args.file.display().to_string(),
            ok: false,
            encrypted: None,
            notes: None,
            kind: Some(kind.label()),
            error: Some(kind.to_string()),
        },
    };

    // 2. Display results
    match format {
        OutputFormat::Human => match &outcome {
            Ok(document) => println!(
                "{}: OK (encrypted: {}, {} note(s))",
                result.path,
                document.encrypted(),
                document.notes().len()
            ),
            Err(kind) => println!("{}: {}: {}", result.path, kind.label(), kind),
        },
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&Output::new(&result))?);
        }
    }

    // 3. Exit code: fail if the profile is invalid
    if !result.ok {
        bail!("check failed");
    }
    Ok(())
}
