//! Decrypt command handler.

use anyhow::{Context, Result};

use crate::cli::DecryptArgs;
use crate::cli::config::Config;

pub fn handle_decrypt(args: &DecryptArgs, config: &Config) -> Result<()> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let value = config
        .codec()
        .decrypt(&bytes, &args.passphrase)
        .with_context(|| format!("failed to decrypt {}", args.file.display()))?;

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
