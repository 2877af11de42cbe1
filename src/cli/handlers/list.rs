//! List command handler.

use anyhow::Result;

use super::load_suites_filtered;
use crate::cli::ListArgs;
use crate::cli::config::Config;
use crate::cli::output::{Output, OutputFormat, SuiteListing};

pub fn handle_list(args: &ListArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let fixtures = config.fixtures(args.fixtures.as_ref());
    let suites = load_suites_filtered(fixtures.as_deref(), args.filter.as_deref())?;

    match format {
        OutputFormat::Human => {
            if suites.is_empty() {
                println!("No tests found.");
                return Ok(());
            }
            let mut total = 0;
            for suite in &suites {
                println!("# {} ({} tests)", suite.title, suite.tests.len());
                for test in &suite.tests {
                    println!("    {}", test.name);
                }
                println!();
                total += suite.tests.len();
            }
            println!("{} test(s)", total);
        }
        OutputFormat::Json => {
            let listings: Vec<SuiteListing> = suites.iter().map(SuiteListing::from).collect();
            let output = Output::new(listings);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
