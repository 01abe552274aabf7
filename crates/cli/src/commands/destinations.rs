//! `destinations` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::DestinationsArgs;

/// Roster listing for JSON output
#[derive(Serialize)]
struct RosterEntry {
    id: String,
    kind: &'static str,
}

/// Execute the `destinations` command
pub fn run_destinations(args: &DestinationsArgs) -> Result<()> {
    info!(config = %args.config.display(), "Listing destinations");

    if !args.config.exists() {
        anyhow::bail!("Upload plan not found: {}", args.config.display());
    }

    let plan = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load plan from {}", args.config.display()))?;

    let roster: Vec<RosterEntry> = plan
        .destinations
        .iter()
        .map(|d| RosterEntry {
            id: d.id.clone(),
            kind: d.backend.kind(),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&roster)?);
    } else if roster.is_empty() {
        println!("No destinations configured.");
    } else {
        for entry in &roster {
            println!("{}  ({})", entry.id, entry.kind);
        }
    }

    Ok(())
}
