//! `send` command implementation.

use anyhow::{Context, Result};
use tracing::{debug, info};

use contracts::{DestinationSelector, UploadRequest};
use dispatcher::{build_registry, DispatchCoordinator};

use crate::cli::{OutputFormat, SendArgs};

/// Execute the `send` command
pub async fn run_send(args: &SendArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading upload plan");

    // Validate plan path
    if !args.config.exists() {
        anyhow::bail!("Upload plan not found: {}", args.config.display());
    }

    // Load and parse the plan
    let plan = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load plan from {}", args.config.display()))?;

    info!(
        destinations = plan.destinations.len(),
        file = %args.file.display(),
        "Plan loaded"
    );

    // Build the request; the selector defaults to all destinations when
    // no --dest flags were given
    let request = UploadRequest::new(&args.file)
        .with_context(|| format!("Invalid upload file {}", args.file.display()))?
        .with_display_name(args.name.clone().unwrap_or_default())
        .with_recipients(args.recipient.iter().cloned());
    let selector = DestinationSelector::from(args.dest.clone());

    // Assemble the engine and run
    let registry = build_registry(&plan);
    let coordinator = DispatchCoordinator::new(registry);

    let report = coordinator.run(request, &selector).await?;
    let all_succeeded = report.all_succeeded();

    match args.output {
        OutputFormat::Text => {
            let (_, lines) = report.summarize();
            for line in lines {
                println!("{line}");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    for (destination, metrics) in coordinator.registry().metrics() {
        debug!(
            destination = %destination,
            attempts = metrics.attempt_count,
            successes = metrics.success_count,
            failures = metrics.failure_count,
            "Backend metrics"
        );
    }

    coordinator.into_registry().shutdown().await;

    if all_succeeded {
        info!("Multisend finished");
        Ok(())
    } else {
        anyhow::bail!("One or more destinations failed")
    }
}
