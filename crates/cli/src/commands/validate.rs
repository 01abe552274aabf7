//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::{BackendConfig, UploadPlan};

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<PlanSummary>,
}

#[derive(Serialize)]
struct PlanSummary {
    version: String,
    destination_count: usize,
    destinations: Vec<String>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating upload plan");

    let result = validate_plan(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Plan validation failed")
    }
}

fn validate_plan(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(plan) => {
            let warnings = collect_warnings(&plan);

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(PlanSummary {
                    version: format!("{:?}", plan.version),
                    destination_count: plan.destinations.len(),
                    destinations: plan
                        .destination_ids()
                        .map(str::to_string)
                        .collect(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect plan warnings (non-fatal issues)
fn collect_warnings(plan: &UploadPlan) -> Vec<String> {
    let mut warnings = Vec::new();

    // Check for an empty roster
    if plan.destinations.is_empty() {
        warnings.push("No destinations configured - runs will report nothing".to_string());
    }

    // Missing credentials parse fine but fail at transfer time; surface
    // them here so the operator finds out before a run
    for destination in &plan.destinations {
        if let Some(field) = missing_credential(&destination.backend) {
            warnings.push(format!(
                "Destination '{}' has no {} configured - transfers will fail",
                destination.id, field
            ));
        }
    }

    warnings
}

/// First missing required field of a backend configuration, if any
fn missing_credential(backend: &BackendConfig) -> Option<&'static str> {
    let absent = |v: &Option<String>| v.as_deref().is_none_or(str::is_empty);

    match backend {
        BackendConfig::Gdrive { access_token, .. } if absent(access_token) => Some("access_token"),
        BackendConfig::Dropbox { token } if absent(token) => Some("token"),
        BackendConfig::Github { token, .. } if absent(token) => Some("token"),
        BackendConfig::Github { repo, .. } if absent(repo) => Some("repo"),
        BackendConfig::Onedrive { access_token } if absent(access_token) => Some("access_token"),
        BackendConfig::Ftp { host, .. } if absent(host) => Some("host"),
        BackendConfig::Smtp { host, .. } if absent(host) => Some("host"),
        BackendConfig::Smtp { username, .. } if absent(username) => Some("username"),
        BackendConfig::Smtp { password, .. } if absent(password) => Some("password"),
        BackendConfig::Dir { path } if path.is_none() => Some("path"),
        _ => None,
    }
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Plan is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Destinations: {}", summary.destination_count);
            for id in &summary.destinations {
                println!("    - {id}");
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Plan is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
