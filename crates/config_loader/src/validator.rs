//! Plan validation module
//!
//! Validation rules:
//! - destination id unique and non-empty
//! - network ports non-zero
//! - dir destinations carry a non-empty path
//!
//! Missing credentials are deliberately NOT a validation error: a
//! destination with no token still registers and fails at transfer time,
//! so the run reports it instead of refusing to start.

use std::collections::HashSet;

use contracts::{BackendConfig, UploadError, UploadPlan};

/// Validate an UploadPlan
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(plan: &UploadPlan) -> Result<(), UploadError> {
    validate_destination_ids(plan)?;
    validate_ports(plan)?;
    validate_dir_paths(plan)?;
    Ok(())
}

/// Validate destination id uniqueness and shape
fn validate_destination_ids(plan: &UploadPlan) -> Result<(), UploadError> {
    let mut seen = HashSet::new();
    for destination in &plan.destinations {
        if destination.id.is_empty() {
            return Err(UploadError::config_validation(
                "destinations[].id",
                "destination id must not be empty",
            ));
        }
        if !seen.insert(&destination.id) {
            return Err(UploadError::config_validation(
                format!("destinations[id={}]", destination.id),
                "duplicate destination id",
            ));
        }
    }
    Ok(())
}

/// Validate network ports
fn validate_ports(plan: &UploadPlan) -> Result<(), UploadError> {
    for destination in &plan.destinations {
        let port = match &destination.backend {
            BackendConfig::Ftp { port, .. } => Some(*port),
            BackendConfig::Smtp { port, .. } => Some(*port),
            _ => None,
        };
        if port == Some(0) {
            return Err(UploadError::config_validation(
                format!("destinations[id={}].port", destination.id),
                "port must be non-zero",
            ));
        }
    }
    Ok(())
}

/// Validate dir destination paths
fn validate_dir_paths(plan: &UploadPlan) -> Result<(), UploadError> {
    for destination in &plan.destinations {
        if let BackendConfig::Dir { path: Some(path) } = &destination.backend {
            if path.as_os_str().is_empty() {
                return Err(UploadError::config_validation(
                    format!("destinations[id={}].path", destination.id),
                    "path must not be empty",
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_toml, ConfigFormat};
    use crate::ConfigLoader;

    #[test]
    fn test_duplicate_id_rejected() {
        let plan = parse_toml(
            r#"
[[destinations]]
id = "dropbox"
type = "dropbox"

[[destinations]]
id = "dropbox"
type = "dir"
path = "/tmp/out"
"#,
        )
        .unwrap();

        let err = validate(&plan).unwrap_err();
        assert!(matches!(err, UploadError::ConfigValidation { .. }));
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_empty_id_rejected() {
        let plan = parse_toml(
            r#"
[[destinations]]
id = ""
type = "dropbox"
"#,
        )
        .unwrap();

        assert!(validate(&plan).is_err());
    }

    #[test]
    fn test_zero_port_rejected() {
        let plan = parse_toml(
            r#"
[[destinations]]
id = "ftp"
type = "ftp"
host = "ftp.example.com"
port = 0
"#,
        )
        .unwrap();

        let err = validate(&plan).unwrap_err();
        assert!(err.to_string().contains("port"));
    }

    #[test]
    fn test_missing_credentials_pass_validation() {
        let result = ConfigLoader::load_from_str(
            r#"
[[destinations]]
id = "dropbox"
type = "dropbox"
"#,
            ConfigFormat::Toml,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_empty_roster_is_valid() {
        let plan = parse_toml("destinations = []").unwrap();
        assert!(validate(&plan).is_ok());
    }
}
