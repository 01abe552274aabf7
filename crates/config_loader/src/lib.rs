//! # Config Loader
//!
//! Upload plan loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON plan files
//! - Validate plan legality
//! - Generate `UploadPlan`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let plan = ConfigLoader::load_from_path(Path::new("plan.toml")).unwrap();
//! println!("Destinations: {}", plan.destinations.len());
//! ```

mod parser;
mod validator;

pub use contracts::UploadPlan;
pub use parser::ConfigFormat;

use contracts::UploadError;
use std::path::Path;

/// Upload plan loader
///
/// Provides static methods to load a plan from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a plan from a file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<UploadPlan, UploadError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load a plan from a string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<UploadPlan, UploadError> {
        let plan = parser::parse(content, format)?;
        validator::validate(&plan)?;
        Ok(plan)
    }

    /// Serialize an UploadPlan to a TOML string
    pub fn to_toml(plan: &UploadPlan) -> Result<String, UploadError> {
        toml::to_string_pretty(plan)
            .map_err(|e| UploadError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize an UploadPlan to a JSON string
    pub fn to_json(plan: &UploadPlan) -> Result<String, UploadError> {
        serde_json::to_string_pretty(plan)
            .map_err(|e| UploadError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer plan format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, UploadError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            UploadError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext)
            .ok_or_else(|| UploadError::config_parse(format!("unsupported plan format: .{ext}")))
    }

    /// Read plan file content
    fn read_file(path: &Path) -> Result<String, UploadError> {
        Ok(std::fs::read_to_string(path)?)
    }
}
