//! TOML parsing, serialization, validation, and discovery for platform files.
//!
//! Platforms beyond the builtin set are stored as `.platform.toml` files in
//! the `platforms/` directory of a project. This module provides functions to
//! load, validate, serialize, and discover these files.

use std::path::{Path, PathBuf};

use log::debug;

use crate::arch::ArchSpec;
use crate::error::{ArchError, Result};
use crate::platform::PlatformDefaults;
use crate::triple::Triple;

/// A validation issue found in a platform definition.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity: "error" or "warning".
    pub severity: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// Load a platform from a `.platform.toml` file.
pub fn load_platform_toml(path: &Path) -> Result<PlatformDefaults> {
    if !path.exists() {
        return Err(ArchError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_platform_toml(&content)
}

/// Parse a platform from a TOML string.
pub fn parse_platform_toml(toml_str: &str) -> Result<PlatformDefaults> {
    let platform: PlatformDefaults = toml::from_str(toml_str)?;
    Ok(platform)
}

/// Serialize a platform to pretty TOML.
pub fn platform_to_toml(platform: &PlatformDefaults) -> Result<String> {
    let toml_str = toml::to_string_pretty(platform)?;
    Ok(toml_str)
}

/// A component must be a single triple token.
fn check_token(issues: &mut Vec<ValidationIssue>, field: &str, value: &str) {
    if value.contains('-') || value.chars().any(char::is_whitespace) {
        issues.push(ValidationIssue {
            severity: "error",
            message: format!("{field} '{value}' must be a single token without dashes or spaces"),
        });
    }
}

/// Validate a platform definition.
///
/// Returns `Ok(())` if valid, or `Err(issues)` with a list of problems.
pub fn validate_platform(
    platform: &PlatformDefaults,
) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    // 1. Name is present and usable on the command line
    if platform.name.trim().is_empty() {
        issues.push(ValidationIssue {
            severity: "error",
            message: "platform name is empty".into(),
        });
    } else if platform.name.chars().any(char::is_whitespace) {
        issues.push(ValidationIssue {
            severity: "error",
            message: format!("platform name '{}' contains whitespace", platform.name),
        });
    }

    // 2. Vendor, OS and environment are single tokens
    check_token(&mut issues, "vendor", &platform.vendor);
    check_token(&mut issues, "os", &platform.os);
    if let Some(env) = &platform.environment {
        check_token(&mut issues, "environment", env);
    }

    // 3. A platform that fills nothing is probably a mistake
    let defaults = Triple::new("", &platform.vendor, &platform.os, "");
    if defaults.vendor_is_unspecified() && defaults.os_is_unspecified() {
        issues.push(ValidationIssue {
            severity: "warning",
            message: "vendor and os are both unknown; the platform fills in nothing".into(),
        });
    }

    // 4. Supported architectures resolve to known cores
    for (i, name) in platform.supported_architectures.iter().enumerate() {
        if !ArchSpec::from_triple_str(name).is_valid() {
            issues.push(ValidationIssue {
                severity: "error",
                message: format!("supported architecture '{name}' is not recognized"),
            });
        }
        if platform.supported_architectures[..i]
            .iter()
            .any(|earlier| earlier.eq_ignore_ascii_case(name))
        {
            issues.push(ValidationIssue {
                severity: "warning",
                message: format!("supported architecture '{name}' is listed more than once"),
            });
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Generate a template `.platform.toml` for a new platform.
///
/// Seeds from the remote Linux platform with the given custom name.
pub fn generate_template(name: &str) -> Result<String> {
    let mut platform = PlatformDefaults::remote_linux();
    platform.name = name.into();
    platform.description = format!("Custom platform {name}");
    platform.supported_architectures = vec!["x86_64".into(), "aarch64".into()];
    platform_to_toml(&platform)
}

/// Discover all `.platform.toml` files in a project's `platforms/` directory.
///
/// Returns a list of (platform_name, file_path) pairs sorted by name.
pub fn discover_platforms(project_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let platforms_dir = project_dir.join("platforms");
    if !platforms_dir.is_dir() {
        debug!("no platforms directory in {}", project_dir.display());
        return Ok(Vec::new());
    }

    let mut platforms = Vec::new();
    for entry in std::fs::read_dir(&platforms_dir)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(".platform.toml"))
            .map(str::to_string);
        if let Some(name) = name {
            debug!("found platform '{name}' at {}", path.display());
            platforms.push((name, path));
        }
    }
    platforms.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(platforms)
}
