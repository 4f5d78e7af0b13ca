//! `archspec platform`: platform listing, description and validation.

use std::path::Path;

use anyhow::{bail, Context, Result};
use archspec::parse::{
    discover_platforms, generate_template, load_platform_toml, platform_to_toml, validate_platform,
};
use archspec::platform::{builtin_platforms, resolve_platform};
use archspec::{ArchError, PlatformDefaults};

/// Find a platform by name: builtins first, then `platforms/*.platform.toml`
/// under `project_dir`.
pub fn find_platform(name: &str, project_dir: &Path) -> Result<PlatformDefaults> {
    if let Some(platform) = resolve_platform(name) {
        return Ok(platform);
    }
    let discovered = discover_platforms(project_dir)?;
    match discovered.iter().find(|(n, _)| n == name) {
        Some((_, path)) => load_platform_toml(path)
            .with_context(|| format!("loading platform file {}", path.display())),
        None => bail!(
            "unknown platform: '{name}'. Use 'archspec platform list' to see available platforms."
        ),
    }
}

/// List builtin platforms and any found in the project.
pub fn list(project_dir: &Path) -> Result<()> {
    println!("Built-in platforms:");
    println!();
    for platform in builtin_platforms() {
        println!("  {:<25} {}", platform.name, platform.description);
    }

    let discovered = discover_platforms(project_dir)?;
    if !discovered.is_empty() {
        println!();
        println!("Project platforms:");
        println!();
        for (name, path) in &discovered {
            println!("  {name:<25} {}", path.display());
        }
    }
    println!();
    println!("Use 'archspec platform describe <name>' for details.");
    Ok(())
}

/// Describe a specific platform in detail.
pub fn describe(name: &str, project_dir: &Path, format: Option<&str>) -> Result<()> {
    let platform = find_platform(name, project_dir)?;

    if format == Some("toml") {
        print!("{}", platform_to_toml(&platform)?);
        return Ok(());
    }

    let or_none = |v: Option<&String>| v.map_or_else(|| "(none)".to_string(), String::clone);
    println!("=== Platform: {} ===", platform.name);
    if !platform.description.is_empty() {
        println!("{}", platform.description);
    }
    println!();
    println!("  Vendor:       {}", platform.vendor);
    println!("  OS:           {}", platform.os);
    println!("  Environment:  {}", or_none(platform.environment.as_ref()));
    println!("  Distribution: {}", or_none(platform.distribution_id.as_ref()));
    println!("  Architectures:");
    if platform.supported_architectures.is_empty() {
        println!("    (any)");
    }
    for arch in platform.supported_architectures() {
        println!("    {arch}");
    }
    Ok(())
}

/// Validate a platform file, printing every issue found.
pub fn validate(path: &Path) -> Result<()> {
    let platform = load_platform_toml(path)
        .with_context(|| format!("loading platform file {}", path.display()))?;

    match validate_platform(&platform) {
        Ok(()) => {
            println!("{}: platform '{}' is valid", path.display(), platform.name);
            Ok(())
        }
        Err(issues) => {
            for issue in &issues {
                println!("  {}: {}", issue.severity, issue.message);
            }
            let errors = issues.iter().filter(|i| i.severity == "error").count();
            if errors > 0 {
                return Err(ArchError::Validation {
                    detail: format!(
                        "{}: {errors} error(s) in platform '{}'",
                        path.display(),
                        platform.name
                    ),
                }
                .into());
            }
            Ok(())
        }
    }
}

/// Print a template platform file, or write it to `output`.
pub fn template(name: &str, output: Option<&Path>) -> Result<()> {
    let toml_str = generate_template(name)?;
    match output {
        Some(path) => {
            std::fs::write(path, &toml_str)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{toml_str}"),
    }
    Ok(())
}
