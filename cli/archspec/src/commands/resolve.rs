//! `archspec resolve`: triple resolution with optional platform defaults.

use std::path::Path;

use anyhow::{Context, Result};
use archspec::parse::load_platform_toml;
use archspec::ArchSpec;

use super::platform::find_platform;
use super::ArchSummary;

/// Resolve `triple`, filling unspecified components from the named platform
/// or platform file when one is given.
pub fn resolve(
    project_dir: &Path,
    triple: &str,
    platform: Option<&str>,
    platform_file: Option<&Path>,
) -> Result<ArchSpec> {
    let platform = match (platform, platform_file) {
        (_, Some(path)) => Some(
            load_platform_toml(path)
                .with_context(|| format!("loading platform file {}", path.display()))?,
        ),
        (Some(name), None) => Some(find_platform(name, project_dir)?),
        (None, None) => None,
    };
    Ok(match &platform {
        Some(p) => ArchSpec::from_triple_str_with_platform(triple, p),
        None => ArchSpec::from_triple_str(triple),
    })
}

pub fn run(
    project_dir: &Path,
    triple: &str,
    platform: Option<&str>,
    platform_file: Option<&Path>,
    format: Option<&str>,
) -> Result<()> {
    let arch = resolve(project_dir, triple, platform, platform_file)?;
    print!("{}", ArchSummary::new(&arch).render(format)?);
    Ok(())
}
