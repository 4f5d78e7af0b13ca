//! `archspec cpu`: resolve a raw cpu type/subtype tuple.

use anyhow::{bail, Context, Result};
use archspec::object_format::CPU_SUBTYPE_ANY;
use archspec::{ArchSpec, ObjectFormat};

use super::ArchSummary;

/// Parse a decimal or `0x`-prefixed hex number.
fn parse_number(s: &str) -> Result<u32> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.with_context(|| format!("invalid number '{s}'"))
}

fn parse_subtype(s: &str) -> Result<u32> {
    if s.eq_ignore_ascii_case("any") {
        Ok(CPU_SUBTYPE_ANY)
    } else {
        parse_number(s)
    }
}

pub fn lookup(format: &str, cpu_type: &str, cpu_subtype: &str) -> Result<ArchSpec> {
    let format: ObjectFormat = format.parse()?;
    let cpu_type = parse_number(cpu_type)?;
    let cpu_subtype = parse_subtype(cpu_subtype)?;
    let arch = ArchSpec::from_cpu_type(format, cpu_type, cpu_subtype);
    if !arch.is_valid() {
        bail!("no {format} architecture for cpu type {cpu_type:#x} subtype {cpu_subtype:#x}");
    }
    Ok(arch)
}

pub fn run(format: &str, cpu_type: &str, cpu_subtype: &str, output: Option<&str>) -> Result<()> {
    let arch = lookup(format, cpu_type, cpu_subtype)?;
    print!("{}", ArchSummary::new(&arch).render(output)?);
    Ok(())
}
