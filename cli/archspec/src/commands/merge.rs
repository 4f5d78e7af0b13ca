//! `archspec merge`: fill one triple's unspecified parts from another.

use anyhow::Result;
use archspec::ArchSpec;

use super::ArchSummary;

pub fn merge(base: &str, other: &str) -> ArchSpec {
    let mut merged = ArchSpec::from_triple_str(base);
    merged.merge_from(&ArchSpec::from_triple_str(other));
    merged
}

pub fn run(base: &str, other: &str, format: Option<&str>) -> Result<()> {
    print!("{}", ArchSummary::new(&merge(base, other)).render(format)?);
    Ok(())
}
