//! `archspec compare`: exact and compatible matching.

use anyhow::Result;
use archspec::ArchSpec;

/// Outcome of comparing two architectures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub exact: bool,
    pub compatible: bool,
}

pub fn compare(a: &str, b: &str) -> Comparison {
    let lhs = ArchSpec::from_triple_str(a);
    let rhs = ArchSpec::from_triple_str(b);
    Comparison {
        exact: lhs.is_exact_match(&rhs),
        compatible: lhs.is_compatible_match(&rhs),
    }
}

pub fn run(a: &str, b: &str) -> Result<()> {
    for triple in [a, b] {
        let arch = ArchSpec::from_triple_str(triple);
        if !arch.is_valid() {
            println!("note: '{triple}' does not name a known architecture and matches nothing");
        }
    }
    let result = compare(a, b);
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    println!("Exact match:      {}", yes_no(result.exact));
    println!("Compatible match: {}", yes_no(result.compatible));
    Ok(())
}
