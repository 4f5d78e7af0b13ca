//! `archspec complete`: architecture name completion.

use anyhow::Result;
use archspec::ArchSpec;

pub fn run(prefix: Option<&str>) -> Result<()> {
    for name in ArchSpec::auto_complete(prefix.unwrap_or("")) {
        println!("{name}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completes_with_and_without_prefix() {
        assert!(run(Some("ppc")).is_ok());
        assert!(run(None).is_ok());
        assert!(ArchSpec::auto_complete("ppc").contains(&"ppc970-64"));
    }
}
