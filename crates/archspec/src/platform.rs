//! Platform contexts.
//!
//! A platform supplies the vendor, OS and environment to assume when a
//! triple leaves them unspecified: `x86_64` on a remote Linux platform
//! becomes `x86_64-pc-linux`. Platforms are either builtin
//! ([`builtin_platforms`]) or loaded from `.platform.toml` files
//! (see [`crate::parse`]).

use serde::{Deserialize, Serialize};

use crate::arch::ArchSpec;
use crate::triple::{Triple, UNKNOWN};

/// Source of defaults for unspecified triple components.
pub trait PlatformContext {
    /// Platform name (e.g. `"remote-linux"`).
    fn name(&self) -> &str;

    /// Vendor to use when a triple does not specify one.
    fn default_vendor(&self) -> Option<&str>;

    /// OS to use when a triple does not specify one.
    fn default_os(&self) -> Option<&str>;

    /// Environment to use when a triple does not specify one.
    fn default_environment(&self) -> Option<&str> {
        None
    }

    /// OS distribution (e.g. `"ubuntu"`), if the platform knows it.
    fn distribution_id(&self) -> Option<&str> {
        None
    }

    /// Whether binaries for `arch` can run on this platform. Defaults are
    /// only applied to compatible architectures.
    fn is_compatible_architecture(&self, _arch: &ArchSpec) -> bool {
        true
    }
}

/// A platform described by plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlatformDefaults {
    /// Platform name (e.g., "remote-linux", "host").
    pub name: String,
    /// One-line description.
    #[serde(default)]
    pub description: String,
    /// Default vendor component.
    pub vendor: String,
    /// Default OS component.
    pub os: String,
    /// Default environment component, if the platform implies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// OS distribution identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_id: Option<String>,
    /// Architecture triples this platform runs. Empty means any.
    #[serde(default)]
    pub supported_architectures: Vec<String>,
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() || s.eq_ignore_ascii_case(UNKNOWN) {
        None
    } else {
        Some(s)
    }
}

impl PlatformContext for PlatformDefaults {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_vendor(&self) -> Option<&str> {
        non_empty(&self.vendor)
    }

    fn default_os(&self) -> Option<&str> {
        non_empty(&self.os)
    }

    fn default_environment(&self) -> Option<&str> {
        self.environment.as_deref().and_then(non_empty)
    }

    fn distribution_id(&self) -> Option<&str> {
        self.distribution_id.as_deref().and_then(non_empty)
    }

    fn is_compatible_architecture(&self, arch: &ArchSpec) -> bool {
        self.supported_architectures.is_empty()
            || self
                .supported_architectures()
                .iter()
                .any(|supported| supported.is_compatible_match(arch))
    }
}

impl PlatformDefaults {
    /// Build a platform with no environment, distribution or architecture
    /// restrictions.
    pub fn new(name: impl Into<String>, vendor: impl Into<String>, os: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            vendor: vendor.into(),
            os: os.into(),
            environment: None,
            distribution_id: None,
            supported_architectures: Vec::new(),
        }
    }

    /// Resolve `supported_architectures` against this platform's own
    /// vendor/OS. Entries that do not resolve are skipped.
    pub fn supported_architectures(&self) -> Vec<ArchSpec> {
        self.supported_architectures
            .iter()
            .map(|s| {
                let mut triple = Triple::parse(s);
                if triple.vendor_is_unspecified() {
                    triple.set_vendor(self.vendor.clone());
                }
                if triple.os_is_unspecified() {
                    triple.set_os(self.os.clone());
                }
                ArchSpec::from_triple(triple)
            })
            .filter(ArchSpec::is_valid)
            .collect()
    }

    /// The machine this library was compiled for.
    pub fn host() -> Self {
        let triple = host_triple();
        let mut p = Self::new("host", triple.vendor(), triple.os());
        p.description = "The local host".into();
        if !triple.environment_is_unspecified() {
            p.environment = Some(triple.environment().into());
        }
        p
    }

    /// A remote Linux machine.
    pub fn remote_linux() -> Self {
        let mut p = Self::new("remote-linux", "pc", "linux");
        p.description = "Remote Linux user process".into();
        p
    }

    /// A remote Android device.
    pub fn remote_android() -> Self {
        let mut p = Self::new("remote-android", UNKNOWN, "linux");
        p.description = "Remote Android user process".into();
        p.environment = Some("android".into());
        p.supported_architectures = vec![
            "armv7".into(),
            "thumbv7".into(),
            "aarch64".into(),
            "i386".into(),
            "x86_64".into(),
        ];
        p
    }

    /// A remote macOS machine.
    pub fn remote_macosx() -> Self {
        let mut p = Self::new("remote-macosx", "apple", "macosx");
        p.description = "Remote Mac OS X user process".into();
        p.supported_architectures =
            vec!["x86_64h".into(), "x86_64".into(), "i386".into(), "arm64".into()];
        p
    }

    /// A remote iOS device.
    pub fn remote_ios() -> Self {
        let mut p = Self::new("remote-ios", "apple", "ios");
        p.description = "Remote iOS user process".into();
        p.supported_architectures = vec![
            "arm64".into(),
            "armv7s".into(),
            "armv7".into(),
            "armv7f".into(),
            "armv7k".into(),
            "armv6".into(),
            "thumbv7".into(),
        ];
        p
    }

    /// A remote Windows machine.
    pub fn remote_windows() -> Self {
        let mut p = Self::new("remote-windows", "pc", "windows");
        p.description = "Remote Windows user process".into();
        p.environment = Some("msvc".into());
        p.supported_architectures = vec!["i686".into(), "x86_64".into(), "armv7".into()];
        p
    }

    /// A remote FreeBSD machine.
    pub fn remote_freebsd() -> Self {
        let mut p = Self::new("remote-freebsd", UNKNOWN, "freebsd");
        p.description = "Remote FreeBSD user process".into();
        p
    }
}

/// Every builtin platform.
pub fn builtin_platforms() -> Vec<PlatformDefaults> {
    vec![
        PlatformDefaults::host(),
        PlatformDefaults::remote_linux(),
        PlatformDefaults::remote_android(),
        PlatformDefaults::remote_macosx(),
        PlatformDefaults::remote_ios(),
        PlatformDefaults::remote_windows(),
        PlatformDefaults::remote_freebsd(),
    ]
}

/// Look up a builtin platform by name.
pub fn resolve_platform(name: &str) -> Option<PlatformDefaults> {
    builtin_platforms().into_iter().find(|p| p.name == name)
}

/// Triple of the machine this library was compiled for.
pub fn host_triple() -> Triple {
    let little = cfg!(target_endian = "little");
    let arch = match std::env::consts::ARCH {
        "x86" => "i386",
        "powerpc64" if little => "powerpc64le",
        "mips" if little => "mipsel",
        "mips64" if little => "mips64el",
        other => other,
    };
    let (vendor, os, environment) = match std::env::consts::OS {
        "macos" => ("apple", "macosx", ""),
        "ios" => ("apple", "ios", ""),
        "windows" if cfg!(target_env = "gnu") => ("pc", "windows", "gnu"),
        "windows" => ("pc", "windows", "msvc"),
        "android" => (UNKNOWN, "linux", "android"),
        "linux" if cfg!(target_env = "musl") => (UNKNOWN, "linux", "musl"),
        "linux" => (UNKNOWN, "linux", "gnu"),
        other => (UNKNOWN, other, ""),
    };
    Triple::new(arch, vendor, os, environment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_have_unique_names() {
        let platforms = builtin_platforms();
        for (i, a) in platforms.iter().enumerate() {
            assert!(platforms[i + 1..].iter().all(|b| b.name != a.name));
        }
        assert!(resolve_platform("remote-linux").is_some());
        assert!(resolve_platform("remote-amiga").is_none());
    }

    #[test]
    fn unknown_defaults_read_as_none() {
        let p = PlatformDefaults::remote_android();
        assert_eq!(p.default_vendor(), None);
        assert_eq!(p.default_os(), Some("linux"));
        assert_eq!(p.default_environment(), Some("android"));
    }

    #[test]
    fn supported_architectures_restrict_compatibility() {
        let ios = PlatformDefaults::remote_ios();
        assert!(ios.is_compatible_architecture(&ArchSpec::from_triple_str("armv7s")));
        assert!(!ios.is_compatible_architecture(&ArchSpec::from_triple_str("x86_64")));
        // No list: anything goes.
        let linux = PlatformDefaults::remote_linux();
        assert!(linux.is_compatible_architecture(&ArchSpec::from_triple_str("mips64el")));
    }

    struct BareMetal;

    impl PlatformContext for BareMetal {
        fn name(&self) -> &str {
            "bare-metal"
        }

        fn default_vendor(&self) -> Option<&str> {
            None
        }

        fn default_os(&self) -> Option<&str> {
            Some("none")
        }
    }

    #[test]
    fn trait_defaults_accept_any_architecture() {
        assert!(BareMetal.is_compatible_architecture(&ArchSpec::from_triple_str("thumbv7em")));
        assert_eq!(BareMetal.default_environment(), None);
        let arch = ArchSpec::from_triple_str_with_platform("thumbv7em", &BareMetal);
        assert_eq!(arch.triple().to_string(), "thumbv7em-unknown-none");
    }

    #[test]
    fn host_platform_matches_host_triple() {
        let host = PlatformDefaults::host();
        let triple = host_triple();
        assert_eq!(host.vendor, triple.vendor());
        assert_eq!(host.os, triple.os());
    }
}
