//! Target triples.
//!
//! A triple is the four-part `arch-vendor-os-environment` identifier. Any
//! component that is empty or the literal `unknown` is *unspecified*: it
//! never causes a mismatch and is the slot that platform defaults and
//! [`ArchSpec::merge_from`](crate::ArchSpec::merge_from) fill in.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cores::Core;
use crate::machine::{ByteOrder, Machine};

/// Spelling of an unspecified component.
pub const UNKNOWN: &str = "unknown";

/// Vendors recognized while normalizing component order.
const KNOWN_VENDORS: &[&str] = &[
    "apple", "pc", "scei", "nvidia", "ibm", "csr", "mesa", "suse", "redhat", "amd", "fsl",
    "img", "mti", "bgp", "bgq", "myriad", "none",
];

/// OS prefixes recognized while normalizing; a version may follow
/// (`macosx10.9`, `ios8.0`, `darwin13`).
const KNOWN_OS_PREFIXES: &[&str] = &[
    "linux", "darwin", "macosx", "macos", "ios", "tvos", "watchos", "windows", "win32",
    "freebsd", "kfreebsd", "netbsd", "openbsd", "dragonfly", "solaris", "haiku", "minix",
    "rtems", "nacl", "cnk", "bitrig", "aix", "cuda", "nvcl", "amdhsa", "ps4", "elfiamcu",
    "fuchsia", "wasi",
];

/// Architecture tokens that are not core names.
///
/// The optional byte order is an explicit endianness carried by the token
/// (`armeb`, `ppc64le`) and overrides the core's default.
const ARCH_ALIASES: &[(&str, Core, Option<ByteOrder>)] = &[
    ("amd64", Core::X86_64, None),
    ("x86", Core::I386, None),
    ("i586", Core::I486, None),
    ("armv7a", Core::ArmV7, None),
    ("armv7l", Core::ArmV7, None),
    ("armeb", Core::ArmGeneric, Some(ByteOrder::Big)),
    ("thumbeb", Core::Thumb, Some(ByteOrder::Big)),
    ("aarch64_be", Core::Aarch64, Some(ByteOrder::Big)),
    ("mips32", Core::Mips32, None),
    ("mips32el", Core::Mips32el, None),
    ("mipsisa32r6", Core::Mips32r6, None),
    ("mipsisa32r6el", Core::Mips32r6el, None),
    ("mipsisa64r6", Core::Mips64r6, None),
    ("mipsisa64r6el", Core::Mips64r6el, None),
    ("ppc", Core::PpcGeneric, None),
    ("ppc32", Core::PpcGeneric, None),
    ("ppcle", Core::PpcGeneric, Some(ByteOrder::Little)),
    ("powerpcle", Core::PpcGeneric, Some(ByteOrder::Little)),
    ("ppc64", Core::Ppc64Generic, None),
    ("ppc64le", Core::Ppc64Generic, Some(ByteOrder::Little)),
    ("powerpc64le", Core::Ppc64Generic, Some(ByteOrder::Little)),
    ("sparc64", Core::Sparc9Generic, None),
];

/// Resolve an architecture token to a core and an optional explicit byte
/// order. Core names are tried first, then [`ARCH_ALIASES`]; both ignore
/// ASCII case.
pub fn lookup_arch(token: &str) -> Option<(Core, Option<ByteOrder>)> {
    if let Some(core) = Core::from_name(token) {
        return Some((core, None));
    }
    ARCH_ALIASES
        .iter()
        .find(|(alias, _, _)| alias.eq_ignore_ascii_case(token))
        .map(|&(_, core, order)| (core, order))
}

/// Every architecture token [`lookup_arch`] accepts that is not a core name.
pub fn arch_aliases() -> impl Iterator<Item = &'static str> {
    ARCH_ALIASES.iter().map(|(alias, _, _)| *alias)
}

fn is_unspecified(component: &str) -> bool {
    component.is_empty() || component.eq_ignore_ascii_case(UNKNOWN)
}

fn is_known_vendor(component: &str) -> bool {
    KNOWN_VENDORS.iter().any(|v| v.eq_ignore_ascii_case(component))
}

/// A known OS name, optionally followed by a version (`ios8.0`, `darwin13`).
fn is_known_os(component: &str) -> bool {
    let lower = component.to_ascii_lowercase();
    KNOWN_OS_PREFIXES.iter().any(|p| {
        lower.strip_prefix(p).is_some_and(|version| {
            version
                .chars()
                .all(|c| c.is_ascii_digit() || c == '.' || c == '_')
        })
    })
}

/// Empty components are stored as `unknown`.
fn component(s: String) -> String {
    if s.is_empty() {
        UNKNOWN.to_string()
    } else {
        s
    }
}

/// Split off the architecture token, keeping dashed core names intact.
fn split_arch(s: &str) -> (&str, &str) {
    for name in Core::all().map(Core::name).filter(|n| n.contains('-')) {
        let Some(head) = s.get(..name.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(name) {
            continue;
        }
        match s[name.len()..].strip_prefix('-') {
            Some(rest) => return (head, rest),
            None if s.len() == name.len() => return (head, ""),
            None => {}
        }
    }
    s.split_once('-').unwrap_or((s, ""))
}

/// Structured `arch-vendor-os-environment` identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Triple {
    arch: String,
    vendor: String,
    os: String,
    environment: String,
}

impl Triple {
    /// Build a triple from explicit components. Empty components become
    /// `unknown`, here and in every setter.
    pub fn new(
        arch: impl Into<String>,
        vendor: impl Into<String>,
        os: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            arch: component(arch.into()),
            vendor: component(vendor.into()),
            os: component(os.into()),
            environment: component(environment.into()),
        }
    }

    /// Parse and normalize a dash-separated triple.
    ///
    /// One to four components are accepted; anything after the third dash
    /// belongs to the environment. An OS found in the vendor slot
    /// (`x86_64-linux-gnu`) is moved to the OS slot, shifting the rest right.
    /// Core names that contain dashes (`ppc970-64`) stay whole.
    pub fn parse(s: &str) -> Self {
        let (arch, rest) = split_arch(s.trim());
        let mut parts: Vec<&str> = rest.splitn(3, '-').collect();
        parts.resize(3, "");

        if !is_unspecified(parts[0]) && !is_known_vendor(parts[0]) && is_known_os(parts[0]) {
            // arch-os[-env...]: no vendor was given
            let env = rest.split_once('-').map_or("", |(_, env)| env);
            parts = vec!["", parts[0], env];
        }

        Self::new(arch, parts[0], parts[1], parts[2])
    }

    /// The raw architecture token, e.g. `"armv7s"`.
    pub fn arch_name(&self) -> &str {
        &self.arch
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn set_arch_name(&mut self, arch: impl Into<String>) {
        self.arch = component(arch.into());
    }

    pub fn set_vendor(&mut self, vendor: impl Into<String>) {
        self.vendor = component(vendor.into());
    }

    pub fn set_os(&mut self, os: impl Into<String>) {
        self.os = component(os.into());
    }

    pub fn set_environment(&mut self, environment: impl Into<String>) {
        self.environment = component(environment.into());
    }

    pub fn arch_is_unspecified(&self) -> bool {
        is_unspecified(&self.arch)
    }

    pub fn vendor_is_unspecified(&self) -> bool {
        is_unspecified(&self.vendor)
    }

    pub fn os_is_unspecified(&self) -> bool {
        is_unspecified(&self.os)
    }

    pub fn environment_is_unspecified(&self) -> bool {
        is_unspecified(&self.environment)
    }

    /// Coarse family named by the architecture token.
    pub fn machine(&self) -> Machine {
        lookup_arch(&self.arch)
            .map(|(core, _)| core.machine())
            .unwrap_or(Machine::Unknown)
    }

    /// macOS, iOS, tvOS, watchOS or bare Darwin.
    pub fn is_os_darwin(&self) -> bool {
        let os = self.os.to_ascii_lowercase();
        ["darwin", "macosx", "macos", "ios", "tvos", "watchos"]
            .iter()
            .any(|p| os.starts_with(p))
    }

    pub fn is_os_windows(&self) -> bool {
        let os = self.os.to_ascii_lowercase();
        os.starts_with("windows") || os.starts_with("win32")
    }
}

impl Default for Triple {
    fn default() -> Self {
        Self::new(UNKNOWN, UNKNOWN, UNKNOWN, UNKNOWN)
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.arch, self.vendor, self.os)?;
        if !self.environment_is_unspecified() {
            write!(f, "-{}", self.environment)?;
        }
        Ok(())
    }
}

impl FromStr for Triple {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for Triple {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Triple> for String {
    fn from(triple: Triple) -> Self {
        triple.to_string()
    }
}
