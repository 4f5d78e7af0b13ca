//! Resolved target architectures.
//!
//! An [`ArchSpec`] is built from a triple, a triple string (optionally with
//! a [`PlatformContext`] to fill in unspecified components), or a raw
//! `(object format, cpu type, cpu subtype)` tuple. Every path funnels into
//! one canonicalization step that resolves the fine-grained [`Core`] and
//! from it every derived property.
//!
//! Construction never fails. Unrecognized input produces an instance whose
//! [`is_valid`](ArchSpec::is_valid) is `false`, so callers can probe several
//! candidate descriptions and keep the first valid one:
//!
//! ```
//! use archspec::ArchSpec;
//!
//! let arch = ["vax", "armv7s-apple-ios"]
//!     .iter()
//!     .map(|t| ArchSpec::from_triple_str(t))
//!     .find(ArchSpec::is_valid)
//!     .unwrap();
//! assert_eq!(arch.address_byte_size(), 4);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::cores::{Core, CorePattern, NUM_CORES};
use crate::error::ArchError;
use crate::machine::{ByteOrder, Machine};
use crate::object_format::ObjectFormat;
use crate::platform::{host_triple, PlatformContext};
use crate::triple::{lookup_arch, Triple, UNKNOWN};

/// Triple string standing for the host's default architecture.
pub const HOST_ARCH_DEFAULT: &str = "systemArch";
/// Triple string standing for the host's 32-bit architecture.
pub const HOST_ARCH_32: &str = "systemArch32";
/// Triple string standing for the host's 64-bit architecture.
pub const HOST_ARCH_64: &str = "systemArch64";

/// Which flavour of the host architecture to describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostArchKind {
    Default,
    Bits32,
    Bits64,
}

/// A resolved target architecture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ArchSpecRepr", into = "ArchSpecRepr")]
pub struct ArchSpec {
    triple: Triple,
    core: Option<Core>,
    /// Explicit byte order, overriding the core's default.
    byte_order: Option<ByteOrder>,
    distribution_id: Option<String>,
}

impl ArchSpec {
    /// An invalid architecture.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_triple(triple: Triple) -> Self {
        let mut arch = Self::new();
        arch.set_triple(triple);
        arch
    }

    /// Resolve a triple string. No platform defaults are applied.
    pub fn from_triple_str(triple: &str) -> Self {
        let mut arch = Self::new();
        arch.set_triple_str(triple);
        arch
    }

    /// Resolve a triple string, filling unspecified components from
    /// `platform`.
    pub fn from_triple_str_with_platform(triple: &str, platform: &dyn PlatformContext) -> Self {
        let mut arch = Self::new();
        arch.set_triple_str_with_platform(triple, platform);
        arch
    }

    /// Resolve a raw cpu tuple read from a binary header.
    pub fn from_cpu_type(format: ObjectFormat, cpu_type: u32, cpu_subtype: u32) -> Self {
        let mut arch = Self::new();
        arch.set_architecture(format, cpu_type, cpu_subtype);
        arch
    }

    /// Describe the machine this library was compiled for.
    ///
    /// `Bits32`/`Bits64` yield the host's 32- or 64-bit counterpart (i386 on
    /// an x86_64 host); the result is invalid if there is none.
    pub fn host(kind: HostArchKind) -> Self {
        let arch = Self::from_triple(host_triple());
        let wanted = match kind {
            HostArchKind::Default => return arch,
            HostArchKind::Bits32 => 4,
            HostArchKind::Bits64 => 8,
        };
        if arch.address_byte_size() == wanted {
            return arch;
        }
        match host_counterpart(arch.machine()) {
            Some(core) => {
                let t = &arch.triple;
                Self::from_triple(Triple::new(core.name(), t.vendor(), t.os(), t.environment()))
            }
            None => Self::new(),
        }
    }

    /// Reset to the invalid default.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Replace the triple and re-resolve. Any explicit byte order is
    /// dropped unless the architecture token carries one.
    pub fn set_triple(&mut self, triple: Triple) -> bool {
        self.triple = triple;
        self.canonicalize(false);
        self.is_valid()
    }

    /// Parse `triple` and re-resolve. Accepts the host aliases
    /// [`HOST_ARCH_DEFAULT`], [`HOST_ARCH_32`] and [`HOST_ARCH_64`].
    pub fn set_triple_str(&mut self, triple: &str) -> bool {
        let triple = triple.trim();
        if triple.is_empty() {
            self.clear();
            return false;
        }
        if let Some(kind) = host_alias(triple) {
            *self = match kind {
                Some(kind) => Self::host(kind),
                None => Self::new(),
            };
            return self.is_valid();
        }
        self.set_triple(Triple::parse(triple))
    }

    /// Like [`set_triple_str`](Self::set_triple_str), then fill each
    /// unspecified vendor, OS and environment from `platform`, provided the
    /// platform can run the architecture.
    pub fn set_triple_str_with_platform(
        &mut self,
        triple: &str,
        platform: &dyn PlatformContext,
    ) -> bool {
        if !self.set_triple_str(triple) {
            return false;
        }
        if !platform.is_compatible_architecture(self) {
            debug!(
                "platform '{}' cannot run {}, keeping it as given",
                platform.name(),
                self.triple
            );
            return true;
        }

        let mut filled = self.triple.clone();
        if filled.vendor_is_unspecified() {
            if let Some(vendor) = platform.default_vendor() {
                filled.set_vendor(vendor);
            }
        }
        if filled.os_is_unspecified() {
            if let Some(os) = platform.default_os() {
                filled.set_os(os);
            }
        }
        if filled.environment_is_unspecified() {
            if let Some(env) = platform.default_environment() {
                filled.set_environment(env);
            }
        }
        self.triple = filled;
        if self.distribution_id.is_none() {
            self.distribution_id = platform.distribution_id().map(str::to_string);
        }
        self.canonicalize(true);
        self.is_valid()
    }

    /// Resolve a raw cpu tuple. Mach-O tuples get an Apple vendor and an
    /// iOS or macOS OS; COFF tuples get `pc-windows`.
    pub fn set_architecture(&mut self, format: ObjectFormat, cpu_type: u32, cpu_subtype: u32) -> bool {
        let Some(core) = format.find_core(cpu_type, cpu_subtype) else {
            debug!("no {format} core for cpu type {cpu_type:#x} subtype {cpu_subtype:#x}");
            self.triple = Triple::default();
            self.core = None;
            self.byte_order = None;
            return false;
        };

        let (vendor, os) = match format {
            ObjectFormat::MachO => match core.machine() {
                Machine::Arm | Machine::Thumb | Machine::Aarch64 => ("apple", "ios"),
                _ => ("apple", "macosx"),
            },
            ObjectFormat::Coff => ("pc", "windows"),
            ObjectFormat::Elf => (UNKNOWN, UNKNOWN),
        };
        self.triple = Triple::new(core.name(), vendor, os, UNKNOWN);
        self.core = Some(core);
        self.byte_order = None;
        trace!("{format} tuple ({cpu_type:#x}, {cpu_subtype:#x}) resolved to {core}");
        true
    }

    /// Edit the triple in place, then re-resolve.
    ///
    /// An explicit byte order survives if the core is unchanged or the new
    /// core is bi-endian.
    pub fn modify_triple(&mut self, f: impl FnOnce(&mut Triple)) -> bool {
        f(&mut self.triple);
        self.canonicalize(true);
        self.is_valid()
    }

    /// Override the byte order. [`ByteOrder::Invalid`] removes the override.
    pub fn set_byte_order(&mut self, byte_order: ByteOrder) {
        self.byte_order = byte_order.is_valid().then_some(byte_order);
    }

    /// Set the OS distribution (e.g. `"ubuntu"`). An empty id clears it.
    pub fn set_distribution_id(&mut self, distribution_id: impl Into<String>) {
        let id = distribution_id.into();
        self.distribution_id = (!id.is_empty()).then_some(id);
    }

    /// Fill every unspecified triple component of `self` from `other`.
    ///
    /// Components `self` already specifies are never overwritten. The
    /// architecture counts as unspecified when `self` is invalid.
    pub fn merge_from(&mut self, other: &ArchSpec) {
        let theirs = &other.triple;
        let mut merged = self.triple.clone();

        if merged.vendor_is_unspecified() && !theirs.vendor_is_unspecified() {
            merged.set_vendor(theirs.vendor());
        }
        if merged.os_is_unspecified() && !theirs.os_is_unspecified() {
            merged.set_os(theirs.os());
        }
        if merged.environment_is_unspecified() && !theirs.environment_is_unspecified() {
            merged.set_environment(theirs.environment());
        }
        let take_arch = (merged.arch_is_unspecified() || !self.is_valid()) && other.is_valid();
        if take_arch {
            merged.set_arch_name(theirs.arch_name());
            if self.byte_order.is_none() {
                self.byte_order = other.byte_order;
            }
        }
        if self.distribution_id.is_none() {
            self.distribution_id = other.distribution_id.clone();
        }

        self.triple = merged;
        self.canonicalize(true);
    }

    /// Re-derive `core` (and the byte order override) from the triple.
    fn canonicalize(&mut self, keep_override: bool) {
        let previous = self.core;
        match lookup_arch(self.triple.arch_name()) {
            Some((core, token_order)) => {
                let keep = keep_override
                    && self.byte_order.is_some()
                    && (previous == Some(core) || core.definition().bi_endian);
                if !keep {
                    self.byte_order = token_order;
                }
                self.core = Some(core);
                trace!("{} resolved to core {core}", self.triple);
            }
            None => {
                if !self.triple.arch_is_unspecified() {
                    debug!("unrecognized architecture '{}'", self.triple.arch_name());
                }
                self.core = None;
                self.byte_order = None;
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.core.is_some()
    }

    /// The resolved core, `None` when invalid.
    pub fn core(&self) -> Option<Core> {
        self.core
    }

    pub fn machine(&self) -> Machine {
        self.core.map_or(Machine::Unknown, Core::machine)
    }

    /// Canonical name of the resolved core, `"unknown"` when invalid.
    pub fn architecture_name(&self) -> &'static str {
        self.core.map_or(UNKNOWN, Core::name)
    }

    pub fn triple(&self) -> &Triple {
        &self.triple
    }

    pub fn distribution_id(&self) -> Option<&str> {
        self.distribution_id.as_deref()
    }

    pub fn triple_vendor_was_specified(&self) -> bool {
        !self.triple.vendor_is_unspecified()
    }

    pub fn triple_os_was_specified(&self) -> bool {
        !self.triple.os_is_unspecified()
    }

    /// Effective byte order: the override if one is set, else the core's
    /// default. [`ByteOrder::Invalid`] when invalid.
    pub fn byte_order(&self) -> ByteOrder {
        match (self.core, self.byte_order) {
            (None, _) => ByteOrder::Invalid,
            (Some(_), Some(order)) => order,
            (Some(core), None) => core.definition().default_byte_order,
        }
    }

    /// The core's default byte order, ignoring any override.
    pub fn default_byte_order(&self) -> ByteOrder {
        self.core
            .map_or(ByteOrder::Invalid, |c| c.definition().default_byte_order)
    }

    /// Size of an address in bytes; `0` when invalid.
    pub fn address_byte_size(&self) -> u32 {
        self.core.map_or(0, |c| c.definition().addr_byte_size)
    }

    pub fn minimum_opcode_byte_size(&self) -> u32 {
        self.core.map_or(0, |c| c.definition().min_opcode_byte_size)
    }

    pub fn maximum_opcode_byte_size(&self) -> u32 {
        self.core.map_or(0, |c| c.definition().max_opcode_byte_size)
    }

    /// Host bytes per minimum addressable unit of the data bus.
    pub fn data_byte_size(&self) -> u32 {
        self.core.map_or(0, |c| c.definition().data_byte_size)
    }

    /// Host bytes per minimum addressable unit of the code bus.
    pub fn code_byte_size(&self) -> u32 {
        self.core.map_or(0, |c| c.definition().code_byte_size)
    }

    /// Whether plain `char` is signed.
    ///
    /// ARM-family chars are unsigned except on Darwin and Windows; PowerPC
    /// chars are unsigned except on Darwin, and always on little-endian
    /// PowerPC. Invalid architectures report `true`.
    pub fn char_is_signed_by_default(&self) -> bool {
        let Some(core) = self.core else {
            return true;
        };
        match core.machine() {
            Machine::Arm | Machine::Thumb | Machine::Aarch64 => {
                self.triple.is_os_darwin() || self.triple.is_os_windows()
            }
            Machine::Ppc | Machine::Ppc64 => {
                self.byte_order() == ByteOrder::Big && self.triple.is_os_darwin()
            }
            _ => core.definition().char_is_signed,
        }
    }

    /// Cpu type of the canonical `format` tuple for this core.
    pub fn cpu_type(&self, format: ObjectFormat) -> Option<u32> {
        self.core
            .and_then(|c| format.find_entry(c))
            .map(|e| e.cpu_type)
    }

    /// Cpu subtype of the canonical `format` tuple for this core.
    pub fn cpu_subtype(&self, format: ObjectFormat) -> Option<u32> {
        self.core
            .and_then(|c| format.find_entry(c))
            .map(|e| e.subtype.raw())
    }

    pub fn macho_cpu_type(&self) -> Option<u32> {
        self.cpu_type(ObjectFormat::MachO)
    }

    /// Mach-O subtype of the canonical tuple. A core reached through an
    /// alias or `Any` row reports the canonical subtype, not the one it was
    /// built from: `(CPU_TYPE_X86_64, 4)` comes back as subtype 3.
    pub fn macho_cpu_subtype(&self) -> Option<u32> {
        self.cpu_subtype(ObjectFormat::MachO)
    }

    /// Identical cores, byte order, and agreeing vendor/OS/environment.
    ///
    /// `armv7s` is not an exact match for `armv7`. Invalid architectures
    /// match nothing, not even each other.
    pub fn is_exact_match(&self, rhs: &ArchSpec) -> bool {
        self.is_equal_to(rhs, true)
    }

    /// Like [`is_exact_match`](Self::is_exact_match) but cores only need to
    /// be compatible: `armv7s` is a compatible match for `armv7`.
    pub fn is_compatible_match(&self, rhs: &ArchSpec) -> bool {
        self.is_equal_to(rhs, false)
    }

    fn is_equal_to(&self, rhs: &ArchSpec, exact_match: bool) -> bool {
        let (Some(lhs_core), Some(rhs_core)) = (self.core, rhs.core) else {
            return false;
        };
        if self.byte_order() != rhs.byte_order() {
            return false;
        }
        let cores_match = if exact_match {
            lhs_core == rhs_core
        } else {
            lhs_core.is_compatible_with(rhs_core)
        };
        let (l, r) = (&self.triple, &rhs.triple);
        cores_match
            && components_agree(l.vendor(), r.vendor())
            && components_agree(l.os(), r.os())
            && components_agree(l.environment(), r.environment())
    }

    /// Whether the resolved core matches a wildcard. Invalid architectures
    /// match no pattern.
    pub fn matches_pattern(&self, pattern: CorePattern) -> bool {
        self.core.is_some_and(|c| pattern.matches(c))
    }

    /// Architecture names starting with `prefix` (ignoring ASCII case), in
    /// table order. An empty prefix lists every name.
    pub fn auto_complete(prefix: &str) -> Vec<&'static str> {
        let prefix = prefix.to_ascii_lowercase();
        Core::all()
            .map(Core::name)
            .filter(|name| name.starts_with(&prefix))
            .collect()
    }

    fn sort_rank(&self) -> usize {
        self.core.map_or(NUM_CORES, |c| c as usize)
    }
}

/// Two components agree unless both are specified and differ.
fn components_agree(lhs: &str, rhs: &str) -> bool {
    let unspecified = |s: &str| s.is_empty() || s.eq_ignore_ascii_case(UNKNOWN);
    unspecified(lhs) || unspecified(rhs) || lhs.eq_ignore_ascii_case(rhs)
}

/// `Some(kind)` for a known host alias, `Some(None)` for an unknown
/// `systemArch*` spelling, `None` for an ordinary triple.
fn host_alias(triple: &str) -> Option<Option<HostArchKind>> {
    if !triple.starts_with(HOST_ARCH_DEFAULT) {
        return None;
    }
    Some(match triple {
        HOST_ARCH_DEFAULT => Some(HostArchKind::Default),
        HOST_ARCH_32 => Some(HostArchKind::Bits32),
        HOST_ARCH_64 => Some(HostArchKind::Bits64),
        _ => None,
    })
}

/// The other-width core of a host family.
fn host_counterpart(machine: Machine) -> Option<Core> {
    Some(match machine {
        Machine::X86_64 => Core::I386,
        Machine::X86 => Core::X86_64,
        Machine::Aarch64 => Core::ArmV7,
        Machine::Arm | Machine::Thumb => Core::Aarch64,
        Machine::Ppc64 => Core::PpcGeneric,
        Machine::Ppc => Core::Ppc64Generic,
        Machine::Mips64 => Core::Mips32,
        Machine::Mips => Core::Mips64,
        Machine::Mips64el => Core::Mips32el,
        Machine::Mipsel => Core::Mips64el,
        Machine::Sparcv9 => Core::SparcGeneric,
        Machine::Sparc => Core::Sparc9Generic,
        Machine::Hexagon | Machine::Kalimba | Machine::Unknown => return None,
    })
}

impl PartialOrd for ArchSpec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Orders by core, then effective byte order. Invalid architectures sort
/// last. Remaining ties fall back to the triple text, distribution and
/// override so the order agrees with `Eq`.
impl Ord for ArchSpec {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_rank()
            .cmp(&other.sort_rank())
            .then_with(|| self.byte_order().cmp(&other.byte_order()))
            .then_with(|| self.triple.cmp(&other.triple))
            .then_with(|| self.distribution_id.cmp(&other.distribution_id))
            .then_with(|| self.byte_order.cmp(&other.byte_order))
    }
}

impl fmt::Display for ArchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.triple)
    }
}

/// Strict parsing: unlike [`ArchSpec::from_triple_str`], an unrecognized
/// architecture is an error.
impl FromStr for ArchSpec {
    type Err = ArchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arch = Self::from_triple_str(s);
        if arch.is_valid() {
            Ok(arch)
        } else {
            Err(ArchError::UnrecognizedArchitecture { triple: s.into() })
        }
    }
}

/// Serialized form. The core is derived again on the way in, so a stored
/// value can never disagree with its triple.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ArchSpecRepr {
    triple: Triple,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    byte_order: Option<ByteOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    distribution_id: Option<String>,
}

impl From<ArchSpec> for ArchSpecRepr {
    fn from(arch: ArchSpec) -> Self {
        Self {
            triple: arch.triple,
            byte_order: arch.byte_order,
            distribution_id: arch.distribution_id,
        }
    }
}

impl From<ArchSpecRepr> for ArchSpec {
    fn from(repr: ArchSpecRepr) -> Self {
        let mut arch = ArchSpec::from_triple(repr.triple);
        if let Some(order) = repr.byte_order {
            arch.set_byte_order(order);
        }
        if let Some(id) = repr.distribution_id {
            arch.set_distribution_id(id);
        }
        arch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object_format::{CPU_TYPE_ARM, CPU_TYPE_X86_64, EM_MIPS};
    use crate::platform::PlatformDefaults;

    fn arch(s: &str) -> ArchSpec {
        ArchSpec::from_triple_str(s)
    }

    #[test]
    fn armv7s_ios() {
        let a = arch("armv7s-apple-ios");
        assert_eq!(a.core(), Some(Core::ArmV7s));
        assert_eq!(a.address_byte_size(), 4);
        assert_eq!(a.machine(), Machine::Arm);

        let v7 = arch("armv7-apple-ios");
        assert!(a.is_compatible_match(&v7));
        assert!(!a.is_exact_match(&v7));
    }

    #[test]
    fn platform_fills_unknown_components() {
        let linux = PlatformDefaults::new("remote-linux", "pc", "linux");
        let a = ArchSpec::from_triple_str_with_platform("x86_64-unknown-unknown", &linux);
        assert_eq!(a.triple().to_string(), "x86_64-pc-linux");
        assert_eq!(a.core(), Some(Core::X86_64));

        let builtin = crate::platform::resolve_platform("remote-linux").unwrap();
        let b = ArchSpec::from_triple_str_with_platform("x86_64", &builtin);
        assert_eq!(b.triple().to_string(), "x86_64-pc-linux");
    }

    #[test]
    fn platform_keeps_specified_components() {
        let mut gnu = PlatformDefaults::remote_linux();
        gnu.environment = Some("gnu".into());
        let a = ArchSpec::from_triple_str_with_platform("x86_64-apple-unknown", &gnu);
        assert_eq!(a.triple().to_string(), "x86_64-apple-linux-gnu");
    }

    #[test]
    fn incompatible_platform_leaves_triple_alone() {
        let ios = PlatformDefaults::remote_ios();
        let a = ArchSpec::from_triple_str_with_platform("x86_64", &ios);
        assert!(a.is_valid());
        assert_eq!(a.triple().to_string(), "x86_64-unknown-unknown");
    }

    #[test]
    fn platform_distribution_id() {
        let mut ubuntu = PlatformDefaults::remote_linux();
        ubuntu.distribution_id = Some("ubuntu".into());
        let a = ArchSpec::from_triple_str_with_platform("aarch64", &ubuntu);
        assert_eq!(a.distribution_id(), Some("ubuntu"));
    }

    #[test]
    fn unrecognized_tuple_is_invalid() {
        let a = ArchSpec::from_cpu_type(ObjectFormat::MachO, 0x1234, 0x99);
        assert!(!a.is_valid());
        assert_eq!(a.byte_order(), ByteOrder::Invalid);
        assert_eq!(a.address_byte_size(), 0);
        assert_eq!(a.macho_cpu_type(), None);
        assert_eq!(a.architecture_name(), "unknown");
    }

    #[test]
    fn unrecognized_triple_is_invalid() {
        let a = arch("vax-dec-ultrix");
        assert!(!a.is_valid());
        assert_eq!(a.triple().arch_name(), "vax");
        assert_eq!(a.minimum_opcode_byte_size(), 0);
        assert!("vax-dec-ultrix".parse::<ArchSpec>().is_err());
        assert!("i686-pc-linux".parse::<ArchSpec>().is_ok());
    }

    #[test]
    fn merge_fills_unknown_fields() {
        let mut a = arch("i386-unknown-unknown");
        let b = arch("x86_64-pc-windows-msvc");
        a.merge_from(&b);
        assert_eq!(a.triple().to_string(), "i386-pc-windows-msvc");
        assert_eq!(a.core(), Some(Core::I386));
    }

    #[test]
    fn merge_never_downgrades() {
        let mut a = arch("armv7-apple-ios");
        a.merge_from(&arch("x86_64-pc-linux-gnu"));
        assert_eq!(a.triple().to_string(), "armv7-apple-ios-gnu");
        assert_eq!(a.core(), Some(Core::ArmV7));
    }

    #[test]
    fn merge_is_idempotent() {
        let other = arch("x86_64-pc-windows-msvc");
        let mut once = arch("i386");
        once.merge_from(&other);
        let mut twice = once.clone();
        twice.merge_from(&other);
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_into_invalid_takes_architecture() {
        let mut a = ArchSpec::new();
        a.merge_from(&arch("armeb-unknown-linux"));
        assert_eq!(a.core(), Some(Core::ArmGeneric));
        assert_eq!(a.byte_order(), ByteOrder::Big);
        assert_eq!(a.triple().os(), "linux");
    }

    #[test]
    fn invalid_instances_never_match() {
        let a = ArchSpec::new();
        let b = ArchSpec::default();
        assert!(!a.is_exact_match(&b));
        assert!(!a.is_compatible_match(&b));
        assert!(!a.is_compatible_match(&arch("x86_64")));
        assert!(!a.matches_pattern(CorePattern::Any));
    }

    #[test]
    fn unspecified_fields_never_mismatch() {
        let a = arch("x86_64-apple-macosx");
        let b = arch("x86_64");
        assert!(a.is_exact_match(&b));
        assert!(!a.is_exact_match(&arch("x86_64-pc-linux")));
        assert!(!a.is_compatible_match(&arch("x86_64-apple-ios")));
    }

    #[test]
    fn environment_mismatch() {
        let gnu = arch("x86_64-pc-windows-gnu");
        let msvc = arch("x86_64-pc-windows-msvc");
        assert!(!gnu.is_compatible_match(&msvc));
        assert!(gnu.is_compatible_match(&arch("x86_64-pc-windows")));
    }

    #[test]
    fn byte_order_must_agree() {
        assert!(!arch("arm").is_compatible_match(&arch("armeb")));
        assert!(arch("armeb").is_exact_match(&arch("armeb")));
    }

    #[test]
    fn matching_properties_over_sample() {
        let samples: Vec<ArchSpec> = [
            "armv7", "armv7s", "armv7k", "armv6m", "armv7em", "arm", "thumbv7", "arm64",
            "aarch64", "x86_64", "x86_64h", "i386", "i686", "mips", "mipsr2", "mipsel",
            "powerpc64", "ppc970-64", "hexagonv5", "kalimba4", "armeb", "vax", "",
        ]
        .iter()
        .map(|s| arch(s))
        .collect();

        for a in &samples {
            for b in &samples {
                assert_eq!(a.is_exact_match(b), b.is_exact_match(a));
                assert_eq!(a.is_compatible_match(b), b.is_compatible_match(a));
                if a.is_exact_match(b) {
                    assert!(a.is_compatible_match(b));
                }
            }
        }
    }

    #[test]
    fn wildcard_patterns() {
        assert!(arch("thumbv7em").matches_pattern(CorePattern::ArmAny));
        assert!(arch("x86_64h").matches_pattern(CorePattern::X86_64Any));
        assert!(!arch("i386").matches_pattern(CorePattern::X86_64Any));
    }

    #[test]
    fn endianness_tokens_set_override() {
        let a = arch("aarch64_be-unknown-linux-gnu");
        assert_eq!(a.core(), Some(Core::Aarch64));
        assert_eq!(a.byte_order(), ByteOrder::Big);
        assert_eq!(a.default_byte_order(), ByteOrder::Little);

        let b = arch("powerpc64le-unknown-linux");
        assert_eq!(b.byte_order(), ByteOrder::Little);
        assert!(!b.char_is_signed_by_default());
    }

    #[test]
    fn byte_order_override_survives_bi_endian_refinement() {
        let mut a = arch("armv7");
        a.set_byte_order(ByteOrder::Big);
        a.modify_triple(|t| t.set_os("linux"));
        assert_eq!(a.byte_order(), ByteOrder::Big);

        // new bi-endian core: kept
        a.modify_triple(|t| t.set_arch_name("armv7s"));
        assert_eq!(a.byte_order(), ByteOrder::Big);

        // non bi-endian core: back to its default
        a.modify_triple(|t| t.set_arch_name("i386"));
        assert_eq!(a.byte_order(), ByteOrder::Little);

        // a fresh triple always starts from the default
        let mut b = arch("powerpc");
        b.set_byte_order(ByteOrder::Little);
        b.set_triple(Triple::parse("powerpc-apple-macosx"));
        assert_eq!(b.byte_order(), ByteOrder::Big);

        b.set_byte_order(ByteOrder::Little);
        b.set_byte_order(ByteOrder::Invalid);
        assert_eq!(b.byte_order(), ByteOrder::Big);
    }

    #[test]
    fn char_signedness() {
        assert!(arch("x86_64-pc-linux").char_is_signed_by_default());
        assert!(!arch("armv7-unknown-linux").char_is_signed_by_default());
        assert!(arch("armv7-apple-ios").char_is_signed_by_default());
        assert!(arch("thumbv7-pc-windows").char_is_signed_by_default());
        assert!(!arch("powerpc-unknown-linux").char_is_signed_by_default());
        assert!(arch("powerpc-apple-darwin").char_is_signed_by_default());
        assert!(ArchSpec::new().char_is_signed_by_default());
    }

    #[test]
    fn opcode_and_bus_sizes() {
        let x = arch("x86_64");
        assert_eq!(x.minimum_opcode_byte_size(), 1);
        assert_eq!(x.maximum_opcode_byte_size(), 15);
        let k = arch("kalimba3");
        assert_eq!(k.data_byte_size(), 4);
        assert_eq!(k.code_byte_size(), 4);
        assert_eq!(k.byte_order(), ByteOrder::Big);
        assert_eq!(arch("mips64r6el").address_byte_size(), 8);
    }

    #[test]
    fn macho_tuple_round_trip() {
        for e in ObjectFormat::MachO.entries() {
            if ObjectFormat::MachO.find_entry(e.core) != Some(e) {
                continue;
            }
            let a = ArchSpec::from_cpu_type(ObjectFormat::MachO, e.cpu_type, e.subtype.raw());
            assert!(a.is_valid(), "{}", e.core);
            assert_eq!(a.macho_cpu_type(), Some(e.cpu_type));
            assert_eq!(a.macho_cpu_subtype(), Some(e.subtype.raw()));
        }

        // alias rows report the canonical tuple
        let alias = ArchSpec::from_cpu_type(ObjectFormat::MachO, CPU_TYPE_X86_64, 4);
        assert_eq!(alias.core(), Some(Core::X86_64));
        assert_eq!(alias.macho_cpu_type(), Some(CPU_TYPE_X86_64));
        assert_eq!(alias.macho_cpu_subtype(), Some(3));
    }

    #[test]
    fn macho_tuple_triples() {
        let a = ArchSpec::from_cpu_type(ObjectFormat::MachO, CPU_TYPE_ARM, 11);
        assert_eq!(a.triple().to_string(), "armv7s-apple-ios");
        let b = ArchSpec::from_cpu_type(ObjectFormat::MachO, CPU_TYPE_X86_64, 8);
        assert_eq!(b.triple().to_string(), "x86_64h-apple-macosx");
        let c = ArchSpec::from_cpu_type(ObjectFormat::Elf, EM_MIPS, 5);
        assert_eq!(c.triple().to_string(), "mipsr2el-unknown-unknown");
        assert_eq!(c.byte_order(), ByteOrder::Little);
    }

    #[test]
    fn dashed_core_names_parse() {
        let a = arch("ppc970-64-apple-macosx");
        assert_eq!(a.core(), Some(Core::Ppc970_64));
        assert_eq!(a.triple().os(), "macosx");
        assert_eq!(arch("unknown-mach-64").address_byte_size(), 8);
    }

    #[test]
    fn auto_complete_names() {
        let v7 = ArchSpec::auto_complete("armv7");
        assert_eq!(v7, ["armv7", "armv7f", "armv7s", "armv7k", "armv7m", "armv7em"]);
        assert_eq!(ArchSpec::auto_complete("X86"), ["x86_64", "x86_64h"]);
        assert_eq!(ArchSpec::auto_complete("").len(), NUM_CORES);
        assert!(ArchSpec::auto_complete("zz").is_empty());
    }

    #[test]
    fn host_aliases() {
        let host = arch(HOST_ARCH_DEFAULT);
        assert_eq!(host, ArchSpec::host(HostArchKind::Default));
        assert!(!arch("systemArch128").is_valid());

        let host64 = ArchSpec::host(HostArchKind::Bits64);
        if host64.is_valid() {
            assert_eq!(host64.address_byte_size(), 8);
        }
        let host32 = ArchSpec::host(HostArchKind::Bits32);
        if host32.is_valid() {
            assert_eq!(host32.address_byte_size(), 4);
        }
    }

    #[test]
    fn ordering_is_by_core_then_byte_order() {
        let mut v = vec![arch("x86_64"), ArchSpec::new(), arch("armeb"), arch("arm"), arch("i386")];
        v.sort();
        let names: Vec<_> = v.iter().map(|a| a.architecture_name()).collect();
        assert_eq!(names, ["arm", "arm", "i386", "x86_64", "unknown"]);
        assert_eq!(v[0].byte_order(), ByteOrder::Big);
    }

    #[test]
    fn clear_resets() {
        let mut a = arch("x86_64-pc-linux");
        a.set_distribution_id("fedora");
        a.clear();
        assert_eq!(a, ArchSpec::new());
        assert!(!a.set_triple_str(""));
    }

    #[test]
    fn emptied_component_reads_as_unknown() {
        let a = arch("x86_64-unknown-linux");
        let mut b = arch("x86_64-pc-linux");
        b.modify_triple(|t| t.set_vendor(""));
        assert_eq!(b, a);
        assert!(!b.triple_vendor_was_specified());

        let json = serde_json::to_string(&b).unwrap();
        let back: ArchSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn serde_round_trip_rederives_core() {
        let mut a = arch("armv7k-apple-watchos");
        a.set_byte_order(ByteOrder::Big);
        a.set_distribution_id("none");
        let json = serde_json::to_string(&a).unwrap();
        let back: ArchSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);

        let forged: ArchSpec = serde_json::from_str(r#"{"triple":"mips64-unknown-linux"}"#).unwrap();
        assert_eq!(forged.core(), Some(Core::Mips64));
    }
}
