//! Resolved cores and their static descriptor table.
//!
//! A [`Core`] is the finest-grained architecture classification: it tells
//! ARMv7 from ARMv7s from Thumb-v7, and MIPS32r2 big-endian from MIPS64r6
//! little-endian. Every derived property of an [`ArchSpec`](crate::ArchSpec)
//! (byte order, address size, opcode bounds, bus widths) is a lookup in
//! [`CORE_DEFINITIONS`], which is indexed by the core's discriminant.
//!
//! Wildcards ("any ARM core") are [`CorePattern`]s. They are match targets
//! only and can never be the resolved core of an architecture.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::machine::ByteOrder::{Big, Little};
use crate::machine::{ByteOrder, Machine};

/// A concrete, fully resolved architecture core.
///
/// Variant order is significant: it is the sort key used by
/// `Ord for ArchSpec` and it must match the order of [`CORE_DEFINITIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Core {
    ArmGeneric,
    ArmV4,
    ArmV4t,
    ArmV5,
    ArmV5e,
    ArmV5t,
    ArmV6,
    ArmV6m,
    ArmV7,
    ArmV7f,
    ArmV7s,
    ArmV7k,
    ArmV7m,
    ArmV7em,
    ArmXscale,

    Thumb,
    ThumbV4t,
    ThumbV5,
    ThumbV5e,
    ThumbV6,
    ThumbV6m,
    ThumbV7,
    ThumbV7s,
    ThumbV7k,
    ThumbV7f,
    ThumbV7m,
    ThumbV7em,

    Arm64,
    ArmV8,
    Aarch64,

    Mips32,
    Mips32r2,
    Mips32r3,
    Mips32r5,
    Mips32r6,
    Mips32el,
    Mips32r2el,
    Mips32r3el,
    Mips32r5el,
    Mips32r6el,
    Mips64,
    Mips64r2,
    Mips64r3,
    Mips64r5,
    Mips64r6,
    Mips64el,
    Mips64r2el,
    Mips64r3el,
    Mips64r5el,
    Mips64r6el,

    PpcGeneric,
    Ppc601,
    Ppc602,
    Ppc603,
    Ppc603e,
    Ppc603ev,
    Ppc604,
    Ppc604e,
    Ppc620,
    Ppc750,
    Ppc7400,
    Ppc7450,
    Ppc970,

    Ppc64Generic,
    Ppc970_64,

    SparcGeneric,
    Sparc9Generic,

    I386,
    I486,
    I486sx,
    I686,

    X86_64,
    /// Haswell-enabled x86-64.
    X86_64h,

    HexagonGeneric,
    HexagonV4,
    HexagonV5,

    UnknownMach32,
    UnknownMach64,

    Kalimba3,
    Kalimba4,
    Kalimba5,
}

/// Number of concrete cores.
pub const NUM_CORES: usize = 81;

/// Static description of one core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreDefinition {
    pub core: Core,
    /// Architecture name, also the canonical triple token.
    pub name: &'static str,
    pub machine: Machine,
    pub default_byte_order: ByteOrder,
    pub addr_byte_size: u32,
    pub min_opcode_byte_size: u32,
    pub max_opcode_byte_size: u32,
    /// Size in host bytes of the smallest addressable unit on the data bus.
    pub data_byte_size: u32,
    /// Size in host bytes of the smallest addressable unit on the code bus.
    pub code_byte_size: u32,
    pub char_is_signed: bool,
    pub bi_endian: bool,
}

const fn def(
    core: Core,
    name: &'static str,
    machine: Machine,
    default_byte_order: ByteOrder,
    addr_byte_size: u32,
    min_opcode_byte_size: u32,
    max_opcode_byte_size: u32,
) -> CoreDefinition {
    CoreDefinition {
        core,
        name,
        machine,
        default_byte_order,
        addr_byte_size,
        min_opcode_byte_size,
        max_opcode_byte_size,
        data_byte_size: 1,
        code_byte_size: 1,
        char_is_signed: machine.char_is_signed(),
        bi_endian: machine.is_bi_endian(),
    }
}

const fn dsp(core: Core, name: &'static str, data_byte_size: u32, code_byte_size: u32) -> CoreDefinition {
    let mut d = def(core, name, Machine::Kalimba, ByteOrder::Big, 4, 1, 1);
    d.data_byte_size = data_byte_size;
    d.code_byte_size = code_byte_size;
    d
}

/// Descriptor table, indexed by `Core as usize`.
pub static CORE_DEFINITIONS: [CoreDefinition; NUM_CORES] = [
    def(Core::ArmGeneric, "arm", Machine::Arm, Little, 4, 2, 4),
    def(Core::ArmV4, "armv4", Machine::Arm, Little, 4, 2, 4),
    def(Core::ArmV4t, "armv4t", Machine::Arm, Little, 4, 2, 4),
    def(Core::ArmV5, "armv5", Machine::Arm, Little, 4, 2, 4),
    def(Core::ArmV5e, "armv5e", Machine::Arm, Little, 4, 2, 4),
    def(Core::ArmV5t, "armv5t", Machine::Arm, Little, 4, 2, 4),
    def(Core::ArmV6, "armv6", Machine::Arm, Little, 4, 2, 4),
    def(Core::ArmV6m, "armv6m", Machine::Arm, Little, 4, 2, 4),
    def(Core::ArmV7, "armv7", Machine::Arm, Little, 4, 2, 4),
    def(Core::ArmV7f, "armv7f", Machine::Arm, Little, 4, 2, 4),
    def(Core::ArmV7s, "armv7s", Machine::Arm, Little, 4, 2, 4),
    def(Core::ArmV7k, "armv7k", Machine::Arm, Little, 4, 2, 4),
    def(Core::ArmV7m, "armv7m", Machine::Arm, Little, 4, 2, 4),
    def(Core::ArmV7em, "armv7em", Machine::Arm, Little, 4, 2, 4),
    def(Core::ArmXscale, "xscale", Machine::Arm, Little, 4, 2, 4),
    def(Core::Thumb, "thumb", Machine::Thumb, Little, 4, 2, 4),
    def(Core::ThumbV4t, "thumbv4t", Machine::Thumb, Little, 4, 2, 4),
    def(Core::ThumbV5, "thumbv5", Machine::Thumb, Little, 4, 2, 4),
    def(Core::ThumbV5e, "thumbv5e", Machine::Thumb, Little, 4, 2, 4),
    def(Core::ThumbV6, "thumbv6", Machine::Thumb, Little, 4, 2, 4),
    def(Core::ThumbV6m, "thumbv6m", Machine::Thumb, Little, 4, 2, 4),
    def(Core::ThumbV7, "thumbv7", Machine::Thumb, Little, 4, 2, 4),
    def(Core::ThumbV7s, "thumbv7s", Machine::Thumb, Little, 4, 2, 4),
    def(Core::ThumbV7k, "thumbv7k", Machine::Thumb, Little, 4, 2, 4),
    def(Core::ThumbV7f, "thumbv7f", Machine::Thumb, Little, 4, 2, 4),
    def(Core::ThumbV7m, "thumbv7m", Machine::Thumb, Little, 4, 2, 4),
    def(Core::ThumbV7em, "thumbv7em", Machine::Thumb, Little, 4, 2, 4),
    def(Core::Arm64, "arm64", Machine::Aarch64, Little, 8, 4, 4),
    def(Core::ArmV8, "armv8", Machine::Aarch64, Little, 8, 4, 4),
    def(Core::Aarch64, "aarch64", Machine::Aarch64, Little, 8, 4, 4),
    def(Core::Mips32, "mips", Machine::Mips, Big, 4, 2, 4),
    def(Core::Mips32r2, "mipsr2", Machine::Mips, Big, 4, 2, 4),
    def(Core::Mips32r3, "mipsr3", Machine::Mips, Big, 4, 2, 4),
    def(Core::Mips32r5, "mipsr5", Machine::Mips, Big, 4, 2, 4),
    def(Core::Mips32r6, "mipsr6", Machine::Mips, Big, 4, 2, 4),
    def(Core::Mips32el, "mipsel", Machine::Mipsel, Little, 4, 2, 4),
    def(Core::Mips32r2el, "mipsr2el", Machine::Mipsel, Little, 4, 2, 4),
    def(Core::Mips32r3el, "mipsr3el", Machine::Mipsel, Little, 4, 2, 4),
    def(Core::Mips32r5el, "mipsr5el", Machine::Mipsel, Little, 4, 2, 4),
    def(Core::Mips32r6el, "mipsr6el", Machine::Mipsel, Little, 4, 2, 4),
    def(Core::Mips64, "mips64", Machine::Mips64, Big, 8, 2, 4),
    def(Core::Mips64r2, "mips64r2", Machine::Mips64, Big, 8, 2, 4),
    def(Core::Mips64r3, "mips64r3", Machine::Mips64, Big, 8, 2, 4),
    def(Core::Mips64r5, "mips64r5", Machine::Mips64, Big, 8, 2, 4),
    def(Core::Mips64r6, "mips64r6", Machine::Mips64, Big, 8, 2, 4),
    def(Core::Mips64el, "mips64el", Machine::Mips64el, Little, 8, 2, 4),
    def(Core::Mips64r2el, "mips64r2el", Machine::Mips64el, Little, 8, 2, 4),
    def(Core::Mips64r3el, "mips64r3el", Machine::Mips64el, Little, 8, 2, 4),
    def(Core::Mips64r5el, "mips64r5el", Machine::Mips64el, Little, 8, 2, 4),
    def(Core::Mips64r6el, "mips64r6el", Machine::Mips64el, Little, 8, 2, 4),
    def(Core::PpcGeneric, "powerpc", Machine::Ppc, Big, 4, 4, 4),
    def(Core::Ppc601, "ppc601", Machine::Ppc, Big, 4, 4, 4),
    def(Core::Ppc602, "ppc602", Machine::Ppc, Big, 4, 4, 4),
    def(Core::Ppc603, "ppc603", Machine::Ppc, Big, 4, 4, 4),
    def(Core::Ppc603e, "ppc603e", Machine::Ppc, Big, 4, 4, 4),
    def(Core::Ppc603ev, "ppc603ev", Machine::Ppc, Big, 4, 4, 4),
    def(Core::Ppc604, "ppc604", Machine::Ppc, Big, 4, 4, 4),
    def(Core::Ppc604e, "ppc604e", Machine::Ppc, Big, 4, 4, 4),
    def(Core::Ppc620, "ppc620", Machine::Ppc, Big, 4, 4, 4),
    def(Core::Ppc750, "ppc750", Machine::Ppc, Big, 4, 4, 4),
    def(Core::Ppc7400, "ppc7400", Machine::Ppc, Big, 4, 4, 4),
    def(Core::Ppc7450, "ppc7450", Machine::Ppc, Big, 4, 4, 4),
    def(Core::Ppc970, "ppc970", Machine::Ppc, Big, 4, 4, 4),
    def(Core::Ppc64Generic, "powerpc64", Machine::Ppc64, Big, 8, 4, 4),
    def(Core::Ppc970_64, "ppc970-64", Machine::Ppc64, Big, 8, 4, 4),
    def(Core::SparcGeneric, "sparc", Machine::Sparc, Big, 4, 4, 4),
    def(Core::Sparc9Generic, "sparcv9", Machine::Sparcv9, Big, 8, 4, 4),
    def(Core::I386, "i386", Machine::X86, Little, 4, 1, 15),
    def(Core::I486, "i486", Machine::X86, Little, 4, 1, 15),
    def(Core::I486sx, "i486sx", Machine::X86, Little, 4, 1, 15),
    def(Core::I686, "i686", Machine::X86, Little, 4, 1, 15),
    def(Core::X86_64, "x86_64", Machine::X86_64, Little, 8, 1, 15),
    def(Core::X86_64h, "x86_64h", Machine::X86_64, Little, 8, 1, 15),
    def(Core::HexagonGeneric, "hexagon", Machine::Hexagon, Little, 4, 4, 4),
    def(Core::HexagonV4, "hexagonv4", Machine::Hexagon, Little, 4, 4, 4),
    def(Core::HexagonV5, "hexagonv5", Machine::Hexagon, Little, 4, 4, 4),
    def(Core::UnknownMach32, "unknown-mach-32", Machine::Unknown, Little, 4, 4, 4),
    def(Core::UnknownMach64, "unknown-mach-64", Machine::Unknown, Little, 8, 4, 4),
    dsp(Core::Kalimba3, "kalimba3", 4, 4),
    dsp(Core::Kalimba4, "kalimba4", 1, 1),
    dsp(Core::Kalimba5, "kalimba5", 4, 1),
];

impl Core {
    /// Every core, in discriminant order.
    pub fn all() -> impl Iterator<Item = Core> {
        CORE_DEFINITIONS.iter().map(|d| d.core)
    }

    /// The static descriptor for this core.
    pub fn definition(self) -> &'static CoreDefinition {
        &CORE_DEFINITIONS[self as usize]
    }

    /// Canonical architecture name (e.g. `"armv7s"`).
    pub fn name(self) -> &'static str {
        self.definition().name
    }

    pub fn machine(self) -> Machine {
        self.definition().machine
    }

    /// Look up a core by its canonical name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Core> {
        CORE_DEFINITIONS
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
            .map(|d| d.core)
    }

    /// Whether `self` and `other` may stand in for one another.
    ///
    /// Identical cores are compatible. The generic ARM core accepts any ARM
    /// or Thumb core. Otherwise the pair must appear (in either direction)
    /// in [`COMPATIBLE_CORES`].
    pub fn is_compatible_with(self, other: Core) -> bool {
        if self == other {
            return true;
        }
        if (self == Core::ArmGeneric && other.machine().is_arm_family())
            || (other == Core::ArmGeneric && self.machine().is_arm_family())
        {
            return true;
        }
        compatible_neighbors(self).contains(&other) || compatible_neighbors(other).contains(&self)
    }
}

impl fmt::Display for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Core {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Core {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Core::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown core '{name}'")))
    }
}

/// Compatibility adjacency between concrete cores.
///
/// Each row lists cores that can run code built for the row's core, or vice
/// versa. The relation used for matching is the symmetric closure of this
/// table; it is not transitive.
pub static COMPATIBLE_CORES: &[(Core, &[Core])] = &[
    // Cortex-M: v6-M (M0), v7-M (M3), v7E-M (M4)
    (Core::ArmV6m, &[Core::ArmV7, Core::ArmV7m, Core::ArmV7em]),
    (Core::ArmV7m, &[Core::ArmV7, Core::ArmV7em]),
    (Core::ArmV7em, &[Core::ArmV7]),
    (Core::ArmV7s, &[Core::ArmV7]),
    (Core::ArmV7f, &[Core::ArmV7]),
    (Core::ArmV7k, &[Core::ArmV7]),
    (Core::ThumbV6m, &[Core::ThumbV7, Core::ThumbV7m, Core::ThumbV7em]),
    (Core::ThumbV7m, &[Core::ThumbV7, Core::ThumbV7em]),
    (Core::ThumbV7em, &[Core::ThumbV7]),
    (Core::ThumbV7s, &[Core::ThumbV7]),
    (Core::ThumbV7f, &[Core::ThumbV7]),
    (Core::ThumbV7k, &[Core::ThumbV7]),
    (Core::Arm64, &[Core::ArmV8, Core::Aarch64]),
    (Core::ArmV8, &[Core::Aarch64]),
    (Core::Mips32r2, &[Core::Mips32]),
    (Core::Mips32r3, &[Core::Mips32]),
    (Core::Mips32r5, &[Core::Mips32]),
    (Core::Mips32r2el, &[Core::Mips32el]),
    (Core::Mips32r3el, &[Core::Mips32el]),
    (Core::Mips32r5el, &[Core::Mips32el]),
    (Core::Mips64r2, &[Core::Mips64]),
    (Core::Mips64r3, &[Core::Mips64]),
    (Core::Mips64r5, &[Core::Mips64]),
    (Core::Mips64r2el, &[Core::Mips64el]),
    (Core::Mips64r3el, &[Core::Mips64el]),
    (Core::Mips64r5el, &[Core::Mips64el]),
    (Core::Ppc970_64, &[Core::Ppc64Generic]),
    (Core::I486, &[Core::I386]),
    (Core::I486sx, &[Core::I386]),
    (Core::I686, &[Core::I386]),
    (Core::X86_64h, &[Core::X86_64]),
    (Core::HexagonV4, &[Core::HexagonGeneric]),
    (Core::HexagonV5, &[Core::HexagonGeneric]),
];

fn compatible_neighbors(core: Core) -> &'static [Core] {
    COMPATIBLE_CORES
        .iter()
        .find(|(c, _)| *c == core)
        .map(|(_, neighbors)| *neighbors)
        .unwrap_or(&[])
}

/// A core, or a wildcard standing for a family of cores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorePattern {
    Exact(Core),
    Any,
    /// Every ARM and Thumb core.
    ArmAny,
    PpcAny,
    Ppc64Any,
    X86_32Any,
    X86_64Any,
    HexagonAny,
}

impl CorePattern {
    pub fn matches(self, core: Core) -> bool {
        match self {
            CorePattern::Exact(c) => c == core,
            CorePattern::Any => true,
            CorePattern::ArmAny => core.machine().is_arm_family(),
            CorePattern::PpcAny => core.machine() == Machine::Ppc,
            CorePattern::Ppc64Any => core.machine() == Machine::Ppc64,
            CorePattern::X86_32Any => core.machine() == Machine::X86,
            CorePattern::X86_64Any => core.machine() == Machine::X86_64,
            CorePattern::HexagonAny => core.machine() == Machine::Hexagon,
        }
    }
}

impl From<Core> for CorePattern {
    fn from(core: Core) -> Self {
        CorePattern::Exact(core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_discriminant() {
        for (i, d) in CORE_DEFINITIONS.iter().enumerate() {
            assert_eq!(d.core as usize, i, "{} is out of place", d.name);
        }
        assert_eq!(Core::all().count(), NUM_CORES);
    }

    #[test]
    fn names_are_unique() {
        for a in Core::all() {
            assert_eq!(Core::from_name(a.name()), Some(a));
        }
    }

    #[test]
    fn from_name_ignores_case() {
        assert_eq!(Core::from_name("ARMv7S"), Some(Core::ArmV7s));
        assert_eq!(Core::from_name("X86_64h"), Some(Core::X86_64h));
        assert_eq!(Core::from_name("z80"), None);
    }

    #[test]
    fn kalimba_bus_widths() {
        let k3 = Core::Kalimba3.definition();
        assert_eq!((k3.data_byte_size, k3.code_byte_size), (4, 4));
        let k5 = Core::Kalimba5.definition();
        assert_eq!((k5.data_byte_size, k5.code_byte_size), (4, 1));
        assert_eq!(Core::X86_64.definition().data_byte_size, 1);
    }

    #[test]
    fn compatibility_is_symmetric() {
        for a in Core::all() {
            for b in Core::all() {
                assert_eq!(
                    a.is_compatible_with(b),
                    b.is_compatible_with(a),
                    "{a} vs {b}"
                );
            }
        }
    }

    #[test]
    fn arm_family_compatibility() {
        assert!(Core::ArmV7s.is_compatible_with(Core::ArmV7));
        assert!(!Core::ArmV7s.is_compatible_with(Core::ArmV7k));
        assert!(Core::ArmGeneric.is_compatible_with(Core::ThumbV7em));
        assert!(!Core::ArmV7.is_compatible_with(Core::Arm64));
        assert!(Core::Aarch64.is_compatible_with(Core::Arm64));
        assert!(!Core::Mips32r6.is_compatible_with(Core::Mips32));
    }

    #[test]
    fn x86_compatibility() {
        assert!(Core::X86_64h.is_compatible_with(Core::X86_64));
        assert!(Core::I686.is_compatible_with(Core::I386));
        assert!(!Core::I686.is_compatible_with(Core::X86_64));
    }

    #[test]
    fn wildcard_patterns() {
        assert!(CorePattern::ArmAny.matches(Core::ThumbV6));
        assert!(!CorePattern::ArmAny.matches(Core::Aarch64));
        assert!(CorePattern::X86_64Any.matches(Core::X86_64h));
        assert!(CorePattern::Any.matches(Core::Kalimba4));
        assert!(CorePattern::from(Core::Ppc970).matches(Core::Ppc970));
        assert!(!CorePattern::PpcAny.matches(Core::Ppc970_64));
    }

    #[test]
    fn core_serializes_by_name() {
        let json = serde_json::to_string(&Core::Ppc970_64).unwrap();
        assert_eq!(json, "\"ppc970-64\"");
        let back: Core = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Core::Ppc970_64);
        assert!(serde_json::from_str::<Core>("\"nope\"").is_err());
    }
}
