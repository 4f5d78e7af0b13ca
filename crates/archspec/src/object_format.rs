//! Raw `(cpu type, cpu subtype)` numbering schemes of binary formats.
//!
//! Binary parsers hand us the numbers found in a file header: Mach-O
//! `cputype`/`cpusubtype`, ELF `e_machine` (plus a MIPS/Kalimba variant), or
//! a COFF machine word. Each scheme has an ordered table mapping those
//! tuples to cores. Forward lookups take the first matching entry, and
//! reverse lookups take the first entry listed for a core, which makes the
//! first entry per core the canonical tuple.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cores::Core;
use crate::error::ArchError;

/// Binary container whose cpu numbering is being used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectFormat {
    MachO,
    Elf,
    Coff,
}

impl ObjectFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectFormat::MachO => "mach-o",
            ObjectFormat::Elf => "elf",
            ObjectFormat::Coff => "coff",
        }
    }

    /// The tuple table for this format.
    pub fn entries(self) -> &'static [CpuEntry] {
        match self {
            ObjectFormat::MachO => MACHO_ENTRIES,
            ObjectFormat::Elf => ELF_ENTRIES,
            ObjectFormat::Coff => COFF_ENTRIES,
        }
    }

    /// Resolve a raw tuple to a core.
    pub fn find_core(self, cpu_type: u32, cpu_subtype: u32) -> Option<Core> {
        let subtype = cpu_subtype & self.subtype_mask();
        self.entries()
            .iter()
            .find(|e| e.cpu_type == cpu_type && e.subtype.accepts(subtype))
            .map(|e| e.core)
    }

    /// Canonical table entry for a core, if the format can describe it.
    pub fn find_entry(self, core: Core) -> Option<&'static CpuEntry> {
        self.entries().iter().find(|e| e.core == core)
    }

    fn subtype_mask(self) -> u32 {
        match self {
            ObjectFormat::MachO => CPU_SUBTYPE_MASK,
            ObjectFormat::Elf | ObjectFormat::Coff => u32::MAX,
        }
    }
}

impl fmt::Display for ObjectFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectFormat {
    type Err = ArchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mach-o" | "macho" => Ok(ObjectFormat::MachO),
            "elf" => Ok(ObjectFormat::Elf),
            "coff" | "pe" => Ok(ObjectFormat::Coff),
            _ => Err(ArchError::UnknownObjectFormat { name: s.into() }),
        }
    }
}

/// Subtype half of a table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subtype {
    /// Matches exactly this (masked) subtype.
    Exact(u32),
    /// Matches any subtype. Listed after the exact entries of the same cpu
    /// type so it only catches what they miss.
    Any,
}

impl Subtype {
    fn accepts(self, subtype: u32) -> bool {
        match self {
            Subtype::Exact(s) => s == subtype,
            Subtype::Any => true,
        }
    }

    /// Numeric form; [`Subtype::Any`] is `CPU_SUBTYPE_ANY`.
    pub fn raw(self) -> u32 {
        match self {
            Subtype::Exact(s) => s,
            Subtype::Any => CPU_SUBTYPE_ANY,
        }
    }
}

/// One row of a tuple table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuEntry {
    pub core: Core,
    pub cpu_type: u32,
    pub subtype: Subtype,
}

const fn entry(core: Core, cpu_type: u32, subtype: u32) -> CpuEntry {
    CpuEntry {
        core,
        cpu_type,
        subtype: Subtype::Exact(subtype),
    }
}

const fn any(core: Core, cpu_type: u32) -> CpuEntry {
    CpuEntry {
        core,
        cpu_type,
        subtype: Subtype::Any,
    }
}

/// Mach-O capability bits live in the top byte of the subtype.
pub const CPU_SUBTYPE_MASK: u32 = 0x00FF_FFFF;
pub const CPU_SUBTYPE_ANY: u32 = u32::MAX;
pub const CPU_ARCH_ABI64: u32 = 0x0100_0000;

pub const CPU_TYPE_X86: u32 = 7;
pub const CPU_TYPE_X86_64: u32 = CPU_TYPE_X86 | CPU_ARCH_ABI64;
pub const CPU_TYPE_ARM: u32 = 12;
pub const CPU_TYPE_ARM64: u32 = CPU_TYPE_ARM | CPU_ARCH_ABI64;
pub const CPU_TYPE_POWERPC: u32 = 18;
pub const CPU_TYPE_POWERPC64: u32 = CPU_TYPE_POWERPC | CPU_ARCH_ABI64;

static MACHO_ENTRIES: &[CpuEntry] = &[
    entry(Core::ArmGeneric, CPU_TYPE_ARM, 0),
    entry(Core::ArmV4t, CPU_TYPE_ARM, 5),
    entry(Core::ArmV6, CPU_TYPE_ARM, 6),
    entry(Core::ArmV5, CPU_TYPE_ARM, 7),
    entry(Core::ArmXscale, CPU_TYPE_ARM, 8),
    entry(Core::ArmV7, CPU_TYPE_ARM, 9),
    entry(Core::ArmV7f, CPU_TYPE_ARM, 10),
    entry(Core::ArmV7s, CPU_TYPE_ARM, 11),
    entry(Core::ArmV7k, CPU_TYPE_ARM, 12),
    entry(Core::ArmV6m, CPU_TYPE_ARM, 14),
    entry(Core::ArmV7m, CPU_TYPE_ARM, 15),
    entry(Core::ArmV7em, CPU_TYPE_ARM, 16),
    any(Core::ArmGeneric, CPU_TYPE_ARM),
    // Thumb shares the ARM numbers; forward lookups land on the ARM core.
    entry(Core::Thumb, CPU_TYPE_ARM, 0),
    entry(Core::ThumbV4t, CPU_TYPE_ARM, 5),
    entry(Core::ThumbV5, CPU_TYPE_ARM, 7),
    entry(Core::ThumbV6, CPU_TYPE_ARM, 6),
    entry(Core::ThumbV6m, CPU_TYPE_ARM, 14),
    entry(Core::ThumbV7, CPU_TYPE_ARM, 9),
    entry(Core::ThumbV7f, CPU_TYPE_ARM, 10),
    entry(Core::ThumbV7s, CPU_TYPE_ARM, 11),
    entry(Core::ThumbV7k, CPU_TYPE_ARM, 12),
    entry(Core::ThumbV7m, CPU_TYPE_ARM, 15),
    entry(Core::ThumbV7em, CPU_TYPE_ARM, 16),
    entry(Core::Arm64, CPU_TYPE_ARM64, 0),
    entry(Core::Arm64, CPU_TYPE_ARM64, 1),
    entry(Core::Arm64, CPU_TYPE_ARM64, 13),
    any(Core::Arm64, CPU_TYPE_ARM64),
    entry(Core::PpcGeneric, CPU_TYPE_POWERPC, 0),
    entry(Core::Ppc601, CPU_TYPE_POWERPC, 1),
    entry(Core::Ppc602, CPU_TYPE_POWERPC, 2),
    entry(Core::Ppc603, CPU_TYPE_POWERPC, 3),
    entry(Core::Ppc603e, CPU_TYPE_POWERPC, 4),
    entry(Core::Ppc603ev, CPU_TYPE_POWERPC, 5),
    entry(Core::Ppc604, CPU_TYPE_POWERPC, 6),
    entry(Core::Ppc604e, CPU_TYPE_POWERPC, 7),
    entry(Core::Ppc620, CPU_TYPE_POWERPC, 8),
    entry(Core::Ppc750, CPU_TYPE_POWERPC, 9),
    entry(Core::Ppc7400, CPU_TYPE_POWERPC, 10),
    entry(Core::Ppc7450, CPU_TYPE_POWERPC, 11),
    entry(Core::Ppc970, CPU_TYPE_POWERPC, 100),
    any(Core::PpcGeneric, CPU_TYPE_POWERPC),
    entry(Core::Ppc64Generic, CPU_TYPE_POWERPC64, 0),
    entry(Core::Ppc970_64, CPU_TYPE_POWERPC64, 100),
    entry(Core::I386, CPU_TYPE_X86, 3),
    entry(Core::I486, CPU_TYPE_X86, 4),
    entry(Core::I486sx, CPU_TYPE_X86, 0x84),
    any(Core::I386, CPU_TYPE_X86),
    entry(Core::X86_64, CPU_TYPE_X86_64, 3),
    entry(Core::X86_64, CPU_TYPE_X86_64, 4),
    entry(Core::X86_64h, CPU_TYPE_X86_64, 8),
    any(Core::X86_64, CPU_TYPE_X86_64),
];

pub const EM_SPARC: u32 = 2;
pub const EM_386: u32 = 3;
pub const EM_486: u32 = 6;
pub const EM_MIPS: u32 = 8;
pub const EM_PPC: u32 = 20;
pub const EM_PPC64: u32 = 21;
pub const EM_ARM: u32 = 40;
pub const EM_SPARCV9: u32 = 43;
pub const EM_X86_64: u32 = 62;
pub const EM_HEXAGON: u32 = 164;
pub const EM_AARCH64: u32 = 183;
pub const EM_CSR_KALIMBA: u32 = 219;

/// ELF subtypes distinguishing MIPS variants (derived from `e_flags`).
pub mod mips_subtype {
    pub const MIPS32: u32 = 1;
    pub const MIPS32R2: u32 = 2;
    pub const MIPS32R6: u32 = 3;
    pub const MIPS32EL: u32 = 4;
    pub const MIPS32R2EL: u32 = 5;
    pub const MIPS32R6EL: u32 = 6;
    pub const MIPS64: u32 = 7;
    pub const MIPS64R2: u32 = 8;
    pub const MIPS64R6: u32 = 9;
    pub const MIPS64EL: u32 = 10;
    pub const MIPS64R2EL: u32 = 11;
    pub const MIPS64R6EL: u32 = 12;
}

/// ELF subtypes distinguishing Kalimba DSP generations.
pub mod kalimba_subtype {
    pub const V3: u32 = 3;
    pub const V4: u32 = 4;
    pub const V5: u32 = 5;
}

static ELF_ENTRIES: &[CpuEntry] = &[
    any(Core::SparcGeneric, EM_SPARC),
    any(Core::I386, EM_386),
    any(Core::I486, EM_486),
    any(Core::PpcGeneric, EM_PPC),
    any(Core::Ppc64Generic, EM_PPC64),
    any(Core::ArmGeneric, EM_ARM),
    any(Core::Sparc9Generic, EM_SPARCV9),
    any(Core::X86_64, EM_X86_64),
    entry(Core::Mips32, EM_MIPS, mips_subtype::MIPS32),
    entry(Core::Mips32r2, EM_MIPS, mips_subtype::MIPS32R2),
    entry(Core::Mips32r6, EM_MIPS, mips_subtype::MIPS32R6),
    entry(Core::Mips32el, EM_MIPS, mips_subtype::MIPS32EL),
    entry(Core::Mips32r2el, EM_MIPS, mips_subtype::MIPS32R2EL),
    entry(Core::Mips32r6el, EM_MIPS, mips_subtype::MIPS32R6EL),
    entry(Core::Mips64, EM_MIPS, mips_subtype::MIPS64),
    entry(Core::Mips64r2, EM_MIPS, mips_subtype::MIPS64R2),
    entry(Core::Mips64r6, EM_MIPS, mips_subtype::MIPS64R6),
    entry(Core::Mips64el, EM_MIPS, mips_subtype::MIPS64EL),
    entry(Core::Mips64r2el, EM_MIPS, mips_subtype::MIPS64R2EL),
    entry(Core::Mips64r6el, EM_MIPS, mips_subtype::MIPS64R6EL),
    any(Core::Mips32, EM_MIPS),
    any(Core::HexagonGeneric, EM_HEXAGON),
    any(Core::Aarch64, EM_AARCH64),
    entry(Core::Kalimba3, EM_CSR_KALIMBA, kalimba_subtype::V3),
    entry(Core::Kalimba4, EM_CSR_KALIMBA, kalimba_subtype::V4),
    entry(Core::Kalimba5, EM_CSR_KALIMBA, kalimba_subtype::V5),
];

pub const IMAGE_FILE_MACHINE_I386: u32 = 0x014C;
pub const IMAGE_FILE_MACHINE_ARM: u32 = 0x01C0;
pub const IMAGE_FILE_MACHINE_THUMB: u32 = 0x01C2;
pub const IMAGE_FILE_MACHINE_ARMNT: u32 = 0x01C4;
pub const IMAGE_FILE_MACHINE_AMD64: u32 = 0x8664;

static COFF_ENTRIES: &[CpuEntry] = &[
    any(Core::I386, IMAGE_FILE_MACHINE_I386),
    any(Core::ArmGeneric, IMAGE_FILE_MACHINE_ARM),
    any(Core::Thumb, IMAGE_FILE_MACHINE_THUMB),
    any(Core::ArmV7, IMAGE_FILE_MACHINE_ARMNT),
    any(Core::X86_64, IMAGE_FILE_MACHINE_AMD64),
];

#[cfg(test)]
mod tests {
    use super::*;

    const FORMATS: [ObjectFormat; 3] = [ObjectFormat::MachO, ObjectFormat::Elf, ObjectFormat::Coff];

    #[test]
    fn macho_lookups() {
        assert_eq!(ObjectFormat::MachO.find_core(CPU_TYPE_ARM, 11), Some(Core::ArmV7s));
        assert_eq!(ObjectFormat::MachO.find_core(CPU_TYPE_X86_64, 8), Some(Core::X86_64h));
        assert_eq!(
            ObjectFormat::MachO.find_core(CPU_TYPE_POWERPC64, 100),
            Some(Core::Ppc970_64)
        );
        // Unlisted subtype of a known cpu type falls back to the generic core.
        assert_eq!(ObjectFormat::MachO.find_core(CPU_TYPE_ARM, 99), Some(Core::ArmGeneric));
        assert_eq!(ObjectFormat::MachO.find_core(0x1234, 0), None);
    }

    #[test]
    fn macho_capability_bits_are_ignored() {
        // CPU_SUBTYPE_LIB64 on x86_64
        assert_eq!(
            ObjectFormat::MachO.find_core(CPU_TYPE_X86_64, 0x8000_0003),
            Some(Core::X86_64)
        );
    }

    #[test]
    fn elf_lookups() {
        assert_eq!(ObjectFormat::Elf.find_core(EM_X86_64, 0), Some(Core::X86_64));
        assert_eq!(ObjectFormat::Elf.find_core(EM_AARCH64, 7), Some(Core::Aarch64));
        assert_eq!(
            ObjectFormat::Elf.find_core(EM_MIPS, mips_subtype::MIPS64R6EL),
            Some(Core::Mips64r6el)
        );
        assert_eq!(ObjectFormat::Elf.find_core(EM_MIPS, 0), Some(Core::Mips32));
        assert_eq!(
            ObjectFormat::Elf.find_core(EM_CSR_KALIMBA, kalimba_subtype::V4),
            Some(Core::Kalimba4)
        );
        assert_eq!(ObjectFormat::Elf.find_core(EM_CSR_KALIMBA, 9), None);
        assert_eq!(ObjectFormat::Elf.find_core(0xFFFF, 0), None);
    }

    #[test]
    fn coff_lookups() {
        assert_eq!(
            ObjectFormat::Coff.find_core(IMAGE_FILE_MACHINE_AMD64, 0),
            Some(Core::X86_64)
        );
        assert_eq!(
            ObjectFormat::Coff.find_core(IMAGE_FILE_MACHINE_ARMNT, 0),
            Some(Core::ArmV7)
        );
    }

    #[test]
    fn canonical_entries_round_trip() {
        for format in FORMATS {
            for e in format.entries() {
                let canonical = format.find_entry(e.core).unwrap();
                if canonical != e {
                    continue;
                }
                let core = format.find_core(e.cpu_type, e.subtype.raw());
                // Shared numbers (Thumb on Mach-O) resolve to the earlier core,
                // whose canonical tuple is the same pair.
                let core = core.unwrap();
                let back = format.find_entry(core).unwrap();
                assert_eq!(
                    (back.cpu_type, back.subtype.raw()),
                    (e.cpu_type, e.subtype.raw()),
                    "{format}: {}",
                    e.core
                );
            }
        }
    }

    #[test]
    fn alias_entries_resolve_to_a_stable_tuple() {
        for format in FORMATS {
            for e in format.entries() {
                let Some(core) = format.find_core(e.cpu_type, e.subtype.raw()) else {
                    panic!("{format}: entry for {} does not resolve", e.core);
                };
                let canonical = format.find_entry(core).unwrap();
                assert_eq!(
                    format.find_core(canonical.cpu_type, canonical.subtype.raw()),
                    Some(core)
                );
            }
        }
    }

    #[test]
    fn parse_format_names() {
        assert_eq!("Mach-O".parse::<ObjectFormat>().unwrap(), ObjectFormat::MachO);
        assert_eq!("pe".parse::<ObjectFormat>().unwrap(), ObjectFormat::Coff);
        assert!("a.out".parse::<ObjectFormat>().is_err());
    }
}
