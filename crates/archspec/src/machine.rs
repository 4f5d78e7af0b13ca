//! Coarse machine families and byte ordering.
//!
//! A [`Machine`] is the architecture type a triple names (ARM, x86-64, MIPS
//! little-endian, ...). It is much coarser than a resolved
//! [`Core`](crate::cores::Core): every core belongs to exactly one machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Byte ordering of the target architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ByteOrder {
    Big,
    Little,
    /// Unknown, or not yet resolved. Returned for invalid architectures.
    Invalid,
}

impl ByteOrder {
    /// Whether this is a concrete ordering.
    pub fn is_valid(self) -> bool {
        self != ByteOrder::Invalid
    }

    /// Lowercase name used in triples and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            ByteOrder::Big => "big",
            ByteOrder::Little => "little",
            ByteOrder::Invalid => "invalid",
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Architecture family as named by the first component of a triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Machine {
    Arm,
    Thumb,
    Aarch64,
    Mips,
    Mipsel,
    Mips64,
    Mips64el,
    Ppc,
    Ppc64,
    Sparc,
    Sparcv9,
    X86,
    X86_64,
    Hexagon,
    Kalimba,
    Unknown,
}

impl Machine {
    /// The canonical triple spelling of this family.
    pub fn as_str(self) -> &'static str {
        match self {
            Machine::Arm => "arm",
            Machine::Thumb => "thumb",
            Machine::Aarch64 => "aarch64",
            Machine::Mips => "mips",
            Machine::Mipsel => "mipsel",
            Machine::Mips64 => "mips64",
            Machine::Mips64el => "mips64el",
            Machine::Ppc => "powerpc",
            Machine::Ppc64 => "powerpc64",
            Machine::Sparc => "sparc",
            Machine::Sparcv9 => "sparcv9",
            Machine::X86 => "i386",
            Machine::X86_64 => "x86_64",
            Machine::Hexagon => "hexagon",
            Machine::Kalimba => "kalimba",
            Machine::Unknown => "unknown",
        }
    }

    /// Families whose hardware runs in either byte order.
    ///
    /// MIPS is absent: each MIPS endianness is a separate family.
    pub const fn is_bi_endian(self) -> bool {
        matches!(
            self,
            Machine::Arm | Machine::Thumb | Machine::Aarch64 | Machine::Ppc | Machine::Ppc64
        )
    }

    /// Whether plain `char` is signed on this family absent any OS override.
    pub const fn char_is_signed(self) -> bool {
        !matches!(
            self,
            Machine::Arm | Machine::Thumb | Machine::Aarch64 | Machine::Ppc | Machine::Ppc64
        )
    }

    /// ARM or Thumb, the families covered by the generic ARM core.
    pub fn is_arm_family(self) -> bool {
        matches!(self, Machine::Arm | Machine::Thumb)
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bi_endian_families() {
        assert!(Machine::Arm.is_bi_endian());
        assert!(Machine::Ppc64.is_bi_endian());
        assert!(!Machine::X86_64.is_bi_endian());
        assert!(!Machine::Mipsel.is_bi_endian());
    }

    #[test]
    fn byte_order_serializes_kebab_case() {
        let json = serde_json::to_string(&ByteOrder::Little).unwrap();
        assert_eq!(json, "\"little\"");
        assert!(!ByteOrder::Invalid.is_valid());
    }
}
