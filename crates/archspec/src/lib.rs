//! Target architecture and triple resolution.
//!
//! An [`ArchSpec`] identifies the architecture a debugger or binary tool is
//! working with. It is built from:
//! - **Triples:** `arch-vendor-os-environment` strings, with optional
//!   platform defaults for the parts left unspecified
//! - **Binary headers:** `(object format, cpu type, cpu subtype)` tuples from
//!   Mach-O, ELF or COFF files
//!
//! and resolves to one of a fixed set of fine-grained [`Core`]s, from which
//! byte order, address size, opcode sizes and compatibility all follow.

pub mod arch;
pub mod cores;
pub mod error;
pub mod machine;
pub mod object_format;
pub mod parse;
pub mod platform;
pub mod triple;

pub use arch::{ArchSpec, HostArchKind};
pub use cores::{Core, CorePattern};
pub use error::ArchError;
pub use machine::{ByteOrder, Machine};
pub use object_format::ObjectFormat;
pub use platform::{PlatformContext, PlatformDefaults};
pub use triple::Triple;
