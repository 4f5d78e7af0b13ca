//! Error types for architecture and platform operations.
//!
//! Resolving an architecture never fails: unrecognized input yields an
//! invalid [`ArchSpec`](crate::ArchSpec). These errors cover the fallible
//! edges around it: platform files, strict parsing, and CLI-facing names.

use std::path::PathBuf;

/// Errors that can occur outside of permissive architecture resolution.
#[derive(Debug, thiserror::Error)]
pub enum ArchError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading/writing platform files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Platform file not found.
    #[error("platform file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// A triple whose architecture token does not name any core.
    #[error("unrecognized architecture '{triple}'")]
    UnrecognizedArchitecture {
        /// The input as given.
        triple: String,
    },

    /// An object format name that is not Mach-O, ELF or COFF.
    #[error("unknown object format '{name}' (expected mach-o, elf or coff)")]
    UnknownObjectFormat {
        /// The name as given.
        name: String,
    },

    /// Validation error in a platform definition.
    #[error("validation error: {detail}")]
    Validation {
        /// Description of the validation failure.
        detail: String,
    },
}

/// Result type for fallible architecture operations.
pub type Result<T> = std::result::Result<T, ArchError>;
