//! CLI command implementations.

pub mod compare;
pub mod complete;
pub mod cpu;
pub mod merge;
pub mod platform;
pub mod resolve;

use anyhow::{bail, Result};
use archspec::ArchSpec;
use serde::Serialize;

/// Everything the CLI reports about a resolved architecture.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArchSummary {
    pub triple: String,
    pub valid: bool,
    pub core: Option<&'static str>,
    pub machine: &'static str,
    pub byte_order: &'static str,
    pub address_byte_size: u32,
    pub min_opcode_byte_size: u32,
    pub max_opcode_byte_size: u32,
    pub data_byte_size: u32,
    pub code_byte_size: u32,
    pub char_is_signed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macho_cpu_type: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macho_cpu_subtype: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_id: Option<String>,
}

impl ArchSummary {
    pub fn new(arch: &ArchSpec) -> Self {
        Self {
            triple: arch.triple().to_string(),
            valid: arch.is_valid(),
            core: arch.core().map(|c| c.name()),
            machine: arch.machine().as_str(),
            byte_order: arch.byte_order().as_str(),
            address_byte_size: arch.address_byte_size(),
            min_opcode_byte_size: arch.minimum_opcode_byte_size(),
            max_opcode_byte_size: arch.maximum_opcode_byte_size(),
            data_byte_size: arch.data_byte_size(),
            code_byte_size: arch.code_byte_size(),
            char_is_signed: arch.char_is_signed_by_default(),
            macho_cpu_type: arch.macho_cpu_type(),
            macho_cpu_subtype: arch.macho_cpu_subtype(),
            distribution_id: arch.distribution_id().map(str::to_string),
        }
    }

    /// Render as `text` (default) or `json`.
    pub fn render(&self, format: Option<&str>) -> Result<String> {
        match format {
            None | Some("text") => Ok(self.to_text()),
            Some("json") => Ok(serde_json::to_string_pretty(self)?),
            Some(other) => bail!("unknown format '{other}' (expected text or json)"),
        }
    }

    fn to_text(&self) -> String {
        let mut out = format!("Triple:        {}\n", self.triple);
        let Some(core) = self.core else {
            out.push_str("Core:          (unrecognized)\n");
            return out;
        };
        out.push_str(&format!("Core:          {core} ({})\n", self.machine));
        out.push_str(&format!("Byte order:    {}\n", self.byte_order));
        out.push_str(&format!("Address size:  {} bytes\n", self.address_byte_size));
        out.push_str(&format!(
            "Opcode size:   {}..{} bytes\n",
            self.min_opcode_byte_size, self.max_opcode_byte_size
        ));
        if self.data_byte_size != 1 || self.code_byte_size != 1 {
            out.push_str(&format!(
                "Bus width:     data {} / code {} bytes\n",
                self.data_byte_size, self.code_byte_size
            ));
        }
        out.push_str(&format!(
            "char:          {}\n",
            if self.char_is_signed { "signed" } else { "unsigned" }
        ));
        if let (Some(cpu), Some(sub)) = (self.macho_cpu_type, self.macho_cpu_subtype) {
            out.push_str(&format!("Mach-O:        {cpu:#x} / {sub:#x}\n"));
        }
        if let Some(id) = &self.distribution_id {
            out.push_str(&format!("Distribution:  {id}\n"));
        }
        out
    }
}
