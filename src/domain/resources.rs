//! Requested GPU resource shape for a worker.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Weight quantization the worker loads its model with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantization {
    Float16,
    Int8,
    Int4,
}

impl Quantization {
    pub const ALL: [Self; 3] = [Self::Float16, Self::Int8, Self::Int4];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Float16 => "float16",
            Self::Int8 => "int8",
            Self::Int4 => "int4",
        }
    }
}

impl fmt::Display for Quantization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quantization {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "float16" | "fp16" | "none" => Ok(Self::Float16),
            "int8" => Ok(Self::Int8),
            "int4" => Ok(Self::Int4),
            _ => Err(DomainError::UnknownQuantization(s.to_string())),
        }
    }
}

/// Accelerator model attached to the worker VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GpuType {
    T4,
    L4,
    A100,
    #[serde(rename = "A100-80GB")]
    A100_80Gb,
    H100,
}

impl GpuType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::T4 => "T4",
            Self::L4 => "L4",
            Self::A100 => "A100",
            Self::A100_80Gb => "A100-80GB",
            Self::H100 => "H100",
        }
    }
}

impl fmt::Display for GpuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GpuType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('_', "-").as_str() {
            "T4" => Ok(Self::T4),
            "L4" => Ok(Self::L4),
            "A100" => Ok(Self::A100),
            "A100-80GB" => Ok(Self::A100_80Gb),
            "H100" => Ok(Self::H100),
            _ => Err(DomainError::UnknownGpuType(s.to_string())),
        }
    }
}

/// Resource shape requested when a worker is created. Immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceShape {
    pub quantization: Quantization,
    pub gpu_type: GpuType,
    pub gpu_count: u32,
}

impl ResourceShape {
    /// Validate a resource shape.
    pub fn try_new(
        quantization: Quantization,
        gpu_type: GpuType,
        gpu_count: u32,
    ) -> Result<Self, DomainError> {
        if !matches!(gpu_count, 1 | 2 | 4 | 8) {
            return Err(DomainError::InvalidGpuCount { count: gpu_count });
        }
        Ok(Self {
            quantization,
            gpu_type,
            gpu_count,
        })
    }

    /// Parse a shape from its wire representation.
    pub fn parse(quantization: &str, gpu_type: &str, gpu_count: u32) -> Result<Self, DomainError> {
        Self::try_new(quantization.parse()?, gpu_type.parse()?, gpu_count)
    }
}
