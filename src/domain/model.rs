//! Catalog entries for servable models.

use serde::{Deserialize, Serialize};

use super::resources::Quantization;

/// A model the fleet knows how to serve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    /// Quantization levels the model's loader supports.
    pub quantizations: Vec<Quantization>,
}

impl ModelSpec {
    /// A model that supports every quantization level.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantizations: Quantization::ALL.to_vec(),
        }
    }

    #[must_use]
    pub fn with_quantizations(mut self, quantizations: Vec<Quantization>) -> Self {
        self.quantizations = quantizations;
        self
    }

    #[must_use]
    pub fn supports(&self, quantization: Quantization) -> bool {
        self.quantizations.contains(&quantization)
    }

    /// Lowercase slug used as a prefix for generated worker names.
    #[must_use]
    pub fn slug(&self) -> String {
        let slug: String = self
            .name
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        let slug = slug.trim_matches('-');
        let slug = slug.trim_start_matches(|c: char| c.is_ascii_digit() || c == '-');
        let mut slug: String = slug.chars().take(40).collect();
        while slug.ends_with('-') {
            slug.pop();
        }
        if slug.is_empty() {
            "worker".to_string()
        } else {
            slug
        }
    }
}

/// Catalog used when none is configured.
#[must_use]
pub fn default_catalog() -> Vec<ModelSpec> {
    vec![
        ModelSpec::new("llama-7b"),
        ModelSpec::new("llama-13b"),
        ModelSpec::new("mistral-7b"),
        // MPT's loader has no 8-bit path.
        ModelSpec::new("mpt-7b-chat").with_quantizations(vec![Quantization::Float16]),
    ]
}
