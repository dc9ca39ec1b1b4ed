//! Model and hardware lookup tables
//!
//! A `Catalog` starts from the built-in presets and can be extended at
//! runtime, either one entry at a time or from a JSON file:
//!
//! ```json
//! {
//!   "models":   { "qwen-32b": { "params": 32, "layers": 64, "hidden_size": 5120 } },
//!   "hardware": { "l40s-48gb": { "vram_gb": 48, "bandwidth_gbps": 864,
//!                                "price_per_hour": 1.2, "cores": 18176 } }
//! }
//! ```

use crate::config::model::{ModelSpec, AVAILABLE_MODELS};
use crate::error::{CalcError, Result};
use crate::hardware::profiles::{HardwareSpec, HARDWARE_PROFILES};
use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

static CUSTOM_MODEL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^custom[-_]?(\d+(?:\.\d+)?)b$").expect("valid regex"));

static CUSTOM_HARDWARE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^custom[-_]?(\d+(?:\.\d+)?)gb$").expect("valid regex"));

/// On-disk catalog extension
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub models: HashMap<String, ModelSpec>,
    #[serde(default)]
    pub hardware: HashMap<String, HardwareSpec>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    models: HashMap<String, ModelSpec>,
    hardware: HashMap<String, HardwareSpec>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// Catalog seeded with the built-in presets
    pub fn builtin() -> Self {
        Self {
            models: (*AVAILABLE_MODELS).clone(),
            hardware: (*HARDWARE_PROFILES).clone(),
        }
    }

    pub fn empty() -> Self {
        Self {
            models: HashMap::new(),
            hardware: HashMap::new(),
        }
    }

    /// Add or replace a model
    pub fn register_model(&mut self, id: impl Into<String>, spec: ModelSpec) -> Result<()> {
        let id = id.into();
        spec.validate(&id)?;
        if self.models.insert(id.clone(), spec).is_some() {
            tracing::debug!("Replaced model {}", id);
        }
        Ok(())
    }

    /// Add or replace an accelerator
    pub fn register_hardware(&mut self, id: impl Into<String>, spec: HardwareSpec) -> Result<()> {
        let id = id.into();
        spec.validate(&id)?;
        if self.hardware.insert(id.clone(), spec).is_some() {
            tracing::debug!("Replaced hardware {}", id);
        }
        Ok(())
    }

    /// Register every entry of a parsed catalog file
    pub fn merge(&mut self, file: CatalogFile) -> Result<()> {
        for (id, spec) in file.models {
            self.register_model(id, spec)?;
        }
        for (id, spec) in file.hardware {
            self.register_hardware(id, spec)?;
        }
        Ok(())
    }

    pub fn merge_json_file<P: AsRef<Path>>(&mut self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        let file: CatalogFile = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse catalog {}", path.display()))?;

        let (models, hardware) = (file.models.len(), file.hardware.len());
        self.merge(file)?;
        tracing::info!(
            "Loaded {} models and {} hardware entries from {}",
            models,
            hardware,
            path.display()
        );
        Ok(())
    }

    /// Built-in presets extended by a JSON catalog file
    pub fn load_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let mut catalog = Self::builtin();
        catalog.merge_json_file(path)?;
        Ok(catalog)
    }

    /// Look up a model by id, accepting `custom-<N>b` for ad-hoc sizes
    pub fn model(&self, id: &str) -> Result<ModelSpec> {
        if let Some(spec) = self.models.get(id) {
            return Ok(spec.clone());
        }

        let custom = CUSTOM_MODEL_PATTERN
            .captures(&id.to_lowercase())
            .and_then(|caps| caps[1].parse::<f64>().ok())
            .map(ModelSpec::custom);

        match custom {
            Some(spec) if spec.validate(id).is_ok() => Ok(spec),
            _ => Err(CalcError::UnknownModel {
                id: id.to_string(),
                available: self.model_ids(),
            }),
        }
    }

    /// Look up an accelerator by id, accepting `custom-<N>gb` for ad-hoc cards
    pub fn hardware(&self, id: &str) -> Result<HardwareSpec> {
        if let Some(spec) = self.hardware.get(id) {
            return Ok(spec.clone());
        }

        let custom = CUSTOM_HARDWARE_PATTERN
            .captures(&id.to_lowercase())
            .and_then(|caps| caps[1].parse::<f64>().ok())
            .map(HardwareSpec::custom);

        match custom {
            Some(spec) if spec.validate(id).is_ok() => Ok(spec),
            _ => Err(CalcError::UnknownHardware {
                id: id.to_string(),
                available: self.hardware_ids(),
            }),
        }
    }

    pub fn model_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.models.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn hardware_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.hardware.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Models sorted by id
    pub fn models(&self) -> Vec<(&str, &ModelSpec)> {
        let mut entries: Vec<_> = self.models.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Accelerators sorted by id
    pub fn hardware_entries(&self) -> Vec<(&str, &HardwareSpec)> {
        let mut entries: Vec<_> = self.hardware.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.model("llama-13b").unwrap().layers, 40);
        assert_eq!(catalog.hardware("h100-80gb").unwrap().cores, 14592);
    }

    #[test]
    fn test_unknown_ids_list_available() {
        let catalog = Catalog::builtin();
        match catalog.model("falcon-180b") {
            Err(CalcError::UnknownModel { id, available }) => {
                assert_eq!(id, "falcon-180b");
                assert!(available.contains(&"llama-7b".to_string()));
            }
            other => panic!("expected UnknownModel, got {:?}", other),
        }
        assert!(matches!(
            catalog.hardware("mi300x"),
            Err(CalcError::UnknownHardware { .. })
        ));
    }

    #[test]
    fn test_custom_ids() {
        let catalog = Catalog::builtin();

        let model = catalog.model("custom-7b").unwrap();
        assert_eq!(model, ModelSpec::custom(7.0));
        let model = catalog.model("Custom_1.5B").unwrap();
        assert_eq!(model.params, 1.5);

        let card = catalog.hardware("custom-24gb").unwrap();
        assert_eq!(card.vram_gb, 24.0);

        assert!(catalog.model("custom-0b").is_err());
        assert!(catalog.hardware("custom-gb").is_err());
    }

    #[test]
    fn test_custom_ids_overflowing_f64_are_unknown() {
        let catalog = Catalog::builtin();
        let digits = "9".repeat(400);

        assert!(matches!(
            catalog.model(&format!("custom-{}b", digits)),
            Err(CalcError::UnknownModel { .. })
        ));
        assert!(matches!(
            catalog.hardware(&format!("custom-{}gb", digits)),
            Err(CalcError::UnknownHardware { .. })
        ));
    }

    #[test]
    fn test_register_replaces_and_validates() {
        let mut catalog = Catalog::empty();
        catalog
            .register_model("tiny", ModelSpec::dense(1.0, 8, 1024))
            .unwrap();
        catalog
            .register_model("tiny", ModelSpec::dense(2.0, 8, 1024))
            .unwrap();
        assert_eq!(catalog.model("tiny").unwrap().params, 2.0);
        assert_eq!(catalog.model_ids(), vec!["tiny".to_string()]);

        let err = catalog.register_hardware("bad", HardwareSpec::new(0.0, 100.0, 1.0, 10));
        assert!(matches!(err, Err(CalcError::InvalidHardwareSpec { .. })));
    }

    #[test]
    fn test_ids_are_sorted() {
        let catalog = Catalog::builtin();
        let ids = catalog.hardware_ids();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.len(), 5);
    }
}
