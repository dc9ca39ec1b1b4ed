use crate::error::{CalcError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Architecture figures for one LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Total parameters, in billions
    pub params: f64,
    pub layers: usize,
    pub hidden_size: usize,
    #[serde(default)]
    pub is_moe: bool,
    /// Parameters touched per token, in billions. Falls back to `params`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_params: Option<f64>,
}

impl ModelSpec {
    pub fn dense(params: f64, layers: usize, hidden_size: usize) -> Self {
        Self {
            params,
            layers,
            hidden_size,
            is_moe: false,
            active_params: None,
        }
    }

    pub fn moe(params: f64, layers: usize, hidden_size: usize, active_params: f64) -> Self {
        Self {
            params,
            layers,
            hidden_size,
            is_moe: true,
            active_params: Some(active_params),
        }
    }

    /// Rough architecture for an arbitrary parameter count:
    /// 4 layers and 500 hidden units per billion parameters.
    pub fn custom(params: f64) -> Self {
        Self::dense(
            params,
            (params * 4.0).ceil() as usize,
            (params * 500.0).ceil() as usize,
        )
    }

    pub fn active_params(&self) -> f64 {
        self.active_params.unwrap_or(self.params)
    }

    /// Parameters that must be streamed from memory per generated token
    pub fn effective_params(&self) -> f64 {
        if self.is_moe {
            self.active_params()
        } else {
            self.params
        }
    }

    pub fn validate(&self, id: &str) -> Result<()> {
        let invalid = |reason: String| CalcError::InvalidModelSpec {
            id: id.to_string(),
            reason,
        };

        if !(self.params > 0.0 && self.params.is_finite()) {
            return Err(invalid(format!(
                "params must be positive and finite, got {}",
                self.params
            )));
        }
        if self.layers == 0 {
            return Err(invalid("layers must be positive".to_string()));
        }
        if self.hidden_size == 0 {
            return Err(invalid("hidden_size must be positive".to_string()));
        }
        if self.is_moe {
            let active = self.active_params();
            if !(active > 0.0) || active > self.params {
                return Err(invalid(format!(
                    "active_params must be in (0, {}], got {}",
                    self.params, active
                )));
            }
        } else if let Some(active) = self.active_params {
            if active != self.params {
                return Err(invalid(format!(
                    "dense model must have active_params equal to params ({}), got {}",
                    self.params, active
                )));
            }
        }
        Ok(())
    }
}

/// Built-in model presets
pub static AVAILABLE_MODELS: Lazy<HashMap<String, ModelSpec>> = Lazy::new(|| {
    let mut models = HashMap::new();

    models.insert("llama-7b".to_string(), ModelSpec::dense(7.0, 32, 4096));
    models.insert("llama-13b".to_string(), ModelSpec::dense(13.0, 40, 5120));
    models.insert("llama-70b".to_string(), ModelSpec::dense(70.0, 80, 8192));

    // Mixture-of-experts: weights and bandwidth scale with active experts only
    models.insert(
        "mixtral-8x7b".to_string(),
        ModelSpec::moe(56.0, 32, 4096, 14.0),
    );
    models.insert(
        "gpt-4".to_string(),
        ModelSpec::moe(1700.0, 120, 12288, 400.0),
    );

    models
});
