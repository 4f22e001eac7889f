// Linear classifier loaded from an externally trained model file.
//
// Covers logistic regression and linear SVMs: export `coef_`, `intercept_`
// and (optionally) a StandardScaler's `mean_`/`scale_` to JSON. Training
// happens elsewhere; this side only reads and applies the weights.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{Classifier, Label};
use crate::features::{FeatureVector, FEATURE_COUNT, SCHEMA_VERSION};

fn default_positive_label() -> Label {
    Label::Legitimate
}

/// On-disk form of a linear model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub schema_version: u32,
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
    /// Per-feature mean subtracted before weighting
    #[serde(default)]
    pub mean: Option<Vec<f64>>,
    /// Per-feature scale divided out before weighting
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
    /// Label for a positive decision value. Matches the training data's
    /// class 1, which is legitimate.
    #[serde(default = "default_positive_label")]
    pub positive_label: Label,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LinearClassifier {
    model: LinearModel,
}

impl LinearClassifier {
    /// Validate a model's shape against the current feature schema.
    pub fn new(model: LinearModel) -> Result<Self> {
        if model.schema_version != SCHEMA_VERSION {
            anyhow::bail!(
                "Model was trained on feature schema v{} but this build extracts v{}",
                model.schema_version,
                SCHEMA_VERSION
            );
        }
        check_len("weights", model.weights.len())?;
        if let Some(mean) = &model.mean {
            check_len("mean", mean.len())?;
        }
        if let Some(scale) = &model.scale {
            check_len("scale", scale.len())?;
        }
        Ok(Self { model })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let model: LinearModel =
            serde_json::from_str(json).context("Failed to parse linear model JSON")?;
        Self::new(model)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model file {}", path.display()))?;
        let classifier = Self::from_json(&json)
            .with_context(|| format!("Invalid model file {}", path.display()))?;
        debug!(path = %path.display(), "Loaded linear model");
        Ok(classifier)
    }

    /// Signed distance from the decision boundary.
    pub fn decision_value(&self, features: &FeatureVector) -> f64 {
        let m = &self.model;
        let x = features.to_array();
        let mut sum = m.bias;
        for (i, (&value, &weight)) in x.iter().zip(&m.weights).enumerate() {
            let mut v = value;
            if let Some(mean) = &m.mean {
                v -= mean[i];
            }
            if let Some(scale) = &m.scale {
                // Constant features get scale 0 from StandardScaler exports
                if scale[i] != 0.0 {
                    v /= scale[i];
                }
            }
            sum += v * weight;
        }
        sum
    }
}

fn check_len(field: &str, len: usize) -> Result<()> {
    if len != FEATURE_COUNT {
        anyhow::bail!("Model has {len} {field}, expected {FEATURE_COUNT}");
    }
    Ok(())
}

impl Classifier for LinearClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<Label> {
        let positive = self.model.positive_label;
        if self.decision_value(features) > 0.0 {
            Ok(positive)
        } else {
            Ok(positive.opposite())
        }
    }

    fn schema_version(&self) -> u32 {
        self.model.schema_version
    }

    fn feature_count(&self) -> usize {
        self.model.weights.len()
    }

    fn describe(&self) -> String {
        self.model
            .description
            .clone()
            .unwrap_or_else(|| "linear model".to_string())
    }
}
