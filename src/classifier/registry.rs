// Model registry: fixed mapping from model name to classifier.
//
// Callers pick a model by name at runtime. The registry checks each model's
// schema contract when it is registered, and unknown names fail with a
// RegistryError that callers can tell apart from inference failures.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::heuristic::HeuristicClassifier;
use super::linear::LinearClassifier;
use super::traits::{Classifier, Label};
use crate::features::{FeatureVector, FEATURE_COUNT, SCHEMA_VERSION};

/// Name of the always-present built-in model.
pub const HEURISTIC_MODEL: &str = "heuristic";

/// Distinct failures of model selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No model registered under this name
    UnknownModel { name: String, available: Vec<String> },
    /// The model was trained on a different feature layout
    SchemaMismatch {
        name: String,
        schema_version: u32,
        feature_count: usize,
    },
    /// A model with this name is already registered
    DuplicateModel { name: String },
}

impl RegistryError {
    /// Short category label for terminal output.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::UnknownModel { .. } => "unknown model",
            RegistryError::SchemaMismatch { .. } => "schema mismatch",
            RegistryError::DuplicateModel { .. } => "duplicate model",
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::UnknownModel { name, available } => write!(
                f,
                "Unknown model '{name}'. Available models: {}",
                available.join(", ")
            ),
            RegistryError::SchemaMismatch {
                name,
                schema_version,
                feature_count,
            } => write!(
                f,
                "Model '{name}' expects schema v{schema_version} with {feature_count} features, \
                 but this build extracts v{SCHEMA_VERSION} with {FEATURE_COUNT}"
            ),
            RegistryError::DuplicateModel { name } => {
                write!(f, "A model named '{name}' is already registered")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Named, read-only collection of classifiers.
pub struct ModelRegistry {
    models: BTreeMap<String, Box<dyn Classifier>>,
}

impl Default for ModelRegistry {
    /// A registry holding only the built-in heuristic model.
    fn default() -> Self {
        let mut models: BTreeMap<String, Box<dyn Classifier>> = BTreeMap::new();
        models.insert(
            HEURISTIC_MODEL.to_string(),
            Box::new(HeuristicClassifier::default()),
        );
        Self { models }
    }
}

impl ModelRegistry {
    /// An empty registry, for callers that want full control over its contents.
    pub fn empty() -> Self {
        Self {
            models: BTreeMap::new(),
        }
    }

    /// Register a classifier under a name after checking its schema contract.
    pub fn register(
        &mut self,
        name: &str,
        classifier: Box<dyn Classifier>,
    ) -> Result<(), RegistryError> {
        if classifier.schema_version() != SCHEMA_VERSION
            || classifier.feature_count() != FEATURE_COUNT
        {
            return Err(RegistryError::SchemaMismatch {
                name: name.to_string(),
                schema_version: classifier.schema_version(),
                feature_count: classifier.feature_count(),
            });
        }
        if self.models.contains_key(name) {
            return Err(RegistryError::DuplicateModel {
                name: name.to_string(),
            });
        }
        self.models.insert(name.to_string(), classifier);
        Ok(())
    }

    /// Build the registry: the heuristic model plus every model file in `model_dir`.
    ///
    /// `*.json` files load as linear models and, with the `onnx` feature,
    /// `*.onnx` files load as ONNX models, each keyed by file stem. A missing
    /// directory is fine; files that fail to load are logged and skipped.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let mut registry = Self::default();

        if !model_dir.is_dir() {
            info!(dir = %model_dir.display(), "Model directory not found, using built-in model only");
            return Ok(registry);
        }

        let mut paths: Vec<_> = std::fs::read_dir(model_dir)
            .with_context(|| format!("Failed to read model directory {}", model_dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

            let loaded: Result<Box<dyn Classifier>> = match extension {
                "json" => LinearClassifier::from_file(&path).map(|c| Box::new(c) as Box<dyn Classifier>),
                #[cfg(feature = "onnx")]
                "onnx" => super::onnx::OnnxClassifier::load(&path)
                    .map(|c| Box::new(c) as Box<dyn Classifier>),
                _ => continue,
            };

            match loaded.and_then(|c| registry.register(name, c).map_err(anyhow::Error::from)) {
                Ok(()) => info!(model = name, path = %path.display(), "Registered model"),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping model file"),
            }
        }

        Ok(registry)
    }

    /// Look up a model by name.
    pub fn get(&self, name: &str) -> Result<&dyn Classifier, RegistryError> {
        self.models
            .get(name)
            .map(|c| c.as_ref())
            .ok_or_else(|| RegistryError::UnknownModel {
                name: name.to_string(),
                available: self.names(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Registered model names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    /// (name, description) pairs, sorted by name.
    pub fn describe_all(&self) -> Vec<(String, String)> {
        self.models
            .iter()
            .map(|(name, c)| (name.clone(), c.describe()))
            .collect()
    }

    /// Classify with the named model.
    pub fn predict(&self, name: &str, features: &FeatureVector) -> Result<Label> {
        let classifier = self.get(name)?;
        classifier
            .predict(features)
            .with_context(|| format!("Model '{name}' failed to classify the page"))
    }
}
