// ONNX classifier: runs a model exported from an external training pipeline.
//
// Tree ensembles, SVMs, k-NN and small neural nets all export to ONNX with
// the same interface: one float input of shape [batch, FEATURE_COUNT] and an
// int64 label as the first output (1 = legitimate, 0 = phishing).

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

use super::traits::{Classifier, Label};
use crate::features::{FeatureVector, FEATURE_COUNT};

/// Input name used by skl2onnx exports.
pub const DEFAULT_INPUT_NAME: &str = "float_input";

pub struct OnnxClassifier {
    // ort::Session::run takes &mut self; predictions are short, so a plain
    // Mutex is enough to share one session across callers.
    session: Mutex<Session>,
    input_name: String,
    source: String,
    input_width: usize,
}

impl OnnxClassifier {
    pub fn load(model_path: &Path) -> Result<Self> {
        Self::load_with_input_name(model_path, DEFAULT_INPUT_NAME)
    }

    /// Load a model whose input tensor is not named `float_input`.
    pub fn load_with_input_name(model_path: &Path, input_name: &str) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("Model file not found: {}", model_path.display());
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        debug!("Loaded ONNX classifier from {}", model_path.display());

        Self::verified(Self {
            session: Mutex::new(session),
            input_name: input_name.to_string(),
            source: model_path.display().to_string(),
            input_width: 0,
        })
    }

    /// Run one all-zero vector through the model. ONNX Runtime rejects
    /// inputs whose width disagrees with the model's declared shape, so a
    /// model trained on another feature layout fails here instead of on the
    /// first real page. `input_width` stays 0 until this passes.
    fn verified(mut self) -> Result<Self> {
        self.infer(&FeatureVector::default()).with_context(|| {
            format!(
                "ONNX model {} does not accept a [1, {FEATURE_COUNT}] '{}' input",
                self.source, self.input_name
            )
        })?;
        self.input_width = FEATURE_COUNT;
        Ok(self)
    }

    fn infer(&self, features: &FeatureVector) -> Result<Label> {
        let shape = [1_i64, FEATURE_COUNT as i64];
        let input = Tensor::from_array((shape, features.to_f32_vec()))
            .context("Failed to create feature tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

        let outputs = session
            .run(ort::inputs! { self.input_name.as_str() => input })
            .context("ONNX inference failed")?;

        let (_shape, labels) = outputs[0]
            .try_extract_tensor::<i64>()
            .context("Failed to extract label tensor")?;

        let class = labels
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("ONNX model returned an empty label tensor"))?;

        Ok(Label::from_class(class))
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<Label> {
        self.infer(features)
    }

    /// The input width the model was verified against at load time.
    fn feature_count(&self) -> usize {
        self.input_width
    }

    fn describe(&self) -> String {
        format!("ONNX model ({})", self.source)
    }
}
