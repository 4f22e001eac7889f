// Classifier trait: the swap-ready abstraction over trained models.
//
// The rest of the pipeline only ever calls `predict`. Which model answers is
// decided at runtime by name through the ModelRegistry.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::features::{FeatureVector, FEATURE_COUNT, SCHEMA_VERSION};

/// The verdict for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Legitimate,
    Phishing,
}

impl Label {
    /// Map a numeric class from an externally trained model.
    /// The training data encodes 1 = legitimate, 0 = phishing.
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            Label::Legitimate
        } else {
            Label::Phishing
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Legitimate => "legitimate",
            Label::Phishing => "phishing",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Label::Legitimate => Label::Phishing,
            Label::Phishing => Label::Legitimate,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Any binary classifier over FeatureVectors.
///
/// Implementations must be read-only after construction so one instance can
/// serve concurrent predictions.
pub trait Classifier: Send + Sync {
    /// Classify one page.
    fn predict(&self, features: &FeatureVector) -> Result<Label>;

    /// Schema version the model was trained against.
    fn schema_version(&self) -> u32 {
        SCHEMA_VERSION
    }

    /// Number of inputs the model expects.
    fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// One-line description for `hookline models`.
    fn describe(&self) -> String;
}
