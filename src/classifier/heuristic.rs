// Built-in heuristic classifier.
//
// A weighted sum of the risk signals in the feature vector compared against
// a threshold. It needs no training data, so it is always registered (as
// "heuristic") and serves as the default model and as a baseline when
// judging externally trained models.

use anyhow::Result;

use super::traits::{Classifier, Label};
use crate::features::FeatureVector;

/// Weights for the risk score. Binary signals contribute their full weight
/// when present; ratio signals contribute `ratio * weight`.
#[derive(Debug, Clone)]
pub struct HeuristicWeights {
    pub password_input: f64,
    pub cross_domain_form: f64,
    pub mailto_form: f64,
    /// Password field inside a form that submits nowhere (script-handled)
    pub password_with_empty_action: f64,
    pub title_domain_mismatch: f64,
    pub external_favicon: f64,
    pub obfuscated_script: f64,
    pub document_write: f64,
    pub eval_pattern: f64,
    pub external_anchor_ratio: f64,
    pub null_anchor_ratio: f64,
    pub external_resource_ratio: f64,
    /// Scores at or above this are phishing
    pub threshold: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            password_input: 2.0,
            cross_domain_form: 3.0,
            mailto_form: 2.0,
            password_with_empty_action: 1.0,
            title_domain_mismatch: 1.5,
            external_favicon: 1.5,
            obfuscated_script: 1.5,
            document_write: 0.5,
            eval_pattern: 1.0,
            external_anchor_ratio: 2.0,
            null_anchor_ratio: 1.0,
            external_resource_ratio: 1.0,
            threshold: 4.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeuristicClassifier {
    pub weights: HeuristicWeights,
}

impl HeuristicClassifier {
    pub fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }

    /// The unthresholded risk score. 0.0 for a page with no risk signals.
    pub fn risk_score(&self, f: &FeatureVector) -> f64 {
        let w = &self.weights;
        let on = |present: bool, weight: f64| if present { weight } else { 0.0 };

        on(f.credential.password_input, w.password_input)
            + on(f.credential.cross_domain_form, w.cross_domain_form)
            + on(f.credential.mailto_form, w.mailto_form)
            + on(
                f.credential.password_input && f.credential.empty_action_forms > 0,
                w.password_with_empty_action,
            )
            + on(f.identity.title_domain_mismatch, w.title_domain_mismatch)
            + on(f.identity.external_favicon, w.external_favicon)
            + on(f.obfuscation.obfuscated_scripts > 0, w.obfuscated_script)
            + on(f.obfuscation.document_write, w.document_write)
            + on(f.obfuscation.eval_pattern, w.eval_pattern)
            + f.links.external_anchor_ratio * w.external_anchor_ratio
            + f.links.null_anchor_ratio * w.null_anchor_ratio
            + f.links.external_resource_ratio * w.external_resource_ratio
    }
}

impl Classifier for HeuristicClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<Label> {
        let score = self.risk_score(features);
        if score >= self.weights.threshold {
            Ok(Label::Phishing)
        } else {
            Ok(Label::Legitimate)
        }
    }

    fn describe(&self) -> String {
        format!(
            "built-in weighted risk score (threshold {:.1})",
            self.weights.threshold
        )
    }
}
