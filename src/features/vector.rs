// FeatureVector: the grouped, typed form of the extractor's output.
//
// Field order inside `to_array` is the schema order in schema.rs. The
// composition test in tests/unit_features.rs pins the two together.

use serde::{Deserialize, Serialize};

use super::schema::{feature_names, FEATURE_COUNT};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureFeatures {
    pub form_count: usize,
    pub input_count: usize,
    pub button_count: usize,
    pub iframe_count: usize,
    pub script_count: usize,
    pub anchor_count: usize,
    pub image_count: usize,
    pub meta_count: usize,
    pub hidden_input_count: usize,
    pub text_length: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialFeatures {
    pub password_input: bool,
    pub email_input: bool,
    pub empty_action_forms: usize,
    pub cross_domain_form: bool,
    pub mailto_form: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityFeatures {
    pub title_present: bool,
    pub title_length: usize,
    pub title_domain_mismatch: bool,
    pub favicon_present: bool,
    pub external_favicon: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObfuscationFeatures {
    pub obfuscated_scripts: usize,
    pub document_write: bool,
    pub eval_pattern: bool,
    pub max_symbol_ratio: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkFeatures {
    pub external_anchor_ratio: f64,
    pub null_anchor_ratio: f64,
    pub external_resource_ratio: f64,
    pub external_script_count: usize,
}

/// Content-based signals for one page. `Default` is the all-absent vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub structure: StructureFeatures,
    pub credential: CredentialFeatures,
    pub identity: IdentityFeatures,
    pub obfuscation: ObfuscationFeatures,
    pub links: LinkFeatures,
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

impl FeatureVector {
    /// The vector in schema order, as a trained model consumes it.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        let s = &self.structure;
        let c = &self.credential;
        let i = &self.identity;
        let o = &self.obfuscation;
        let l = &self.links;
        [
            s.form_count as f64,
            s.input_count as f64,
            s.button_count as f64,
            s.iframe_count as f64,
            s.script_count as f64,
            s.anchor_count as f64,
            s.image_count as f64,
            s.meta_count as f64,
            s.hidden_input_count as f64,
            s.text_length as f64,
            flag(c.password_input),
            flag(c.email_input),
            c.empty_action_forms as f64,
            flag(c.cross_domain_form),
            flag(c.mailto_form),
            flag(i.title_present),
            i.title_length as f64,
            flag(i.title_domain_mismatch),
            flag(i.favicon_present),
            flag(i.external_favicon),
            o.obfuscated_scripts as f64,
            flag(o.document_write),
            flag(o.eval_pattern),
            o.max_symbol_ratio,
            l.external_anchor_ratio,
            l.null_anchor_ratio,
            l.external_resource_ratio,
            l.external_script_count as f64,
        ]
    }

    /// The vector as f32, for runtimes that take single-precision input.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.to_array().iter().map(|&v| v as f32).collect()
    }

    /// (name, value) pairs in schema order.
    pub fn named_values(&self) -> Vec<(&'static str, f64)> {
        feature_names().into_iter().zip(self.to_array()).collect()
    }
}
