// Feature schema: the index-to-meaning contract shared with trained models.
//
// Any change to this table (order, length, meaning, or any threshold in the
// extractor) invalidates every previously trained classifier. Bump
// SCHEMA_VERSION when that happens.

use serde::{Deserialize, Serialize};

/// Version of the feature vector layout. Published alongside trained models.
pub const SCHEMA_VERSION: u32 = 1;

/// Number of coordinates in every FeatureVector.
pub const FEATURE_COUNT: usize = 28;

/// How a coordinate is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Non-negative integer count
    Count,
    /// 0.0 (absent) or 1.0 (present)
    Binary,
    /// Fraction in 0.0..=1.0
    Ratio,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Count => "count",
            Encoding::Binary => "binary",
            Encoding::Ratio => "ratio",
        }
    }
}

/// One row of the schema table.
#[derive(Debug, Clone, Copy)]
pub struct FeatureDef {
    pub name: &'static str,
    pub encoding: Encoding,
    pub description: &'static str,
}

const fn def(name: &'static str, encoding: Encoding, description: &'static str) -> FeatureDef {
    FeatureDef {
        name,
        encoding,
        description,
    }
}

/// The feature table, in vector order.
pub const FEATURES: [FeatureDef; FEATURE_COUNT] = [
    def("structure.form_count", Encoding::Count, "number of <form> elements"),
    def("structure.input_count", Encoding::Count, "number of <input> elements"),
    def("structure.button_count", Encoding::Count, "number of <button> elements"),
    def("structure.iframe_count", Encoding::Count, "number of <iframe> and <frame> elements"),
    def("structure.script_count", Encoding::Count, "number of <script> elements"),
    def("structure.anchor_count", Encoding::Count, "number of <a> elements"),
    def("structure.image_count", Encoding::Count, "number of <img> elements"),
    def("structure.meta_count", Encoding::Count, "number of <meta> elements"),
    def("structure.hidden_input_count", Encoding::Count, "number of <input type=hidden> elements"),
    def("structure.text_length", Encoding::Count, "characters of visible body text, whitespace collapsed"),
    def("credential.password_input", Encoding::Binary, "page has an <input type=password>"),
    def("credential.email_input", Encoding::Binary, "page has an email input (type=email or name containing \"email\")"),
    def("credential.empty_action_forms", Encoding::Count, "forms whose action is missing, empty, '#', about:blank or javascript:"),
    def("credential.cross_domain_form", Encoding::Binary, "a form posts to a different site than the page"),
    def("credential.mailto_form", Encoding::Binary, "a form submits to a mailto: address"),
    def("identity.title_present", Encoding::Binary, "page has a non-empty <title>"),
    def("identity.title_length", Encoding::Count, "characters in the trimmed first <title>"),
    def("identity.title_domain_mismatch", Encoding::Binary, "title does not mention the hosting site's brand label"),
    def("identity.favicon_present", Encoding::Binary, "page declares a favicon link"),
    def("identity.external_favicon", Encoding::Binary, "favicon is served from a different site"),
    def("obfuscation.obfuscated_scripts", Encoding::Count, "inline scripts that look packed or obfuscated"),
    def("obfuscation.document_write", Encoding::Binary, "an inline script calls document.write/writeln"),
    def("obfuscation.eval_pattern", Encoding::Binary, "an inline script uses eval-like or decoding calls"),
    def("obfuscation.max_symbol_ratio", Encoding::Ratio, "highest symbol ratio among substantial inline scripts"),
    def("links.external_anchor_ratio", Encoding::Ratio, "off-site anchors / resolvable anchors"),
    def("links.null_anchor_ratio", Encoding::Ratio, "empty, '#' or javascript: anchors / all anchors"),
    def("links.external_resource_ratio", Encoding::Ratio, "off-site script/img/iframe/link resources / resolvable resources"),
    def("links.external_script_count", Encoding::Count, "external <script src> elements served off-site"),
];

/// Feature names in vector order.
pub fn feature_names() -> Vec<&'static str> {
    FEATURES.iter().map(|f| f.name).collect()
}

/// A publishable description of one coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureInfo {
    pub index: usize,
    pub name: String,
    pub encoding: Encoding,
    pub description: String,
}

/// The full schema, serializable so it can ship next to a trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    pub features: Vec<FeatureInfo>,
}

impl FeatureSchema {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Describe the current schema.
pub fn schema() -> FeatureSchema {
    FeatureSchema {
        version: SCHEMA_VERSION,
        features: FEATURES
            .iter()
            .enumerate()
            .map(|(index, f)| FeatureInfo {
                index,
                name: f.name.to_string(),
                encoding: f.encoding,
                description: f.description.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = feature_names().into_iter().collect();
        assert_eq!(names.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_schema_indices_are_sequential() {
        let s = schema();
        for (i, f) in s.features.iter().enumerate() {
            assert_eq!(f.index, i);
        }
    }

    #[test]
    fn test_encoding_serializes_snake_case() {
        let json = serde_json::to_string(&Encoding::Binary).unwrap();
        assert_eq!(json, "\"binary\"");
    }
}
