// Feature extraction: parsed document in, FeatureVector out.
//
// Pure and total: no I/O, no clock, no randomness, no error path. Every
// lookup that finds nothing leaves its signal at the Default value. Each
// group below makes a fixed number of passes over the document.

use tracing::debug;

use crate::document::{DocumentNode, ParsedDocument};

use super::links::{classify_link, rel_tokens, resolve_origin, LinkTally, LinkTarget, Origin};
use super::scripts::{self, ScriptStats};
use super::vector::{
    CredentialFeatures, FeatureVector, IdentityFeatures, LinkFeatures, ObfuscationFeatures,
    StructureFeatures,
};

/// Compute the feature vector for a parsed page.
pub fn extract<D: ParsedDocument>(doc: &D) -> FeatureVector {
    let origin = resolve_origin(doc);

    let features = FeatureVector {
        structure: structure_features(doc),
        credential: credential_features(doc, origin.as_ref()),
        identity: identity_features(doc, origin.as_ref()),
        obfuscation: obfuscation_features(doc),
        links: link_features(doc, origin.as_ref()),
    };

    debug!(
        origin = origin.as_ref().map(|o| o.site.as_str()).unwrap_or("-"),
        forms = features.structure.form_count,
        password = features.credential.password_input,
        cross_domain_form = features.credential.cross_domain_form,
        obfuscated_scripts = features.obfuscation.obfuscated_scripts,
        "Extracted page features"
    );

    features
}

fn input_type<N: DocumentNode>(input: &N) -> String {
    input.attr_or_default("type").trim().to_ascii_lowercase()
}

fn structure_features<D: ParsedDocument>(doc: &D) -> StructureFeatures {
    let inputs = doc.find_by_tag("input");
    StructureFeatures {
        form_count: doc.find_by_tag("form").len(),
        input_count: inputs.len(),
        button_count: doc.find_by_tag("button").len(),
        iframe_count: doc.find_by_tag("iframe").len() + doc.find_by_tag("frame").len(),
        script_count: doc.find_by_tag("script").len(),
        anchor_count: doc.find_by_tag("a").len(),
        image_count: doc.find_by_tag("img").len(),
        meta_count: doc.find_by_tag("meta").len(),
        hidden_input_count: inputs.iter().filter(|i| input_type(*i) == "hidden").count(),
        text_length: doc.visible_text().chars().count(),
    }
}

/// A form action that submits nowhere useful: the page itself or a script hook.
fn is_empty_action(action: &str) -> bool {
    let action = action.trim();
    action.is_empty()
        || action == "#"
        || action.eq_ignore_ascii_case("about:blank")
        || action.to_ascii_lowercase().starts_with("javascript:")
}

fn credential_features<D: ParsedDocument>(doc: &D, origin: Option<&Origin>) -> CredentialFeatures {
    let mut features = CredentialFeatures::default();

    for input in doc.find_by_tag("input") {
        match input_type(&input).as_str() {
            "password" => features.password_input = true,
            "email" => features.email_input = true,
            _ => {}
        }
        if input.attr_or_default("name").to_ascii_lowercase().contains("email") {
            features.email_input = true;
        }
    }

    for form in doc.find_by_tag("form") {
        let action = form.attr_or_default("action");
        if is_empty_action(action) {
            features.empty_action_forms += 1;
            continue;
        }
        if action.trim().to_ascii_lowercase().starts_with("mailto:") {
            features.mailto_form = true;
        }
        if classify_link(action, origin) == LinkTarget::External {
            features.cross_domain_form = true;
        }
    }

    features
}

/// Lowercase alphanumerics only, so "PayPal - Log In" matches "paypal".
fn fold_alnum(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn identity_features<D: ParsedDocument>(doc: &D, origin: Option<&Origin>) -> IdentityFeatures {
    let mut features = IdentityFeatures::default();

    let title = doc
        .find_by_tag("title")
        .first()
        .map(|t| t.text_or_empty().trim().to_string())
        .unwrap_or_default();

    if !title.is_empty() {
        features.title_present = true;
        features.title_length = title.chars().count();

        if let Some(brand) = origin.and_then(Origin::brand_label) {
            features.title_domain_mismatch = !fold_alnum(&title).contains(&fold_alnum(brand));
        }
    }

    for link in doc.find_by_tag("link") {
        let is_icon = rel_tokens(link.attr_or_default("rel")).any(|t| t.contains("icon"));
        let href = link.attr_or_default("href");
        if !is_icon || href.trim().is_empty() {
            continue;
        }
        features.favicon_present = true;
        if classify_link(href, origin) == LinkTarget::External {
            features.external_favicon = true;
        }
    }

    features
}

fn obfuscation_features<D: ParsedDocument>(doc: &D) -> ObfuscationFeatures {
    let mut features = ObfuscationFeatures::default();

    for script in doc.find_by_tag("script") {
        if script.has_attr("src") || !scripts::is_javascript_type(script.attr_or_default("type")) {
            continue;
        }
        let body = script.text_or_empty();
        let stats = ScriptStats::measure(&body);

        if stats.is_substantial() {
            features.max_symbol_ratio = features.max_symbol_ratio.max(stats.symbol_ratio);
        }
        if stats.looks_obfuscated() {
            features.obfuscated_scripts += 1;
        }
        if scripts::calls_document_write(&body) {
            features.document_write = true;
        }
        if scripts::has_eval_pattern(&body) {
            features.eval_pattern = true;
        }
    }

    features
}

fn link_features<D: ParsedDocument>(doc: &D, origin: Option<&Origin>) -> LinkFeatures {
    let mut anchors = LinkTally::default();
    for a in doc.find_by_tag("a") {
        anchors.add(classify_link(a.attr_or_default("href"), origin));
    }

    let mut resources = LinkTally::default();
    let mut external_scripts = 0usize;
    for script in doc.find_by_tag("script") {
        if !script.has_attr("src") {
            continue;
        }
        let target = classify_link(script.attr_or_default("src"), origin);
        if target == LinkTarget::External {
            external_scripts += 1;
        }
        resources.add(target);
    }
    for tag in ["img", "iframe"] {
        for node in doc.find_by_tag(tag) {
            if node.has_attr("src") {
                resources.add(classify_link(node.attr_or_default("src"), origin));
            }
        }
    }
    for link in doc.find_by_tag("link") {
        if link.has_attr("href") {
            resources.add(classify_link(link.attr_or_default("href"), origin));
        }
    }

    LinkFeatures {
        external_anchor_ratio: anchors.external_ratio(),
        null_anchor_ratio: anchors.null_ratio(),
        external_resource_ratio: resources.external_ratio(),
        external_script_count: external_scripts,
    }
}
