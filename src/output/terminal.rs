// Colored terminal output for verdicts, feature vectors and the model list.
//
// main.rs delegates all human-readable formatting here.

use colored::Colorize;

use crate::classifier::{Label, RegistryError};
use crate::features::schema::{FeatureDef, FEATURES};
use crate::features::FeatureVector;
use crate::fetch::FetchError;
use crate::pipeline::Verdict;

/// Display a single verdict.
pub fn display_verdict(verdict: &Verdict) {
    println!(
        "\n{}",
        format!("=== {} ===", super::truncate_chars(&verdict.url, 70)).bold()
    );
    println!("  Model: {}", verdict.model);
    match verdict.label {
        Label::Legitimate => println!("  {}", "This web page seems legitimate!".green().bold()),
        Label::Phishing => println!(
            "  {}",
            "Attention! This web page is a potential phishing site!"
                .red()
                .bold()
        ),
    }

    let risk = risk_signals(&verdict.features);
    if !risk.is_empty() {
        println!("\n  Risk signals:");
        for signal in risk {
            println!("    {} {}", "!".yellow(), signal);
        }
    }
}

/// Human-readable list of the risk signals that fired.
pub fn risk_signals(f: &FeatureVector) -> Vec<String> {
    let mut signals = Vec::new();
    if f.credential.password_input {
        signals.push("password field present".to_string());
    }
    if f.credential.cross_domain_form {
        signals.push("form submits to another site".to_string());
    }
    if f.credential.mailto_form {
        signals.push("form submits to an email address".to_string());
    }
    if f.identity.title_domain_mismatch {
        signals.push("title does not mention the hosting site".to_string());
    }
    if f.identity.external_favicon {
        signals.push("favicon loaded from another site".to_string());
    }
    if f.obfuscation.obfuscated_scripts > 0 {
        signals.push(format!(
            "{} obfuscated inline script(s)",
            f.obfuscation.obfuscated_scripts
        ));
    }
    if f.obfuscation.document_write {
        signals.push("document.write in inline script".to_string());
    }
    if f.obfuscation.eval_pattern {
        signals.push("eval-like call in inline script".to_string());
    }
    if f.links.external_anchor_ratio > 0.5 {
        signals.push(format!(
            "{:.0}% of links point off-site",
            f.links.external_anchor_ratio * 100.0
        ));
    }
    signals
}

/// Display the full feature vector as an indexed table.
pub fn display_features(features: &FeatureVector) {
    println!("\n{}", "=== Feature Vector ===".bold());
    println!(
        "  {}  {} {} {}",
        format!("{:>3}", "#").dimmed(),
        format!("{:<36}", "Feature").dimmed(),
        format!("{:<7}", "Kind").dimmed(),
        format!("{:>8}", "Value").dimmed()
    );
    println!("  {}", "-".repeat(58).dimmed());

    for (i, (def, value)) in FEATURES.iter().zip(features.to_array()).enumerate() {
        println!("{}", feature_row(i, def, value));
    }
}

/// One table row. Columns are padded before colouring so escape codes
/// never count toward the width.
fn feature_row(index: usize, def: &FeatureDef, value: f64) -> String {
    let shown = format!("{:>8}", super::format_value(value));
    let shown = if value != 0.0 {
        shown.bold()
    } else {
        shown.dimmed()
    };
    format!(
        "  {:>3}  {:<36} {:<7} {}",
        index,
        def.name,
        def.encoding.as_str(),
        shown
    )
}

/// Display registered models.
pub fn display_models(models: &[(String, String)], default_model: &str) {
    println!("\n{}", "=== Models ===".bold());
    for (name, description) in models {
        let marker = if name == default_model {
            "*".green().to_string()
        } else {
            " ".to_string()
        };
        println!("  {marker} {:<24} {}", name, description.dimmed());
    }
}

/// Display a failed check, using the distinct fetch error kinds when present.
pub fn display_failure(url: &str, error: &anyhow::Error) {
    let kind = if let Some(e) = error.downcast_ref::<FetchError>() {
        e.kind()
    } else if let Some(e) = error.downcast_ref::<RegistryError>() {
        e.kind()
    } else {
        "check failed"
    };
    println!(
        "\n{} {} {}",
        "Error:".red().bold(),
        format!("[{kind}]").yellow(),
        super::truncate_chars(url, 70)
    );
    println!("  {error:#}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex_lite::Regex;

    fn strip_ansi(s: &str) -> String {
        Regex::new(r"\x1b\[[0-9;]*m").unwrap().replace_all(s, "").into_owned()
    }

    #[test]
    fn test_feature_rows_align_with_colors_on() {
        colored::control::set_override(true);
        let zero = feature_row(0, &FEATURES[0], 0.0);
        let set = feature_row(23, &FEATURES[23], 0.25);
        colored::control::unset_override();

        assert!(zero.contains('\x1b'));
        let zero = strip_ansi(&zero);
        let set = strip_ansi(&set);
        assert_eq!(zero.chars().count(), set.chars().count());
        assert!(zero.ends_with("       0"));
        assert!(set.ends_with("    0.25"));
    }
}
