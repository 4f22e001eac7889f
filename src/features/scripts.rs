// Inline script heuristics: obfuscation and dynamic-code signals.
//
// Thresholds below are part of the feature contract. They are deliberately
// simple character statistics so every script is scanned exactly once.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Scripts shorter than this (non-whitespace chars) are too small to judge.
pub const MIN_SCRIPT_CHARS: usize = 100;

/// Symbol ratio above which a script counts as obfuscated.
pub const SYMBOL_RATIO_THRESHOLD: f64 = 0.40;

/// A whitespace-free run at least this long counts as a packed blob.
pub const PACKED_RUN_CHARS: usize = 400;

static DOCUMENT_WRITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bdocument\s*\.\s*write(?:ln)?\s*\(").expect("document.write pattern is valid")
});

static EVAL_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\beval\s*\(|\bnew\s+Function\s*\(|\bunescape\s*\(|\batob\s*\(|\bString\s*\.\s*fromCharCode\s*\(|\bset(?:Timeout|Interval)\s*\(\s*["'`]"#,
    )
    .expect("eval-like pattern is valid")
});

/// Character statistics for one inline script body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptStats {
    /// Non-whitespace characters
    pub chars: usize,
    /// Non-alphanumeric share of non-whitespace characters (0.0-1.0)
    pub symbol_ratio: f64,
    /// Longest run of consecutive non-whitespace characters
    pub longest_run: usize,
}

impl ScriptStats {
    pub fn measure(body: &str) -> Self {
        let mut chars = 0usize;
        let mut symbols = 0usize;
        let mut run = 0usize;
        let mut longest_run = 0usize;

        for c in body.chars() {
            if c.is_whitespace() {
                run = 0;
                continue;
            }
            chars += 1;
            run += 1;
            longest_run = longest_run.max(run);
            if !c.is_alphanumeric() {
                symbols += 1;
            }
        }

        let symbol_ratio = if chars == 0 {
            0.0
        } else {
            symbols as f64 / chars as f64
        };

        Self {
            chars,
            symbol_ratio,
            longest_run,
        }
    }

    /// Large enough for the ratio heuristics to mean anything.
    pub fn is_substantial(&self) -> bool {
        self.chars >= MIN_SCRIPT_CHARS
    }

    pub fn looks_obfuscated(&self) -> bool {
        self.is_substantial()
            && (self.symbol_ratio > SYMBOL_RATIO_THRESHOLD || self.longest_run >= PACKED_RUN_CHARS)
    }
}

/// Whether a `<script type=...>` value holds executable JavaScript.
/// An empty type means JavaScript.
pub fn is_javascript_type(script_type: &str) -> bool {
    let t = script_type.trim().to_ascii_lowercase();
    t.is_empty() || t.contains("javascript") || t.contains("ecmascript") || t == "module"
}

pub fn calls_document_write(body: &str) -> bool {
    DOCUMENT_WRITE.is_match(body)
}

pub fn has_eval_pattern(body: &str) -> bool {
    EVAL_LIKE.is_match(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const READABLE: &str = "function greet(name) {\n  var message = 'Hello ' + name;\n  console.log(message);\n  return message;\n}\n\ngreet('world');\ngreet('visitor');\n";

    #[test]
    fn test_readable_script_is_not_obfuscated() {
        let stats = ScriptStats::measure(READABLE);
        assert!(stats.is_substantial());
        assert!(stats.symbol_ratio < SYMBOL_RATIO_THRESHOLD);
        assert!(!stats.looks_obfuscated());
    }

    #[test]
    fn test_symbol_heavy_script_is_obfuscated() {
        let body = "[][(![]+[])[+[]]+(![]+[])[!+[]+!+[]]+(![]+[])[+!+[]]+(!![]+[])[+[]]]".repeat(3);
        let stats = ScriptStats::measure(&body);
        assert!(stats.symbol_ratio > 0.9);
        assert!(stats.looks_obfuscated());
    }

    #[test]
    fn test_long_packed_run_is_obfuscated() {
        let body = format!("var p=\"{}\";", "aGVsbG8gd29ybGQ".repeat(40));
        let stats = ScriptStats::measure(&body);
        assert!(stats.longest_run >= PACKED_RUN_CHARS);
        assert!(stats.looks_obfuscated());
    }

    #[test]
    fn test_short_script_is_never_obfuscated() {
        let stats = ScriptStats::measure("!!![]+[]");
        assert!(!stats.is_substantial());
        assert!(!stats.looks_obfuscated());
    }

    #[test]
    fn test_empty_body() {
        let stats = ScriptStats::measure("   \n ");
        assert_eq!(stats.chars, 0);
        assert_eq!(stats.symbol_ratio, 0.0);
        assert_eq!(stats.longest_run, 0);
    }

    #[test]
    fn test_document_write_detection() {
        assert!(calls_document_write("document.write('<p>x</p>')"));
        assert!(calls_document_write("document . writeln (s)"));
        assert!(!calls_document_write("mydocument.writer = 1"));
    }

    #[test]
    fn test_eval_pattern_detection() {
        assert!(has_eval_pattern("eval(payload)"));
        assert!(has_eval_pattern("var f = new Function('a', 'return a');"));
        assert!(has_eval_pattern("x = atob(s)"));
        assert!(has_eval_pattern("String.fromCharCode(104, 105)"));
        assert!(has_eval_pattern("setTimeout(\"run()\", 10)"));
        assert!(!has_eval_pattern("setTimeout(run, 10)"));
        assert!(!has_eval_pattern("medieval(x)"));
    }

    #[test]
    fn test_javascript_types() {
        assert!(is_javascript_type(""));
        assert!(is_javascript_type("text/javascript"));
        assert!(is_javascript_type("module"));
        assert!(!is_javascript_type("application/ld+json"));
        assert!(!is_javascript_type("text/template"));
    }
}
