use hookline::document::HtmlDocument;
use hookline::features::{extract, feature_names, schema, FeatureVector, FEATURE_COUNT, SCHEMA_VERSION};
use reqwest::Url;

const PHISHING_PAGE: &str = include_str!("fixtures/phishing_login.html");
const BENIGN_PAGE: &str = include_str!("fixtures/benign_home.html");

fn doc(html: &str, url: Option<&str>) -> HtmlDocument {
    HtmlDocument::parse(html, url.map(|u| Url::parse(u).unwrap()))
}

fn features_of(html: &str, url: Option<&str>) -> FeatureVector {
    extract(&doc(html, url))
}

// --- Determinism and totality ---

#[test]
fn same_document_yields_bit_identical_vectors() {
    let d = doc(PHISHING_PAGE, Some("https://paypal-account-verify.test/signin"));
    let a = extract(&d).to_array();
    let b = extract(&d).to_array();
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.to_bits(), y.to_bits());
    }
}

#[test]
fn empty_document_yields_default_vector() {
    let f = features_of("", None);
    assert_eq!(f, FeatureVector::default());
    let values = f.to_array();
    assert_eq!(values.len(), FEATURE_COUNT);
    assert!(values.iter().all(|&v| v == 0.0));
}

#[test]
fn document_without_head_or_title() {
    let f = features_of("<p>just text</p>", Some("https://example.com/"));
    assert!(!f.identity.title_present);
    assert_eq!(f.identity.title_length, 0);
    assert!(!f.identity.title_domain_mismatch);
    assert!(!f.identity.favicon_present);
    assert_eq!(f.structure.text_length, "just text".len());
}

#[test]
fn malformed_nesting_is_tolerated() {
    let f = features_of(
        "<form><div><input type=password></form></div><a href=x>unclosed <b>bold",
        Some("https://example.com/"),
    );
    assert!(f.credential.password_input);
    assert_eq!(f.structure.anchor_count, 1);
}

#[test]
fn inert_template_markup_is_ignored() {
    let f = features_of(
        "<template><form action=\"https://evil.test/\"><input type=password></form></template>",
        Some("https://example.com/"),
    );
    assert_eq!(f.structure.form_count, 0);
    assert!(!f.credential.password_input);
    assert!(!f.credential.cross_domain_form);
}

#[test]
fn elements_missing_attributes_count_as_absent() {
    let f = features_of(
        "<a>no href</a><img><script></script><link rel=icon>",
        Some("https://example.com/"),
    );
    assert_eq!(f.structure.anchor_count, 1);
    assert_eq!(f.structure.image_count, 1);
    // anchor without href is a null link
    assert_eq!(f.links.null_anchor_ratio, 1.0);
    assert_eq!(f.links.external_anchor_ratio, 0.0);
    assert_eq!(f.links.external_resource_ratio, 0.0);
    // icon link without href is not a favicon
    assert!(!f.identity.favicon_present);
}

// --- Forms and credentials ---

#[test]
fn form_without_action_is_not_cross_domain() {
    let f = features_of(
        "<form><input type=password></form>",
        Some("https://example.com/"),
    );
    assert!(!f.credential.cross_domain_form);
    assert_eq!(f.credential.empty_action_forms, 1);
}

#[test]
fn same_site_form_action_is_not_cross_domain() {
    let f = features_of(
        "<form action=\"https://login.example.com/session\"></form><form action=\"/search\"></form>",
        Some("https://www.example.com/"),
    );
    assert!(!f.credential.cross_domain_form);
    assert_eq!(f.credential.empty_action_forms, 0);
}

#[test]
fn mailto_form_detected() {
    let f = features_of(
        "<form action=\"mailto:drop@evil.test\"><input name=\"user_email\"></form>",
        Some("https://example.com/"),
    );
    assert!(f.credential.mailto_form);
    assert!(f.credential.email_input);
    assert!(!f.credential.cross_domain_form);
}

#[test]
fn cross_domain_signals_need_an_origin() {
    let f = features_of(
        "<form action=\"https://collector.evil.test/\"></form><a href=\"https://evil.test/\">x</a>",
        None,
    );
    assert!(!f.credential.cross_domain_form);
    assert_eq!(f.links.external_anchor_ratio, 0.0);
}

#[test]
fn base_href_supplies_the_origin() {
    let f = features_of(
        "<head><base href=\"https://example.com/\"></head><a href=\"https://evil.test/\">x</a><a href=\"/ok\">y</a>",
        None,
    );
    assert!((f.links.external_anchor_ratio - 0.5).abs() < 1e-12);
}

#[test]
fn canonical_link_supplies_the_origin() {
    let f = features_of(
        "<head><link rel=\"canonical\" href=\"https://example.com/page\"><title>Something else</title></head>",
        None,
    );
    assert!(f.identity.title_domain_mismatch);
}

#[test]
fn caller_url_wins_over_base_href() {
    let f = features_of(
        "<head><base href=\"https://evil.test/\"></head><a href=\"https://example.com/\">x</a>",
        Some("https://example.com/"),
    );
    assert_eq!(f.links.external_anchor_ratio, 0.0);
}

#[test]
fn relative_form_action_follows_base_href() {
    let f = features_of(
        "<head><base href=\"https://collector.evil.test/\"></head>\
         <form action=\"post.php\"><input type=password></form>\
         <a href=\"help\">x</a>",
        Some("https://www.paypal.com/signin"),
    );
    assert!(f.credential.cross_domain_form);
    assert_eq!(f.links.external_anchor_ratio, 1.0);
}

#[test]
fn relative_base_href_resolves_against_the_page() {
    let f = features_of(
        "<head><base href=\"/app/\"></head><form action=\"post.php\"></form>",
        Some("https://www.example.com/signin"),
    );
    assert!(!f.credential.cross_domain_form);
}

// --- Identity ---

#[test]
fn title_matching_the_domain_is_not_a_mismatch() {
    let f = features_of(
        "<title>PayPal: Log In</title>",
        Some("https://www.paypal.com/signin"),
    );
    assert!(f.identity.title_present);
    assert_eq!(f.identity.title_length, "PayPal: Log In".len());
    assert!(!f.identity.title_domain_mismatch);
}

#[test]
fn title_on_ip_host_is_never_a_mismatch() {
    let f = features_of("<title>Bank Login</title>", Some("http://203.0.113.7/login"));
    assert!(!f.identity.title_domain_mismatch);
}

#[test]
fn whitespace_title_counts_as_absent() {
    let f = features_of("<title>   </title>", Some("https://example.com/"));
    assert!(!f.identity.title_present);
    assert!(!f.identity.title_domain_mismatch);
}

#[test]
fn favicon_origin() {
    let local = features_of(
        "<link rel=\"icon\" href=\"/favicon.ico\">",
        Some("https://example.com/"),
    );
    assert!(local.identity.favicon_present);
    assert!(!local.identity.external_favicon);

    let foreign = features_of(
        "<link rel=\"apple-touch-icon\" href=\"https://bank.test/icon.png\">",
        Some("https://example.com/"),
    );
    assert!(foreign.identity.favicon_present);
    assert!(foreign.identity.external_favicon);
}

// --- Scripts ---

#[test]
fn data_scripts_are_not_inspected() {
    let json = format!(
        "<script type=\"application/ld+json\">{{\"@context\":\"https://schema.org\",\"items\":[{}]}}</script>",
        "{\"a\":[],\"b\":{}},".repeat(20)
    );
    let f = features_of(&json, None);
    assert_eq!(f.structure.script_count, 1);
    assert_eq!(f.obfuscation.obfuscated_scripts, 0);
    assert_eq!(f.obfuscation.max_symbol_ratio, 0.0);
}

#[test]
fn external_scripts_are_links_not_inline_code() {
    let f = features_of(
        "<script src=\"https://cdn.evil.test/eval.js\">eval(x)</script><script src=\"/app.js\"></script>",
        Some("https://example.com/"),
    );
    assert!(!f.obfuscation.eval_pattern);
    assert_eq!(f.links.external_script_count, 1);
    assert!((f.links.external_resource_ratio - 0.5).abs() < 1e-12);
}

// --- Structure ---

#[test]
fn structural_counts() {
    let f = features_of(
        "<form><input type=hidden><input type=HIDDEN><input type=text><button>Go</button></form>\
         <iframe src=\"/a\"></iframe><iframe></iframe><meta name=a><img src=\"/x.png\">",
        Some("https://example.com/"),
    );
    assert_eq!(f.structure.form_count, 1);
    assert_eq!(f.structure.input_count, 3);
    assert_eq!(f.structure.hidden_input_count, 2);
    assert_eq!(f.structure.button_count, 1);
    assert_eq!(f.structure.iframe_count, 2);
    assert_eq!(f.structure.meta_count, 1);
    assert_eq!(f.structure.image_count, 1);
}

#[test]
fn text_length_ignores_markup_and_scripts() {
    let f = features_of(
        "<body><p>Hello   <b>world</b></p><script>var long_name = 1;</script></body>",
        None,
    );
    assert_eq!(f.structure.text_length, "Hello world".len());
}

// --- Boundary fixtures ---

#[test]
fn phishing_like_page_sets_risk_signals() {
    let f = features_of(PHISHING_PAGE, Some("https://paypal-account-verify.test/signin"));

    assert!(f.credential.password_input);
    assert!(f.credential.email_input);
    assert!(f.credential.cross_domain_form);
    assert!(f.identity.title_domain_mismatch);
    assert!(f.identity.external_favicon);
    assert_eq!(f.obfuscation.obfuscated_scripts, 1);
    assert!(f.obfuscation.document_write);
    assert!(f.obfuscation.eval_pattern);
    assert_eq!(f.obfuscation.max_symbol_ratio, 1.0);
    assert_eq!(f.links.external_anchor_ratio, 1.0);
    assert_eq!(f.links.null_anchor_ratio, 0.5);
    assert_eq!(f.structure.hidden_input_count, 1);
}

#[test]
fn benign_page_leaves_risk_signals_absent() {
    let f = features_of(BENIGN_PAGE, Some("https://www.example.com/"));

    assert_eq!(f.structure.form_count, 0);
    assert!(!f.credential.password_input);
    assert!(!f.credential.email_input);
    assert!(!f.credential.cross_domain_form);
    assert!(!f.credential.mailto_form);
    assert_eq!(f.credential.empty_action_forms, 0);
    assert!(f.identity.title_present);
    assert!(!f.identity.title_domain_mismatch);
    assert!(f.identity.favicon_present);
    assert!(!f.identity.external_favicon);
    assert_eq!(f.obfuscation.obfuscated_scripts, 0);
    assert!(!f.obfuscation.document_write);
    assert!(!f.obfuscation.eval_pattern);
    assert!(f.obfuscation.max_symbol_ratio < 0.40);
    assert_eq!(f.links.external_anchor_ratio, 0.0);
    assert_eq!(f.links.null_anchor_ratio, 0.0);
    assert_eq!(f.links.external_resource_ratio, 0.0);
    assert_eq!(f.links.external_script_count, 0);
}

// --- Schema ---

#[test]
fn schema_is_stable_across_calls() {
    let a = schema();
    let b = schema();
    assert_eq!(a, b);
    assert_eq!(a.version, SCHEMA_VERSION);
    assert_eq!(a.len(), FEATURE_COUNT);
}

#[test]
fn schema_names_match_vector_layout() {
    let names = feature_names();
    let s = schema();
    assert_eq!(names.len(), FeatureVector::default().to_array().len());
    for (info, name) in s.features.iter().zip(names.iter()) {
        assert_eq!(info.name, *name);
    }
}

#[test]
fn schema_index_meanings_are_pinned() {
    // Reordering these invalidates every trained model
    let names = feature_names();
    assert_eq!(names[0], "structure.form_count");
    assert_eq!(names[10], "credential.password_input");
    assert_eq!(names[13], "credential.cross_domain_form");
    assert_eq!(names[17], "identity.title_domain_mismatch");
    assert_eq!(names[20], "obfuscation.obfuscated_scripts");
    assert_eq!(names[27], "links.external_script_count");
}

#[test]
fn named_values_follow_schema_order() {
    let f = features_of(PHISHING_PAGE, Some("https://paypal-account-verify.test/signin"));
    let named = f.named_values();
    assert_eq!(named.len(), FEATURE_COUNT);
    assert_eq!(named[10], ("credential.password_input", 1.0));
    assert_eq!(named[13], ("credential.cross_domain_form", 1.0));
}

#[test]
fn feature_vector_json_roundtrip() {
    let f = features_of(PHISHING_PAGE, Some("https://paypal-account-verify.test/signin"));
    let json = serde_json::to_string(&f).unwrap();
    let back: FeatureVector = serde_json::from_str(&json).unwrap();
    assert_eq!(back, f);
}

// --- Concurrency ---

#[test]
fn concurrent_extraction_needs_no_coordination() {
    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(|| {
                features_of(PHISHING_PAGE, Some("https://paypal-account-verify.test/signin"))
                    .to_array()
            })
        })
        .collect();
    let expected =
        features_of(PHISHING_PAGE, Some("https://paypal-account-verify.test/signin")).to_array();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}

#[test]
fn f32_view_matches_f64_array() {
    let f = features_of(BENIGN_PAGE, Some("https://www.example.com/"));
    let wide = f.to_array();
    let narrow = f.to_f32_vec();
    assert_eq!(narrow.len(), FEATURE_COUNT);
    for (a, b) in wide.iter().zip(narrow.iter()) {
        assert_eq!(*a as f32, *b);
    }
}
