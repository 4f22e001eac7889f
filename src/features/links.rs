// Link resolution: page origin, site keys, and internal/external classification.
//
// A site key approximates the registrable domain without a public-suffix
// list: the last two host labels, or the last three for ccTLDs with a common
// second-level label (example.co.uk). The approximation is part of the
// feature contract, so it must stay stable across releases.

use std::net::IpAddr;

use reqwest::Url;

use crate::document::{DocumentNode, ParsedDocument};

/// Second-level labels that sit under two-letter country TLDs.
const COMMON_SECOND_LEVEL: [&str; 7] = ["co", "com", "org", "net", "gov", "ac", "edu"];

/// Where a link points, relative to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    /// Empty, fragment-only, or `javascript:`
    Null,
    /// Same site as the page
    Internal,
    /// A different site
    External,
    /// Non-web scheme such as `mailto:` or `data:`, or an unresolvable value
    Other,
    /// Absolute web URL but the page origin is unknown
    Unknown,
}

/// The page origin used for same-site decisions.
#[derive(Debug, Clone)]
pub struct Origin {
    pub url: Url,
    pub site: String,
    /// Relative references resolve against this: the first `<base href>`,
    /// else `url`.
    pub base: Url,
}

impl Origin {
    /// Build an origin from an absolute http(s) URL with a host.
    pub fn from_url(url: &Url) -> Option<Self> {
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        let site = site_key(url.host_str()?)?;
        Some(Self {
            url: url.clone(),
            site,
            base: url.clone(),
        })
    }

    /// Point `base` at the document's first `<base href>`, resolved against
    /// the origin URL. Leaves `site` untouched.
    fn with_base_href<D: ParsedDocument>(mut self, doc: &D) -> Self {
        let href = doc
            .find_by_tag("base")
            .iter()
            .map(|n| n.attr_or_default("href").trim().to_string())
            .find(|h| !h.is_empty());
        let base = href
            .and_then(|h| self.url.join(&h).ok())
            .filter(|u| matches!(u.scheme(), "http" | "https"));
        if let Some(base) = base {
            self.base = base;
        }
        self
    }

    fn parse_absolute(raw: &str) -> Option<Self> {
        Url::parse(raw.trim()).ok().as_ref().and_then(Self::from_url)
    }

    /// The brand label of the site: `paypal` for `www.paypal.com`.
    /// None for IP hosts and labels too short to judge.
    pub fn brand_label(&self) -> Option<&str> {
        if self.site.parse::<IpAddr>().is_ok() {
            return None;
        }
        let label = self.site.split('.').next()?;
        (label.chars().count() >= 3).then_some(label)
    }
}

/// Resolve the page origin: caller-supplied URL, then `<base href>`, then
/// `<link rel=canonical>`, then `<meta property=og:url>`.
///
/// The site key always comes from that origin, but relative links resolve
/// against `<base href>` when the page declares one, as a browser would.
pub fn resolve_origin<D: ParsedDocument>(doc: &D) -> Option<Origin> {
    page_origin(doc).map(|origin| origin.with_base_href(doc))
}

fn page_origin<D: ParsedDocument>(doc: &D) -> Option<Origin> {
    if let Some(origin) = doc.page_url().and_then(Origin::from_url) {
        return Some(origin);
    }

    let from_base = doc
        .find_by_tag("base")
        .iter()
        .find_map(|n| Origin::parse_absolute(n.attr_or_default("href")));
    if from_base.is_some() {
        return from_base;
    }

    let from_canonical = doc
        .find_by_tag("link")
        .iter()
        .filter(|n| rel_tokens(n.attr_or_default("rel")).any(|t| t == "canonical"))
        .find_map(|n| Origin::parse_absolute(n.attr_or_default("href")));
    if from_canonical.is_some() {
        return from_canonical;
    }

    doc.find_by_tag("meta")
        .iter()
        .filter(|n| n.attr_or_default("property").eq_ignore_ascii_case("og:url"))
        .find_map(|n| Origin::parse_absolute(n.attr_or_default("content")))
}

/// Lowercased, whitespace-separated tokens of a `rel` attribute.
pub fn rel_tokens(rel: &str) -> impl Iterator<Item = String> + '_ {
    rel.split_ascii_whitespace().map(|t| t.to_ascii_lowercase())
}

/// Reduce a host to its site key. Returns None for an empty host.
pub fn site_key(host: &str) -> Option<String> {
    let host = host
        .trim()
        .trim_end_matches('.')
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_ascii_lowercase();
    if host.is_empty() {
        return None;
    }
    if host.parse::<IpAddr>().is_ok() {
        return Some(host);
    }

    let host = host.strip_prefix("www.").unwrap_or(&host);
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    let keep = match labels.as_slice() {
        [] => return None,
        [.., sld, tld] if tld.len() == 2 && COMMON_SECOND_LEVEL.contains(sld) => 3,
        _ => 2,
    };
    let start = labels.len().saturating_sub(keep);
    Some(labels[start..].join("."))
}

/// Whether a raw value starts with a URL scheme (`name:`).
fn scheme_of(raw: &str) -> Option<String> {
    let colon = raw.find(':')?;
    let scheme = &raw[..colon];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(scheme.to_ascii_lowercase())
    } else {
        None
    }
}

/// Classify an `href`/`src`/`action` value relative to the page origin.
pub fn classify_link(raw: &str, origin: Option<&Origin>) -> LinkTarget {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return LinkTarget::Null;
    }

    match scheme_of(raw).as_deref() {
        Some("javascript") => return LinkTarget::Null,
        Some("http") | Some("https") | None => {}
        Some(_) => return LinkTarget::Other,
    }

    let Some(origin) = origin else {
        let absolute = raw.starts_with("//") || scheme_of(raw).is_some();
        return if absolute {
            LinkTarget::Unknown
        } else {
            LinkTarget::Internal
        };
    };

    let Ok(resolved) = origin.base.join(raw) else {
        return LinkTarget::Other;
    };
    if !matches!(resolved.scheme(), "http" | "https") {
        return LinkTarget::Other;
    }
    match resolved.host_str().and_then(site_key) {
        Some(site) if site == origin.site => LinkTarget::Internal,
        Some(_) => LinkTarget::External,
        None => LinkTarget::Other,
    }
}

/// Tally of internal vs external targets, for ratio features.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkTally {
    pub internal: usize,
    pub external: usize,
    pub null: usize,
    pub total: usize,
}

impl LinkTally {
    pub fn add(&mut self, target: LinkTarget) {
        self.total += 1;
        match target {
            LinkTarget::Internal => self.internal += 1,
            LinkTarget::External => self.external += 1,
            LinkTarget::Null => self.null += 1,
            LinkTarget::Other | LinkTarget::Unknown => {}
        }
    }

    /// External share of resolvable targets; 0.0 when nothing resolved.
    pub fn external_ratio(&self) -> f64 {
        ratio(self.external, self.internal + self.external)
    }

    /// Null share of all targets; 0.0 when there were none.
    pub fn null_ratio(&self) -> f64 {
        ratio(self.null, self.total)
    }
}

/// Safe division for ratio features.
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64
}
