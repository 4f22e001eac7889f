// HtmlDocument: the scraper-backed implementation of ParsedDocument.
//
// scraper wraps html5ever, which follows the HTML5 parsing algorithm: any
// decodable input produces a tree (with implied <html>, <head> and <body>),
// so malformed nesting is normalized before the extractor ever runs.

use reqwest::Url;
use scraper::{ElementRef, Html};

use super::traits::{DocumentNode, ParsedDocument};

/// Tags whose text never reaches the rendered page.
const INVISIBLE_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// A parsed HTML page plus the URL it came from (if known).
pub struct HtmlDocument {
    html: Html,
    page_url: Option<Url>,
}

impl HtmlDocument {
    /// Parse an HTML string. Never fails; malformed markup is repaired by the parser.
    pub fn parse(source: &str, page_url: Option<Url>) -> Self {
        Self {
            html: Html::parse_document(source),
            page_url,
        }
    }

    /// Parse raw response bytes, replacing invalid UTF-8 sequences.
    pub fn from_bytes(bytes: &[u8], page_url: Option<Url>) -> Self {
        Self::parse(&String::from_utf8_lossy(bytes), page_url)
    }

    /// Every element in document order, except those inside `<template>`.
    /// Template contents are inert until script clones them.
    fn elements(&self) -> Vec<ElementRef<'_>> {
        let mut out = Vec::new();
        let mut stack = vec![self.html.tree.root()];
        while let Some(node) = stack.pop() {
            if let Some(el) = ElementRef::wrap(node) {
                out.push(el);
                if el.value().name() == "template" {
                    continue;
                }
            }
            stack.extend(node.children().rev());
        }
        out
    }
}

/// Borrowed handle to one element of an HtmlDocument.
#[derive(Clone, Copy)]
pub struct HtmlNode<'a>(ElementRef<'a>);

impl DocumentNode for HtmlNode<'_> {
    fn tag_name(&self) -> &str {
        self.0.value().name()
    }

    fn attr_or_default(&self, name: &str) -> &str {
        self.0.value().attr(name).unwrap_or("")
    }

    fn text_or_empty(&self) -> String {
        self.0.text().collect()
    }

    fn has_attr(&self, name: &str) -> bool {
        self.0.value().attr(name).is_some()
    }
}

impl ParsedDocument for HtmlDocument {
    type Node<'a> = HtmlNode<'a>;

    fn find_by_tag(&self, tag: &str) -> Vec<HtmlNode<'_>> {
        self.elements()
            .into_iter()
            .filter(|el| el.value().name().eq_ignore_ascii_case(tag))
            .map(HtmlNode)
            .collect()
    }

    fn visible_text(&self) -> String {
        let Some(body) = self
            .elements()
            .into_iter()
            .find(|el| el.value().name() == "body")
        else {
            return String::new();
        };

        // Iterative pre-order walk so deeply nested pages can't blow the stack.
        let mut words: Vec<&str> = Vec::new();
        let mut stack = vec![*body];
        while let Some(node) = stack.pop() {
            if let Some(el) = node.value().as_element() {
                if INVISIBLE_TAGS.contains(&el.name()) {
                    continue;
                }
            }
            if let Some(text) = node.value().as_text() {
                words.extend(text.split_whitespace());
            }
            stack.extend(node.children().rev());
        }

        words.join(" ")
    }

    fn page_url(&self) -> Option<&Url> {
        self.page_url.as_ref()
    }
}
