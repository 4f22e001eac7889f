// Document traits: the minimal tree-traversal interface.
//
// Implemented once by the parser (HtmlDocument) and consumed uniformly by
// the feature extractor. Nothing here can fail: lookups that find nothing
// return empty collections, empty strings, or None.

use reqwest::Url;

/// A single element in a parsed document.
pub trait DocumentNode {
    /// Lowercase tag name of the element.
    fn tag_name(&self) -> &str;

    /// Attribute value, or `""` when the attribute is absent.
    fn attr_or_default(&self, name: &str) -> &str;

    /// Concatenated text of every descendant text node, or an empty string.
    fn text_or_empty(&self) -> String;

    /// Whether the attribute is present at all (even with an empty value).
    fn has_attr(&self, name: &str) -> bool;
}

/// An immutable, already-parsed page.
pub trait ParsedDocument {
    type Node<'a>: DocumentNode
    where
        Self: 'a;

    /// Every element with the given tag name, in document order.
    /// Matching is ASCII case-insensitive.
    fn find_by_tag(&self, tag: &str) -> Vec<Self::Node<'_>>;

    /// Human-visible body text with whitespace collapsed to single spaces.
    /// Script, style, noscript and template contents are excluded.
    fn visible_text(&self) -> String;

    /// The URL the page was fetched from, when the caller knows it.
    fn page_url(&self) -> Option<&Url>;
}
