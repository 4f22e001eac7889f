// Document layer: the read-only view of a parsed page that the extractor consumes.
//
// The extractor never touches the HTML parser directly. It only sees the
// ParsedDocument / DocumentNode traits, and every "missing" case (no such
// tag, no such attribute, no text) resolves to an explicit default.

pub mod html;
pub mod traits;

pub use html::HtmlDocument;
pub use traits::{DocumentNode, ParsedDocument};
