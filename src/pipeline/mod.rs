// Pipelines that wire the fetcher, the extractor and the classifiers together.

pub mod check;

pub use check::{check_document, check_many, check_page, classify_bytes, Verdict};
