// Hookline: content-based phishing detection
//
// This is the library root. The core is `features::extract`, a pure function
// from a parsed page to a fixed-schema feature vector. The other modules are
// the collaborators around it: document parsing, page fetching, the model
// registry, and the check pipeline used by the CLI.

pub mod classifier;
pub mod config;
pub mod document;
pub mod features;
pub mod fetch;
pub mod output;
pub mod pipeline;
