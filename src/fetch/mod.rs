// Page fetching: the network collaborator that runs before extraction.

pub mod client;
pub mod traits;

pub use client::{FetchOptions, HttpFetcher};
pub use traits::{parse_target_url, FetchError, FetchedPage, PageFetcher};
