// Feature extraction: the fixed-schema numeric encoding of a page's phishing signals.

pub mod extract;
pub mod links;
pub mod schema;
pub mod scripts;
pub mod vector;

pub use extract::extract;
pub use schema::{feature_names, schema, FeatureSchema, FEATURE_COUNT, SCHEMA_VERSION};
pub use vector::FeatureVector;
