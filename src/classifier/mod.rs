// Classification: trait-based abstraction over trained models.
//
// The Classifier trait is the single capability every model exposes. The
// ModelRegistry maps model names to implementations: the built-in
// heuristic, linear models exported to JSON, and (with the `onnx` feature)
// ONNX exports of any other model family.

pub mod heuristic;
pub mod linear;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod registry;
pub mod traits;

pub use registry::{ModelRegistry, RegistryError, HEURISTIC_MODEL};
pub use traits::{Classifier, Label};
