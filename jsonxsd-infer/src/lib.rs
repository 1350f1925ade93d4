//! Feature-scoped supplement that lets the workspace run end to end
//! without a separate upstream inference pipeline: given one or
//! more JSON samples, builds the `TypeRef` graph `jsonxsd-core` consumes,
//! and supplies a concrete `StringFormatRecognizer`. `jsonxsd-core` never
//! depends on this crate; the dependency only runs the other way.

mod recognizer;
mod shape;

pub use recognizer::{ChronoFormatRecognizer, Locale};
pub use shape::infer_type_graph;
