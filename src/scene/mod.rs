//! JSON scene files describing a composition tree.

pub mod model;

pub use model::{LayerSpec, SceneFile, SourceSpec};
