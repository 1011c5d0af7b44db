use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::composition::component::ComponentOpts;
use crate::composition::model::{Composition, CompositionOpts};
use crate::foundation::core::Size;
use crate::foundation::error::{StrataError, StrataResult};
use crate::layer::{ImageLayer, SolidLayer};
use crate::render::blend::BlendMode;
use crate::transform::Transform;

/// Human-edited description of a composition.
///
/// ```json
/// {
///   "size": { "width": 320, "height": 180 },
///   "duration": 4.0,
///   "layers": [
///     { "name": "bg", "source": { "kind": "solid", "width": 320, "height": 180, "rgba": [0, 0, 0, 255] } },
///     { "name": "logo", "source": { "kind": "image", "path": "logo.png" }, "start_time": 1.0 }
///   ]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    pub size: Size,
    /// Seconds.
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_capacity: Option<usize>,
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
}

/// One component of a [`SceneFile`], bottom-most first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub source: SourceSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    #[serde(default)]
    pub offset: f64,
    #[serde(default)]
    pub start_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    /// Intrinsic layer duration; unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub blend_mode: BlendMode,
}

fn default_visible() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceSpec {
    Solid {
        width: u32,
        height: u32,
        rgba: [u8; 4],
    },
    /// Still image; relative paths resolve against the assets root.
    Image { path: String },
    /// Nested composition.
    Composition { scene: Box<SceneFile> },
}

impl SceneFile {
    /// Parse a scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> StrataResult<Self> {
        serde_json::from_reader(r).map_err(|e| StrataError::serde(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> StrataResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StrataError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_json_pretty(&self) -> StrataResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StrataError::serde(format!("serialize scene JSON: {e}")))
    }

    pub fn validate(&self) -> StrataResult<()> {
        if self.size.is_empty() {
            return Err(StrataError::validation("scene size must be non-zero"));
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(StrataError::validation(
                "scene duration must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Build the runtime composition, resolving image paths against `assets_root`.
    #[tracing::instrument(skip(self), fields(layers = self.layers.len()))]
    pub fn build(&self, assets_root: &Path) -> StrataResult<Composition> {
        self.validate()?;
        let opts = match self.cache_capacity {
            Some(cache_capacity) => CompositionOpts { cache_capacity },
            None => CompositionOpts::default(),
        };
        let mut comp = Composition::with_opts(self.size, self.duration, opts);

        for spec in &self.layers {
            let opts = spec.component_opts();
            match &spec.source {
                SourceSpec::Solid {
                    width,
                    height,
                    rgba,
                } => {
                    let mut layer = SolidLayer::new(Size::new(*width, *height), *rgba);
                    if let Some(d) = spec.duration {
                        layer = layer.with_duration(d);
                    }
                    comp.add_component(layer, opts)?;
                }
                SourceSpec::Image { path } => {
                    let mut layer = ImageLayer::open(&assets_root.join(path))?;
                    if let Some(d) = spec.duration {
                        layer = layer.with_duration(d);
                    }
                    comp.add_component(layer, opts)?;
                }
                SourceSpec::Composition { scene } => {
                    let child = scene.build(assets_root)?;
                    comp.add_component(child, opts)?;
                }
            }
        }
        Ok(comp)
    }
}

impl LayerSpec {
    fn component_opts(&self) -> ComponentOpts {
        ComponentOpts {
            name: self.name.clone(),
            transform: self.transform.clone(),
            offset: self.offset,
            start_time: self.start_time,
            end_time: self.end_time,
            visible: self.visible,
            blend_mode: self.blend_mode,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
