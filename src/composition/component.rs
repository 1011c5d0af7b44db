use crate::{
    cache::key::ComponentKey,
    layer::Layer,
    render::blend::BlendMode,
    transform::Transform,
};

/// A [`Layer`] placed in a composition: where, when and how it is painted.
///
/// `offset` shifts the layer's time axis: at composition time `t` the layer sees
/// `t - offset`. The component takes part in compositing only while that local time lies in
/// `[start_time, end_time)`.
pub struct Component {
    name: String,
    layer: Box<dyn Layer>,
    pub transform: Transform,
    pub offset: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub visible: bool,
    pub blend_mode: BlendMode,
}

impl Component {
    pub(crate) fn new(name: String, layer: Box<dyn Layer>, opts: ResolvedOpts) -> Self {
        Self {
            name,
            layer,
            transform: opts.transform,
            offset: opts.offset,
            start_time: opts.start_time,
            end_time: opts.end_time,
            visible: opts.visible,
            blend_mode: opts.blend_mode,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layer(&self) -> &dyn Layer {
        self.layer.as_ref()
    }

    /// Mutable access to the layer. Cached frames are not invalidated by changes made here; call
    /// [`Composition::clear_cache`](crate::Composition::clear_cache) afterwards if the change
    /// affects output without affecting the layer's cache keys.
    pub fn layer_mut(&mut self) -> &mut dyn Layer {
        self.layer.as_mut()
    }

    pub fn local_time(&self, time: f64) -> f64 {
        time - self.offset
    }

    /// Whether composition time `time` falls inside the active window.
    pub fn is_active(&self, time: f64) -> bool {
        let local = self.local_time(time);
        self.start_time <= local && local < self.end_time
    }

    /// This component's contribution to the composition key at composition time `time`.
    ///
    /// `None` whenever the component paints nothing: outside its window or hidden.
    pub fn key_at(&self, time: f64) -> Option<ComponentKey> {
        if !self.visible || !self.is_active(time) {
            return None;
        }
        let local = self.local_time(time);
        Some(ComponentKey {
            layer: self.layer.cache_key(local),
            transform: self.transform.resolve(local).key_bits(),
            blend_mode: self.blend_mode,
        })
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("offset", &self.offset)
            .field("start_time", &self.start_time)
            .field("end_time", &self.end_time)
            .field("visible", &self.visible)
            .field("blend_mode", &self.blend_mode)
            .finish_non_exhaustive()
    }
}

/// Placement options for [`Composition::add_component`](crate::Composition::add_component).
///
/// Unset fields are derived when the component is added: the name becomes `layer_<index>`, the
/// transform centers the layer on the composition, and `end_time` becomes the layer's duration.
#[derive(Clone, Debug)]
pub struct ComponentOpts {
    pub name: Option<String>,
    pub transform: Option<Transform>,
    pub offset: f64,
    pub start_time: f64,
    pub end_time: Option<f64>,
    pub visible: bool,
    pub blend_mode: BlendMode,
}

impl Default for ComponentOpts {
    fn default() -> Self {
        Self {
            name: None,
            transform: None,
            offset: 0.0,
            start_time: 0.0,
            end_time: None,
            visible: true,
            blend_mode: BlendMode::Normal,
        }
    }
}

impl ComponentOpts {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_window(mut self, start_time: f64, end_time: f64) -> Self {
        self.start_time = start_time;
        self.end_time = Some(end_time);
        self
    }

    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// [`ComponentOpts`] with every default filled in.
pub(crate) struct ResolvedOpts {
    pub(crate) transform: Transform,
    pub(crate) offset: f64,
    pub(crate) start_time: f64,
    pub(crate) end_time: f64,
    pub(crate) visible: bool,
    pub(crate) blend_mode: BlendMode,
}
