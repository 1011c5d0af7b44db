use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    cache::{
        key::{CacheKey, ComponentKey, LayerKey},
        lru::{CacheStats, DEFAULT_CACHE_CAPACITY, LruCache},
    },
    composition::component::{Component, ComponentOpts, ResolvedOpts},
    foundation::core::{Frame, Size},
    foundation::error::{StrataError, StrataResult},
    layer::Layer,
    render::{composite::composite_over, resize::resize_rgba8},
    transform::{Transform, TransformValue},
};

/// Construction options for a [`Composition`].
#[derive(Clone, Copy, Debug)]
pub struct CompositionOpts {
    /// Maximum number of cached frames (whole frames and resized layers combined).
    pub cache_capacity: usize,
}

impl Default for CompositionOpts {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// An ordered stack of [`Component`]s rendered into one frame per point in time.
///
/// Components paint in insertion order; later components land on top. A composition is itself a
/// [`Layer`], so it can be nested inside another composition. Nesting moves the child in, so a
/// composition can never end up inside itself.
///
/// Each composition owns a private LRU cache keyed by [`Composition::key_at`]. The key captures
/// every component's layer key, resolved transform and blend mode, so two times with equal keys
/// render identical frames. The cache is *not* invalidated by edits: mutating a layer through
/// [`Component::layer_mut`], or removing a component and adding a replacement under the same name
/// and placement, can leave keys unchanged (a [`SolidLayer`](crate::SolidLayer) of another color
/// still keys as [`LayerKey::Static`]). Call [`Composition::clear_cache`] after such changes.
pub struct Composition {
    size: Size,
    duration: f64,
    components: Vec<Component>,
    index: HashMap<String, usize>,
    cache: LruCache<CacheKey, Arc<Frame>>,
}

impl Composition {
    pub fn new(size: Size, duration: f64) -> Self {
        Self::with_opts(size, duration, CompositionOpts::default())
    }

    pub fn with_opts(size: Size, duration: f64, opts: CompositionOpts) -> Self {
        Self {
            size,
            duration,
            components: Vec::new(),
            index: HashMap::new(),
            cache: LruCache::new(opts.cache_capacity),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component names in paint order.
    pub fn names(&self) -> Vec<&str> {
        self.components.iter().map(Component::name).collect()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, name: &str) -> StrataResult<&Component> {
        let idx = self.position(name)?;
        Ok(&self.components[idx])
    }

    /// Mutable access to a component. Changes that alter output without altering its key
    /// contribution require [`Composition::clear_cache`].
    pub fn component_mut(&mut self, name: &str) -> StrataResult<&mut Component> {
        let idx = self.position(name)?;
        Ok(&mut self.components[idx])
    }

    fn position(&self, name: &str) -> StrataResult<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| StrataError::MissingComponent(name.to_string()))
    }

    /// Add `layer` on top of the stack.
    ///
    /// Fails with [`StrataError::DuplicateName`] if the (given or derived) name is taken; the
    /// composition is left untouched in that case. Cached frames are kept; see
    /// [`Composition::clear_cache`].
    pub fn add_component(
        &mut self,
        layer: impl Layer + 'static,
        opts: ComponentOpts,
    ) -> StrataResult<&mut Component> {
        let name = opts
            .name
            .unwrap_or_else(|| format!("layer_{}", self.components.len()));
        if self.index.contains_key(&name) {
            return Err(StrataError::DuplicateName(name));
        }
        if opts.offset.is_nan() || opts.start_time.is_nan() {
            return Err(StrataError::validation(format!(
                "component '{name}' has a NaN offset or start_time"
            )));
        }
        let transform = opts
            .transform
            .unwrap_or_else(|| Transform::at(self.size.center()));
        transform.validate()?;

        let end_time = opts.end_time.unwrap_or_else(|| layer.duration());
        if end_time.is_nan() {
            return Err(StrataError::validation(format!(
                "component '{name}' has a NaN end_time"
            )));
        }

        let resolved = ResolvedOpts {
            transform,
            offset: opts.offset,
            start_time: opts.start_time,
            end_time,
            visible: opts.visible,
            blend_mode: opts.blend_mode,
        };
        tracing::debug!(name = %name, end_time, "add component");

        let idx = self.components.len();
        self.index.insert(name.clone(), idx);
        self.components
            .push(Component::new(name, Box::new(layer), resolved));
        Ok(&mut self.components[idx])
    }

    /// Add `layer` with every placement option defaulted.
    pub fn add_layer(&mut self, layer: impl Layer + 'static) -> StrataResult<&mut Component> {
        self.add_component(layer, ComponentOpts::default())
    }

    /// Remove and return the component called `name`.
    ///
    /// Cached frames are kept. Re-adding a component with the same name, layer key and placement
    /// hits the old entries until [`Composition::clear_cache`] is called.
    pub fn remove_component(&mut self, name: &str) -> StrataResult<Component> {
        let idx = self.position(name)?;
        let component = self.components.remove(idx);
        self.index.remove(name);
        for (i, c) in self.components.iter().enumerate().skip(idx) {
            self.index.insert(c.name().to_string(), i);
        }
        tracing::debug!(name, "remove component");
        Ok(component)
    }

    /// Per-component keys at composition time `time`, in paint order.
    pub fn layer_keys(&self, time: f64) -> Arc<[Option<ComponentKey>]> {
        self.components.iter().map(|c| c.key_at(time)).collect()
    }

    /// Whole-frame cache key at composition time `time`.
    pub fn key_at(&self, time: f64) -> CacheKey {
        CacheKey::Composition(self.layer_keys(time))
    }

    /// Render the frame at `time`.
    ///
    /// Equal keys yield the very same `Arc`; treat the returned frame as read-only.
    #[tracing::instrument(level = "trace", skip(self), fields(components = self.components.len()))]
    pub fn render(&mut self, time: f64) -> StrataResult<Arc<Frame>> {
        let key = self.key_at(time);
        if let Some(hit) = self.cache.get(&key) {
            tracing::trace!("frame cache hit");
            return Ok(Arc::clone(hit));
        }
        tracing::trace!("frame cache miss");

        let mut frame = Frame::transparent(self.size.width, self.size.height);
        let Self {
            components, cache, ..
        } = self;
        for component in components.iter_mut() {
            composite_component(cache, &mut frame, component, time)?;
        }

        let frame = Arc::new(frame);
        self.cache.insert(key, Arc::clone(&frame));
        Ok(frame)
    }

    /// Paint the component called `name` at composition time `time` onto `background`.
    pub fn composite(
        &mut self,
        mut background: Frame,
        name: &str,
        time: f64,
    ) -> StrataResult<Frame> {
        let idx = self.position(name)?;
        let Self {
            components, cache, ..
        } = self;
        composite_component(cache, &mut background, &mut components[idx], time)?;
        Ok(background)
    }

    /// Drop every cached frame. Call after an export run or after in-place mutations.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

fn composite_component(
    cache: &mut LruCache<CacheKey, Arc<Frame>>,
    background: &mut Frame,
    component: &mut Component,
    time: f64,
) -> StrataResult<()> {
    if !component.visible || !component.is_active(time) {
        return Ok(());
    }
    let local = component.local_time(time);
    let Some(fg) = component.layer_mut().render(local)? else {
        return Ok(());
    };
    if fg.data.len() != (fg.width as usize) * (fg.height as usize) * 4 {
        return Err(StrataError::validation(format!(
            "layer '{}' returned {} bytes for a {}x{} rgba8 frame",
            component.name(),
            fg.data.len(),
            fg.width,
            fg.height
        )));
    }

    let p = component.transform.resolve(local);
    let Some((w, h)) = p.scaled_size(fg.width, fg.height) else {
        return Ok(());
    };
    let (x, y) = p.top_left(fg.width, fg.height);
    let fg = get_or_resize(cache, component, local, fg, &p, w, h)?;

    composite_over(background, &fg, x, y, p.opacity as f32, component.blend_mode);
    Ok(())
}

/// Scale `frame` through the shared cache. Unit scale returns the input untouched.
fn get_or_resize(
    cache: &mut LruCache<CacheKey, Arc<Frame>>,
    component: &Component,
    local: f64,
    frame: Arc<Frame>,
    p: &TransformValue,
    width: u32,
    height: u32,
) -> StrataResult<Arc<Frame>> {
    if p.is_unit_scale() {
        return Ok(frame);
    }
    let key = CacheKey::resized(
        component.name(),
        component.layer().cache_key(local),
        p.scale.x,
        p.scale.y,
    );
    if let Some(hit) = cache.get(&key) {
        tracing::trace!(name = component.name(), "resize cache hit");
        return Ok(Arc::clone(hit));
    }
    let resized = Arc::new(resize_rgba8(&frame, width, height)?);
    cache.insert(key, Arc::clone(&resized));
    Ok(resized)
}

impl Layer for Composition {
    fn render(&mut self, time: f64) -> StrataResult<Option<Arc<Frame>>> {
        Composition::render(self, time).map(Some)
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn cache_key(&self, time: f64) -> LayerKey {
        LayerKey::Nested(self.layer_keys(time))
    }
}

impl std::fmt::Debug for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composition")
            .field("size", &self.size)
            .field("duration", &self.duration)
            .field("components", &self.components)
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
