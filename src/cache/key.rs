use std::hash::Hash;
use std::sync::Arc;

use crate::{
    foundation::math::{Fnv1a64, f64_key_bits},
    render::blend::BlendMode,
};

/// Fingerprint of a layer's output at one instant.
///
/// Contract: two calls to [`Layer::cache_key`](crate::Layer::cache_key) on the same layer that
/// return equal keys must correspond to identical rendered buffers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LayerKey {
    /// Output may differ at every distinct time (the conservative default).
    Time(u64),
    /// Output never changes over time.
    Static,
    /// Caller-derived fingerprint.
    Hash(u64),
    /// Key tuple of a nested composition.
    Nested(Arc<[Option<ComponentKey>]>),
}

impl LayerKey {
    pub fn time(time: f64) -> Self {
        Self::Time(f64_key_bits(time))
    }

    /// Fingerprint any hashable value. Stable within a process run, not across runs.
    pub fn of<T: Hash + ?Sized>(value: &T) -> Self {
        let mut h = Fnv1a64::new_default();
        value.hash(&mut h);
        Self::Hash(h.finish())
    }

    /// Fingerprint raw bytes (for example decoded pixel data).
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut h = Fnv1a64::new_default();
        h.write_bytes(bytes);
        Self::Hash(h.finish())
    }
}

/// A component's contribution to its composition's key at one instant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComponentKey {
    pub layer: LayerKey,
    pub transform: [u64; 7],
    pub blend_mode: BlendMode,
}

/// Key of an entry in a composition's cache.
///
/// Whole-frame results and resized per-component intermediates share one cache; the variant tag
/// keeps the two namespaces apart.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Composition(Arc<[Option<ComponentKey>]>),
    Layer {
        name: String,
        state: LayerKey,
        scale: [u64; 2],
    },
}

impl CacheKey {
    pub fn resized(name: &str, state: LayerKey, scale_x: f64, scale_y: f64) -> Self {
        Self::Layer {
            name: name.to_string(),
            state,
            scale: [f64_key_bits(scale_x), f64_key_bits(scale_y)],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/key.rs"]
mod tests;
