use crate::{
    animation::ease::Ease,
    foundation::core::Vec2,
    foundation::error::{StrataError, StrataResult},
};

/// Linear interpolation between two values of the same type.
pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// A value that may change over (layer-local) time, in seconds.
///
/// Sampling is a pure function of time: the same motion sampled at the same time always yields
/// the same value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion<T> {
    Constant(T),
    Keyframes(Keyframes<T>),
}

impl<T> Motion<T>
where
    T: Lerp + Clone + Default,
{
    pub fn constant(value: T) -> Self {
        Self::Constant(value)
    }

    /// Linear keyframes from `(time, value)` pairs, all with [`Ease::Linear`].
    pub fn linear(keys: impl IntoIterator<Item = (f64, T)>) -> Self {
        Self::Keyframes(Keyframes {
            keys: keys
                .into_iter()
                .map(|(time, value)| Keyframe {
                    time,
                    value,
                    ease: Ease::Linear,
                })
                .collect(),
            mode: InterpMode::Linear,
        })
    }

    pub fn sample(&self, time: f64) -> T {
        match self {
            Self::Constant(v) => v.clone(),
            Self::Keyframes(kf) => kf.sample(time),
        }
    }

    pub fn validate(&self) -> StrataResult<()> {
        match self {
            Self::Constant(_) => Ok(()),
            Self::Keyframes(kf) => kf.validate(),
        }
    }
}

impl<T> From<T> for Motion<T> {
    fn from(value: T) -> Self {
        Self::Constant(value)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframes<T> {
    pub keys: Vec<Keyframe<T>>, // sorted by time
    #[serde(default)]
    pub mode: InterpMode,
}

impl<T> Keyframes<T>
where
    T: Lerp + Clone + Default,
{
    pub fn validate(&self) -> StrataResult<()> {
        if self.keys.is_empty() {
            return Err(StrataError::validation(
                "keyframes must contain at least one key",
            ));
        }
        if self.keys.iter().any(|k| !k.time.is_finite()) {
            return Err(StrataError::validation("keyframe times must be finite"));
        }
        if !self.keys.windows(2).all(|w| w[0].time <= w[1].time) {
            return Err(StrataError::validation("keyframes must be sorted by time"));
        }
        Ok(())
    }

    /// Sample at `time`. An empty key list (rejected by [`Keyframes::validate`]) samples as
    /// `T::default()`.
    pub fn sample(&self, time: f64) -> T {
        if self.keys.is_empty() {
            return T::default();
        }

        let idx = self.keys.partition_point(|k| k.time <= time);

        if idx == 0 {
            return self.keys[0].value.clone();
        }
        if idx >= self.keys.len() {
            return self.keys[self.keys.len() - 1].value.clone();
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = b.time - a.time;
        if span <= 0.0 {
            return a.value.clone();
        }

        let t = (time - a.time) / span;
        match self.mode {
            InterpMode::Hold => a.value.clone(),
            InterpMode::Linear => T::lerp(&a.value, &b.value, a.ease.apply(t)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<T> {
    pub time: f64,
    pub value: T,
    #[serde(default)]
    pub ease: Ease, // applied toward the next key
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpMode {
    Hold,
    #[default]
    Linear,
}

#[cfg(test)]
#[path = "../../tests/unit/animation/motion.rs"]
mod tests;
