use crate::{
    composition::{component::ComponentOpts, model::Composition},
    foundation::core::Size,
    foundation::error::{StrataError, StrataResult},
};

/// Options for [`concatenate`]. Unset fields are derived from the children.
#[derive(Clone, Debug, Default)]
pub struct ConcatOpts {
    /// Parent size; defaults to the first child's size.
    pub size: Option<Size>,
    /// Parent duration; defaults to the sum of the children's durations.
    pub duration: Option<f64>,
    /// Component names, one per child; defaults to `scene_<i>`.
    pub names: Option<Vec<String>>,
}

/// Play `compositions` back to back inside a new parent composition.
///
/// Child `i` is added with an offset equal to the summed durations of children `0..i`, so the
/// result is a temporal sequence rather than a spatial overlay.
pub fn concatenate(compositions: Vec<Composition>, opts: ConcatOpts) -> StrataResult<Composition> {
    let Some(first) = compositions.first() else {
        return Err(StrataError::validation(
            "concatenate needs at least one composition",
        ));
    };
    let size = opts.size.unwrap_or_else(|| first.size());
    let duration = opts
        .duration
        .unwrap_or_else(|| compositions.iter().map(Composition::duration).sum());
    let names = match opts.names {
        Some(names) if names.len() != compositions.len() => {
            return Err(StrataError::validation(format!(
                "concatenate got {} names for {} compositions",
                names.len(),
                compositions.len()
            )));
        }
        Some(names) => names,
        None => (0..compositions.len())
            .map(|i| format!("scene_{i}"))
            .collect(),
    };

    let mut main = Composition::new(size, duration);
    let mut offset = 0.0;
    for (composition, name) in compositions.into_iter().zip(names) {
        let child_duration = composition.duration();
        main.add_component(composition, ComponentOpts::named(name).with_offset(offset))?;
        offset += child_duration;
    }
    tracing::debug!(scenes = main.len(), duration, "concatenated compositions");
    Ok(main)
}

#[cfg(test)]
#[path = "../../tests/unit/composition/concat.rs"]
mod tests;
