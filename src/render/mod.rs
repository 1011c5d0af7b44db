//! Pixel-level building blocks: blend modes, placement and resampling.

pub mod blend;
pub mod composite;
pub mod resize;
