pub mod component;
pub mod concat;
pub mod model;
