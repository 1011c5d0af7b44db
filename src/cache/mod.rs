pub mod key;
pub mod lru;
