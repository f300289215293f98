pub mod dto;
pub mod ordered_map;

pub use dto::*;
pub use ordered_map::OrderedMap;
