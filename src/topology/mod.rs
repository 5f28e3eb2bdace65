pub mod chain;
pub mod part;

pub use chain::{Chain, ChainEntry, ChainId, Winding};
pub use part::{Hole, HoleRole, Part};
