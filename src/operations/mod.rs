pub mod chain;
pub mod intersect;
pub mod offset;
pub mod part;

pub use chain::{detect_chains, normalize_chain, normalize_chain_within, ChainDetection, DetectChains};
pub use intersect::{intersect, IntersectionKind, IntersectionPoint, Intersections};
pub use offset::{offset_chain, OffsetChain, OffsetResult};
pub use part::{detect_parts, DetectParts, PartDetection};
