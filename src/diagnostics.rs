//! Non-fatal conditions found while processing geometry.
//!
//! Degenerate or ambiguous input never aborts a call. The offending element
//! is skipped and a [`Warning`] is appended to the call's result.
use std::fmt;

use crate::geometry::ShapeId;
use crate::math::Point2;
use crate::topology::ChainId;

/// The element a warning refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Shape(ShapeId),
    Chain(ChainId),
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape(id) => write!(f, "shape {id}"),
            Self::Chain(id) => write!(f, "chain {id}"),
        }
    }
}

/// Category of a [`Warning`], for filtering without matching on payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    Connectivity,
    ClosureMismatch,
    ContainmentAmbiguity,
    OffsetCollapse,
    SelfIntersectionUnresolved,
    DegenerateShape,
    OpenChainIgnored,
    JoinSnapped,
}

/// A non-fatal condition reported by chain, part or offset processing.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// More than two shape ends meet at one point; the straightest pairing
    /// was kept and the other branches were left as separate chains.
    Connectivity { point: Point2, shapes: Vec<ShapeId> },

    /// An open chain ends close to, but not within tolerance of, its start.
    ClosureMismatch { chain: ChainId, gap: f64 },

    /// Several candidate parents enclose a chain with indistinguishable
    /// area; the smaller one was chosen.
    ContainmentAmbiguity { chain: ChainId, candidates: Vec<ChainId> },

    /// An offset piece or loop collapsed and was dropped.
    OffsetCollapse { chain: ChainId, reason: String },

    /// Loop splitting reached its depth cap; the loop was kept unsplit.
    SelfIntersectionUnresolved { chain: ChainId, depth: usize },

    /// A shape or chain with no usable extent was skipped.
    DegenerateShape { element: Element, reason: String },

    /// Part detection only considers closed chains.
    OpenChainIgnored { chain: ChainId },

    /// An offset joint could not be trimmed or extended within limits and
    /// was bridged instead.
    JoinSnapped { chain: ChainId, gap: f64 },
}

impl Warning {
    #[must_use]
    pub fn kind(&self) -> WarningKind {
        match self {
            Self::Connectivity { .. } => WarningKind::Connectivity,
            Self::ClosureMismatch { .. } => WarningKind::ClosureMismatch,
            Self::ContainmentAmbiguity { .. } => WarningKind::ContainmentAmbiguity,
            Self::OffsetCollapse { .. } => WarningKind::OffsetCollapse,
            Self::SelfIntersectionUnresolved { .. } => WarningKind::SelfIntersectionUnresolved,
            Self::DegenerateShape { .. } => WarningKind::DegenerateShape,
            Self::OpenChainIgnored { .. } => WarningKind::OpenChainIgnored,
            Self::JoinSnapped { .. } => WarningKind::JoinSnapped,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connectivity { point, shapes } => {
                write!(f, "{} shape ends meet at ({}, {}):", shapes.len(), point.x, point.y)?;
                for id in shapes {
                    write!(f, " {id}")?;
                }
                Ok(())
            }
            Self::ClosureMismatch { chain, gap } => {
                write!(f, "chain {chain} is open with a closing gap of {gap}")
            }
            Self::ContainmentAmbiguity { chain, candidates } => {
                write!(f, "chain {chain} has {} equally likely parents", candidates.len())
            }
            Self::OffsetCollapse { chain, reason } => {
                write!(f, "offset of chain {chain} collapsed: {reason}")
            }
            Self::SelfIntersectionUnresolved { chain, depth } => {
                write!(f, "offset of chain {chain} still self-intersects after {depth} splits")
            }
            Self::DegenerateShape { element, reason } => write!(f, "{element} skipped: {reason}"),
            Self::OpenChainIgnored { chain } => {
                write!(f, "chain {chain} is open and cannot bound a part")
            }
            Self::JoinSnapped { chain, gap } => {
                write!(f, "offset of chain {chain} bridged a joint gap of {gap}")
            }
        }
    }
}

/// Logs a warning and appends it to the result list.
pub(crate) fn push_warning(warnings: &mut Vec<Warning>, warning: Warning) {
    tracing::warn!(kind = ?warning.kind(), "{warning}");
    warnings.push(warning);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_element() {
        let w = Warning::DegenerateShape {
            element: Element::Shape(ShapeId::new("L7")),
            reason: "zero-length line".into(),
        };
        assert_eq!(w.to_string(), "shape L7 skipped: zero-length line");
        assert_eq!(w.kind(), WarningKind::DegenerateShape);
    }

    #[test]
    fn push_records_in_order() {
        let mut warnings = Vec::new();
        push_warning(&mut warnings, Warning::OpenChainIgnored { chain: ChainId::new("chain-0") });
        push_warning(
            &mut warnings,
            Warning::JoinSnapped { chain: ChainId::new("chain-0"), gap: 0.5 },
        );
        let kinds: Vec<_> = warnings.iter().map(Warning::kind).collect();
        assert_eq!(kinds, [WarningKind::OpenChainIgnored, WarningKind::JoinSnapped]);
        assert!(warnings[1].to_string().contains("0.5"));
    }
}
