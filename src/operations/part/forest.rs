use std::collections::HashMap;

use slotmap::SlotMap;

use crate::topology::{Chain, Hole, Part};

slotmap::new_key_type! {
    /// Identifier of a node in the containment forest.
    pub struct NestId;
}

/// A closed chain placed in the containment forest.
#[derive(Debug, Clone)]
pub(super) struct NestNode {
    pub chain: Chain,
    pub parent: Option<NestId>,
    pub children: Vec<NestId>,
    pub depth: usize,
}

/// Arena of closed chains linked to their immediate container.
///
/// Nodes must be inserted parent-before-child, which area-descending
/// insertion guarantees.
#[derive(Debug, Default)]
pub(super) struct ContainmentForest {
    nodes: SlotMap<NestId, NestNode>,
    order: Vec<NestId>,
}

impl ContainmentForest {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Inserts a chain under `parent` (or as a root) and returns its id.
    pub(super) fn insert(&mut self, chain: Chain, parent: Option<NestId>) -> NestId {
        let depth = parent
            .and_then(|p| self.nodes.get(p))
            .map_or(0, |p| p.depth + 1);
        let parent = parent.filter(|p| self.nodes.contains_key(*p));
        let id = self.nodes.insert(NestNode {
            chain,
            parent,
            children: Vec::new(),
            depth,
        });
        if let Some(node) = parent.and_then(|p| self.nodes.get_mut(p)) {
            node.children.push(id);
        }
        self.order.push(id);
        id
    }

    #[cfg(test)]
    pub(super) fn node(&self, id: NestId) -> Option<&NestNode> {
        self.nodes.get(id)
    }

    /// Converts the forest into parts, one per root, in root insertion
    /// order. Children keep insertion order.
    pub(super) fn into_parts(mut self) -> Vec<Part> {
        // Children were inserted after their parents, so walking backwards
        // finishes every subtree before the node that owns it.
        let mut built: HashMap<NestId, Hole> = HashMap::new();
        let mut roots: Vec<Part> = Vec::new();

        for &id in self.order.iter().rev() {
            let Some(node) = self.nodes.remove(id) else {
                continue;
            };
            let holes: Vec<Hole> = node.children.iter().filter_map(|c| built.remove(c)).collect();
            if node.parent.is_some() {
                let hole = Hole {
                    chain: node.chain,
                    depth: node.depth,
                    holes,
                };
                built.insert(id, hole);
            } else {
                roots.push(Part {
                    shell: node.chain,
                    holes,
                });
            }
        }

        roots.reverse();
        roots
    }
}
