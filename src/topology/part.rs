use super::chain::Chain;

/// Whether a nested region removes or adds material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoleRole {
    /// Odd depth: cut out of the surrounding material.
    Hole,
    /// Even depth: material standing inside a hole.
    Island,
}

/// A closed chain nested inside a part, with its own nested chains.
#[derive(Debug, Clone, PartialEq)]
pub struct Hole {
    pub chain: Chain,
    /// Containment depth below the part's shell (1 for a direct hole).
    pub depth: usize,
    pub holes: Vec<Hole>,
}

impl Hole {
    #[must_use]
    pub fn role(&self) -> HoleRole {
        if self.depth % 2 == 1 {
            HoleRole::Hole
        } else {
            HoleRole::Island
        }
    }
}

/// A shell chain with everything nested inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub shell: Chain,
    pub holes: Vec<Hole>,
}

impl Part {
    /// Number of nested chains at every depth.
    #[must_use]
    pub fn nested_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&Hole> = self.holes.iter().collect();
        while let Some(h) = stack.pop() {
            count += 1;
            stack.extend(h.holes.iter());
        }
        count
    }

    /// Every chain of the part with its depth, shell first, depth-first.
    #[must_use]
    pub fn chains(&self) -> Vec<(&Chain, usize)> {
        let mut out = vec![(&self.shell, 0)];
        let mut stack: Vec<&Hole> = self.holes.iter().rev().collect();
        while let Some(h) = stack.pop() {
            out.push((&h.chain, h.depth));
            stack.extend(h.holes.iter().rev());
        }
        out
    }
}
