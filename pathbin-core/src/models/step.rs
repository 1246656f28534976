use std::fmt::{self, Display};

/// Dense handle of a graph node. Ids follow node declaration order.
pub type NodeId = u64;

///
/// One ordered step of a path through the graph: the node visited, the strand
/// it is visited on and the node's sequence length.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub struct PathTraversalStep {
    pub node: NodeId,
    pub is_reverse: bool,
    pub length: u64,
}

impl PathTraversalStep {
    pub fn new(node: NodeId, is_reverse: bool, length: u64) -> Self {
        PathTraversalStep {
            node,
            is_reverse,
            length,
        }
    }

    pub fn forward(node: NodeId, length: u64) -> Self {
        PathTraversalStep::new(node, false, length)
    }

    pub fn reverse(node: NodeId, length: u64) -> Self {
        PathTraversalStep::new(node, true, length)
    }

    ///
    /// Strand symbol as written in GFA path lines
    ///
    pub fn strand(&self) -> char {
        if self.is_reverse { '-' } else { '+' }
    }
}

impl Display for PathTraversalStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.node, self.strand())
    }
}
