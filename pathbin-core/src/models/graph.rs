use fxhash::FxHashMap;

use crate::errors::GraphError;
use crate::models::step::{NodeId, PathTraversalStep};

///
/// Read-only view of a variation graph as consumed by the binning engine.
///
/// Only path traversal data is exposed: the order of the paths, the ordered
/// steps of each path and the absolute coordinate of every node in the
/// graph's linear (node order) layout.
///
pub trait PathGraph: Sync {
    ///
    /// Names of all paths in the graph's enumeration order.
    ///
    fn path_names(&self) -> Vec<String>;

    ///
    /// Ordered traversal steps of a path, or `None` if there is no such path.
    ///
    /// # Arguments
    /// - path: the name of the path
    fn traversal_steps(&self, path: &str) -> Option<impl Iterator<Item = PathTraversalStep> + '_>;

    ///
    /// Absolute graph coordinate of the first base of a node.
    ///
    fn node_offset(&self, node: NodeId) -> Option<u64>;

    ///
    /// Sum of all node lengths; absolute coordinates live in `[0, total_length)`.
    ///
    fn total_length(&self) -> u64;

    ///
    /// Number of bases traversed by a path, `None` if there is no such path.
    ///
    fn path_length(&self, path: &str) -> Result<Option<u64>, GraphError> {
        let Some(mut steps) = self.traversal_steps(path) else {
            return Ok(None);
        };
        steps
            .try_fold(0u64, |total, step| total.checked_add(step.length))
            .map(Some)
            .ok_or_else(|| GraphError::LengthOverflow(format!("path {path}")))
    }
}

#[derive(Clone, Debug)]
struct Node {
    length: u64,
    offset: u64,
}

#[derive(Clone, Debug)]
struct Path {
    name: String,
    steps: Vec<PathTraversalStep>,
}

///
/// In-memory variation graph: nodes laid out in declaration order and named
/// paths over them.
///
#[derive(Clone, Debug, Default)]
pub struct VariationGraph {
    nodes: Vec<Node>,
    node_index: FxHashMap<String, NodeId>,
    paths: Vec<Path>,
    path_index: FxHashMap<String, usize>,
    total_length: u64,
}

impl VariationGraph {
    pub fn new() -> Self {
        VariationGraph::default()
    }

    ///
    /// Declare a node. The node is placed right after the previously declared
    /// node in the linear layout.
    ///
    /// # Arguments
    /// - name: node name, unique within the graph
    /// - length: sequence length of the node
    pub fn add_node(&mut self, name: &str, length: u64) -> Result<NodeId, GraphError> {
        if self.node_index.contains_key(name) {
            return Err(GraphError::DuplicateNode(name.to_string()));
        }

        let total_length = self
            .total_length
            .checked_add(length)
            .ok_or_else(|| GraphError::LengthOverflow(format!("graph at node {name}")))?;

        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node {
            length,
            offset: self.total_length,
        });
        self.node_index.insert(name.to_string(), id);
        self.total_length = total_length;

        Ok(id)
    }

    ///
    /// Add a path given as a sequence of `(node name, is_reverse)` pairs.
    ///
    /// # Arguments
    /// - name: path name, unique within the graph
    /// - steps: the visited nodes in traversal order
    pub fn add_path<S: AsRef<str>>(
        &mut self,
        name: &str,
        steps: impl IntoIterator<Item = (S, bool)>,
    ) -> Result<(), GraphError> {
        if self.path_index.contains_key(name) {
            return Err(GraphError::DuplicatePath(name.to_string()));
        }

        let steps = steps
            .into_iter()
            .map(|(node, is_reverse)| {
                let node = node.as_ref();
                let id = *self
                    .node_index
                    .get(node)
                    .ok_or_else(|| GraphError::UnknownNode {
                        path: name.to_string(),
                        node: node.to_string(),
                    })?;
                Ok(PathTraversalStep::new(
                    id,
                    is_reverse,
                    self.nodes[id as usize].length,
                ))
            })
            .collect::<Result<Vec<_>, GraphError>>()?;

        steps
            .iter()
            .try_fold(0u64, |total, step| total.checked_add(step.length))
            .ok_or_else(|| GraphError::LengthOverflow(format!("path {name}")))?;

        self.path_index.insert(name.to_string(), self.paths.len());
        self.paths.push(Path {
            name: name.to_string(),
            steps,
        });

        Ok(())
    }

    pub fn node_length(&self, node: NodeId) -> Option<u64> {
        self.nodes.get(node as usize).map(|n| n.length)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }
}

impl PathGraph for VariationGraph {
    fn path_names(&self) -> Vec<String> {
        self.paths.iter().map(|p| p.name.clone()).collect()
    }

    fn traversal_steps(&self, path: &str) -> Option<impl Iterator<Item = PathTraversalStep> + '_> {
        self.path_index
            .get(path)
            .map(|&ind| self.paths[ind].steps.iter().copied())
    }

    fn node_offset(&self, node: NodeId) -> Option<u64> {
        self.nodes.get(node as usize).map(|n| n.offset)
    }

    fn total_length(&self) -> u64 {
        self.total_length
    }
}
