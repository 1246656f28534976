pub mod graph;
pub mod step;

// re-export for cleaner imports
pub use self::graph::{PathGraph, VariationGraph};
pub use self::step::{NodeId, PathTraversalStep};
