use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Path '{path}' references an undeclared node: {node}")]
    UnknownNode { path: String, node: String },

    #[error("Node declared more than once: {0}")]
    DuplicateNode(String),

    #[error("Path declared more than once: {0}")]
    DuplicatePath(String),

    #[error("Length of {0} does not fit a 64-bit coordinate")]
    LengthOverflow(String),
}
