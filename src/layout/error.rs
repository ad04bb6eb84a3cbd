use thiserror::Error;

/// Reasons the tree layout gives up and hands over to the grid fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("node id `{0}` appears more than once")]
    DuplicateNodeId(String),
    #[error("node at index {0} has an empty id")]
    EmptyNodeId(usize),
    #[error("layout setting `{name}` must be finite and non-negative, got {value}")]
    InvalidSpacing { name: &'static str, value: f32 },
    #[error("computed a non-finite position for node `{0}`")]
    NonFiniteCoordinate(String),
    #[error("layout positioned {positioned} of {expected} nodes (first missing: `{missing}`)")]
    IncompleteLayout {
        positioned: usize,
        expected: usize,
        missing: String,
    },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
