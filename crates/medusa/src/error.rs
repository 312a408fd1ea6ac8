pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("layout dimensions must be positive, got {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("tree spacing must be positive, got distx {distx}, disty {disty}")]
    InvalidSpacing { distx: f64, disty: f64 },

    #[error("cannot lay out an empty graph")]
    EmptyGraph,

    #[error("tree layout requires at least one root (a node with no incoming edge)")]
    NoRoots,

    #[error("step produced a non-finite coordinate for node `{node}`: ({x}, {y})")]
    NonFiniteCoordinate { node: String, x: f64, y: f64 },
}
