pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed node identifier {id:?}: expected the decimal rendering of a system id")]
    MalformedNodeId { id: String },

    #[error("Unknown node {id:?}: not part of the current snapshot")]
    UnknownNode { id: String },

    #[error("Unknown edge {id:?}: not part of the current snapshot")]
    UnknownEdge { id: String },

    #[error("Layout requested before every node was measured")]
    NodesNotMeasured,
}
