#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] ply_graph::Error),

    #[error(transparent)]
    Layout(#[from] ply_layout::Error),

    #[error("invalid state document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("state {index} out of range (document has {len} states)")]
    StateOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
