#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] ply_graph::Error),

    #[error("invalid layout option `{name}`: {message}")]
    InvalidOption { name: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
