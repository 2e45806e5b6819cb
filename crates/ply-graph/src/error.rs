use crate::order::MAX_EXACT_GROUPS;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("exact ordering limit {limit} exceeds the hard ceiling of {MAX_EXACT_GROUPS} groups")]
    ExactLimitTooLarge { limit: usize },

    #[error("unknown group sort metric: {name}")]
    UnknownSortMetric { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
