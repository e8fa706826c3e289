use thiserror::Error;

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid axis configuration: {0}")]
    InvalidConfiguration(String),

    /// A series referenced an axis that does not exist and no unkeyed
    /// axis of the matching role is available.
    #[error("could not resolve {role} axis (key: {key:?})")]
    UnresolvedAxis {
        role: &'static str,
        key: Option<String>,
    },
}
