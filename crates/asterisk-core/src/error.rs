use thiserror::Error;

/// Failure to read a `W:H` aspect ratio.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RatioError {
    #[error("aspect ratio {0:?} is not of the form W:H, W/H or WxH")]
    Malformed(String),
    #[error("aspect ratio {0:?} has a side that is not a positive number")]
    NonPositive(String),
}

/// Reasons a masonry pass could not produce a layout.
///
/// Both are retryable: the caller keeps the previous layout and runs the pass
/// again on a later frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("expanded item {item} has no measurable height yet")]
    PendingMeasurement { item: usize },
    #[error("engine order covers {expected} items but {actual} were supplied")]
    ItemCountMismatch { expected: usize, actual: usize },
}
