use thiserror::Error;

/// Failures of the arbitrary-precision kernel.
///
/// Only parsing failures are expected in practice; the other two mean a
/// geometric guard was missed upstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumericError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("even root of negative value")]
    NegativeRoot,
    #[error("cannot parse {0:?} as a real number")]
    Parse(String),
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("unable to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
