use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeRangeError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}
