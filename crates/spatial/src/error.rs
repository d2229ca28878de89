use compute::ComputeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SortError {
    #[error("sort length {0} is not a power of two")]
    NotPowerOfTwo(usize),
    #[error("sort length {0} exceeds the addressable entry range")]
    TooLong(usize),
    #[error("sort pass failed: {0}")]
    Compute(#[from] ComputeError),
}

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("compute dispatch failed: {0}")]
    Compute(#[from] ComputeError),
    #[error(transparent)]
    Sort(#[from] SortError),
    #[error("entry capacity {0} exceeds the addressable entry range")]
    CapacityTooLarge(usize),
}
