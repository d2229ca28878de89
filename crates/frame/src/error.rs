use compute::ComputeError;
use spatial::IndexError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("precalc dispatch failed: {0}")]
    Compute(#[from] ComputeError),
    #[error("spatial index rebuild failed: {0}")]
    Index(#[from] IndexError),
    #[error("renderer failed: {0:#}")]
    Renderer(anyhow::Error),
}
