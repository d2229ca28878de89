//! Bitonic merge network as a list of passes.
//!
//! For `N = 2^k` the outer stage length doubles from 2 to `N` and, inside
//! each stage, the compare distance halves from `stage / 2` to 1. That gives
//! `k (k + 1) / 2` passes. The first pass of each stage carries the
//! direction flag.

use crate::error::SortError;
use compute::SortStepUniforms;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SortStep {
    pub sequence_length: u32,
    pub compare_distance: u32,
    pub direction_flag: bool,
}

impl SortStep {
    #[must_use]
    pub fn uniforms(&self, entry_count: u32) -> SortStepUniforms {
        SortStepUniforms {
            sequence_length: self.sequence_length,
            compare_distance: self.compare_distance,
            direction_flag: u32::from(self.direction_flag),
            entry_count,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortPlan {
    len: u32,
    steps: Vec<SortStep>,
}

impl SortPlan {
    /// Plan for sorting exactly `len` entries. Lengths 0 and 1 need no passes.
    pub fn for_len(len: usize) -> Result<Self, SortError> {
        if len == 0 {
            return Ok(Self::default());
        }
        if !len.is_power_of_two() {
            return Err(SortError::NotPowerOfTwo(len));
        }
        let n = u32::try_from(len).map_err(|_| SortError::TooLong(len))?;

        let mut steps = Vec::with_capacity(pass_count(len));
        let mut sequence_length = 2u32;
        while sequence_length <= n && sequence_length != 0 {
            let mut compare_distance = sequence_length / 2;
            let mut direction_flag = true;
            while compare_distance >= 1 {
                steps.push(SortStep {
                    sequence_length,
                    compare_distance,
                    direction_flag,
                });
                direction_flag = false;
                compare_distance /= 2;
            }
            sequence_length = sequence_length.wrapping_mul(2);
        }
        Ok(Self { len: n, steps })
    }

    /// Entry count the plan sorts.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// True when the plan has no passes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn steps(&self) -> &[SortStep] {
        &self.steps
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortStep> {
        self.steps.iter()
    }
}

/// Pass count of the network for a power-of-two `len`.
#[must_use]
pub fn pass_count(len: usize) -> usize {
    if len < 2 {
        return 0;
    }
    let k = len.trailing_zeros() as usize;
    k * (k + 1) / 2
}
