// Copyright 2026 The mipbb Authors
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Error kinds surfaced by the engine. Fatal errors terminate `solve!` with a
//! typed error; everything else is recovered locally (see module docs on
//! `crate::engine::branch_and_solve`) and never reaches the caller.

use thiserror::Error;

/// A fatal error raised while installing a problem and settings into a
/// [`crate::subsolver::SubWorkspace`]. The backend rejected the problem
/// outright; the engine cannot proceed.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("variable bounds are inconsistent: lower bound {lo} exceeds upper bound {up} at index {index}")]
    InconsistentVariableBounds { index: usize, lo: f64, up: f64 },
    #[error("constraint bounds are inconsistent: lower bound {lo} exceeds upper bound {up} at index {index}")]
    InconsistentConstraintBounds { index: usize, lo: f64, up: f64 },
    #[error("SOS1 group {group} has {size} member(s); every SOS1 group requires at least 2")]
    DegenerateSos1Group { group: usize, size: usize },
    #[error("backend rejected the problem: {reason}")]
    BackendRejected { reason: String },
}

/// A fatal numerical error: the objective is not PSD, or some coefficient is
/// not finite.
#[derive(Debug, Error)]
pub enum NumericalError {
    #[error("quadratic objective term Q is not symmetric positive semi-definite")]
    NonPsdObjective,
    #[error("non-finite coefficient encountered at {location}")]
    NonFiniteCoefficient { location: String },
}

/// A fatal resource error: the engine could not allocate what it needed to
/// continue (e.g. node storage).
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to allocate a node at depth {depth}: {reason}")]
    NodeAllocation { depth: usize, reason: String },
}

/// A non-fatal backend error: the subsolver returned an unexpected status on
/// an otherwise valid call. The engine logs it, marks the node `reliable =
/// false`, and continues -- see `spec.md` §7.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("subsolver returned an unexpected status: {status}")]
pub struct SubsolverError {
    pub status: String,
}

/// The union of the three fatal error kinds; this is what `solve!` returns in
/// its `Result`'s error arm.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Numerical(#[from] NumericalError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_error_converts_into_engine_error() {
        let e: EngineError = SetupError::DegenerateSos1Group { group: 3, size: 1 }.into();
        assert!(matches!(e, EngineError::Setup(_)));
    }

    #[test]
    fn subsolver_error_is_not_part_of_engine_error() {
        // SubsolverError is intentionally not convertible into EngineError:
        // it is always recovered locally, never propagated.
        let err = SubsolverError { status: "iterationLimit".into() };
        assert_eq!(err.status, "iterationLimit");
    }
}
