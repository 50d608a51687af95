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

//! The continuous-relaxation contract a [`Node`](crate::node::Node) is solved
//! against. The engine never knows what's on the other side of this trait --
//! only that it can load bounds, mutate the constraint set, and solve.
//!
//! `setup` is not a trait method (it would not be object-safe); each backend
//! exposes its own constructor and [`setup`] dispatches to one by
//! [`SubsolverKind`].

pub mod dense;

use crate::error::SetupError;
use crate::problem::Problem;
use crate::settings::Settings;

/// The relaxation result of one [`SubWorkspace::solve`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
}

/// What a relaxation solve returns: status, objective, and the primal/dual
/// vectors a [`Node`](crate::node::Node) stores (§4.2).
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub objective: f64,
    pub primal: Vec<f64>,
    pub dual: Vec<f64>,
    /// `false` iff the returned objective is a heuristic estimate rather than
    /// a certified bound (§4.2's warm-start staleness note).
    pub reliable: bool,
}

/// The operations a continuous-relaxation backend must support (§4.2).
/// Implementors own their own dense/sparse representation; the engine
/// interacts with them only through this trait.
pub trait SubWorkspace {
    /// Solves the relaxation at the workspace's current bounds and
    /// constraint set. A non-fatal backend failure (numerical stall,
    /// iteration limit) is reported as `Err(SubsolverError)`, recovered
    /// locally by the caller per §7 -- never a panic, never `EngineError`.
    fn solve(&mut self) -> Result<SolveOutcome, crate::error::SubsolverError>;

    /// Overwrites the variable bounds in place (a [`Node`](crate::node::Node)'s
    /// `branch_lo_bs`/`branch_up_bs`, full-length vectors).
    fn update_bounds(&mut self, lo_bs: &[f64], up_bs: &[f64]);

    /// Replaces the solver settings used by subsequent `solve` calls.
    fn update_settings(&mut self, settings: Settings);

    /// Appends rows to the constraint set. `a_rows` is row-major, `n`
    /// columns per row.
    fn insert_constraints(&mut self, a_rows: &[f64], lo_bs: &[f64], up_bs: &[f64]);

    /// Removes constraint rows by index (order-independent; implementors
    /// normalize internally).
    fn remove_constraints(&mut self, indices: &[usize]);

    /// Reorders constraint rows: row `i` after the call is the row that was
    /// at `permutation[i]` before it.
    fn permute_constraints(&mut self, permutation: &[usize]);

    /// Folds another problem's variables and constraints into this
    /// workspace, block-diagonally (no shared rows/columns). Returns
    /// whether the merge preserves bound reliability -- `true` here, since
    /// it is a structural append rather than an approximation.
    fn append_problem(&mut self, extra: &Problem) -> bool;

    fn settings(&self) -> &Settings;
}

/// Extension point for real backends (§4.2's "Variants" list). Only
/// [`SubsolverKind::Dense`] is vendored in this crate; the others are
/// reserved identifiers for bindings this crate does not carry.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsolverKind {
    Dense,
    Osqp,
    Qpalm,
    Gurobi,
}

/// Builds a [`SubWorkspace`] of the requested kind for `problem` under
/// `settings`. Only `Dense` is implemented; the other variants return
/// [`SetupError::BackendRejected`] rather than silently substituting a
/// different backend.
pub fn setup(
    kind: SubsolverKind,
    problem: &Problem,
    settings: &Settings,
) -> Result<Box<dyn SubWorkspace>, SetupError> {
    match kind {
        SubsolverKind::Dense => {
            Ok(Box::new(dense::DenseProjectedGradientWorkspace::setup(problem, settings)?))
        }
        other => Err(SetupError::BackendRejected {
            reason: format!(
                "{:?} is not vendored in this crate; implement SubWorkspace and construct it directly",
                other
            ),
        }),
    }
}
