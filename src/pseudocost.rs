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

//! Per-discrete-variable learned branching statistics (§4.4). Indexed by
//! position in [`crate::problem::VariableSet::discrete_indices`], not by raw
//! variable index -- callers holding a raw index must translate first.

use crate::node::BranchDirection;
use crate::settings::PseudoCostsInitialization;

/// Dense `|D| × 2` running averages of objective degradation per unit
/// fractionality, one pair per discrete variable (down-branch, up-branch).
#[derive(Debug, Clone)]
pub struct PseudoCosts {
    costs: Vec<[f64; 2]>,
    counts: Vec<[u32; 2]>,
    default_estimate: f64,
}

impl PseudoCosts {
    /// `initialization` only decides the estimate returned for a variable
    /// with no observations yet in either direction -- the reliability
    /// fallback to `mostFractional` below a variable's observation count is
    /// an engine-level decision (see `crate::engine::branch_and_solve`),
    /// not something this type enforces. `uniform` fills the unobserved slot
    /// with a small positive constant rather than `1.0` so it never
    /// dominates a real observation before one exists (§4.4); `reliable` and
    /// `strongBranching` fall back to `mostFractional`/a root sweep before
    /// any observation exists, so their unobserved estimate is never
    /// actually read for branching decisions, but is kept at the same scale
    /// so a stray read (e.g. before the root sweep runs) behaves the same way.
    pub fn new(num_discrete: usize, initialization: PseudoCostsInitialization) -> Self {
        let default_estimate = match initialization {
            PseudoCostsInitialization::StrongBranching => 1e-4,
            PseudoCostsInitialization::Reliable => 1e-4,
            PseudoCostsInitialization::Uniform => 1e-4,
        };
        Self { costs: vec![[0.0; 2]; num_discrete], counts: vec![[0; 2]; num_discrete], default_estimate }
    }

    fn slot(dir: BranchDirection) -> usize {
        match dir {
            BranchDirection::Down => 0,
            BranchDirection::Up => 1,
        }
    }

    /// Folds one observed branch outcome into the running average: `frac`
    /// is the fractional part consumed by this branch direction, and the
    /// observed per-unit cost is `(childObjective - parentObjective) / frac`.
    /// A non-finite child objective (infeasible child) is not observed.
    pub fn update(&mut self, idx: usize, dir: BranchDirection, frac: f64, parent_objective: f64, child_objective: f64) {
        if frac <= 0.0 || !child_objective.is_finite() {
            return;
        }
        let observed = (child_objective - parent_objective) / frac;
        let slot = Self::slot(dir);
        let n = self.counts[idx][slot] as f64;
        self.costs[idx][slot] = (self.costs[idx][slot] * n + observed) / (n + 1.0);
        self.counts[idx][slot] += 1;
    }

    /// The per-unit cost for `idx` in direction `dir`, or the initialization
    /// default if unobserved.
    pub fn cost(&self, idx: usize, dir: BranchDirection) -> f64 {
        let slot = Self::slot(dir);
        if self.counts[idx][slot] == 0 {
            self.default_estimate
        } else {
            self.costs[idx][slot]
        }
    }

    pub fn observations(&self, idx: usize, dir: BranchDirection) -> u32 {
        self.counts[idx][Self::slot(dir)]
    }

    /// `true` iff both directions have at least `threshold` observations --
    /// the `reliable` initialization mode's condition for trusting this
    /// variable's pseudo-costs over a structural fallback rule (§4.4).
    pub fn is_reliable(&self, idx: usize, threshold: u32) -> bool {
        self.counts[idx][0] >= threshold && self.counts[idx][1] >= threshold
    }

    /// The pseudo-cost-projected integer-feasible objective degradation for
    /// a variable currently at fractional parts `frac_down`/`frac_up`.
    pub fn estimate(&self, idx: usize, frac_down: f64, frac_up: f64) -> f64 {
        self.cost(idx, BranchDirection::Down) * frac_down + self.cost(idx, BranchDirection::Up) * frac_up
    }
}
