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

//! Run configuration. `Settings` is assembled with a builder rather than a
//! pile of free functions or global toggles, so all recognized options are
//! named, defaulted, and validated in one place.

use derive_builder::Builder;

/// Which rule orders [`crate::queue::NodeQueue`] pops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityRule {
    #[default]
    BestFirst,
    DepthFirst,
    BestBound,
    PseudoCost,
}

/// Which rule [`crate::branch::BranchRule`] uses to pick a fractional variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchRuleKind {
    #[default]
    MostFractional,
    PseudoCost,
    StrongBranching,
}

/// How [`crate::pseudocost::PseudoCosts`] are seeded before any observation
/// has been made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PseudoCostsInitialization {
    StrongBranching,
    #[default]
    Reliable,
    Uniform,
}

/// Which violated SOS1 group `crate::engine::branch_and_solve::expand`
/// branches on first when a node violates more than one group at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sos1BranchingPriority {
    /// The violated group with the smallest group id.
    #[default]
    FirstViolated,
    /// The violated group with the largest total `|primal|` across its
    /// non-zero members -- the one furthest from feasibility.
    MostViolated,
}

/// All settings recognized by the engine, per `spec.md` §3.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct Settings {
    #[builder(default = "1e-6")]
    pub absolute_gap_tolerance: f64,
    #[builder(default = "1e-4")]
    pub relative_gap_tolerance: f64,
    #[builder(default = "1e-6")]
    pub integer_tolerance: f64,
    #[builder(default = "1e-7")]
    pub primal_tolerance: f64,
    #[builder(default = "f64::INFINITY")]
    pub objective_cutoff: f64,
    #[builder(default = "f64::INFINITY")]
    pub time_limit: f64,
    #[builder(default = "usize::MAX")]
    pub iteration_limit: usize,
    #[builder(default = "num_cpus::get().max(1)")]
    pub num_processes: usize,
    #[builder(default = "false")]
    pub verbose: bool,
    #[builder(default)]
    pub priority_rule: PriorityRule,
    #[builder(default)]
    pub branch_rule: BranchRuleKind,
    #[builder(default)]
    pub pseudo_costs_initialization: PseudoCostsInitialization,
    #[builder(default)]
    pub sos1_branching_priority: Sos1BranchingPriority,
    /// α, the blend coefficient used by the `pseudoCost` priority rule
    /// (§4.3). Defaults to 1.0, giving equal weight to the relaxation
    /// objective and the pseudo-cost estimate.
    #[builder(default = "1.0")]
    pub pseudo_cost_queue_weight: f64,
    /// Number of observations a variable needs before `reliable`
    /// initialization trusts its pseudo-costs over `mostFractional` (§4.4).
    #[builder(default = "4")]
    pub reliability_threshold: u32,
    /// `k` in strong branching's "top-k fractional candidates" (§4.4).
    #[builder(default = "5")]
    pub strong_branching_candidates: usize,
    /// Minimum queue size below which a worker with an empty queue asks a
    /// peer to donate work (§5).
    #[builder(default = "4")]
    pub steal_threshold: usize,
}

impl Default for Settings {
    fn default() -> Self {
        SettingsBuilder::default().build().expect("all fields have defaults")
    }
}
