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

//! Picks which fractional discrete variable a [`Node`](crate::node::Node)
//! branches on (§4.4). The actual child construction lives on `Node`; this
//! module only selects the variable.
//!
//! Strong branching's distinguishing step -- tentatively solving each
//! candidate's child relaxations -- needs a live
//! [`crate::subsolver::SubWorkspace`], so it is wired into
//! `crate::engine::branch_and_solve` rather than implemented here;
//! [`rules::StrongBranchingShortlist`] only narrows the field to the `k`
//! most fractional candidates using the same [`FractionalCandidate`] data
//! every other rule sees.

pub mod rules;

/// One discrete variable eligible for branching at the current node.
#[derive(Debug, Clone, Copy)]
pub struct FractionalCandidate {
    pub var: usize,
    pub value: f64,
    /// `value - floor(value)`.
    pub frac_down: f64,
    /// `1.0 - frac_down`.
    pub frac_up: f64,
    pub pseudo_cost_down: f64,
    pub pseudo_cost_up: f64,
}

impl FractionalCandidate {
    /// Distance to the nearer integer, in `[0, 0.5]`.
    pub fn fractionality(&self) -> f64 {
        self.frac_down.min(self.frac_up)
    }
}

/// Selects one variable to branch on among the fractional candidates at a
/// node. Returns `None` only when called with an empty candidate list.
pub trait BranchRule {
    fn select(&self, candidates: &[FractionalCandidate]) -> Option<usize>;
}
