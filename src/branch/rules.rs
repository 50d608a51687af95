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

//! The three branching rules of §4.4.

use super::{BranchRule, FractionalCandidate};

/// Branches on the candidate furthest from either integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MostFractional;

impl BranchRule for MostFractional {
    fn select(&self, candidates: &[FractionalCandidate]) -> Option<usize> {
        candidates
            .iter()
            .max_by(|a, b| a.fractionality().partial_cmp(&b.fractionality()).unwrap())
            .map(|c| c.var)
    }
}

/// The `k` candidates furthest from an integer, most-fractional first.
/// Shared by [`StrongBranchingShortlist`] and by
/// `crate::engine::branch_and_solve`'s trial-solve loop, which needs the
/// ordered shortlist itself rather than just the rule's final pick.
pub fn top_k_by_fractionality(candidates: &[FractionalCandidate], k: usize) -> Vec<FractionalCandidate> {
    let mut sorted: Vec<FractionalCandidate> = candidates.to_vec();
    sorted.sort_by(|a, b| b.fractionality().partial_cmp(&a.fractionality()).unwrap());
    sorted.truncate(k.max(1));
    sorted
}

fn product_score(c: &FractionalCandidate, epsilon: f64) -> f64 {
    (c.frac_down * c.pseudo_cost_down).max(epsilon) * (c.frac_up * c.pseudo_cost_up).max(epsilon)
}

/// Branches on the candidate with the highest pseudo-cost product score,
/// `max(fracDown·costDown, ε) · max(fracUp·costUp, ε)` -- the standard
/// product rule, favoring a variable expected to move the bound a lot in
/// both branch directions.
#[derive(Debug, Clone, Copy)]
pub struct PseudoCostBranching {
    pub epsilon: f64,
}

impl Default for PseudoCostBranching {
    fn default() -> Self {
        Self { epsilon: 1e-6 }
    }
}

impl BranchRule for PseudoCostBranching {
    fn select(&self, candidates: &[FractionalCandidate]) -> Option<usize> {
        candidates
            .iter()
            .max_by(|a, b| {
                product_score(a, self.epsilon).partial_cmp(&product_score(b, self.epsilon)).unwrap()
            })
            .map(|c| c.var)
    }
}

/// Narrows the candidate set to the `k` most fractional before applying the
/// pseudo-cost product rule. The tentative-solve step that distinguishes
/// true strong branching from this shortlist happens in
/// `crate::engine::branch_and_solve`, which calls this rule only to decide
/// which `k` candidates are worth a trial solve.
#[derive(Debug, Clone, Copy)]
pub struct StrongBranchingShortlist {
    pub k: usize,
    pub epsilon: f64,
}

impl BranchRule for StrongBranchingShortlist {
    fn select(&self, candidates: &[FractionalCandidate]) -> Option<usize> {
        top_k_by_fractionality(candidates, self.k)
            .iter()
            .max_by(|a, b| {
                product_score(a, self.epsilon).partial_cmp(&product_score(b, self.epsilon)).unwrap()
            })
            .map(|c| c.var)
    }
}
