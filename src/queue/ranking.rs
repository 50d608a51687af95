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

//! Turns the active [`PriorityRule`] into the scalar key stored in
//! `Node::pseudo_objective` (§4.3). Kept separate from [`super::simple`] so
//! the queue itself never has to know which rule produced the key it's
//! ordering by.

use crate::node::Node;
use crate::settings::PriorityRule;

/// Computes the insertion-time priority-queue key for `node` under `rule`.
/// `pseudo_cost_estimate` is the pseudo-cost-projected integer-feasible
/// objective for `node` (from [`crate::pseudocost::PseudoCosts::estimate`]);
/// callers that don't need it (every rule but `PseudoCost`) may pass `0.0`.
pub fn score(node: &Node, rule: PriorityRule, pseudo_cost_estimate: f64, weight: f64) -> f64 {
    match rule {
        // Certified relaxation bound only: classic best-bound-first search.
        // `bestFirst` and `bestBound` share this definition (§4.3); the
        // queue's reported local bound (`runloop::report_local_bound`) relies
        // on this being an actual objective value, not a heuristic nudge.
        PriorityRule::BestBound | PriorityRule::BestFirst => node.objective,
        // Ignores the bound entirely; LIFO-like, deepest node first.
        PriorityRule::DepthFirst => -(node.depth as f64),
        PriorityRule::PseudoCost => node.objective + weight * pseudo_cost_estimate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{ConstraintSet, DenseVariableSet, ObjectiveFunction, Problem};

    fn toy_node(objective: f64, avg_frac: f64, depth: usize) -> Node {
        let p = Problem::new(
            ObjectiveFunction::Null,
            ConstraintSet::Null,
            DenseVariableSet::continuous(vec![0.0], vec![1.0]),
        );
        let mut n = Node::root(&p);
        n.objective = objective;
        n.avg_frac = avg_frac;
        n.depth = depth;
        n
    }

    #[test]
    fn best_bound_uses_the_raw_objective() {
        let n = toy_node(4.0, 0.3, 2);
        assert_eq!(score(&n, PriorityRule::BestBound, 0.0, 1.0), 4.0);
    }

    #[test]
    fn best_first_uses_the_raw_objective_like_best_bound() {
        let n = toy_node(4.0, 0.3, 2);
        assert_eq!(score(&n, PriorityRule::BestFirst, 0.0, 1.0), 4.0);
    }

    #[test]
    fn depth_first_ignores_the_bound() {
        let n = toy_node(100.0, 0.9, 5);
        assert_eq!(score(&n, PriorityRule::DepthFirst, 0.0, 1.0), -5.0);
    }

    #[test]
    fn pseudo_cost_blends_in_the_estimate_by_weight() {
        let n = toy_node(4.0, 0.0, 0);
        assert!((score(&n, PriorityRule::PseudoCost, 2.0, 0.5) - 5.0).abs() < 1e-12);
    }
}
