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

//! A [`Node`] is an immutable-once-frozen record of a search-tree node: the
//! cumulative bounds inherited from every ancestor branch decision, the
//! relaxation result at this node, and the score used to order the queue.
//!
//! Nodes record cumulative bounds rather than deltas so that a relaxation can
//! be reloaded into any [`crate::subsolver::SubWorkspace`] statelessly --
//! there is no need to replay the path from the root.

use crate::problem::Problem;

/// A branch decision on a discrete variable: which side of its split value
/// a child inherits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchDirection {
    Down,
    Up,
}

/// One node of the search tree (§3, §4.1).
#[derive(Debug, Clone)]
pub struct Node {
    pub branch_lo_bs: Vec<f64>,
    pub branch_up_bs: Vec<f64>,
    /// Relaxation optimum; `-inf` if unsolved, `+inf` if proven infeasible.
    pub objective: f64,
    pub primal: Vec<f64>,
    pub dual: Vec<f64>,
    /// Average fractionality of discrete variables in `primal`, in `[0, 1]`.
    pub avg_frac: f64,
    /// The score this node was queued under (§4.3). Computed once at
    /// insertion; never recomputed except by `reprioritize`.
    pub pseudo_objective: f64,
    /// `false` iff the relaxation was warm-started from a stale dual basis
    /// whose lower-bound validity is uncertain (§4.2). While false, the
    /// relaxation's `objective` is a heuristic score, not a certified bound.
    pub reliable: bool,
    pub depth: usize,
    /// The variable this node's parent branched on to produce it, and which
    /// side it inherited. `None` for the root and for SOS1-branch children,
    /// which don't feed pseudo-cost observations. Lets
    /// `crate::engine::branch_and_solve` credit the right variable once this
    /// node is solved, without re-walking the tree (§4.4's deferred update).
    pub branch_var: Option<usize>,
    pub branch_direction: Option<BranchDirection>,
    /// The fractional part of the parent's relaxation value this branch
    /// consumed -- the divisor in the pseudo-cost update rule.
    pub branch_frac: f64,
}

impl Node {
    /// Builds the root node: problem bounds, unsolved (`objective = -inf`),
    /// depth zero, and reliable (there is no stale warm-start basis yet).
    pub fn root(problem: &Problem) -> Self {
        let (lo, up) = problem.variables.bounds();
        let n = lo.len();
        Node {
            branch_lo_bs: lo,
            branch_up_bs: up,
            objective: f64::NEG_INFINITY,
            primal: vec![0.0; n],
            dual: vec![0.0; problem.constraints.num_constraints()],
            avg_frac: 0.0,
            pseudo_objective: f64::NEG_INFINITY,
            reliable: true,
            depth: 0,
            branch_var: None,
            branch_direction: None,
            branch_frac: 0.0,
        }
    }

    /// Returns `true` iff every component satisfies `loBs[i] <= upBs[i]`
    /// (invariant 1 of §8): a node failing this check must never be pushed
    /// onto a [`crate::queue::NodeQueue`].
    pub fn is_bounds_consistent(&self) -> bool {
        self.branch_lo_bs
            .iter()
            .zip(self.branch_up_bs.iter())
            .all(|(&lo, &up)| lo <= up)
    }

    /// Builds a child of `self` by branching on discrete variable `var` at
    /// direction `dir`, given the parent's relaxation value `value` for that
    /// variable (§4.1). Returns `None` if the child is pruned at creation
    /// because its bounds became inconsistent.
    pub fn branch_child(&self, var: usize, value: f64, dir: BranchDirection) -> Option<Node> {
        let mut lo = self.branch_lo_bs.clone();
        let mut up = self.branch_up_bs.clone();
        match dir {
            BranchDirection::Down => up[var] = value.floor(),
            BranchDirection::Up => lo[var] = value.ceil(),
        }
        if lo[var] > up[var] {
            return None;
        }
        let frac_down = value - value.floor();
        let branch_frac = match dir {
            BranchDirection::Down => frac_down,
            BranchDirection::Up => 1.0 - frac_down,
        };
        Some(Node {
            branch_lo_bs: lo,
            branch_up_bs: up,
            objective: f64::NEG_INFINITY,
            primal: self.primal.clone(),
            dual: self.dual.clone(),
            avg_frac: 0.0,
            pseudo_objective: self.objective,
            reliable: true,
            depth: self.depth + 1,
            branch_var: Some(var),
            branch_direction: Some(dir),
            branch_frac,
        })
    }

    /// Builds a SOS1-branch child that fixes every variable in `fixed_zero`
    /// to zero (§4.1). Returns `None` if any fixed variable's bound range
    /// does not include zero.
    pub fn branch_sos1_fix_zero(&self, fixed_zero: &[usize]) -> Option<Node> {
        let mut lo = self.branch_lo_bs.clone();
        let mut up = self.branch_up_bs.clone();
        for &v in fixed_zero {
            if lo[v] > 0.0 || up[v] < 0.0 {
                return None;
            }
            lo[v] = 0.0;
            up[v] = 0.0;
        }
        Some(Node {
            branch_lo_bs: lo,
            branch_up_bs: up,
            objective: f64::NEG_INFINITY,
            primal: self.primal.clone(),
            dual: self.dual.clone(),
            avg_frac: 0.0,
            pseudo_objective: self.objective,
            reliable: true,
            depth: self.depth + 1,
            branch_var: None,
            branch_direction: None,
            branch_frac: 0.0,
        })
    }
}

/// Partitions an SOS1 group into the "fix to zero" side and the "keep free"
/// side by cumulative primal magnitude (§4.1): the side with the smaller
/// total `|primal[j]|` is fixed to zero on one child, the complement on the
/// other, so each child strictly shrinks the parent's feasible region.
pub fn sos1_partition(group: &[usize], primal: &[f64]) -> (Vec<usize>, Vec<usize>) {
    let mut members: Vec<usize> = group.to_vec();
    members.sort_by(|&a, &b| primal[a].abs().partial_cmp(&primal[b].abs()).unwrap());
    let split = members.len() / 2;
    let (low_mag, high_mag) = members.split_at(split);
    (low_mag.to_vec(), high_mag.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{ConstraintSet, DenseVariableSet, ObjectiveFunction};

    fn toy_problem() -> Problem {
        Problem::new(
            ObjectiveFunction::Linear { l: vec![1.0, 1.0] },
            ConstraintSet::Null,
            DenseVariableSet::new(vec![0.0, 0.0], vec![1.0, 1.0], vec![0, 1], vec![]),
        )
    }

    #[test]
    fn root_node_copies_problem_bounds_and_is_unsolved() {
        let p = toy_problem();
        let root = Node::root(&p);
        assert_eq!(root.branch_lo_bs, vec![0.0, 0.0]);
        assert_eq!(root.branch_up_bs, vec![1.0, 1.0]);
        assert_eq!(root.objective, f64::NEG_INFINITY);
        assert_eq!(root.depth, 0);
        assert!(root.reliable);
    }

    #[test]
    fn down_child_tightens_upper_bound_by_floor() {
        let p = toy_problem();
        let mut root = Node::root(&p);
        root.branch_up_bs = vec![5.0, 5.0];
        let child = root.branch_child(0, 2.7, BranchDirection::Down).unwrap();
        assert_eq!(child.branch_up_bs[0], 2.0);
        assert_eq!(child.branch_lo_bs[0], root.branch_lo_bs[0]);
        assert_eq!(child.depth, 1);
    }

    #[test]
    fn up_child_tightens_lower_bound_by_ceil() {
        let p = toy_problem();
        let mut root = Node::root(&p);
        root.branch_up_bs = vec![5.0, 5.0];
        let child = root.branch_child(0, 2.3, BranchDirection::Up).unwrap();
        assert_eq!(child.branch_lo_bs[0], 3.0);
    }

    #[test]
    fn child_with_inconsistent_bounds_is_pruned_at_creation() {
        let p = toy_problem();
        let root = Node::root(&p); // bounds are [0, 1]
        // branching "up" at value 1.5 would require loBs >= 2, impossible given upBs = 1
        let child = root.branch_child(0, 1.5, BranchDirection::Up);
        assert!(child.is_none());
    }

    #[test]
    fn child_objective_is_at_least_parent_objective_when_monotone() {
        // Invariant 2 of §8: a feasible subset cannot do better than its
        // superset under minimization. The node itself doesn't enforce
        // this (the subsolver does), but pseudo_objective is seeded from
        // the parent's last solved value as a conservative placeholder.
        let p = toy_problem();
        let mut root = Node::root(&p);
        root.objective = 4.0;
        let child = root.branch_child(0, 0.5, BranchDirection::Down).unwrap();
        assert_eq!(child.pseudo_objective, 4.0);
    }

    #[test]
    fn sos1_partition_splits_by_magnitude() {
        let (low, high) = sos1_partition(&[0, 1, 2, 3], &[0.1, 0.9, 0.05, 0.8]);
        assert_eq!(low.len(), 2);
        assert_eq!(high.len(), 2);
        assert!(low.contains(&2));
        assert!(high.contains(&1));
    }

    #[test]
    fn sos1_fix_zero_requires_zero_in_range() {
        let p = toy_problem();
        let mut root = Node::root(&p);
        root.branch_lo_bs[0] = 1.0;
        root.branch_up_bs[0] = 1.0;
        assert!(root.branch_sos1_fix_zero(&[0]).is_none());
    }

    #[test]
    fn bounds_consistency_check() {
        let p = toy_problem();
        let mut n = Node::root(&p);
        assert!(n.is_bounds_consistent());
        n.branch_lo_bs[0] = 2.0;
        assert!(!n.is_bounds_consistent());
    }
}
