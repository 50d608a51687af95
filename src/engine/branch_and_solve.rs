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

//! The per-node expansion step (§4.5): load bounds, solve the relaxation,
//! fathom, check integer/SOS1 feasibility, and -- if neither -- branch.
//!
//! A non-fatal [`SubsolverError`] is recovered here by fathoming the node
//! and logging a warning; it never reaches [`crate::engine::Engine::solve`].

use log::{info, warn};

use crate::branch::rules::{top_k_by_fractionality, MostFractional, PseudoCostBranching};
use crate::branch::{BranchRule, FractionalCandidate};
use crate::node::{BranchDirection, Node};
use crate::problem::Problem;
use crate::pseudocost::PseudoCosts;
use crate::settings::{BranchRuleKind, PseudoCostsInitialization, Settings, Sos1BranchingPriority};
use crate::subsolver::{SolveStatus, SubWorkspace};

/// What became of a node after one expansion.
#[derive(Debug)]
pub enum ExpandOutcome {
    /// Pruned: its relaxation bound cannot beat the current incumbent, or
    /// the subsolver failed and the node can no longer be trusted.
    Fathomed,
    Infeasible,
    IntegerFeasible { objective: f64, primal: Vec<f64> },
    Branched(Vec<Node>),
}

/// One deferred pseudo-cost observation (§4.4), returned alongside
/// [`ExpandOutcome`] so `crate::engine::runloop` can broadcast it to peers
/// without duplicating the bookkeeping that produced it.
#[derive(Debug, Clone)]
pub struct PseudoCostObservation {
    pub idx: usize,
    pub dir: BranchDirection,
    pub frac: f64,
    pub parent_objective: f64,
    pub child_objective: f64,
}

/// Expands `node` against `workspace`, crediting `pseudo_costs` with the
/// observation the branch that created `node` predicted, then either
/// fathoming it, declaring it integer-feasible, or producing its children.
/// The second return value is `Some` iff `node` carried a branch decision to
/// credit -- `None` for the root and for SOS1-branch children.
pub fn expand(
    node: Node,
    workspace: &mut dyn SubWorkspace,
    problem: &Problem,
    settings: &Settings,
    pseudo_costs: &mut PseudoCosts,
    incumbent_objective: f64,
) -> (ExpandOutcome, Option<PseudoCostObservation>) {
    workspace.update_bounds(&node.branch_lo_bs, &node.branch_up_bs);
    let discrete = problem.variables.discrete_indices();

    let outcome = match workspace.solve() {
        Ok(o) => o,
        Err(e) => {
            warn!("subsolver recovery at depth {}: {e}", node.depth);
            return (ExpandOutcome::Fathomed, None);
        }
    };

    let mut observation = None;
    if let (Some(var), Some(dir)) = (node.branch_var, node.branch_direction) {
        if let Some(pos) = discrete.iter().position(|&v| v == var) {
            let observed_objective =
                if outcome.status == SolveStatus::Infeasible { f64::INFINITY } else { outcome.objective };
            pseudo_costs.update(pos, dir, node.branch_frac, node.pseudo_objective, observed_objective);
            observation = Some(PseudoCostObservation {
                idx: pos,
                dir,
                frac: node.branch_frac,
                parent_objective: node.pseudo_objective,
                child_objective: observed_objective,
            });
        }
    }

    if outcome.status == SolveStatus::Infeasible {
        return (ExpandOutcome::Infeasible, observation);
    }
    // A relaxation that didn't converge to a certified bound (`reliable ==
    // false`) cannot be used to prune: its reported objective is only a
    // heuristic estimate, and the node's true child optimum could still beat
    // the incumbent or the cutoff (§4.5 "Reliability").
    if outcome.reliable
        && (outcome.objective >= incumbent_objective - settings.absolute_gap_tolerance
            || outcome.objective >= settings.objective_cutoff)
    {
        return (ExpandOutcome::Fathomed, observation);
    }

    let mut solved = node;
    solved.objective = outcome.objective;
    solved.primal = outcome.primal;
    solved.dual = outcome.dual;
    solved.reliable = outcome.reliable;

    if solved.depth == 0 && settings.pseudo_costs_initialization == PseudoCostsInitialization::StrongBranching {
        strong_branching_root_sweep(&solved, discrete, workspace, settings, pseudo_costs);
    }

    let sos1 = problem.variables.sos1_groups();
    if !sos1.is_empty() {
        if let Some(violated_group) =
            find_sos1_violation(discrete, sos1, &solved.primal, settings.integer_tolerance, settings.sos1_branching_priority)
        {
            let (fix_a, fix_b) = crate::node::sos1_partition(&violated_group, &solved.primal);
            let mut children = Vec::new();
            if let Some(c) = solved.branch_sos1_fix_zero(&fix_a) {
                children.push(rescore_child(c, &solved, 0.0, settings));
            }
            if let Some(c) = solved.branch_sos1_fix_zero(&fix_b) {
                children.push(rescore_child(c, &solved, 0.0, settings));
            }
            return (ExpandOutcome::Branched(children), observation);
        }
    }

    let candidates = fractional_candidates(discrete, &solved.primal, settings.integer_tolerance, pseudo_costs);
    solved.avg_frac = average_fractionality(discrete, &solved.primal);

    if candidates.is_empty() {
        info!("integer-feasible node at depth {} with objective {}", solved.depth, solved.objective);
        return (ExpandOutcome::IntegerFeasible { objective: solved.objective, primal: solved.primal }, observation);
    }

    let chosen_var = select_branch_variable(&solved, &candidates, discrete, workspace, settings, pseudo_costs);
    let value = solved.primal[chosen_var];
    let frac_down = value - value.floor();
    let pos = discrete.iter().position(|&v| v == chosen_var).expect("chosen_var is discrete");
    let pseudo_cost_estimate = pseudo_costs.estimate(pos, frac_down, 1.0 - frac_down);

    let mut children = Vec::new();
    if let Some(c) = solved.branch_child(chosen_var, value, BranchDirection::Down) {
        children.push(rescore_child(c, &solved, pseudo_cost_estimate, settings));
    }
    if let Some(c) = solved.branch_child(chosen_var, value, BranchDirection::Up) {
        children.push(rescore_child(c, &solved, pseudo_cost_estimate, settings));
    }
    (ExpandOutcome::Branched(children), observation)
}

/// Computes `child`'s priority-queue key (§4.3) using `parent`'s certified
/// bound and fractionality as the best information available before `child`
/// itself is solved, and stores it in `child.pseudo_objective` -- the key
/// `crate::queue::simple::SimpleNodeQueue` orders by. `parent` is assumed
/// already solved (`parent.objective`/`parent.avg_frac` are current).
fn rescore_child(mut child: Node, parent: &Node, pseudo_cost_estimate: f64, settings: &Settings) -> Node {
    let mut scoring_basis = parent.clone();
    scoring_basis.depth = child.depth;
    child.pseudo_objective =
        crate::queue::ranking::score(&scoring_basis, settings.priority_rule, pseudo_cost_estimate, settings.pseudo_cost_queue_weight);
    child
}

fn average_fractionality(discrete: &[usize], primal: &[f64]) -> f64 {
    if discrete.is_empty() {
        return 0.0;
    }
    let total: f64 = discrete
        .iter()
        .map(|&v| {
            let frac_down = primal[v] - primal[v].floor();
            frac_down.min(1.0 - frac_down)
        })
        .sum();
    total / discrete.len() as f64
}

fn fractional_candidates(
    discrete: &[usize],
    primal: &[f64],
    integer_tolerance: f64,
    pseudo_costs: &PseudoCosts,
) -> Vec<FractionalCandidate> {
    discrete
        .iter()
        .enumerate()
        .filter_map(|(pos, &var)| {
            let value = primal[var];
            let frac_down = value - value.floor();
            let frac_up = 1.0 - frac_down;
            if frac_down.min(frac_up) <= integer_tolerance {
                return None;
            }
            Some(FractionalCandidate {
                var,
                value,
                frac_down,
                frac_up,
                pseudo_cost_down: pseudo_costs.cost(pos, BranchDirection::Down),
                pseudo_cost_up: pseudo_costs.cost(pos, BranchDirection::Up),
            })
        })
        .collect()
}

/// Returns the members of a violated SOS1 group, if any (§4.1: a group is
/// violated once two or more of its members are simultaneously away from
/// zero). `priority` picks among multiple simultaneously-violated groups:
/// `firstViolated` takes the smallest group id, `mostViolated` takes the
/// group whose members are furthest from zero in total.
fn find_sos1_violation(
    discrete: &[usize],
    sos1_groups: &[Option<crate::problem::GroupId>],
    primal: &[f64],
    integer_tolerance: f64,
    priority: Sos1BranchingPriority,
) -> Option<Vec<usize>> {
    let mut by_group: fxhash::FxHashMap<crate::problem::GroupId, Vec<usize>> = Default::default();
    for (pos, group) in sos1_groups.iter().enumerate() {
        if let Some(g) = group {
            let var = discrete[pos];
            if primal[var].abs() > integer_tolerance {
                by_group.entry(*g).or_default().push(var);
            }
        }
    }
    let mut violated: Vec<_> = by_group.into_iter().filter(|(_, members)| members.len() > 1).collect();
    match priority {
        Sos1BranchingPriority::FirstViolated => {
            violated.sort_by_key(|(g, _)| *g);
        }
        Sos1BranchingPriority::MostViolated => {
            violated.sort_by(|(_, a), (_, b)| {
                let total = |members: &[usize]| members.iter().map(|&v| primal[v].abs()).sum::<f64>();
                total(b).partial_cmp(&total(a)).expect("primal values are finite")
            });
        }
    }
    violated.into_iter().next().map(|(_, members)| members)
}

fn select_branch_variable(
    solved: &Node,
    candidates: &[FractionalCandidate],
    discrete: &[usize],
    workspace: &mut dyn SubWorkspace,
    settings: &Settings,
    pseudo_costs: &PseudoCosts,
) -> usize {
    match settings.branch_rule {
        BranchRuleKind::MostFractional => MostFractional.select(candidates).expect("non-empty candidates"),
        BranchRuleKind::PseudoCost => {
            let reliable = settings.pseudo_costs_initialization != PseudoCostsInitialization::Reliable
                || candidates.iter().all(|c| {
                    let pos = discrete.iter().position(|&v| v == c.var).expect("candidate is discrete");
                    pseudo_costs.is_reliable(pos, settings.reliability_threshold)
                });
            if reliable {
                PseudoCostBranching::default().select(candidates).expect("non-empty candidates")
            } else {
                MostFractional.select(candidates).expect("non-empty candidates")
            }
        }
        BranchRuleKind::StrongBranching => {
            strong_branch(solved, candidates, workspace, settings.strong_branching_candidates)
        }
    }
}

/// Tentatively solves both children of each of the `k` most fractional
/// candidates and picks the one with the largest actual product-rule score
/// -- the distinguishing step of real strong branching (§4.4), as opposed to
/// [`crate::branch::rules::StrongBranchingShortlist`]'s pseudo-cost-only
/// approximation of it.
fn strong_branch(
    solved: &Node,
    candidates: &[FractionalCandidate],
    workspace: &mut dyn SubWorkspace,
    k: usize,
) -> usize {
    let shortlist = top_k_by_fractionality(candidates, k);
    let mut best_var = shortlist[0].var;
    let mut best_score = f64::NEG_INFINITY;
    for candidate in &shortlist {
        let down_objective = trial_solve(solved, candidate.var, candidate.value, BranchDirection::Down, workspace);
        let up_objective = trial_solve(solved, candidate.var, candidate.value, BranchDirection::Up, workspace);
        let score = (down_objective - solved.objective).max(1e-6) * (up_objective - solved.objective).max(1e-6);
        if score > best_score {
            best_score = score;
            best_var = candidate.var;
        }
    }
    workspace.update_bounds(&solved.branch_lo_bs, &solved.branch_up_bs);
    best_var
}

/// Seeds `pseudo_costs` with one real strong-branching sweep over the root's
/// most fractional candidates (§4.4's `strongBranching` initialization),
/// rather than leaving every variable at its unobserved default until it
/// happens to be branched on. The variable it solves for is not used to pick
/// the root's actual branch -- `select_branch_variable` still runs its own
/// rule afterwards, now backed by real observations instead of the
/// unobserved default.
fn strong_branching_root_sweep(
    solved: &Node,
    discrete: &[usize],
    workspace: &mut dyn SubWorkspace,
    settings: &Settings,
    pseudo_costs: &mut PseudoCosts,
) {
    let candidates = fractional_candidates(discrete, &solved.primal, settings.integer_tolerance, pseudo_costs);
    if candidates.is_empty() {
        return;
    }
    let shortlist = top_k_by_fractionality(&candidates, settings.strong_branching_candidates);
    for candidate in &shortlist {
        let pos = discrete.iter().position(|&v| v == candidate.var).expect("candidate is discrete");
        let down_objective = trial_solve(solved, candidate.var, candidate.value, BranchDirection::Down, workspace);
        if down_objective.is_finite() {
            pseudo_costs.update(pos, BranchDirection::Down, candidate.frac_down, solved.objective, down_objective);
        }
        let up_objective = trial_solve(solved, candidate.var, candidate.value, BranchDirection::Up, workspace);
        if up_objective.is_finite() {
            pseudo_costs.update(pos, BranchDirection::Up, candidate.frac_up, solved.objective, up_objective);
        }
    }
    workspace.update_bounds(&solved.branch_lo_bs, &solved.branch_up_bs);
}

fn trial_solve(
    parent: &Node,
    var: usize,
    value: f64,
    dir: BranchDirection,
    workspace: &mut dyn SubWorkspace,
) -> f64 {
    match parent.branch_child(var, value, dir) {
        None => f64::INFINITY,
        Some(child) => {
            workspace.update_bounds(&child.branch_lo_bs, &child.branch_up_bs);
            match workspace.solve() {
                Ok(o) if o.status == SolveStatus::Optimal => o.objective,
                _ => f64::INFINITY,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{ConstraintSet, DenseVariableSet, ObjectiveFunction};
    use crate::settings::SettingsBuilder;
    use crate::subsolver::dense::DenseProjectedGradientWorkspace;

    fn knapsack_like() -> Problem {
        Problem::new(
            ObjectiveFunction::Linear { l: vec![1.0, 1.0] },
            ConstraintSet::Linear {
                a: vec![1.0, 1.0],
                lo_bs: vec![1.5],
                up_bs: vec![f64::INFINITY],
            },
            DenseVariableSet::new(vec![0.0, 0.0], vec![1.0, 1.0], vec![0, 1], vec![]),
        )
    }

    #[test]
    fn fractional_relaxation_branches_instead_of_fathoming() {
        let problem = knapsack_like();
        let settings = Settings::default();
        let mut workspace = DenseProjectedGradientWorkspace::setup(&problem, &settings).unwrap();
        let mut pseudo_costs = PseudoCosts::new(problem.num_discrete(), settings.pseudo_costs_initialization);
        let root = Node::root(&problem);
        let (outcome, _) = expand(root, &mut workspace, &problem, &settings, &mut pseudo_costs, f64::INFINITY);
        assert!(matches!(outcome, ExpandOutcome::Branched(_)));
    }

    #[test]
    fn already_integer_feasible_root_is_reported_feasible() {
        let problem = Problem::new(
            ObjectiveFunction::Quadratic { q: vec![2.0], l: vec![0.0] },
            ConstraintSet::Null,
            DenseVariableSet::new(vec![-3.0], vec![3.0], vec![0], vec![]),
        );
        let settings = Settings::default();
        let mut workspace = DenseProjectedGradientWorkspace::setup(&problem, &settings).unwrap();
        let mut pseudo_costs = PseudoCosts::new(problem.num_discrete(), settings.pseudo_costs_initialization);
        let root = Node::root(&problem);
        let (outcome, _) = expand(root, &mut workspace, &problem, &settings, &mut pseudo_costs, f64::INFINITY);
        assert!(matches!(outcome, ExpandOutcome::IntegerFeasible { objective, .. } if objective.abs() < 1e-3));
    }

    #[test]
    fn contradictory_constraints_are_fathomed_as_infeasible() {
        let problem = Problem::new(
            ObjectiveFunction::Null,
            ConstraintSet::Linear {
                a: vec![1.0, 1.0, 1.0, 1.0],
                lo_bs: vec![3.0, f64::NEG_INFINITY],
                up_bs: vec![f64::INFINITY, 1.0],
            },
            DenseVariableSet::new(vec![0.0, 0.0], vec![1.0, 1.0], vec![0, 1], vec![]),
        );
        let settings = Settings::default();
        let mut workspace = DenseProjectedGradientWorkspace::setup(&problem, &settings).unwrap();
        let mut pseudo_costs = PseudoCosts::new(problem.num_discrete(), settings.pseudo_costs_initialization);
        let root = Node::root(&problem);
        let (outcome, _) = expand(root, &mut workspace, &problem, &settings, &mut pseudo_costs, f64::INFINITY);
        assert!(matches!(outcome, ExpandOutcome::Infeasible));
    }

    #[test]
    fn a_relaxation_worse_than_the_incumbent_is_fathomed() {
        let problem = knapsack_like();
        let settings = Settings::default();
        let mut workspace = DenseProjectedGradientWorkspace::setup(&problem, &settings).unwrap();
        let mut pseudo_costs = PseudoCosts::new(problem.num_discrete(), settings.pseudo_costs_initialization);
        let root = Node::root(&problem);
        // the relaxation bound is ~1.5; an incumbent of 1.0 already beats it
        let (outcome, _) = expand(root, &mut workspace, &problem, &settings, &mut pseudo_costs, 1.0);
        assert!(matches!(outcome, ExpandOutcome::Fathomed));
    }

    #[test]
    fn a_relaxation_at_or_above_the_objective_cutoff_is_fathomed() {
        let problem = knapsack_like();
        let settings = SettingsBuilder::default().objective_cutoff(1.0).build().unwrap();
        let mut workspace = DenseProjectedGradientWorkspace::setup(&problem, &settings).unwrap();
        let mut pseudo_costs = PseudoCosts::new(problem.num_discrete(), settings.pseudo_costs_initialization);
        let root = Node::root(&problem);
        // the relaxation bound is ~1.5, at or above a cutoff of 1.0
        let (outcome, _) = expand(root, &mut workspace, &problem, &settings, &mut pseudo_costs, f64::INFINITY);
        assert!(matches!(outcome, ExpandOutcome::Fathomed));
    }

    /// A mock [`SubWorkspace`] that always reports the same outcome,
    /// regardless of bounds or settings, so tests can exercise `expand`'s
    /// handling of `reliable == false` without depending on
    /// `DenseProjectedGradientWorkspace`'s actual convergence behavior.
    struct StubWorkspace {
        outcome_objective: f64,
        primal: Vec<f64>,
        reliable: bool,
        settings: Settings,
    }

    impl crate::subsolver::SubWorkspace for StubWorkspace {
        fn solve(&mut self) -> Result<crate::subsolver::SolveOutcome, crate::error::SubsolverError> {
            Ok(crate::subsolver::SolveOutcome {
                status: SolveStatus::Optimal,
                objective: self.outcome_objective,
                primal: self.primal.clone(),
                dual: vec![],
                reliable: self.reliable,
            })
        }
        fn update_bounds(&mut self, _lo_bs: &[f64], _up_bs: &[f64]) {}
        fn update_settings(&mut self, settings: Settings) {
            self.settings = settings;
        }
        fn insert_constraints(&mut self, _a: &[f64], _lo_bs: &[f64], _up_bs: &[f64]) {}
        fn remove_constraints(&mut self, _indices: &[usize]) {}
        fn permute_constraints(&mut self, _permutation: &[usize]) {}
        fn append_problem(&mut self, _extra: &Problem) -> bool {
            true
        }
        fn settings(&self) -> &Settings {
            &self.settings
        }
    }

    #[test]
    fn an_unreliable_relaxation_is_not_fathomed_even_past_the_incumbent_and_cutoff() {
        let problem = knapsack_like();
        let settings = SettingsBuilder::default().objective_cutoff(10.0).build().unwrap();
        let mut workspace = StubWorkspace {
            outcome_objective: 100.0,
            primal: vec![0.5, 0.5],
            reliable: false,
            settings: settings.clone(),
        };
        let mut pseudo_costs = PseudoCosts::new(problem.num_discrete(), settings.pseudo_costs_initialization);
        let root = Node::root(&problem);
        // outcome.objective (100.0) beats both the incumbent (50.0) and the
        // cutoff (10.0), but reliable == false must block fathoming either way
        let (outcome, _) = expand(root, &mut workspace, &problem, &settings, &mut pseudo_costs, 50.0);
        assert!(matches!(outcome, ExpandOutcome::Branched(_)), "got {outcome:?}");
    }

    #[test]
    fn first_violated_priority_picks_the_smallest_group_id() {
        let discrete = vec![0, 1, 2, 3];
        let sos1_groups = vec![Some(2), Some(2), Some(1), Some(1)];
        let primal = vec![0.1, 0.2, 0.9, 0.8];
        let violated =
            find_sos1_violation(&discrete, &sos1_groups, &primal, 1e-6, Sos1BranchingPriority::FirstViolated).unwrap();
        assert!(violated.contains(&2) && violated.contains(&3));
    }

    #[test]
    fn most_violated_priority_picks_the_group_with_larger_total_magnitude() {
        let discrete = vec![0, 1, 2, 3];
        let sos1_groups = vec![Some(1), Some(1), Some(2), Some(2)];
        let primal = vec![0.9, 0.8, 0.3, 0.4];
        let violated =
            find_sos1_violation(&discrete, &sos1_groups, &primal, 1e-6, Sos1BranchingPriority::MostViolated).unwrap();
        assert!(violated.contains(&0) && violated.contains(&1));
    }

    #[test]
    fn strong_branching_initialization_seeds_pseudo_costs_at_the_root() {
        let problem = knapsack_like();
        let settings = SettingsBuilder::default()
            .branch_rule(BranchRuleKind::StrongBranching)
            .pseudo_costs_initialization(PseudoCostsInitialization::StrongBranching)
            .build()
            .unwrap();
        let mut workspace = DenseProjectedGradientWorkspace::setup(&problem, &settings).unwrap();
        let mut pseudo_costs = PseudoCosts::new(problem.num_discrete(), settings.pseudo_costs_initialization);
        let root = Node::root(&problem);
        let _ = expand(root, &mut workspace, &problem, &settings, &mut pseudo_costs, f64::INFINITY);
        assert!(pseudo_costs.observations(0, BranchDirection::Down) > 0 || pseudo_costs.observations(0, BranchDirection::Up) > 0);
    }

    #[test]
    fn sos1_violation_branches_before_checking_fractionality() {
        let problem = Problem::new(
            ObjectiveFunction::Linear { l: vec![-1.0, -1.0] },
            ConstraintSet::Null,
            DenseVariableSet::new(vec![0.0, 0.0], vec![1.0, 1.0], vec![0, 1], vec![Some(1), Some(1)]),
        );
        let settings = SettingsBuilder::default().build().unwrap();
        let mut workspace = DenseProjectedGradientWorkspace::setup(&problem, &settings).unwrap();
        let mut pseudo_costs = PseudoCosts::new(problem.num_discrete(), settings.pseudo_costs_initialization);
        let root = Node::root(&problem);
        let (outcome, _) = expand(root, &mut workspace, &problem, &settings, &mut pseudo_costs, f64::INFINITY);
        match outcome {
            ExpandOutcome::Branched(children) => {
                assert_eq!(children.len(), 2);
                for child in &children {
                    assert!(child.branch_lo_bs.iter().any(|&b| b == 0.0) || child.branch_up_bs.iter().any(|&b| b == 0.0));
                }
            }
            other => panic!("expected SOS1 branching, got {other:?}"),
        }
    }

    #[test]
    fn solving_a_branched_child_yields_a_pseudo_cost_observation() {
        let problem = knapsack_like();
        let settings = Settings::default();
        let mut workspace = DenseProjectedGradientWorkspace::setup(&problem, &settings).unwrap();
        let mut pseudo_costs = PseudoCosts::new(problem.num_discrete(), settings.pseudo_costs_initialization);
        let root = Node::root(&problem);
        let (outcome, observation) =
            expand(root, &mut workspace, &problem, &settings, &mut pseudo_costs, f64::INFINITY);
        assert!(observation.is_none(), "the root carries no branch decision to credit");
        let children = match outcome {
            ExpandOutcome::Branched(children) => children,
            other => panic!("expected the fractional root to branch, got {other:?}"),
        };
        let child = children.into_iter().next().unwrap();
        let (_, observation) =
            expand(child, &mut workspace, &problem, &settings, &mut pseudo_costs, f64::INFINITY);
        assert!(observation.is_some(), "a branched child must credit the variable it was split on");
    }

    #[test]
    fn depth_first_priority_scores_children_by_depth_not_by_bound() {
        let problem = knapsack_like();
        let settings = SettingsBuilder::default().priority_rule(crate::settings::PriorityRule::DepthFirst).build().unwrap();
        let mut workspace = DenseProjectedGradientWorkspace::setup(&problem, &settings).unwrap();
        let mut pseudo_costs = PseudoCosts::new(problem.num_discrete(), settings.pseudo_costs_initialization);
        let root = Node::root(&problem);
        let (outcome, _) = expand(root, &mut workspace, &problem, &settings, &mut pseudo_costs, f64::INFINITY);
        let children = match outcome {
            ExpandOutcome::Branched(children) => children,
            other => panic!("expected the fractional root to branch, got {other:?}"),
        };
        for child in &children {
            assert_eq!(child.pseudo_objective, -(child.depth as f64), "depth-first scoring ignores the relaxation bound entirely");
        }
    }

    #[test]
    fn best_bound_priority_scores_children_from_the_parent_bound() {
        let problem = knapsack_like();
        let settings = SettingsBuilder::default().priority_rule(crate::settings::PriorityRule::BestBound).build().unwrap();
        let mut workspace = DenseProjectedGradientWorkspace::setup(&problem, &settings).unwrap();
        let mut pseudo_costs = PseudoCosts::new(problem.num_discrete(), settings.pseudo_costs_initialization);
        let root = Node::root(&problem);
        let (outcome, _) = expand(root, &mut workspace, &problem, &settings, &mut pseudo_costs, f64::INFINITY);
        let children = match outcome {
            ExpandOutcome::Branched(children) => children,
            other => panic!("expected the fractional root to branch, got {other:?}"),
        };
        for child in &children {
            assert!(child.pseudo_objective.is_finite(), "best-bound scoring should carry the parent's certified bound");
        }
    }
}
