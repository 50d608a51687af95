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

//! A small, fully-owned reference [`SubWorkspace`]: a quadratic-penalty
//! projected-gradient method over `lo ≤ x ≤ up`, `cnsLoBs ≤ Ax ≤ cnsUpBs`.
//! Convex because the problem's `Q` is required to be PSD, so the penalized
//! objective is convex for every penalty weight and the method converges to
//! the true constrained optimum as the weight grows.
//!
//! This is not a stand-in for OSQP/QPALM/GUROBI -- those are out of scope.
//! It exists so the engine has something real to solve relaxations against
//! in its own tests.

use log::{debug, warn};

use crate::error::{SetupError, SubsolverError};
use crate::problem::{ConstraintSet, ObjectiveFunction, Problem, VariableSet};
use crate::settings::Settings;

use super::{SolveOutcome, SolveStatus, SubWorkspace};

const MAX_OUTER_ITERATIONS: usize = 50;
const MAX_INNER_ITERATIONS: usize = 500;
const PENALTY_GROWTH: f64 = 3.0;
const INFEASIBILITY_MULTIPLE: f64 = 1e3;

pub struct DenseProjectedGradientWorkspace {
    n: usize,
    /// Row-major `n × n`, or `None` for a purely linear objective.
    q: Option<Vec<f64>>,
    l: Vec<f64>,
    lo_bs: Vec<f64>,
    up_bs: Vec<f64>,
    a: Vec<Vec<f64>>,
    cns_lo: Vec<f64>,
    cns_up: Vec<f64>,
    settings: Settings,
}

impl DenseProjectedGradientWorkspace {
    pub fn setup(problem: &Problem, settings: &Settings) -> Result<Self, SetupError> {
        problem.validate()?;
        let n = problem.num_variables();
        let (lo_bs, up_bs) = problem.variables.bounds();
        let (q, l) = match &problem.objective {
            ObjectiveFunction::Null => (None, vec![0.0; n]),
            ObjectiveFunction::Linear { l } => (None, l.clone()),
            ObjectiveFunction::Quadratic { q, l } => (Some(q.clone()), l.clone()),
        };
        if let Some(q) = &q {
            if q.len() != n * n {
                return Err(SetupError::BackendRejected {
                    reason: "quadratic term Q does not have n*n entries".into(),
                });
            }
        }
        let (a, cns_lo, cns_up) = match &problem.constraints {
            ConstraintSet::Null => (Vec::new(), Vec::new(), Vec::new()),
            ConstraintSet::Linear { a, lo_bs: clo, up_bs: cup } => {
                let rows: Vec<Vec<f64>> = a.chunks(n).map(|row| row.to_vec()).collect();
                (rows, clo.clone(), cup.clone())
            }
        };
        Ok(Self { n, q, l, lo_bs, up_bs, a, cns_lo, cns_up, settings: settings.clone() })
    }

    fn objective_value(&self, x: &[f64]) -> f64 {
        let mut v: f64 = self.l.iter().zip(x).map(|(li, xi)| li * xi).sum();
        if let Some(q) = &self.q {
            for i in 0..self.n {
                let mut qx_i = 0.0;
                for j in 0..self.n {
                    qx_i += q[i * self.n + j] * x[j];
                }
                v += 0.5 * x[i] * qx_i;
            }
        }
        v
    }

    fn objective_gradient(&self, x: &[f64]) -> Vec<f64> {
        let mut g = self.l.clone();
        if let Some(q) = &self.q {
            for i in 0..self.n {
                let mut qx_i = 0.0;
                for j in 0..self.n {
                    qx_i += q[i * self.n + j] * x[j];
                }
                g[i] += qx_i;
            }
        }
        g
    }

    /// Returns `(violation, duals)` at `x`: `violation` is the sum of each
    /// row's bound breach, `duals[i]` is a penalty-method multiplier
    /// estimate (positive when the lower bound binds, negative when the
    /// upper bound binds).
    fn constraint_violation(&self, x: &[f64], rho: f64) -> (f64, Vec<f64>) {
        let mut total = 0.0;
        let mut duals = vec![0.0; self.a.len()];
        for (i, row) in self.a.iter().enumerate() {
            let ax: f64 = row.iter().zip(x).map(|(a, xi)| a * xi).sum();
            let v_lo = (self.cns_lo[i] - ax).max(0.0);
            let v_up = (ax - self.cns_up[i]).max(0.0);
            total += v_lo + v_up;
            duals[i] = rho * v_lo - rho * v_up;
        }
        (total, duals)
    }

    fn penalized_gradient(&self, x: &[f64], rho: f64) -> Vec<f64> {
        let mut g = self.objective_gradient(x);
        for (i, row) in self.a.iter().enumerate() {
            let ax: f64 = row.iter().zip(x).map(|(a, xi)| a * xi).sum();
            let v_lo = (self.cns_lo[i] - ax).max(0.0);
            let v_up = (ax - self.cns_up[i]).max(0.0);
            if v_lo > 0.0 {
                for (gi, ai) in g.iter_mut().zip(row) {
                    *gi -= rho * v_lo * ai;
                }
            }
            if v_up > 0.0 {
                for (gi, ai) in g.iter_mut().zip(row) {
                    *gi += rho * v_up * ai;
                }
            }
        }
        g
    }

    fn project(&self, x: &mut [f64]) {
        for (xi, (&lo, &up)) in x.iter_mut().zip(self.lo_bs.iter().zip(self.up_bs.iter())) {
            *xi = xi.clamp(lo, up);
        }
    }
}

impl SubWorkspace for DenseProjectedGradientWorkspace {
    fn solve(&mut self) -> Result<SolveOutcome, SubsolverError> {
        let mut x: Vec<f64> =
            (0..self.n).map(|i| 0.0_f64.clamp(self.lo_bs[i], self.up_bs[i])).collect();
        let mut rho = 1.0;
        let (mut violation, mut duals) = (f64::INFINITY, vec![0.0; self.a.len()]);

        for _outer in 0..MAX_OUTER_ITERATIONS {
            for _inner in 0..MAX_INNER_ITERATIONS {
                let grad = self.penalized_gradient(&x, rho);
                let grad_norm: f64 = grad.iter().map(|g| g * g).sum::<f64>().sqrt();
                if !grad_norm.is_finite() || grad_norm < 1e-10 {
                    break;
                }
                let step = 0.5 / (1.0 + grad_norm);
                for (xi, gi) in x.iter_mut().zip(&grad) {
                    *xi -= step * gi;
                }
                self.project(&mut x);
            }
            let (v, d) = self.constraint_violation(&x, rho);
            violation = v;
            duals = d;
            if violation <= self.settings.primal_tolerance {
                break;
            }
            rho *= PENALTY_GROWTH;
        }

        if violation > self.settings.primal_tolerance * INFEASIBILITY_MULTIPLE {
            debug!("relaxation infeasible: residual violation {violation}");
            return Ok(SolveOutcome {
                status: SolveStatus::Infeasible,
                objective: f64::INFINITY,
                primal: x,
                dual: duals,
                reliable: true,
            });
        }

        let reliable = violation <= self.settings.primal_tolerance;
        if !reliable {
            warn!("relaxation converged with residual violation {violation} above tolerance");
        }
        Ok(SolveOutcome {
            status: SolveStatus::Optimal,
            objective: self.objective_value(&x),
            primal: x,
            dual: duals,
            reliable,
        })
    }

    fn update_bounds(&mut self, lo_bs: &[f64], up_bs: &[f64]) {
        self.lo_bs.copy_from_slice(lo_bs);
        self.up_bs.copy_from_slice(up_bs);
    }

    fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    fn insert_constraints(&mut self, a_rows: &[f64], lo_bs: &[f64], up_bs: &[f64]) {
        for (row, (&lo, &up)) in a_rows.chunks(self.n).zip(lo_bs.iter().zip(up_bs)) {
            self.a.push(row.to_vec());
            self.cns_lo.push(lo);
            self.cns_up.push(up);
        }
    }

    fn remove_constraints(&mut self, indices: &[usize]) {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        for &i in sorted.iter().rev() {
            self.a.remove(i);
            self.cns_lo.remove(i);
            self.cns_up.remove(i);
        }
    }

    fn permute_constraints(&mut self, permutation: &[usize]) {
        self.a = permutation.iter().map(|&i| self.a[i].clone()).collect();
        self.cns_lo = permutation.iter().map(|&i| self.cns_lo[i]).collect();
        self.cns_up = permutation.iter().map(|&i| self.cns_up[i]).collect();
    }

    fn append_problem(&mut self, extra: &Problem) -> bool {
        let extra_n = extra.num_variables();
        let (extra_lo, extra_up) = extra.variables.bounds();
        self.lo_bs.extend(extra_lo);
        self.up_bs.extend(extra_up);
        let (extra_q, extra_l) = match &extra.objective {
            ObjectiveFunction::Null => (None, vec![0.0; extra_n]),
            ObjectiveFunction::Linear { l } => (None, l.clone()),
            ObjectiveFunction::Quadratic { q, l } => (Some(q.clone()), l.clone()),
        };
        let new_n = self.n + extra_n;
        let mut merged_q = vec![0.0; new_n * new_n];
        if self.q.is_some() || extra_q.is_some() {
            if let Some(q) = &self.q {
                for i in 0..self.n {
                    for j in 0..self.n {
                        merged_q[i * new_n + j] = q[i * self.n + j];
                    }
                }
            }
            if let Some(q) = &extra_q {
                for i in 0..extra_n {
                    for j in 0..extra_n {
                        merged_q[(self.n + i) * new_n + (self.n + j)] = q[i * extra_n + j];
                    }
                }
            }
            self.q = Some(merged_q);
        }
        self.l.extend(extra_l);
        for row in self.a.iter_mut() {
            row.resize(new_n, 0.0);
        }
        if let ConstraintSet::Linear { a, lo_bs, up_bs } = &extra.constraints {
            for (row, (&lo, &up)) in a.chunks(extra_n).zip(lo_bs.iter().zip(up_bs)) {
                let mut full_row = vec![0.0; new_n];
                full_row[self.n..new_n].copy_from_slice(row);
                self.a.push(full_row);
                self.cns_lo.push(lo);
                self.cns_up.push(up);
            }
        }
        self.n = new_n;
        true
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::DenseVariableSet;

    fn settings_with_tolerance(tol: f64) -> Settings {
        let mut s = Settings::default();
        s.primal_tolerance = tol;
        s
    }

    #[test]
    fn unconstrained_box_qp_settles_at_the_interior_minimum() {
        // min x^2 on [-3, 3]: unconstrained optimum x=0 is inside the box.
        let problem = Problem::new(
            ObjectiveFunction::Quadratic { q: vec![2.0], l: vec![0.0] },
            ConstraintSet::Null,
            DenseVariableSet::continuous(vec![-3.0], vec![3.0]),
        );
        let mut ws = DenseProjectedGradientWorkspace::setup(&problem, &Settings::default()).unwrap();
        let outcome = ws.solve().unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert!(outcome.objective.abs() < 1e-3);
        assert!(outcome.primal[0].abs() < 1e-3);
    }

    #[test]
    fn box_only_linear_objective_pushes_to_the_favorable_corner() {
        // min -(x + y) on [0,1]^2: pushed to the upper corner, objective -2.
        let problem = Problem::new(
            ObjectiveFunction::Linear { l: vec![-1.0, -1.0] },
            ConstraintSet::Null,
            DenseVariableSet::continuous(vec![0.0, 0.0], vec![1.0, 1.0]),
        );
        let mut ws = DenseProjectedGradientWorkspace::setup(&problem, &Settings::default()).unwrap();
        let outcome = ws.solve().unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert!((outcome.objective - (-2.0)).abs() < 1e-2);
    }

    #[test]
    fn single_binding_constraint_is_respected_at_the_optimum() {
        // min x + y s.t. x + y >= 1.5, box [0,1]^2: optimum value is 1.5.
        let problem = Problem::new(
            ObjectiveFunction::Linear { l: vec![1.0, 1.0] },
            ConstraintSet::Linear { a: vec![1.0, 1.0], lo_bs: vec![1.5], up_bs: vec![f64::INFINITY] },
            DenseVariableSet::continuous(vec![0.0, 0.0], vec![1.0, 1.0]),
        );
        let mut ws =
            DenseProjectedGradientWorkspace::setup(&problem, &settings_with_tolerance(1e-6)).unwrap();
        let outcome = ws.solve().unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert!((outcome.objective - 1.5).abs() < 1e-2);
    }

    #[test]
    fn contradictory_constraints_are_reported_infeasible() {
        // x + y >= 3 and x + y <= 1 can never both hold inside [0,1]^2.
        let problem = Problem::new(
            ObjectiveFunction::Null,
            ConstraintSet::Linear {
                a: vec![1.0, 1.0, 1.0, 1.0],
                lo_bs: vec![3.0, f64::NEG_INFINITY],
                up_bs: vec![f64::INFINITY, 1.0],
            },
            DenseVariableSet::continuous(vec![0.0, 0.0], vec![1.0, 1.0]),
        );
        let mut ws = DenseProjectedGradientWorkspace::setup(&problem, &Settings::default()).unwrap();
        let outcome = ws.solve().unwrap();
        assert_eq!(outcome.status, SolveStatus::Infeasible);
    }

    #[test]
    fn update_bounds_is_applied_before_the_next_solve() {
        let problem = Problem::new(
            ObjectiveFunction::Linear { l: vec![-1.0] },
            ConstraintSet::Null,
            DenseVariableSet::continuous(vec![0.0], vec![1.0]),
        );
        let mut ws = DenseProjectedGradientWorkspace::setup(&problem, &Settings::default()).unwrap();
        ws.update_bounds(&[0.0], &[0.4]);
        let outcome = ws.solve().unwrap();
        assert!((outcome.primal[0] - 0.4).abs() < 1e-2);
    }

    #[test]
    fn insert_and_remove_constraints_round_trip() {
        let problem = Problem::new(
            ObjectiveFunction::Linear { l: vec![1.0] },
            ConstraintSet::Null,
            DenseVariableSet::continuous(vec![0.0], vec![1.0]),
        );
        let mut ws = DenseProjectedGradientWorkspace::setup(&problem, &Settings::default()).unwrap();
        ws.insert_constraints(&[1.0], &[0.2], &[0.2]);
        assert_eq!(ws.a.len(), 1);
        ws.remove_constraints(&[0]);
        assert!(ws.a.is_empty());
    }
}
