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

//! This module defines the "contract" of what defines a problem solvable by
//! the branch-and-bound engine: a quadratic or linear objective over a
//! variable set, under linear constraints, with a discrete index set and
//! SOS1 groups.
//!
//! A client willing to use this crate to solve their own MIQP/MILP only ever
//! needs to implement [`VariableSet`], [`ConstraintSet`] and
//! [`ObjectiveFunction`] (or use the [`DenseVariableSet`]/[`DenseConstraintSet`]
//! provided here) and assemble them into a [`Problem`]. The engine never
//! inspects anything beyond these traits.

use std::sync::Arc;

use crate::error::SetupError;

/// Identifies one SOS1 group. `0` is reserved to mean "ungrouped" at the
/// wire-format boundary (see `serialize`); in-memory this is represented as
/// `Option<GroupId>` instead.
pub type GroupId = usize;

/// A quadratic or linear objective, consumed only through its coefficients.
///
/// `Q` (when present) must be symmetric positive semi-definite; the engine
/// does not verify this beyond what the subsolver reports back as a
/// [`crate::error::NumericalError`] during `setup`.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectiveFunction {
    /// No objective: every feasible point has the same (zero) cost.
    Null,
    /// `Lᵀx`
    Linear { l: Vec<f64> },
    /// `½ xᵀQx + Lᵀx`, `q` given row-major and symmetric.
    Quadratic { q: Vec<f64>, l: Vec<f64> },
}

impl ObjectiveFunction {
    pub fn len(&self) -> usize {
        match self {
            ObjectiveFunction::Null => 0,
            ObjectiveFunction::Linear { l } => l.len(),
            ObjectiveFunction::Quadratic { l, .. } => l.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A linear constraint set `cnsLoBs ≤ Ax ≤ cnsUpBs`, or no constraints at all.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintSet {
    Null,
    Linear {
        /// Row-major `m × n` constraint matrix.
        a: Vec<f64>,
        lo_bs: Vec<f64>,
        up_bs: Vec<f64>,
    },
}

impl ConstraintSet {
    pub fn num_constraints(&self) -> usize {
        match self {
            ConstraintSet::Null => 0,
            ConstraintSet::Linear { lo_bs, .. } => lo_bs.len(),
        }
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if let ConstraintSet::Linear { lo_bs, up_bs, .. } = self {
            for (i, (&lo, &up)) in lo_bs.iter().zip(up_bs.iter()).enumerate() {
                if lo > up {
                    return Err(SetupError::InconsistentConstraintBounds { index: i, lo, up });
                }
            }
        }
        Ok(())
    }
}

/// The set of decision variables of a problem: bounds, which indices are
/// discrete, and their SOS1 grouping.
pub trait VariableSet {
    fn size(&self) -> usize;
    fn num_discrete(&self) -> usize {
        self.discrete_indices().len()
    }
    fn bounds(&self) -> (Vec<f64>, Vec<f64>);
    /// Indices (into `0..size()`) of the discrete variables, in ascending order.
    fn discrete_indices(&self) -> &[usize];
    /// SOS1 group id per discrete variable (same length and order as
    /// [`VariableSet::discrete_indices`]); `None` means ungrouped. Empty
    /// means "all ungrouped" per §6.1.
    fn sos1_groups(&self) -> &[Option<GroupId>];

    fn validate(&self) -> Result<(), SetupError> {
        let (lo, up) = self.bounds();
        if lo.len() != self.size() || up.len() != self.size() {
            return Err(SetupError::BackendRejected {
                reason: "variable bound vectors do not match variable set size".into(),
            });
        }
        for (i, (&l, &u)) in lo.iter().zip(up.iter()).enumerate() {
            if l > u {
                return Err(SetupError::InconsistentVariableBounds { index: i, lo: l, up: u });
            }
        }
        if !self.sos1_groups().is_empty() && self.sos1_groups().len() != self.discrete_indices().len() {
            return Err(SetupError::BackendRejected {
                reason: "sos1Groups length must match discreteIndices length, or be empty".into(),
            });
        }
        let mut group_sizes = fxhash::FxHashMap::default();
        for g in self.sos1_groups().iter().flatten() {
            *group_sizes.entry(*g).or_insert(0usize) += 1;
        }
        for (group, size) in group_sizes {
            if size < 2 {
                return Err(SetupError::DegenerateSos1Group { group, size });
            }
        }
        Ok(())
    }
}

/// A straightforward, dense, in-memory [`VariableSet`] suitable both for
/// tests and as a reference for how to wire a real problem-definition layer
/// into the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseVariableSet {
    lo_bs: Vec<f64>,
    up_bs: Vec<f64>,
    discrete_indices: Vec<usize>,
    sos1_groups: Vec<Option<GroupId>>,
}

impl DenseVariableSet {
    pub fn new(
        lo_bs: Vec<f64>,
        up_bs: Vec<f64>,
        discrete_indices: Vec<usize>,
        sos1_groups: Vec<Option<GroupId>>,
    ) -> Self {
        Self { lo_bs, up_bs, discrete_indices, sos1_groups }
    }

    pub fn continuous(lo_bs: Vec<f64>, up_bs: Vec<f64>) -> Self {
        Self { lo_bs, up_bs, discrete_indices: vec![], sos1_groups: vec![] }
    }

    pub fn update_bounds(&mut self, indices: Option<&[usize]>, lo_bs: &[f64], up_bs: &[f64]) {
        match indices {
            Some(idx) => {
                for (k, &i) in idx.iter().enumerate() {
                    self.lo_bs[i] = lo_bs[k];
                    self.up_bs[i] = up_bs[k];
                }
            }
            None => {
                self.lo_bs.copy_from_slice(lo_bs);
                self.up_bs.copy_from_slice(up_bs);
            }
        }
    }
}

impl VariableSet for DenseVariableSet {
    fn size(&self) -> usize {
        self.lo_bs.len()
    }

    fn bounds(&self) -> (Vec<f64>, Vec<f64>) {
        (self.lo_bs.clone(), self.up_bs.clone())
    }

    fn discrete_indices(&self) -> &[usize] {
        &self.discrete_indices
    }

    fn sos1_groups(&self) -> &[Option<GroupId>] {
        &self.sos1_groups
    }
}

/// `Problem = (objective, constraints, variables)`, owned by the caller; the
/// engine holds a read-only handle for the run's lifetime (§3).
#[derive(Clone)]
pub struct Problem {
    pub objective: ObjectiveFunction,
    pub constraints: ConstraintSet,
    pub variables: Arc<DenseVariableSet>,
}

impl Problem {
    pub fn new(
        objective: ObjectiveFunction,
        constraints: ConstraintSet,
        variables: DenseVariableSet,
    ) -> Self {
        Self { objective, constraints, variables: Arc::new(variables) }
    }

    pub fn num_variables(&self) -> usize {
        self.variables.size()
    }

    pub fn num_discrete(&self) -> usize {
        self.variables.num_discrete()
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        self.variables.validate()?;
        self.constraints.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_sos1_group_of_one_is_rejected() {
        let vars = DenseVariableSet::new(
            vec![0.0, 0.0],
            vec![1.0, 1.0],
            vec![0, 1],
            vec![Some(1), None],
        );
        assert!(matches!(vars.validate(), Err(SetupError::DegenerateSos1Group { group: 1, size: 1 })));
    }

    #[test]
    fn sos1_group_of_two_validates() {
        let vars = DenseVariableSet::new(
            vec![0.0, 0.0],
            vec![1.0, 1.0],
            vec![0, 1],
            vec![Some(1), Some(1)],
        );
        assert!(vars.validate().is_ok());
    }

    #[test]
    fn inconsistent_bounds_are_rejected() {
        let vars = DenseVariableSet::continuous(vec![2.0], vec![1.0]);
        assert!(matches!(
            vars.validate(),
            Err(SetupError::InconsistentVariableBounds { index: 0, .. })
        ));
    }

    #[test]
    fn constraint_bounds_are_validated() {
        let cns = ConstraintSet::Linear {
            a: vec![1.0, 1.0],
            lo_bs: vec![3.0],
            up_bs: vec![1.0],
        };
        assert!(matches!(cns.validate(), Err(SetupError::InconsistentConstraintBounds { index: 0, .. })));
    }
}
