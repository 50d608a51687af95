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

//! # mipbb
//!
//! A parallel branch-and-bound engine for mixed-integer quadratic and linear
//! programs. Describe your problem as an [`ObjectiveFunction`] over a
//! [`VariableSet`] under a [`ConstraintSet`], hand it to an [`Engine`] along
//! with [`Settings`], and call [`Engine::solve`] to search for a global
//! optimum using every core available.
//!
//! ## Quick example
//!
//! ```
//! use mipbb::{ConstraintSet, DenseVariableSet, Engine, ObjectiveFunction, Problem, Settings, SubsolverKind};
//!
//! // maximize-as-minimize: minimize -(x0 + x1) subject to x0 + x1 <= 1, x0, x1 in {0, 1}
//! let problem = Problem::new(
//!     ObjectiveFunction::Linear { l: vec![-1.0, -1.0] },
//!     ConstraintSet::Linear { a: vec![1.0, 1.0], lo_bs: vec![f64::NEG_INFINITY], up_bs: vec![1.0] },
//!     DenseVariableSet::new(vec![0.0, 0.0], vec![1.0, 1.0], vec![0, 1], vec![]),
//! );
//!
//! let settings = Settings::default();
//! let mut engine = Engine::setup(problem, settings, SubsolverKind::Dense).unwrap();
//! let (status, incumbent) = engine.solve().unwrap();
//! println!("{}  objective = {:?}", status.to_json(), incumbent.map(|(o, _)| o));
//! ```
//!
//! ## Module map
//!
//! - [`problem`]: what defines a solvable problem (objective, constraints, variables).
//! - [`settings`]: run configuration, built with [`settings::SettingsBuilder`].
//! - [`node`]: one search-tree node and how its children are constructed.
//! - [`subsolver`]: the continuous-relaxation contract and the vendored dense backend.
//! - [`branch`]: picking which fractional variable to branch on.
//! - [`pseudocost`]: pseudo-cost tracking used by branching and queue priority.
//! - [`queue`]: the per-worker node fringe and its ranking function.
//! - [`cutoff`]: stopping conditions (gap, time, iteration budgets).
//! - [`engine`]: the parallel run loop, coordinator, and public [`Engine`] surface.
//! - [`serialize`]: the flat wire format used to persist a variable set, node, or status.
//! - [`status`]: the run's mutable, process-shared status.
//! - [`error`]: the error kinds an [`Engine`] can surface.

pub mod branch;
pub mod cutoff;
pub mod engine;
pub mod error;
pub mod node;
pub mod problem;
pub mod pseudocost;
pub mod queue;
pub mod serialize;
pub mod settings;
pub mod status;
pub mod subsolver;

pub use engine::Engine;
pub use error::{EngineError, NumericalError, ResourceError, SetupError, SubsolverError};
pub use node::{BranchDirection, Node};
pub use problem::{ConstraintSet, DenseVariableSet, GroupId, ObjectiveFunction, Problem, VariableSet};
pub use settings::{BranchRuleKind, PriorityRule, PseudoCostsInitialization, Settings, SettingsBuilder, Sos1BranchingPriority};
pub use status::{Description, Status};
pub use subsolver::{SolveOutcome, SolveStatus, SubWorkspace, SubsolverKind};
