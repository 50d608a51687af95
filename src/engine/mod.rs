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

//! The engine's public surface (§6.3): `setup`, `solve`, and the inspection
//! accessors a caller polls mid-run or reads once the run completes.
//!
//! `Engine::solve` spawns one OS thread per worker (`std::thread::scope`),
//! each owning its own `SubWorkspace` and `NodeQueue` for the run's lifetime.
//! Only the root problem, the settings, and the `Coordinator`'s `Shared`
//! state cross thread boundaries.

pub mod branch_and_solve;
pub mod coordinator;
pub mod runloop;

use std::sync::Arc;

use log::info;

use crate::cutoff::{Cutoff, Cutoffs, GapBudget, TimeBudget};
use crate::error::EngineError;
use crate::node::Node;
use crate::problem::Problem;
use crate::pseudocost::PseudoCosts;
use crate::queue::simple::SimpleNodeQueue;
use crate::settings::Settings;
use crate::status::Status;
use crate::subsolver::SubsolverKind;

use coordinator::{Coordinator, Shared};

/// Watches `Shared::nodes_explored` against `settings.iteration_limit`
/// instead of keeping a second counter the run loop would have to remember
/// to increment alongside `Shared::record_node_explored`.
struct IterationCutoff {
    shared: Arc<Shared>,
    limit: u64,
}

impl Cutoff for IterationCutoff {
    fn must_stop(&self) -> bool {
        self.shared.nodes_explored() >= self.limit
    }
}

/// Owns a validated problem and settings, and drives the parallel run.
/// Constructed once per problem instance via [`Engine::setup`]; `solve` may
/// be called more than once, each call replacing the coordinator and
/// starting a fresh search from the root.
pub struct Engine {
    problem: Problem,
    settings: Settings,
    subsolver_kind: SubsolverKind,
    coordinator: Coordinator,
}

impl Engine {
    /// Validates `problem` and builds the initial shared run state, without
    /// starting any worker. Fails fast on a malformed problem rather than
    /// letting a worker discover it mid-run (§7).
    pub fn setup(problem: Problem, settings: Settings, subsolver_kind: SubsolverKind) -> Result<Self, EngineError> {
        problem.validate()?;
        let (coordinator, _channels) = Coordinator::new(settings.num_processes.max(1));
        Ok(Self { problem, settings, subsolver_kind, coordinator })
    }

    /// Runs the branch-and-bound search to completion (or until a cutoff
    /// fires), blocking the caller. Spawns `settings.num_processes` workers,
    /// each with its own `SubWorkspace` and fringe (§5); returns the final
    /// status and incumbent.
    pub fn solve(&mut self) -> Result<(Status, Option<(f64, Vec<f64>)>), EngineError> {
        let num_workers = self.settings.num_processes.max(1);
        let (coordinator, channels) = Coordinator::new(num_workers);
        self.coordinator = coordinator;

        let gap = GapBudget::new(
            self.coordinator.shared.status_handle(),
            self.settings.absolute_gap_tolerance,
            self.settings.relative_gap_tolerance,
        );
        let mut cutoffs = Cutoffs::new(gap);
        if self.settings.time_limit.is_finite() {
            cutoffs.push(Box::new(TimeBudget::new(std::time::Duration::from_secs_f64(self.settings.time_limit))));
        }
        if self.settings.iteration_limit != usize::MAX {
            cutoffs.push(Box::new(IterationCutoff {
                shared: Arc::clone(&self.coordinator.shared),
                limit: self.settings.iteration_limit as u64,
            }));
        }

        let started = std::time::Instant::now();
        let root = Node::root(&self.problem);
        info!("starting a {num_workers}-worker search over {} variables ({} discrete)", self.problem.num_variables(), self.problem.num_discrete());

        std::thread::scope(|scope| {
            let mut seed = Some(root);
            for channel in channels {
                let problem = &self.problem;
                let settings = &self.settings;
                let shared = Arc::clone(&self.coordinator.shared);
                let cutoffs = &cutoffs;
                let kind = self.subsolver_kind;
                let id = channel.id;
                let node_seed = seed.take();
                scope.spawn(move || {
                    let workspace = crate::subsolver::setup(kind, problem, settings)
                        .unwrap_or_else(|e| panic!("worker {id} failed to set up its subsolver: {e}"));
                    let queue: Box<dyn crate::queue::NodeQueue> = Box::new(SimpleNodeQueue::new());
                    let pseudo_costs = PseudoCosts::new(problem.num_discrete(), settings.pseudo_costs_initialization);
                    runloop::run_worker(id, problem, settings, workspace, queue, pseudo_costs, channel, shared, cutoffs, node_seed);
                });
            }
            self.coordinator.start();
        });

        let mut status = self.coordinator.shared.snapshot();
        status.elapsed(started.elapsed());
        let incumbent = self.coordinator.shared.incumbent();
        info!("search finished: {:?} after {} node(s)", status.description, status.nodes_explored);
        Ok((status, incumbent))
    }

    /// A snapshot of the run's current status; meaningful mid-run only if
    /// called from another thread while `solve` is still executing, since
    /// `solve` itself blocks until completion.
    pub fn status(&self) -> Status {
        self.coordinator.shared.snapshot()
    }

    /// Prints the current status as one line of JSON (§6.3's `printStatus`).
    pub fn print_status(&self) {
        println!("{}", self.status().to_json());
    }

    pub fn best_solution(&self) -> Option<Vec<f64>> {
        self.coordinator.shared.incumbent().map(|(_, primal)| primal)
    }

    pub fn best_objective(&self) -> Option<f64> {
        self.coordinator.shared.incumbent().map(|(objective, _)| objective)
    }

    pub fn nodes_explored(&self) -> u64 {
        self.status().nodes_explored
    }

    pub fn obj_lo_b(&self) -> f64 {
        self.status().obj_lo_b
    }

    pub fn obj_up_b(&self) -> f64 {
        self.status().obj_up_b
    }
}
