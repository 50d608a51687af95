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

//! One worker's main loop (§4.6): wait for the start signal, then
//! pop-best/expand/publish until the queue and every peer's queue are
//! exhausted, the incumbent closes the gap, or an outside cutoff fires.

use std::sync::Arc;

use log::{debug, info};

use crate::cutoff::Cutoffs;
use crate::engine::branch_and_solve::{self, ExpandOutcome};
use crate::engine::coordinator::{Message, PseudoCostDelta, Shared, WorkerChannel};
use crate::node::Node;
use crate::problem::Problem;
use crate::pseudocost::PseudoCosts;
use crate::queue::NodeQueue;
use crate::settings::Settings;
use crate::status::Description;
use crate::subsolver::SubWorkspace;

/// Drains `channel`'s inbox without blocking, applying every message that
/// doesn't require handing control back to the caller. Returns `true` iff a
/// [`Message::Terminate`] was seen.
fn drain_inbox(
    channel: &WorkerChannel,
    queue: &mut dyn NodeQueue,
    pseudo_costs: &mut PseudoCosts,
    shared: &Shared,
) -> bool {
    while let Ok(message) = channel.inbox.try_recv() {
        match message {
            Message::Terminate(_) => return true,
            Message::NodePush(node) => queue.push(node),
            Message::NodeBatch(nodes) => {
                for node in nodes {
                    queue.push(node);
                }
            }
            Message::NodeSteal { requester, count } => {
                let give = queue.len().saturating_sub(queue.len() / 2).min(count);
                let mut batch = Vec::with_capacity(give);
                for _ in 0..give {
                    match queue.pop_best() {
                        Some(n) => batch.push(n),
                        None => break,
                    }
                }
                if !batch.is_empty() {
                    channel.send_to(requester, Message::NodeBatch(batch));
                }
            }
            Message::PseudoCostUpdate(delta) => {
                pseudo_costs.update(delta.idx, delta.dir, delta.frac, delta.parent_objective, delta.child_objective);
            }
            Message::StatusUpdate { .. } | Message::Ack | Message::Start => {}
        }
    }
    shared.should_stop()
}

/// Classifies why the search should stop right now, if at all (§4.6 step 4).
/// Gap closure and the lower bound crossing `objectiveCutoff` both mean the
/// search answered the question it was asked (`optimalSolutionFound` /
/// `infeasible` respectively); every other cutoff (time, iteration, ...)
/// means it was cut off before finishing (`interrupted`). Checked in this
/// order so a run that both closes the gap and runs past its time limit on
/// the same poll is still reported as having found the optimum.
fn check_cutoffs(cutoffs: &Cutoffs, shared: &Shared, settings: &Settings) -> Option<Description> {
    if cutoffs.gap.must_stop() {
        return Some(Description::OptimalSolutionFound);
    }
    if shared.obj_lo_b() >= settings.objective_cutoff {
        return Some(Description::Infeasible);
    }
    if cutoffs.interrupting.iter().any(|c| c.must_stop()) {
        return Some(Description::Interrupted);
    }
    None
}

/// Runs one worker to completion. `seed` is `Some(root)` for exactly the
/// worker that should bootstrap the search (§4.6); every other worker
/// starts with an empty queue and waits on a steal or a pushed node.
pub fn run_worker(
    id: usize,
    problem: &Problem,
    settings: &Settings,
    mut workspace: Box<dyn SubWorkspace>,
    mut queue: Box<dyn NodeQueue>,
    mut pseudo_costs: PseudoCosts,
    channel: WorkerChannel,
    shared: Arc<Shared>,
    cutoffs: &Cutoffs,
    seed: Option<Node>,
) {
    // Block until every worker's workspace exists (§9's barrier note).
    match channel.inbox.recv() {
        Ok(Message::Start) => {}
        Ok(Message::Terminate(_)) | Err(_) => return,
        Ok(_) => {}
    }

    if let Some(root) = seed {
        queue.push(root);
    }

    let mut was_idle = false;

    loop {
        if drain_inbox(&channel, queue.as_mut(), &mut pseudo_costs, &shared) {
            debug!("worker {id} terminating on an explicit message");
            return;
        }
        if let Some(description) = check_cutoffs(cutoffs, &shared, settings) {
            shared.request_stop(description);
            return;
        }

        let node = match queue.pop_best() {
            Some(node) => node,
            None => {
                if !was_idle {
                    was_idle = true;
                    if shared.enter_idle() {
                        let description = if shared.incumbent().is_some() {
                            Description::OptimalSolutionFound
                        } else {
                            Description::Infeasible
                        };
                        info!("worker {id} observed every queue empty, concluding the search");
                        shared.request_stop(description);
                        return;
                    }
                }
                // Ask a peer for work and let the next inbox drain collect
                // the reply (or discover termination) on the next iteration.
                if let Some((peer, _)) = channel.peers.first() {
                    channel.send_to(*peer, Message::NodeSteal { requester: id, count: settings.steal_threshold });
                }
                continue;
            }
        };

        if was_idle {
            was_idle = false;
            shared.exit_idle();
        }

        shared.report_local_bound(id, node.pseudo_objective);

        let incumbent_objective = shared.incumbent_objective();
        let (outcome, observation) =
            branch_and_solve::expand(node, workspace.as_mut(), problem, settings, &mut pseudo_costs, incumbent_objective);

        // The observation credits the variable that produced this node, not
        // one of its children -- broadcast it once, here, rather than at
        // every peer re-deriving it from a pushed child.
        if let Some(obs) = observation {
            channel.broadcast(Message::PseudoCostUpdate(PseudoCostDelta {
                idx: obs.idx,
                dir: obs.dir,
                frac: obs.frac,
                parent_objective: obs.parent_objective,
                child_objective: obs.child_objective,
            }));
        }

        match outcome {
            ExpandOutcome::Fathomed | ExpandOutcome::Infeasible => {}
            ExpandOutcome::IntegerFeasible { objective, primal } => {
                if shared.offer_incumbent(objective, primal) {
                    info!("worker {id} improved the incumbent to {objective}");
                }
            }
            ExpandOutcome::Branched(children) => {
                for child in children {
                    queue.push(child);
                }
            }
        }
        shared.record_node_explored();
    }
}
