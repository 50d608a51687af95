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

//! Shared run state and the inter-worker message protocol (§5, §9). Workers
//! never reach into a peer's [`crate::queue::NodeQueue`] or
//! [`crate::subsolver::SubWorkspace`] directly -- node exchange, pseudo-cost
//! learning and termination all travel as [`Message`]s over per-worker
//! `crossbeam` channels. Only the incumbent, the aggregate [`Status`], and
//! the stop flag are genuinely shared mutable state, held in [`Shared`].

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam::channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

use crate::node::{BranchDirection, Node};
use crate::status::{Description, Status};

/// One observed pseudo-cost update, broadcast so every worker's local
/// `PseudoCosts` table stays roughly in sync without sharing the struct
/// itself (§4.4, §9).
#[derive(Debug, Clone)]
pub struct PseudoCostDelta {
    pub idx: usize,
    pub dir: BranchDirection,
    pub frac: f64,
    pub parent_objective: f64,
    pub child_objective: f64,
}

/// The explicit message protocol of §9's REDESIGN FLAGS.
#[derive(Debug, Clone)]
pub enum Message {
    /// Releases a worker blocked at the top of its loop once every worker's
    /// workspace is constructed, so no thread starts exploring before its
    /// peers exist to steal from.
    Start,
    NodePush(Node),
    /// A request from `requester` for up to `count` nodes from the
    /// receiver's own queue.
    NodeSteal { requester: usize, count: usize },
    NodeBatch(Vec<Node>),
    PseudoCostUpdate(PseudoCostDelta),
    StatusUpdate { obj_lo_b: f64, obj_up_b: f64 },
    Terminate(Description),
    Ack,
}

/// The run's genuinely shared state (§9): the incumbent, the aggregate
/// [`Status`], and the stop flag.
pub struct Shared {
    /// `Arc`-wrapped so [`crate::cutoff::GapBudget`] can watch the exact
    /// same lock the coordinator writes, rather than a stale copy.
    status: Arc<Mutex<Status>>,
    incumbent: Mutex<Option<(f64, Vec<f64>)>>,
    local_bounds: Mutex<Vec<f64>>,
    stop: AtomicBool,
    nodes_explored: AtomicU64,
    idle_workers: AtomicU64,
    num_workers: usize,
}

impl Shared {
    pub fn new(num_workers: usize) -> Self {
        Self {
            status: Arc::new(Mutex::new(Status::new())),
            incumbent: Mutex::new(None),
            local_bounds: Mutex::new(vec![f64::NEG_INFINITY; num_workers]),
            stop: AtomicBool::new(false),
            nodes_explored: AtomicU64::new(0),
            idle_workers: AtomicU64::new(0),
            num_workers,
        }
    }

    /// Records `(objective, primal)` as the new incumbent if it improves on
    /// the current one. Returns whether it did.
    pub fn offer_incumbent(&self, objective: f64, primal: Vec<f64>) -> bool {
        let mut incumbent = self.incumbent.lock();
        let improves = incumbent.as_ref().map_or(true, |(best, _)| objective < *best);
        if improves {
            *incumbent = Some((objective, primal));
            self.status.lock().obj_up_b = objective;
        }
        improves
    }

    pub fn incumbent(&self) -> Option<(f64, Vec<f64>)> {
        self.incumbent.lock().clone()
    }

    pub fn incumbent_objective(&self) -> f64 {
        self.incumbent.lock().as_ref().map_or(f64::INFINITY, |(o, _)| *o)
    }

    /// A worker reports the best (smallest) `pseudo_objective` remaining in
    /// its own queue, or `+inf` while its queue is empty. The global lower
    /// bound is the minimum across all workers: any one of them could still
    /// hold the node that certifies the bound.
    pub fn report_local_bound(&self, worker_id: usize, bound: f64) {
        let mut bounds = self.local_bounds.lock();
        bounds[worker_id] = bound;
        let global = bounds.iter().copied().fold(f64::INFINITY, f64::min);
        drop(bounds);
        self.status.lock().obj_lo_b = global;
    }

    /// The current global lower bound (§4.6 step 3's "best queued objective"
    /// across every worker), for a cutoff that wants to compare it against
    /// `settings.objective_cutoff` without locking `Status` itself.
    pub fn obj_lo_b(&self) -> f64 {
        self.status.lock().obj_lo_b
    }

    /// Moves the run's status out of `New` once every worker has been
    /// released to start exploring (§3 lists `Running` as a live state
    /// between construction and a terminal description).
    pub fn begin_running(&self) {
        self.status.lock().description = Description::Running;
    }

    pub fn record_node_explored(&self) {
        let n = self.nodes_explored.fetch_add(1, Ordering::Relaxed) + 1;
        self.status.lock().nodes_explored = n;
    }

    /// The run-wide node count so far, for a cutoff that wants to watch it
    /// without a second counter (`crate::engine::IterationCutoff`).
    pub fn nodes_explored(&self) -> u64 {
        self.nodes_explored.load(Ordering::Relaxed)
    }

    /// Marks `worker_id` idle (its queue is empty and a steal found
    /// nothing). Returns `true` iff every worker is now idle, meaning the
    /// search is complete.
    pub fn enter_idle(&self) -> bool {
        self.idle_workers.fetch_add(1, Ordering::SeqCst) + 1 == self.num_workers as u64
    }

    /// Marks a previously-idle worker busy again (it received work).
    pub fn exit_idle(&self) {
        self.idle_workers.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn request_stop(&self, description: Description) {
        self.stop.store(true, Ordering::SeqCst);
        self.status.lock().description = description;
    }

    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Status {
        self.status.lock().clone()
    }

    /// Hands out a handle to the exact lock this `Shared` writes, so a
    /// [`crate::cutoff::GapBudget`] observes live updates rather than a
    /// one-time copy.
    pub fn status_handle(&self) -> Arc<Mutex<Status>> {
        Arc::clone(&self.status)
    }
}

/// One worker's view of the coordinator: its own inbox, and a sender to
/// reach each peer by id.
pub struct WorkerChannel {
    pub id: usize,
    pub inbox: Receiver<Message>,
    pub peers: Vec<(usize, Sender<Message>)>,
}

impl WorkerChannel {
    pub fn send_to(&self, peer: usize, message: Message) {
        if let Some((_, sender)) = self.peers.iter().find(|(id, _)| *id == peer) {
            let _ = sender.send(message);
        }
    }

    pub fn broadcast(&self, message: Message) {
        for (_, sender) in &self.peers {
            let _ = sender.send(message.clone());
        }
    }
}

/// Builds the shared state and one [`WorkerChannel`] per worker, fully
/// connected so any worker can message any other directly (§5).
pub struct Coordinator {
    pub shared: Arc<Shared>,
    senders: Vec<Sender<Message>>,
}

impl Coordinator {
    pub fn new(num_workers: usize) -> (Self, Vec<WorkerChannel>) {
        let shared = Arc::new(Shared::new(num_workers));
        let mut senders = Vec::with_capacity(num_workers);
        let mut receivers = Vec::with_capacity(num_workers);
        for _ in 0..num_workers {
            let (tx, rx) = unbounded();
            senders.push(tx);
            receivers.push(rx);
        }
        let channels = receivers
            .into_iter()
            .enumerate()
            .map(|(id, inbox)| WorkerChannel {
                id,
                inbox,
                peers: senders
                    .iter()
                    .enumerate()
                    .filter(|(peer, _)| *peer != id)
                    .map(|(peer, sender)| (peer, sender.clone()))
                    .collect(),
            })
            .collect();
        (Coordinator { shared, senders }, channels)
    }

    /// Releases every worker blocked waiting for [`Message::Start`].
    pub fn start(&self) {
        self.shared.begin_running();
        for sender in &self.senders {
            let _ = sender.send(Message::Start);
        }
    }

    pub fn terminate(&self, description: Description) {
        self.shared.request_stop(description);
        for sender in &self.senders {
            let _ = sender.send(Message::Terminate(description));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offer_incumbent_only_accepts_strict_improvements() {
        let shared = Shared::new(1);
        assert!(shared.offer_incumbent(5.0, vec![1.0]));
        assert!(!shared.offer_incumbent(5.0, vec![2.0]));
        assert!(shared.offer_incumbent(4.0, vec![3.0]));
        assert_eq!(shared.incumbent_objective(), 4.0);
    }

    #[test]
    fn global_lower_bound_is_the_minimum_reported_bound() {
        let shared = Shared::new(2);
        shared.report_local_bound(0, 10.0);
        shared.report_local_bound(1, 3.0);
        assert_eq!(shared.snapshot().obj_lo_b, 3.0);
    }

    #[test]
    fn all_workers_idle_is_reported_exactly_once() {
        let shared = Shared::new(2);
        assert!(!shared.enter_idle());
        assert!(shared.enter_idle());
        shared.exit_idle();
        shared.exit_idle();
        assert!(!shared.enter_idle());
    }

    #[test]
    fn coordinator_wires_every_worker_to_every_peer() {
        let (_coordinator, channels) = Coordinator::new(3);
        assert_eq!(channels.len(), 3);
        for (id, channel) in channels.iter().enumerate() {
            assert_eq!(channel.id, id);
            assert_eq!(channel.peers.len(), 2);
            assert!(channel.peers.iter().all(|(peer, _)| *peer != id));
        }
    }

    #[test]
    fn start_message_reaches_every_worker() {
        let (coordinator, channels) = Coordinator::new(2);
        coordinator.start();
        for channel in &channels {
            assert!(matches!(channel.inbox.recv().unwrap(), Message::Start));
        }
    }

    #[test]
    fn starting_the_coordinator_moves_status_out_of_new() {
        let (coordinator, _channels) = Coordinator::new(1);
        assert_eq!(coordinator.shared.snapshot().description, Description::New);
        coordinator.start();
        assert_eq!(coordinator.shared.snapshot().description, Description::Running);
    }

    #[test]
    fn terminate_sets_the_shared_stop_flag_and_reaches_every_worker() {
        let (coordinator, channels) = Coordinator::new(2);
        coordinator.terminate(Description::OptimalSolutionFound);
        assert!(coordinator.shared.should_stop());
        for channel in &channels {
            assert!(matches!(channel.inbox.recv().unwrap(), Message::Terminate(Description::OptimalSolutionFound)));
        }
    }
}
