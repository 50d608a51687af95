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

//! The fringe a worker pops its next [`Node`] from (§4.3). `Node::pseudo_objective`
//! already carries whatever score the active [`crate::settings::PriorityRule`]
//! assigned at insertion time (see [`ranking::score`]); the queue itself only
//! needs to order by that one key.

pub mod ranking;
pub mod simple;

use crate::node::Node;

/// A priority queue of pending nodes, ordered by ascending `pseudo_objective`
/// (the most promising node, i.e. the smallest lower-bound estimate for a
/// minimization, pops first).
pub trait NodeQueue {
    fn push(&mut self, node: Node);
    fn pop_best(&mut self) -> Option<Node>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rebuilds the heap's ordering using `rescore` against every queued
    /// node. Not called automatically by the engine on a pseudo-cost update
    /// (§9 open question (c)): stale insertion-time scores are tolerated
    /// until the node is popped and re-evaluated.
    ///
    /// `where Self: Sized` keeps `NodeQueue` usable as `dyn NodeQueue` (the
    /// engine boxes one per worker); nothing calls this generic method
    /// through a trait object today.
    fn reprioritize<F: Fn(&Node) -> f64>(&mut self, rescore: F)
    where
        Self: Sized;
}
