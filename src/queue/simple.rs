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

//! The default, and so far only, [`NodeQueue`]: a binary heap ordered by
//! `pseudo_objective` ascending.

use std::cmp::Ordering;

use binary_heap_plus::BinaryHeap;
use compare::Compare;
use ordered_float::OrderedFloat;

use crate::node::Node;

use super::NodeQueue;

/// Orders nodes so the smallest `pseudo_objective` pops first, even though
/// `BinaryHeap` is a max-heap -- the comparison is inverted for that reason.
#[derive(Debug, Clone, Copy, Default)]
struct CompareNode;

impl Compare<Node> for CompareNode {
    fn compare(&self, l: &Node, r: &Node) -> Ordering {
        OrderedFloat(r.pseudo_objective).cmp(&OrderedFloat(l.pseudo_objective))
    }
}

pub struct SimpleNodeQueue {
    heap: BinaryHeap<Node, CompareNode>,
}

impl SimpleNodeQueue {
    pub fn new() -> Self {
        Self { heap: BinaryHeap::from_vec_cmp(vec![], CompareNode) }
    }
}

impl Default for SimpleNodeQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeQueue for SimpleNodeQueue {
    fn push(&mut self, node: Node) {
        self.heap.push(node);
    }

    fn pop_best(&mut self) -> Option<Node> {
        self.heap.pop()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn reprioritize<F: Fn(&Node) -> f64>(&mut self, rescore: F) {
        let mut nodes: Vec<Node> = self.heap.drain().collect();
        for node in nodes.iter_mut() {
            node.pseudo_objective = rescore(node);
        }
        self.heap = BinaryHeap::from_vec_cmp(nodes, CompareNode);
    }
}
