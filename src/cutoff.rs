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

//! Termination conditions a [`RunLoop`](crate::engine::runloop) polls between
//! nodes (§4.6). Every worker checks the same shared flag rather than racing
//! to evaluate its own condition independently.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::status::Status;

pub trait Cutoff {
    fn must_stop(&self) -> bool;
}

/// The default: run until the queue is exhausted or the gap closes, never
/// on a clock or iteration count.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCutoff;

impl Cutoff for NoCutoff {
    fn must_stop(&self) -> bool {
        false
    }
}

/// Stops the search once `budget` has elapsed since construction. Spawns a
/// single timer thread that flips a shared flag; every clone of this cutoff
/// observes the same flag.
#[derive(Debug, Clone)]
pub struct TimeBudget {
    stop: Arc<AtomicBool>,
}

impl TimeBudget {
    pub fn new(budget: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        std::thread::spawn(move || {
            std::thread::sleep(budget);
            flag.store(true, Ordering::Relaxed);
        });
        TimeBudget { stop }
    }
}

impl Cutoff for TimeBudget {
    fn must_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

/// Stops the search once the shared node counter reaches `limit`.
/// [`IterationBudget::counter`] is incremented by the run loop once per
/// expanded node, shared across all workers.
#[derive(Debug, Clone)]
pub struct IterationBudget {
    counter: Arc<AtomicU64>,
    limit: u64,
}

impl IterationBudget {
    pub fn new(limit: u64) -> Self {
        Self { counter: Arc::new(AtomicU64::new(0)), limit }
    }

    pub fn counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.counter)
    }
}

impl Cutoff for IterationBudget {
    fn must_stop(&self) -> bool {
        self.counter.load(Ordering::Relaxed) >= self.limit
    }
}

/// Stops the search once the shared [`Status`]'s gap closes below either
/// tolerance (§8's "gap tolerance" boundary behavior).
#[derive(Debug, Clone)]
pub struct GapBudget {
    status: Arc<Mutex<Status>>,
    absolute_gap_tolerance: f64,
    relative_gap_tolerance: f64,
}

impl GapBudget {
    pub fn new(status: Arc<Mutex<Status>>, absolute_gap_tolerance: f64, relative_gap_tolerance: f64) -> Self {
        Self { status, absolute_gap_tolerance, relative_gap_tolerance }
    }
}

impl Cutoff for GapBudget {
    fn must_stop(&self) -> bool {
        let status = self.status.lock();
        status.absolute_gap() <= self.absolute_gap_tolerance
            || status.relative_gap() <= self.relative_gap_tolerance
    }
}

/// The full set of termination conditions a run loop polls, kept apart so
/// the loop can tell *why* it stopped (§4.6 step 4): gap closure reaches
/// `optimalSolutionFound`, everything else reaches `interrupted`.
pub struct Cutoffs {
    pub gap: GapBudget,
    pub interrupting: Vec<Box<dyn Cutoff + Send + Sync>>,
}

impl Cutoffs {
    pub fn new(gap: GapBudget) -> Self {
        Self { gap, interrupting: Vec::new() }
    }

    pub fn push(&mut self, cutoff: Box<dyn Cutoff + Send + Sync>) {
        self.interrupting.push(cutoff);
    }
}
