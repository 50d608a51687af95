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

//! The mutable, process-shared run status (§3). [`Coordinator`](crate::engine::coordinator::Coordinator)
//! is the sole writer of the global fields; workers write only their own
//! locals before reconciling.

use std::time::Duration;

use serde::Serialize;

const GAP_EPSILON: f64 = 1e-10;

/// Discriminates why a run ended, per §6.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Description {
    New,
    Running,
    OptimalSolutionFound,
    Infeasible,
    Interrupted,
}

impl Default for Description {
    fn default() -> Self {
        Description::New
    }
}

/// The run's status, as returned by `getStatus` and serialized by
/// `printStatus` (§6.3). Construction always starts `New`; the engine moves
/// it through `Running` and finally one of the three terminal descriptions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub description: Description,
    pub obj_lo_b: f64,
    pub obj_up_b: f64,
    pub total_time: f64,
    pub nodes_explored: u64,
}

impl Status {
    pub fn new() -> Self {
        Self {
            description: Description::New,
            obj_lo_b: f64::NEG_INFINITY,
            obj_up_b: f64::INFINITY,
            total_time: 0.0,
            nodes_explored: 0,
        }
    }

    pub fn absolute_gap(&self) -> f64 {
        self.obj_up_b - self.obj_lo_b
    }

    pub fn relative_gap(&self) -> f64 {
        self.absolute_gap() / self.obj_up_b.abs().max(GAP_EPSILON)
    }

    pub fn elapsed(&mut self, elapsed: Duration) {
        self.total_time = elapsed.as_secs_f64();
    }

    /// JSON rendering used by `printStatus` (§6.3). The wire format for
    /// inter-worker messages and node/problem persistence is the flat
    /// `SerialData` double vector of §6.2, not JSON -- this is purely a
    /// human/log-facing report.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("Status always serializes")
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_status_has_infinite_gap() {
        let s = Status::new();
        assert_eq!(s.absolute_gap(), f64::INFINITY);
    }

    #[test]
    fn gap_narrows_as_bounds_converge() {
        let mut s = Status::new();
        s.obj_lo_b = 9.5;
        s.obj_up_b = 10.0;
        assert!((s.absolute_gap() - 0.5).abs() < 1e-12);
        assert!((s.relative_gap() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn to_json_round_trips_through_camel_case_fields() {
        let s = Status::new();
        let json = s.to_json();
        assert!(json.contains("\"description\":\"new\""));
        assert!(json.contains("\"objLoB\""));
    }
}
