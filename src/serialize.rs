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

//! The flat wire format of §6.2: a length-prefixed vector of doubles, used
//! for inter-worker messages and for persisting a [`VariableSet`], [`Node`]
//! or [`Status`]. Integers (counts, indices, flags) ride along as doubles --
//! exact for every value this crate produces, since they are all bounded by
//! problem size. A leading format-version tag lets a future reader reject a
//! layout it doesn't understand instead of misparsing it (§9's serialization
//! design note).

use thiserror::Error;

use crate::node::{BranchDirection, Node};
use crate::problem::{DenseVariableSet, GroupId};
use crate::status::{Description, Status};

/// Current layout version, bumped whenever a field is added, removed, or
/// reordered in one of the layouts below.
pub const FORMAT_VERSION: f64 = 1.0;

/// A flat double vector: `[version, ...payload]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SerialData {
    pub values: Vec<f64>,
}

/// A malformed `SerialData`: wrong version, truncated payload, or a count
/// field that doesn't match the vector's actual length.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeserializeError {
    #[error("unsupported format version {found}, expected {expected}")]
    UnsupportedVersion { found: f64, expected: f64 },
    #[error("payload ended after {at} doubles while decoding {field}")]
    Truncated { field: &'static str, at: usize },
}

struct Reader<'a> {
    values: &'a [f64],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(values: &'a [f64]) -> Self {
        Self { values, pos: 0 }
    }

    fn next(&mut self, field: &'static str) -> Result<f64, DeserializeError> {
        let v = self.values.get(self.pos).copied().ok_or(DeserializeError::Truncated { field, at: self.pos })?;
        self.pos += 1;
        Ok(v)
    }

    fn next_usize(&mut self, field: &'static str) -> Result<usize, DeserializeError> {
        Ok(self.next(field)? as usize)
    }

    fn take(&mut self, n: usize, field: &'static str) -> Result<Vec<f64>, DeserializeError> {
        let end = self.pos + n;
        if end > self.values.len() {
            return Err(DeserializeError::Truncated { field, at: self.pos });
        }
        let slice = self.values[self.pos..end].to_vec();
        self.pos = end;
        Ok(slice)
    }
}

fn check_version(reader: &mut Reader) -> Result<(), DeserializeError> {
    let version = reader.next("version")?;
    if version != FORMAT_VERSION {
        return Err(DeserializeError::UnsupportedVersion { found: version, expected: FORMAT_VERSION });
    }
    Ok(())
}

/// `[version | numVars | numDsc | loBs[numVars] | upBs[numVars] | dscIndices[numDsc] | sos1Groups[numDsc]]`
/// (§6.2). `sos1Groups` entries are the raw `GroupId`, `0` meaning ungrouped.
pub fn serialize_variable_set(vars: &DenseVariableSet) -> SerialData {
    use crate::problem::VariableSet;
    let (lo_bs, up_bs) = vars.bounds();
    let discrete = vars.discrete_indices();
    let groups = vars.sos1_groups();
    let mut values = Vec::with_capacity(3 + 2 * lo_bs.len() + 2 * discrete.len());
    values.push(FORMAT_VERSION);
    values.push(lo_bs.len() as f64);
    values.push(discrete.len() as f64);
    values.extend(lo_bs.iter());
    values.extend(up_bs.iter());
    values.extend(discrete.iter().map(|&i| i as f64));
    values.extend(discrete.iter().enumerate().map(|(pos, _)| groups.get(pos).and_then(|g| *g).unwrap_or(0) as f64));
    SerialData { values }
}

pub fn deserialize_variable_set(data: &SerialData) -> Result<DenseVariableSet, DeserializeError> {
    let mut reader = Reader::new(&data.values);
    check_version(&mut reader)?;
    let num_vars = reader.next_usize("numVars")?;
    let num_dsc = reader.next_usize("numDsc")?;
    let lo_bs = reader.take(num_vars, "loBs")?;
    let up_bs = reader.take(num_vars, "upBs")?;
    let dsc_indices: Vec<usize> = reader.take(num_dsc, "dscIndices")?.into_iter().map(|v| v as usize).collect();
    let sos1_groups: Vec<Option<GroupId>> = reader
        .take(num_dsc, "sos1Groups")?
        .into_iter()
        .map(|v| if v as GroupId == 0 { None } else { Some(v as GroupId) })
        .collect();
    Ok(DenseVariableSet::new(lo_bs, up_bs, dsc_indices, sos1_groups))
}

/// `[version | depth | objective | pseudoObjective | avgFrac | reliable |
///   branchVar | branchDirection | branchFrac | n | branchLoBs[n] |
///   branchUpBs[n] | m | primal[m] | k | dual[k]]` (§6.2, §3). `branchVar`
/// is `-1` for "no branch decision" (the root, or an SOS1-branch child);
/// `branchDirection` is `-1`/`0`/`1` for none/down/up.
pub fn serialize_node(node: &Node) -> SerialData {
    let mut values = Vec::new();
    values.push(FORMAT_VERSION);
    values.push(node.depth as f64);
    values.push(node.objective);
    values.push(node.pseudo_objective);
    values.push(node.avg_frac);
    values.push(if node.reliable { 1.0 } else { 0.0 });
    values.push(node.branch_var.map_or(-1.0, |v| v as f64));
    values.push(match node.branch_direction {
        None => -1.0,
        Some(BranchDirection::Down) => 0.0,
        Some(BranchDirection::Up) => 1.0,
    });
    values.push(node.branch_frac);
    values.push(node.branch_lo_bs.len() as f64);
    values.extend(node.branch_lo_bs.iter());
    values.extend(node.branch_up_bs.iter());
    values.push(node.primal.len() as f64);
    values.extend(node.primal.iter());
    values.push(node.dual.len() as f64);
    values.extend(node.dual.iter());
    SerialData { values }
}

pub fn deserialize_node(data: &SerialData) -> Result<Node, DeserializeError> {
    let mut reader = Reader::new(&data.values);
    check_version(&mut reader)?;
    let depth = reader.next_usize("depth")?;
    let objective = reader.next("objective")?;
    let pseudo_objective = reader.next("pseudoObjective")?;
    let avg_frac = reader.next("avgFrac")?;
    let reliable = reader.next("reliable")? != 0.0;
    let branch_var_raw = reader.next("branchVar")?;
    let branch_var = if branch_var_raw < 0.0 { None } else { Some(branch_var_raw as usize) };
    let branch_direction = match reader.next("branchDirection")? {
        d if d < 0.0 => None,
        d if d == 0.0 => Some(BranchDirection::Down),
        _ => Some(BranchDirection::Up),
    };
    let branch_frac = reader.next("branchFrac")?;
    let n = reader.next_usize("n")?;
    let branch_lo_bs = reader.take(n, "branchLoBs")?;
    let branch_up_bs = reader.take(n, "branchUpBs")?;
    let m = reader.next_usize("m")?;
    let primal = reader.take(m, "primal")?;
    let k = reader.next_usize("k")?;
    let dual = reader.take(k, "dual")?;
    Ok(Node {
        branch_lo_bs,
        branch_up_bs,
        objective,
        primal,
        dual,
        avg_frac,
        pseudo_objective,
        reliable,
        depth,
        branch_var,
        branch_direction,
        branch_frac,
    })
}

fn description_code(d: Description) -> f64 {
    match d {
        Description::New => 0.0,
        Description::Running => 1.0,
        Description::OptimalSolutionFound => 2.0,
        Description::Infeasible => 3.0,
        Description::Interrupted => 4.0,
    }
}

fn description_from_code(code: f64) -> Description {
    match code as i64 {
        1 => Description::Running,
        2 => Description::OptimalSolutionFound,
        3 => Description::Infeasible,
        4 => Description::Interrupted,
        _ => Description::New,
    }
}

/// `[version | description | objLoB | objUpB | totalTime | nodesExplored]` (§6.2).
pub fn serialize_status(status: &Status) -> SerialData {
    SerialData {
        values: vec![
            FORMAT_VERSION,
            description_code(status.description),
            status.obj_lo_b,
            status.obj_up_b,
            status.total_time,
            status.nodes_explored as f64,
        ],
    }
}

pub fn deserialize_status(data: &SerialData) -> Result<Status, DeserializeError> {
    let mut reader = Reader::new(&data.values);
    check_version(&mut reader)?;
    let description = description_from_code(reader.next("description")?);
    let obj_lo_b = reader.next("objLoB")?;
    let obj_up_b = reader.next("objUpB")?;
    let total_time = reader.next("totalTime")?;
    let nodes_explored = reader.next("nodesExplored")? as u64;
    Ok(Status { description, obj_lo_b, obj_up_b, total_time, nodes_explored })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::VariableSet;

    #[test]
    fn variable_set_round_trips_through_serial_data() {
        let vars = DenseVariableSet::new(vec![0.0, -1.0], vec![1.0, 5.0], vec![0, 1], vec![Some(3), Some(3)]);
        let data = serialize_variable_set(&vars);
        let back = deserialize_variable_set(&data).unwrap();
        assert_eq!(back.bounds(), vars.bounds());
        assert_eq!(back.discrete_indices(), vars.discrete_indices());
        assert_eq!(back.sos1_groups(), vars.sos1_groups());
    }

    #[test]
    fn ungrouped_sos1_entries_round_trip_as_none() {
        let vars = DenseVariableSet::new(vec![0.0], vec![1.0], vec![0], vec![None]);
        let data = serialize_variable_set(&vars);
        let back = deserialize_variable_set(&data).unwrap();
        assert_eq!(back.sos1_groups(), &[None]);
    }

    #[test]
    fn node_round_trips_including_its_branch_decision() {
        let problem = crate::problem::Problem::new(
            crate::problem::ObjectiveFunction::Linear { l: vec![1.0, 1.0] },
            crate::problem::ConstraintSet::Null,
            DenseVariableSet::new(vec![0.0, 0.0], vec![1.0, 1.0], vec![0, 1], vec![]),
        );
        let root = Node::root(&problem);
        let child = root.branch_child(0, 0.5, BranchDirection::Up).unwrap();
        let data = serialize_node(&child);
        let back = deserialize_node(&data).unwrap();
        assert_eq!(back.branch_var, child.branch_var);
        assert_eq!(back.branch_direction, child.branch_direction);
        assert_eq!(back.branch_lo_bs, child.branch_lo_bs);
        assert_eq!(back.branch_up_bs, child.branch_up_bs);
        assert_eq!(back.depth, child.depth);
    }

    #[test]
    fn root_node_round_trips_with_no_branch_decision() {
        let problem = crate::problem::Problem::new(
            crate::problem::ObjectiveFunction::Null,
            crate::problem::ConstraintSet::Null,
            DenseVariableSet::continuous(vec![0.0], vec![1.0]),
        );
        let root = Node::root(&problem);
        let back = deserialize_node(&serialize_node(&root)).unwrap();
        assert!(back.branch_var.is_none());
        assert!(back.branch_direction.is_none());
    }

    #[test]
    fn status_round_trips_including_its_description() {
        let mut status = Status::new();
        status.description = Description::Interrupted;
        status.obj_lo_b = 1.5;
        status.obj_up_b = 4.0;
        status.nodes_explored = 42;
        let back = deserialize_status(&serialize_status(&status)).unwrap();
        assert_eq!(back.description, status.description);
        assert_eq!(back.obj_lo_b, status.obj_lo_b);
        assert_eq!(back.nodes_explored, status.nodes_explored);
    }

    #[test]
    fn a_different_format_version_is_rejected_rather_than_misparsed() {
        let mut data = serialize_status(&Status::new());
        data.values[0] = 99.0;
        assert!(matches!(deserialize_status(&data), Err(DeserializeError::UnsupportedVersion { .. })));
    }

    #[test]
    fn a_truncated_payload_is_rejected_rather_than_panicking() {
        let data = SerialData { values: vec![FORMAT_VERSION, 2.0] };
        assert!(deserialize_status(&data).is_err());
    }
}
