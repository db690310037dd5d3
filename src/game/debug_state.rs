use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;

use crate::model::{CellKey, Puzzle, PuzzleError, SolveStep, SuspectId};
use crate::solver::Solver;

/// Outcome of driving a state to completion. Debug-only surface.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveReport {
    pub steps: Vec<SolveStep>,
    pub solved: bool,
    pub unplaced: Vec<SuspectId>,
}

pub fn solve_from_state(
    puzzle: &Rc<Puzzle>,
    placements: &BTreeMap<CellKey, SuspectId>,
) -> Result<SolveReport, PuzzleError> {
    let mut solver = Solver::new(Rc::clone(puzzle))?;
    solver.initialize(placements)?;
    solver.solve();
    let unplaced = puzzle
        .suspects
        .iter()
        .filter(|s| !solver.placed().contains_key(&s.id))
        .map(|s| s.id.clone())
        .collect();
    Ok(SolveReport {
        steps: solver.steps().to_vec(),
        solved: solver.is_solved(),
        unplaced,
    })
}

/// Candidate structure after placements and basic propagation only. Ordered
/// maps keep dumps diffable.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugState {
    pub cell_candidates: BTreeMap<CellKey, Vec<SuspectId>>,
    pub suspect_candidates: BTreeMap<SuspectId, Vec<CellKey>>,
    pub placed: BTreeMap<SuspectId, CellKey>,
}

pub fn get_debug_state(
    puzzle: &Rc<Puzzle>,
    placements: &BTreeMap<CellKey, SuspectId>,
) -> Result<DebugState, PuzzleError> {
    let mut solver = Solver::new(Rc::clone(puzzle))?;
    solver.initialize(placements)?;

    let mut cell_candidates = BTreeMap::new();
    for &cell in solver.board().occupiable.iter() {
        let holders = solver.get_cell_candidates(cell);
        if !holders.is_empty() {
            cell_candidates.insert(cell, holders);
        }
    }
    let suspect_candidates = puzzle
        .suspects
        .iter()
        .map(|s| {
            (
                s.id.clone(),
                solver.get_candidates(&s.id).iter().copied().collect(),
            )
        })
        .collect();
    Ok(DebugState {
        cell_candidates,
        suspect_candidates,
        placed: solver.placed().clone(),
    })
}
