use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use itertools::Itertools;
use log::trace;

use crate::model::{
    BoardIndex, CellKey, Constraint, Puzzle, PuzzleError, SolveStep, SuspectId, Technique,
};
use crate::solver::catalogue::{apply_static_filters, describe, dynamic_eliminations, StateView};

const MAX_SOLVE_ITERATIONS: usize = 200;
const MAX_PROPAGATION_ROUNDS: usize = 100;
const MAX_NAKED_SET_SIZE: usize = 6;
const CONTRADICTION_DEPTH: usize = 1;

static NO_CANDIDATES: BTreeSet<CellKey> = BTreeSet::new();

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Axis {
    Row,
    Col,
}

impl Axis {
    fn of(self, key: CellKey) -> usize {
        match self {
            Axis::Row => key.row,
            Axis::Col => key.col,
        }
    }

    fn cross(self, key: CellKey) -> usize {
        match self {
            Axis::Row => key.col,
            Axis::Col => key.row,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Col => "column",
        }
    }

    fn single_technique(self) -> Technique {
        match self {
            Axis::Row => Technique::RowSingle,
            Axis::Col => Technique::ColumnSingle,
        }
    }

    fn claiming_technique(self) -> Technique {
        match self {
            Axis::Row => Technique::RowClaiming,
            Axis::Col => Technique::ColumnClaiming,
        }
    }

    fn set_technique(self) -> Technique {
        match self {
            Axis::Row => Technique::NakedRowSet,
            Axis::Col => Technique::NakedColumnSet,
        }
    }
}

/// Deep copy of the solver's mutable state. Restoring truncates the step log
/// back to the snapshot point; no other engine state exists.
pub struct SolverSnapshot {
    candidates: BTreeMap<SuspectId, BTreeSet<CellKey>>,
    placed: BTreeMap<SuspectId, CellKey>,
    steps_len: usize,
}

/// Constraint-propagation solver over one puzzle. Owns its candidate map and
/// step log exclusively; the puzzle and board index are shared immutably.
pub struct Solver {
    puzzle: Rc<Puzzle>,
    board: Rc<BoardIndex>,
    candidates: BTreeMap<SuspectId, BTreeSet<CellKey>>,
    placed: BTreeMap<SuspectId, CellKey>,
    steps: Vec<SolveStep>,
}

impl Solver {
    pub fn new(puzzle: Rc<Puzzle>) -> Result<Self, PuzzleError> {
        let board = Rc::new(BoardIndex::build(&puzzle)?);
        Self::with_board(puzzle, board)
    }

    /// Build a solver around a pre-built board index, so several instances
    /// can share one index.
    pub fn with_board(puzzle: Rc<Puzzle>, board: Rc<BoardIndex>) -> Result<Self, PuzzleError> {
        validate_suspects(&puzzle, &board)?;
        Ok(Self {
            puzzle,
            board,
            candidates: BTreeMap::new(),
            placed: BTreeMap::new(),
            steps: Vec::new(),
        })
    }

    pub fn board(&self) -> &Rc<BoardIndex> {
        &self.board
    }

    /// Clear all state, seed each suspect's candidates from the static
    /// filters, apply the host's placements, then propagate naked singles to
    /// a fixed point.
    ///
    /// Placements are validated before anything runs: unknown suspects,
    /// out-of-bounds or non-occupiable cells and row/column collisions are
    /// precondition violations, not solvable states.
    pub fn initialize(
        &mut self,
        placements: &BTreeMap<CellKey, SuspectId>,
    ) -> Result<(), PuzzleError> {
        self.candidates.clear();
        self.placed.clear();
        self.steps.clear();

        validate_placements(&self.puzzle, &self.board, placements)?;

        let puzzle = Rc::clone(&self.puzzle);
        for suspect in &puzzle.suspects {
            let initial =
                apply_static_filters(&self.board, suspect, self.board.occupiable.clone());
            self.candidates.insert(suspect.id.clone(), initial);
        }

        for suspect in &puzzle.suspects {
            let placement = placements
                .iter()
                .find(|(_, id)| **id == suspect.id)
                .map(|(&cell, _)| cell);
            if let Some(cell) = placement {
                self.place_cell(&suspect.id, cell);
            }
        }
        self.propagate_basic();
        Ok(())
    }

    pub fn is_solved(&self) -> bool {
        self.puzzle
            .suspects
            .iter()
            .all(|s| self.placed.contains_key(&s.id))
    }

    pub fn get_candidates(&self, suspect_id: &str) -> &BTreeSet<CellKey> {
        self.candidates.get(suspect_id).unwrap_or(&NO_CANDIDATES)
    }

    /// Unplaced suspects that still hold the cell, in declared order.
    pub fn get_cell_candidates(&self, cell: CellKey) -> Vec<SuspectId> {
        self.puzzle
            .suspects
            .iter()
            .filter(|s| !self.placed.contains_key(&s.id))
            .filter(|s| self.get_candidates(&s.id).contains(&cell))
            .map(|s| s.id.clone())
            .collect()
    }

    /// Read-only view of the placements made so far.
    pub fn placed(&self) -> &BTreeMap<SuspectId, CellKey> {
        &self.placed
    }

    pub fn steps(&self) -> &[SolveStep] {
        &self.steps
    }

    /// Whether the host may drop the suspect on the cell right now.
    pub fn can_place(&self, suspect_id: &str, cell: CellKey) -> bool {
        if self.placed.contains_key(suspect_id) || !self.board.occupiable.contains(&cell) {
            return false;
        }
        let line_taken = self
            .placed
            .values()
            .any(|&p| p.row == cell.row || p.col == cell.col);
        !line_taken && self.get_candidates(suspect_id).contains(&cell)
    }

    /// Diagnostic: do the placements match the puzzle's reference solution?
    pub fn matches_reference(&self) -> bool {
        self.placed.iter().all(|(id, &cell)| {
            self.puzzle.reference_cell(id) == Some(cell)
        })
    }

    pub fn snapshot(&self) -> SolverSnapshot {
        SolverSnapshot {
            candidates: self.candidates.clone(),
            placed: self.placed.clone(),
            steps_len: self.steps.len(),
        }
    }

    pub fn restore(&mut self, snapshot: SolverSnapshot) {
        self.candidates = snapshot.candidates;
        self.placed = snapshot.placed;
        self.steps.truncate(snapshot.steps_len);
    }

    /// Run `solve_step` until solved or stuck. Returns the accumulated step
    /// log; partial traces are authoritative even when the solver stalls.
    pub fn solve(&mut self) -> &[SolveStep] {
        for _ in 0..MAX_SOLVE_ITERATIONS {
            if self.is_solved() || self.solve_step().is_none() {
                break;
            }
        }
        &self.steps
    }

    /// Produce one deduction step, or `None` when no technique makes
    /// progress. Techniques are consulted in a fixed order; the first that
    /// changes state wins.
    pub fn solve_step(&mut self) -> Option<SolveStep> {
        if self.is_solved() {
            return None;
        }
        self.technique_naked_single()
            .or_else(|| self.technique_line_single(Axis::Row))
            .or_else(|| self.technique_line_single(Axis::Col))
            .or_else(|| self.technique_claiming(Axis::Row))
            .or_else(|| self.technique_claiming(Axis::Col))
            .or_else(|| self.technique_naked_set(Axis::Row))
            .or_else(|| self.technique_naked_set(Axis::Col))
            .or_else(|| self.technique_room_constraints())
            .or_else(|| self.technique_only_person_on_type())
            .or_else(|| self.technique_relative_row())
            .or_else(|| self.technique_pointing_group())
            .or_else(|| self.technique_contradiction(CONTRADICTION_DEPTH))
    }

    // ---- placement primitives ------------------------------------------

    /// Record a placement and strip the cell, its row and its column from
    /// every other unplaced suspect. Does not propagate.
    fn place_cell(&mut self, suspect_id: &str, cell: CellKey) {
        trace!(target: "solver", "placing {} at {}", suspect_id, cell);
        self.placed.insert(suspect_id.to_string(), cell);
        self.candidates
            .insert(suspect_id.to_string(), BTreeSet::from([cell]));

        let puzzle = Rc::clone(&self.puzzle);
        for other in &puzzle.suspects {
            if other.id == suspect_id || self.placed.contains_key(&other.id) {
                continue;
            }
            if let Some(set) = self.candidates.get_mut(&other.id) {
                set.retain(|k| *k != cell && k.row != cell.row && k.col != cell.col);
            }
        }
    }

    /// Iterated naked-single placement to a fixed point. Runs silently; the
    /// cascade belongs to whichever step triggered it.
    fn propagate_basic(&mut self) {
        let puzzle = Rc::clone(&self.puzzle);
        for _ in 0..MAX_PROPAGATION_ROUNDS {
            let mut progressed = false;
            for suspect in &puzzle.suspects {
                if self.placed.contains_key(&suspect.id) {
                    continue;
                }
                let candidates = self.get_candidates(&suspect.id);
                if candidates.len() == 1 {
                    let cell = *candidates.iter().next().unwrap();
                    self.place_cell(&suspect.id, cell);
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }
    }

    fn place_suspect(&mut self, suspect_id: &str, cell: CellKey) {
        self.place_cell(suspect_id, cell);
        self.propagate_basic();
    }

    // ---- contradiction test --------------------------------------------

    /// A state is contradictory when an unplaced suspect has no candidates
    /// left, or (on boards where every line must be used, i.e. one suspect
    /// per row and column) an unoccupied row or column has no candidate from
    /// anyone.
    fn is_contradictory(&self) -> bool {
        for suspect in &self.puzzle.suspects {
            if !self.placed.contains_key(&suspect.id)
                && self.get_candidates(&suspect.id).is_empty()
            {
                return true;
            }
        }

        if self.puzzle.suspects.len() == self.puzzle.grid_size {
            for axis in [Axis::Row, Axis::Col] {
                for index in 0..self.puzzle.grid_size {
                    let occupied = self.placed.values().any(|&p| axis.of(p) == index);
                    if occupied {
                        continue;
                    }
                    let reachable = self
                        .puzzle
                        .suspects
                        .iter()
                        .filter(|s| !self.placed.contains_key(&s.id))
                        .any(|s| {
                            self.get_candidates(&s.id)
                                .iter()
                                .any(|&k| axis.of(k) == index)
                        });
                    if !reachable {
                        return true;
                    }
                }
            }
        }
        false
    }

    // ---- techniques -----------------------------------------------------

    fn push_step(&mut self, step: SolveStep) -> Option<SolveStep> {
        trace!(target: "solver", "step: {:?}", step);
        self.steps.push(step.clone());
        Some(step)
    }

    fn technique_naked_single(&mut self) -> Option<SolveStep> {
        let puzzle = Rc::clone(&self.puzzle);
        for suspect in &puzzle.suspects {
            if self.placed.contains_key(&suspect.id) {
                continue;
            }
            let candidates = self.get_candidates(&suspect.id);
            if candidates.len() != 1 {
                continue;
            }
            let cell = *candidates.iter().next().unwrap();
            self.place_suspect(&suspect.id, cell);
            return self.push_step(SolveStep {
                technique: Technique::NakedSingle,
                suspect_id: suspect.id.clone(),
                cell_key: Some(cell),
                message: format!("{} can only be at {}", suspect.name, cell),
                highlight_cells: vec![cell],
                eliminated_cells: vec![],
            });
        }
        None
    }

    /// Exactly one unplaced suspect can still use an unoccupied line:
    /// restrict them to it, and place immediately when that leaves a single
    /// cell.
    fn technique_line_single(&mut self, axis: Axis) -> Option<SolveStep> {
        let puzzle = Rc::clone(&self.puzzle);
        for index in 0..puzzle.grid_size {
            if self.placed.values().any(|&p| axis.of(p) == index) {
                continue;
            }
            let mut in_line: Vec<&str> = Vec::new();
            for suspect in &puzzle.suspects {
                if self.placed.contains_key(&suspect.id) {
                    continue;
                }
                if self
                    .get_candidates(&suspect.id)
                    .iter()
                    .any(|&k| axis.of(k) == index)
                {
                    in_line.push(&suspect.id);
                }
            }
            if in_line.len() != 1 {
                continue;
            }
            let only = in_line[0].to_string();

            let candidates = self.get_candidates(&only);
            let restricted: BTreeSet<CellKey> = candidates
                .iter()
                .copied()
                .filter(|&k| axis.of(k) == index)
                .collect();
            let eliminated: Vec<CellKey> = candidates
                .iter()
                .copied()
                .filter(|&k| axis.of(k) != index)
                .collect();
            if eliminated.is_empty() {
                continue;
            }

            self.candidates.insert(only.clone(), restricted.clone());
            if restricted.len() == 1 {
                let cell = *restricted.iter().next().unwrap();
                self.place_suspect(&only, cell);
            } else {
                self.propagate_basic();
            }

            let name = puzzle.suspect_name(&only).to_string();
            return self.push_step(SolveStep {
                technique: axis.single_technique(),
                suspect_id: only.clone(),
                cell_key: self.placed.get(&only).copied(),
                message: format!("Only {} can be in {} {}", name, axis.label(), index + 1),
                highlight_cells: restricted.iter().copied().collect(),
                eliminated_cells: eliminated,
            });
        }
        None
    }

    /// All of a suspect's candidates share one line: nobody else can use it.
    fn technique_claiming(&mut self, axis: Axis) -> Option<SolveStep> {
        let puzzle = Rc::clone(&self.puzzle);
        for suspect in &puzzle.suspects {
            if self.placed.contains_key(&suspect.id) {
                continue;
            }
            let candidates = self.get_candidates(&suspect.id);
            let Some(&first) = candidates.iter().next() else {
                continue;
            };
            let index = axis.of(first);
            if !candidates.iter().all(|&k| axis.of(k) == index) {
                continue;
            }

            let mut eliminated = Vec::new();
            for other in &puzzle.suspects {
                if other.id == suspect.id || self.placed.contains_key(&other.id) {
                    continue;
                }
                if let Some(set) = self.candidates.get_mut(&other.id) {
                    let removed: Vec<CellKey> = set
                        .iter()
                        .copied()
                        .filter(|&k| axis.of(k) == index)
                        .collect();
                    for cell in &removed {
                        set.remove(cell);
                    }
                    eliminated.extend(removed);
                }
            }
            if eliminated.is_empty() {
                continue;
            }
            self.propagate_basic();

            let highlight: Vec<CellKey> =
                self.get_candidates(&suspect.id).iter().copied().collect();
            return self.push_step(SolveStep {
                technique: axis.claiming_technique(),
                suspect_id: suspect.id.clone(),
                cell_key: None,
                message: format!(
                    "{} must be in {} {}, so nobody else can be",
                    suspect.name,
                    axis.label(),
                    index + 1
                ),
                highlight_cells: highlight,
                eliminated_cells: eliminated,
            });
        }
        None
    }

    /// k suspects whose combined candidates cover exactly k lines own those
    /// lines between them. Everyone outside the group loses the lines; and
    /// when the group's cells inside one line collapse to a single cross
    /// line, that cross line is blocked too.
    fn technique_naked_set(&mut self, axis: Axis) -> Option<SolveStep> {
        let puzzle = Rc::clone(&self.puzzle);
        let unplaced: Vec<&str> = puzzle
            .suspects
            .iter()
            .filter(|s| !self.placed.contains_key(&s.id))
            .filter(|s| !self.get_candidates(&s.id).is_empty())
            .map(|s| s.id.as_str())
            .collect();
        if unplaced.len() < 3 {
            return None;
        }
        let cap = (unplaced.len() - 1).min(MAX_NAKED_SET_SIZE);

        for k in 2..=cap {
            for group in unplaced.iter().combinations(k) {
                let lines: BTreeSet<usize> = group
                    .iter()
                    .flat_map(|id| self.get_candidates(id).iter().map(|&c| axis.of(c)))
                    .collect();
                if lines.len() != k {
                    continue;
                }

                // Cross lines fully claimed by the group inside one of its
                // lines.
                let mut blocked_cross: BTreeSet<usize> = BTreeSet::new();
                for &line in &lines {
                    let cross: BTreeSet<usize> = group
                        .iter()
                        .flat_map(|id| {
                            self.get_candidates(id)
                                .iter()
                                .filter(|&&c| axis.of(c) == line)
                                .map(|&c| axis.cross(c))
                        })
                        .collect();
                    if cross.len() == 1 {
                        blocked_cross.insert(*cross.iter().next().unwrap());
                    }
                }

                let mut eliminated = Vec::new();
                for outsider in &unplaced {
                    if group.contains(&outsider) {
                        continue;
                    }
                    if let Some(set) = self.candidates.get_mut(*outsider) {
                        let removed: Vec<CellKey> = set
                            .iter()
                            .copied()
                            .filter(|&c| {
                                lines.contains(&axis.of(c))
                                    || blocked_cross.contains(&axis.cross(c))
                            })
                            .collect();
                        for cell in &removed {
                            set.remove(cell);
                        }
                        eliminated.extend(removed);
                    }
                }
                if eliminated.is_empty() {
                    continue;
                }
                self.propagate_basic();

                let names: Vec<&str> =
                    group.iter().map(|id| puzzle.suspect_name(id)).collect();
                let line_list: Vec<String> =
                    lines.iter().map(|l| (l + 1).to_string()).collect();
                let highlight: Vec<CellKey> = group
                    .iter()
                    .flat_map(|id| self.get_candidates(id).iter().copied())
                    .collect();
                return self.push_step(SolveStep {
                    technique: axis.set_technique(),
                    suspect_id: group[0].to_string(),
                    cell_key: None,
                    message: format!(
                        "{} fill {}s {} between them",
                        names.join(", "),
                        axis.label(),
                        line_list.join(", ")
                    ),
                    highlight_cells: highlight,
                    eliminated_cells: eliminated,
                });
            }
        }
        None
    }

    /// Dynamic room/track constraints (§catalogue). First constraint that
    /// eliminates anything produces the step.
    fn technique_room_constraints(&mut self) -> Option<SolveStep> {
        let puzzle = Rc::clone(&self.puzzle);
        for suspect in &puzzle.suspects {
            for constraint in &suspect.constraints {
                if constraint.is_static()
                    || matches!(
                        constraint,
                        Constraint::OnlyPersonOnCellType { .. } | Constraint::RelativeRow { .. }
                    )
                {
                    continue;
                }
                let eliminations = {
                    let view = StateView {
                        puzzle: &puzzle,
                        board: &self.board,
                        candidates: &self.candidates,
                        placed: &self.placed,
                    };
                    dynamic_eliminations(&view, suspect, constraint)
                };
                if eliminations.values().all(BTreeSet::is_empty) {
                    continue;
                }

                let placed_before = self.placed.contains_key(&suspect.id);
                let mut eliminated = Vec::new();
                for (id, cells) in &eliminations {
                    if let Some(set) = self.candidates.get_mut(id) {
                        for cell in cells {
                            if set.remove(cell) {
                                eliminated.push(*cell);
                            }
                        }
                    }
                }
                if eliminated.is_empty() {
                    continue;
                }
                self.propagate_basic();

                let cell_key = match placed_before {
                    true => None,
                    false => self.placed.get(&suspect.id).copied(),
                };
                let highlight: Vec<CellKey> =
                    self.get_candidates(&suspect.id).iter().copied().collect();
                return self.push_step(SolveStep {
                    technique: Technique::RoomConstraint,
                    suspect_id: suspect.id.clone(),
                    cell_key,
                    message: format!("{} {}", suspect.name, describe(constraint, &puzzle)),
                    highlight_cells: highlight,
                    eliminated_cells: eliminated,
                });
            }
        }
        None
    }

    /// `onlyPersonOnCellType`: strip the type from everyone not themselves
    /// required to stand on it.
    fn technique_only_person_on_type(&mut self) -> Option<SolveStep> {
        let puzzle = Rc::clone(&self.puzzle);
        for suspect in &puzzle.suspects {
            for constraint in &suspect.constraints {
                let Constraint::OnlyPersonOnCellType { cell_type } = constraint else {
                    continue;
                };
                let mut eliminated = Vec::new();
                for other in &puzzle.suspects {
                    if other.id == suspect.id || self.placed.contains_key(&other.id) {
                        continue;
                    }
                    let required_on_type = other.constraints.iter().any(|c| {
                        matches!(c, Constraint::OnCellType { cell_type: t } if t == cell_type)
                    });
                    if required_on_type {
                        continue;
                    }
                    let board = Rc::clone(&self.board);
                    if let Some(set) = self.candidates.get_mut(&other.id) {
                        let removed: Vec<CellKey> = set
                            .iter()
                            .copied()
                            .filter(|&k| board.info(k).cell_type == *cell_type)
                            .collect();
                        for cell in &removed {
                            set.remove(cell);
                        }
                        eliminated.extend(removed);
                    }
                }
                if eliminated.is_empty() {
                    continue;
                }
                self.propagate_basic();

                let highlight: Vec<CellKey> =
                    self.get_candidates(&suspect.id).iter().copied().collect();
                return self.push_step(SolveStep {
                    technique: Technique::OnlyPersonOnType,
                    suspect_id: suspect.id.clone(),
                    cell_key: None,
                    message: format!("{} {}", suspect.name, describe(constraint, &puzzle)),
                    highlight_cells: highlight,
                    eliminated_cells: eliminated,
                });
            }
        }
        None
    }

    /// `relativeRow`: my row equals the other's row plus the offset, enforced
    /// in both directions against each side's current row projection.
    fn technique_relative_row(&mut self) -> Option<SolveStep> {
        let puzzle = Rc::clone(&self.puzzle);
        let size = puzzle.grid_size as i64;
        for suspect in &puzzle.suspects {
            for constraint in &suspect.constraints {
                let Constraint::RelativeRow {
                    suspect: other,
                    row_offset,
                } = constraint
                else {
                    continue;
                };

                let own_rows: BTreeSet<i64> = self
                    .reachable_rows(&suspect.id)
                    .into_iter()
                    .map(|r| r as i64)
                    .collect();
                let other_rows: BTreeSet<i64> = self
                    .reachable_rows(other)
                    .into_iter()
                    .map(|r| r as i64)
                    .collect();

                let own_allowed: BTreeSet<i64> = other_rows
                    .iter()
                    .map(|r| r + row_offset)
                    .filter(|r| (0..size).contains(r))
                    .collect();
                let other_allowed: BTreeSet<i64> = own_rows
                    .iter()
                    .map(|r| r - row_offset)
                    .filter(|r| (0..size).contains(r))
                    .collect();

                let mut eliminated = Vec::new();
                for (id, allowed) in [(&suspect.id, own_allowed), (other, other_allowed)] {
                    if self.placed.contains_key(id.as_str()) {
                        continue;
                    }
                    if let Some(set) = self.candidates.get_mut(id.as_str()) {
                        let removed: Vec<CellKey> = set
                            .iter()
                            .copied()
                            .filter(|k| !allowed.contains(&(k.row as i64)))
                            .collect();
                        for cell in &removed {
                            set.remove(cell);
                        }
                        eliminated.extend(removed);
                    }
                }
                if eliminated.is_empty() {
                    continue;
                }
                let placed_before = self.placed.contains_key(&suspect.id);
                self.propagate_basic();

                let cell_key = match placed_before {
                    true => None,
                    false => self.placed.get(&suspect.id).copied(),
                };
                let highlight: Vec<CellKey> =
                    self.get_candidates(&suspect.id).iter().copied().collect();
                return self.push_step(SolveStep {
                    technique: Technique::RelativeRow,
                    suspect_id: suspect.id.clone(),
                    cell_key,
                    message: format!("{} {}", suspect.name, describe(constraint, &puzzle)),
                    highlight_cells: highlight,
                    eliminated_cells: eliminated,
                });
            }
        }
        None
    }

    fn reachable_rows(&self, suspect_id: &str) -> BTreeSet<usize> {
        match self.placed.get(suspect_id) {
            Some(cell) => BTreeSet::from([cell.row]),
            None => self
                .get_candidates(suspect_id)
                .iter()
                .map(|k| k.row)
                .collect(),
        }
    }

    /// When a suspect's candidates inside one room collapse onto a single
    /// row (column), the suspect cannot use that row (column) in any other
    /// room.
    fn technique_pointing_group(&mut self) -> Option<SolveStep> {
        let puzzle = Rc::clone(&self.puzzle);
        for suspect in &puzzle.suspects {
            if self.placed.contains_key(&suspect.id) {
                continue;
            }
            let mut by_room: BTreeMap<String, Vec<CellKey>> = BTreeMap::new();
            for &cell in self.get_candidates(&suspect.id) {
                by_room
                    .entry(self.board.room_of(cell).clone())
                    .or_default()
                    .push(cell);
            }
            if by_room.len() < 2 {
                continue;
            }

            for (room, cells) in &by_room {
                for axis in [Axis::Row, Axis::Col] {
                    let indices: BTreeSet<usize> =
                        cells.iter().map(|&c| axis.of(c)).collect();
                    if indices.len() != 1 {
                        continue;
                    }
                    let index = *indices.iter().next().unwrap();

                    let board = Rc::clone(&self.board);
                    let Some(set) = self.candidates.get_mut(&suspect.id) else {
                        continue;
                    };
                    let removed: Vec<CellKey> = set
                        .iter()
                        .copied()
                        .filter(|&c| axis.of(c) == index && board.room_of(c) != room)
                        .collect();
                    if removed.is_empty() {
                        continue;
                    }
                    for cell in &removed {
                        set.remove(cell);
                    }
                    self.propagate_basic();

                    let cell_key = self.placed.get(&suspect.id).copied();
                    let highlight: Vec<CellKey> =
                        self.get_candidates(&suspect.id).iter().copied().collect();
                    return self.push_step(SolveStep {
                        technique: Technique::PointingGroup,
                        suspect_id: suspect.id.clone(),
                        cell_key,
                        message: format!(
                            "{}'s spots in the {} all share {} {}",
                            suspect.name,
                            puzzle.room_name(room),
                            axis.label(),
                            index + 1
                        ),
                        highlight_cells: highlight,
                        eliminated_cells: removed,
                    });
                }
            }
        }
        None
    }

    /// Depth-limited hypothetical testing. Each candidate of the tightest
    /// suspect is tried under a snapshot; candidates whose propagation ends
    /// in contradiction are eliminated.
    fn technique_contradiction(&mut self, depth: usize) -> Option<SolveStep> {
        let puzzle = Rc::clone(&self.puzzle);
        let target = puzzle
            .suspects
            .iter()
            .filter(|s| !self.placed.contains_key(&s.id))
            .filter(|s| self.get_candidates(&s.id).len() > 1)
            .min_by_key(|s| self.get_candidates(&s.id).len())?
            .id
            .clone();

        let cells: Vec<CellKey> = self.get_candidates(&target).iter().copied().collect();
        let mut dead_ends = Vec::new();
        for &cell in &cells {
            let snapshot = self.snapshot();
            self.place_suspect(&target, cell);
            self.run_hypothetical(depth);
            let contradictory = self.is_contradictory();
            self.restore(snapshot);
            if contradictory {
                trace!(target: "solver", "{} at {} is a dead end", target, cell);
                dead_ends.push(cell);
            }
        }
        if dead_ends.is_empty() {
            return None;
        }

        if let Some(set) = self.candidates.get_mut(&target) {
            for cell in &dead_ends {
                set.remove(cell);
            }
        }
        self.propagate_basic();

        let name = puzzle.suspect_name(&target).to_string();
        let cell_key = self.placed.get(&target).copied();
        let highlight: Vec<CellKey> = self.get_candidates(&target).iter().copied().collect();
        let dead_list: Vec<String> = dead_ends.iter().map(CellKey::to_string).collect();
        self.push_step(SolveStep {
            technique: Technique::ContradictionElimination,
            suspect_id: target,
            cell_key,
            message: format!(
                "Placing {} at {} leads to a dead end",
                name,
                dead_list.join(" or ")
            ),
            highlight_cells: highlight,
            eliminated_cells: dead_ends,
        })
    }

    /// Propagation loop used inside hypothetical branches: room constraints
    /// first, then the cheaper techniques, with at most one extra level of
    /// contradiction testing.
    fn run_hypothetical(&mut self, depth: usize) {
        for _ in 0..MAX_PROPAGATION_ROUNDS {
            if self.is_contradictory() {
                return;
            }
            let progressed = self
                .technique_room_constraints()
                .or_else(|| self.technique_naked_single())
                .or_else(|| self.technique_line_single(Axis::Row))
                .or_else(|| self.technique_line_single(Axis::Col))
                .or_else(|| self.technique_claiming(Axis::Row))
                .or_else(|| self.technique_claiming(Axis::Col))
                .or_else(|| self.technique_naked_set(Axis::Row))
                .or_else(|| self.technique_naked_set(Axis::Col))
                .or_else(|| self.technique_only_person_on_type())
                .or_else(|| self.technique_relative_row())
                .or_else(|| self.technique_pointing_group())
                .or_else(|| {
                    if depth > 0 {
                        self.technique_contradiction(depth - 1)
                    } else {
                        None
                    }
                })
                .is_some();
            if !progressed {
                return;
            }
        }
    }
}

fn validate_suspects(puzzle: &Puzzle, board: &BoardIndex) -> Result<(), PuzzleError> {
    let mut seen = BTreeSet::new();
    for suspect in &puzzle.suspects {
        if !seen.insert(&suspect.id) {
            return Err(PuzzleError::DuplicateSuspect {
                suspect: suspect.id.clone(),
            });
        }
        for constraint in &suspect.constraints {
            if let Some(other) = constraint.referenced_suspect() {
                if puzzle.suspect(other).is_none() {
                    return Err(PuzzleError::UnknownSuspectReference {
                        referenced_by: suspect.id.clone(),
                        suspect: other.clone(),
                    });
                }
            }
        }
    }
    for (id, pos) in &puzzle.solution {
        if !board.contains(pos.key()) {
            return Err(PuzzleError::SolutionOutOfBounds {
                suspect: id.clone(),
            });
        }
    }
    Ok(())
}

fn validate_placements(
    puzzle: &Puzzle,
    board: &BoardIndex,
    placements: &BTreeMap<CellKey, SuspectId>,
) -> Result<(), PuzzleError> {
    for (&cell, id) in placements {
        if puzzle.suspect(id).is_none() {
            return Err(PuzzleError::UnknownPlacementSuspect {
                suspect: id.clone(),
            });
        }
        if !board.contains(cell) {
            return Err(PuzzleError::PlacementOutOfBounds {
                suspect: id.clone(),
                cell,
            });
        }
        if !board.occupiable.contains(&cell) {
            return Err(PuzzleError::PlacementNotOccupiable {
                suspect: id.clone(),
                cell,
            });
        }
    }
    let entries: Vec<(&CellKey, &SuspectId)> = placements.iter().collect();
    for (i, (cell_a, id_a)) in entries.iter().enumerate() {
        for (cell_b, id_b) in &entries[i + 1..] {
            if id_a == id_b || cell_a.row == cell_b.row || cell_a.col == cell_b.col {
                return Err(PuzzleError::PlacementConflict {
                    suspect: (*id_a).clone(),
                    other: (*id_b).clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use test_context::test_context;

    use super::*;
    use crate::game::tests::{
        attic_puzzle, cross_puzzle, flat_puzzle, garage_puzzle, mirror_puzzle, sprint_puzzle,
        studio_puzzle, suspect,
    };
    use crate::model::{CellType, Gender};
    use crate::tests::UsingLogger;

    fn key(s: &str) -> CellKey {
        CellKey::parse(s).unwrap()
    }

    fn keys(list: &[&str]) -> BTreeSet<CellKey> {
        list.iter().map(|s| key(s)).collect()
    }

    fn solver_for(puzzle: Puzzle) -> Solver {
        Solver::new(Rc::new(puzzle)).unwrap()
    }

    #[test]
    fn test_initialize_applies_static_filters_and_propagates() {
        let mut solver = solver_for(studio_puzzle());
        solver.initialize(&BTreeMap::new()).unwrap();

        // Celia's static filters leave a single carpet cell, so basic
        // propagation places her immediately.
        assert_eq!(solver.placed().get("celia"), Some(&key("2-2")));
        assert_eq!(*solver.get_candidates("celia"), keys(&["2-2"]));

        // Her row and column are gone from everyone else.
        assert_eq!(*solver.get_candidates("amber"), keys(&["0-0", "0-3"]));
        assert_eq!(*solver.get_candidates("bruno"), keys(&["0-0", "1-1"]));
        assert_eq!(*solver.get_candidates("dmitri"), keys(&["0-3", "3-0"]));
    }

    #[test]
    fn test_initialize_rejects_non_occupiable_placement() {
        let mut solver = solver_for(studio_puzzle());
        let placements = BTreeMap::from([(key("0-1"), "amber".to_string())]);
        assert_eq!(
            solver.initialize(&placements),
            Err(PuzzleError::PlacementNotOccupiable {
                suspect: "amber".into(),
                cell: key("0-1")
            })
        );
    }

    #[test]
    fn test_initialize_rejects_unknown_suspect() {
        let mut solver = solver_for(studio_puzzle());
        let placements = BTreeMap::from([(key("0-0"), "zorro".to_string())]);
        assert_eq!(
            solver.initialize(&placements),
            Err(PuzzleError::UnknownPlacementSuspect {
                suspect: "zorro".into()
            })
        );
    }

    #[test]
    fn test_initialize_rejects_line_collision() {
        let mut solver = solver_for(studio_puzzle());
        let placements = BTreeMap::from([
            (key("0-0"), "amber".to_string()),
            (key("0-3"), "bruno".to_string()),
        ]);
        assert!(matches!(
            solver.initialize(&placements),
            Err(PuzzleError::PlacementConflict { .. })
        ));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_studio_solves_with_row_singles(_: &mut UsingLogger) {
        let mut solver = solver_for(studio_puzzle());
        solver.initialize(&BTreeMap::new()).unwrap();
        solver.solve();

        assert!(solver.is_solved());
        assert!(solver.matches_reference());
        let techniques: Vec<Technique> = solver.steps().iter().map(|s| s.technique).collect();
        assert_eq!(techniques, vec![Technique::RowSingle, Technique::RowSingle]);
        let suspects: Vec<&str> = solver
            .steps()
            .iter()
            .map(|s| s.suspect_id.as_str())
            .collect();
        assert_eq!(suspects, vec!["bruno", "dmitri"]);
        assert_eq!(solver.placed().get("amber"), Some(&key("0-3")));
        assert_eq!(solver.placed().get("dmitri"), Some(&key("3-0")));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_garage_solves_with_column_singles_and_relative_row(_: &mut UsingLogger) {
        let mut solver = solver_for(garage_puzzle());
        solver.initialize(&BTreeMap::new()).unwrap();

        // Hector's static filters collapse to the single car cell in an odd
        // column, so he is placed during initialisation.
        assert_eq!(solver.placed().get("hector"), Some(&key("2-3")));

        solver.solve();
        assert!(solver.is_solved());
        assert!(solver.matches_reference());

        let trace: Vec<(Technique, &str)> = solver
            .steps()
            .iter()
            .map(|s| (s.technique, s.suspect_id.as_str()))
            .collect();
        assert_eq!(
            trace,
            vec![
                (Technique::ColumnSingle, "iris"),
                (Technique::ColumnSingle, "jonas"),
                (Technique::RelativeRow, "gina"),
            ]
        );
        assert_eq!(solver.placed().get("jonas"), Some(&key("4-4")));
        assert_eq!(solver.placed().get("lena"), Some(&key("5-1")));
    }

    #[test]
    fn test_solve_is_deterministic() {
        let puzzle = Rc::new(garage_puzzle());
        let run = |puzzle: &Rc<Puzzle>| {
            let mut solver = Solver::new(Rc::clone(puzzle)).unwrap();
            solver.initialize(&BTreeMap::new()).unwrap();
            solver.solve().to_vec()
        };
        assert_eq!(run(&puzzle), run(&puzzle));
    }

    #[test]
    fn test_solve_step_after_solved_is_inert() {
        let mut solver = solver_for(garage_puzzle());
        solver.initialize(&BTreeMap::new()).unwrap();
        solver.solve();
        assert!(solver.is_solved());

        let placed_before = solver.placed().clone();
        let steps_before = solver.steps().len();
        assert_eq!(solver.solve_step(), None);
        assert_eq!(*solver.placed(), placed_before);
        assert_eq!(solver.steps().len(), steps_before);
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let puzzle = garage_puzzle();
        let suspect_ids: Vec<String> =
            puzzle.suspects.iter().map(|s| s.id.clone()).collect();
        let mut solver = solver_for(puzzle);
        solver.initialize(&BTreeMap::new()).unwrap();

        let candidates_before: Vec<BTreeSet<CellKey>> = suspect_ids
            .iter()
            .map(|id| solver.get_candidates(id).clone())
            .collect();
        let placed_before = solver.placed().clone();
        let steps_before = solver.steps().len();

        let snapshot = solver.snapshot();
        solver.solve_step();
        solver.solve_step();
        solver.restore(snapshot);

        let candidates_after: Vec<BTreeSet<CellKey>> = suspect_ids
            .iter()
            .map(|id| solver.get_candidates(id).clone())
            .collect();
        assert_eq!(candidates_after, candidates_before);
        assert_eq!(*solver.placed(), placed_before);
        assert_eq!(solver.steps().len(), steps_before);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_contradiction_elimination_cracks_attic(_: &mut UsingLogger) {
        let mut solver = solver_for(attic_puzzle());
        solver.initialize(&BTreeMap::new()).unwrap();
        solver.solve();

        assert!(solver.is_solved());
        assert!(solver.matches_reference());
        assert!(solver
            .steps()
            .iter()
            .any(|s| s.technique == Technique::ContradictionElimination));
        assert_eq!(solver.placed().get("xavier"), Some(&key("1-2")));
        assert_eq!(solver.placed().get("yara"), Some(&key("0-1")));
        assert_eq!(solver.placed().get("zed"), Some(&key("2-0")));
    }

    #[test]
    fn test_wrong_but_legal_placement_leaves_solver_stuck() {
        let mut solver = solver_for(garage_puzzle());
        // 3-2 is occupiable workshop floor inside Gina's static candidates,
        // but it is not where she belongs.
        let placements = BTreeMap::from([(key("3-2"), "gina".to_string())]);
        solver.initialize(&placements).unwrap();
        solver.solve();

        assert!(!solver.is_solved());
        let unplaced: Vec<&str> = ["frank", "gina", "hector", "iris", "jonas", "lena"]
            .iter()
            .copied()
            .filter(|id| !solver.placed().contains_key(*id))
            .collect();
        assert_eq!(unplaced, vec!["frank", "iris", "lena"]);
    }

    #[test]
    fn test_can_place() {
        let mut solver = solver_for(garage_puzzle());
        solver.initialize(&BTreeMap::new()).unwrap();

        assert!(solver.can_place("frank", key("0-0")));
        assert!(solver.can_place("lena", key("5-0")));
        // Already placed during initialisation.
        assert!(!solver.can_place("hector", key("2-2")));
        // TV is not occupiable.
        assert!(!solver.can_place("frank", key("0-1")));
        // Hector owns row 2.
        assert!(!solver.can_place("iris", key("2-4")));
    }

    #[test]
    fn test_get_cell_candidates_follows_declared_order() {
        let mut solver = solver_for(garage_puzzle());
        solver.initialize(&BTreeMap::new()).unwrap();
        assert_eq!(
            solver.get_cell_candidates(key("4-4")),
            vec!["iris".to_string(), "jonas".to_string()]
        );
    }

    #[test]
    fn test_row_claiming() {
        let puzzle = flat_puzzle(vec![
            suspect("dora", Some(Gender::Female), vec![Constraint::InRow { row: 2 }]),
            suspect("ed", Some(Gender::Male), vec![]),
            suspect("fay", Some(Gender::Female), vec![]),
        ]);
        let mut solver = solver_for(puzzle);
        solver.initialize(&BTreeMap::new()).unwrap();

        let step = solver.solve_step().unwrap();
        assert_eq!(step.technique, Technique::RowClaiming);
        assert_eq!(step.suspect_id, "dora");
        assert_eq!(step.eliminated_cells.len(), 8);
        assert!(solver.get_candidates("ed").iter().all(|k| k.row != 2));
        assert!(solver.get_candidates("fay").iter().all(|k| k.row != 2));
    }

    #[test]
    fn test_naked_column_set() {
        let puzzle = flat_puzzle(vec![
            suspect("arno", None, vec![Constraint::InColumns { cols: vec![0, 1] }]),
            suspect("bela", None, vec![Constraint::InColumns { cols: vec![0, 1] }]),
            suspect("cory", None, vec![]),
            suspect("dana", None, vec![Constraint::InColumns { cols: vec![2, 3] }]),
        ]);
        let mut solver = solver_for(puzzle);
        solver.initialize(&BTreeMap::new()).unwrap();

        let step = solver.solve_step().unwrap();
        assert_eq!(step.technique, Technique::NakedColumnSet);
        assert_eq!(step.suspect_id, "arno");
        // Cory loses the two columns Arno and Bela own between them.
        assert_eq!(step.eliminated_cells.len(), 8);
        assert!(solver.get_candidates("cory").iter().all(|k| k.col >= 2));
        assert_eq!(solver.get_candidates("dana").len(), 8);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_naked_set_blocks_claimed_cross_lines(_: &mut UsingLogger) {
        let mut solver = solver_for(cross_puzzle());
        solver.initialize(&BTreeMap::new()).unwrap();

        let step = solver.solve_step().unwrap();
        assert_eq!(step.technique, Technique::NakedRowSet);
        // Ana and Ben share the two chairs at 0-0 and 1-1: rows 0 and 1 are
        // theirs, and within each claimed row they occupy a single column,
        // so columns 0 and 1 are blocked as well.
        for eliminated in ["2-0", "2-1", "3-0", "3-1", "0-2", "1-3"] {
            assert!(
                step.eliminated_cells.contains(&key(eliminated)),
                "missing {}",
                eliminated
            );
        }
        assert_eq!(
            *solver.get_candidates("cleo"),
            keys(&["2-2", "2-3", "3-2", "3-3"])
        );
        assert_eq!(
            *solver.get_candidates("dov"),
            keys(&["2-2", "2-3", "3-2", "3-3"])
        );
    }

    #[test]
    fn test_only_person_on_type() {
        let puzzle = flat_puzzle(vec![
            suspect(
                "otis",
                Some(Gender::Male),
                vec![Constraint::OnlyPersonOnCellType {
                    cell_type: CellType::Chair,
                }],
            ),
            suspect("pam", Some(Gender::Female), vec![]),
            suspect(
                "quin",
                Some(Gender::Male),
                vec![Constraint::OnCellType {
                    cell_type: CellType::Chair,
                }],
            ),
        ]);
        let mut solver = solver_for(puzzle);
        solver.initialize(&BTreeMap::new()).unwrap();

        let step = solver.solve_step().unwrap();
        assert_eq!(step.technique, Technique::OnlyPersonOnType);
        assert_eq!(step.suspect_id, "otis");
        // Pam loses both chairs; Quin is required to be on one and keeps
        // them.
        assert_eq!(step.eliminated_cells, vec![key("0-2"), key("3-1")]);
        assert_eq!(*solver.get_candidates("quin"), keys(&["0-2", "3-1"]));
    }

    #[test]
    fn test_pointing_group() {
        let puzzle = flat_puzzle(vec![
            suspect("sara", None, vec![Constraint::InRow { row: 0 }]),
            suspect("tom", None, vec![Constraint::InRow { row: 2 }]),
            suspect("uma", None, vec![Constraint::InRow { row: 3 }]),
            suspect("vik", None, vec![Constraint::InRow { row: 1 }]),
        ]);
        let mut solver = solver_for(puzzle);
        solver.initialize(&BTreeMap::new()).unwrap();

        let step = solver.solve_step().unwrap();
        assert_eq!(step.technique, Technique::PointingGroup);
        assert_eq!(step.suspect_id, "sara");
        // Sara's east-wing cells all sit in row 0, which knocks out her
        // row-0 cells in the west wing.
        assert_eq!(step.eliminated_cells, vec![key("0-0"), key("0-1")]);
        assert_eq!(*solver.get_candidates("sara"), keys(&["0-2", "0-3"]));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_ahead_of_prunes_both_racers(_: &mut UsingLogger) {
        let mut solver = solver_for(sprint_puzzle());
        solver.initialize(&BTreeMap::new()).unwrap();

        let step = solver.solve_step().unwrap();
        assert_eq!(step.technique, Technique::RoomConstraint);
        assert_eq!(step.suspect_id, "pia");
        // Pia cannot be at the very back, Quentin cannot be at the very
        // front.
        assert!(step.eliminated_cells.contains(&key("0-0")));
        assert!(step.eliminated_cells.contains(&key("2-2")));
        assert!(!solver.get_candidates("pia").contains(&key("0-0")));
        assert!(!solver.get_candidates("quentin").contains(&key("2-2")));
        assert!(solver.get_candidates("rosa").contains(&key("0-0")));
    }

    #[test]
    fn test_mirror_board_stalls_without_false_progress() {
        let mut solver = solver_for(mirror_puzzle());
        solver.initialize(&BTreeMap::new()).unwrap();
        solver.solve();

        // Two interchangeable pairs: nothing is deducible and nothing gets
        // invented.
        assert!(!solver.is_solved());
        assert!(solver.placed().is_empty());
        assert!(solver.steps().is_empty());
    }
}
