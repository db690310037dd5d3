use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use log::trace;

use crate::helpers::fill_template;
use crate::model::{
    BoardIndex, CellKey, Constraint, CuratedHint, Hint, HintAction, HintTarget, Puzzle,
    PuzzleError, SuspectId,
};
use crate::solver::Solver;

/// Pick the next player-facing hint.
///
/// Two solver instances share the board index: `raw` reflects only the
/// host's placements (plus basic propagation), `solved` is driven to
/// completion. Curated hints are matched against the solved narrowing but
/// worded against the raw one; when no curated hint applies, the raw
/// solver's next step is translated into the same envelope.
pub fn get_next_hint(
    puzzle: &Rc<Puzzle>,
    placements: &BTreeMap<CellKey, SuspectId>,
) -> Result<Hint, PuzzleError> {
    let all_placed = puzzle
        .suspects
        .iter()
        .all(|s| placements.values().any(|id| *id == s.id));
    if all_placed {
        return Ok(Hint::all_placed());
    }

    let board = Rc::new(BoardIndex::build(puzzle)?);
    let mut raw = Solver::with_board(Rc::clone(puzzle), Rc::clone(&board))?;
    raw.initialize(placements)?;
    let mut solved = Solver::with_board(Rc::clone(puzzle), Rc::clone(&board))?;
    solved.initialize(placements)?;
    solved.solve();

    let mut curated: Vec<&CuratedHint> = puzzle.hints.iter().collect();
    curated.sort_by_key(|h| h.order);
    for hint in curated {
        if placements.values().any(|id| *id == hint.suspect) {
            continue;
        }
        let prerequisites_met = hint
            .prerequisites
            .iter()
            .all(|p| placements.values().any(|id| id == p));
        if !prerequisites_met {
            continue;
        }

        let narrowed =
            filter_by_target(solved.get_candidates(&hint.suspect), &hint.target, &board);
        if narrowed.is_empty() {
            continue;
        }
        let raw_narrowed =
            filter_by_target(raw.get_candidates(&hint.suspect), &hint.target, &board);
        if let Some(cap) = hint.skip_if_more_than {
            if raw_narrowed.len() > cap {
                trace!(
                    target: "hints",
                    "skipping hint for {}: {} raw candidates > {}",
                    hint.suspect,
                    raw_narrowed.len(),
                    cap
                );
                continue;
            }
        }

        let message = choose_message(hint, raw_narrowed.len(), &solved, puzzle, &board);
        let action = match narrowed.len() {
            1 => HintAction::Place,
            _ => HintAction::Eliminate,
        };
        return Ok(Hint {
            message,
            highlight_cells: narrowed.iter().copied().collect(),
            suspect: Some(hint.suspect.clone()),
            action: Some(action),
        });
    }

    if let Some(step) = raw.solve_step() {
        let action = match step.cell_key {
            Some(_) => HintAction::Place,
            None => HintAction::Eliminate,
        };
        let highlight_cells = match step.cell_key {
            Some(cell) => vec![cell],
            None => step.highlight_cells,
        };
        return Ok(Hint {
            message: step.message,
            highlight_cells,
            suspect: Some(step.suspect_id),
            action: Some(action),
        });
    }

    // Nothing deducible: echo the clue of the tightest unplaced suspect.
    let fallback = puzzle
        .suspects
        .iter()
        .filter(|s| !placements.values().any(|id| *id == s.id))
        .min_by_key(|s| raw.get_candidates(&s.id).len());
    match fallback {
        Some(suspect) => Ok(Hint {
            message: suspect.clue.clone(),
            highlight_cells: raw.get_candidates(&suspect.id).iter().copied().collect(),
            suspect: Some(suspect.id.clone()),
            action: None,
        }),
        None => Ok(Hint::all_placed()),
    }
}

/// Pick between the single/multiple/roomBlocked wordings. The roomBlocked
/// template wins when the suspect has an `inRooms` constraint and the solved
/// state leaves exactly one of its rooms viable.
fn choose_message(
    hint: &CuratedHint,
    raw_count: usize,
    solved: &Solver,
    puzzle: &Puzzle,
    board: &BoardIndex,
) -> String {
    if let Some(template) = &hint.messages.room_blocked {
        let in_rooms = puzzle
            .suspect(&hint.suspect)
            .and_then(|s| {
                s.constraints
                    .iter()
                    .find(|c| matches!(c, Constraint::InRooms { .. }))
            });
        if let Some(Constraint::InRooms { rooms }) = in_rooms {
            let viable: Vec<&String> = rooms
                .iter()
                .filter(|room| {
                    solved
                        .get_candidates(&hint.suspect)
                        .iter()
                        .any(|&k| board.room_of(k) == *room)
                })
                .collect();
            if viable.len() == 1 {
                let available = puzzle.room_name(viable[0]);
                let blocked: Vec<&str> = rooms
                    .iter()
                    .filter(|room| *room != viable[0])
                    .map(|room| puzzle.room_name(room))
                    .collect();
                return fill_template(
                    template,
                    &[
                        ("blockedRooms", blocked.join(", ").as_str()),
                        ("availableRoom", available),
                    ],
                );
            }
        }
    }

    if raw_count <= 1 {
        hint.messages.single.clone()
    } else {
        hint.messages.multiple.clone()
    }
}

/// Intersect a candidate set with a curated hint's target specifier.
pub fn filter_by_target(
    candidates: &BTreeSet<CellKey>,
    target: &HintTarget,
    board: &BoardIndex,
) -> BTreeSet<CellKey> {
    match target {
        HintTarget::Any => candidates.clone(),
        HintTarget::Room { room } => candidates
            .iter()
            .copied()
            .filter(|&k| board.room_of(k) == room)
            .collect(),
        HintTarget::Rooms { rooms } => candidates
            .iter()
            .copied()
            .filter(|&k| rooms.iter().any(|room| board.room_of(k) == room))
            .collect(),
        HintTarget::CellType { cell_type, room } => candidates
            .iter()
            .copied()
            .filter(|&k| board.info(k).cell_type == *cell_type)
            .filter(|&k| match room {
                Some(room) => board.room_of(k) == room,
                None => true,
            })
            .collect(),
        HintTarget::AdjacentTo { cell_type } => {
            let beside = board.cells_beside_type(*cell_type);
            candidates.intersection(&beside).copied().collect()
        }
        HintTarget::Row { row } => candidates
            .iter()
            .copied()
            .filter(|k| k.row == *row)
            .collect(),
    }
}
