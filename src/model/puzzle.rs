use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Cell, CellKey, CuratedHint, RoomId, Suspect, SuspectId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub color: String,
}

/// A `{row, col}` pair as it appears in the reference solution map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub fn key(&self) -> CellKey {
        CellKey::new(self.row, self.col)
    }
}

/// Immutable puzzle description. Construction does not validate; the board
/// index builder and the solver do, so a malformed puzzle fails with a
/// programmer-facing [`PuzzleError`] before any solving happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub difficulty: String,
    pub grid_size: usize,
    pub board_layout: Vec<Vec<Cell>>,
    pub rooms: BTreeMap<RoomId, Room>,
    pub suspects: Vec<Suspect>,
    /// Reference solution, for validation and debug tooling only.
    #[serde(default)]
    pub solution: BTreeMap<SuspectId, GridPos>,
    #[serde(default)]
    pub hints: Vec<CuratedHint>,
    /// Per-cell integer rank used by racing-order clues.
    #[serde(default)]
    pub track_positions: BTreeMap<CellKey, i64>,
    #[serde(default)]
    pub victim: Option<SuspectId>,
    #[serde(default)]
    pub murderer: Option<SuspectId>,
    #[serde(default)]
    pub crime_room: Option<RoomId>,
}

impl Puzzle {
    pub fn suspect(&self, id: &str) -> Option<&Suspect> {
        self.suspects.iter().find(|s| s.id == id)
    }

    /// Display name for a suspect, falling back to the raw id.
    pub fn suspect_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.suspect(id).map(|s| s.name.as_str()).unwrap_or(id)
    }

    /// Display name for a room, falling back to the raw id.
    pub fn room_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.rooms.get(id).map(|r| r.name.as_str()).unwrap_or(id)
    }

    /// The reference cell for a suspect, if the puzzle carries a solution.
    pub fn reference_cell(&self, id: &str) -> Option<CellKey> {
        self.solution.get(id).map(GridPos::key)
    }
}

/// Construction-time validation failures. Distinct from "the puzzle cannot
/// be solved from here", which is a normal solver outcome, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    MalformedLayout {
        expected: usize,
        rows: usize,
        row: usize,
        cols: usize,
    },
    UnknownRoom {
        cell: CellKey,
        room: RoomId,
    },
    DuplicateSuspect {
        suspect: SuspectId,
    },
    UnknownSuspectReference {
        referenced_by: SuspectId,
        suspect: SuspectId,
    },
    SolutionOutOfBounds {
        suspect: SuspectId,
    },
    UnknownPlacementSuspect {
        suspect: SuspectId,
    },
    PlacementOutOfBounds {
        suspect: SuspectId,
        cell: CellKey,
    },
    PlacementNotOccupiable {
        suspect: SuspectId,
        cell: CellKey,
    },
    PlacementConflict {
        suspect: SuspectId,
        other: SuspectId,
    },
}

impl fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PuzzleError::MalformedLayout {
                expected,
                rows,
                row,
                cols,
            } => write!(
                f,
                "board layout is not {expected}x{expected}: {rows} rows, row {row} has {cols} cells"
            ),
            PuzzleError::UnknownRoom { cell, room } => {
                write!(f, "cell {cell} references unknown room '{room}'")
            }
            PuzzleError::DuplicateSuspect { suspect } => {
                write!(f, "duplicate suspect id '{suspect}'")
            }
            PuzzleError::UnknownSuspectReference {
                referenced_by,
                suspect,
            } => write!(
                f,
                "constraint on '{referenced_by}' references unknown suspect '{suspect}'"
            ),
            PuzzleError::SolutionOutOfBounds { suspect } => {
                write!(f, "solution cell for '{suspect}' is out of bounds")
            }
            PuzzleError::UnknownPlacementSuspect { suspect } => {
                write!(f, "placement references unknown suspect '{suspect}'")
            }
            PuzzleError::PlacementOutOfBounds { suspect, cell } => {
                write!(f, "placement of '{suspect}' at {cell} is out of bounds")
            }
            PuzzleError::PlacementNotOccupiable { suspect, cell } => {
                write!(f, "placement of '{suspect}' at {cell} is not an occupiable cell")
            }
            PuzzleError::PlacementConflict { suspect, other } => write!(
                f,
                "placements of '{suspect}' and '{other}' share a cell, row or column"
            ),
        }
    }
}

impl std::error::Error for PuzzleError {}
