use serde::{Deserialize, Serialize};

use super::{CellType, Gender, RoomId, SuspectId};

/// Closed set of clue constraints. Variants carry suspect *ids*, never
/// references, so the suspect graph stays acyclic in data even when the
/// logical dependency is cyclic.
///
/// Static kinds depend only on board geometry and are applied once when the
/// solver initialises; dynamic kinds are re-evaluated during propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Constraint {
    InRoom {
        room: RoomId,
    },
    InRooms {
        rooms: Vec<RoomId>,
    },
    InRow {
        row: usize,
    },
    InColumns {
        cols: Vec<usize>,
    },
    OnCellType {
        #[serde(rename = "cellType")]
        cell_type: CellType,
    },
    NotOnCellType {
        #[serde(rename = "cellType")]
        cell_type: CellType,
    },
    /// Orthogonally adjacent to a cell of the type, in the same room as it.
    Beside {
        #[serde(rename = "cellType")]
        cell_type: CellType,
    },
    NotBeside {
        #[serde(rename = "cellType")]
        cell_type: CellType,
    },
    /// The only suspect in their room.
    Alone,
    /// Exactly the two suspects occupy their room.
    AloneWith {
        suspect: SuspectId,
    },
    /// The room holds this suspect plus exactly one suspect of the gender.
    AloneWithGender {
        gender: Gender,
    },
    WithPerson {
        suspect: SuspectId,
        room: RoomId,
    },
    /// Some suspect of the gender occupies a cell of the type in the same
    /// room.
    InRoomWithPersonOnCellType {
        gender: Gender,
        #[serde(rename = "cellType")]
        cell_type: CellType,
    },
    /// Some other suspect is beside the type in the same room.
    InRoomWithPersonBesideCellType {
        #[serde(rename = "cellType")]
        cell_type: CellType,
    },
    /// No other suspect sits on the type anywhere on the board.
    OnlyPersonOnCellType {
        #[serde(rename = "cellType")]
        cell_type: CellType,
    },
    /// My row equals the other suspect's row plus the offset.
    RelativeRow {
        suspect: SuspectId,
        #[serde(rename = "rowOffset")]
        row_offset: i64,
    },
    /// My track position is strictly greater than the other suspect's.
    AheadOf {
        suspect: SuspectId,
    },
    /// Shares the room with exactly one other suspect (the murderer).
    Victim,
}

impl Constraint {
    /// Static constraints are pure geometry filters, applied once at
    /// initialisation. Everything else depends on other suspects' positions.
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            Constraint::InRoom { .. }
                | Constraint::InRooms { .. }
                | Constraint::InRow { .. }
                | Constraint::InColumns { .. }
                | Constraint::OnCellType { .. }
                | Constraint::NotOnCellType { .. }
                | Constraint::Beside { .. }
                | Constraint::NotBeside { .. }
        )
    }

    /// The other suspect this constraint refers to, if any.
    pub fn referenced_suspect(&self) -> Option<&SuspectId> {
        match self {
            Constraint::AloneWith { suspect }
            | Constraint::WithPerson { suspect, .. }
            | Constraint::RelativeRow { suspect, .. }
            | Constraint::AheadOf { suspect } => Some(suspect),
            _ => None,
        }
    }
}
