use serde::{Deserialize, Serialize};

use super::{CellKey, SuspectId};

/// The deduction techniques, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Technique {
    NakedSingle,
    RowSingle,
    ColumnSingle,
    RowClaiming,
    ColumnClaiming,
    NakedRowSet,
    NakedColumnSet,
    RoomConstraint,
    OnlyPersonOnType,
    RelativeRow,
    PointingGroup,
    ContradictionElimination,
}

/// One unit of the solver trace. Either places a suspect (`cell_key` set),
/// eliminates candidates (`eliminated_cells` non-empty), or both.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveStep {
    pub technique: Technique,
    pub suspect_id: SuspectId,
    pub cell_key: Option<CellKey>,
    pub message: String,
    pub highlight_cells: Vec<CellKey>,
    pub eliminated_cells: Vec<CellKey>,
}

impl std::fmt::Debug for SolveStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.cell_key {
            Some(cell) => write!(f, "{} -> {} ({:?})", self.suspect_id, cell, self.technique),
            None => write!(
                f,
                "{} -{:?} ({:?})",
                self.suspect_id, self.eliminated_cells, self.technique
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_representation() {
        let placement = SolveStep {
            technique: Technique::NakedSingle,
            suspect_id: "brock".into(),
            cell_key: Some(CellKey::new(4, 3)),
            message: String::new(),
            highlight_cells: vec![CellKey::new(4, 3)],
            eliminated_cells: vec![],
        };
        assert_eq!(format!("{:?}", placement), "brock -> 4-3 (NakedSingle)");

        let elimination = SolveStep {
            technique: Technique::RowClaiming,
            suspect_id: "diane".into(),
            cell_key: None,
            message: String::new(),
            highlight_cells: vec![],
            eliminated_cells: vec![CellKey::new(2, 0), CellKey::new(2, 5)],
        };
        assert_eq!(
            format!("{:?}", elimination),
            "diane -[2-0, 2-5] (RowClaiming)"
        );
    }
}
