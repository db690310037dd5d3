use serde::{Deserialize, Serialize};

use super::{CellKey, SuspectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HintAction {
    Place,
    Eliminate,
}

/// Player-facing hint envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
    pub highlight_cells: Vec<CellKey>,
    pub suspect: Option<SuspectId>,
    pub action: Option<HintAction>,
}

impl Hint {
    pub fn all_placed() -> Self {
        Self {
            message: "Everyone is on the board. Check your answer!".to_string(),
            highlight_cells: vec![],
            suspect: None,
            action: None,
        }
    }
}
