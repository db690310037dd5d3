use serde::{Deserialize, Serialize};

use super::{CellType, RoomId, SuspectId};

/// Target specifier of a curated hint: which of the suspect's candidates the
/// hint is talking about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HintTarget {
    Room {
        room: RoomId,
    },
    Rooms {
        rooms: Vec<RoomId>,
    },
    CellType {
        #[serde(rename = "cellType")]
        cell_type: CellType,
        #[serde(default)]
        room: Option<RoomId>,
    },
    AdjacentTo {
        #[serde(rename = "cellType")]
        cell_type: CellType,
    },
    Row {
        row: usize,
    },
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintMessages {
    pub single: String,
    pub multiple: String,
    /// Used when only one room of an `inRooms` constraint remains viable;
    /// supports `{blockedRooms}` and `{availableRoom}` placeholders.
    #[serde(default)]
    pub room_blocked: Option<String>,
}

/// One entry of a puzzle's scripted hint list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuratedHint {
    pub suspect: SuspectId,
    pub order: i64,
    #[serde(default)]
    pub prerequisites: Vec<SuspectId>,
    pub target: HintTarget,
    pub messages: HintMessages,
    /// Skip this hint while the raw candidate narrowing is still wider than
    /// the threshold.
    #[serde(default)]
    pub skip_if_more_than: Option<usize>,
}
