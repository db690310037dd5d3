use serde::{Deserialize, Serialize};

use super::Constraint;

/// Suspect identifier as declared by the puzzle (`"anthony"`, `"diane"`, ...).
pub type SuspectId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Gender {
    Male,
    Female,
}

/// A placeable entity. `clue` is presentational only; all logic flows from
/// `constraints`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suspect {
    pub id: SuspectId,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub is_victim: bool,
    #[serde(default)]
    pub clue: String,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl Suspect {
    pub fn has_alone_constraint(&self) -> bool {
        self.constraints.iter().any(|c| matches!(c, Constraint::Alone))
    }
}
