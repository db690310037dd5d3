mod board_index;
mod cell;
mod cell_key;
mod constraint;
mod curated_hint;
mod hint;
mod puzzle;
mod solve_step;
mod suspect;

pub use board_index::{BoardIndex, CellInfo};
pub use cell::{Cell, CellType, RoomId, OCCUPIABLE_TYPES};
pub use cell_key::CellKey;
pub use constraint::Constraint;
pub use curated_hint::{CuratedHint, HintMessages, HintTarget};
pub use hint::{Hint, HintAction};
pub use puzzle::{GridPos, Puzzle, PuzzleError, Room};
pub use solve_step::{SolveStep, Technique};
pub use suspect::{Gender, Suspect, SuspectId};
