mod debug_state;
mod hint_engine;

pub use debug_state::{get_debug_state, solve_from_state, DebugState, SolveReport};
pub use hint_engine::{filter_by_target, get_next_hint};
