use std::collections::{BTreeMap, BTreeSet};

use log::trace;

use crate::model::{
    BoardIndex, CellKey, CellType, Constraint, Gender, Puzzle, Suspect, SuspectId,
};

/// Read-only view of solver state handed to the dynamic evaluators.
pub struct StateView<'a> {
    pub puzzle: &'a Puzzle,
    pub board: &'a BoardIndex,
    pub candidates: &'a BTreeMap<SuspectId, BTreeSet<CellKey>>,
    pub placed: &'a BTreeMap<SuspectId, CellKey>,
}

impl StateView<'_> {
    fn candidates_of(&self, id: &str) -> &BTreeSet<CellKey> {
        static EMPTY: BTreeSet<CellKey> = BTreeSet::new();
        self.candidates.get(id).unwrap_or(&EMPTY)
    }

    /// The suspect could end up in the room: placed there, or some candidate
    /// lies inside it.
    pub fn can_be_in_room(&self, id: &str, room: &str) -> bool {
        match self.placed.get(id) {
            Some(&cell) => self.board.room_of(cell) == room,
            None => self
                .candidates_of(id)
                .iter()
                .any(|&k| self.board.room_of(k) == room),
        }
    }

    /// The suspect cannot avoid the room: placed there, or every remaining
    /// candidate lies inside it.
    pub fn forced_in_room(&self, id: &str, room: &str) -> bool {
        match self.placed.get(id) {
            Some(&cell) => self.board.room_of(cell) == room,
            None => {
                let candidates = self.candidates_of(id);
                !candidates.is_empty()
                    && candidates.iter().all(|&k| self.board.room_of(k) == room)
            }
        }
    }

    /// The suspect is placed at the cell or still holds it as a candidate.
    pub fn can_reach(&self, id: &str, cell: CellKey) -> bool {
        match self.placed.get(id) {
            Some(&placed) => placed == cell,
            None => self.candidates_of(id).contains(&cell),
        }
    }

    /// Smallest track position the suspect can still finish at.
    fn min_track_position(&self, id: &str) -> Option<i64> {
        self.reachable_cells(id)
            .filter_map(|k| self.puzzle.track_positions.get(&k).copied())
            .min()
    }

    /// Largest track position the suspect can still finish at.
    fn max_track_position(&self, id: &str) -> Option<i64> {
        self.reachable_cells(id)
            .filter_map(|k| self.puzzle.track_positions.get(&k).copied())
            .max()
    }

    fn reachable_cells<'a>(&'a self, id: &str) -> Box<dyn Iterator<Item = CellKey> + 'a> {
        match self.placed.get(id) {
            Some(&cell) => Box::new(std::iter::once(cell)),
            None => Box::new(self.candidates_of(id).iter().copied()),
        }
    }
}

/// Apply every static filter on the suspect to a starting candidate set.
/// Runs once at initialisation; the result only shrinks afterwards.
pub fn apply_static_filters(
    board: &BoardIndex,
    suspect: &Suspect,
    mut candidates: BTreeSet<CellKey>,
) -> BTreeSet<CellKey> {
    for constraint in suspect.constraints.iter().filter(|c| c.is_static()) {
        match constraint {
            Constraint::InRoom { room } => {
                candidates.retain(|&k| board.room_of(k) == room);
            }
            Constraint::InRooms { rooms } => {
                candidates.retain(|&k| rooms.iter().any(|r| board.room_of(k) == r));
            }
            Constraint::InRow { row } => {
                candidates.retain(|k| k.row == *row);
            }
            Constraint::InColumns { cols } => {
                candidates.retain(|k| cols.contains(&k.col));
            }
            Constraint::OnCellType { cell_type } => {
                candidates.retain(|&k| board.info(k).cell_type == *cell_type);
            }
            Constraint::NotOnCellType { cell_type } => {
                candidates.retain(|&k| board.info(k).cell_type != *cell_type);
            }
            Constraint::Beside { cell_type } => {
                let beside = board.cells_beside_type(*cell_type);
                candidates.retain(|k| beside.contains(k));
            }
            Constraint::NotBeside { cell_type } => {
                let beside = board.cells_beside_type(*cell_type);
                candidates.retain(|k| !beside.contains(k));
            }
            _ => unreachable!("dynamic constraint in static filter pass"),
        }
        trace!(
            target: "catalogue",
            "{} after {:?}: {} candidates",
            suspect.id,
            constraint,
            candidates.len()
        );
    }
    candidates
}

/// Evaluate one dynamic constraint of `suspect`. Returns eliminations keyed
/// by suspect id; constraints that restrict a partner as well (aloneWith,
/// withPerson, aheadOf) return entries for both sides.
///
/// OnlyPersonOnCellType and RelativeRow have dedicated pipeline techniques
/// and are not handled here.
pub fn dynamic_eliminations(
    view: &StateView<'_>,
    suspect: &Suspect,
    constraint: &Constraint,
) -> BTreeMap<SuspectId, BTreeSet<CellKey>> {
    // Single-sided evaluators only restrict the suspect's own candidates;
    // once placed there is nothing left to restrict. Two-sided evaluators
    // (aloneWith, withPerson, aheadOf) still prune the partner and guard the
    // placed side internally.
    if view.placed.contains_key(suspect.id.as_str())
        && !matches!(
            constraint,
            Constraint::AloneWith { .. }
                | Constraint::WithPerson { .. }
                | Constraint::AheadOf { .. }
        )
    {
        return BTreeMap::new();
    }

    match constraint {
        Constraint::Alone => alone_eliminations(view, suspect),
        Constraint::AloneWith { suspect: other } => {
            alone_with_eliminations(view, suspect, other)
        }
        Constraint::AloneWithGender { gender } => {
            alone_with_gender_eliminations(view, suspect, *gender)
        }
        Constraint::WithPerson {
            suspect: other,
            room,
        } => with_person_eliminations(view, suspect, other, room),
        Constraint::InRoomWithPersonOnCellType { gender, cell_type } => {
            with_person_on_type_eliminations(view, suspect, *gender, *cell_type)
        }
        Constraint::InRoomWithPersonBesideCellType { cell_type } => {
            with_person_beside_type_eliminations(view, suspect, *cell_type)
        }
        Constraint::Victim => victim_eliminations(view, suspect),
        Constraint::AheadOf { suspect: other } => {
            ahead_of_eliminations(view, suspect, other)
        }
        _ => BTreeMap::new(),
    }
}

fn single(out: &mut BTreeMap<SuspectId, BTreeSet<CellKey>>, id: &str, cell: CellKey) {
    out.entry(id.to_string()).or_default().insert(cell);
}

/// A candidate room is closed to a loner as soon as anyone else is placed in
/// it or cannot avoid it.
fn alone_eliminations(
    view: &StateView<'_>,
    suspect: &Suspect,
) -> BTreeMap<SuspectId, BTreeSet<CellKey>> {
    let mut out = BTreeMap::new();
    for &cell in view.candidates_of(&suspect.id) {
        let room = view.board.room_of(cell);
        let blocked = view
            .puzzle
            .suspects
            .iter()
            .filter(|other| other.id != suspect.id)
            .any(|other| view.forced_in_room(&other.id, room));
        if blocked {
            single(&mut out, &suspect.id, cell);
        }
    }
    out
}

fn alone_with_eliminations(
    view: &StateView<'_>,
    suspect: &Suspect,
    partner: &str,
) -> BTreeMap<SuspectId, BTreeSet<CellKey>> {
    let mut out = BTreeMap::new();
    let pair = [suspect.id.as_str(), partner];
    for (me, other) in [(pair[0], pair[1]), (pair[1], pair[0])] {
        if view.placed.contains_key(me) {
            continue;
        }
        for &cell in view.candidates_of(me) {
            let room = view.board.room_of(cell);
            let partner_reachable = view.can_be_in_room(other, room);
            let third_forced = view
                .puzzle
                .suspects
                .iter()
                .filter(|s| s.id != me && s.id != other)
                .any(|s| view.forced_in_room(&s.id, room));
            if !partner_reachable || third_forced {
                single(&mut out, me, cell);
            }
        }
    }
    out
}

/// Partner pool: suspects of the gender without their own `alone`
/// constraint. Peers with incompatible room constraints are deliberately not
/// filtered out.
fn alone_with_gender_eliminations(
    view: &StateView<'_>,
    suspect: &Suspect,
    gender: Gender,
) -> BTreeMap<SuspectId, BTreeSet<CellKey>> {
    let partners: Vec<&Suspect> = view
        .puzzle
        .suspects
        .iter()
        .filter(|s| {
            s.id != suspect.id && s.gender == Some(gender) && !s.has_alone_constraint()
        })
        .collect();

    let mut out = BTreeMap::new();
    for &cell in view.candidates_of(&suspect.id) {
        let room = view.board.room_of(cell);
        let partner_reachable = partners
            .iter()
            .any(|p| view.can_be_in_room(&p.id, room));
        let outsider_forced = view
            .puzzle
            .suspects
            .iter()
            .filter(|s| s.id != suspect.id && !partners.iter().any(|p| p.id == s.id))
            .any(|s| view.forced_in_room(&s.id, room));
        if !partner_reachable || outsider_forced {
            single(&mut out, &suspect.id, cell);
        }
    }
    out
}

fn with_person_eliminations(
    view: &StateView<'_>,
    suspect: &Suspect,
    other: &str,
    room: &str,
) -> BTreeMap<SuspectId, BTreeSet<CellKey>> {
    let mut out = BTreeMap::new();
    for id in [suspect.id.as_str(), other] {
        if view.placed.contains_key(id) {
            continue;
        }
        for &cell in view.candidates_of(id) {
            if view.board.room_of(cell) != room {
                single(&mut out, id, cell);
            }
        }
    }
    out
}

fn with_person_on_type_eliminations(
    view: &StateView<'_>,
    suspect: &Suspect,
    gender: Gender,
    cell_type: CellType,
) -> BTreeMap<SuspectId, BTreeSet<CellKey>> {
    let witnesses: Vec<&Suspect> = view
        .puzzle
        .suspects
        .iter()
        .filter(|s| s.gender == Some(gender))
        .collect();

    let mut out = BTreeMap::new();
    for &cell in view.candidates_of(&suspect.id) {
        let room = view.board.room_of(cell);
        let satisfiable = view
            .board
            .cells_of_type(cell_type)
            .into_iter()
            .filter(|&t| view.board.occupiable.contains(&t) && view.board.room_of(t) == room)
            .any(|t| witnesses.iter().any(|w| view.can_reach(&w.id, t)));
        if !satisfiable {
            single(&mut out, &suspect.id, cell);
        }
    }
    out
}

fn with_person_beside_type_eliminations(
    view: &StateView<'_>,
    suspect: &Suspect,
    cell_type: CellType,
) -> BTreeMap<SuspectId, BTreeSet<CellKey>> {
    let beside = view.board.cells_beside_type(cell_type);

    let mut out = BTreeMap::new();
    for &cell in view.candidates_of(&suspect.id) {
        let room = view.board.room_of(cell);
        let satisfiable = beside
            .iter()
            .filter(|&&b| view.board.room_of(b) == room)
            .any(|&b| {
                view.puzzle
                    .suspects
                    .iter()
                    .filter(|s| s.id != suspect.id)
                    .any(|s| view.can_reach(&s.id, b))
            });
        if !satisfiable {
            single(&mut out, &suspect.id, cell);
        }
    }
    out
}

/// The victim shares their room with exactly one other suspect. A candidate
/// room must admit at least one companion and must not have two or more
/// suspects locked into it.
fn victim_eliminations(
    view: &StateView<'_>,
    suspect: &Suspect,
) -> BTreeMap<SuspectId, BTreeSet<CellKey>> {
    let mut out = BTreeMap::new();
    for &cell in view.candidates_of(&suspect.id) {
        let room = view.board.room_of(cell);
        let others = view
            .puzzle
            .suspects
            .iter()
            .filter(|s| s.id != suspect.id);
        let mut available = 0usize;
        let mut forced = 0usize;
        for other in others {
            if view.can_be_in_room(&other.id, room) {
                available += 1;
            }
            if view.forced_in_room(&other.id, room) {
                forced += 1;
            }
        }
        if available == 0 || forced >= 2 {
            single(&mut out, &suspect.id, cell);
        }
    }
    out
}

/// Racing order. Own candidates at or behind the peer's minimum feasible
/// position fall away; peer candidates at or past our maximum do, too.
/// Cells without a track position are untouched.
fn ahead_of_eliminations(
    view: &StateView<'_>,
    suspect: &Suspect,
    peer: &str,
) -> BTreeMap<SuspectId, BTreeSet<CellKey>> {
    let mut out = BTreeMap::new();

    if let Some(peer_min) = view.min_track_position(peer) {
        if !view.placed.contains_key(suspect.id.as_str()) {
            for &cell in view.candidates_of(&suspect.id) {
                if let Some(&pos) = view.puzzle.track_positions.get(&cell) {
                    if pos <= peer_min {
                        single(&mut out, &suspect.id, cell);
                    }
                }
            }
        }
    }

    if let Some(own_max) = view.max_track_position(&suspect.id) {
        if !view.placed.contains_key(peer) {
            for &cell in view.candidates_of(peer) {
                if let Some(&pos) = view.puzzle.track_positions.get(&cell) {
                    if pos >= own_max {
                        single(&mut out, peer, cell);
                    }
                }
            }
        }
    }

    out
}

/// Human-readable rendering of a constraint, used inside diagnostic and
/// solver-step messages.
pub fn describe(constraint: &Constraint, puzzle: &Puzzle) -> String {
    match constraint {
        Constraint::InRoom { room } => format!("is in the {}", puzzle.room_name(room)),
        Constraint::InRooms { rooms } => {
            let names: Vec<&str> = rooms.iter().map(|r| puzzle.room_name(r)).collect();
            format!("is in the {}", names.join(" or the "))
        }
        Constraint::InRow { row } => format!("is in row {}", row + 1),
        Constraint::InColumns { cols } => {
            let names: Vec<String> = cols.iter().map(|c| (c + 1).to_string()).collect();
            format!("is in column {}", names.join(" or "))
        }
        Constraint::OnCellType { cell_type } => format!("is on a {}", cell_type.label()),
        Constraint::NotOnCellType { cell_type } => {
            format!("is not on a {}", cell_type.label())
        }
        Constraint::Beside { cell_type } => format!("is beside a {}", cell_type.label()),
        Constraint::NotBeside { cell_type } => {
            format!("is not beside a {}", cell_type.label())
        }
        Constraint::Alone => "is alone in their room".to_string(),
        Constraint::AloneWith { suspect } => {
            format!("is alone with {}", puzzle.suspect_name(suspect))
        }
        Constraint::AloneWithGender { gender } => match gender {
            Gender::Male => "is alone with one man".to_string(),
            Gender::Female => "is alone with one woman".to_string(),
        },
        Constraint::WithPerson { suspect, room } => format!(
            "is with {} in the {}",
            puzzle.suspect_name(suspect),
            puzzle.room_name(room)
        ),
        Constraint::InRoomWithPersonOnCellType { gender, cell_type } => {
            let who = match gender {
                Gender::Male => "a man",
                Gender::Female => "a woman",
            };
            format!("shares a room with {} on a {}", who, cell_type.label())
        }
        Constraint::InRoomWithPersonBesideCellType { cell_type } => format!(
            "shares a room with someone beside a {}",
            cell_type.label()
        ),
        Constraint::OnlyPersonOnCellType { cell_type } => {
            format!("is the only one on a {}", cell_type.label())
        }
        Constraint::RelativeRow { suspect, row_offset } => {
            let name = puzzle.suspect_name(suspect);
            match row_offset {
                0 => format!("is in the same row as {}", name),
                o if *o < 0 => format!("is {} row(s) above {}", -o, name),
                o => format!("is {} row(s) below {}", o, name),
            }
        }
        Constraint::AheadOf { suspect } => {
            format!("is ahead of {}", puzzle.suspect_name(suspect))
        }
        Constraint::Victim => "shares their room with exactly one other".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tests::{flat_puzzle, sprint_puzzle, studio_puzzle, suspect};
    use crate::model::CellKey;

    fn room_half(board: &BoardIndex, room: &str) -> BTreeSet<CellKey> {
        board
            .occupiable
            .iter()
            .copied()
            .filter(|&k| board.room_of(k) == room)
            .collect()
    }

    struct Fixture {
        puzzle: Puzzle,
        board: BoardIndex,
        candidates: BTreeMap<SuspectId, BTreeSet<CellKey>>,
        placed: BTreeMap<SuspectId, CellKey>,
    }

    impl Fixture {
        fn new(puzzle: Puzzle) -> Self {
            let board = BoardIndex::build(&puzzle).unwrap();
            let candidates = puzzle
                .suspects
                .iter()
                .map(|s| (s.id.clone(), board.occupiable.clone()))
                .collect();
            Self {
                puzzle,
                board,
                candidates,
                placed: BTreeMap::new(),
            }
        }

        fn restrict(&mut self, id: &str, cells: BTreeSet<CellKey>) {
            self.candidates.insert(id.to_string(), cells);
        }

        fn eliminations(&self, id: &str) -> BTreeMap<SuspectId, BTreeSet<CellKey>> {
            let view = StateView {
                puzzle: &self.puzzle,
                board: &self.board,
                candidates: &self.candidates,
                placed: &self.placed,
            };
            let suspect = self.puzzle.suspect(id).unwrap();
            let constraint = suspect
                .constraints
                .iter()
                .find(|c| !c.is_static())
                .unwrap();
            dynamic_eliminations(&view, suspect, constraint)
        }
    }

    #[test]
    fn test_alone_blocks_rooms_with_forced_others() {
        let fixture = {
            let puzzle = flat_puzzle(vec![
                suspect("wanda", Some(Gender::Female), vec![Constraint::Alone]),
                suspect(
                    "vic",
                    Some(Gender::Male),
                    vec![Constraint::InRoom {
                        room: "west".into(),
                    }],
                ),
                suspect("una", Some(Gender::Female), vec![]),
            ]);
            let mut f = Fixture::new(puzzle);
            let west = room_half(&f.board, "west");
            f.restrict("vic", west);
            f
        };

        // Vic cannot avoid the west wing, so a loner cannot use it; the east
        // wing stays open.
        let eliminations = fixture.eliminations("wanda");
        assert_eq!(eliminations[&"wanda".to_string()], room_half(&fixture.board, "west"));
    }

    #[test]
    fn test_alone_with_restricts_both_partners() {
        let puzzle = flat_puzzle(vec![
            suspect(
                "sam",
                Some(Gender::Male),
                vec![Constraint::AloneWith {
                    suspect: "tara".into(),
                }],
            ),
            suspect("tara", Some(Gender::Female), vec![]),
            suspect(
                "hank",
                Some(Gender::Male),
                vec![Constraint::InRoom {
                    room: "west".into(),
                }],
            ),
        ]);
        let mut fixture = Fixture::new(puzzle);
        let west = room_half(&fixture.board, "west");
        fixture.restrict("hank", west.clone());

        // Hank is locked into the west wing, so neither half of the pair can
        // be there.
        let eliminations = fixture.eliminations("sam");
        assert_eq!(eliminations[&"sam".to_string()], west);
        assert_eq!(eliminations[&"tara".to_string()], west);
    }

    #[test]
    fn test_alone_with_gender_excludes_loner_partners() {
        let puzzle = flat_puzzle(vec![
            suspect(
                "sam",
                Some(Gender::Male),
                vec![Constraint::AloneWithGender {
                    gender: Gender::Female,
                }],
            ),
            suspect("faye", Some(Gender::Female), vec![]),
            suspect("gail", Some(Gender::Female), vec![Constraint::Alone]),
            suspect("hank", Some(Gender::Male), vec![]),
        ]);
        let mut fixture = Fixture::new(puzzle);
        let east = room_half(&fixture.board, "east");
        fixture.restrict("faye", east);

        // Gail carries her own alone constraint and is no partner; with Faye
        // confined to the east wing, the west wing has no partner at all.
        let eliminations = fixture.eliminations("sam");
        assert_eq!(eliminations[&"sam".to_string()], room_half(&fixture.board, "west"));
    }

    #[test]
    fn test_with_person_confines_both_to_the_room() {
        let puzzle = flat_puzzle(vec![
            suspect(
                "sam",
                Some(Gender::Male),
                vec![Constraint::WithPerson {
                    suspect: "tara".into(),
                    room: "east".into(),
                }],
            ),
            suspect("tara", Some(Gender::Female), vec![]),
        ]);
        let fixture = Fixture::new(puzzle);

        let eliminations = fixture.eliminations("sam");
        let west = room_half(&fixture.board, "west");
        assert_eq!(eliminations[&"sam".to_string()], west);
        assert_eq!(eliminations[&"tara".to_string()], west);
    }

    #[test]
    fn test_in_room_with_person_on_cell_type() {
        let puzzle = flat_puzzle(vec![
            suspect(
                "rex",
                Some(Gender::Male),
                vec![Constraint::InRoomWithPersonOnCellType {
                    gender: Gender::Female,
                    cell_type: CellType::Chair,
                }],
            ),
            suspect("faye", Some(Gender::Female), vec![]),
            suspect("hank", Some(Gender::Male), vec![]),
        ]);
        let mut fixture = Fixture::new(puzzle);
        let west = room_half(&fixture.board, "west");
        fixture.restrict("faye", west);

        // The east chair at 0-2 is out of Faye's reach, so Rex cannot be in
        // the east wing; the west chair at 3-1 is still hers to take.
        let eliminations = fixture.eliminations("rex");
        assert_eq!(eliminations[&"rex".to_string()], room_half(&fixture.board, "east"));
    }

    #[test]
    fn test_in_room_with_person_beside_cell_type() {
        let puzzle = flat_puzzle(vec![
            suspect(
                "rex",
                Some(Gender::Male),
                vec![Constraint::InRoomWithPersonBesideCellType {
                    cell_type: CellType::Chair,
                }],
            ),
            suspect("tara", Some(Gender::Female), vec![]),
        ]);
        let mut fixture = Fixture::new(puzzle);
        fixture.restrict("tara", BTreeSet::from([CellKey::new(0, 3)]));

        // Tara can only sit beside the east chair, so the west wing has no
        // witness beside a chair.
        let eliminations = fixture.eliminations("rex");
        assert_eq!(eliminations[&"rex".to_string()], room_half(&fixture.board, "west"));
    }

    #[test]
    fn test_victim_needs_exactly_one_companion() {
        let puzzle = flat_puzzle(vec![
            suspect("vera", Some(Gender::Female), vec![Constraint::Victim]),
            suspect(
                "mona",
                Some(Gender::Female),
                vec![Constraint::InRoom {
                    room: "east".into(),
                }],
            ),
            suspect(
                "nate",
                Some(Gender::Male),
                vec![Constraint::InRoom {
                    room: "east".into(),
                }],
            ),
        ]);
        let mut fixture = Fixture::new(puzzle);
        let east = room_half(&fixture.board, "east");
        fixture.restrict("mona", east.clone());
        fixture.restrict("nate", east);

        // West offers no companion at all; east has two suspects locked in.
        // Both fail the exactly-one rule.
        let eliminations = fixture.eliminations("vera");
        assert_eq!(eliminations[&"vera".to_string()], fixture.board.occupiable);
    }

    #[test]
    fn test_ahead_of_prunes_by_track_position() {
        let fixture = Fixture::new(sprint_puzzle());

        // Pia cannot share the minimum with Quentin, and Quentin cannot sit
        // at Pia's maximum.
        let eliminations = fixture.eliminations("pia");
        assert_eq!(
            eliminations[&"pia".to_string()],
            BTreeSet::from([CellKey::new(0, 0)])
        );
        assert_eq!(
            eliminations[&"quentin".to_string()],
            BTreeSet::from([CellKey::new(2, 2)])
        );
    }

    #[test]
    fn test_static_filters_compose() {
        let puzzle = studio_puzzle();
        let board = BoardIndex::build(&puzzle).unwrap();

        // bruno: lounge + beside TV.
        let bruno = puzzle.suspect("bruno").unwrap();
        let candidates = apply_static_filters(&board, bruno, board.occupiable.clone());
        let expected: BTreeSet<CellKey> = [CellKey::new(0, 0), CellKey::new(1, 1)]
            .into_iter()
            .collect();
        assert_eq!(candidates, expected);

        // celia: kitchen + carpet narrows to a single cell.
        let celia = puzzle.suspect("celia").unwrap();
        let candidates = apply_static_filters(&board, celia, board.occupiable.clone());
        let expected: BTreeSet<CellKey> = [CellKey::new(2, 2)].into_iter().collect();
        assert_eq!(candidates, expected);
    }

    #[test]
    fn test_describe_names_rooms_and_suspects() {
        let puzzle = studio_puzzle();
        assert_eq!(
            describe(
                &Constraint::InRoom {
                    room: "kitchen".into()
                },
                &puzzle
            ),
            "is in the Kitchen"
        );
        assert_eq!(
            describe(
                &Constraint::AloneWith {
                    suspect: "amber".into()
                },
                &puzzle
            ),
            "is alone with Amber"
        );
        assert_eq!(
            describe(
                &Constraint::Beside {
                    cell_type: CellType::Tv
                },
                &puzzle
            ),
            "is beside a TV"
        );
    }
}
