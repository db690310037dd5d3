use std::collections::BTreeMap;
use std::collections::BTreeSet;

use super::{CellKey, CellType, Puzzle, PuzzleError, RoomId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellInfo {
    pub row: usize,
    pub col: usize,
    pub room: RoomId,
    pub cell_type: CellType,
}

/// Per-puzzle lookup tables, built once over the 2-D layout and immutable
/// afterwards. Safe to share by reference between solver instances.
///
/// Adjacency is strictly 4-connected, filtered to occupiable cells in the
/// same room.
#[readonly::make]
#[derive(Debug, Clone)]
pub struct BoardIndex {
    pub grid_size: usize,
    pub occupiable: BTreeSet<CellKey>,
    pub cell_info: BTreeMap<CellKey, CellInfo>,
    /// Every cell of the room, occupiable or not.
    pub room_cells: BTreeMap<RoomId, BTreeSet<CellKey>>,
    /// Every cell of the type, occupiable or not.
    pub type_cells: BTreeMap<CellType, BTreeSet<CellKey>>,
    /// Occupiable orthogonal neighbours in the same room.
    pub adjacent_same_room: BTreeMap<CellKey, BTreeSet<CellKey>>,
    /// Occupiable cells per row index.
    pub row_cells: Vec<BTreeSet<CellKey>>,
    /// Occupiable cells per column index.
    pub col_cells: Vec<BTreeSet<CellKey>>,
    beside_type: BTreeMap<CellType, BTreeSet<CellKey>>,
}

impl BoardIndex {
    pub fn build(puzzle: &Puzzle) -> Result<Self, PuzzleError> {
        let n = puzzle.grid_size;
        if puzzle.board_layout.len() != n {
            return Err(PuzzleError::MalformedLayout {
                expected: n,
                rows: puzzle.board_layout.len(),
                row: 0,
                cols: 0,
            });
        }
        for (row, cells) in puzzle.board_layout.iter().enumerate() {
            if cells.len() != n {
                return Err(PuzzleError::MalformedLayout {
                    expected: n,
                    rows: puzzle.board_layout.len(),
                    row,
                    cols: cells.len(),
                });
            }
        }

        let mut occupiable = BTreeSet::new();
        let mut cell_info = BTreeMap::new();
        let mut room_cells: BTreeMap<RoomId, BTreeSet<CellKey>> = BTreeMap::new();
        let mut type_cells: BTreeMap<CellType, BTreeSet<CellKey>> = BTreeMap::new();
        let mut row_cells = vec![BTreeSet::new(); n];
        let mut col_cells = vec![BTreeSet::new(); n];

        for (row, cells) in puzzle.board_layout.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let key = CellKey::new(row, col);
                if !puzzle.rooms.contains_key(&cell.room) {
                    return Err(PuzzleError::UnknownRoom {
                        cell: key,
                        room: cell.room.clone(),
                    });
                }
                cell_info.insert(
                    key,
                    CellInfo {
                        row,
                        col,
                        room: cell.room.clone(),
                        cell_type: cell.cell_type,
                    },
                );
                room_cells.entry(cell.room.clone()).or_default().insert(key);
                type_cells.entry(cell.cell_type).or_default().insert(key);
                if cell.cell_type.is_occupiable() {
                    occupiable.insert(key);
                    row_cells[row].insert(key);
                    col_cells[col].insert(key);
                }
            }
        }

        let mut adjacent_same_room: BTreeMap<CellKey, BTreeSet<CellKey>> = BTreeMap::new();
        for &key in &occupiable {
            let room = &cell_info[&key].room;
            let mut neighbours = BTreeSet::new();
            for other in orthogonal_neighbours(key, n) {
                if occupiable.contains(&other) && &cell_info[&other].room == room {
                    neighbours.insert(other);
                }
            }
            adjacent_same_room.insert(key, neighbours);
        }

        // Occupiable cells orthogonally adjacent to a cell of the type, in
        // that cell's room. The anchor cell itself need not be occupiable.
        let mut beside_type: BTreeMap<CellType, BTreeSet<CellKey>> = BTreeMap::new();
        for (&cell_type, anchors) in &type_cells {
            let mut beside = BTreeSet::new();
            for &anchor in anchors {
                let room = &cell_info[&anchor].room;
                for other in orthogonal_neighbours(anchor, n) {
                    if occupiable.contains(&other) && &cell_info[&other].room == room {
                        beside.insert(other);
                    }
                }
            }
            beside_type.insert(cell_type, beside);
        }

        Ok(Self {
            grid_size: n,
            occupiable,
            cell_info,
            room_cells,
            type_cells,
            adjacent_same_room,
            row_cells,
            col_cells,
            beside_type,
        })
    }

    pub fn info(&self, key: CellKey) -> &CellInfo {
        &self.cell_info[&key]
    }

    pub fn room_of(&self, key: CellKey) -> &RoomId {
        &self.cell_info[&key].room
    }

    /// Occupiable cells beside any cell of the type, same room as that cell.
    pub fn cells_beside_type(&self, cell_type: CellType) -> BTreeSet<CellKey> {
        self.beside_type.get(&cell_type).cloned().unwrap_or_default()
    }

    pub fn cells_of_type(&self, cell_type: CellType) -> BTreeSet<CellKey> {
        self.type_cells.get(&cell_type).cloned().unwrap_or_default()
    }

    pub fn cells_of_room(&self, room: &str) -> BTreeSet<CellKey> {
        self.room_cells.get(room).cloned().unwrap_or_default()
    }

    pub fn contains(&self, key: CellKey) -> bool {
        key.row < self.grid_size && key.col < self.grid_size
    }
}

fn orthogonal_neighbours(key: CellKey, n: usize) -> Vec<CellKey> {
    let mut out = Vec::with_capacity(4);
    if key.row > 0 {
        out.push(CellKey::new(key.row - 1, key.col));
    }
    if key.row + 1 < n {
        out.push(CellKey::new(key.row + 1, key.col));
    }
    if key.col > 0 {
        out.push(CellKey::new(key.row, key.col - 1));
    }
    if key.col + 1 < n {
        out.push(CellKey::new(key.row, key.col + 1));
    }
    out
}
