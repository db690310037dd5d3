use serde::{Deserialize, Serialize};

/// Room identifier as declared by the puzzle (`"garage"`, `"bedroom"`, ...).
pub type RoomId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellType {
    Empty,
    Carpet,
    Chair,
    Tv,
    Shelf,
    Table,
    Flowers,
    LilyPad,
    Tree,
    Bush,
    Bed,
    Couch,
    PondWater,
    Horse,
    Plant,
    Track,
    FinishingLine,
    OilSlick,
    Bonsai,
    Cactus,
    Shrub,
    Path,
    Box,
    Car,
}

/// The authoritative set of cell types a suspect may stand on. Fixed across
/// puzzles.
pub const OCCUPIABLE_TYPES: [CellType; 10] = [
    CellType::Empty,
    CellType::Carpet,
    CellType::Chair,
    CellType::PondWater,
    CellType::Horse,
    CellType::Path,
    CellType::OilSlick,
    CellType::Car,
    CellType::Bed,
    CellType::Track,
];

impl CellType {
    pub fn is_occupiable(self) -> bool {
        OCCUPIABLE_TYPES.contains(&self)
    }

    /// Lowercase label used inside diagnostic and hint messages.
    pub fn label(self) -> &'static str {
        match self {
            CellType::Empty => "empty floor",
            CellType::Carpet => "carpet",
            CellType::Chair => "chair",
            CellType::Tv => "TV",
            CellType::Shelf => "shelf",
            CellType::Table => "table",
            CellType::Flowers => "flowers",
            CellType::LilyPad => "lily pad",
            CellType::Tree => "tree",
            CellType::Bush => "bush",
            CellType::Bed => "bed",
            CellType::Couch => "couch",
            CellType::PondWater => "pond water",
            CellType::Horse => "horse",
            CellType::Plant => "plant",
            CellType::Track => "track",
            CellType::FinishingLine => "finishing line",
            CellType::OilSlick => "oil slick",
            CellType::Bonsai => "bonsai",
            CellType::Cactus => "cactus",
            CellType::Shrub => "shrub",
            CellType::Path => "path",
            CellType::Box => "box",
            CellType::Car => "car",
        }
    }
}

/// One square of the board layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub room: RoomId,
    #[serde(rename = "type")]
    pub cell_type: CellType,
}
