use serde::{Deserialize, Serialize};

/// Grid coordinate with the wire form `"<row>-<col>"` (0-based, no padding).
///
/// `new` and `parse` are the only constructors; `Display` emits the wire
/// form, and serde round-trips through it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub row: usize,
    pub col: usize,
}

impl CellKey {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parse a wire-form key such as `"5-4"`. Returns `None` for anything
    /// that is not exactly two decimal integers joined by a dash.
    pub fn parse(s: &str) -> Option<Self> {
        let (row, col) = s.split_once('-')?;
        Some(Self {
            row: row.parse().ok()?,
            col: col.parse().ok()?,
        })
    }
}

impl std::fmt::Display for CellKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

impl std::fmt::Debug for CellKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

impl Serialize for CellKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CellKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CellKey::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid cell key: {}", s)))
    }
}
