//! Catalogue records and the partitions used by the browser filters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deep-sky catalogue partition.
///
/// Every DSO row belongs to exactly one partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Catalogue {
    Messier,
    Caldwell,
    Other,
}

impl Catalogue {
    pub const ALL: [Catalogue; 3] = [Catalogue::Messier, Catalogue::Caldwell, Catalogue::Other];

    /// Classify a DSO row.
    ///
    /// A non-empty Catalogue column wins; otherwise the Code prefix decides
    /// (`M<digits>` is Messier, `C<digits>` is Caldwell).
    pub fn classify(catalogue: Option<&str>, code: &str) -> Self {
        if let Some(value) = catalogue.map(str::trim).filter(|v| !v.is_empty()) {
            return match value.to_lowercase().as_str() {
                "messier" => Catalogue::Messier,
                "caldwell" => Catalogue::Caldwell,
                _ => Catalogue::Other,
            };
        }
        Self::from_code(code)
    }

    /// Derive the catalogue from a designation such as "M31" or "C 14".
    pub fn from_code(code: &str) -> Self {
        let code = code.trim();
        let mut chars = code.chars();
        let prefix = match chars.next() {
            Some(c) => c.to_ascii_uppercase(),
            None => return Catalogue::Other,
        };
        let number = chars.as_str().trim_start();
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
            return Catalogue::Other;
        }
        match prefix {
            'M' => Catalogue::Messier,
            'C' => Catalogue::Caldwell,
            _ => Catalogue::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Catalogue::Messier => "Messier",
            Catalogue::Caldwell => "Caldwell",
            Catalogue::Other => "Other",
        }
    }
}

impl FromStr for Catalogue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "messier" | "m" => Ok(Self::Messier),
            "caldwell" | "c" => Ok(Self::Caldwell),
            "other" | "others" => Ok(Self::Other),
            _ => Err(format!(
                "Unknown catalogue: {}. Use 'messier', 'caldwell' or 'other'",
                s
            )),
        }
    }
}

impl fmt::Display for Catalogue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Star type partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StarKind {
    #[serde(rename = "Double Star")]
    DoubleStar,
    #[serde(rename = "Red Giant")]
    RedGiant,
    Other,
}

impl StarKind {
    pub const ALL: [StarKind; 3] = [StarKind::DoubleStar, StarKind::RedGiant, StarKind::Other];

    /// Classify a star by its Type column. Empty types fall into `Other`.
    pub fn classify(star_type: &str) -> Self {
        match star_type.trim().to_lowercase().as_str() {
            "double star" => StarKind::DoubleStar,
            "red giant" => StarKind::RedGiant,
            _ => StarKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StarKind::DoubleStar => "Double Star",
            StarKind::RedGiant => "Red Giant",
            StarKind::Other => "Other",
        }
    }
}

impl FromStr for StarKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match compact.as_str() {
            "doublestar" | "doublestars" | "double" | "doubles" => Ok(Self::DoubleStar),
            "redgiant" | "redgiants" | "giant" | "giants" => Ok(Self::RedGiant),
            "other" | "others" => Ok(Self::Other),
            _ => Err(format!(
                "Unknown star type: {}. Use 'double-star', 'red-giant' or 'other'",
                s
            )),
        }
    }
}

impl fmt::Display for StarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key used to join constellations across tables: trimmed and lower-cased.
pub fn constellation_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Interpret a loosely typed flag cell ("1", "yes", "x", ...).
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "y" | "yes" | "true" | "x"
    )
}

/// Deep-sky object catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsoRecord {
    pub code: String,
    #[serde(rename = "type")]
    pub object_type: String,
    pub name: String,
    pub notes: String,
    pub constellation: String,
    /// Raw Catalogue column value, `None` when the store has no such column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalogue_label: Option<String>,
    /// Listed in "Turn Left at Orion".
    #[serde(default)]
    pub turn_left_at_orion: bool,
}

impl DsoRecord {
    pub fn catalogue(&self) -> Catalogue {
        Catalogue::classify(self.catalogue_label.as_deref(), &self.code)
    }
}

/// Notable star entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRecord {
    pub code: String,
    #[serde(rename = "type")]
    pub star_type: String,
    pub name: String,
    /// Component count or designation from the Stars column.
    pub stars: String,
    pub notes: String,
    pub constellation: String,
}

impl StarRecord {
    pub fn kind(&self) -> StarKind {
        StarKind::classify(&self.star_type)
    }
}

/// Hour value of a Visibility row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum VisibilityHour {
    /// The store has no Hour column; the row belongs to every block.
    Unbucketed,
    /// The Hour cell as stored, `None` when it is NULL.
    Recorded(Option<i64>),
}

impl VisibilityHour {
    /// A recorded, non-NULL hour.
    pub fn at(hour: i64) -> Self {
        VisibilityHour::Recorded(Some(hour))
    }

    /// Stored value, if any.
    pub fn value(&self) -> Option<i64> {
        match self {
            VisibilityHour::Unbucketed => None,
            VisibilityHour::Recorded(value) => *value,
        }
    }
}

/// A Visibility row marked optimal for the requested month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimalSlot {
    pub constellation: String,
    pub hour: VisibilityHour,
}

/// Raw Visibility row, as held by the in-memory repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityRow {
    pub constellation: String,
    pub month: i64,
    pub hour: VisibilityHour,
    pub optimal: bool,
}
