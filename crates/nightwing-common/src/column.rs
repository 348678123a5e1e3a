use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids::ColumnId;
use crate::{ValidationError, require};

/// The fixed palette a column can be painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ColumnColor {
    #[default]
    Gray,
    Red,
    Yellow,
    Green,
    Blue,
    Indigo,
    Purple,
    Pink,
}

impl ColumnColor {
    pub const ALL: [ColumnColor; 8] = [
        Self::Gray,
        Self::Red,
        Self::Yellow,
        Self::Green,
        Self::Blue,
        Self::Indigo,
        Self::Purple,
        Self::Pink,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Indigo => "indigo",
            Self::Purple => "purple",
            Self::Pink => "pink",
        }
    }
}

impl fmt::Display for ColumnColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "Invalid color '{}'. Valid values: gray, red, yellow, green, blue, indigo, purple, pink",
                    s
                )
            })
    }
}

// Persisted boards may carry colors from older palettes; they render as gray.
impl From<String> for ColumnColor {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

/// A named, colored status bucket. `order` sets left-to-right position and
/// is neither guaranteed contiguous nor unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    pub color: ColumnColor,
    pub order: i32,
}

impl Column {
    pub fn new(id: impl Into<ColumnId>, name: impl Into<String>, color: ColumnColor, order: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color,
            order,
        }
    }

    pub fn apply(&mut self, patch: &ColumnPatch) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColumnColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

impl ColumnPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn recolor(color: ColumnColor) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.name {
            Some(name) => require("column name", name),
            None => Ok(()),
        }
    }
}
