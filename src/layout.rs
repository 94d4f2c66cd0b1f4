//! Reader for the declarative row/column layout format.
//!
//! The input is a JSON array of rows; each row is an array whose elements are
//! either a key label (string) or a spacing directive (object with any of the
//! numeric fields `x`, `y`, `w`, all in key units).

use serde::Deserialize;

use crate::error::Error;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Key(String),
    Gap(Spacing),
}

/// Cursor adjustment preceding the next key.
///
/// `x` shifts the cursor right, `y` shifts all following rows down, `w` sets
/// the width of the next key only. All three may combine in one directive,
/// but a directive with none of them is an authoring mistake and rejected.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Spacing {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub w: Option<f64>,
}

impl Spacing {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.w.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    pub rows: Vec<Vec<Entry>>,
}

impl Layout {
    pub fn from_json_str(input: &str) -> Result<Self, Error> {
        let layout: Layout = serde_json::from_str(input)?;
        layout.validate()?;
        Ok(layout)
    }

    fn validate(&self) -> Result<(), Error> {
        for (row_i, row) in self.rows.iter().enumerate() {
            for (entry_i, entry) in row.iter().enumerate() {
                if let Entry::Gap(gap) = entry {
                    if gap.is_empty() {
                        return Err(Error::EmptySpacing {
                            row: row_i,
                            entry: entry_i,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
