//! Hex map locations and range measurement
//!
//! The log reports positions as four-digit column/row strings ("0215" is
//! column 2, row 15) on an offset hex grid. Range is measured by
//! converting to axial coordinates and taking the cube distance.

use serde::{Deserialize, Serialize};

use crate::core::error::{LogError, Result};

/// A hex parsed from the log's four-digit column/row form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexLocation {
    pub col: i32,
    pub row: i32,
}

impl HexLocation {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Parse a location like "0101". Exactly four digits.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.len() != 4 || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LogError::InvalidLocation(text.to_string()));
        }
        let col = text[..2]
            .parse()
            .map_err(|_| LogError::InvalidLocation(text.to_string()))?;
        let row = text[2..]
            .parse()
            .map_err(|_| LogError::InvalidLocation(text.to_string()))?;
        Ok(Self { col, row })
    }

    /// Axial coordinates (odd columns shifted down half a hex)
    fn axial(self) -> (i32, i32) {
        let q = self.col;
        let r = self.row - (self.col - (self.col & 1)) / 2;
        (q, r)
    }

    /// Hex range to another location (cube-coordinate distance)
    pub fn range(self, other: Self) -> u32 {
        let (aq, ar) = self.axial();
        let (bq, br) = other.axial();
        let dq = (aq - bq).abs();
        let dr = (ar - br).abs();
        let ds = ((-aq - ar) - (-bq - br)).abs();
        ((dq + dr + ds) / 2) as u32
    }
}
