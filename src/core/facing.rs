//! Facings on the six-direction hex compass and turn classification
//!
//! Facings are labeled A through F, 60 degrees apart. A facing change is
//! a HET (high energy turn) when it spans more than one step, a TAC
//! (tactical maneuver) when it is a single step made while stationary,
//! and otherwise unclassified - the caller supplies the reason then.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::LogError;

/// One of the six hex facings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Facing {
    pub const ALL: [Facing; 6] = [
        Facing::A,
        Facing::B,
        Facing::C,
        Facing::D,
        Facing::E,
        Facing::F,
    ];

    /// Ordinal position on the compass, A = 0 through F = 5
    pub fn ordinal(self) -> i32 {
        self as i32
    }
}

impl FromStr for Facing {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, LogError> {
        match s.trim() {
            "A" | "a" => Ok(Facing::A),
            "B" | "b" => Ok(Facing::B),
            "C" | "c" => Ok(Facing::C),
            "D" | "d" => Ok(Facing::D),
            "E" | "e" => Ok(Facing::E),
            "F" | "f" => Ok(Facing::F),
            _ => Err(LogError::InvalidFacing(s.to_string())),
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Facing::A => "A",
            Facing::B => "B",
            Facing::C => "C",
            Facing::D => "D",
            Facing::E => "E",
            Facing::F => "F",
        };
        write!(f, "{label}")
    }
}

/// Signed rotation from `old` to `new` on the six-cycle.
///
/// Positive is clockwise, negative counter-clockwise. Changes crossing
/// the A/F seam are reflected so the magnitude stays minimal.
pub fn signed_distance(new: Facing, old: Facing) -> i32 {
    let distance = new.ordinal() - old.ordinal();
    if distance.abs() < 4 {
        distance
    } else if distance < 0 {
        5 + distance + 1
    } else {
        5 - distance - 1
    }
}

/// Classified facing change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HetTac {
    Het,
    Tac,
}

/// Classify a facing change given the unit's current speed.
///
/// More than one step is a HET regardless of speed; exactly one step at
/// speed zero is a TAC; everything else is unclassified.
pub fn classify_turn(new: Facing, old: Facing, speed: u32) -> Option<HetTac> {
    let distance = signed_distance(new, old);
    if distance.abs() > 1 {
        Some(HetTac::Het)
    } else if distance.abs() == 1 && speed == 0 {
        Some(HetTac::Tac)
    } else {
        None
    }
}

/// Why a unit ended up pointing the way it does
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnReason {
    #[serde(rename = "HET")]
    Het,
    #[serde(rename = "TAC")]
    Tac,
    /// Literal move count reported by the log when the change is neither
    /// a HET nor a TAC
    #[serde(rename = "moves")]
    Moves(String),
    #[serde(rename = "move")]
    Move,
    #[serde(rename = "turn")]
    Turn,
    #[serde(rename = "side-slip")]
    SideSlip,
}

impl From<HetTac> for TurnReason {
    fn from(value: HetTac) -> Self {
        match value {
            HetTac::Het => TurnReason::Het,
            HetTac::Tac => TurnReason::Tac,
        }
    }
}

impl fmt::Display for TurnReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnReason::Het => write!(f, "HET"),
            TurnReason::Tac => write!(f, "TAC"),
            TurnReason::Moves(count) => write!(f, "{count}"),
            TurnReason::Move => write!(f, "move"),
            TurnReason::Turn => write!(f, "turn"),
            TurnReason::SideSlip => write!(f, "side-slip"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_change_is_unclassified() {
        assert_eq!(classify_turn(Facing::A, Facing::A, 0), None);
        assert_eq!(classify_turn(Facing::A, Facing::A, 12), None);
    }

    #[test]
    fn test_two_step_change_is_het() {
        assert_eq!(classify_turn(Facing::C, Facing::A, 0), Some(HetTac::Het));
        assert_eq!(classify_turn(Facing::C, Facing::A, 20), Some(HetTac::Het));
    }

    #[test]
    fn test_single_step_while_stationary_is_tac() {
        assert_eq!(classify_turn(Facing::B, Facing::A, 0), Some(HetTac::Tac));
    }

    #[test]
    fn test_single_step_while_moving_is_unclassified() {
        assert_eq!(classify_turn(Facing::B, Facing::A, 10), None);
    }

    #[test]
    fn test_distance_across_seam() {
        // F to A is one clockwise step, not five counter-clockwise
        assert_eq!(signed_distance(Facing::A, Facing::F), 1);
        assert_eq!(signed_distance(Facing::F, Facing::A), -1);
        assert_eq!(classify_turn(Facing::A, Facing::F, 15), None);
        assert_eq!(classify_turn(Facing::F, Facing::A, 0), Some(HetTac::Tac));
    }

    #[test]
    fn test_facing_parse_round_trip() {
        for facing in Facing::ALL {
            assert_eq!(facing.to_string().parse::<Facing>().unwrap(), facing);
        }
        assert!("G".parse::<Facing>().is_err());
        assert!("".parse::<Facing>().is_err());
    }
}
