//! Time codec between "turn.impulse" notation and linear impulse counts
//!
//! Turns are 1-based blocks of 32 impulses. Turn 1 impulse 1 is linear
//! impulse 1; turn 3 impulse 32 is linear impulse 96.

use crate::core::error::{LogError, Result};

/// Number of impulses in one turn
pub const IMPULSES_PER_TURN: u32 = 32;

/// Convert "turn.impulse" notation to a linear impulse count.
///
/// A bare integer string is treated as already converted and passed
/// through. Anything else that is not `T.I` with numeric halves fails
/// with [`LogError::TimeFormat`].
pub fn convert_to_imp(time: &str) -> Result<u32> {
    let time = time.trim();
    if let Ok(linear) = time.parse::<u32>() {
        return Ok(linear);
    }
    let (turns, imps) = time
        .split_once('.')
        .ok_or_else(|| LogError::TimeFormat(time.to_string()))?;
    let turns: u32 = turns
        .parse()
        .map_err(|_| LogError::TimeFormat(time.to_string()))?;
    let imps: u32 = imps
        .parse()
        .map_err(|_| LogError::TimeFormat(time.to_string()))?;
    if turns == 0 {
        return Err(LogError::TimeFormat(time.to_string()));
    }
    let linear = (turns - 1) * IMPULSES_PER_TURN + imps;
    if linear == 0 {
        return Err(LogError::TimeFormat(time.to_string()));
    }
    Ok(linear)
}

/// Convert a linear impulse count (>= 1) back to "turn.impulse" notation.
///
/// A count landing exactly on a turn boundary belongs to impulse 32 of
/// the earlier turn: 96 is "3.32", 97 is "4.1".
pub fn convert_from_imp(time: u32) -> String {
    let (turns, imps) = convert_to_turn(time);
    format!("{turns}.{imps}")
}

/// Split a linear impulse count into (turn, impulse-in-turn).
pub fn convert_to_turn(time: u32) -> (u32, u32) {
    let mut turns = time / IMPULSES_PER_TURN + 1;
    let mut imps = time % IMPULSES_PER_TURN;
    if imps == 0 {
        imps = IMPULSES_PER_TURN;
        turns -= 1;
    }
    (turns, imps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_convert_to_imp_basics() {
        assert_eq!(convert_to_imp("1.1").unwrap(), 1);
        assert_eq!(convert_to_imp("1.32").unwrap(), 32);
        assert_eq!(convert_to_imp("2.1").unwrap(), 33);
        assert_eq!(convert_to_imp("3.32").unwrap(), 96);
        assert_eq!(convert_to_imp("3.17").unwrap(), 81);
    }

    #[test]
    fn test_convert_to_imp_passthrough() {
        assert_eq!(convert_to_imp("96").unwrap(), 96);
    }

    #[test]
    fn test_convert_to_imp_rejects_garbage() {
        assert!(convert_to_imp("").is_err());
        assert!(convert_to_imp(".").is_err());
        assert!(convert_to_imp("3.").is_err());
        assert!(convert_to_imp("a.b").is_err());
        assert!(convert_to_imp("0.5").is_err());
    }

    #[test]
    fn test_convert_from_imp_boundary() {
        assert_eq!(convert_from_imp(96), "3.32");
        assert_eq!(convert_from_imp(97), "4.1");
        assert_eq!(convert_from_imp(1), "1.1");
        assert_eq!(convert_from_imp(32), "1.32");
    }

    #[test]
    fn test_convert_to_turn() {
        assert_eq!(convert_to_turn(81), (3, 17));
        assert_eq!(convert_to_turn(32), (1, 32));
    }

    proptest! {
        #[test]
        fn prop_round_trip(turn in 1u32..1000, imp in 1u32..=32) {
            let text = format!("{turn}.{imp}");
            let linear = convert_to_imp(&text).unwrap();
            prop_assert_eq!(convert_from_imp(linear), text);
        }

        #[test]
        fn prop_linear_round_trip(linear in 1u32..100_000) {
            let text = convert_from_imp(linear);
            prop_assert_eq!(convert_to_imp(&text).unwrap(), linear);
        }
    }
}
