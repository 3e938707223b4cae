//! Core primitives shared by every parsing stage

pub mod error;
pub mod facing;
pub mod hex;
pub mod time;

pub use error::{Diagnostic, DiagnosticLog, LogError, Result, Severity};
pub use facing::{classify_turn, signed_distance, Facing, HetTac, TurnReason};
pub use hex::HexLocation;
pub use time::{convert_from_imp, convert_to_imp, convert_to_turn, IMPULSES_PER_TURN};
