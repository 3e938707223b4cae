//! Impulse Log - queryable timelines from hex-grid wargame battle logs
//!
//! Converts a plain-text battle log into an impulse-indexed timeline of
//! per-unit events, then merges those events into the game's fixed
//! sequence of play on demand. Presentation collaborators (after-action
//! reports, map rendering, animation export) consume the query surface on
//! [`registry::BattleLog`]; no I/O or output formatting happens here.

pub mod core;
pub mod parse;
pub mod registry;
pub mod sequence;
