//! Two-stage log parsing: line pattern matchers and per-unit timelines

pub mod action;
pub mod pattern;
pub mod unit;

pub use action::{Action, ActionBag, ActionKind, BasicType, Timeline, WeaponMount};
pub use unit::LogUnit;
