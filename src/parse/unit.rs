//! Per-unit timeline reconstruction
//!
//! A [`LogUnit`] replays the whole log once, keeping only the lines that
//! belong to it, and builds its impulse-indexed action timeline. Cloak
//! orders are reported under the controlling player's name rather than
//! the unit's, so they are patched in by an owner-aware second pass once
//! the registry has resolved ownership.

use serde::{Deserialize, Serialize};

use crate::core::error::{DiagnosticLog, LogError, Result, Severity};
use crate::core::facing::{classify_turn, Facing, HetTac, TurnReason};
use crate::core::time::convert_to_imp;
use crate::parse::action::{Action, ActionBag, ActionKind, BasicType, Timeline, WeaponMount};
use crate::parse::pattern::{self, MoveVerb};

/// Cursor threaded through the line-by-line walk.
///
/// Each handler consumes the previous state and returns the next one, so
/// all the derived context later lines depend on (facing for HET checks,
/// speed for TAC checks, the impulse every event is stamped with) lives
/// in one place.
#[derive(Debug, Clone, Copy)]
struct ScanState {
    /// Linear impulse of the last header seen; 0 before the first one
    time: u32,
    facing: Facing,
    speed: u32,
}

impl Default for ScanState {
    fn default() -> Self {
        Self {
            time: 0,
            facing: Facing::A,
            speed: 0,
        }
    }
}

/// One identified unit and its reconstructed timeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogUnit {
    pub name: String,
    /// Declared type string, e.g. "LDR TCWL"
    pub unit_type: String,
    pub basic_type: BasicType,
    /// Controlling player, resolved by the registry after discovery
    pub owner: Option<String>,
    /// Impulse the unit entered the board
    pub added: u32,
    /// Impulse the unit left the board; defaults to the last impulse
    /// observed in the log when no removal line matched
    pub removed: u32,
    weapons: Vec<WeaponMount>,
    impulses: Timeline,
    last_location: String,
    saw_cloak_trigger: bool,
    diagnostics: DiagnosticLog,
}

impl LogUnit {
    /// Build a unit's timeline from the full log.
    ///
    /// The first add line at or after `offset` defines the unit's
    /// identity; earlier lines only advance the impulse pointer.
    pub fn scan(lines: &[&str], offset: usize) -> Self {
        let mut unit = LogUnit::default();
        let mut state = ScanState::default();
        for line_num in 0..lines.len() {
            state = unit.apply_line(state, lines, line_num, offset);
        }
        if unit.removed == 0 {
            unit.removed = state.time;
        }
        unit
    }

    /// Process one line, returning the cursor for the next one.
    ///
    /// Patterns are tried in fixed priority order and the first match
    /// wins; lines matching nothing are skipped.
    fn apply_line(
        &mut self,
        mut state: ScanState,
        lines: &[&str],
        line_num: usize,
        offset: usize,
    ) -> ScanState {
        let line = lines[line_num];

        if let Some(time_text) = pattern::impulse_header(line) {
            match convert_to_imp(time_text) {
                Ok(time) => state.time = time,
                Err(_) => self.diagnostics.push(
                    Severity::Error,
                    Some(&self.name),
                    Some(state.time),
                    format!("impulse header in the wrong format: '{time_text}'"),
                ),
            }
            return state;
        }

        // only the impulse pointer advances before the unit's creation line
        if line_num < offset {
            return state;
        }

        if self.unit_type.is_empty() {
            if let Some(add) = pattern::add_line(line) {
                self.init_from_add(&state, &add);
                return state;
            }
        }

        if pattern::cloak_trigger(line) {
            // attribution needs the resolved owner; flag for the second pass
            self.saw_cloak_trigger = true;
            return state;
        }

        if let Some(target) = pattern::damage_header(line) {
            if target == self.name {
                self.scan_damage_block(&state, lines, line_num);
            }
            return state;
        }

        if let Some(change) = pattern::facing_change(line) {
            if change.name == self.name {
                state = self.apply_facing(state, change.facing, change.moves);
            }
            return state;
        }

        if let Some(change) = pattern::location_change(line) {
            if change.name == self.name {
                state = self.apply_location(state, &change);
            }
            return state;
        }

        if let Some(name) = pattern::remove_line(line) {
            if name == self.name {
                self.removed = state.time;
                self.record(
                    state.time,
                    Action::Remove {
                        added: self.added,
                        removed: state.time,
                        unit_type: self.unit_type.clone(),
                        owner: self.name.clone(),
                    },
                );
            }
            return state;
        }

        if let Some(speed) = pattern::speed_change(line) {
            if speed.name == self.name {
                state.speed = speed.speed;
                self.record(
                    state.time,
                    Action::Speed {
                        speed: speed.speed,
                        owner: self.name.clone(),
                    },
                );
            }
            return state;
        }

        if let Some((name, target)) = pattern::tractor_down(line) {
            if name == self.name {
                self.record(
                    state.time,
                    Action::TractorDown {
                        target: target.to_string(),
                        time: state.time,
                        owner: self.name.clone(),
                        owner_location: self.last_location.clone(),
                    },
                );
            }
            return state;
        }

        if let Some((name, target)) = pattern::tractor_up(line) {
            if name == self.name {
                self.record(
                    state.time,
                    Action::TractorUp {
                        target: target.to_string(),
                        time: state.time,
                        owner: self.name.clone(),
                        owner_location: self.last_location.clone(),
                    },
                );
            }
            return state;
        }

        if let Some(fire) = pattern::weapon_fire(line) {
            if fire.name == self.name {
                let mount = WeaponMount {
                    weapon: fire.weapon.to_string(),
                    id: fire.id.to_string(),
                    arc: fire.arc.to_string(),
                };
                if !self.weapons.contains(&mount) {
                    self.weapons.push(mount);
                }
                self.record(
                    state.time,
                    Action::Fire {
                        weapon: fire.weapon.to_string(),
                        id: fire.id.to_string(),
                        arc: fire.arc.to_string(),
                        target: fire.target.to_string(),
                        range: fire.range,
                        owner: self.name.clone(),
                        owner_location: self.last_location.clone(),
                    },
                );
            }
            return state;
        }

        state
    }

    fn init_from_add(&mut self, state: &ScanState, add: &pattern::AddLine<'_>) {
        self.name = add.name.to_string();
        self.unit_type = add.unit_type.to_string();
        self.basic_type = BasicType::from_type_str(add.unit_type);
        self.added = state.time;

        let facing = match add.direction {
            Some(direction) => direction.parse().unwrap_or_else(|_| {
                self.diagnostics.push(
                    Severity::Warning,
                    Some(&self.name),
                    Some(state.time),
                    format!("unrecognized initial direction '{direction}'"),
                );
                Facing::A
            }),
            None => Facing::A,
        };
        let speed = add.speed.unwrap_or(0);

        self.record(
            state.time,
            Action::Add {
                time: state.time,
                facing,
                location: add.location.to_string(),
                speed,
                unit_type: self.unit_type.clone(),
                owner: self.name.clone(),
            },
        );
        tracing::debug!(
            unit = %self.name,
            added = state.time,
            basic = ?self.basic_type,
            "unit timeline started"
        );
    }

    /// Damage reporting spreads over several lines: the announcement, the
    /// per-arc allocation with its total, the reinforcement breakdown, and
    /// (three lines further) an optional internals count. A missing
    /// allocation or reinforcement line drops the whole event - never a
    /// partially-filled record.
    fn scan_damage_block(&mut self, state: &ScanState, lines: &[&str], line_num: usize) {
        let Some(alloc) = lines
            .get(line_num + 1)
            .and_then(|line| pattern::damage_allocation(line))
        else {
            self.diagnostics.push(
                Severity::Warning,
                Some(&self.name),
                Some(state.time),
                format!(
                    "damage announcement without subsequent allocation (line {})",
                    line_num + 2
                ),
            );
            return;
        };
        let Some(reinforcement_arcs) = lines
            .get(line_num + 2)
            .and_then(|line| pattern::shield_reinforcement(line))
        else {
            self.diagnostics.push(
                Severity::Warning,
                Some(&self.name),
                Some(state.time),
                format!(
                    "damage announcement without subsequent reinforcement allocation (line {})",
                    line_num + 3
                ),
            );
            return;
        };
        let internals = lines
            .get(line_num + 5)
            .and_then(|line| pattern::internals(line))
            .unwrap_or(0) as i32;

        let total = alloc.total as i32;
        let reinforcement = reinforcement_arcs.iter().sum::<u32>() as i32;
        let shields = total - reinforcement - internals;

        self.record(
            state.time,
            Action::Damage {
                total,
                shields,
                internals,
                reinforcement,
                owner: self.name.clone(),
                owner_location: self.last_location.clone(),
            },
        );
    }

    fn apply_facing(&mut self, mut state: ScanState, facing_text: &str, moves: &str) -> ScanState {
        let new_facing = match facing_text.parse::<Facing>() {
            Ok(facing) => facing,
            Err(_) => {
                self.diagnostics.push(
                    Severity::Warning,
                    Some(&self.name),
                    Some(state.time),
                    format!("unrecognized facing '{facing_text}' in facing change"),
                );
                return state;
            }
        };
        let turn = match classify_turn(new_facing, state.facing, state.speed) {
            Some(het_tac) => het_tac.into(),
            None => TurnReason::Moves(moves.to_string()),
        };
        self.record(
            state.time,
            Action::Facing {
                facing: new_facing,
                turn,
                owner: self.name.clone(),
            },
        );
        // the pointer moves only after the HET/TAC check
        state.facing = new_facing;
        state
    }

    fn apply_location(
        &mut self,
        mut state: ScanState,
        change: &pattern::LocationLine<'_>,
    ) -> ScanState {
        let new_facing = match change.facing.parse::<Facing>() {
            Ok(facing) => facing,
            Err(_) => {
                self.diagnostics.push(
                    Severity::Warning,
                    Some(&self.name),
                    Some(state.time),
                    format!("unrecognized facing '{}' in location change", change.facing),
                );
                return state;
            }
        };
        let turn = match change.verb {
            MoveVerb::Moved => TurnReason::Move,
            MoveVerb::SideSlipped => TurnReason::SideSlip,
            MoveVerb::Turned => classify_turn(new_facing, state.facing, state.speed)
                .map(TurnReason::from)
                .unwrap_or(TurnReason::Turn),
        };
        self.record(
            state.time,
            Action::Location {
                facing: new_facing,
                location: change.location.to_string(),
                turn,
                owner: self.name.clone(),
            },
        );
        state.facing = new_facing;
        self.last_location = change.location.to_string();
        state
    }

    /// Owner-aware second pass: stamp cloak actions at every trigger the
    /// resolved owner announced. Skipped when pass one saw no trigger or
    /// no player selected this unit's type.
    pub fn patch_cloaks(&mut self, lines: &[&str]) {
        if !self.saw_cloak_trigger {
            return;
        }
        let Some(owner) = self.owner.clone() else {
            return;
        };
        let mut time = 0u32;
        for (line_num, line) in lines.iter().enumerate() {
            if let Some(time_text) = pattern::impulse_header(line) {
                // conversion failures were already reported in pass one
                if let Ok(converted) = convert_to_imp(time_text) {
                    time = converted;
                }
                continue;
            }
            if pattern::cloak_trigger(line) {
                let announcer = lines
                    .get(line_num + 1)
                    .and_then(|next| pattern::cloak_announcer(next));
                if announcer == Some(owner.as_str()) {
                    self.record(
                        time,
                        Action::Cloak {
                            owner: self.name.clone(),
                            owner_location: self.last_location.clone(),
                        },
                    );
                }
            }
        }
    }

    fn record(&mut self, time: u32, action: Action) {
        self.impulses.entry(time).or_default().record(action);
    }

    /// Action bag for exactly one impulse.
    ///
    /// Fails with [`LogError::TimeFormat`] on a malformed time string and
    /// [`LogError::ImpulseNotRecorded`] when the unit has nothing at that
    /// impulse.
    pub fn read(&self, time: &str) -> Result<&ActionBag> {
        let time = convert_to_imp(time)?;
        self.impulses
            .get(&time)
            .ok_or_else(|| LogError::ImpulseNotRecorded {
                unit: self.name.clone(),
                impulse: time,
            })
    }

    pub fn read_all(&self) -> &Timeline {
        &self.impulses
    }

    pub fn weapons(&self) -> &[WeaponMount] {
        &self.weapons
    }

    /// Most recent speed change at or before `time`; 0 if never set
    pub fn current_speed(&self, time: u32) -> u32 {
        let mut speed = 0;
        for (&impulse, bag) in &self.impulses {
            if impulse > time {
                break;
            }
            if let Some(Action::Speed { speed: value, .. }) = bag.get(ActionKind::Speed) {
                speed = *value;
            }
        }
        speed
    }

    /// Delegate to the facing classifier
    pub fn is_het_tac(&self, new: Facing, old: Facing, speed: u32) -> Option<HetTac> {
        classify_turn(new, old, speed)
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    /// Move this unit's diagnostics out, for the registry's shared log
    pub fn take_diagnostics(&mut self) -> Vec<crate::core::error::Diagnostic> {
        self.diagnostics.drain()
    }
}
