//! Entity discovery and the read-only query surface over a parsed log
//!
//! [`BattleLog::parse`] runs the discovery pass (one [`LogUnit`] per
//! accepted add line, plus the player/type table), resolves ownership
//! once every unit is known, then triggers each unit's owner-aware
//! second pass. The returned value is frozen: every query takes `&self`,
//! so concurrent readers need no locking.

pub mod config;

pub use config::RegistryConfig;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{Diagnostic, DiagnosticLog, LogError, Result, Severity};
use crate::core::facing::Facing;
use crate::core::hex::HexLocation;
use crate::core::time::convert_to_imp;
use crate::parse::action::{Action, BasicType, Timeline, WeaponMount};
use crate::parse::pattern;
use crate::parse::unit::LogUnit;
use crate::sequence::{self, Phase, PhasedActions};

/// Summary row returned by [`BattleLog::get_units`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub unit_type: String,
    pub basic: BasicType,
    pub added: u32,
    pub removed: u32,
}

/// A fully parsed battle log, frozen after construction
#[derive(Debug, Clone)]
pub struct BattleLog {
    units: Vec<LogUnit>,
    lookup: AHashMap<String, usize>,
    diagnostics: Vec<Diagnostic>,
    max_impulse: u32,
}

impl BattleLog {
    /// Parse a complete battle log with the default configuration.
    pub fn parse(log: &str) -> Result<Self> {
        Self::parse_with_config(log, &RegistryConfig::default())
    }

    /// Parse a complete battle log.
    ///
    /// Only structural failure (no lines at all) is fatal; everything
    /// recoverable lands in [`BattleLog::diagnostics`] and the registry
    /// stays usable with partial results.
    pub fn parse_with_config(log: &str, config: &RegistryConfig) -> Result<Self> {
        let lines: Vec<&str> = log.lines().collect();
        if lines.is_empty() {
            return Err(LogError::EmptyLog);
        }

        let mut diagnostics = DiagnosticLog::new();
        let mut units: Vec<LogUnit> = Vec::new();
        let mut lookup = AHashMap::new();
        // declared unit type -> selecting player; later selections of the
        // same type replace earlier ones
        let mut player_table: Vec<(String, String)> = Vec::new();
        let mut max_impulse = 0u32;

        for (line_num, line) in lines.iter().enumerate() {
            if let Some(time_text) = pattern::impulse_header(line) {
                if let Ok(time) = convert_to_imp(time_text) {
                    max_impulse = max_impulse.max(time);
                }
                continue;
            }
            if let Some(add) = pattern::add_line(line) {
                if config
                    .marker_suffixes
                    .iter()
                    .any(|suffix| add.unit_type.ends_with(suffix.as_str()))
                {
                    // waypoint markers are bookkeeping, not battle units
                    continue;
                }
                let mut unit = LogUnit::scan(&lines, line_num);
                if lookup.contains_key(&unit.name) {
                    diagnostics.push(
                        Severity::Warning,
                        Some(&unit.name),
                        Some(unit.added),
                        "duplicate unit name; keeping the first occurrence",
                    );
                    for diagnostic in unit.take_diagnostics() {
                        diagnostics.record(diagnostic);
                    }
                    continue;
                }
                lookup.insert(unit.name.clone(), units.len());
                units.push(unit);
                continue;
            }
            if let Some((player, unit_type)) = pattern::player_select(line) {
                player_table.push((unit_type.to_string(), player.to_string()));
            }
        }

        // ownership is only resolvable once every unit is known; cloak
        // activity is reported by player name, not unit name
        for (unit_type, player) in &player_table {
            for unit in units.iter_mut() {
                if &unit.unit_type == unit_type {
                    unit.owner = Some(player.clone());
                }
            }
        }
        for unit in &mut units {
            unit.patch_cloaks(&lines);
        }

        for unit in &mut units {
            for diagnostic in unit.take_diagnostics() {
                diagnostics.record(diagnostic);
            }
        }
        tracing::debug!(
            units = units.len(),
            max_impulse,
            diagnostics = diagnostics.len(),
            "battle log parsed"
        );

        Ok(BattleLog {
            units,
            lookup,
            diagnostics: diagnostics.drain(),
            max_impulse,
        })
    }

    fn unit(&self, name: &str) -> Result<&LogUnit> {
        self.lookup
            .get(name)
            .map(|&index| &self.units[index])
            .ok_or_else(|| LogError::UnknownUnit(name.to_string()))
    }

    /// Every unit in discovery order
    pub fn get_units(&self) -> Vec<UnitSummary> {
        self.units
            .iter()
            .map(|unit| UnitSummary {
                name: unit.name.clone(),
                unit_type: unit.unit_type.clone(),
                basic: unit.basic_type,
                added: unit.added,
                removed: unit.removed,
            })
            .collect()
    }

    /// Deduplicated weapon loadout a unit has fired with
    pub fn get_weapons(&self, name: &str) -> Result<&[WeaponMount]> {
        Ok(self.unit(name)?.weapons())
    }

    /// Every unit's actions at one impulse, merged into resolution order.
    ///
    /// The map is empty when nothing happened on that impulse. Routing
    /// gaps land in the terminal catch-all phase and are logged.
    pub fn read(&self, time: &str) -> Result<PhasedActions> {
        let time = convert_to_imp(time)?;
        let mut output = PhasedActions::new();
        for unit in &self.units {
            let Some(bag) = unit.read_all().get(&time) else {
                continue;
            };
            let stationary = unit.current_speed(time) == 0;
            for action in bag.actions() {
                let routed = sequence::route(action.kind(), unit.basic_type, stationary);
                if routed.fallthrough {
                    tracing::warn!(
                        unit = %unit.name,
                        kind = ?action.kind(),
                        basic = ?unit.basic_type,
                        "no sequencing rule for action; routed to impulse end"
                    );
                }
                output.entry(routed.phase).or_default().push(action.clone());
            }
        }
        Ok(output)
    }

    /// One unit's full timeline
    pub fn read_all(&self, name: &str) -> Result<&Timeline> {
        Ok(self.unit(name)?.read_all())
    }

    /// The fixed, log-independent resolution order
    pub fn get_sequence(&self) -> &'static [Phase; 35] {
        &Phase::ALL
    }

    /// Recoverable problems found while parsing; inspect before trusting
    /// the output
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Highest impulse observed anywhere in the log
    pub fn max_impulse(&self) -> u32 {
        self.max_impulse
    }

    /// A unit's speed at the given time (most recent change at or before)
    pub fn current_speed(&self, name: &str, time: &str) -> Result<u32> {
        let time = convert_to_imp(time)?;
        Ok(self.unit(name)?.current_speed(time))
    }

    /// A unit's facing at the given time
    pub fn current_facing(&self, name: &str, time: &str) -> Result<Facing> {
        let time = convert_to_imp(time)?;
        let unit = self.unit(name)?;
        let mut facing = Facing::A;
        for (&impulse, bag) in unit.read_all() {
            if impulse > time {
                break;
            }
            for action in bag.actions() {
                match action {
                    Action::Add { facing: value, .. }
                    | Action::Facing { facing: value, .. }
                    | Action::Location { facing: value, .. } => facing = *value,
                    _ => {}
                }
            }
        }
        Ok(facing)
    }

    /// A unit's last reported hex at the given time, `None` before any
    /// position was logged
    pub fn current_location(&self, name: &str, time: &str) -> Result<Option<String>> {
        let time = convert_to_imp(time)?;
        let unit = self.unit(name)?;
        let mut location = None;
        for (&impulse, bag) in unit.read_all() {
            if impulse > time {
                break;
            }
            for action in bag.actions() {
                match action {
                    Action::Add { location: value, .. }
                    | Action::Location { location: value, .. } => {
                        location = Some(value.clone());
                    }
                    _ => {}
                }
            }
        }
        Ok(location)
    }

    /// Hexes a unit reported over the `count` impulses ending at `time`,
    /// as (impulse, location) pairs in impulse order
    pub fn location_trail(
        &self,
        name: &str,
        time: &str,
        count: u32,
    ) -> Result<Vec<(u32, String)>> {
        let time = convert_to_imp(time)?;
        let unit = self.unit(name)?;
        let start = time.saturating_sub(count.saturating_sub(1));
        let mut trail = Vec::new();
        for (&impulse, bag) in unit.read_all().range(start..=time) {
            for action in bag.actions() {
                match action {
                    Action::Add { location: value, .. }
                    | Action::Location { location: value, .. } => {
                        trail.push((impulse, value.clone()));
                    }
                    _ => {}
                }
            }
        }
        Ok(trail)
    }

    /// Hex range between two units at the given time; `None` until both
    /// have a reported position
    pub fn hex_range(&self, name_a: &str, name_b: &str, time: &str) -> Result<Option<u32>> {
        let location_a = self.current_location(name_a, time)?;
        let location_b = self.current_location(name_b, time)?;
        match (location_a, location_b) {
            (Some(a), Some(b)) => {
                let a = HexLocation::parse(&a)?;
                let b = HexLocation::parse(&b)?;
                Ok(Some(a.range(b)))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::action::ActionKind;

    const LOG: &str = "\
Alice has selected Kzinti CA
Bob has selected Klingon D7
Impulse 1.1:
Kzinti CA (Type:Kzinti CA) has been added at 0210
Klingon D7 (Type:Klingon D7) has been added at 1210
Kzinti CA initial speed to 0
Klingon D7 initial speed to 16
Impulse 1.2:
Waypoint (Type:Klingon D7 Point of Turn) has been added at 1211
Klingon D7 has moved to 1211A
Impulse 1.5:
Kzinti CA has changed to facing D after 0 move(s)
Impulse 1.6:
Activity Orders (Segment: 6B02.01, Activate/deactivate cloaking device.)
Bob orders are in
Impulse 1.8:
Klingon D7 fires Disruptor #1 (FX) at Kzinti CA (Range: 10)
Allocation of damage for: Kzinti CA
Damage: 0/0/4/0/0/0 (Total: 4)
Shield Reinforcement: 0/0/0/0/0/0
Impulse 2.4:
Drone A (Type:Type-I Drone) has been added at 0211, direction C, speed 20
Impulse 2.6:
Drone A has been discarded
Impulse 2.9:
";

    fn parsed() -> BattleLog {
        BattleLog::parse(LOG).expect("log parses")
    }

    #[test]
    fn test_empty_input_is_fatal() {
        assert!(matches!(BattleLog::parse(""), Err(LogError::EmptyLog)));
    }

    #[test]
    fn test_discovery_skips_waypoint_markers() {
        let log = parsed();
        let units = log.get_units();
        let names: Vec<_> = units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["Kzinti CA", "Klingon D7", "Drone A"]);
    }

    #[test]
    fn test_unit_summaries() {
        let log = parsed();
        let units = log.get_units();
        assert_eq!(units[0].basic, BasicType::Ship);
        assert_eq!(units[0].added, 1);
        // never removed: defaults to the last impulse in the log
        assert_eq!(units[0].removed, convert_to_imp("2.9").unwrap());
        assert_eq!(units[2].basic, BasicType::Drone);
        assert_eq!(units[2].removed, convert_to_imp("2.6").unwrap());
    }

    #[test]
    fn test_unknown_unit_queries_fail_cleanly() {
        let log = parsed();
        assert!(matches!(
            log.get_weapons("Nonexistent"),
            Err(LogError::UnknownUnit(_))
        ));
        assert!(matches!(
            log.read_all("Nonexistent"),
            Err(LogError::UnknownUnit(_))
        ));
    }

    #[test]
    fn test_cloak_attributed_to_owning_player_only() {
        let log = parsed();
        let d7 = log.read_all("Klingon D7").unwrap();
        let bag = &d7[&convert_to_imp("1.6").unwrap()];
        assert!(bag.get(ActionKind::Cloak).is_some());

        // Alice never announced cloak orders
        let ca = log.read_all("Kzinti CA").unwrap();
        assert!(!ca.contains_key(&convert_to_imp("1.6").unwrap()));
    }

    #[test]
    fn test_read_merges_into_phases() {
        let log = parsed();
        let merged = log.read("1.8").unwrap();
        let fire = &merged[&Phase::FireDeclaration];
        assert_eq!(fire.len(), 1);
        let damage = &merged[&Phase::DamageAllocation];
        assert_eq!(damage.len(), 1);
    }

    #[test]
    fn test_read_empty_impulse() {
        let log = parsed();
        assert!(log.read("2.8").unwrap().is_empty());
    }

    #[test]
    fn test_stationary_facing_change_lands_in_tac_phase() {
        let log = parsed();
        let merged = log.read("1.5").unwrap();
        let tac = &merged[&Phase::MovementTac];
        assert_eq!(tac.len(), 1);
        assert!(!merged.contains_key(&Phase::MovementShips));
    }

    #[test]
    fn test_moving_unit_routes_to_type_phase() {
        let log = parsed();
        let merged = log.read("1.2").unwrap();
        assert!(merged.contains_key(&Phase::MovementShips));
        assert!(!merged.contains_key(&Phase::MovementTac));
    }

    #[test]
    fn test_drone_add_routes_to_launch_phase() {
        let log = parsed();
        let merged = log.read("2.4").unwrap();
        assert!(merged.contains_key(&Phase::LaunchDrones));
        assert!(!merged.contains_key(&Phase::MovementShips));
    }

    #[test]
    fn test_get_sequence_is_fixed() {
        let log = parsed();
        assert_eq!(log.get_sequence().len(), 35);
        assert_eq!(log.get_sequence()[0], Phase::MovementShips);
        assert_eq!(log.get_sequence()[34], Phase::ImpulseEnd);
    }

    #[test]
    fn test_derived_position_queries() {
        let log = parsed();
        assert_eq!(
            log.current_location("Klingon D7", "1.2").unwrap().as_deref(),
            Some("1211")
        );
        assert_eq!(log.current_facing("Kzinti CA", "1.5").unwrap(), Facing::D);
        assert_eq!(log.current_speed("Klingon D7", "1.8").unwrap(), 16);
        // 0210 to 1211: ten columns over, about a row down
        let range = log.hex_range("Kzinti CA", "Klingon D7", "1.8").unwrap();
        assert_eq!(range, Some(10));
    }

    #[test]
    fn test_location_trail_window() {
        let log = parsed();
        let trail = log.location_trail("Klingon D7", "1.8", 32).unwrap();
        assert_eq!(
            trail,
            vec![(1, "1210".to_string()), (2, "1211".to_string())]
        );
        let narrow = log.location_trail("Klingon D7", "1.8", 3).unwrap();
        assert!(narrow.is_empty());
    }

    #[test]
    fn test_duplicate_add_keeps_first_unit() {
        let log = BattleLog::parse(
            "Impulse 1.1:\n\
             Kzinti CA (Type:Kzinti CA) has been added at 0210\n\
             Impulse 1.4:\n\
             Kzinti CA has been removed\n\
             Kzinti CA (Type:Kzinti CA) has been added at 0210\n",
        )
        .unwrap();
        assert_eq!(log.get_units().len(), 1);
        assert!(log
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("duplicate unit name")));
    }
}
