//! Action data model: what a unit did, impulse by impulse

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::facing::{Facing, TurnReason};

/// Coarse unit category, derived from a suffix match on the declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BasicType {
    #[default]
    Ship,
    Shuttle,
    Drone,
    Plasma,
    Esg,
    Web,
    Ppd,
    DisDev,
}

impl BasicType {
    /// Derive the basic category from a declared type string.
    ///
    /// "LDR TCWL" is a ship; "Type-IV Drone" is a drone; fighters count
    /// as shuttles. Anything unrecognized is assumed to be a ship.
    pub fn from_type_str(unit_type: &str) -> Self {
        let lowered = unit_type.to_ascii_lowercase();
        if lowered.ends_with("drone") {
            BasicType::Drone
        } else if lowered.ends_with("plasma") {
            BasicType::Plasma
        } else if lowered.ends_with("shuttle") || lowered.ends_with("fighter") {
            BasicType::Shuttle
        } else if lowered.ends_with("esg") {
            BasicType::Esg
        } else if lowered.ends_with("disdev") {
            BasicType::DisDev
        } else if lowered.ends_with("ppd") {
            BasicType::Ppd
        } else if lowered.ends_with("web") {
            BasicType::Web
        } else {
            BasicType::Ship
        }
    }
}

/// Discriminant for [`Action`], used as a routing key by the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Add,
    Remove,
    Facing,
    Location,
    Speed,
    Fire,
    Damage,
    TractorUp,
    TractorDown,
    Cloak,
}

impl ActionKind {
    pub const ALL: [ActionKind; 10] = [
        ActionKind::Add,
        ActionKind::Remove,
        ActionKind::Facing,
        ActionKind::Location,
        ActionKind::Speed,
        ActionKind::Fire,
        ActionKind::Damage,
        ActionKind::TractorUp,
        ActionKind::TractorDown,
        ActionKind::Cloak,
    ];
}

/// One recorded game event, tagged by kind.
///
/// `owner` is always the acting unit's name. Locations stay in the log's
/// four-digit text form; only the range queries interpret them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Action {
    Add {
        time: u32,
        facing: Facing,
        location: String,
        speed: u32,
        unit_type: String,
        owner: String,
    },
    Remove {
        added: u32,
        removed: u32,
        unit_type: String,
        owner: String,
    },
    Facing {
        facing: Facing,
        turn: TurnReason,
        owner: String,
    },
    Location {
        facing: Facing,
        location: String,
        turn: TurnReason,
        owner: String,
    },
    Speed {
        speed: u32,
        owner: String,
    },
    Fire {
        weapon: String,
        id: String,
        arc: String,
        target: String,
        range: u32,
        owner: String,
        owner_location: String,
    },
    Damage {
        total: i32,
        shields: i32,
        internals: i32,
        reinforcement: i32,
        owner: String,
        owner_location: String,
    },
    TractorUp {
        target: String,
        time: u32,
        owner: String,
        owner_location: String,
    },
    TractorDown {
        target: String,
        time: u32,
        owner: String,
        owner_location: String,
    },
    Cloak {
        owner: String,
        owner_location: String,
    },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Add { .. } => ActionKind::Add,
            Action::Remove { .. } => ActionKind::Remove,
            Action::Facing { .. } => ActionKind::Facing,
            Action::Location { .. } => ActionKind::Location,
            Action::Speed { .. } => ActionKind::Speed,
            Action::Fire { .. } => ActionKind::Fire,
            Action::Damage { .. } => ActionKind::Damage,
            Action::TractorUp { .. } => ActionKind::TractorUp,
            Action::TractorDown { .. } => ActionKind::TractorDown,
            Action::Cloak { .. } => ActionKind::Cloak,
        }
    }

    pub fn owner(&self) -> &str {
        match self {
            Action::Add { owner, .. }
            | Action::Remove { owner, .. }
            | Action::Facing { owner, .. }
            | Action::Location { owner, .. }
            | Action::Speed { owner, .. }
            | Action::Fire { owner, .. }
            | Action::Damage { owner, .. }
            | Action::TractorUp { owner, .. }
            | Action::TractorDown { owner, .. }
            | Action::Cloak { owner, .. } => owner,
        }
    }
}

/// Everything one unit did during a single impulse.
///
/// Fire and damage may occur several times per impulse and accumulate;
/// every other kind keeps the last record seen for the impulse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionBag {
    actions: Vec<Action>,
}

impl ActionBag {
    pub fn record(&mut self, action: Action) {
        match action.kind() {
            ActionKind::Fire | ActionKind::Damage => self.actions.push(action),
            kind => {
                if let Some(slot) = self.actions.iter_mut().find(|a| a.kind() == kind) {
                    *slot = action;
                } else {
                    self.actions.push(action);
                }
            }
        }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// First action of the given kind, if any
    pub fn get(&self, kind: ActionKind) -> Option<&Action> {
        self.actions.iter().find(|a| a.kind() == kind)
    }

    pub fn of_kind(&self, kind: ActionKind) -> impl Iterator<Item = &Action> {
        self.actions.iter().filter(move |a| a.kind() == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Ordered mapping from linear impulse to that impulse's action bag
pub type Timeline = BTreeMap<u32, ActionBag>;

/// One deduplicated entry in a unit's weapon loadout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponMount {
    pub weapon: String,
    pub id: String,
    pub arc: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_type_suffix_match() {
        assert_eq!(BasicType::from_type_str("LDR TCWL"), BasicType::Ship);
        assert_eq!(BasicType::from_type_str("Type-IV Drone"), BasicType::Drone);
        assert_eq!(BasicType::from_type_str("Gorn Plasma"), BasicType::Plasma);
        assert_eq!(BasicType::from_type_str("Admin Shuttle"), BasicType::Shuttle);
        assert_eq!(BasicType::from_type_str("Stinger Fighter"), BasicType::Shuttle);
        assert_eq!(BasicType::from_type_str("Lyran ESG"), BasicType::Esg);
        assert_eq!(BasicType::from_type_str("Hydran DisDev"), BasicType::DisDev);
        assert_eq!(BasicType::from_type_str("Andro PPD"), BasicType::Ppd);
        assert_eq!(BasicType::from_type_str("Tholian Web"), BasicType::Web);
        assert_eq!(BasicType::from_type_str("Mystery Marker"), BasicType::Ship);
    }

    #[test]
    fn test_bag_keeps_last_scalar_record() {
        let mut bag = ActionBag::default();
        bag.record(Action::Speed {
            speed: 8,
            owner: "CA".into(),
        });
        bag.record(Action::Speed {
            speed: 16,
            owner: "CA".into(),
        });

        assert_eq!(bag.actions().len(), 1);
        assert_eq!(
            bag.get(ActionKind::Speed),
            Some(&Action::Speed {
                speed: 16,
                owner: "CA".into()
            })
        );
    }

    #[test]
    fn test_bag_accumulates_fire_and_damage() {
        let mut bag = ActionBag::default();
        for id in ["1", "2"] {
            bag.record(Action::Fire {
                weapon: "Phaser-1".into(),
                id: id.into(),
                arc: "FA".into(),
                target: "DD".into(),
                range: 4,
                owner: "CA".into(),
                owner_location: "0101".into(),
            });
        }

        assert_eq!(bag.of_kind(ActionKind::Fire).count(), 2);
    }
}
