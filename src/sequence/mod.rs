//! The fixed order of resolution within an impulse
//!
//! Simultaneous per-impulse actions resolve in 35 strictly ordered
//! phases. The routing table below assigns each action instance to its
//! phase from (action kind, basic unit type) plus, for movement-class
//! actions, whether the unit is currently stationary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::parse::action::{Action, ActionKind, BasicType};

/// One of the 35 resolution segments, in strict order.
///
/// Declaration order is resolution order; `ImpulseEnd` doubles as the
/// terminal catch-all for combinations the table has no rule for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    MovementShips,
    MovementShuttles,
    MovementSeekers,
    MovementTac,
    EsgDamage,
    EnveloperDamage,
    SeekerDamage,
    WebDamage,
    Breakdowns,
    SpeedChanges,
    TholianWebPass,
    EmerDecelEffect,
    VoluntaryFireControl,
    CloakingDevice,
    Tractors,
    Labs,
    LaunchPlasma,
    LaunchDrones,
    Esgs,
    DropShields,
    Transporters,
    MinesActive,
    LandShuttles,
    LaunchShuttles,
    AnnounceEmerDecel,
    DisDevDeclaration,
    FireDeclaration,
    Ppds,
    FirstHellbores,
    DirectFire,
    SecondHellbores,
    CastWeb,
    DamageAllocation,
    DisDevOperate,
    ImpulseEnd,
}

impl Phase {
    /// Every phase, in resolution order
    pub const ALL: [Phase; 35] = [
        Phase::MovementShips,
        Phase::MovementShuttles,
        Phase::MovementSeekers,
        Phase::MovementTac,
        Phase::EsgDamage,
        Phase::EnveloperDamage,
        Phase::SeekerDamage,
        Phase::WebDamage,
        Phase::Breakdowns,
        Phase::SpeedChanges,
        Phase::TholianWebPass,
        Phase::EmerDecelEffect,
        Phase::VoluntaryFireControl,
        Phase::CloakingDevice,
        Phase::Tractors,
        Phase::Labs,
        Phase::LaunchPlasma,
        Phase::LaunchDrones,
        Phase::Esgs,
        Phase::DropShields,
        Phase::Transporters,
        Phase::MinesActive,
        Phase::LandShuttles,
        Phase::LaunchShuttles,
        Phase::AnnounceEmerDecel,
        Phase::DisDevDeclaration,
        Phase::FireDeclaration,
        Phase::Ppds,
        Phase::FirstHellbores,
        Phase::DirectFire,
        Phase::SecondHellbores,
        Phase::CastWeb,
        Phase::DamageAllocation,
        Phase::DisDevOperate,
        Phase::ImpulseEnd,
    ];

    /// Position in the resolution order, 0 through 34
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Merged per-impulse output: actions grouped by phase, in phase order
pub type PhasedActions = BTreeMap<Phase, Vec<Action>>;

/// Routing decision for one action instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routed {
    pub phase: Phase,
    /// True when no rule covered the combination and the action landed in
    /// the catch-all; callers surface this rather than ignore it
    pub fallthrough: bool,
}

/// Assign an action to its resolution phase.
///
/// `stationary` is whether the unit's current speed is zero; it
/// redirects movement-class actions (facing and location changes) to the
/// TAC movement phase instead of the type-specific one.
pub fn route(kind: ActionKind, basic: BasicType, stationary: bool) -> Routed {
    let hit = |phase| Routed {
        phase,
        fallthrough: false,
    };
    match kind {
        ActionKind::Add => match basic {
            BasicType::Esg => hit(Phase::Esgs),
            BasicType::DisDev => hit(Phase::DisDevDeclaration),
            BasicType::Drone => hit(Phase::LaunchDrones),
            BasicType::Plasma => hit(Phase::LaunchPlasma),
            BasicType::Ppd => hit(Phase::FireDeclaration),
            BasicType::Ship => hit(Phase::MovementShips),
            BasicType::Shuttle => hit(Phase::LaunchShuttles),
            BasicType::Web => hit(Phase::CastWeb),
        },
        ActionKind::Cloak => hit(Phase::CloakingDevice),
        ActionKind::Damage => hit(Phase::DamageAllocation),
        ActionKind::Fire => hit(Phase::FireDeclaration),
        ActionKind::Speed => hit(Phase::SpeedChanges),
        ActionKind::TractorUp | ActionKind::TractorDown => hit(Phase::Tractors),
        ActionKind::Facing | ActionKind::Location => {
            if stationary {
                return hit(Phase::MovementTac);
            }
            match basic {
                BasicType::Ship => hit(Phase::MovementShips),
                BasicType::Shuttle => hit(Phase::MovementShuttles),
                BasicType::Drone | BasicType::Plasma => hit(Phase::MovementSeekers),
                // markers do not move under their own power; no rule exists
                BasicType::Esg | BasicType::Web | BasicType::Ppd | BasicType::DisDev => Routed {
                    phase: Phase::ImpulseEnd,
                    fallthrough: true,
                },
            }
        }
        ActionKind::Remove => match basic {
            BasicType::DisDev => hit(Phase::DisDevDeclaration),
            BasicType::Esg => hit(Phase::Esgs),
            BasicType::Ppd => hit(Phase::Ppds),
            BasicType::Web => hit(Phase::CastWeb),
            BasicType::Drone | BasicType::Plasma | BasicType::Ship | BasicType::Shuttle => {
                hit(Phase::ImpulseEnd)
            }
        },
    }
}
